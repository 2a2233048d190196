use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MutationDraft, Payload, RecordId, ResourceBinding, ResourceRecord, join_list, number_value,
    split_list,
};

/// VIP subscription plan sold to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VipPlan {
    /// Server identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Price in the store currency.
    pub price: f64,
    /// Subscription length granted per purchase.
    pub duration_days: i64,
    /// Marketing perks listed on the plan card.
    #[serde(default)]
    pub perks: Vec<String>,
    /// Whether the plan can be purchased.
    #[serde(default)]
    pub is_active: bool,
}

impl ResourceRecord for VipPlan {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Binding for `/admin/vip/plans`.
#[derive(Debug, Clone, Copy, Default)]
pub struct VipPlanBinding;

impl ResourceBinding for VipPlanBinding {
    type Record = VipPlan;

    const NAME: &'static str = "VIP plan";

    fn collection_segments(_scope: Option<&str>) -> AppResult<Vec<String>> {
        Ok(vec!["admin".to_owned(), "vip".to_owned(), "plans".to_owned()])
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "price", "duration_days", "is_active"]
    }

    fn draft_from_record(record: &VipPlan) -> MutationDraft {
        MutationDraft::for_edit(record.id.clone())
            .with_text("name", record.name.as_str())
            .with_text("price", record.price.to_string())
            .with_text("duration_days", record.duration_days.to_string())
            .with_text("perks", join_list(&record.perks))
            .with_flag("is_active", record.is_active)
    }

    fn validate(draft: &MutationDraft) -> AppResult<()> {
        draft.required_text("name")?;
        if draft.required_number("price")? < 0.0 {
            return Err(AppError::Validation(
                "price must not be negative".to_owned(),
            ));
        }
        if draft.required_integer("duration_days")? < 1 {
            return Err(AppError::Validation(
                "duration_days must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    fn normalize(draft: &MutationDraft) -> AppResult<Payload> {
        let mut payload = Payload::new();
        payload.insert("name".to_owned(), Value::from(draft.required_text("name")?));
        payload.insert(
            "price".to_owned(),
            number_value("price", draft.required_number("price")?)?,
        );
        payload.insert(
            "duration_days".to_owned(),
            Value::from(draft.required_integer("duration_days")?),
        );
        payload.insert(
            "perks".to_owned(),
            Value::from(split_list(draft.text("perks"))),
        );
        payload.insert("is_active".to_owned(), Value::from(draft.flag("is_active")));
        Ok(payload)
    }

    fn toggle_field() -> Option<&'static str> {
        Some("is_active")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{VipPlan, VipPlanBinding};
    use crate::{MutationDraft, RecordId, ResourceBinding};

    #[test]
    fn perks_are_edited_as_lines() {
        let plan = VipPlan {
            id: RecordId::from("gold"),
            name: "Gold".to_owned(),
            price: 9.99,
            duration_days: 30,
            perks: vec!["No ads".to_owned(), "HD streams".to_owned()],
            is_active: true,
        };

        let draft = VipPlanBinding::draft_from_record(&plan);

        assert_eq!(draft.text("perks"), "No ads\nHD streams");
        assert_eq!(draft.text("duration_days"), "30");
    }

    #[test]
    fn normalize_converts_lines_and_numbers() {
        let draft = MutationDraft::new()
            .with_text("name", "Gold")
            .with_text("price", "30")
            .with_text("duration_days", "30")
            .with_text("perks", "No ads\n\n HD streams ")
            .with_flag("is_active", true);

        let payload = VipPlanBinding::normalize(&draft).unwrap_or_else(|_| unreachable!());

        assert_eq!(payload.get("price"), Some(&json!(30)));
        assert_eq!(payload.get("perks"), Some(&json!(["No ads", "HD streams"])));
    }

    #[test]
    fn non_numeric_price_fails_validation() {
        let draft = MutationDraft::new()
            .with_text("name", "Gold")
            .with_text("price", "free")
            .with_text("duration_days", "30");

        assert!(VipPlanBinding::validate(&draft).is_err());
    }

    #[test]
    fn zero_duration_fails_validation() {
        let draft = MutationDraft::new()
            .with_text("name", "Gold")
            .with_text("price", "5")
            .with_text("duration_days", "0");

        assert!(VipPlanBinding::validate(&draft).is_err());
    }
}
