use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MutationDraft, Payload, RecordId, ResourceBinding, ResourceRecord, normalize_code,
    number_value, require_one_of, required_scope,
};

/// Rarity tiers accepted by gacha pools.
pub const GACHA_RARITIES: [&str; 5] = ["N", "R", "SR", "SSR", "UR"];

/// Item that can be drawn from a gacha pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GachaItem {
    /// Server identifier.
    pub id: RecordId,
    /// Owning pool.
    #[serde(default)]
    pub pool_id: Option<RecordId>,
    /// Display name.
    pub item_name: String,
    /// Relative draw weight inside the pool.
    pub weight: f64,
    /// Rarity tier code.
    pub rarity: String,
    /// Whether the item is drawable.
    #[serde(default)]
    pub is_active: bool,
}

impl ResourceRecord for GachaItem {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Binding for `/admin/gacha/pools/{pool_id}/items`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GachaItemBinding;

impl ResourceBinding for GachaItemBinding {
    type Record = GachaItem;

    const NAME: &'static str = "gacha item";

    fn collection_segments(scope: Option<&str>) -> AppResult<Vec<String>> {
        let pool_id = required_scope(Self::NAME, scope)?;
        Ok(["admin", "gacha", "pools", pool_id, "items"]
            .into_iter()
            .map(str::to_owned)
            .collect())
    }

    fn scope_field() -> Option<&'static str> {
        Some("pool_id")
    }

    fn columns() -> &'static [&'static str] {
        &["id", "item_name", "rarity", "weight", "is_active"]
    }

    fn draft_from_record(record: &GachaItem) -> MutationDraft {
        MutationDraft::for_edit(record.id.clone())
            .with_text("item_name", record.item_name.as_str())
            .with_text("weight", record.weight.to_string())
            .with_text("rarity", record.rarity.as_str())
            .with_flag("is_active", record.is_active)
    }

    fn validate(draft: &MutationDraft) -> AppResult<()> {
        draft.required_text("item_name")?;
        if draft.required_number("weight")? <= 0.0 {
            return Err(AppError::Validation(
                "weight must be greater than zero".to_owned(),
            ));
        }
        let rarity = normalize_code(draft.required_text("rarity")?.as_str());
        require_one_of("rarity", rarity.as_str(), &GACHA_RARITIES)
    }

    fn normalize(draft: &MutationDraft) -> AppResult<Payload> {
        let mut payload = Payload::new();
        payload.insert(
            "item_name".to_owned(),
            Value::from(draft.required_text("item_name")?),
        );
        payload.insert(
            "weight".to_owned(),
            number_value("weight", draft.required_number("weight")?)?,
        );
        payload.insert(
            "rarity".to_owned(),
            Value::from(normalize_code(draft.required_text("rarity")?.as_str())),
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

    use super::GachaItemBinding;
    use crate::{MutationDraft, ResourceBinding};

    #[test]
    fn listing_waits_for_pool_id() {
        assert!(GachaItemBinding::requires_scope());
        assert!(GachaItemBinding::collection_segments(None).is_err());
        assert_eq!(
            GachaItemBinding::collection_segments(Some("summer")).ok(),
            Some(vec![
                "admin".to_owned(),
                "gacha".to_owned(),
                "pools".to_owned(),
                "summer".to_owned(),
                "items".to_owned()
            ])
        );
    }

    #[test]
    fn rarity_is_uppercased() {
        let draft = MutationDraft::new()
            .with_text("item_name", "Rem (Summer)")
            .with_text("weight", "0.5")
            .with_text("rarity", "ssr");

        assert!(GachaItemBinding::validate(&draft).is_ok());
        let payload = GachaItemBinding::normalize(&draft).unwrap_or_else(|_| unreachable!());
        assert_eq!(payload.get("rarity"), Some(&json!("SSR")));
        assert_eq!(payload.get("weight"), Some(&json!(0.5)));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let draft = MutationDraft::new()
            .with_text("item_name", "Rem")
            .with_text("weight", "0")
            .with_text("rarity", "R");

        assert!(GachaItemBinding::validate(&draft).is_err());
    }
}
