use curator_core::AppResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{MutationDraft, Payload, RecordId, ResourceBinding, ResourceRecord};

/// Profile badge awarded to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// Server identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional icon location.
    #[serde(default)]
    pub icon_url: Option<String>,
    /// Whether users can currently earn the badge.
    #[serde(default)]
    pub is_active: bool,
}

impl ResourceRecord for Badge {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Binding for `/admin/badges`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeBinding;

impl ResourceBinding for BadgeBinding {
    type Record = Badge;

    const NAME: &'static str = "badge";

    fn collection_segments(_scope: Option<&str>) -> AppResult<Vec<String>> {
        Ok(vec!["admin".to_owned(), "badges".to_owned()])
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "is_active"]
    }

    fn draft_from_record(record: &Badge) -> MutationDraft {
        MutationDraft::for_edit(record.id.clone())
            .with_text("name", record.name.as_str())
            .with_text("description", record.description.clone().unwrap_or_default())
            .with_text("icon_url", record.icon_url.clone().unwrap_or_default())
            .with_flag("is_active", record.is_active)
    }

    fn validate(draft: &MutationDraft) -> AppResult<()> {
        draft.required_text("name")?;
        Ok(())
    }

    fn normalize(draft: &MutationDraft) -> AppResult<Payload> {
        let mut payload = Payload::new();
        payload.insert("name".to_owned(), Value::from(draft.required_text("name")?));
        payload.insert(
            "description".to_owned(),
            Value::from(draft.text("description").trim()),
        );
        payload.insert(
            "icon_url".to_owned(),
            Value::from(draft.text("icon_url").trim()),
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

    use super::{Badge, BadgeBinding};
    use crate::{MutationDraft, RecordId, ResourceBinding};

    #[test]
    fn edit_draft_copies_whitelisted_fields() {
        let badge = Badge {
            id: RecordId::from(5),
            name: "Night Owl".to_owned(),
            description: None,
            icon_url: Some("https://cdn.example/owl.png".to_owned()),
            is_active: true,
        };

        let draft = BadgeBinding::draft_from_record(&badge);

        assert_eq!(draft.record_id(), Some(&RecordId::from(5)));
        assert_eq!(draft.text("name"), "Night Owl");
        assert_eq!(draft.text("description"), "");
        assert!(draft.flag("is_active"));
    }

    #[test]
    fn normalize_trims_text_fields() {
        let draft = MutationDraft::new()
            .with_text("name", "  Night Owl ")
            .with_text("icon_url", " https://cdn.example/owl.png ");

        let payload = BadgeBinding::normalize(&draft).unwrap_or_else(|_| unreachable!());

        assert_eq!(payload.get("name"), Some(&json!("Night Owl")));
        assert_eq!(
            payload.get("icon_url"),
            Some(&json!("https://cdn.example/owl.png"))
        );
        assert_eq!(payload.get("is_active"), Some(&json!(false)));
    }

    #[test]
    fn name_is_required() {
        assert!(BadgeBinding::validate(&MutationDraft::new()).is_err());
    }
}
