use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MutationDraft, Payload, RecordId, ResourceBinding, ResourceRecord, number_value,
};

/// Decorative frame drawn around user avatars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarBorder {
    /// Server identifier.
    pub id: RecordId,
    /// Display name.
    pub name: String,
    /// Frame image location.
    pub image_url: String,
    /// Store price in coins; free when absent.
    #[serde(default)]
    pub price: Option<f64>,
    /// Whether the border is offered.
    #[serde(default)]
    pub is_active: bool,
}

impl ResourceRecord for AvatarBorder {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Binding for `/admin/avatar-borders`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvatarBorderBinding;

impl ResourceBinding for AvatarBorderBinding {
    type Record = AvatarBorder;

    const NAME: &'static str = "avatar border";

    fn collection_segments(_scope: Option<&str>) -> AppResult<Vec<String>> {
        Ok(vec!["admin".to_owned(), "avatar-borders".to_owned()])
    }

    fn columns() -> &'static [&'static str] {
        &["id", "name", "price", "is_active"]
    }

    fn draft_from_record(record: &AvatarBorder) -> MutationDraft {
        MutationDraft::for_edit(record.id.clone())
            .with_text("name", record.name.as_str())
            .with_text("image_url", record.image_url.as_str())
            .with_text(
                "price",
                record.price.map(|price| price.to_string()).unwrap_or_default(),
            )
            .with_flag("is_active", record.is_active)
    }

    fn validate(draft: &MutationDraft) -> AppResult<()> {
        draft.required_text("name")?;
        draft.required_text("image_url")?;
        if let Some(price) = draft.optional_number("price")?
            && price < 0.0
        {
            return Err(AppError::Validation(
                "price must not be negative".to_owned(),
            ));
        }
        Ok(())
    }

    fn normalize(draft: &MutationDraft) -> AppResult<Payload> {
        let mut payload = Payload::new();
        payload.insert("name".to_owned(), Value::from(draft.required_text("name")?));
        payload.insert(
            "image_url".to_owned(),
            Value::from(draft.required_text("image_url")?),
        );
        if let Some(price) = draft.optional_number("price")? {
            payload.insert("price".to_owned(), number_value("price", price)?);
        }
        payload.insert("is_active".to_owned(), Value::from(draft.flag("is_active")));
        Ok(payload)
    }

    fn toggle_field() -> Option<&'static str> {
        Some("is_active")
    }
}
