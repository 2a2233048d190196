use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    MutationDraft, Payload, RecordId, ResourceBinding, ResourceRecord, local_input_to_rfc3339,
    normalize_code, number_value, require_one_of, rfc3339_to_local_input,
};

/// Status codes accepted by the redeem code endpoints.
pub const REDEEM_CODE_STATUSES: [&str; 3] = ["ACTIVE", "DISABLED", "EXPIRED"];

/// Redeemable code granting wallet currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedeemCode {
    /// Server identifier.
    pub id: RecordId,
    /// Code typed by users.
    pub code: String,
    /// Currency credited per redemption.
    pub reward_amount: f64,
    /// Redemption cap; unlimited when absent.
    #[serde(default)]
    pub max_uses: Option<i64>,
    /// Redemptions so far.
    #[serde(default)]
    pub used_count: i64,
    /// Expiry timestamp in RFC 3339.
    #[serde(default)]
    pub expires_at: Option<String>,
    /// Lifecycle status code.
    pub status: String,
}

impl ResourceRecord for RedeemCode {
    fn record_id(&self) -> &RecordId {
        &self.id
    }
}

/// Binding for `/admin/redeem-codes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedeemCodeBinding;

impl ResourceBinding for RedeemCodeBinding {
    type Record = RedeemCode;

    const NAME: &'static str = "redeem code";

    fn collection_segments(_scope: Option<&str>) -> AppResult<Vec<String>> {
        Ok(vec!["admin".to_owned(), "redeem-codes".to_owned()])
    }

    fn columns() -> &'static [&'static str] {
        &["id", "code", "reward_amount", "used_count", "max_uses", "status"]
    }

    fn draft_from_record(record: &RedeemCode) -> MutationDraft {
        MutationDraft::for_edit(record.id.clone())
            .with_text("code", record.code.as_str())
            .with_text("reward_amount", record.reward_amount.to_string())
            .with_text(
                "max_uses",
                record.max_uses.map(|uses| uses.to_string()).unwrap_or_default(),
            )
            .with_text(
                "expires_at",
                record
                    .expires_at
                    .as_deref()
                    .map(rfc3339_to_local_input)
                    .unwrap_or_default(),
            )
            .with_text("status", record.status.as_str())
    }

    fn validate(draft: &MutationDraft) -> AppResult<()> {
        let code = normalize_code(draft.required_text("code")?.as_str());
        if !code
            .chars()
            .all(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
        {
            return Err(AppError::Validation(
                "code may only contain letters, digits, '-' and '_'".to_owned(),
            ));
        }
        if draft.required_number("reward_amount")? <= 0.0 {
            return Err(AppError::Validation(
                "reward_amount must be greater than zero".to_owned(),
            ));
        }
        if let Some(max_uses) = draft.optional_integer("max_uses")?
            && max_uses < 1
        {
            return Err(AppError::Validation(
                "max_uses must be at least 1".to_owned(),
            ));
        }
        local_input_to_rfc3339("expires_at", draft.text("expires_at"))?;
        status_code(draft).map(|_| ())
    }

    fn normalize(draft: &MutationDraft) -> AppResult<Payload> {
        let mut payload = Payload::new();
        payload.insert(
            "code".to_owned(),
            Value::from(normalize_code(draft.required_text("code")?.as_str())),
        );
        payload.insert(
            "reward_amount".to_owned(),
            number_value("reward_amount", draft.required_number("reward_amount")?)?,
        );
        if let Some(max_uses) = draft.optional_integer("max_uses")? {
            payload.insert("max_uses".to_owned(), Value::from(max_uses));
        }
        if let Some(expires_at) = local_input_to_rfc3339("expires_at", draft.text("expires_at"))? {
            payload.insert("expires_at".to_owned(), Value::from(expires_at));
        }
        payload.insert("status".to_owned(), Value::from(status_code(draft)?));
        Ok(payload)
    }
}

fn status_code(draft: &MutationDraft) -> AppResult<String> {
    let status = draft
        .optional_text("status")
        .map(|value| normalize_code(value.as_str()))
        .unwrap_or_else(|| REDEEM_CODE_STATUSES[0].to_owned());
    require_one_of("status", status.as_str(), &REDEEM_CODE_STATUSES)?;
    Ok(status)
}
