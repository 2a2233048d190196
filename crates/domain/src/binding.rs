use curator_core::{AppError, AppResult};
use serde_json::{Map, Number, Value};

use crate::{MutationDraft, ResourceRecord};

/// JSON object submitted to a mutation endpoint.
pub type Payload = Map<String, Value>;

/// Binds one server resource to the generic list and mutation controllers.
///
/// A binding only describes the resource: where it lives, which fields the
/// forms edit and how a draft is validated and normalized. Controllers own all
/// state and I/O.
pub trait ResourceBinding: Send + Sync + 'static {
    /// Record type returned by list endpoints.
    type Record: ResourceRecord;

    /// Stable resource name used in logs and notifications.
    const NAME: &'static str;

    /// Path segments of the collection below the API base URL.
    ///
    /// Segments are unescaped; adapters encode each one on its own, so a
    /// parent identifier never spills into a neighbouring segment. Scoped
    /// resources receive the parent identifier and reject `None`.
    fn collection_segments(scope: Option<&str>) -> AppResult<Vec<String>>;

    /// Record field holding the parent identifier of nested resources.
    fn scope_field() -> Option<&'static str> {
        None
    }

    /// Returns whether listing waits for a parent identifier.
    fn requires_scope() -> bool {
        Self::scope_field().is_some()
    }

    /// Record fields shown as table columns.
    fn columns() -> &'static [&'static str];

    /// Copies the editable subset of a record into an edit-mode draft.
    fn draft_from_record(record: &Self::Record) -> MutationDraft;

    /// Checks required and typed fields without touching the network.
    fn validate(draft: &MutationDraft) -> AppResult<()>;

    /// Builds the payload submitted for a validated draft.
    fn normalize(draft: &MutationDraft) -> AppResult<Payload>;

    /// Boolean field flipped by the row-level status toggle.
    fn toggle_field() -> Option<&'static str> {
        None
    }
}

/// Converts a finite number into JSON, preferring integers when exact.
pub fn number_value(field: &str, value: f64) -> AppResult<Value> {
    if value.fract() == 0.0 && value.abs() < 9.0e15 {
        #[allow(clippy::cast_possible_truncation)]
        return Ok(Value::from(value as i64));
    }

    Number::from_f64(value)
        .map(Value::Number)
        .ok_or_else(|| AppError::Validation(format!("{field} must be a finite number")))
}

/// Rejects scope-less paths for nested resources.
pub fn required_scope<'a>(resource: &str, scope: Option<&'a str>) -> AppResult<&'a str> {
    scope
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("{resource} requires a parent identifier")))
}

/// Checks that an enum-like code is one of the allowed values.
pub fn require_one_of(field: &str, value: &str, allowed: &[&str]) -> AppResult<()> {
    if allowed.contains(&value) {
        return Ok(());
    }

    Err(AppError::Validation(format!(
        "{field} must be one of {}, got '{value}'",
        allowed.join(", ")
    )))
}
