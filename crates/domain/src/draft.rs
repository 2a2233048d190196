use std::collections::BTreeMap;

use curator_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Value held by one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DraftValue {
    /// Text input, kept exactly as typed.
    Text(String),
    /// Checkbox or switch.
    Flag(bool),
}

/// Whether a draft creates a new record or edits an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DraftMode {
    /// Add form.
    #[default]
    Create,
    /// Edit form for the given record.
    Edit(RecordId),
}

/// Client-local, uncommitted copy of a record's editable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationDraft {
    mode: DraftMode,
    fields: BTreeMap<String, DraftValue>,
}

impl MutationDraft {
    /// Creates an empty add-mode draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty edit-mode draft for a record.
    #[must_use]
    pub fn for_edit(record_id: RecordId) -> Self {
        Self {
            mode: DraftMode::Edit(record_id),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the draft mode.
    #[must_use]
    pub fn mode(&self) -> &DraftMode {
        &self.mode
    }

    /// Returns the edited record id in edit mode.
    #[must_use]
    pub fn record_id(&self) -> Option<&RecordId> {
        match &self.mode {
            DraftMode::Create => None,
            DraftMode::Edit(record_id) => Some(record_id),
        }
    }

    /// Returns whether the draft edits an existing record.
    #[must_use]
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, DraftMode::Edit(_))
    }

    /// Returns all fields.
    #[must_use]
    pub fn fields(&self) -> &BTreeMap<String, DraftValue> {
        &self.fields
    }

    /// Returns whether no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Writes a text field.
    pub fn set_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(field.into(), DraftValue::Text(value.into()));
    }

    /// Writes a flag field.
    pub fn set_flag(&mut self, field: impl Into<String>, value: bool) {
        self.fields.insert(field.into(), DraftValue::Flag(value));
    }

    /// Builder form of [`MutationDraft::set_text`].
    #[must_use]
    pub fn with_text(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_text(field, value);
        self
    }

    /// Builder form of [`MutationDraft::set_flag`].
    #[must_use]
    pub fn with_flag(mut self, field: impl Into<String>, value: bool) -> Self {
        self.set_flag(field, value);
        self
    }

    /// Returns a text field as typed, or an empty string.
    #[must_use]
    pub fn text(&self, field: &str) -> &str {
        match self.fields.get(field) {
            Some(DraftValue::Text(value)) => value.as_str(),
            _ => "",
        }
    }

    /// Returns a flag field, `false` when unset.
    #[must_use]
    pub fn flag(&self, field: &str) -> bool {
        match self.fields.get(field) {
            Some(DraftValue::Flag(value)) => *value,
            Some(DraftValue::Text(value)) => value.trim().eq_ignore_ascii_case("true"),
            None => false,
        }
    }

    /// Returns the trimmed text of a required field.
    pub fn required_text(&self, field: &str) -> AppResult<String> {
        self.optional_text(field)
            .ok_or_else(|| AppError::Validation(format!("{field} is required")))
    }

    /// Returns the trimmed text of an optional field, `None` when blank.
    #[must_use]
    pub fn optional_text(&self, field: &str) -> Option<String> {
        let trimmed = self.text(field).trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    /// Parses a required finite number.
    pub fn required_number(&self, field: &str) -> AppResult<f64> {
        let value = self.required_text(field)?;
        parse_finite(field, value.as_str())
    }

    /// Parses an optional finite number, `None` when blank.
    pub fn optional_number(&self, field: &str) -> AppResult<Option<f64>> {
        self.optional_text(field)
            .map(|value| parse_finite(field, value.as_str()))
            .transpose()
    }

    /// Parses a required whole number.
    pub fn required_integer(&self, field: &str) -> AppResult<i64> {
        let value = self.required_text(field)?;
        parse_integer(field, value.as_str())
    }

    /// Parses an optional whole number, `None` when blank.
    pub fn optional_integer(&self, field: &str) -> AppResult<Option<i64>> {
        self.optional_text(field)
            .map(|value| parse_integer(field, value.as_str()))
            .transpose()
    }
}

fn parse_finite(field: &str, value: &str) -> AppResult<f64> {
    value
        .parse::<f64>()
        .ok()
        .filter(|parsed| parsed.is_finite())
        .ok_or_else(|| AppError::Validation(format!("{field} must be a number, got '{value}'")))
}

fn parse_integer(field: &str, value: &str) -> AppResult<i64> {
    value.parse::<i64>().map_err(|_| {
        AppError::Validation(format!("{field} must be a whole number, got '{value}'"))
    })
}
