use serde::{Deserialize, Serialize};

/// Authenticated admin session resolved from persisted client state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    token: String,
    role: Option<String>,
}

impl Session {
    /// Creates a session from a bearer token and optional role.
    #[must_use]
    pub fn new(token: impl Into<String>, role: Option<String>) -> Self {
        Self {
            token: token.into(),
            role,
        }
    }

    /// Returns the bearer token sent to the remote API.
    #[must_use]
    pub fn token(&self) -> &str {
        self.token.as_str()
    }

    /// Returns the role recorded at login, if any.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns whether the session carries a usable token.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.token.trim().is_empty()
    }
}
