use std::sync::Arc;

use curator_core::Session;
use serde_json::Value;
use tracing::debug;

use crate::console_ports::SessionStorage;

/// Storage key holding a bare bearer token.
pub const SESSION_TOKEN_KEY: &str = "admin_token";

/// Storage key holding the JSON session blob written at login.
pub const SESSION_BLOB_KEY: &str = "admin_session";

const BLOB_TOKEN_PATHS: [&[&str]; 3] = [
    &["access_token"],
    &["token"],
    &["auth", "access_token"],
];
const BLOB_ROLE_PATHS: [&[&str]; 3] = [&["role"], &["user", "role"], &["auth", "role"]];

/// Resolves the admin session from persisted client state.
///
/// Never fails: unreadable or malformed storage resolves to "no session".
#[derive(Clone)]
pub struct SessionAccessor {
    storage: Arc<dyn SessionStorage>,
}

impl SessionAccessor {
    /// Creates an accessor over a storage port.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self { storage }
    }

    /// Returns the bearer token, or an empty string when unauthenticated.
    ///
    /// Lookup order: bare token key, then the blob's `access_token`, `token`
    /// and `auth.access_token` fields.
    #[must_use]
    pub fn get_token(&self) -> String {
        self.bare_token()
            .or_else(|| {
                let blob = self.blob()?;
                token_from_blob(&blob)
            })
            .unwrap_or_default()
    }

    /// Returns the full session when a token is present.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        let blob = self.blob();
        let token = self
            .bare_token()
            .or_else(|| blob.as_ref().and_then(token_from_blob))?;
        let role = blob.as_ref().and_then(|blob| first_string(blob, &BLOB_ROLE_PATHS));

        Some(Session::new(token, role))
    }

    fn bare_token(&self) -> Option<String> {
        let raw = self.read(SESSION_TOKEN_KEY)?;
        let token = match serde_json::from_str::<String>(raw.as_str()) {
            Ok(unquoted) => unquoted,
            Err(_) => raw,
        };
        non_empty(token.as_str())
    }

    fn blob(&self) -> Option<Value> {
        let raw = self.read(SESSION_BLOB_KEY)?;
        match serde_json::from_str::<Value>(raw.as_str()) {
            Ok(value) => Some(value),
            Err(error) => {
                debug!(
                    key = SESSION_BLOB_KEY,
                    error = %error,
                    "ignoring unparsable session blob"
                );
                None
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(error) => {
                debug!(key, error = %error, "session storage unavailable");
                None
            }
        }
    }
}

fn token_from_blob(blob: &Value) -> Option<String> {
    match blob {
        Value::String(token) => non_empty(token.as_str()),
        _ => first_string(blob, &BLOB_TOKEN_PATHS),
    }
}

fn first_string(blob: &Value, paths: &[&[&str]]) -> Option<String> {
    paths.iter().find_map(|path| {
        let value = path
            .iter()
            .try_fold(blob, |current, segment| current.get(segment))?;
        value.as_str().and_then(non_empty)
    })
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
