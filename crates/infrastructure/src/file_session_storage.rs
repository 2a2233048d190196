use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use curator_application::SessionStorage;
use curator_core::{AppError, AppResult};
use serde_json::Value;

/// Session storage backed by a JSON object on disk.
///
/// The file maps storage keys to values. String values are returned as they
/// are; any other JSON value is returned serialized, so a nested session blob
/// can be stored without escaping.
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    /// Creates storage reading from `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }
}

impl SessionStorage for FileSessionStorage {
    fn get_item(&self, key: &str) -> AppResult<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => {
                return Err(AppError::Unavailable(format!(
                    "failed to read session file '{}': {error}",
                    self.path.display()
                )));
            }
        };

        let document: Value = serde_json::from_str(contents.as_str()).map_err(|error| {
            AppError::Validation(format!(
                "session file '{}' is not valid JSON: {error}",
                self.path.display()
            ))
        })?;

        Ok(match document.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(value)) => Some(value.clone()),
            Some(other) => Some(other.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use curator_application::{SESSION_TOKEN_KEY, SessionAccessor, SessionStorage};

    use super::FileSessionStorage;

    fn session_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "curator-session-{}-{name}.json",
            std::process::id()
        ));
        assert!(std::fs::write(&path, contents).is_ok());
        path
    }

    #[test]
    fn missing_file_is_an_empty_session() {
        let storage = FileSessionStorage::new("/nonexistent/curator/session.json");
        assert_eq!(storage.get_item(SESSION_TOKEN_KEY), Ok(None));
    }

    #[test]
    fn nested_blob_is_returned_serialized() {
        let path = session_file(
            "nested",
            r#"{"admin_session":{"auth":{"access_token":"nested-token"}}}"#,
        );
        let storage = FileSessionStorage::new(&path);

        let accessor = SessionAccessor::new(std::sync::Arc::new(storage.clone()));
        assert_eq!(accessor.get_token(), "nested-token");
        assert_eq!(storage.get_item(SESSION_TOKEN_KEY), Ok(None));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_reports_an_error() {
        let path = session_file("corrupt", "{not json");
        let storage = FileSessionStorage::new(&path);

        assert!(storage.get_item(SESSION_TOKEN_KEY).is_err());
        assert_eq!(SessionAccessor::new(std::sync::Arc::new(storage)).get_token(), "");

        let _ = std::fs::remove_file(path);
    }
}
