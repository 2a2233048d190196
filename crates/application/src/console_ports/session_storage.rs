use curator_core::AppResult;

/// Port over the client-side key/value store holding the persisted session.
pub trait SessionStorage: Send + Sync {
    /// Returns the raw value stored under `key`.
    fn get_item(&self, key: &str) -> AppResult<Option<String>>;
}
