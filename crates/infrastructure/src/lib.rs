//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod file_session_storage;
mod http_resource_api;
mod in_memory_resource_api;
mod tracing_notifier;

pub use file_session_storage::FileSessionStorage;
pub use http_resource_api::HttpResourceApi;
pub use in_memory_resource_api::InMemoryResourceApi;
pub use tracing_notifier::TracingNotifier;
