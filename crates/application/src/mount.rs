use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "still mounted" flag for the controllers of one page.
///
/// Responses that resolve after [`MountHandle::unmount`] must not write
/// controller state.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl Default for MountHandle {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl MountHandle {
    /// Creates a mounted handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the owning page is still mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the owning page as gone.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}
