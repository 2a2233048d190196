/// Two-step guard in front of an irreversible action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationGate<T> {
    /// Nothing awaits confirmation.
    Closed,
    /// The target awaits an explicit confirm or cancel.
    Open(T),
}

impl<T> Default for ConfirmationGate<T> {
    fn default() -> Self {
        Self::Closed
    }
}

impl<T> ConfirmationGate<T> {
    /// Opens the gate for a target, replacing any pending one.
    pub fn request(&mut self, target: T) {
        *self = Self::Open(target);
    }

    /// Closes the gate and returns the target to act on.
    ///
    /// Returns `None` when the gate was already closed; callers must then
    /// skip the destructive action.
    pub fn confirm(&mut self) -> Option<T> {
        match std::mem::replace(self, Self::Closed) {
            Self::Open(target) => Some(target),
            Self::Closed => None,
        }
    }

    /// Closes the gate and discards the pending target.
    pub fn cancel(&mut self) -> Option<T> {
        self.confirm()
    }

    /// Returns whether a target awaits confirmation.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// Returns the pending target.
    #[must_use]
    pub fn target(&self) -> Option<&T> {
        match self {
            Self::Open(target) => Some(target),
            Self::Closed => None,
        }
    }
}
