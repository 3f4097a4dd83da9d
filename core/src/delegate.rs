//! Error delegate capability.

use crate::error::ErrorType;

/// Receives the failure category of a request. Called at most once per
/// request, and never for a request whose success callback ran.
pub trait ErrorDelegate: Send + Sync {
    fn on_error(&self, error: ErrorType);
}

impl<F> ErrorDelegate for F
where
    F: Fn(ErrorType) + Send + Sync,
{
    fn on_error(&self, error: ErrorType) {
        self(error)
    }
}
