//! Error types for `porter-core`.

use thiserror::Error;

/// Rejection of manual-entry input, raised before any store call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("name must not be empty")]
  EmptyName,

  #[error("id number must not be empty")]
  EmptyIdNumber,

  #[error("guard entries cannot be recorded through the manual-entry path")]
  GuardEntry,
}
