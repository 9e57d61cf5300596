//! Error types for `porter-ledger`.

use porter_core::ValidationError;
use thiserror::Error;

/// A read-path failure surfaced under
/// [`ReadErrorPolicy::Propagate`](crate::ReadErrorPolicy), or a failure to
/// open a live feed.
#[derive(Debug, Error)]
pub enum LedgerError {
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Failure of the manual-entry pipeline.
///
/// Warnings are deliberately not here — a contradictory entry is an advisory
/// pause carried in
/// [`RecordOutcome::NeedsConfirmation`](crate::RecordOutcome), not an error.
#[derive(Debug, Error)]
pub enum RecordError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<LedgerError> for RecordError {
  fn from(e: LedgerError) -> Self {
    match e {
      LedgerError::Store(inner) => Self::Store(inner),
    }
  }
}
