//! The manual-entry pipeline: form input, contradiction warnings, and the
//! confirm/cancel token.
//!
//! A submission moves through: validate → (warning → confirm | submit) →
//! recorded / failed. A warning is a pending state, not an error — nothing
//! reaches the store until the operator explicitly confirms, and cancelling
//! (or dropping the token) appends nothing.

use std::sync::Arc;

use porter_core::ValidationError;
use porter_core::event::{
  AccessEvent, Direction, NewAccessEvent, Operator, PersonId, Role,
};
use porter_core::status::PersonStatus;
use porter_core::store::AccessStore;

use crate::error::RecordError;

// ─── Form ────────────────────────────────────────────────────────────────────

/// The manual-entry form a guard submits at the gate.
#[derive(Debug, Clone)]
pub struct EntryForm {
  pub name:      String,
  /// Student or teacher; guard input is rejected on validation.
  pub role:      Role,
  pub direction: Direction,
  pub id_number: String,
  pub notes:     Option<String>,
}

impl EntryForm {
  /// Trim the free-text fields and build the store input.
  ///
  /// Fails fast on blank name/id so no store call is made for bad input.
  /// Trimmed-empty notes become `None`.
  pub(crate) fn into_new_event(
    self,
    operator: Operator,
  ) -> Result<NewAccessEvent, ValidationError> {
    let input = NewAccessEvent {
      person: PersonId::for_role(self.role, self.id_number.trim()),
      name: self.name.trim().to_owned(),
      role: self.role,
      direction: self.direction,
      recorded_by: operator,
      notes: self
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|notes| !notes.is_empty())
        .map(str::to_owned),
    };
    input.validate()?;
    Ok(input)
  }
}

// ─── Warnings ────────────────────────────────────────────────────────────────

/// An advisory pause: the requested direction contradicts the person's
/// resolved status. The operator must confirm before anything is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordWarning {
  /// `in` requested while the person is already in.
  DuplicateIn,
  /// `out` requested while the person is out — or was never seen at all.
  NotCheckedIn { status: PersonStatus },
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// Result of a [`record_entry`](crate::AccessLedger::record_entry) call that
/// did not fail outright.
pub enum RecordOutcome<S> {
  /// The event was appended; the live feed delivers the update.
  Recorded(AccessEvent),
  /// The entry contradicts current status and is parked until the operator
  /// decides.
  NeedsConfirmation(PendingEntry<S>),
}

impl<S> std::fmt::Debug for RecordOutcome<S> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      RecordOutcome::Recorded(event) => {
        f.debug_tuple("Recorded").field(event).finish()
      }
      RecordOutcome::NeedsConfirmation(pending) => f
        .debug_tuple("NeedsConfirmation")
        .field(&pending.warning)
        .finish(),
    }
  }
}

/// A validated entry held back by a [`RecordWarning`].
///
/// Exactly one of [`confirm`](Self::confirm) or [`cancel`](Self::cancel)
/// should be called; dropping the token is equivalent to cancelling. At most
/// one pending entry per person is assumed per UI instance — two operators
/// confirming the same person concurrently both succeed at the store level.
pub struct PendingEntry<S> {
  store:   Arc<S>,
  input:   NewAccessEvent,
  warning: RecordWarning,
}

impl<S: AccessStore> PendingEntry<S> {
  pub(crate) fn new(
    store: Arc<S>,
    input: NewAccessEvent,
    warning: RecordWarning,
  ) -> Self {
    Self {
      store,
      input,
      warning,
    }
  }

  /// Why this entry was held back.
  pub fn warning(&self) -> RecordWarning {
    self.warning
  }

  /// The entry as it will be appended on confirmation.
  pub fn input(&self) -> &NewAccessEvent {
    &self.input
  }

  /// The operator confirmed — append despite the warning.
  pub async fn confirm(self) -> Result<AccessEvent, RecordError> {
    let event = self
      .store
      .append(self.input)
      .await
      .map_err(|e| RecordError::Store(Box::new(e)))?;
    tracing::info!(
      event_id = %event.event_id,
      person = event.person.key(),
      "manual entry confirmed and recorded"
    );
    Ok(event)
  }

  /// The operator backed out; nothing is appended.
  pub fn cancel(self) {
    tracing::debug!(
      person = self.input.person.key(),
      "pending manual entry cancelled"
    );
  }
}
