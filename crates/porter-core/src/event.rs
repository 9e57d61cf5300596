//! Access event types — the fundamental unit of the Porter ledger.
//!
//! An access event is an immutable record of one person crossing the campus
//! gate at a point in time. Events are never updated or deleted; every
//! derived model (current status, daily counts) is recomputed from the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

use crate::error::ValidationError;

// ─── Role ────────────────────────────────────────────────────────────────────

/// The role a person holds on campus.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
  Student,
  Teacher,
  Guard,
}

// ─── Direction ───────────────────────────────────────────────────────────────

/// Which way a person crossed the gate.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
  In,
  Out,
}

// ─── PersonId ────────────────────────────────────────────────────────────────

/// The role-scoped identifier a person presents at the gate.
///
/// Students carry an enrollment number; teachers and guards carry an
/// employee id. The two namespaces are distinct variants so every record
/// says which kind of identifier it holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PersonId {
  EnrollmentNumber(String),
  EmployeeId(String),
}

impl PersonId {
  /// Build the identifier for `role` from the raw number typed at the gate.
  pub fn for_role(role: Role, id_number: impl Into<String>) -> Self {
    match role {
      Role::Student => Self::EnrollmentNumber(id_number.into()),
      Role::Teacher | Role::Guard => Self::EmployeeId(id_number.into()),
    }
  }

  /// The flat per-person grouping key.
  ///
  /// Grouping ignores the identifier kind: an enrollment number that happens
  /// to equal an employee id groups as one person. Callers that need the
  /// namespace must look at the variant, not the key.
  pub fn key(&self) -> &str {
    match self {
      Self::EnrollmentNumber(k) | Self::EmployeeId(k) => k,
    }
  }
}

// ─── Operator ────────────────────────────────────────────────────────────────

/// The guard who logged an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
  pub id:   String,
  pub name: String,
}

// ─── AccessEvent ─────────────────────────────────────────────────────────────

/// An immutable check-in/check-out record. Once written, no field is ever
/// updated; corrections are new events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessEvent {
  pub event_id:    Uuid,
  pub person:      PersonId,
  /// Display name at the time of recording; later name changes do not
  /// propagate into old events.
  pub name:        String,
  pub role:        Role,
  pub direction:   Direction,
  /// Store-assigned wall-clock timestamp; never changes after creation.
  pub occurred_at: DateTime<Utc>,
  pub recorded_by: Operator,
  pub notes:       Option<String>,
}

// ─── NewAccessEvent ──────────────────────────────────────────────────────────

/// Input to [`crate::store::AccessStore::append`].
/// `event_id` and `occurred_at` are always set by the store; they are not
/// accepted from callers.
#[derive(Debug, Clone)]
pub struct NewAccessEvent {
  pub person:      PersonId,
  pub name:        String,
  pub role:        Role,
  pub direction:   Direction,
  pub recorded_by: Operator,
  pub notes:       Option<String>,
}

impl NewAccessEvent {
  /// Check the constraints every appended event must satisfy.
  ///
  /// Guards operate the gate; they do not pass through it on this path, so
  /// guard-role input is rejected here rather than silently stored.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.name.trim().is_empty() {
      return Err(ValidationError::EmptyName);
    }
    if self.person.key().trim().is_empty() {
      return Err(ValidationError::EmptyIdNumber);
    }
    if self.role == Role::Guard {
      return Err(ValidationError::GuardEntry);
    }
    Ok(())
  }
}
