//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexicographic order matches chronological
//! order — the store both range-filters and sorts on the raw column. UUIDs
//! are stored as hyphenated lowercase strings; enums as their lowercase
//! string forms.

use chrono::{DateTime, SecondsFormat, Timelike, Utc};
use porter_core::event::{
  AccessEvent, Direction, Operator, PersonId, Role,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String {
  id.hyphenated().to_string()
}

pub fn decode_uuid(s: &str) -> Result<Uuid> {
  Ok(Uuid::parse_str(s)?)
}

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// The store clock: wall time truncated to the column resolution, so the
/// event handed back from `append` compares equal to the row later read.
pub fn store_now() -> DateTime<Utc> {
  let now = Utc::now();
  now
    .with_nanosecond(now.nanosecond() / 1_000 * 1_000)
    .unwrap_or(now)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── Role ────────────────────────────────────────────────────────────────────

pub fn encode_role(role: Role) -> String {
  role.to_string()
}

pub fn decode_role(s: &str) -> Result<Role> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown role: {s:?}")))
}

// ─── Direction ───────────────────────────────────────────────────────────────

pub fn encode_direction(direction: Direction) -> String {
  direction.to_string()
}

pub fn decode_direction(s: &str) -> Result<Direction> {
  s.parse()
    .map_err(|_| Error::Decode(format!("unknown direction: {s:?}")))
}

// ─── PersonId ────────────────────────────────────────────────────────────────

/// Split into `(person_key, id_kind)` column values.
pub fn encode_person_id(person: &PersonId) -> (String, &'static str) {
  match person {
    PersonId::EnrollmentNumber(k) => (k.clone(), "enrollment_number"),
    PersonId::EmployeeId(k) => (k.clone(), "employee_id"),
  }
}

pub fn decode_person_id(key: String, kind: &str) -> Result<PersonId> {
  match kind {
    "enrollment_number" => Ok(PersonId::EnrollmentNumber(key)),
    "employee_id" => Ok(PersonId::EmployeeId(key)),
    other => Err(Error::Decode(format!("unknown id kind: {other:?}"))),
  }
}

// ─── Operator ────────────────────────────────────────────────────────────────

pub fn encode_operator(operator: &Operator) -> Result<String> {
  Ok(serde_json::to_string(operator)?)
}

pub fn decode_operator(s: &str) -> Result<Operator> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Raw strings read directly from an `access_events` row.
pub struct RawAccessEvent {
  pub event_id:    String,
  pub person_key:  String,
  pub id_kind:     String,
  pub name:        String,
  pub role:        String,
  pub direction:   String,
  pub occurred_at: String,
  pub recorded_by: String,
  pub notes:       Option<String>,
}

impl RawAccessEvent {
  pub fn into_event(self) -> Result<AccessEvent> {
    Ok(AccessEvent {
      event_id:    decode_uuid(&self.event_id)?,
      person:      decode_person_id(self.person_key, &self.id_kind)?,
      name:        self.name,
      role:        decode_role(&self.role)?,
      direction:   decode_direction(&self.direction)?,
      occurred_at: decode_dt(&self.occurred_at)?,
      recorded_by: decode_operator(&self.recorded_by)?,
      notes:       self.notes,
    })
  }
}
