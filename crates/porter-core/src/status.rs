//! Derived in/out status for a single person.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::event::{AccessEvent, Direction};

/// Whether a person is currently inside campus — computed from their most
/// recent event, never stored.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PersonStatus {
  In,
  Out,
  Unknown,
}

impl PersonStatus {
  /// Status implied by the most recent event for a person.
  ///
  /// `latest` must be the event with the greatest `occurred_at` for the key
  /// (ties broken by store insertion order); `None` means no history exists
  /// and the status is [`Unknown`](Self::Unknown). History is global — a
  /// check-in from last week still means "in" today.
  pub fn from_latest(latest: Option<&AccessEvent>) -> Self {
    match latest.map(|event| event.direction) {
      Some(Direction::In) => Self::In,
      Some(Direction::Out) => Self::Out,
      None => Self::Unknown,
    }
  }
}
