//! Daily aggregate counts over one day's worth of access events.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use serde::{Deserialize, Serialize};

use crate::event::{AccessEvent, Direction, Role};

/// Aggregated counts for a day window — computed, never persisted, so the
/// numbers can never drift from the event log.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct DailyStats {
  /// Every event in the window, including guard events.
  pub total_entries: usize,
  pub students_in:   usize,
  pub students_out:  usize,
  pub teachers_in:   usize,
  pub teachers_out:  usize,
}

impl DailyStats {
  /// Fold a day's events into per-role counts.
  ///
  /// Each person (grouped by [`PersonId::key`](crate::event::PersonId::key))
  /// lands in at most one bucket: that of their latest event in `events`.
  /// The timestamp comparison is strict, so two events with the same
  /// `occurred_at` keep whichever appeared first in the input sequence.
  /// Guard events count toward `total_entries` only.
  ///
  /// O(n) over the input; order-sensitive only at timestamp ties.
  pub fn from_events(events: &[AccessEvent]) -> Self {
    let mut latest: HashMap<&str, &AccessEvent> = HashMap::new();
    for event in events {
      match latest.entry(event.person.key()) {
        Entry::Vacant(slot) => {
          slot.insert(event);
        }
        Entry::Occupied(mut slot)
          if event.occurred_at > slot.get().occurred_at =>
        {
          slot.insert(event);
        }
        Entry::Occupied(_) => {}
      }
    }

    let mut stats = DailyStats {
      total_entries: events.len(),
      ..DailyStats::default()
    };
    for event in latest.values() {
      match (event.role, event.direction) {
        (Role::Student, Direction::In) => stats.students_in += 1,
        (Role::Student, Direction::Out) => stats.students_out += 1,
        (Role::Teacher, Direction::In) => stats.teachers_in += 1,
        (Role::Teacher, Direction::Out) => stats.teachers_out += 1,
        // Guards pass the gate off this path; tolerate their events anyway.
        (Role::Guard, _) => {}
      }
    }
    stats
  }
}
