//! The `AccessStore` trait and the live window subscription type.
//!
//! The trait is implemented by storage backends (e.g. `porter-store-sqlite`).
//! Higher layers (`porter-ledger`) depend on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::event::{AccessEvent, NewAccessEvent};

// ─── Subscription ────────────────────────────────────────────────────────────

/// A live feed of one time window's events.
///
/// The producer pushes the *full* current window on every change — snapshots,
/// never deltas. Two rapid appends may collapse into one delivery; a consumer
/// observes the latest snapshot, not necessarily every intermediate one.
///
/// Dropping the feed (or calling [`unsubscribe`](Self::unsubscribe)) ends
/// delivery immediately. The feed is pull-based, so nothing can arrive after
/// cancellation; the producer notices the closed channel and forgets the
/// watcher on its next append.
#[derive(Debug)]
pub struct WindowSubscription {
  rx: watch::Receiver<Vec<AccessEvent>>,
}

impl WindowSubscription {
  /// Wrap a watch receiver whose current value is the initial snapshot.
  pub fn new(rx: watch::Receiver<Vec<AccessEvent>>) -> Self {
    Self { rx }
  }

  /// The most recently delivered snapshot.
  pub fn snapshot(&self) -> Vec<AccessEvent> {
    self.rx.borrow().clone()
  }

  /// Wait for the next snapshot.
  ///
  /// Returns `None` once the producing store has gone away.
  pub async fn changed(&mut self) -> Option<Vec<AccessEvent>> {
    self.rx.changed().await.ok()?;
    Some(self.rx.borrow_and_update().clone())
  }

  /// Cancel the feed. Equivalent to dropping it; calling this on an
  /// already-cancelled feed is impossible by construction (it consumes
  /// `self`), and the producer treats a closed channel as a no-op.
  pub fn unsubscribe(self) {}
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the persistent collection of access events.
///
/// The write path is strictly append-only: events are created once and never
/// updated or deleted. All reads order by `occurred_at` descending, ties
/// broken by insertion order (later insert first). Write ordering and
/// timestamp assignment belong to the store — callers take no locks of
/// their own.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait AccessStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Validate and persist a new event, assigning `event_id` and
  /// `occurred_at` (wall clock at call time).
  ///
  /// Either the event is durable after success or absent after failure; no
  /// partial write is ever observable. Failures are never retried here.
  fn append(
    &self,
    input: NewAccessEvent,
  ) -> impl Future<Output = Result<AccessEvent, Self::Error>> + Send + '_;

  /// All events with `start <= occurred_at < end`, newest first.
  ///
  /// An empty window yields an empty vec, not an error.
  fn events_in_window(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<AccessEvent>, Self::Error>> + Send + '_;

  /// Full history for one person key, newest first.
  ///
  /// Matches on the flat key regardless of identifier kind or role.
  fn events_for_person<'a>(
    &'a self,
    person_key: &'a str,
  ) -> impl Future<Output = Result<Vec<AccessEvent>, Self::Error>> + Send + 'a;

  /// Open a live feed over `[start, end)`.
  ///
  /// The feed's initial snapshot is the current window content; a fresh
  /// snapshot is pushed after every append that lands inside the window.
  /// A backend failure while re-reading the window delivers an empty
  /// snapshot instead of ending the feed.
  fn subscribe_window(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> impl Future<Output = Result<WindowSubscription, Self::Error>> + Send + '_;
}
