//! Query/command facade over the Porter access ledger.
//!
//! [`AccessLedger`] bridges any [`AccessStore`] backend to a presentation
//! layer: per-person status lookups, one-shot daily stats, a live "today"
//! feed, and the validated manual-entry pipeline. It holds no state of its
//! own beyond configuration — every answer is derived from the store at the
//! moment it is asked for.

pub mod config;
pub mod error;
pub mod live;
pub mod record;

use std::sync::Arc;

use porter_core::event::{AccessEvent, Direction, Operator};
use porter_core::stats::DailyStats;
use porter_core::status::PersonStatus;
use porter_core::store::AccessStore;

pub use config::{LedgerConfig, ReadErrorPolicy};
pub use error::{LedgerError, RecordError};
pub use live::{TodayFeed, TodayView};
pub use record::{EntryForm, PendingEntry, RecordOutcome, RecordWarning};


/// The UI-facing surface of the access ledger.
///
/// Cloning is cheap; clones share the backing store, so a dashboard feed and
/// a manual-entry form can hold separate handles.
pub struct AccessLedger<S> {
  store:  Arc<S>,
  config: LedgerConfig,
}

impl<S> Clone for AccessLedger<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      config: self.config.clone(),
    }
  }
}

impl<S: AccessStore> AccessLedger<S> {
  /// Build a ledger with the default configuration (degrading reads).
  pub fn new(store: Arc<S>) -> Self {
    Self::with_config(store, LedgerConfig::default())
  }

  pub fn with_config(store: Arc<S>, config: LedgerConfig) -> Self {
    Self { store, config }
  }

  pub fn config(&self) -> &LedgerConfig {
    &self.config
  }

  /// Resolve a person's current status from their most recent event.
  ///
  /// History is global, not scoped to today: a check-in from last week still
  /// resolves to `In`. Returns [`PersonStatus::Unknown`] when no event
  /// exists for the key — and, under [`ReadErrorPolicy::Degrade`], when the
  /// read itself fails.
  pub async fn person_status(
    &self,
    person_key: &str,
  ) -> Result<PersonStatus, LedgerError> {
    match self.store.events_for_person(person_key).await {
      Ok(events) => Ok(PersonStatus::from_latest(events.first())),
      Err(e) => self.read_fallback(e, PersonStatus::Unknown),
    }
  }

  /// One-shot stats for the current local day.
  ///
  /// Idempotent between appends: two calls with no intervening write return
  /// identical counts.
  pub async fn today_stats(&self) -> Result<DailyStats, LedgerError> {
    let (start, end) = live::today_window();
    match self.store.events_in_window(start, end).await {
      Ok(events) => Ok(DailyStats::from_events(&events)),
      Err(e) => self.read_fallback(e, DailyStats::default()),
    }
  }

  /// The most recent `limit` events for one person, newest first.
  pub async fn history(
    &self,
    person_key: &str,
    limit: usize,
  ) -> Result<Vec<AccessEvent>, LedgerError> {
    match self.store.events_for_person(person_key).await {
      Ok(mut events) => {
        events.truncate(limit);
        Ok(events)
      }
      Err(e) => self.read_fallback(e, Vec::new()),
    }
  }

  /// Open the live `(events, stats)` projection for today.
  ///
  /// The day window is computed once, here. A feed held across midnight
  /// keeps serving the window it was opened with until resubscribed.
  pub async fn subscribe_today(&self) -> Result<TodayFeed, LedgerError> {
    let (start, end) = live::today_window();
    let sub = self
      .store
      .subscribe_window(start, end)
      .await
      .map_err(|e| LedgerError::Store(Box::new(e)))?;
    Ok(TodayFeed::new(sub))
  }

  /// Validate and record one manual gate entry.
  ///
  /// The form is trimmed and checked before any store call. If the person's
  /// resolved status contradicts the requested direction, nothing is
  /// appended: the caller gets [`RecordOutcome::NeedsConfirmation`] and must
  /// [`confirm`](PendingEntry::confirm) or [`cancel`](PendingEntry::cancel)
  /// the pending entry. On a successful append no refresh is needed — the
  /// live feed delivers the update.
  pub async fn record_entry(
    &self,
    form: EntryForm,
    operator: Operator,
  ) -> Result<RecordOutcome<S>, RecordError> {
    let input = form.into_new_event(operator)?;
    let status = self.person_status(input.person.key()).await?;

    let warning = match (input.direction, status) {
      (Direction::In, PersonStatus::In) => Some(RecordWarning::DuplicateIn),
      (Direction::Out, PersonStatus::Out | PersonStatus::Unknown) => {
        Some(RecordWarning::NotCheckedIn { status })
      }
      _ => None,
    };

    if let Some(warning) = warning {
      tracing::info!(
        person = input.person.key(),
        ?warning,
        "manual entry held for operator confirmation"
      );
      return Ok(RecordOutcome::NeedsConfirmation(PendingEntry::new(
        Arc::clone(&self.store),
        input,
        warning,
      )));
    }

    let event = self
      .store
      .append(input)
      .await
      .map_err(|e| RecordError::Store(Box::new(e)))?;
    tracing::info!(
      event_id = %event.event_id,
      person = event.person.key(),
      direction = %event.direction,
      "manual entry recorded"
    );
    Ok(RecordOutcome::Recorded(event))
  }

  /// Apply the configured policy to a failed read.
  fn read_fallback<T>(
    &self,
    err: S::Error,
    fallback: T,
  ) -> Result<T, LedgerError> {
    match self.config.on_read_error {
      ReadErrorPolicy::Degrade => {
        tracing::warn!(error = %err, "read failed; degrading to fallback value");
        Ok(fallback)
      }
      ReadErrorPolicy::Propagate => Err(LedgerError::Store(Box::new(err))),
    }
  }
}
