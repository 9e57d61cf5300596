//! The live "today" projection: a window feed with stats recomputed on
//! every delivered snapshot.

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use porter_core::event::AccessEvent;
use porter_core::stats::DailyStats;
use porter_core::store::WindowSubscription;

/// One consistent view of today: the window's events (newest first) and the
/// counts derived from exactly those events.
#[derive(Debug, Clone)]
pub struct TodayView {
  pub events: Vec<AccessEvent>,
  pub stats:  DailyStats,
}

impl TodayView {
  fn from_events(events: Vec<AccessEvent>) -> Self {
    let stats = DailyStats::from_events(&events);
    Self { events, stats }
  }
}

/// A live feed of [`TodayView`]s.
///
/// Each store snapshot fully replaces the previous view; rapid appends may
/// collapse into one update (last delivered wins). The feed serves the day
/// window it was opened with — it does not roll over at midnight.
#[derive(Debug)]
pub struct TodayFeed {
  sub:               WindowSubscription,
  delivered_initial: bool,
}

impl TodayFeed {
  pub(crate) fn new(sub: WindowSubscription) -> Self {
    Self {
      sub,
      delivered_initial: false,
    }
  }

  /// The next projection update.
  ///
  /// The first call yields the snapshot that was current when the feed was
  /// opened; later calls wait for changes. Every delivery is a complete
  /// view (an identical view may occasionally be delivered twice in a row
  /// when an append races the first call). Returns `None` once the backing
  /// store has gone away.
  pub async fn next(&mut self) -> Option<TodayView> {
    if !self.delivered_initial {
      self.delivered_initial = true;
      return Some(TodayView::from_events(self.sub.snapshot()));
    }
    Some(TodayView::from_events(self.sub.changed().await?))
  }

  /// The latest projection, without waiting.
  pub fn latest(&self) -> TodayView {
    TodayView::from_events(self.sub.snapshot())
  }

  /// End the feed. No update is delivered after this returns.
  pub fn unsubscribe(self) {
    self.sub.unsubscribe();
  }
}

// ─── Day windows ─────────────────────────────────────────────────────────────

/// Bounds of the current local day, `[midnight, next midnight)`, in UTC.
pub(crate) fn today_window() -> (DateTime<Utc>, DateTime<Utc>) {
  window_for(Local::now().date_naive())
}

pub(crate) fn window_for(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
  // succ_opt only fails at NaiveDate::MAX; an empty window there is fine.
  let next = day.succ_opt().unwrap_or(day);
  (day_start(day), day_start(next))
}

/// Local midnight for `day`, expressed in UTC.
///
/// If midnight does not exist locally (a DST gap), the first valid instant
/// of the day is used instead.
fn day_start(day: NaiveDate) -> DateTime<Utc> {
  let midnight = day.and_time(NaiveTime::MIN);
  for hours in 0..=3 {
    let candidate = midnight + Duration::hours(hours);
    if let Some(local) = Local.from_local_datetime(&candidate).earliest() {
      return local.with_timezone(&Utc);
    }
  }
  // No observed timezone shifts the start of day by more than a few hours.
  Utc.from_utc_datetime(&midnight)
}
