//! [`SqliteStore`] — the SQLite implementation of [`AccessStore`].

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use porter_core::event::{AccessEvent, NewAccessEvent};
use porter_core::store::{AccessStore, WindowSubscription};
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{
    RawAccessEvent, encode_direction, encode_dt, encode_operator,
    encode_person_id, encode_role, encode_uuid, store_now,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Porter access-event store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted and clones
/// share the watcher registry, so a feed opened through one handle sees
/// appends made through another.
#[derive(Clone)]
pub struct SqliteStore {
  conn:     tokio_rusqlite::Connection,
  watchers: Arc<Mutex<Vec<WindowWatcher>>>,
}

/// One live window feed: its bounds and the sending half of its channel.
struct WindowWatcher {
  start: DateTime<Utc>,
  end:   DateTime<Utc>,
  tx:    watch::Sender<Vec<AccessEvent>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self {
      conn,
      watchers: Arc::new(Mutex::new(Vec::new())),
    };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self {
      conn,
      watchers: Arc::new(Mutex::new(Vec::new())),
    };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`AccessEvent`] into the `access_events` table.
  pub(crate) async fn insert_event(&self, event: &AccessEvent) -> Result<()> {
    let event_id_str = encode_uuid(event.event_id);
    let (person_key, id_kind) = encode_person_id(&event.person);
    let name = event.name.clone();
    let role_str = encode_role(event.role);
    let direction_str = encode_direction(event.direction);
    let occurred_at_str = encode_dt(event.occurred_at);
    let recorded_by_str = encode_operator(&event.recorded_by)?;
    let notes = event.notes.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO access_events (
             event_id, person_key, id_kind, name, role, direction,
             occurred_at, recorded_by, notes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            event_id_str,
            person_key,
            id_kind,
            name,
            role_str,
            direction_str,
            occurred_at_str,
            recorded_by_str,
            notes,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Read one window, newest first (`rowid` breaks timestamp ties).
  async fn window_events(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<AccessEvent>> {
    let start_str = encode_dt(start);
    let end_str = encode_dt(end);

    let raws: Vec<RawAccessEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, person_key, id_kind, name, role, direction,
                  occurred_at, recorded_by, notes
           FROM access_events
           WHERE occurred_at >= ?1 AND occurred_at < ?2
           ORDER BY occurred_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![start_str, end_str], raw_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccessEvent::into_event).collect()
  }

  /// Push fresh snapshots to every watcher whose window contains
  /// `occurred_at`; forget watchers whose consumers have gone away.
  ///
  /// A re-read failure delivers an empty snapshot — the feed keeps going so
  /// presentation never loses its subscription over a transient fault.
  async fn notify_watchers(&self, occurred_at: DateTime<Utc>) {
    let mut watchers = self.watchers.lock().await;
    watchers.retain(|w| !w.tx.is_closed());

    for watcher in watchers.iter() {
      if watcher.start <= occurred_at && occurred_at < watcher.end {
        let snapshot = match self.window_events(watcher.start, watcher.end).await
        {
          Ok(events) => events,
          Err(e) => {
            tracing::warn!(
              error = %e,
              "window re-read failed; delivering empty snapshot"
            );
            Vec::new()
          }
        };
        let _ = watcher.tx.send(snapshot);
      }
    }
  }
}

fn raw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccessEvent> {
  Ok(RawAccessEvent {
    event_id:    row.get(0)?,
    person_key:  row.get(1)?,
    id_kind:     row.get(2)?,
    name:        row.get(3)?,
    role:        row.get(4)?,
    direction:   row.get(5)?,
    occurred_at: row.get(6)?,
    recorded_by: row.get(7)?,
    notes:       row.get(8)?,
  })
}

// ─── AccessStore impl ────────────────────────────────────────────────────────

impl AccessStore for SqliteStore {
  type Error = Error;

  async fn append(&self, input: NewAccessEvent) -> Result<AccessEvent> {
    input.validate()?;

    let event = AccessEvent {
      event_id:    Uuid::new_v4(),
      person:      input.person,
      name:        input.name,
      role:        input.role,
      direction:   input.direction,
      occurred_at: store_now(),
      recorded_by: input.recorded_by,
      notes:       input.notes,
    };

    // A single INSERT: the event is either durable or absent, never partial.
    self.insert_event(&event).await?;

    tracing::debug!(
      event_id = %event.event_id,
      person = event.person.key(),
      direction = %event.direction,
      "appended access event"
    );

    self.notify_watchers(event.occurred_at).await;
    Ok(event)
  }

  async fn events_in_window(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<Vec<AccessEvent>> {
    self.window_events(start, end).await
  }

  async fn events_for_person(
    &self,
    person_key: &str,
  ) -> Result<Vec<AccessEvent>> {
    let key = person_key.to_owned();

    let raws: Vec<RawAccessEvent> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, person_key, id_kind, name, role, direction,
                  occurred_at, recorded_by, notes
           FROM access_events
           WHERE person_key = ?1
           ORDER BY occurred_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![key], raw_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccessEvent::into_event).collect()
  }

  async fn subscribe_window(
    &self,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
  ) -> Result<WindowSubscription> {
    let initial = self.window_events(start, end).await?;
    let (tx, rx) = watch::channel(initial);

    self
      .watchers
      .lock()
      .await
      .push(WindowWatcher { start, end, tx });

    Ok(WindowSubscription::new(rx))
  }
}
