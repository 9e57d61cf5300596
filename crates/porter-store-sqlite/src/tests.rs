//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, TimeZone, Utc};
use porter_core::error::ValidationError;
use porter_core::event::{
  AccessEvent, Direction, NewAccessEvent, Operator, PersonId, Role,
};
use porter_core::store::AccessStore;
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn operator() -> Operator {
  Operator {
    id:   "G01".into(),
    name: "Gate Guard".into(),
  }
}

fn new_event(key: &str, role: Role, direction: Direction) -> NewAccessEvent {
  NewAccessEvent {
    person: PersonId::for_role(role, key),
    name: format!("Person {key}"),
    role,
    direction,
    recorded_by: operator(),
    notes: None,
  }
}

/// Insert an event with a controlled timestamp, bypassing the store clock.
/// Goes through the private insert path so no watcher is notified.
async fn insert_at(
  store: &SqliteStore,
  key: &str,
  role: Role,
  direction: Direction,
  at: DateTime<Utc>,
) -> AccessEvent {
  let event = AccessEvent {
    event_id: Uuid::new_v4(),
    person: PersonId::for_role(role, key),
    name: format!("Person {key}"),
    role,
    direction,
    occurred_at: at,
    recorded_by: operator(),
    notes: None,
  };
  store.insert_event(&event).await.expect("insert");
  event
}

fn day() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 11, 19, 0, 0, 0).unwrap()
}

// ─── Append ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn append_assigns_id_and_timestamp() {
  let s = store().await;

  let event = s
    .append(new_event("S001", Role::Student, Direction::In))
    .await
    .unwrap();

  assert!((Utc::now() - event.occurred_at).num_seconds().abs() < 5);
  assert_eq!(event.person, PersonId::EnrollmentNumber("S001".into()));
}

#[tokio::test]
async fn append_round_trips_every_field() {
  let s = store().await;

  let mut input = new_event("T042", Role::Teacher, Direction::Out);
  input.notes = Some("left early for a conference".into());
  let appended = s.append(input).await.unwrap();

  let history = s.events_for_person("T042").await.unwrap();
  assert_eq!(history.len(), 1);

  let stored = &history[0];
  assert_eq!(stored.event_id, appended.event_id);
  assert_eq!(stored.person, PersonId::EmployeeId("T042".into()));
  assert_eq!(stored.name, "Person T042");
  assert_eq!(stored.role, Role::Teacher);
  assert_eq!(stored.direction, Direction::Out);
  assert_eq!(stored.occurred_at, appended.occurred_at);
  assert_eq!(stored.recorded_by, operator());
  assert_eq!(stored.notes.as_deref(), Some("left early for a conference"));
}

#[tokio::test]
async fn append_rejects_blank_name() {
  let s = store().await;

  let mut input = new_event("S001", Role::Student, Direction::In);
  input.name = "  ".into();

  let err = s.append(input).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::EmptyName)
  ));

  // Nothing was written.
  assert!(s.events_for_person("S001").await.unwrap().is_empty());
}

#[tokio::test]
async fn append_rejects_guard_role() {
  let s = store().await;

  let err = s
    .append(new_event("G001", Role::Guard, Direction::In))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::GuardEntry)
  ));
}

// ─── Window queries ──────────────────────────────────────────────────────────

#[tokio::test]
async fn window_query_returns_newest_first() {
  let s = store().await;

  let nine = insert_at(
    &s,
    "S1",
    Role::Student,
    Direction::In,
    day() + Duration::hours(9),
  )
  .await;
  let ten = insert_at(
    &s,
    "S2",
    Role::Student,
    Direction::In,
    day() + Duration::hours(10),
  )
  .await;
  let eight = insert_at(
    &s,
    "T1",
    Role::Teacher,
    Direction::In,
    day() + Duration::hours(8),
  )
  .await;

  let events = s
    .events_in_window(day(), day() + Duration::days(1))
    .await
    .unwrap();

  let ids: Vec<Uuid> = events.iter().map(|e| e.event_id).collect();
  assert_eq!(ids, vec![ten.event_id, nine.event_id, eight.event_id]);
}

#[tokio::test]
async fn window_is_half_open() {
  let s = store().await;
  let end = day() + Duration::days(1);

  let at_start =
    insert_at(&s, "S1", Role::Student, Direction::In, day()).await;
  insert_at(&s, "S2", Role::Student, Direction::In, end).await;

  let events = s.events_in_window(day(), end).await.unwrap();
  assert_eq!(events.len(), 1);
  assert_eq!(events[0].event_id, at_start.event_id);
}

#[tokio::test]
async fn empty_window_yields_empty_not_error() {
  let s = store().await;
  insert_at(&s, "S1", Role::Student, Direction::In, day()).await;

  let events = s
    .events_in_window(day() + Duration::days(7), day() + Duration::days(8))
    .await
    .unwrap();
  assert!(events.is_empty());
}

// ─── Person queries ──────────────────────────────────────────────────────────

#[tokio::test]
async fn person_query_matches_flat_key_across_namespaces() {
  let s = store().await;

  insert_at(&s, "4242", Role::Student, Direction::In, day() + Duration::hours(9))
    .await;
  insert_at(&s, "4242", Role::Teacher, Direction::Out, day() + Duration::hours(10))
    .await;
  insert_at(&s, "9999", Role::Student, Direction::In, day() + Duration::hours(11))
    .await;

  // One flat key, two identifier namespaces: both rows come back.
  let events = s.events_for_person("4242").await.unwrap();
  assert_eq!(events.len(), 2);
  assert!(events.iter().all(|e| e.person.key() == "4242"));
}

#[tokio::test]
async fn person_query_unknown_key_is_empty() {
  let s = store().await;
  assert!(s.events_for_person("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn equal_timestamps_break_ties_by_insertion_order() {
  let s = store().await;
  let at = day() + Duration::hours(9);

  let first = insert_at(&s, "S1", Role::Student, Direction::In, at).await;
  let second = insert_at(&s, "S1", Role::Student, Direction::Out, at).await;

  // Later insert ranks newer; repeat reads stay stable.
  for _ in 0..3 {
    let events = s.events_for_person("S1").await.unwrap();
    assert_eq!(events[0].event_id, second.event_id);
    assert_eq!(events[1].event_id, first.event_id);
  }
}

// ─── Subscriptions ───────────────────────────────────────────────────────────

#[tokio::test]
async fn subscription_starts_with_current_snapshot() {
  let s = store().await;
  let now = Utc::now();

  let appended = s
    .append(new_event("S1", Role::Student, Direction::In))
    .await
    .unwrap();

  let sub = s
    .subscribe_window(now - Duration::hours(1), now + Duration::hours(1))
    .await
    .unwrap();

  let snapshot = sub.snapshot();
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0].event_id, appended.event_id);
}

#[tokio::test]
async fn subscription_delivers_in_window_appends() {
  let s = store().await;
  let now = Utc::now();

  let mut sub = s
    .subscribe_window(now - Duration::hours(1), now + Duration::hours(1))
    .await
    .unwrap();
  assert!(sub.snapshot().is_empty());

  let appended = s
    .append(new_event("S1", Role::Student, Direction::In))
    .await
    .unwrap();

  // The append already pushed before returning, so this resolves at once.
  let snapshot = sub.changed().await.expect("store still alive");
  assert_eq!(snapshot.len(), 1);
  assert_eq!(snapshot[0].event_id, appended.event_id);
}

#[tokio::test]
async fn subscription_ignores_out_of_window_appends() {
  let s = store().await;
  let now = Utc::now();

  // A window fully in the past can never contain a fresh append.
  let sub = s
    .subscribe_window(now - Duration::hours(2), now - Duration::hours(1))
    .await
    .unwrap();

  s.append(new_event("S1", Role::Student, Direction::In))
    .await
    .unwrap();

  // append() completed its fan-out before returning; nothing arrived here.
  assert!(sub.snapshot().is_empty());
}

#[tokio::test]
async fn rapid_appends_collapse_to_latest_snapshot() {
  let s = store().await;
  let now = Utc::now();

  let mut sub = s
    .subscribe_window(now - Duration::hours(1), now + Duration::hours(1))
    .await
    .unwrap();

  s.append(new_event("S1", Role::Student, Direction::In))
    .await
    .unwrap();
  s.append(new_event("S2", Role::Student, Direction::In))
    .await
    .unwrap();

  // One wake-up is enough: the feed holds the full latest window.
  let snapshot = sub.changed().await.expect("store still alive");
  assert_eq!(snapshot.len(), 2);
}

#[tokio::test]
async fn dropped_feed_does_not_disturb_others() {
  let s = store().await;
  let now = Utc::now();

  let dead = s
    .subscribe_window(now - Duration::hours(1), now + Duration::hours(1))
    .await
    .unwrap();
  let mut live = s
    .subscribe_window(now - Duration::hours(1), now + Duration::hours(1))
    .await
    .unwrap();

  dead.unsubscribe();

  s.append(new_event("S1", Role::Student, Direction::In))
    .await
    .unwrap();

  let snapshot = live.changed().await.expect("store still alive");
  assert_eq!(snapshot.len(), 1);
}
