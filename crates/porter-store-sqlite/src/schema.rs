//! SQL schema for the Porter SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `rowid` doubles as the insertion-order tie-break for events sharing an
/// `occurred_at` value, so the table must keep its implicit rowid.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Access events are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS access_events (
    event_id    TEXT PRIMARY KEY,
    person_key  TEXT NOT NULL,   -- flat grouping key (see id_kind)
    id_kind     TEXT NOT NULL,   -- 'enrollment_number' | 'employee_id'
    name        TEXT NOT NULL,
    role        TEXT NOT NULL,   -- 'student' | 'teacher' | 'guard'
    direction   TEXT NOT NULL,   -- 'in' | 'out'
    occurred_at TEXT NOT NULL,   -- fixed-width RFC 3339 UTC; store-assigned
    recorded_by TEXT NOT NULL,   -- JSON-encoded operator (id, name)
    notes       TEXT
);

CREATE INDEX IF NOT EXISTS access_events_person_idx   ON access_events(person_key);
CREATE INDEX IF NOT EXISTS access_events_occurred_idx ON access_events(occurred_at);

PRAGMA user_version = 1;
";
