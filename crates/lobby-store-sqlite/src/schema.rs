//! SQL schema for the Lobby SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS departments (
    department_id  TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    location       TEXT,
    contact_person TEXT,
    contact_phone  TEXT,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS employees (
    employee_id   TEXT PRIMARY KEY,
    code          TEXT NOT NULL UNIQUE,  -- external employee code
    name          TEXT NOT NULL,
    email         TEXT,
    phone         TEXT,
    position      TEXT,
    department_id TEXT NOT NULL REFERENCES departments(department_id),
    active        INTEGER NOT NULL DEFAULT 1,
    created_at    TEXT NOT NULL
);

-- Visitors are created once at registration and never updated.
-- There is deliberately no status column here: Visit.status is the single
-- source of truth, and visitor-level views are computed by joins.
CREATE TABLE IF NOT EXISTS visitors (
    visitor_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    phone           TEXT NOT NULL,
    email           TEXT,
    address         TEXT,
    id_proof_type   TEXT NOT NULL,
    id_proof_number TEXT NOT NULL,
    created_at      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS staff (
    staff_id      TEXT PRIMARY KEY,
    role          TEXT NOT NULL,    -- 'admin' | 'receptionist'
    username      TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    full_name     TEXT NOT NULL,
    created_at    TEXT NOT NULL
);

-- Visits are append-only history: rows are inserted at registration and
-- have their status/timestamps advanced by lifecycle transitions, but are
-- never deleted.
CREATE TABLE IF NOT EXISTS visits (
    visit_id        TEXT PRIMARY KEY,
    visitor_id      TEXT NOT NULL REFERENCES visitors(visitor_id),
    employee_id     TEXT NOT NULL REFERENCES employees(employee_id),
    token           TEXT NOT NULL UNIQUE,
    purpose         TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'pending',
    checkin_time    TEXT,
    checkout_time   TEXT,
    receptionist_id TEXT REFERENCES staff(staff_id),
    created_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS employees_department_idx ON employees(department_id);
CREATE INDEX IF NOT EXISTS visits_visitor_idx  ON visits(visitor_id);
CREATE INDEX IF NOT EXISTS visits_employee_idx ON visits(employee_id);
CREATE INDEX IF NOT EXISTS visits_status_idx   ON visits(status);
CREATE INDEX IF NOT EXISTS visits_created_idx  ON visits(created_at);

PRAGMA user_version = 1;
";
