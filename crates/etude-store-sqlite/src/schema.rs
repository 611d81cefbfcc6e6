//! SQL schema for the Etude SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS profiles (
    profile_id      TEXT PRIMARY KEY,
    name            TEXT NOT NULL UNIQUE,
    points          INTEGER NOT NULL DEFAULT 0 CHECK (points >= 0),
    level           INTEGER NOT NULL DEFAULT 1,
    streak          INTEGER NOT NULL DEFAULT 0 CHECK (streak >= 0),
    longest_session INTEGER NOT NULL DEFAULT 0 CHECK (longest_session >= 0),
    created_at      TEXT NOT NULL    -- ISO 8601 UTC
);

-- Key/value settings; holds the active profile selection.
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- time_completed stays NULL until the run ends and is written exactly once.
CREATE TABLE IF NOT EXISTS sessions (
    session_id       TEXT PRIMARY KEY,
    profile_id       TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    category         TEXT NOT NULL,
    date             TEXT NOT NULL,   -- DayStamp, e.g. 'Monday, Oct 19, 2026'
    time_started     TEXT NOT NULL,   -- HH:MM:SS
    time_completed   INTEGER,         -- elapsed seconds
    duration_minutes INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS ratings (
    rating_id   TEXT PRIMARY KEY,
    profile_id  TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    session_id  TEXT NOT NULL REFERENCES sessions(session_id) ON DELETE CASCADE,
    category    TEXT NOT NULL,
    date        TEXT NOT NULL,
    difficulty  INTEGER NOT NULL CHECK (difficulty BETWEEN 1 AND 3),
    UNIQUE (session_id)
);

CREATE TABLE IF NOT EXISTS targets (
    target_id      TEXT PRIMARY KEY,
    profile_id     TEXT NOT NULL REFERENCES profiles(profile_id) ON DELETE CASCADE,
    task           TEXT NOT NULL,
    is_completed   INTEGER NOT NULL DEFAULT 0,
    date_completed TEXT,
    UNIQUE (profile_id, task)
);

CREATE INDEX IF NOT EXISTS sessions_profile_idx ON sessions(profile_id);
CREATE INDEX IF NOT EXISTS ratings_profile_idx  ON ratings(profile_id);
CREATE INDEX IF NOT EXISTS targets_profile_idx  ON targets(profile_id);

PRAGMA user_version = 1;
";
