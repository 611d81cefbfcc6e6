//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, times of day as `HH:MM:SS` and
//! calendar days as their [`DayStamp`] text, verbatim. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveTime, Utc};
use etude_core::{
  profile::Profile,
  rating::{CategoryRating, Difficulty},
  session::Session,
  target::Target,
  time::{DayStamp, TIME_FORMAT},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveTime ───────────────────────────────────────────────────────────────

pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Counters ────────────────────────────────────────────────────────────────

pub fn decode_count(column: &'static str, value: i64) -> Result<u32> {
  u32::try_from(value).map_err(|_| Error::OutOfRange { column, value })
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub profile_id:      String,
  pub name:            String,
  pub points:          i64,
  pub level:           i64,
  pub streak:          i64,
  pub longest_session: i64,
  pub created_at:      String,
}

impl RawProfile {
  pub const COLUMNS: &'static str =
    "profile_id, name, points, level, streak, longest_session, created_at";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      profile_id:      row.get(0)?,
      name:            row.get(1)?,
      points:          row.get(2)?,
      level:           row.get(3)?,
      streak:          row.get(4)?,
      longest_session: row.get(5)?,
      created_at:      row.get(6)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      profile_id:      decode_uuid(&self.profile_id)?,
      name:            self.name,
      points:          decode_count("points", self.points)?,
      level:           decode_count("level", self.level)?,
      streak:          decode_count("streak", self.streak)?,
      longest_session: decode_count("longest_session", self.longest_session)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `sessions` row.
pub struct RawSession {
  pub session_id:       String,
  pub profile_id:       String,
  pub category:         String,
  pub date:             String,
  pub time_started:     String,
  pub time_completed:   Option<i64>,
  pub duration_minutes: i64,
}

impl RawSession {
  pub const COLUMNS: &'static str =
    "session_id, profile_id, category, date, time_started, time_completed, duration_minutes";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      session_id:       row.get(0)?,
      profile_id:       row.get(1)?,
      category:         row.get(2)?,
      date:             row.get(3)?,
      time_started:     row.get(4)?,
      time_completed:   row.get(5)?,
      duration_minutes: row.get(6)?,
    })
  }

  pub fn into_session(self) -> Result<Session> {
    Ok(Session {
      session_id:       decode_uuid(&self.session_id)?,
      profile_id:       decode_uuid(&self.profile_id)?,
      category:         self.category,
      date:             DayStamp::from_stored(self.date),
      time_started:     decode_time(&self.time_started)?,
      time_completed:   self
        .time_completed
        .map(|v| decode_count("time_completed", v))
        .transpose()?,
      duration_minutes: decode_count("duration_minutes", self.duration_minutes)?,
    })
  }
}

/// Raw values read directly from a `ratings` row.
pub struct RawRating {
  pub rating_id:  String,
  pub profile_id: String,
  pub session_id: String,
  pub category:   String,
  pub date:       String,
  pub difficulty: i64,
}

impl RawRating {
  pub const COLUMNS: &'static str =
    "rating_id, profile_id, session_id, category, date, difficulty";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      rating_id:  row.get(0)?,
      profile_id: row.get(1)?,
      session_id: row.get(2)?,
      category:   row.get(3)?,
      date:       row.get(4)?,
      difficulty: row.get(5)?,
    })
  }

  pub fn into_rating(self) -> Result<CategoryRating> {
    let raw = u8::try_from(self.difficulty).map_err(|_| Error::OutOfRange {
      column: "difficulty",
      value:  self.difficulty,
    })?;
    Ok(CategoryRating {
      rating_id:  decode_uuid(&self.rating_id)?,
      profile_id: decode_uuid(&self.profile_id)?,
      session_id: decode_uuid(&self.session_id)?,
      category:   self.category,
      date:       DayStamp::from_stored(self.date),
      difficulty: Difficulty::try_from(raw)?,
    })
  }
}

/// Raw values read directly from a `targets` row.
pub struct RawTarget {
  pub target_id:      String,
  pub profile_id:     String,
  pub task:           String,
  pub is_completed:   bool,
  pub date_completed: Option<String>,
}

impl RawTarget {
  pub const COLUMNS: &'static str =
    "target_id, profile_id, task, is_completed, date_completed";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      target_id:      row.get(0)?,
      profile_id:     row.get(1)?,
      task:           row.get(2)?,
      is_completed:   row.get(3)?,
      date_completed: row.get(4)?,
    })
  }

  pub fn into_target(self) -> Result<Target> {
    Ok(Target {
      target_id:      decode_uuid(&self.target_id)?,
      profile_id:     decode_uuid(&self.profile_id)?,
      task:           self.task,
      is_completed:   self.is_completed,
      date_completed: self.date_completed.map(DayStamp::from_stored),
    })
  }
}
