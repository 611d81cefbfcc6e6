//! Session: one timed practice run.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::DayStamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
  pub session_id:       Uuid,
  pub profile_id:       Uuid,
  pub category:         String,
  pub date:             DayStamp,
  pub time_started:     NaiveTime,
  /// Elapsed seconds; `None` until the run ends. Set exactly once.
  pub time_completed:   Option<u32>,
  /// Planned duration in minutes.
  pub duration_minutes: u32,
}

impl Session {
  pub fn is_finalized(&self) -> bool { self.time_completed.is_some() }

  /// Seconds actually practised, zero while the run is still open.
  pub fn practised_seconds(&self) -> u32 { self.time_completed.unwrap_or(0) }
}

/// The terminal event of a practice run: the timer reached zero or the user
/// ended the run early.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionEvent {
  /// The session created when the run started. When absent the session is
  /// inferred from start times.
  pub session_id:        Option<Uuid>,
  pub elapsed_seconds:   u32,
  /// Tasks of the targets ticked off during the run.
  pub completed_targets: Vec<String>,
}
