//! Target: a user-defined practice goal, completed at most once.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::time::DayStamp;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
  pub target_id:      Uuid,
  pub profile_id:     Uuid,
  pub task:           String,
  pub is_completed:   bool,
  pub date_completed: Option<DayStamp>,
}

impl Target {
  pub fn new(profile_id: Uuid, task: impl Into<String>) -> Self {
    Self {
      target_id: Uuid::new_v4(),
      profile_id,
      task: task.into(),
      is_completed: false,
      date_completed: None,
    }
  }
}

/// Which targets [`crate::tracker::Tracker::list_targets`] returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetFilter {
  #[default]
  All,
  ToDo,
  Completed,
}

impl TargetFilter {
  pub fn matches(self, target: &Target) -> bool {
    match self {
      Self::All => true,
      Self::ToDo => !target.is_completed,
      Self::Completed => target.is_completed,
    }
  }
}
