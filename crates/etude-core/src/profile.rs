//! Profile: a named instrument practice track.
//!
//! A profile owns the gamification counters. Sessions, ratings and targets
//! point at it by [`Profile::profile_id`], so renaming never orphans history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::levels::{self, StreakBadge};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:      Uuid,
  /// User-chosen, unique across profiles.
  pub name:            String,
  pub points:          u32,
  /// Always `levels::level_for(points)` once a session has completed.
  pub level:           u32,
  /// Consecutive practice days.
  pub streak:          u32,
  /// Longest single session, in seconds.
  pub longest_session: u32,
  pub created_at:      DateTime<Utc>,
}

impl Profile {
  /// A fresh profile at level 1 with every counter at zero.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      profile_id:      Uuid::new_v4(),
      name:            name.into(),
      points:          0,
      level:           levels::level_for(0),
      streak:          0,
      longest_session: 0,
      created_at:      Utc::now(),
    }
  }

  pub fn badge(&self) -> StreakBadge { StreakBadge::for_streak(self.streak) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_profile_starts_at_level_one() {
    let p = Profile::new("Piano");
    assert_eq!(p.name, "Piano");
    assert_eq!((p.points, p.level, p.streak, p.longest_session), (0, 1, 0, 0));
    assert_eq!(p.badge(), StreakBadge::NotYetAchieved);
  }
}
