//! Gamification Engine: points, level and longest session.

use serde::{Deserialize, Serialize};

use crate::{levels, profile::Profile};

/// What one completed session earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsAward {
  pub points_gained:  u32,
  pub previous_level: u32,
  pub new_level:      u32,
  /// The session set a new longest-session record.
  pub new_record:     bool,
}

impl PointsAward {
  pub fn levelled_up(&self) -> bool { self.new_level > self.previous_level }
}

/// One point per whole minute; partial minutes are dropped.
pub fn points_for(elapsed_seconds: u32) -> u32 { elapsed_seconds / 60 }

/// Apply a completed session to `profile`: points, level and longest session
/// change together. Callers hand the updated profile to the store as a
/// single commit.
pub fn apply_session_completion(profile: &mut Profile, elapsed_seconds: u32) -> PointsAward {
  let points_gained = points_for(elapsed_seconds);
  let previous_level = profile.level;

  profile.points = profile.points.saturating_add(points_gained);
  profile.level = levels::level_for(profile.points);

  let new_record = elapsed_seconds > profile.longest_session;
  profile.longest_session = profile.longest_session.max(elapsed_seconds);

  PointsAward {
    points_gained,
    previous_level,
    new_level: profile.level,
    new_record,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn whole_minutes_only() {
    assert_eq!(points_for(125), 2);
    assert_eq!(points_for(59), 0);
    assert_eq!(points_for(60), 1);
  }

  #[test]
  fn completion_updates_all_fields() {
    let mut p = Profile::new("Violin");
    p.points = 8;
    p.level = 1;
    p.longest_session = 100;

    let award = apply_session_completion(&mut p, 125);
    assert_eq!(award.points_gained, 2);
    assert_eq!(p.points, 10);
    assert_eq!(p.level, 2);
    assert!(award.levelled_up());
    assert!(award.new_record);
    assert_eq!(p.longest_session, 125);
  }

  #[test]
  fn short_session_keeps_record() {
    let mut p = Profile::new("Flute");
    p.longest_session = 600;

    let award = apply_session_completion(&mut p, 59);
    assert_eq!(award.points_gained, 0);
    assert_eq!(p.points, 0);
    assert_eq!(p.level, 1);
    assert!(!award.new_record);
    assert_eq!(p.longest_session, 600);
  }

  #[test]
  fn two_minute_sessions_add_two_points() {
    let mut p = Profile::new("Drums");
    apply_session_completion(&mut p, 60);
    apply_session_completion(&mut p, 60);
    assert_eq!(p.points, 2);
  }
}
