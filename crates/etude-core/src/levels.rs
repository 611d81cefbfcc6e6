//! Level thresholds, streak badges and the achievements read model.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{profile::Profile, time::format_duration};

// ─── Levels ──────────────────────────────────────────────────────────────────

/// `(points threshold, level)` pairs, ascending by threshold.
pub const LEVELS: &[(u32, u32)] = &[
  (0, 1),
  (10, 2),
  (50, 3),
  (125, 4),
  (250, 5),
  (500, 6),
  (1000, 7),
];

/// The level of the highest threshold not above `points`.
pub fn level_for(points: u32) -> u32 {
  let mut level = LEVELS[0].1;
  for &(threshold, lvl) in LEVELS {
    if threshold > points {
      break;
    }
    level = lvl;
  }
  level
}

/// The smallest threshold strictly above `points`, or `None` once the top
/// level is reached.
pub fn next_threshold(points: u32) -> Option<u32> {
  LEVELS
    .iter()
    .map(|&(threshold, _)| threshold)
    .find(|&threshold| threshold > points)
}

// ─── Streak badges ───────────────────────────────────────────────────────────

/// Badge earned for a streak length. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakBadge {
  NotYetAchieved,
  OneWeek,
  TwoWeeks,
  OneMonth,
  ThreeMonths,
  SixMonths,
  OneYear,
}

impl StreakBadge {
  /// Lower bounds of each badge, ascending.
  const BUCKETS: &[(u32, StreakBadge)] = &[
    (7, StreakBadge::OneWeek),
    (14, StreakBadge::TwoWeeks),
    (30, StreakBadge::OneMonth),
    (90, StreakBadge::ThreeMonths),
    (180, StreakBadge::SixMonths),
    (360, StreakBadge::OneYear),
  ];

  pub fn for_streak(streak: u32) -> Self {
    Self::BUCKETS
      .iter()
      .rev()
      .find(|&&(min, _)| streak >= min)
      .map_or(Self::NotYetAchieved, |&(_, badge)| badge)
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::NotYetAchieved => "not yet achieved",
      Self::OneWeek => "1 week",
      Self::TwoWeeks => "2 weeks",
      Self::OneMonth => "1 month",
      Self::ThreeMonths => "3 months",
      Self::SixMonths => "6 months",
      Self::OneYear => "1 year",
    }
  }
}

impl fmt::Display for StreakBadge {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.label())
  }
}

// ─── Achievements ────────────────────────────────────────────────────────────

/// Everything the achievements view shows for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievements {
  pub profile:         String,
  pub level:           u32,
  pub points:          u32,
  /// `None` at the top level.
  pub next_threshold:  Option<u32>,
  pub points_needed:   Option<u32>,
  pub streak:          u32,
  pub badge:           StreakBadge,
  pub longest_session: String,
}

impl Achievements {
  pub fn for_profile(profile: &Profile) -> Self {
    let next = next_threshold(profile.points);
    Self {
      profile:         profile.name.clone(),
      level:           profile.level,
      points:          profile.points,
      next_threshold:  next,
      points_needed:   next.map(|t| t - profile.points),
      streak:          profile.streak,
      badge:           profile.badge(),
      longest_session: format_duration(profile.longest_session),
    }
  }
}
