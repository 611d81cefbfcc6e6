//! Weekly summary and per-day practice detail.
//!
//! Both are read models computed from the active profile's records; nothing
//! here is stored. A record whose stored day does not parse is logged, listed
//! in `malformed` and left out of the date-range computation.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  profile::Profile,
  rating::{CategoryRating, Difficulty},
  session::Session,
  target::Target,
  time::{DayStamp, week_start},
};

/// One session as listed in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionEntry {
  pub session_id:   Uuid,
  pub date:         DayStamp,
  pub category:     String,
  pub time_started: NaiveTime,
  /// Seconds practised; zero for a run that never finished.
  pub practised:    u32,
}

impl From<&Session> for SessionEntry {
  fn from(s: &Session) -> Self {
    Self {
      session_id:   s.session_id,
      date:         s.date.clone(),
      category:     s.category.clone(),
      time_started: s.time_started,
      practised:    s.practised_seconds(),
    }
  }
}

// ─── Weekly summary ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklySummary {
  pub profile:            String,
  /// First day of the window, inclusive.
  pub from:               NaiveDate,
  /// Last day of the window (today), inclusive.
  pub to:                 NaiveDate,
  pub session_count:      usize,
  pub total_seconds:      u32,
  pub sessions:           Vec<SessionEntry>,
  /// Highest difficulty rated in the window.
  pub hardest_difficulty: Option<Difficulty>,
  /// Every category rated at `hardest_difficulty`, in first-seen order.
  pub hardest_categories: Vec<String>,
  pub completed_targets:  Vec<String>,
  /// Stored day strings that could not be parsed.
  pub malformed:          Vec<String>,
}

/// Summarise the rolling week ending on `today`.
pub fn weekly_summary(
  profile:  &Profile,
  sessions: &[Session],
  ratings:  &[CategoryRating],
  targets:  &[Target],
  today:    NaiveDate,
) -> WeeklySummary {
  let from = week_start(today);
  let mut window = Window { from, to: today, malformed: Vec::new() };

  let sessions: Vec<SessionEntry> = sessions
    .iter()
    .filter(|s| s.profile_id == profile.profile_id)
    .filter(|s| window.contains(&s.date))
    .map(SessionEntry::from)
    .collect();

  let mut hardest_difficulty: Option<Difficulty> = None;
  let mut hardest_categories: Vec<String> = Vec::new();
  for rating in ratings
    .iter()
    .filter(|r| r.profile_id == profile.profile_id)
    .filter(|r| window.contains(&r.date))
  {
    match hardest_difficulty {
      Some(d) if rating.difficulty < d => {}
      Some(d) if rating.difficulty == d => {
        if !hardest_categories.contains(&rating.category) {
          hardest_categories.push(rating.category.clone());
        }
      }
      _ => {
        hardest_difficulty = Some(rating.difficulty);
        hardest_categories = vec![rating.category.clone()];
      }
    }
  }

  let completed_targets = targets
    .iter()
    .filter(|t| t.profile_id == profile.profile_id && t.is_completed)
    .filter(|t| t.date_completed.as_ref().is_some_and(|d| window.contains(d)))
    .map(|t| t.task.clone())
    .collect();

  WeeklySummary {
    profile: profile.name.clone(),
    from,
    to: today,
    session_count: sessions.len(),
    total_seconds: sessions.iter().map(|s| s.practised).sum(),
    sessions,
    hardest_difficulty,
    hardest_categories,
    completed_targets,
    malformed: window.malformed,
  }
}

/// Inclusive day range that records malformed stamps it is asked about.
struct Window {
  from:      NaiveDate,
  to:        NaiveDate,
  malformed: Vec<String>,
}

impl Window {
  fn contains(&mut self, stamp: &DayStamp) -> bool {
    match stamp.to_date() {
      Ok(day) => (self.from..=self.to).contains(&day),
      Err(err) => {
        tracing::warn!(%err, "excluding record from summary");
        if !self.malformed.iter().any(|m| m == stamp.as_str()) {
          self.malformed.push(stamp.as_str().to_owned());
        }
        false
      }
    }
  }
}

// ─── Day detail ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDetail {
  pub profile:           String,
  pub date:              DayStamp,
  pub sessions:          Vec<SessionEntry>,
  /// Distinct categories, in the order first practised.
  pub categories:        Vec<String>,
  pub completed_targets: Vec<String>,
  pub session_count:     usize,
  pub total_seconds:     u32,
}

pub fn day_detail(
  profile:  &Profile,
  sessions: &[Session],
  targets:  &[Target],
  date:     NaiveDate,
) -> DayDetail {
  let stamp = DayStamp::from_date(date);

  let sessions: Vec<SessionEntry> = sessions
    .iter()
    .filter(|s| s.profile_id == profile.profile_id && s.date == stamp)
    .map(SessionEntry::from)
    .collect();

  let mut categories: Vec<String> = Vec::new();
  for s in &sessions {
    if !categories.contains(&s.category) {
      categories.push(s.category.clone());
    }
  }

  let completed_targets = targets
    .iter()
    .filter(|t| t.profile_id == profile.profile_id)
    .filter(|t| t.date_completed.as_ref() == Some(&stamp))
    .map(|t| t.task.clone())
    .collect();

  DayDetail {
    profile: profile.name.clone(),
    date: stamp,
    session_count: sessions.len(),
    total_seconds: sessions.iter().map(|s| s.practised).sum(),
    sessions,
    categories,
    completed_targets,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, d).unwrap() }

  fn session(p: &Profile, date: impl Into<DayStamp>, category: &str, secs: Option<u32>) -> Session {
    Session {
      session_id:       Uuid::new_v4(),
      profile_id:       p.profile_id,
      category:         category.into(),
      date:             date.into(),
      time_started:     NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
      time_completed:   secs,
      duration_minutes: 30,
    }
  }

  fn rating(p: &Profile, s: &Session, difficulty: u8) -> CategoryRating {
    CategoryRating {
      rating_id:  Uuid::new_v4(),
      profile_id: p.profile_id,
      session_id: s.session_id,
      category:   s.category.clone(),
      date:       s.date.clone(),
      difficulty: Difficulty::try_from(difficulty).unwrap(),
    }
  }

  fn done(p: &Profile, task: &str, on: NaiveDate) -> Target {
    let mut t = Target::new(p.profile_id, task);
    t.is_completed = true;
    t.date_completed = Some(on.into());
    t
  }

  #[test]
  fn week_window_is_inclusive() {
    let p = Profile::new("Piano");
    let sessions = vec![
      session(&p, day(11), "Pieces", Some(600)),
      session(&p, day(12), "Major Scales", Some(300)),
      session(&p, day(19), "Ear Training", Some(125)),
      session(&p, day(20), "Pieces", Some(60)),
    ];

    let s = weekly_summary(&p, &sessions, &[], &[], day(19));
    assert_eq!((s.from, s.to), (day(12), day(19)));
    assert_eq!(s.session_count, 2);
    assert_eq!(s.total_seconds, 425);
    assert_eq!(s.sessions[0].category, "Major Scales");
    assert!(s.malformed.is_empty());
  }

  #[test]
  fn open_sessions_count_but_add_no_time() {
    let p = Profile::new("Piano");
    let sessions = vec![session(&p, day(19), "Pieces", None)];
    let s = weekly_summary(&p, &sessions, &[], &[], day(19));
    assert_eq!(s.session_count, 1);
    assert_eq!(s.total_seconds, 0);
  }

  #[test]
  fn hardest_categories_collect_ties() {
    let p = Profile::new("Piano");
    let a = session(&p, day(15), "Pieces", Some(60));
    let b = session(&p, day(16), "Minor Arpeggios", Some(60));
    let c = session(&p, day(17), "Ear Training", Some(60));
    let d = session(&p, day(18), "Minor Arpeggios", Some(60));
    let old = session(&p, day(1), "Sight Reading", Some(60));
    let ratings = vec![
      rating(&p, &a, 1),
      rating(&p, &b, 3),
      rating(&p, &c, 3),
      rating(&p, &d, 3),
      rating(&p, &old, 3),
    ];

    let s = weekly_summary(&p, &[], &ratings, &[], day(19));
    assert_eq!(s.hardest_difficulty.map(Difficulty::get), Some(3));
    assert_eq!(s.hardest_categories, ["Minor Arpeggios", "Ear Training"]);
  }

  #[test]
  fn completed_targets_in_window_only() {
    let p = Profile::new("Piano");
    let other = Profile::new("Guitar");
    let targets = vec![
      done(&p, "Memorise Prelude", day(18)),
      done(&p, "Old goal", day(2)),
      Target::new(p.profile_id, "Still going"),
      done(&other, "Not mine", day(18)),
    ];

    let s = weekly_summary(&p, &[], &[], &targets, day(19));
    assert_eq!(s.completed_targets, ["Memorise Prelude"]);
  }

  #[test]
  fn malformed_dates_are_excluded_not_fatal() {
    let p = Profile::new("Piano");
    let sessions = vec![
      session(&p, DayStamp::from_stored("19/10/2026"), "Pieces", Some(600)),
      session(&p, DayStamp::from_stored("19/10/2026"), "Pieces", Some(600)),
      session(&p, day(19), "Pieces", Some(60)),
    ];

    let s = weekly_summary(&p, &sessions, &[], &[], day(19));
    assert_eq!(s.session_count, 1);
    assert_eq!(s.total_seconds, 60);
    assert_eq!(s.malformed, ["19/10/2026"]);
  }

  #[test]
  fn day_detail_lists_one_day() {
    let p = Profile::new("Piano");
    let sessions = vec![
      session(&p, day(18), "Pieces", Some(100)),
      session(&p, day(19), "Pieces", Some(600)),
      session(&p, day(19), "Major Scales", Some(300)),
      session(&p, day(19), "Pieces", Some(60)),
    ];
    let targets = vec![done(&p, "Scales at 120bpm", day(19)), done(&p, "Earlier", day(18))];

    let d = day_detail(&p, &sessions, &targets, day(19));
    assert_eq!(d.date.as_str(), "Monday, Oct 19, 2026");
    assert_eq!(d.session_count, 3);
    assert_eq!(d.total_seconds, 960);
    assert_eq!(d.categories, ["Pieces", "Major Scales"]);
    assert_eq!(d.completed_targets, ["Scales at 120bpm"]);
  }
}
