//! Session Reconciler.
//!
//! Locates the session a practice run belongs to, finalizes it, and decides
//! whether the day's practice continues the streak.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  profile::Profile,
  session::Session,
  time::{DayStamp, day_before, seconds_since},
};

/// Elapsed seconds a session must exceed to extend a streak.
///
/// The literal comes from the first version of the tracker and is most likely
/// meant to be minutes. Override it through
/// [`EngineConfig::streak_min_seconds`](crate::tracker::EngineConfig).
pub const DEFAULT_STREAK_MIN_SECONDS: u32 = 2;

/// The session of `profile_id`, dated `today`, started most recently before
/// `now`. Ties go to the first session in `sessions`.
pub fn find_active_session<'a>(
  sessions:   &'a [Session],
  profile_id: Uuid,
  today:      &DayStamp,
  now:        NaiveTime,
) -> Option<&'a Session> {
  let mut best: Option<(i64, &Session)> = None;
  for session in sessions
    .iter()
    .filter(|s| s.profile_id == profile_id && &s.date == today)
  {
    let elapsed = seconds_since(session.time_started, now);
    if elapsed < 0 {
      continue;
    }
    if best.is_none_or(|(min, _)| elapsed < min) {
      best = Some((elapsed, session));
    }
  }
  best.map(|(_, s)| s)
}

/// Record the elapsed time of a finished run. A session is finalized once.
pub fn finalize_session(session: &mut Session, elapsed_seconds: u32) -> Result<()> {
  if session.is_finalized() {
    return Err(Error::AlreadyFinalized(session.session_id));
  }
  session.time_completed = Some(elapsed_seconds);
  Ok(())
}

/// Result of [`compute_streak`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakOutcome {
  pub streak:      u32,
  pub incremented: bool,
}

/// Streak after the session that just ended.
///
/// `sessions` must already contain the just-finished session. More than one
/// session today means an earlier run already earned today's credit. A run at
/// or below `min_seconds` after practice yesterday keeps the streak as is
/// rather than resetting it.
pub fn compute_streak(
  sessions:        &[Session],
  profile:         &Profile,
  today:           &DayStamp,
  yesterday:       &DayStamp,
  elapsed_seconds: u32,
  min_seconds:     u32,
) -> StreakOutcome {
  let own = || sessions.iter().filter(|s| s.profile_id == profile.profile_id);

  let already_counted_today = own().filter(|s| &s.date == today).count() > 1;
  let practised_yesterday = own().any(|s| &s.date == yesterday);

  if practised_yesterday && elapsed_seconds > min_seconds && !already_counted_today {
    StreakOutcome { streak: profile.streak.saturating_add(1), incremented: true }
  } else if !already_counted_today && !practised_yesterday {
    StreakOutcome { streak: 0, incremented: false }
  } else {
    StreakOutcome { streak: profile.streak, incremented: false }
  }
}

/// Streak after finalizing `session`, credited to the day it was started.
///
/// A run that crossed midnight counts for yesterday as long as today has no
/// sessions yet. Anything older leaves the streak unchanged.
pub fn streak_for_session(
  sessions:        &[Session],
  profile:         &Profile,
  session:         &Session,
  today:           NaiveDate,
  elapsed_seconds: u32,
  min_seconds:     u32,
) -> StreakOutcome {
  let yesterday = day_before(today);
  let today_stamp = DayStamp::from_date(today);
  let yesterday_stamp = DayStamp::from_date(yesterday);

  if session.date == today_stamp {
    return compute_streak(
      sessions,
      profile,
      &today_stamp,
      &yesterday_stamp,
      elapsed_seconds,
      min_seconds,
    );
  }

  let today_has_practice = sessions
    .iter()
    .any(|s| s.profile_id == profile.profile_id && s.date == today_stamp);
  if session.date == yesterday_stamp && !today_has_practice {
    return compute_streak(
      sessions,
      profile,
      &yesterday_stamp,
      &DayStamp::from_date(day_before(yesterday)),
      elapsed_seconds,
      min_seconds,
    );
  }

  StreakOutcome { streak: profile.streak, incremented: false }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(d: u32) -> NaiveDate { NaiveDate::from_ymd_opt(2026, 10, d).unwrap() }

  fn at(h: u32, m: u32, s: u32) -> NaiveTime { NaiveTime::from_hms_opt(h, m, s).unwrap() }

  fn session(profile: &Profile, date: NaiveDate, started: NaiveTime) -> Session {
    Session {
      session_id:       Uuid::new_v4(),
      profile_id:       profile.profile_id,
      category:         "Major Scales".into(),
      date:             date.into(),
      time_started:     started,
      time_completed:   None,
      duration_minutes: 10,
    }
  }

  #[test]
  fn picks_most_recent_start_before_now() {
    let p = Profile::new("Piano");
    let sessions = vec![
      session(&p, day(19), at(9, 0, 0)),
      session(&p, day(19), at(9, 5, 0)),
      session(&p, day(19), at(9, 30, 0)),
      session(&p, day(18), at(9, 5, 59)),
    ];

    let found = find_active_session(&sessions, p.profile_id, &day(19).into(), at(9, 6, 0));
    assert_eq!(found.map(|s| s.session_id), Some(sessions[1].session_id));
  }

  #[test]
  fn ties_go_to_first_seen() {
    let p = Profile::new("Piano");
    let sessions = vec![
      session(&p, day(19), at(9, 5, 0)),
      session(&p, day(19), at(9, 5, 0)),
    ];
    let found = find_active_session(&sessions, p.profile_id, &day(19).into(), at(9, 6, 0));
    assert_eq!(found.map(|s| s.session_id), Some(sessions[0].session_id));
  }

  #[test]
  fn no_candidate_is_none() {
    let p = Profile::new("Piano");
    let other = Profile::new("Guitar");
    let sessions = vec![
      session(&p, day(18), at(9, 0, 0)),
      session(&other, day(19), at(9, 0, 0)),
      session(&p, day(19), at(23, 0, 0)),
    ];
    assert!(find_active_session(&sessions, p.profile_id, &day(19).into(), at(9, 6, 0)).is_none());
    assert!(find_active_session(&[], p.profile_id, &day(19).into(), at(9, 6, 0)).is_none());
  }

  #[test]
  fn finalize_once() {
    let p = Profile::new("Piano");
    let mut s = session(&p, day(19), at(9, 0, 0));

    finalize_session(&mut s, 70).unwrap();
    assert_eq!(s.time_completed, Some(70));

    let err = finalize_session(&mut s, 90).unwrap_err();
    assert!(matches!(err, Error::AlreadyFinalized(id) if id == s.session_id));
    assert_eq!(s.time_completed, Some(70));
  }

  fn streak(sessions: &[Session], p: &Profile, today: NaiveDate, elapsed: u32) -> StreakOutcome {
    compute_streak(
      sessions,
      p,
      &today.into(),
      &day_before(today).into(),
      elapsed,
      DEFAULT_STREAK_MIN_SECONDS,
    )
  }

  #[test]
  fn practised_yesterday_increments() {
    let mut p = Profile::new("Piano");
    p.streak = 4;
    let sessions = vec![session(&p, day(18), at(9, 0, 0)), session(&p, day(19), at(9, 0, 0))];

    let out = streak(&sessions, &p, day(19), 70);
    assert_eq!(out, StreakOutcome { streak: 5, incremented: true });
  }

  #[test]
  fn gap_resets() {
    let mut p = Profile::new("Piano");
    p.streak = 4;
    let sessions = vec![session(&p, day(16), at(9, 0, 0)), session(&p, day(19), at(9, 0, 0))];

    let out = streak(&sessions, &p, day(19), 70);
    assert_eq!(out, StreakOutcome { streak: 0, incremented: false });
  }

  #[test]
  fn second_session_today_does_not_recount() {
    let mut p = Profile::new("Piano");
    p.streak = 5;
    let sessions = vec![
      session(&p, day(18), at(9, 0, 0)),
      session(&p, day(19), at(9, 0, 0)),
      session(&p, day(19), at(18, 0, 0)),
    ];

    let out = streak(&sessions, &p, day(19), 600);
    assert_eq!(out, StreakOutcome { streak: 5, incremented: false });
  }

  #[test]
  fn trivial_session_keeps_streak_when_practised_yesterday() {
    let mut p = Profile::new("Piano");
    p.streak = 3;
    let sessions = vec![session(&p, day(18), at(9, 0, 0)), session(&p, day(19), at(9, 0, 0))];

    let out = streak(&sessions, &p, day(19), 2);
    assert_eq!(out, StreakOutcome { streak: 3, incremented: false });
  }

  #[test]
  fn threshold_is_configurable() {
    let mut p = Profile::new("Piano");
    p.streak = 1;
    let sessions = vec![session(&p, day(18), at(9, 0, 0)), session(&p, day(19), at(9, 0, 0))];

    let out = compute_streak(&sessions, &p, &day(19).into(), &day(18).into(), 70, 600);
    assert!(!out.incremented);
    assert_eq!(out.streak, 1);
  }

  #[test]
  fn consecutive_days_grow_by_one() {
    let mut p = Profile::new("Piano");
    let mut sessions = vec![session(&p, day(17), at(9, 0, 0)), session(&p, day(18), at(9, 0, 0))];

    let first = streak(&sessions, &p, day(18), 70);
    p.streak = first.streak;

    sessions.push(session(&p, day(19), at(9, 0, 0)));
    let second = streak(&sessions, &p, day(19), 70);
    assert_eq!(second.streak, first.streak + 1);
  }

  #[test]
  fn other_profiles_are_ignored() {
    let mut p = Profile::new("Piano");
    p.streak = 2;
    let other = Profile::new("Guitar");
    let sessions = vec![
      session(&other, day(18), at(9, 0, 0)),
      session(&other, day(19), at(8, 0, 0)),
      session(&p, day(19), at(9, 0, 0)),
    ];

    let out = streak(&sessions, &p, day(19), 70);
    assert_eq!(out, StreakOutcome { streak: 0, incremented: false });
  }

  #[test]
  fn run_across_midnight_counts_for_its_start_day() {
    let mut p = Profile::new("Piano");
    p.streak = 2;
    let sessions = vec![session(&p, day(17), at(9, 0, 0)), session(&p, day(18), at(23, 55, 0))];

    let out = streak_for_session(&sessions, &p, &sessions[1], day(19), 900, DEFAULT_STREAK_MIN_SECONDS);
    assert_eq!(out, StreakOutcome { streak: 3, incremented: true });
  }

  #[test]
  fn late_run_after_practice_today_changes_nothing() {
    let mut p = Profile::new("Piano");
    p.streak = 3;
    let sessions = vec![
      session(&p, day(17), at(9, 0, 0)),
      session(&p, day(18), at(23, 55, 0)),
      session(&p, day(19), at(0, 5, 0)),
    ];

    let out = streak_for_session(&sessions, &p, &sessions[1], day(19), 900, DEFAULT_STREAK_MIN_SECONDS);
    assert_eq!(out, StreakOutcome { streak: 3, incremented: false });
  }

  #[test]
  fn stale_session_changes_nothing() {
    let mut p = Profile::new("Piano");
    p.streak = 4;
    let sessions = vec![session(&p, day(9), at(9, 0, 0)), session(&p, day(10), at(9, 0, 0))];

    let out = streak_for_session(&sessions, &p, &sessions[1], day(19), 900, DEFAULT_STREAK_MIN_SECONDS);
    assert_eq!(out, StreakOutcome { streak: 4, incremented: false });
  }

  #[test]
  fn session_from_today_uses_today() {
    let mut p = Profile::new("Piano");
    p.streak = 1;
    let sessions = vec![session(&p, day(18), at(9, 0, 0)), session(&p, day(19), at(9, 0, 0))];

    let out = streak_for_session(&sessions, &p, &sessions[1], day(19), 70, DEFAULT_STREAK_MIN_SECONDS);
    assert_eq!(out, StreakOutcome { streak: 2, incremented: true });
  }
}
