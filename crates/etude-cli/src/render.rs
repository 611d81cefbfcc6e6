//! Plain-text and JSON output for command results.

use etude_core::{
  levels::Achievements,
  profile::Profile,
  session::Session,
  summary::{DayDetail, SessionEntry, WeeklySummary},
  target::Target,
  time::{format_duration, format_time},
  tracker::CompletionReport,
};
use serde::Serialize;

/// Print `value` as pretty JSON.
pub fn json<T: Serialize>(value: &T) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

pub fn profiles(profiles: &[Profile], active: Option<uuid::Uuid>) {
  if profiles.is_empty() {
    println!("No profiles yet. Add one with `etude profile add <name>`.");
    return;
  }
  for p in profiles {
    let marker = if Some(p.profile_id) == active { "*" } else { " " };
    println!("{marker} {:<20} level {:>2}  {:>5} pts  streak {}", p.name, p.level, p.points, p.streak);
  }
}

pub fn started(session: &Session) {
  println!(
    "Started {} for {} min ({} at {})",
    session.category,
    session.duration_minutes,
    session.date,
    format_time(session.time_started),
  );
  println!("Session id: {}", session.session_id);
}

pub fn completion(report: &CompletionReport) {
  let award = &report.award;
  println!(
    "Finished {}: {} practised, +{} pts ({} total)",
    report.session.category,
    format_duration(report.session.practised_seconds()),
    award.points_gained,
    report.profile.points,
  );
  if award.levelled_up() {
    println!("Level up! You are now level {}.", award.new_level);
  }
  if award.new_record {
    println!("New longest session!");
  }
  if report.streak.incremented {
    println!("Streak extended to {} day(s).", report.streak.streak);
  }
  for task in &report.completed_targets {
    println!("Target completed: {task}");
  }
}

pub fn targets(targets: &[Target]) {
  if targets.is_empty() {
    println!("No targets.");
    return;
  }
  for t in targets {
    match &t.date_completed {
      Some(on) => println!("[x] {}  ({on})", t.task),
      None => println!("[ ] {}", t.task),
    }
  }
}

fn session_line(s: &SessionEntry) {
  println!(
    "  {}  {}  {:<20} {}",
    s.date,
    format_time(s.time_started),
    s.category,
    format_duration(s.practised),
  );
}

pub fn weekly(summary: &WeeklySummary) {
  println!("{}: {} to {}", summary.profile, summary.from, summary.to);
  println!(
    "{} session(s), {} practised",
    summary.session_count,
    format_duration(summary.total_seconds),
  );
  summary.sessions.iter().for_each(session_line);

  match summary.hardest_difficulty {
    Some(d) => println!("Hardest ({d}/3): {}", summary.hardest_categories.join(", ")),
    None => println!("No ratings this week."),
  }
  if !summary.completed_targets.is_empty() {
    println!("Targets completed: {}", summary.completed_targets.join(", "));
  }
  if !summary.malformed.is_empty() {
    println!("Skipped unreadable dates: {}", summary.malformed.join("; "));
  }
}

pub fn day(detail: &DayDetail) {
  println!("{}: {}", detail.profile, detail.date);
  println!(
    "{} session(s), {} practised",
    detail.session_count,
    format_duration(detail.total_seconds),
  );
  detail.sessions.iter().for_each(session_line);
  if !detail.completed_targets.is_empty() {
    println!("Targets completed: {}", detail.completed_targets.join(", "));
  }
}

pub fn achievements(a: &Achievements) {
  println!("{}", a.profile);
  println!("  Level:           {}", a.level);
  match (a.next_threshold, a.points_needed) {
    (Some(next), Some(needed)) => {
      println!("  Points:          {} / {next} ({needed} to next level)", a.points);
    }
    _ => println!("  Points:          {} (max level)", a.points),
  }
  println!("  Streak:          {} day(s)", a.streak);
  println!("  Badge:           {}", a.badge);
  println!("  Longest session: {}", a.longest_session);
}
