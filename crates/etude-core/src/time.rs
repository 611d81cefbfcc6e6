//! Calendar and clock helpers.
//!
//! Records store their calendar day as text in a fixed, locale-independent
//! long form (`Monday, Oct 19, 2026`). [`DayStamp`] owns that format so that a
//! day written by [`Clock::today`] always compares equal to the same day read
//! back from storage.

use std::fmt;

use chrono::{Days, Local, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// `strftime` pattern of a [`DayStamp`]. chrono's month and weekday names are
/// always English, so the rendering does not depend on the host locale.
pub const DAY_FORMAT: &str = "%A, %b %-d, %Y";

/// Pattern used to render and parse times of day.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ─── DayStamp ────────────────────────────────────────────────────────────────

/// A calendar day in its stored textual form.
///
/// Equality is textual: two stamps produced from the same [`NaiveDate`] are
/// always equal. A stamp read from storage may not parse; callers that need
/// the date use [`DayStamp::to_date`] and handle [`Error::MalformedDate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayStamp(String);

impl DayStamp {
  pub fn from_date(date: NaiveDate) -> Self {
    Self(date.format(DAY_FORMAT).to_string())
  }

  /// Wrap raw stored text without validating it.
  pub fn from_stored(raw: impl Into<String>) -> Self { Self(raw.into()) }

  pub fn as_str(&self) -> &str { &self.0 }

  pub fn to_date(&self) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&self.0, DAY_FORMAT)
      .map_err(|_| Error::MalformedDate(self.0.clone()))
  }
}

impl From<NaiveDate> for DayStamp {
  fn from(date: NaiveDate) -> Self { Self::from_date(date) }
}

impl fmt::Display for DayStamp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

// ─── Clock ───────────────────────────────────────────────────────────────────

/// Source of the current calendar day and time of day.
pub trait Clock: Send + Sync {
  fn today(&self) -> NaiveDate;
  fn now(&self) -> NaiveTime;
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn today(&self) -> NaiveDate { Local::now().date_naive() }

  fn now(&self) -> NaiveTime {
    // Truncate to whole seconds; stored times have second resolution.
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
  }
}

/// A clock pinned to a given day and time. Used by tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
  pub today: NaiveDate,
  pub now:   NaiveTime,
}

impl FixedClock {
  pub fn new(today: NaiveDate, now: NaiveTime) -> Self { Self { today, now } }
}

impl Clock for FixedClock {
  fn today(&self) -> NaiveDate { self.today }

  fn now(&self) -> NaiveTime { self.now }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// The calendar day before `date`. Saturates at the minimum representable
/// date.
pub fn day_before(date: NaiveDate) -> NaiveDate {
  date.checked_sub_days(Days::new(1)).unwrap_or(date)
}

/// First day of the rolling week that ends on `today` (inclusive).
pub fn week_start(today: NaiveDate) -> NaiveDate {
  today.checked_sub_days(Days::new(7)).unwrap_or(today)
}

/// Signed seconds from `started` to `now` within one day. Negative when
/// `started` lies after `now`.
pub fn seconds_since(started: NaiveTime, now: NaiveTime) -> i64 {
  now.signed_duration_since(started).num_seconds()
}

pub fn format_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

/// Render a number of seconds as `HH:MM:SS`.
pub fn format_duration(seconds: u32) -> String {
  let hours = seconds / 3600;
  let minutes = seconds / 60 % 60;
  let secs = seconds % 60;
  format!("{hours:02}:{minutes:02}:{secs:02}")
}

#[cfg(test)]
mod tests {
  use chrono::Datelike;

  use super::*;

  fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
  }

  #[test]
  fn day_stamp_uses_long_form() {
    let stamp = DayStamp::from_date(date(2026, 10, 19));
    assert_eq!(stamp.as_str(), "Monday, Oct 19, 2026");

    let stamp = DayStamp::from_date(date(2023, 1, 5));
    assert_eq!(stamp.as_str(), "Thursday, Jan 5, 2023");
  }

  #[test]
  fn day_stamp_round_trips_every_day_of_a_leap_year() {
    let mut day = date(2024, 1, 1);
    while day.year() == 2024 {
      let stamp = DayStamp::from_date(day);
      assert_eq!(stamp.to_date().unwrap(), day, "{stamp}");
      assert_eq!(DayStamp::from_stored(stamp.as_str()), stamp);
      day = day.succ_opt().unwrap();
    }
  }

  #[test]
  fn malformed_stamp_is_reported() {
    let bad = DayStamp::from_stored("2026-10-19");
    assert!(matches!(bad.to_date(), Err(Error::MalformedDate(s)) if s == "2026-10-19"));

    // Weekday disagrees with the date.
    let bad = DayStamp::from_stored("Tuesday, Oct 19, 2026");
    assert!(bad.to_date().is_err());
  }

  #[test]
  fn day_stamp_serialises_as_plain_string() {
    let stamp = DayStamp::from_date(date(2026, 10, 19));
    let json = serde_json::to_string(&stamp).unwrap();
    assert_eq!(json, "\"Monday, Oct 19, 2026\"");
  }

  #[test]
  fn day_before_crosses_month_and_year() {
    assert_eq!(day_before(date(2026, 3, 1)), date(2026, 2, 28));
    assert_eq!(day_before(date(2026, 1, 1)), date(2025, 12, 31));
    assert_eq!(week_start(date(2026, 10, 19)), date(2026, 10, 12));
  }

  #[test]
  fn seconds_since_is_signed() {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
    let nine_six = NaiveTime::from_hms_opt(9, 6, 0).unwrap();
    assert_eq!(seconds_since(nine, nine_six), 360);
    assert_eq!(seconds_since(nine_six, nine), -360);
  }

  #[test]
  fn time_formatting() {
    let t = NaiveTime::from_hms_opt(7, 5, 9).unwrap();
    assert_eq!(format_time(t), "07:05:09");
  }

  #[test]
  fn duration_formatting() {
    assert_eq!(format_duration(0), "00:00:00");
    assert_eq!(format_duration(125), "00:02:05");
    assert_eq!(format_duration(3600 + 61), "01:01:01");
  }
}
