//! Cooperative practice countdown.
//!
//! The timer does not run by itself: the driver calls [`PracticeTimer::tick`]
//! once per second. Pausing drops ticks without touching the counters, so a
//! pause/resume cycle neither replays nor loses time.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::CompletionEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerState {
  Running,
  Paused,
  /// Counted down to zero.
  Finished,
  /// Ended early by the user.
  Cancelled,
}

impl TimerState {
  pub fn is_over(self) -> bool { matches!(self, Self::Finished | Self::Cancelled) }
}

#[derive(Debug, Clone)]
pub struct PracticeTimer {
  remaining: u32,
  elapsed:   u32,
  state:     TimerState,
}

impl PracticeTimer {
  pub fn new(planned_seconds: u32) -> Self {
    let state = if planned_seconds == 0 { TimerState::Finished } else { TimerState::Running };
    Self { remaining: planned_seconds, elapsed: 0, state }
  }

  pub fn from_minutes(minutes: u32) -> Self { Self::new(minutes.saturating_mul(60)) }

  /// Advance by one second. Ignored unless running.
  pub fn tick(&mut self) -> TimerState {
    if self.state == TimerState::Running {
      self.remaining = self.remaining.saturating_sub(1);
      self.elapsed = self.elapsed.saturating_add(1);
      if self.remaining == 0 {
        self.state = TimerState::Finished;
      }
    }
    self.state
  }

  pub fn pause(&mut self) {
    if self.state == TimerState::Running {
      self.state = TimerState::Paused;
    }
  }

  pub fn resume(&mut self) {
    if self.state == TimerState::Paused {
      self.state = TimerState::Running;
    }
  }

  /// End the run early, keeping whatever time accrued.
  pub fn cancel(&mut self) {
    if !self.state.is_over() {
      self.state = TimerState::Cancelled;
    }
  }

  pub fn state(&self) -> TimerState { self.state }

  pub fn remaining(&self) -> u32 { self.remaining }

  pub fn elapsed(&self) -> u32 { self.elapsed }

  /// Build the completion event for this run.
  pub fn finish(self, session_id: Option<Uuid>, completed_targets: Vec<String>) -> CompletionEvent {
    CompletionEvent {
      session_id,
      elapsed_seconds: self.elapsed,
      completed_targets,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn counts_down_to_finished() {
    let mut t = PracticeTimer::new(3);
    assert_eq!(t.tick(), TimerState::Running);
    assert_eq!(t.tick(), TimerState::Running);
    assert_eq!(t.tick(), TimerState::Finished);
    assert_eq!((t.remaining(), t.elapsed()), (0, 3));

    // Further ticks change nothing.
    assert_eq!(t.tick(), TimerState::Finished);
    assert_eq!(t.elapsed(), 3);
  }

  #[test]
  fn pause_drops_ticks_without_losing_progress() {
    let mut t = PracticeTimer::from_minutes(1);
    t.tick();
    t.tick();
    t.pause();
    for _ in 0..10 {
      assert_eq!(t.tick(), TimerState::Paused);
    }
    assert_eq!((t.remaining(), t.elapsed()), (58, 2));

    t.resume();
    t.tick();
    assert_eq!((t.remaining(), t.elapsed()), (57, 3));
  }

  #[test]
  fn cancel_keeps_elapsed_time() {
    let mut t = PracticeTimer::new(600);
    for _ in 0..75 {
      t.tick();
    }
    t.cancel();
    assert_eq!(t.state(), TimerState::Cancelled);
    assert_eq!(t.tick(), TimerState::Cancelled);

    let id = Uuid::new_v4();
    let event = t.finish(Some(id), vec!["Learn G major".into()]);
    assert_eq!(event.session_id, Some(id));
    assert_eq!(event.elapsed_seconds, 75);
    assert_eq!(event.completed_targets, ["Learn G major"]);
  }

  #[test]
  fn paused_timer_can_be_cancelled() {
    let mut t = PracticeTimer::new(10);
    t.tick();
    t.pause();
    t.cancel();
    assert_eq!(t.state(), TimerState::Cancelled);
    t.resume();
    assert_eq!(t.state(), TimerState::Cancelled);
  }

  #[test]
  fn zero_length_is_already_finished() {
    let mut t = PracticeTimer::new(0);
    assert_eq!(t.tick(), TimerState::Finished);
    assert_eq!(t.elapsed(), 0);
  }
}
