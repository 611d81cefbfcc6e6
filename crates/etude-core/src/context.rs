//! The process-wide practice context: which profile is active.
//!
//! Starts with no profile selected. Selecting a profile replaces the previous
//! selection; deleting the active profile clears it.

use uuid::Uuid;

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PracticeContext {
  active_profile: Option<Uuid>,
}

impl PracticeContext {
  pub fn new() -> Self { Self::default() }

  pub fn with_active(active_profile: Option<Uuid>) -> Self { Self { active_profile } }

  pub fn active(&self) -> Option<Uuid> { self.active_profile }

  /// The active profile id, or [`Error::NoActiveProfile`].
  pub fn require_active(&self) -> Result<Uuid> {
    self.active_profile.ok_or(Error::NoActiveProfile)
  }

  pub fn select(&mut self, profile_id: Uuid) { self.active_profile = Some(profile_id); }

  /// Forget the selection if it points at `profile_id`. Returns whether it
  /// did.
  pub fn clear_if(&mut self, profile_id: Uuid) -> bool {
    if self.active_profile == Some(profile_id) {
      self.active_profile = None;
      true
    } else {
      false
    }
  }
}
