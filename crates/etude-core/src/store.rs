//! The `PracticeStore` trait and the completion commit it applies.
//!
//! The trait is implemented by storage backends (e.g. `etude-store-sqlite`).
//! The [`Tracker`](crate::tracker::Tracker) depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  profile::Profile,
  rating::CategoryRating,
  session::Session,
  target::Target,
  time::DayStamp,
};

// ─── Completion commit ───────────────────────────────────────────────────────

/// Every write caused by one completed practice run. Applied all-or-nothing by
/// [`PracticeStore::commit_completion`].
#[derive(Debug, Clone)]
pub struct CompletionCommit {
  pub session_id:      Uuid,
  pub elapsed_seconds: u32,
  /// The profile with points, level, streak and longest session already
  /// updated.
  pub profile:         Profile,
  /// Targets to mark completed on `completed_on`.
  pub target_ids:      Vec<Uuid>,
  pub completed_on:    DayStamp,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a practice-record backend.
///
/// Session and rating lists are in creation order. All methods return `Send`
/// futures so the trait can be used in multi-threaded async runtimes.
pub trait PracticeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Persist a new profile. Fails if the name is already taken.
  fn insert_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  fn find_profile(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// All profiles, ordered by name.
  fn list_profiles(
    &self,
  ) -> impl Future<Output = Result<Vec<Profile>, Self::Error>> + Send + '_;

  /// Returns `false` if no such profile exists.
  fn rename_profile(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete a profile together with its sessions, ratings and targets, and
  /// clear the stored selection if it pointed at it. Returns `false` if no
  /// such profile exists.
  fn delete_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// The persisted active-profile selection.
  fn active_profile_id(
    &self,
  ) -> impl Future<Output = Result<Option<Uuid>, Self::Error>> + Send + '_;

  fn set_active_profile_id(
    &self,
    id: Option<Uuid>,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Sessions ──────────────────────────────────────────────────────────

  fn insert_session(
    &self,
    session: Session,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn list_sessions(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Session>, Self::Error>> + Send + '_;

  /// Apply a [`CompletionCommit`] in one transaction.
  ///
  /// Returns `false`, writing nothing, if the session does not exist or is
  /// already finalized.
  fn commit_completion(
    &self,
    commit: CompletionCommit,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Ratings ───────────────────────────────────────────────────────────

  /// Returns `false`, writing nothing, if the session already has a rating.
  fn insert_rating(
    &self,
    rating: CategoryRating,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn list_ratings(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Vec<CategoryRating>, Self::Error>> + Send + '_;

  // ── Targets ───────────────────────────────────────────────────────────

  fn insert_target(
    &self,
    target: Target,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// The profile's targets, ordered by task.
  fn list_targets(
    &self,
    profile_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Target>, Self::Error>> + Send + '_;

  /// Returns `false` if the target is missing or already completed.
  fn complete_target(
    &self,
    id: Uuid,
    on: DayStamp,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if no such target exists.
  fn delete_target(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
