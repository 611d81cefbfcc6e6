//! The `Tracker` service.
//!
//! Wires the Session Reconciler and the Gamification Engine to a
//! [`PracticeStore`] and a [`Clock`]. Each operation loads what it needs,
//! computes on copies, and only commits through the store; a failed commit
//! leaves the stored state untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  context::PracticeContext,
  gamify::{self, PointsAward},
  levels::Achievements,
  profile::Profile,
  rating::{CategoryRating, Difficulty},
  reconcile::{self, DEFAULT_STREAK_MIN_SECONDS, StreakOutcome},
  session::{CompletionEvent, Session},
  store::{CompletionCommit, PracticeStore},
  summary::{self, DayDetail, WeeklySummary},
  target::{Target, TargetFilter},
  time::{Clock, DayStamp},
};

// ─── Configuration ───────────────────────────────────────────────────────────

/// Tunables of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
  /// Elapsed seconds a session must exceed to extend the streak.
  pub streak_min_seconds: u32,
}

impl Default for EngineConfig {
  fn default() -> Self { Self { streak_min_seconds: DEFAULT_STREAK_MIN_SECONDS } }
}

// ─── Reports ─────────────────────────────────────────────────────────────────

/// Outcome of a successfully finalized practice run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionReport {
  pub session:           Session,
  /// The profile as committed.
  pub profile:           Profile,
  pub award:             PointsAward,
  pub streak:            StreakOutcome,
  /// Targets completed by this run, including ones ticked off earlier in it.
  pub completed_targets: Vec<String>,
}

// ─── Tracker ─────────────────────────────────────────────────────────────────

pub struct Tracker<S, C> {
  store:   S,
  clock:   C,
  config:  EngineConfig,
  context: PracticeContext,
}

impl<S, C> Tracker<S, C>
where
  S: PracticeStore,
  C: Clock,
{
  /// Build a tracker, restoring the persisted profile selection.
  pub async fn open(store: S, clock: C, config: EngineConfig) -> Result<Self> {
    let mut active = store.active_profile_id().await.map_err(Error::persistence)?;
    if let Some(id) = active
      && store.get_profile(id).await.map_err(Error::persistence)?.is_none()
    {
      tracing::warn!(%id, "stored selection points at a missing profile; clearing");
      store.set_active_profile_id(None).await.map_err(Error::persistence)?;
      active = None;
    }

    Ok(Self { store, clock, config, context: PracticeContext::with_active(active) })
  }

  pub fn context(&self) -> PracticeContext { self.context }

  fn today(&self) -> NaiveDate { self.clock.today() }

  // ── Profiles ──────────────────────────────────────────────────────────

  pub async fn add_profile(&self, name: &str) -> Result<Profile> {
    let name = valid_name(name)?;
    if self.lookup_profile(name).await?.is_some() {
      return Err(Error::DuplicateProfile(name.to_owned()));
    }

    let profile = Profile::new(name);
    self
      .store
      .insert_profile(profile.clone())
      .await
      .map_err(Error::persistence)?;
    tracing::info!(profile = %profile.name, id = %profile.profile_id, "profile created");
    Ok(profile)
  }

  pub async fn list_profiles(&self) -> Result<Vec<Profile>> {
    self.store.list_profiles().await.map_err(Error::persistence)
  }

  /// Make `name` the active profile.
  pub async fn select_profile(&mut self, name: &str) -> Result<Profile> {
    let profile = self.require_profile(name).await?;
    self
      .store
      .set_active_profile_id(Some(profile.profile_id))
      .await
      .map_err(Error::persistence)?;
    self.context.select(profile.profile_id);
    tracing::info!(profile = %profile.name, "profile selected");
    Ok(profile)
  }

  pub async fn rename_profile(&self, name: &str, new_name: &str) -> Result<Profile> {
    let new_name = valid_name(new_name)?;
    let mut profile = self.require_profile(name).await?;
    if profile.name == new_name {
      return Ok(profile);
    }
    if self.lookup_profile(new_name).await?.is_some() {
      return Err(Error::DuplicateProfile(new_name.to_owned()));
    }

    let renamed = self
      .store
      .rename_profile(profile.profile_id, new_name.to_owned())
      .await
      .map_err(Error::persistence)?;
    if !renamed {
      return Err(Error::ProfileNotFound(name.to_owned()));
    }
    tracing::info!(from = %profile.name, to = %new_name, "profile renamed");
    profile.name = new_name.to_owned();
    Ok(profile)
  }

  /// Delete a profile and all of its history.
  pub async fn delete_profile(&mut self, name: &str) -> Result<Profile> {
    let profile = self.require_profile(name).await?;
    let deleted = self
      .store
      .delete_profile(profile.profile_id)
      .await
      .map_err(Error::persistence)?;
    if !deleted {
      return Err(Error::ProfileNotFound(name.to_owned()));
    }
    if self.context.clear_if(profile.profile_id) {
      tracing::info!(profile = %profile.name, "active profile deleted; selection cleared");
    } else {
      tracing::info!(profile = %profile.name, "profile deleted");
    }
    Ok(profile)
  }

  /// The currently selected profile, freshly loaded.
  pub async fn active_profile(&self) -> Result<Profile> {
    let id = self.context.require_active()?;
    self
      .store
      .get_profile(id)
      .await
      .map_err(Error::persistence)?
      .ok_or(Error::NoActiveProfile)
  }

  async fn lookup_profile(&self, name: &str) -> Result<Option<Profile>> {
    self
      .store
      .find_profile(name.to_owned())
      .await
      .map_err(Error::persistence)
  }

  async fn require_profile(&self, name: &str) -> Result<Profile> {
    self
      .lookup_profile(name)
      .await?
      .ok_or_else(|| Error::ProfileNotFound(name.to_owned()))
  }

  // ── Sessions ──────────────────────────────────────────────────────────

  /// Record the start of a practice run for the active profile.
  pub async fn start_session(&self, category: &str, planned_minutes: u32) -> Result<Session> {
    let profile = self.active_profile().await?;
    let category = category.trim();
    if category.is_empty() {
      return Err(Error::InvalidSession("a category is required"));
    }
    if planned_minutes == 0 {
      return Err(Error::InvalidSession("a duration is required"));
    }

    let session = Session {
      session_id:       Uuid::new_v4(),
      profile_id:       profile.profile_id,
      category:         category.to_owned(),
      date:             DayStamp::from_date(self.today()),
      time_started:     self.clock.now(),
      time_completed:   None,
      duration_minutes: planned_minutes,
    };
    self
      .store
      .insert_session(session.clone())
      .await
      .map_err(Error::persistence)?;
    tracing::info!(
      session = %session.session_id,
      profile = %profile.name,
      category = %session.category,
      minutes = planned_minutes,
      "practice session started"
    );
    Ok(session)
  }

  pub async fn sessions(&self) -> Result<Vec<Session>> {
    let id = self.context.require_active()?;
    self.store.list_sessions(id).await.map_err(Error::persistence)
  }

  /// Handle the end of a practice run.
  ///
  /// Returns `Ok(None)` when no session can be matched to the event; nothing
  /// is written in that case.
  pub async fn complete_session(
    &mut self,
    event: CompletionEvent,
  ) -> Result<Option<CompletionReport>> {
    let profile = self.active_profile().await?;
    let sessions = self
      .store
      .list_sessions(profile.profile_id)
      .await
      .map_err(Error::persistence)?;

    let today = self.today();
    let today_stamp = DayStamp::from_date(today);

    let found = match event.session_id {
      Some(id) => Some(
        sessions
          .iter()
          .find(|s| s.session_id == id)
          .ok_or(Error::SessionNotFound(id))?,
      ),
      None => reconcile::find_active_session(
        &sessions,
        profile.profile_id,
        &today_stamp,
        self.clock.now(),
      ),
    };
    let Some(found) = found else {
      tracing::info!(profile = %profile.name, "no active session to finalize");
      return Ok(None);
    };

    let mut session = found.clone();
    reconcile::finalize_session(&mut session, event.elapsed_seconds)?;

    let streak = reconcile::streak_for_session(
      &sessions,
      &profile,
      &session,
      today,
      event.elapsed_seconds,
      self.config.streak_min_seconds,
    );

    let mut updated = profile.clone();
    let award = gamify::apply_session_completion(&mut updated, event.elapsed_seconds);
    updated.streak = streak.streak;

    let targets = self
      .store
      .list_targets(profile.profile_id)
      .await
      .map_err(Error::persistence)?;
    let mut target_ids = Vec::new();
    let mut completed_targets = Vec::new();
    for task in &event.completed_targets {
      match targets.iter().find(|t| &t.task == task) {
        Some(t) => {
          if !t.is_completed {
            target_ids.push(t.target_id);
          }
          if !completed_targets.contains(&t.task) {
            completed_targets.push(t.task.clone());
          }
        }
        None => tracing::warn!(%task, "completed target is unknown; ignoring"),
      }
    }

    let commit = CompletionCommit {
      session_id: session.session_id,
      elapsed_seconds: event.elapsed_seconds,
      profile: updated.clone(),
      target_ids,
      completed_on: today_stamp,
    };
    let applied = self
      .store
      .commit_completion(commit)
      .await
      .map_err(Error::persistence)?;
    if !applied {
      return Err(Error::AlreadyFinalized(session.session_id));
    }

    tracing::info!(
      session = %session.session_id,
      elapsed = event.elapsed_seconds,
      points_gained = award.points_gained,
      level = updated.level,
      streak = updated.streak,
      streak_incremented = streak.incremented,
      "practice session completed"
    );

    Ok(Some(CompletionReport {
      session,
      profile: updated,
      award,
      streak,
      completed_targets,
    }))
  }

  /// Rate how hard the category of a finished session felt.
  pub async fn rate_session(&self, session_id: Uuid, difficulty: Difficulty) -> Result<CategoryRating> {
    let id = self.context.require_active()?;
    let session = self
      .store
      .list_sessions(id)
      .await
      .map_err(Error::persistence)?
      .into_iter()
      .find(|s| s.session_id == session_id)
      .ok_or(Error::SessionNotFound(session_id))?;
    if !session.is_finalized() {
      return Err(Error::SessionNotFinalized(session_id));
    }

    let rating = CategoryRating {
      rating_id: Uuid::new_v4(),
      profile_id: id,
      session_id,
      category: session.category,
      date: session.date,
      difficulty,
    };
    let inserted = self
      .store
      .insert_rating(rating.clone())
      .await
      .map_err(Error::persistence)?;
    if !inserted {
      return Err(Error::AlreadyRated(session_id));
    }
    tracing::info!(session = %session_id, %difficulty, "category difficulty saved");
    Ok(rating)
  }

  // ── Targets ───────────────────────────────────────────────────────────

  pub async fn add_target(&self, task: &str) -> Result<Target> {
    let id = self.context.require_active()?;
    let task = task.trim();
    if task.is_empty() {
      return Err(Error::EmptyTarget);
    }
    let existing = self.store.list_targets(id).await.map_err(Error::persistence)?;
    if existing.iter().any(|t| t.task == task) {
      return Err(Error::DuplicateTarget(task.to_owned()));
    }

    let target = Target::new(id, task);
    self
      .store
      .insert_target(target.clone())
      .await
      .map_err(Error::persistence)?;
    tracing::info!(%task, "target added");
    Ok(target)
  }

  pub async fn list_targets(&self, filter: TargetFilter) -> Result<Vec<Target>> {
    let id = self.context.require_active()?;
    let mut targets = self.store.list_targets(id).await.map_err(Error::persistence)?;
    targets.retain(|t| filter.matches(t));
    Ok(targets)
  }

  pub async fn complete_target(&self, task: &str) -> Result<Target> {
    let mut target = self.require_target(task).await?;
    if target.is_completed {
      return Err(Error::TargetAlreadyCompleted(target.task));
    }

    let on = DayStamp::from_date(self.today());
    let completed = self
      .store
      .complete_target(target.target_id, on.clone())
      .await
      .map_err(Error::persistence)?;
    if !completed {
      return Err(Error::TargetAlreadyCompleted(target.task));
    }
    tracing::info!(%task, "target completed");
    target.is_completed = true;
    target.date_completed = Some(on);
    Ok(target)
  }

  pub async fn delete_target(&self, task: &str) -> Result<Target> {
    let target = self.require_target(task).await?;
    let deleted = self
      .store
      .delete_target(target.target_id)
      .await
      .map_err(Error::persistence)?;
    if !deleted {
      return Err(Error::TargetNotFound(task.to_owned()));
    }
    tracing::info!(%task, "target deleted");
    Ok(target)
  }

  async fn require_target(&self, task: &str) -> Result<Target> {
    let id = self.context.require_active()?;
    self
      .store
      .list_targets(id)
      .await
      .map_err(Error::persistence)?
      .into_iter()
      .find(|t| t.task == task)
      .ok_or_else(|| Error::TargetNotFound(task.to_owned()))
  }

  // ── Reports ───────────────────────────────────────────────────────────

  pub async fn weekly_summary(&self) -> Result<WeeklySummary> {
    let profile = self.active_profile().await?;
    let id = profile.profile_id;
    let sessions = self.store.list_sessions(id).await.map_err(Error::persistence)?;
    let ratings = self.store.list_ratings(id).await.map_err(Error::persistence)?;
    let targets = self.store.list_targets(id).await.map_err(Error::persistence)?;
    Ok(summary::weekly_summary(&profile, &sessions, &ratings, &targets, self.today()))
  }

  /// Practice detail for `date`, today when `None`.
  pub async fn day_detail(&self, date: Option<NaiveDate>) -> Result<DayDetail> {
    let profile = self.active_profile().await?;
    let id = profile.profile_id;
    let sessions = self.store.list_sessions(id).await.map_err(Error::persistence)?;
    let targets = self.store.list_targets(id).await.map_err(Error::persistence)?;
    let date = date.unwrap_or_else(|| self.today());
    Ok(summary::day_detail(&profile, &sessions, &targets, date))
  }

  pub async fn achievements(&self) -> Result<Achievements> {
    Ok(Achievements::for_profile(&self.active_profile().await?))
  }
}

fn valid_name(name: &str) -> Result<&str> {
  let name = name.trim();
  if name.is_empty() { Err(Error::InvalidProfileName) } else { Ok(name) }
}
