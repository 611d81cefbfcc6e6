//! Error types for `etude-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("no profile is selected")]
  NoActiveProfile,

  #[error("profile not found: {0:?}")]
  ProfileNotFound(String),

  #[error("a profile named {0:?} already exists")]
  DuplicateProfile(String),

  #[error("profile name must not be empty")]
  InvalidProfileName,

  #[error("session not found: {0}")]
  SessionNotFound(Uuid),

  #[error("session {0} is already finalized")]
  AlreadyFinalized(Uuid),

  #[error("session {0} has not been finalized yet")]
  SessionNotFinalized(Uuid),

  #[error("difficulty already saved for session {0}")]
  AlreadyRated(Uuid),

  #[error("difficulty must be between 1 and 3, got {0}")]
  InvalidDifficulty(u8),

  #[error("invalid session: {0}")]
  InvalidSession(&'static str),

  #[error("target task must not be empty")]
  EmptyTarget,

  #[error("target not found: {0:?}")]
  TargetNotFound(String),

  #[error("target already in progress: {0:?}")]
  DuplicateTarget(String),

  #[error("target {0:?} is already completed")]
  TargetAlreadyCompleted(String),

  #[error("malformed stored date {0:?}")]
  MalformedDate(String),

  /// The backing store rejected an operation. Nothing was applied.
  #[error("persistence error: {0}")]
  Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a store error.
  pub fn persistence<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Persistence(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
