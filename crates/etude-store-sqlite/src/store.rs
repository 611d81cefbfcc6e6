//! [`SqliteStore`]: the SQLite implementation of [`PracticeStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use etude_core::{
  profile::Profile,
  rating::CategoryRating,
  session::Session,
  store::{CompletionCommit, PracticeStore},
  target::Target,
  time::DayStamp,
};

use crate::{
  Result,
  encode::{
    RawProfile, RawRating, RawSession, RawTarget, decode_uuid, encode_dt, encode_time,
    encode_uuid,
  },
  schema::SCHEMA,
};

/// Settings key of the active profile selection.
const ACTIVE_PROFILE_KEY: &str = "active_profile";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A practice store backed by a single SQLite file.
///
/// Clones share one connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one profile by an arbitrary unique column.
  async fn profile_where(&self, column: &'static str, value: String) -> Result<Option<Profile>> {
    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM profiles WHERE {column} = ?1", RawProfile::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], RawProfile::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }
}

// ─── PracticeStore impl ──────────────────────────────────────────────────────

impl PracticeStore for SqliteStore {
  type Error = crate::Error;

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn insert_profile(&self, profile: Profile) -> Result<()> {
    let id_str = encode_uuid(profile.profile_id);
    let at_str = encode_dt(profile.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (
             profile_id, name, points, level, streak, longest_session, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            profile.name,
            profile.points,
            profile.level,
            profile.streak,
            profile.longest_session,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    self.profile_where("profile_id", encode_uuid(id)).await
  }

  async fn find_profile(&self, name: String) -> Result<Option<Profile>> {
    self.profile_where("name", name).await
  }

  async fn list_profiles(&self) -> Result<Vec<Profile>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let sql = format!("SELECT {} FROM profiles ORDER BY name, rowid", RawProfile::COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_profile).collect()
  }

  async fn rename_profile(&self, id: Uuid, name: String) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET name = ?2 WHERE profile_id = ?1",
          rusqlite::params![id_str, name],
        )?)
      })
      .await?;
    Ok(changed == 1)
  }

  async fn delete_profile(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        // Children go through ON DELETE CASCADE.
        let deleted = tx.execute(
          "DELETE FROM profiles WHERE profile_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM settings WHERE key = ?1 AND value = ?2",
          rusqlite::params![ACTIVE_PROFILE_KEY, id_str],
        )?;
        tx.commit()?;
        Ok(deleted)
      })
      .await?;
    Ok(deleted == 1)
  }

  async fn active_profile_id(&self) -> Result<Option<Uuid>> {
    let raw: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE key = ?1",
              rusqlite::params![ACTIVE_PROFILE_KEY],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw.as_deref().map(decode_uuid).transpose()
  }

  async fn set_active_profile_id(&self, id: Option<Uuid>) -> Result<()> {
    let id_str = id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        match id_str {
          Some(v) => conn.execute(
            "INSERT INTO settings (key, value) VALUES (?1, ?2)
             ON CONFLICT (key) DO UPDATE SET value = excluded.value",
            rusqlite::params![ACTIVE_PROFILE_KEY, v],
          )?,
          None => conn.execute(
            "DELETE FROM settings WHERE key = ?1",
            rusqlite::params![ACTIVE_PROFILE_KEY],
          )?,
        };
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn insert_session(&self, session: Session) -> Result<()> {
    let session_id_str = encode_uuid(session.session_id);
    let profile_id_str = encode_uuid(session.profile_id);
    let date_str       = session.date.as_str().to_owned();
    let started_str    = encode_time(session.time_started);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO sessions (
             session_id, profile_id, category, date,
             time_started, time_completed, duration_minutes
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            session_id_str,
            profile_id_str,
            session.category,
            date_str,
            started_str,
            session.time_completed,
            session.duration_minutes,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_sessions(&self, profile_id: Uuid) -> Result<Vec<Session>> {
    let id_str = encode_uuid(profile_id);

    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM sessions WHERE profile_id = ?1 ORDER BY rowid",
          RawSession::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawSession::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  async fn commit_completion(&self, commit: CompletionCommit) -> Result<bool> {
    let session_id_str = encode_uuid(commit.session_id);
    let profile_id_str = encode_uuid(commit.profile.profile_id);
    let target_ids: Vec<String> = commit.target_ids.iter().copied().map(encode_uuid).collect();
    let completed_on   = commit.completed_on.as_str().to_owned();
    let profile        = commit.profile;
    let elapsed        = commit.elapsed_seconds;

    let applied = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let finalized = tx.execute(
          "UPDATE sessions SET time_completed = ?2
           WHERE session_id = ?1 AND time_completed IS NULL",
          rusqlite::params![session_id_str, elapsed],
        )?;
        if finalized != 1 {
          // Dropping `tx` rolls back.
          return Ok(false);
        }

        tx.execute(
          "UPDATE profiles
           SET points = ?2, level = ?3, streak = ?4, longest_session = ?5
           WHERE profile_id = ?1",
          rusqlite::params![
            profile_id_str,
            profile.points,
            profile.level,
            profile.streak,
            profile.longest_session,
          ],
        )?;

        {
          let mut stmt = tx.prepare(
            "UPDATE targets SET is_completed = 1, date_completed = ?2
             WHERE target_id = ?1 AND is_completed = 0",
          )?;
          for id in &target_ids {
            stmt.execute(rusqlite::params![id, completed_on])?;
          }
        }

        tx.commit()?;
        Ok(true)
      })
      .await?;
    Ok(applied)
  }

  // ── Ratings ───────────────────────────────────────────────────────────────

  async fn insert_rating(&self, rating: CategoryRating) -> Result<bool> {
    let rating_id_str  = encode_uuid(rating.rating_id);
    let profile_id_str = encode_uuid(rating.profile_id);
    let session_id_str = encode_uuid(rating.session_id);
    let date_str       = rating.date.as_str().to_owned();
    let difficulty     = rating.difficulty.get();

    let inserted = self
      .conn
      .call(move |conn| {
        // The UNIQUE (session_id) constraint makes a second rating a no-op.
        Ok(conn.execute(
          "INSERT INTO ratings (
             rating_id, profile_id, session_id, category, date, difficulty
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (session_id) DO NOTHING",
          rusqlite::params![
            rating_id_str,
            profile_id_str,
            session_id_str,
            rating.category,
            date_str,
            difficulty,
          ],
        )?)
      })
      .await?;
    Ok(inserted == 1)
  }

  async fn list_ratings(&self, profile_id: Uuid) -> Result<Vec<CategoryRating>> {
    let id_str = encode_uuid(profile_id);

    let raws: Vec<RawRating> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM ratings WHERE profile_id = ?1 ORDER BY rowid",
          RawRating::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawRating::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRating::into_rating).collect()
  }

  // ── Targets ───────────────────────────────────────────────────────────────

  async fn insert_target(&self, target: Target) -> Result<()> {
    let target_id_str  = encode_uuid(target.target_id);
    let profile_id_str = encode_uuid(target.profile_id);
    let date_str       = target.date_completed.as_ref().map(|d| d.as_str().to_owned());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO targets (
             target_id, profile_id, task, is_completed, date_completed
           ) VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            target_id_str,
            profile_id_str,
            target.task,
            target.is_completed,
            date_str,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn list_targets(&self, profile_id: Uuid) -> Result<Vec<Target>> {
    let id_str = encode_uuid(profile_id);

    let raws: Vec<RawTarget> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM targets WHERE profile_id = ?1 ORDER BY task, rowid",
          RawTarget::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawTarget::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTarget::into_target).collect()
  }

  async fn complete_target(&self, id: Uuid, on: DayStamp) -> Result<bool> {
    let id_str   = encode_uuid(id);
    let date_str = on.as_str().to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE targets SET is_completed = 1, date_completed = ?2
           WHERE target_id = ?1 AND is_completed = 0",
          rusqlite::params![id_str, date_str],
        )?)
      })
      .await?;
    Ok(changed == 1)
  }

  async fn delete_target(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM targets WHERE target_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(deleted == 1)
  }
}
