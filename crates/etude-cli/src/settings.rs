//! Layered configuration: optional TOML file, then `ETUDE_*` environment
//! variables, then command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use etude_core::{reconcile::DEFAULT_STREAK_MIN_SECONDS, tracker::EngineConfig};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite database file. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:         PathBuf,
  /// Elapsed seconds a session must exceed to extend the streak.
  #[serde(default = "default_streak_min_seconds")]
  pub streak_min_seconds: u32,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/etude/etude.db") }

fn default_streak_min_seconds() -> u32 { DEFAULT_STREAK_MIN_SECONDS }

impl Settings {
  /// Read `file` (if it exists) and the environment.
  pub fn load(file: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(file).required(false))
      .add_source(config::Environment::with_prefix("ETUDE").try_parsing(true))
      .build()
      .context("failed to read config file")?;

    let mut settings: Settings = settings
      .try_deserialize()
      .context("failed to deserialise settings")?;
    settings.store_path = expand_tilde(&settings.store_path);
    Ok(settings)
  }

  pub fn engine(&self) -> EngineConfig {
    EngineConfig { streak_min_seconds: self.streak_min_seconds }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_gives_defaults() {
    let settings = Settings::load(Path::new("/nonexistent/etude.toml")).unwrap();
    assert_eq!(settings.streak_min_seconds, DEFAULT_STREAK_MIN_SECONDS);
    assert!(settings.store_path.ends_with(".local/share/etude/etude.db"));
  }

  #[test]
  fn tilde_only_expands_as_prefix() {
    assert_eq!(expand_tilde(Path::new("/tmp/~/x.db")), PathBuf::from("/tmp/~/x.db"));
    assert_eq!(expand_tilde(Path::new("practice.db")), PathBuf::from("practice.db"));
  }
}
