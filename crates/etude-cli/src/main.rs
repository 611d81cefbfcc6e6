//! `etude`: command-line music practice tracker.
//!
//! # Usage
//!
//! ```
//! etude profile add Piano
//! etude profile select Piano
//! etude practice "Major Scales" --minutes 15
//! etude summary --json
//! ```

mod render;
mod settings;

use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use etude_core::{
  rating::Difficulty,
  session::CompletionEvent,
  target::TargetFilter,
  time::{SystemClock, format_duration},
  timer::PracticeTimer,
  tracker::Tracker,
};
use etude_store_sqlite::SqliteStore;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

type AppTracker = Tracker<SqliteStore, SystemClock>;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "etude", author, version, about = "Music practice tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "etude.toml")]
  config: PathBuf,

  /// SQLite database path; overrides `store_path` from the config.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Manage instrument profiles.
  Profile {
    #[command(subcommand)]
    action: ProfileCommand,
  },
  /// Record the start of a session without running the timer.
  Start {
    category: String,
    /// Planned length in minutes.
    #[arg(short, long, default_value_t = 30)]
    minutes:  u32,
  },
  /// Finalize a session started with `start`.
  Finish {
    /// Session to finalize; defaults to today's most recently started one.
    #[arg(long)]
    session:  Option<Uuid>,
    /// Seconds actually practised.
    #[arg(long)]
    elapsed:  u32,
    /// Target completed during the run; repeatable.
    #[arg(long = "target")]
    targets:  Vec<String>,
    #[arg(long)]
    json:     bool,
  },
  /// Start a session and count it down; Ctrl-C ends it early.
  Practice {
    category: String,
    #[arg(short, long, default_value_t = 30)]
    minutes:  u32,
    /// Target completed during the run; repeatable.
    #[arg(long = "target")]
    targets:  Vec<String>,
    #[arg(long)]
    json:     bool,
  },
  /// Rate how hard a finished session's category felt, from 1 to 3.
  Rate {
    session:    Uuid,
    #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
    difficulty: u8,
  },
  /// Manage practice targets.
  Target {
    #[command(subcommand)]
    action: TargetCommand,
  },
  /// Summary of the last seven days.
  Summary {
    #[arg(long)]
    json: bool,
  },
  /// Sessions and targets of one day.
  Day {
    /// Day as YYYY-MM-DD; defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    json: bool,
  },
  /// Level, points, streak and badge of the active profile.
  Achievements {
    #[arg(long)]
    json: bool,
  },
}

#[derive(Subcommand)]
enum ProfileCommand {
  Add { name: String },
  List,
  Select { name: String },
  Rename { name: String, new_name: String },
  /// Delete a profile and all of its history.
  Delete { name: String },
}

#[derive(Subcommand)]
enum TargetCommand {
  Add { task: String },
  List {
    #[arg(long, value_enum, default_value = "all")]
    filter: FilterArg,
  },
  Complete { task: String },
  Delete { task: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
  All,
  Todo,
  Completed,
}

impl From<FilterArg> for TargetFilter {
  fn from(f: FilterArg) -> Self {
    match f {
      FilterArg::All => TargetFilter::All,
      FilterArg::Todo => TargetFilter::ToDo,
      FilterArg::Completed => TargetFilter::Completed,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so `--json` output stays parseable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(path) = cli.store {
    settings.store_path = settings::expand_tilde(&path);
  }

  if let Some(dir) = settings.store_path.parent()
    && !dir.as_os_str().is_empty()
  {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create {}", dir.display()))?;
  }
  let store = SqliteStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;

  let mut tracker = Tracker::open(store, SystemClock, settings.engine())
    .await
    .context("failed to load tracker state")?;

  run(&mut tracker, cli.command).await
}

async fn run(tracker: &mut AppTracker, command: Command) -> anyhow::Result<()> {
  match command {
    Command::Profile { action } => profile(tracker, action).await?,

    Command::Start { category, minutes } => {
      let session = tracker.start_session(&category, minutes).await?;
      render::started(&session);
    }

    Command::Finish { session, elapsed, targets, json } => {
      let event = CompletionEvent {
        session_id:        session,
        elapsed_seconds:   elapsed,
        completed_targets: targets,
      };
      finish(tracker, event, json).await?;
    }

    Command::Practice { category, minutes, targets, json } => {
      let session = tracker.start_session(&category, minutes).await?;
      let timer = countdown(PracticeTimer::from_minutes(minutes)).await?;
      finish(tracker, timer.finish(Some(session.session_id), targets), json).await?;
    }

    Command::Rate { session, difficulty } => {
      let difficulty = Difficulty::try_from(difficulty)?;
      let rating = tracker.rate_session(session, difficulty).await?;
      println!("Rated {} as {}/3.", rating.category, rating.difficulty);
    }

    Command::Target { action } => target(tracker, action).await?,

    Command::Summary { json } => {
      let summary = tracker.weekly_summary().await?;
      if json { render::json(&summary)? } else { render::weekly(&summary) }
    }

    Command::Day { date, json } => {
      let detail = tracker.day_detail(date).await?;
      if json { render::json(&detail)? } else { render::day(&detail) }
    }

    Command::Achievements { json } => {
      let achievements = tracker.achievements().await?;
      if json { render::json(&achievements)? } else { render::achievements(&achievements) }
    }
  }
  Ok(())
}

async fn profile(tracker: &mut AppTracker, action: ProfileCommand) -> anyhow::Result<()> {
  match action {
    ProfileCommand::Add { name } => {
      let profile = tracker.add_profile(&name).await?;
      println!("Added profile {}.", profile.name);
    }
    ProfileCommand::List => {
      let profiles = tracker.list_profiles().await?;
      render::profiles(&profiles, tracker.context().active());
    }
    ProfileCommand::Select { name } => {
      let profile = tracker.select_profile(&name).await?;
      println!("Now practising as {}.", profile.name);
    }
    ProfileCommand::Rename { name, new_name } => {
      let profile = tracker.rename_profile(&name, &new_name).await?;
      println!("Renamed {name} to {}.", profile.name);
    }
    ProfileCommand::Delete { name } => {
      let profile = tracker.delete_profile(&name).await?;
      println!("Deleted profile {}.", profile.name);
    }
  }
  Ok(())
}

async fn target(tracker: &AppTracker, action: TargetCommand) -> anyhow::Result<()> {
  match action {
    TargetCommand::Add { task } => {
      let target = tracker.add_target(&task).await?;
      println!("Added target: {}", target.task);
    }
    TargetCommand::List { filter } => {
      render::targets(&tracker.list_targets(filter.into()).await?);
    }
    TargetCommand::Complete { task } => {
      let target = tracker.complete_target(&task).await?;
      println!("Completed target: {}", target.task);
    }
    TargetCommand::Delete { task } => {
      let target = tracker.delete_target(&task).await?;
      println!("Deleted target: {}", target.task);
    }
  }
  Ok(())
}

async fn finish(tracker: &mut AppTracker, event: CompletionEvent, json: bool) -> anyhow::Result<()> {
  match tracker.complete_session(event).await? {
    Some(report) if json => render::json(&report)?,
    Some(report) => render::completion(&report),
    None => println!("No session in progress today."),
  }
  Ok(())
}

// ─── Timer ────────────────────────────────────────────────────────────────────

/// Tick `timer` once a second until it finishes or Ctrl-C cancels it.
async fn countdown(mut timer: PracticeTimer) -> anyhow::Result<PracticeTimer> {
  let mut interval = tokio::time::interval(Duration::from_secs(1));
  // The first tick completes immediately.
  interval.tick().await;

  let ctrl_c = tokio::signal::ctrl_c();
  tokio::pin!(ctrl_c);

  eprintln!("Practising; press Ctrl-C to stop early.");
  loop {
    tokio::select! {
      _ = interval.tick() => {
        let state = timer.tick();
        eprint!("\r{} remaining ", format_duration(timer.remaining()));
        if state.is_over() {
          break;
        }
      }
      res = &mut ctrl_c => {
        res.context("failed to listen for Ctrl-C")?;
        timer.cancel();
        tracing::info!(elapsed = timer.elapsed(), "practice stopped early");
        break;
      }
    }
  }
  eprintln!();
  Ok(timer)
}
