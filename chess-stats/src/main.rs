//! chess-stats: collect game-review statistics and summarize a season.
//!
//! ```text
//! chess-stats [--db PATH] collect <CSV> [--pages-dir DIR] [--move-delay SECS] [--timeout SECS] [--poll-interval MS]
//! chess-stats [--db PATH] players [--json]
//! chess-stats [--db PATH] summary [--json]
//! chess-stats [--db PATH] manual <CODE> <WHITE> <BLACK> [--result R] [--pgn-file F] [--html-file F]
//! ```
//!
//! Defaults come from `CHESS_STATS_*` environment variables (see
//! `collector::config`); flags override them.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};

use chess::{now_timestamp, GameResult, ManualEntry, RecordError};
use chess_stats::display::{PlayerTable, RunOutcome, SavedGame, SeasonOverview};
use chess_stats::{load_game_ids, logging, GameListError};
use collector::config::{get_log_dir, parse_delay_secs};
use collector::{
    CollectorConfig, Database, GameRepository, Pipeline, PipelineError, SqliteGameRepository,
    StatsService, StoreError,
};
use extractor::{extract_manual_html, ExtractionError, SnapshotDirSource, TokioWait};

#[derive(Parser)]
#[command(
    name = "chess-stats",
    about = "Collect chess game-review statistics and summarize a season"
)]
struct Cli {
    /// SQLite database file. Defaults to $CHESS_STATS_DB_PATH, then chess_stats.db.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract reviews for every game id in a CSV file and store them.
    Collect {
        /// CSV with a `game_id` column (or ids / game URLs in the first column).
        csv: PathBuf,

        /// Directory of saved review pages named `<game_id>.html`.
        #[arg(long)]
        pages_dir: Option<PathBuf>,

        /// Seconds to pause between games.
        #[arg(long, value_parser = delay_arg)]
        move_delay: Option<Duration>,

        /// Seconds to wait for a review to finish before skipping the game.
        #[arg(long)]
        timeout: Option<u64>,

        /// Milliseconds between checks of the review page (at least 1).
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        poll_interval: Option<u64>,
    },

    /// Per-player statistics, most brilliant moves first.
    Players {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Season totals.
    Summary {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Record a game that has no automated review.
    Manual {
        /// Game code; becomes the game id.
        code: String,
        white: String,
        black: String,

        /// Result: 1-0, 0-1 or 1/2-1/2. Overrides any PGN or page result.
        #[arg(long, value_parser = result_arg)]
        result: Option<GameResult>,

        /// PGN file to read the result and Elo tags from (`-` for stdin).
        #[arg(long)]
        pgn_file: Option<PathBuf>,

        /// Saved review page for the game (for example a custom analysis board).
        #[arg(long)]
        html_file: Option<PathBuf>,
    },
}

#[derive(thiserror::Error)]
enum CliError {
    #[error("Database not found: {}. Run 'collect' first.", .0.display())]
    DatabaseMissing(PathBuf),

    #[error("No valid game IDs found in {}.", .0.display())]
    NoGameIds(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    GameList(#[from] GameListError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error("cannot write JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot set up log file: {0}")]
    Logging(#[from] tracing_appender::rolling::InitError),
}

// `main` returning Err prints the Debug form; show the message instead.
impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn delay_arg(value: &str) -> Result<Duration, String> {
    parse_delay_secs(value).ok_or_else(|| format!("{value:?} is not a non-negative number of seconds"))
}

fn result_arg(value: &str) -> Result<GameResult, String> {
    value
        .parse()
        .map_err(|_| format!("{value:?} is not one of 1-0, 0-1, 1/2-1/2"))
}

fn read_text(path: &Path) -> Result<String, CliError> {
    let read = if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        std::fs::read_to_string(path)
    };
    read.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

async fn open_existing(path: &Path) -> Result<SqliteGameRepository, CliError> {
    let db = Database::open_existing(path).await.map_err(|e| match e {
        StoreError::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound => {
            CliError::DatabaseMissing(path.to_path_buf())
        }
        other => CliError::Store(other),
    })?;
    Ok(SqliteGameRepository::new(db.pool().clone()))
}

async fn handle_collect(config: CollectorConfig, csv: &Path) -> Result<(), CliError> {
    let game_ids = load_game_ids(csv)?;
    if game_ids.is_empty() {
        return Err(CliError::NoGameIds(csv.to_path_buf()));
    }
    println!("Found {} game(s) to process.", game_ids.len());

    let db = Database::open(&config.db_path).await?;
    let store = SqliteGameRepository::new(db.pool().clone());
    let pages = SnapshotDirSource::new(&config.pages_dir);
    tracing::info!(
        db = %config.db_path.display(),
        pages = %config.pages_dir.display(),
        move_delay = ?config.pipeline.move_delay,
        timeout = ?config.pipeline.extractor.timeout,
        "Collecting"
    );

    let mut pipeline = Pipeline::new(pages, store, TokioWait, config.pipeline);
    let report = pipeline.run(&game_ids).await?;
    print!("{}", RunOutcome(&report));
    Ok(())
}

async fn handle_players(db_path: &Path, json: bool) -> Result<(), CliError> {
    let service = StatsService::new(open_existing(db_path).await?);
    let players = service.players().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&players)?);
    } else {
        print!("{}", PlayerTable(&players));
    }
    Ok(())
}

async fn handle_summary(db_path: &Path, json: bool) -> Result<(), CliError> {
    let service = StatsService::new(open_existing(db_path).await?);
    let summary = service.summary().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", SeasonOverview(&summary));
    }
    Ok(())
}

async fn handle_manual(
    db_path: &Path,
    mut entry: ManualEntry,
    pgn_file: Option<&Path>,
    html_file: Option<&Path>,
) -> Result<(), CliError> {
    if let Some(path) = pgn_file {
        entry = entry.with_pgn(read_text(path)?);
    }
    let record = match html_file {
        Some(path) => extract_manual_html(&read_text(path)?, entry, now_timestamp())?,
        None => entry.into_record()?,
    };

    let db = Database::open(db_path).await?;
    let store = SqliteGameRepository::new(db.pool().clone());
    store.upsert(&record).await?;
    tracing::info!(game_id = %record.game_id, "Stored manual entry");
    println!("{}", SavedGame(&record));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let _log_guard = logging::init(get_log_dir().as_deref())?;

    let cli = Cli::parse();
    let mut config = CollectorConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    match cli.command {
        Commands::Collect {
            csv,
            pages_dir,
            move_delay,
            timeout,
            poll_interval,
        } => {
            if let Some(dir) = pages_dir {
                config.pages_dir = dir;
            }
            if let Some(delay) = move_delay {
                config.pipeline.move_delay = delay;
            }
            if let Some(secs) = timeout {
                config.pipeline.extractor.timeout = Duration::from_secs(secs);
            }
            if let Some(ms) = poll_interval {
                config.pipeline.extractor.poll_interval = Duration::from_millis(ms);
            }
            handle_collect(config, &csv).await
        }
        Commands::Players { json } => handle_players(&config.db_path, json).await,
        Commands::Summary { json } => handle_summary(&config.db_path, json).await,
        Commands::Manual {
            code,
            white,
            black,
            result,
            pgn_file,
            html_file,
        } => {
            let mut entry = ManualEntry::new(code, white, black);
            if let Some(result) = result {
                entry = entry.with_result(result);
            }
            handle_manual(
                &config.db_path,
                entry,
                pgn_file.as_deref(),
                html_file.as_deref(),
            )
            .await
        }
    }
}
