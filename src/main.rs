use std::path::PathBuf;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use airc_extract::config::{self, AppConfig, ConfigError};
use airc_extract::db::{self, DatabaseError};
use airc_extract::report::SeriesError;
use airc_extract::runner;

#[derive(Parser)]
#[command(name = "airc-extract", version, about = "Decode automated chest-CT structured reports into a measurement database")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write the configuration file and create the measurement database
    Init {
        /// Root directory whose subdirectories are per-series report folders
        #[arg(long)]
        dicom_root: PathBuf,
        /// Output SQLite database (default: ~/.airc_extract/airc.db)
        #[arg(long)]
        data_db: Option<PathBuf>,
        /// Default tracing filter, e.g. "info" or "airc_extract=debug"
        #[arg(long)]
        log_filter: Option<String>,
    },
    /// Verify the configured paths and database connection
    Check,
    /// Decode series directories and persist their measurements
    Extract {
        /// Series directories to process (default: every subdirectory of
        /// the configured dicom root)
        series_dirs: Vec<PathBuf>,
        /// Also write each series report as JSON next to the database
        #[arg(short = 'j', long)]
        save_json: bool,
    },
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    #[error("all {0} series failed")]
    AllSeriesFailed(usize),
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(config::default_config_path);

    match cli.command {
        Command::Init {
            dicom_root,
            data_db,
            log_filter,
        } => {
            let mut app_config = AppConfig::new(dicom_root, data_db);
            if let Some(filter) = log_filter {
                app_config.log_filter = filter;
            }
            init_tracing(&app_config.log_filter);

            app_config.save(&config_path)?;
            let _conn = db::open_database(&app_config.data_db)?;
            tracing::info!(
                config = %config_path.display(),
                data_db = %app_config.data_db.display(),
                dicom_root = %app_config.dicom_root.display(),
                "configuration written and database initialized"
            );
            Ok(())
        }
        Command::Check => {
            let app_config = AppConfig::load(&config_path)?;
            init_tracing(&app_config.log_filter);

            if !app_config.dicom_root.is_dir() {
                return Err(SeriesError::DirectoryMissing(app_config.dicom_root).into());
            }
            let _conn = db::open_database(&app_config.data_db)?;
            tracing::info!("dicom root and measurement database are reachable");
            Ok(())
        }
        Command::Extract {
            series_dirs,
            save_json,
        } => {
            let app_config = AppConfig::load(&config_path)?;
            init_tracing(&app_config.log_filter);

            let dirs = if series_dirs.is_empty() {
                runner::scan_series_dirs(&app_config.dicom_root)?
            } else {
                series_dirs
            };
            if dirs.is_empty() {
                tracing::warn!(root = %app_config.dicom_root.display(), "no series directories found");
                return Ok(());
            }

            let json_dir = save_json.then(|| {
                app_config
                    .json_dir
                    .clone()
                    .unwrap_or_else(|| config::app_data_dir().join("reports"))
            });

            let mut conn = db::open_database(&app_config.data_db)?;
            let summary = runner::run_batch(&mut conn, &dirs, json_dir.as_deref());
            tracing::info!(
                processed = summary.processed,
                failed = summary.failed,
                "batch finished"
            );
            if summary.processed == 0 && summary.failed > 0 {
                return Err(CliError::AllSeriesFailed(summary.failed));
            }
            Ok(())
        }
    }
}

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);
}
