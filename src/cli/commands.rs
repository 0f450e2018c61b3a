//! CLI command implementations
//!
//! Boot sequence for `serve` and `report`:
//! 1. Load and validate configuration, apply the log level
//! 2. Load the data file and verify its checksum
//! 3. Rebuild the in-memory store at the recorded commit
//! 4. Build the lifecycle engine
//!
//! Any failure before step 4 completes is fatal; nothing is served from
//! a partially loaded state.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::ApiHandler;
use crate::lifecycle::{EngineConfig, LifecycleEngine};
use crate::observability::{log_event, log_event_with_fields, Event, Logger, Severity};
use crate::reporting;
use crate::store::{load_snapshot, save_snapshot, MemoryStore, Snapshot, StoreError};

use super::args::{Command, ReportKind};
use super::errors::{CliError, CliResult};
use super::io::{read_requests, write_error, write_json, write_response};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Snapshot file holding all committed records (required)
    pub data_file: String,

    /// Minimum log severity: trace, info, warn, error or fatal
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Attempts per operation before a commit conflict is returned
    #[serde(default = "default_max_commit_attempts")]
    pub max_commit_attempts: u32,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_commit_attempts() -> u32 {
    EngineConfig::default().max_commit_attempts
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_file.trim().is_empty() {
            return Err(CliError::config_error("data_file must not be empty"));
        }
        self.severity()?;
        self.engine_config()
            .validate()
            .map_err(CliError::config_error)?;
        Ok(())
    }

    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_file)
    }

    pub fn severity(&self) -> CliResult<Severity> {
        self.log_level
            .parse::<Severity>()
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default().with_max_commit_attempts(self.max_commit_attempts)
    }
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::Report { config, kind } => report(&config, kind),
    }
}

/// Create an empty data file
///
/// Refuses to overwrite an existing one.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_file = config.data_path();

    if data_file.exists() {
        return Err(CliError::already_initialized(data_file));
    }
    if let Some(parent) = data_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::config_error(format!("Failed to create directory {:?}: {}", parent, e))
        })?;
    }

    save_snapshot(data_file, &Snapshot::empty()).map_err(CliError::persist_failed)?;

    write_response(
        &mut io::stdout(),
        json!({"initialized": true, "data_file": config.data_file}),
    )
}

/// Boot, then answer JSON-lines requests from stdin until EOF
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let stdin = io::stdin();
    serve_with(&config, stdin.lock(), &mut io::stdout())
}

/// Serving loop over arbitrary input and output.
///
/// The data file is rewritten after every request that committed a write,
/// before the next request is read.
pub fn serve_with<R: BufRead, W: Write>(config: &Config, input: R, out: &mut W) -> CliResult<()> {
    let store = boot(config)?;
    let engine = LifecycleEngine::new(Arc::clone(&store)).with_config(config.engine_config());
    let handler = ApiHandler::new(engine);

    log_event(Event::Serving);
    let mut handled = 0u64;

    for line in read_requests(input) {
        match line {
            Ok(line) => {
                let processed = handler.process(&line);
                handled += 1;
                if processed.wrote {
                    persist(&store, config.data_path())?;
                    handler.engine().metrics().increment_snapshots();
                }
                write_json(out, &processed.response.to_json())?;
            }
            Err(e) => {
                // I/O error reading - this is fatal
                write_error(out, e.code_str(), e.message())?;
                return Err(e);
            }
        }
    }

    let metrics = serde_json::to_string(&handler.engine().metrics().snapshot())?;
    log_event_with_fields(
        Event::ShutdownComplete,
        &[("requests", &handled.to_string()), ("metrics", &metrics)],
    );
    Ok(())
}

/// Print one report and exit
pub fn report(config_path: &Path, kind: ReportKind) -> CliResult<()> {
    let config = load_config(config_path)?;
    report_with(&config, kind, &mut io::stdout())
}

pub fn report_with<W: Write>(config: &Config, kind: ReportKind, out: &mut W) -> CliResult<()> {
    let store = boot(config)?;
    let engine = LifecycleEngine::new(Arc::clone(&store)).with_config(config.engine_config());
    let today = engine.today();
    let report_err = |e: StoreError| CliError::boot_failed(format!("Report failed: {}", e));

    let data = match kind {
        ReportKind::Population => {
            let stats = reporting::population_stats(store.as_ref(), today).map_err(report_err)?;
            serde_json::to_value(stats)?
        }
        ReportKind::Breeding => {
            let success = reporting::breeding_success(store.as_ref()).map_err(report_err)?;
            serde_json::to_value(success)?
        }
        ReportKind::Feed => {
            let feed = reporting::feed_consumption(store.as_ref(), today).map_err(report_err)?;
            serde_json::to_value(feed)?
        }
    };

    write_response(out, data)
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    log_event(Event::BootStart);
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.severity()?);
    log_event_with_fields(Event::ConfigLoaded, &[("data_file", &config.data_file)]);
    Ok(config)
}

/// Load the data file into a fresh store.
///
/// FATAL: a missing, unreadable or corrupt data file halts startup.
fn boot(config: &Config) -> CliResult<Arc<MemoryStore>> {
    let data_file = config.data_path();
    if !data_file.exists() {
        return Err(CliError::not_initialized(data_file));
    }

    let snapshot = load_snapshot(data_file).map_err(|e| {
        if matches!(e, StoreError::Corrupt(_)) {
            log_event_with_fields(
                Event::SnapshotCorrupt,
                &[("data_file", &config.data_file), ("reason", &e.to_string())],
            );
        }
        CliError::boot_failed(format!("Snapshot load failed: {}", e))
    })?;

    let commit = snapshot.commit.to_string();
    let records = snapshot.records.len().to_string();
    let store = MemoryStore::from_snapshot(snapshot)
        .map_err(|e| CliError::boot_failed(format!("Snapshot rebuild failed: {}", e)))?;

    log_event_with_fields(
        Event::SnapshotLoaded,
        &[("commit", &commit), ("records", &records)],
    );
    log_event(Event::BootComplete);
    Ok(Arc::new(store))
}

fn persist(store: &MemoryStore, data_file: &Path) -> CliResult<()> {
    let snapshot = store.snapshot().map_err(CliError::persist_failed)?;
    save_snapshot(data_file, &snapshot).map_err(CliError::persist_failed)?;
    log_event_with_fields(
        Event::SnapshotSaved,
        &[("commit", &snapshot.commit.to_string())],
    );
    Ok(())
}
