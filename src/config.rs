// Configuration: command line arguments, `.env` loading and logging.
// Everything here runs once at startup, before any request is made.

use clap::Parser;
use env_logger::{Builder, Env, Target};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::DEFAULT_SERVER_URL;

#[derive(Parser, Debug)]
#[command(
    name = "unload-directory",
    about = "Unload the current directory from the lightweight image server"
)]
pub struct Cli {
    /// URL of the image server
    #[arg(long, default_value = DEFAULT_SERVER_URL, env = "IMAGE_SERVER_URL")]
    pub server: String,

    /// Show detailed information
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Give up on each request after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// What happened when looking for a `.env` file.
#[derive(Debug)]
pub enum EnvFile {
    Loaded(PathBuf),
    Missing,
    Invalid(String),
}

/// Load `.env` from the working directory or one of its parents into the
/// process environment. Variables already set are left alone. Must run
/// before `Cli::parse` so clap's `env` fallbacks can see the values.
pub fn load_env_file() -> EnvFile {
    match dotenvy::dotenv() {
        Ok(path) => EnvFile::Loaded(path),
        Err(e) if e.not_found() => EnvFile::Missing,
        Err(e) => EnvFile::Invalid(e.to_string()),
    }
}

/// Initialize stderr logging. `RUST_LOG` wins; otherwise `warn`, or `info`
/// in verbose mode.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .target(Target::Stderr)
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}

/// Report the `.env` outcome once the logger exists.
pub fn log_env_file(env_file: &EnvFile) {
    match env_file {
        EnvFile::Loaded(path) => {
            log::info!("Loaded environment variables from {}", path.display())
        }
        EnvFile::Missing => log::debug!("No .env file found, using process environment only"),
        EnvFile::Invalid(e) => log::warn!("Ignoring unreadable .env file: {}", e),
    }
}
