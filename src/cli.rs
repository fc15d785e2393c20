//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, init, validate, health), and their associated
//! argument structs. Every flag has an environment variable equivalent
//! for container deployments; this is the only place the process
//! environment is read.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::Overrides;

#[derive(Parser)]
#[command(
    name = "tollgate",
    version,
    about = "Session-gated forwarding proxy for the back-office console API",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        tollgate init                        Create a starter config\n  \
        tollgate run                         Start with ./tollgate.yaml\n  \
        tollgate run -c console.yaml         Start with a specific config"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the proxy server
    Run(Box<RunArgs>),

    /// Generate a starter config file
    Init(InitArgs),

    /// Validate a config file without starting
    Validate(ValidateArgs),

    /// Check health of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        tollgate run                                         Auto-detect config\n  \
        tollgate run -c console.yaml -p 8080 --pretty        Local dev mode\n  \
        BACKEND_URL=http://api:3000 SESSION_SECRET=... tollgate run")]
pub struct RunArgs {
    /// Config file path (.yaml, .json, .toml)
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[command(flatten)]
    pub overrides: OverrideArgs,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes
    #[arg(
        long,
        env = "MAX_BODY_SIZE",
        default_value_t = 1_048_576,
        help_heading = "Tuning"
    )]
    pub max_body: usize,
}

/// Settings that may come from flags or the environment and take
/// precedence over the config file.
#[derive(Args, Default)]
pub struct OverrideArgs {
    /// Public backend base URL
    #[arg(long, env = "BACKEND_URL", help_heading = "Backend")]
    pub backend_url: Option<String>,

    /// Network-internal backend base URL (preferred for forwarding)
    #[arg(long, env = "INTERNAL_BACKEND_URL", help_heading = "Backend")]
    pub internal_backend_url: Option<String>,

    /// Backend request timeout in milliseconds
    #[arg(long, env = "REQUEST_TIMEOUT_MS", help_heading = "Backend")]
    pub timeout: Option<u64>,

    /// Secret used to sign session cookies
    #[arg(
        long,
        env = "SESSION_SECRET",
        hide_env_values = true,
        help_heading = "Sessions"
    )]
    pub session_secret: Option<String>,
}

impl OverrideArgs {
    #[must_use]
    pub fn to_overrides(&self) -> Overrides {
        Overrides {
            backend_url: self.backend_url.clone(),
            internal_backend_url: self.internal_backend_url.clone(),
            session_secret: self.session_secret.clone(),
            timeout: self.timeout,
        }
    }
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        tollgate init                          Quick start config (yaml)\n  \
        tollgate init --full                   Fully commented template\n  \
        tollgate init -f toml -o console.toml  TOML format")]
pub struct InitArgs {
    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub format: ConfigFormat,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include full documentation as comments
    #[arg(long)]
    pub full: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Config file to validate
    #[arg(default_value = "tollgate.yaml")]
    pub config: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,

    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:3000")]
    pub url: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
            Self::Toml => "toml",
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}
