//! One submodule per subcommand, each exposing an `execute` entry point.
//!
//! `tollgate` with no subcommand prints a short orientation instead of
//! starting anything.

pub mod health;
pub mod init;
pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::TollgateError;

const ORIENTATION: &[(&str, &str)] = &[
    ("tollgate init", "write ./tollgate.yaml with the required keys"),
    ("tollgate validate", "check a config together with BACKEND_URL and SESSION_SECRET"),
    ("tollgate run", "serve /api/server and /api/auth/session"),
    ("tollgate health URL", "ask a running instance for its /health report"),
];

pub async fn dispatch(cli: Cli) -> Result<(), TollgateError> {
    let Some(command) = cli.command else {
        println!("{}", orientation());
        return Ok(());
    };
    match command {
        Commands::Run(args) => run::execute(*args).await,
        Commands::Init(args) => init::execute(&args),
        Commands::Validate(args) => validate::execute(&args).await,
        Commands::Health(args) => health::execute(args).await,
    }
}

fn orientation() -> String {
    use std::fmt::Write;

    let width = ORIENTATION.iter().map(|(cmd, _)| cmd.len()).max().unwrap_or(0);
    let mut out = format!(
        "tollgate {} forwards console calls to the backend for signed-in staff.\n",
        env!("CARGO_PKG_VERSION")
    );
    for (cmd, what) in ORIENTATION {
        let _ = write!(out, "\n  {cmd:<width$}  {what}");
    }
    out.push_str("\n\nRun `tollgate <command> --help` for flags and environment variables.");
    out
}
