//! `tollgate validate`: check a config file the way `run` would load it.
//!
//! The file is read, flag and environment overrides are layered on top,
//! and the merged result is validated. The [`Verdict`] is rendered once
//! for humans or as JSON; the signing secret never appears in either.

use std::path::Path;

use serde_json::{json, Value};

use crate::cli::{ValidateArgs, ValidateFormat};
use crate::config::model::Config;
use crate::config::{sources, validation, Overrides};
use crate::error::{TollgateError, ValidationError};

/// Result of checking one config file.
#[derive(Debug)]
pub enum Verdict {
    Valid(Config),
    Invalid(Vec<ValidationError>),
}

pub async fn execute(args: &ValidateArgs) -> Result<(), TollgateError> {
    let path = args.config.as_path();
    let verdict = check(path, args.overrides.to_overrides()).await?;

    match (&args.format, &verdict) {
        (ValidateFormat::Json, _) => println!("{}", verdict_json(&verdict)),
        (ValidateFormat::Text, Verdict::Valid(_)) => println!("{}", verdict_text(path, &verdict)),
        (ValidateFormat::Text, Verdict::Invalid(_)) => eprintln!("{}", verdict_text(path, &verdict)),
    }

    match verdict {
        Verdict::Valid(_) => Ok(()),
        Verdict::Invalid(errors) => Err(TollgateError::ConfigValidation { errors }),
    }
}

/// Load `path`, apply `overrides`, and validate. Only I/O and parse
/// failures are errors here; validation failures are a [`Verdict`].
pub async fn check(path: &Path, overrides: Overrides) -> Result<Verdict, TollgateError> {
    let mut config = sources::load_file(path).await?;
    overrides.apply(&mut config);
    Ok(match validation::validate(&config) {
        Ok(()) => Verdict::Valid(config),
        Err(errors) => Verdict::Invalid(errors),
    })
}

fn verdict_text(path: &Path, verdict: &Verdict) -> String {
    let shown = path.display().to_string();
    match verdict {
        Verdict::Valid(config) => format!(
            "\u{2713} {}",
            validation::format_validation_report(&shown, config)
        ),
        Verdict::Invalid(errors) => {
            let noun = if errors.len() == 1 { "error" } else { "errors" };
            let mut out = format!("\u{2717} {shown} has {} {noun}\n", errors.len());
            for error in errors {
                out.push('\n');
                out.push_str(&error.to_string());
            }
            out
        }
    }
}

fn verdict_json(verdict: &Verdict) -> Value {
    match verdict {
        Verdict::Valid(config) => {
            let mut redacted = config.clone();
            redacted.session.secret = None;
            json!({
                "valid": true,
                "forwards": redacted.backend.forward_base(),
                "config": redacted,
            })
        }
        Verdict::Invalid(errors) => json!({
            "valid": false,
            "errors": errors
                .iter()
                .map(|e| json!({
                    "field": e.field,
                    "message": e.message,
                    "suggestion": e.suggestion,
                }))
                .collect::<Vec<_>>(),
        }),
    }
}
