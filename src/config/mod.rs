//! Configuration loading, overrides, and validation.
//!
//! A single [`Config`] value is built once at startup: an optional file
//! (see [`sources`]) supplies the base, [`Overrides`] collected from CLI
//! flags and their environment bindings are layered on top, and the
//! result is checked by [`validation::validate`]. Nothing else in the
//! crate reads the process environment.

pub mod model;
pub mod sources;
pub mod validation;

use std::path::Path;

use crate::error::TollgateError;
use model::Config;

/// Values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend_url: Option<String>,
    pub internal_backend_url: Option<String>,
    pub session_secret: Option<String>,
    pub timeout: Option<u64>,
}

impl Overrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(url) = self.backend_url {
            config.backend.url = Some(url);
        }
        if let Some(url) = self.internal_backend_url {
            config.backend.internal_url = Some(url);
        }
        if let Some(secret) = self.session_secret {
            config.session.secret = Some(secret);
        }
        if let Some(timeout) = self.timeout {
            config.backend.timeout = timeout;
        }
    }
}

/// Load, merge, and validate the runtime configuration.
///
/// Returns the config and a label describing where it came from.
pub async fn resolve(
    explicit: Option<&Path>,
    overrides: Overrides,
) -> Result<(Config, String), TollgateError> {
    let (mut config, source) = match sources::resolve_file(explicit).await {
        Some(path) => (
            sources::load_file(&path).await?,
            path.display().to_string(),
        ),
        None => (Config::default(), "environment".to_string()),
    };

    overrides.apply(&mut config);

    if let Err(errors) = validation::validate(&config) {
        return Err(TollgateError::ConfigValidation { errors });
    }

    Ok((config, source))
}
