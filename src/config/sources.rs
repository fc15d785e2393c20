//! File-based configuration loading.
//!
//! The format is chosen from the file extension. YAML is always
//! available with the default feature set; JSON and TOML are gated by
//! the `json` and `toml` features.

use std::path::{Path, PathBuf};

use crate::config::model::Config;
use crate::error::TollgateError;

/// File names checked in the working directory when `--config` is absent.
pub const AUTO_DETECT_CANDIDATES: &[&str] = &[
    "tollgate.yaml",
    "tollgate.yml",
    "tollgate.json",
    "tollgate.toml",
];

/// Parse a config string based on file extension.
pub fn parse_config_str(
    ext: &str,
    content: &str,
    path_display: &str,
) -> Result<Config, TollgateError> {
    match ext {
        #[cfg(feature = "yaml")]
        "yaml" | "yml" => serde_yml::from_str(content).map_err(|e| TollgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "json")]
        "json" => serde_json::from_str(content).map_err(|e| TollgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        #[cfg(feature = "toml")]
        "toml" => toml::from_str(content).map_err(|e| TollgateError::ConfigParse {
            path: path_display.to_string(),
            source: Box::new(e),
        }),

        other => Err(TollgateError::UnsupportedFormat(other.to_string())),
    }
}

/// Read and parse a config file. Validation happens after overrides are
/// merged, so it is not performed here.
pub async fn load_file(path: &Path) -> Result<Config, TollgateError> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            TollgateError::ConfigFileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            TollgateError::Io(e)
        }
    })?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    parse_config_str(ext, &content, &path.display().to_string())
}

/// Resolve the config file to load: the explicit path if given, otherwise
/// the first auto-detected candidate in the working directory.
pub async fn resolve_file(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    for name in AUTO_DETECT_CANDIDATES {
        let path = PathBuf::from(name);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            tracing::info!(path = %path.display(), "auto-detected config file");
            return Some(path);
        }
    }

    None
}
