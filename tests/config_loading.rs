//! Integration tests for config loading across file formats and
//! override precedence.

use tollgate::config::model::{Config, DEFAULT_COOKIE_NAME};
use tollgate::config::sources::{load_file, parse_config_str};
use tollgate::config::validation::validate;
use tollgate::config::{resolve, Overrides};
use tollgate::error::TollgateError;

const SECRET: &str = "0123456789abcdef0123456789abcdef";

const YAML: &str = r#"
backend:
  url: "https://api.example.com"
  internal_url: "http://backend.internal:3000/"
  timeout: 5000
session:
  secret: "0123456789abcdef0123456789abcdef"
  cookie_name: "console.session"
  max_age: 3600
  secure_cookie: true
"#;

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("tollgate-{}-{name}", std::process::id()))
}

#[test]
fn yaml_config_loads_and_validates() {
    let config = parse_config_str("yaml", YAML, "tollgate.yaml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.backend.timeout, 5000);
    assert_eq!(
        config.backend.forward_base(),
        Some("http://backend.internal:3000")
    );
    assert_eq!(config.session.cookie_name, "console.session");
    assert!(config.session.secure_cookie);
}

#[test]
fn yaml_defaults_apply() {
    let config = parse_config_str("yml", "backend:\n  url: \"http://localhost:8080\"\n", "t")
        .unwrap();
    assert_eq!(config.backend.timeout, 10_000);
    assert_eq!(config.session.cookie_name, DEFAULT_COOKIE_NAME);
    assert_eq!(config.session.max_age, 86_400);
    assert!(!config.session.secure_cookie);
}

#[test]
fn unknown_fields_are_rejected() {
    let result = parse_config_str("yaml", "backend:\n  urll: \"http://x\"\n", "t");
    assert!(matches!(result, Err(TollgateError::ConfigParse { .. })));
}

#[cfg(feature = "json")]
#[test]
fn json_config_loads_and_validates() {
    let content = format!(
        r#"{{"backend": {{"url": "http://localhost:8080"}}, "session": {{"secret": "{SECRET}"}}}}"#
    );
    let config = parse_config_str("json", &content, "tollgate.json").unwrap();
    validate(&config).unwrap();
}

#[cfg(feature = "toml")]
#[test]
fn toml_config_loads_and_validates() {
    let content = format!(
        "[backend]\nurl = \"http://localhost:8080\"\ntimeout = 2500\n\n[session]\nsecret = \"{SECRET}\"\n"
    );
    let config = parse_config_str("toml", &content, "tollgate.toml").unwrap();
    validate(&config).unwrap();
    assert_eq!(config.backend.timeout, 2500);
}

#[test]
fn unsupported_format_returns_error() {
    let result = parse_config_str("xml", "{}", "test.xml");
    assert!(matches!(result, Err(TollgateError::UnsupportedFormat(_))));
}

#[test]
fn empty_config_fails_validation() {
    let errors = validate(&Config::default()).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"backend.url"));
    assert!(fields.contains(&"session.secret"));
}

#[tokio::test]
async fn missing_file_is_reported() {
    let result = load_file(&temp_path("absent.yaml")).await;
    assert!(matches!(result, Err(TollgateError::ConfigFileNotFound { .. })));
}

#[tokio::test]
async fn overrides_take_precedence_over_file() {
    let path = temp_path("override.yaml");
    tokio::fs::write(&path, YAML).await.unwrap();

    let result = resolve(
        Some(&path),
        Overrides {
            backend_url: Some("http://public.example.com".into()),
            timeout: Some(750),
            ..Overrides::default()
        },
    )
    .await;
    tokio::fs::remove_file(&path).await.unwrap();

    let (config, source) = result.unwrap();
    assert_eq!(source, path.display().to_string());
    assert_eq!(config.backend.url.as_deref(), Some("http://public.example.com"));
    assert_eq!(config.backend.timeout, 750);
    assert_eq!(config.session.cookie_name, "console.session");
}

#[tokio::test]
async fn overrides_alone_are_enough() {
    let (config, source) = resolve(
        None,
        Overrides {
            backend_url: Some("http://localhost:8080".into()),
            session_secret: Some(SECRET.into()),
            ..Overrides::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(source, "environment");
    assert_eq!(config.backend.forward_base(), Some("http://localhost:8080"));
}

#[tokio::test]
async fn invalid_merged_config_is_refused() {
    let path = temp_path("short-secret.yaml");
    tokio::fs::write(&path, "backend:\n  url: \"http://localhost:8080\"\nsession:\n  secret: \"short\"\n")
        .await
        .unwrap();

    let result = resolve(Some(&path), Overrides::default()).await;
    tokio::fs::remove_file(&path).await.unwrap();

    let Err(TollgateError::ConfigValidation { errors }) = result else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "session.secret");
}
