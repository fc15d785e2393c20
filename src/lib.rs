//! Tollgate is a session-gated forwarding proxy for the back-office
//! console API.
//!
//! Browser code calls `/api/server/<path>` on Tollgate. Tollgate checks
//! the staff session cookie, refuses paths outside a fixed allowlist,
//! attaches the session's bearer token, and relays the call to
//! `<backend>/api/<path>`. Backend answers are normalized so callers
//! always receive either an empty `204` or a JSON document, and failures
//! always carry a `message`.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate, health).
//! - [`config`] -- Config file loading, flag and environment overrides, validation.
//! - [`error`] -- Startup errors and request-path rejections using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty-print output.
//! - [`proxy`] -- Path allowlist, header allowlist, body translation, the
//!   outbound call and response normalization.
//! - [`server`] -- Axum server setup, shared application state, HTTP client, and
//!   graceful shutdown.
//! - [`session`] -- The [`SessionProvider`](session::SessionProvider) seam, the
//!   signed-cookie provider, and sign-in / sign-out endpoints.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML config file support _(enabled by default)_ |
//! | `json` | JSON config file support |
//! | `toml` | TOML config file support |
//! | `file-backends` | All file format backends |
//! | `full` | All features |

// Binary crate: public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod health;
pub mod logging;
pub mod proxy;
pub mod server;
pub mod session;
