//! `tollgate health`: query `/health` on a running instance.
//!
//! The request goes through the same pooled client and deadline logic
//! the proxy uses for the backend, so `https://` instances work too.

use std::fmt;
use std::time::Duration;

use axum::http::{HeaderMap, Method};
use bytes::Bytes;

use crate::cli::HealthArgs;
use crate::error::TollgateError;
use crate::health::HealthResponse;
use crate::proxy::upstream::{self, ForwardRequest};
use crate::server::build_http_client;

const HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn execute(args: HealthArgs) -> Result<(), TollgateError> {
    let base = args.url.trim_end_matches('/');
    let body = fetch_health(base).await?;

    if args.json {
        println!("{}", String::from_utf8_lossy(&body));
        return Ok(());
    }

    match serde_json::from_slice::<HealthResponse>(&body) {
        Ok(health) => println!("{}", render_report(&health, base)),
        Err(e) => {
            eprintln!("{base}/health answered, but not with a tollgate payload: {e}");
            println!("{}", String::from_utf8_lossy(&body));
        }
    }
    Ok(())
}

/// Fetch the raw `/health` body. Any non-2xx answer is a failed check.
async fn fetch_health(base: &str) -> Result<Bytes, TollgateError> {
    let request = ForwardRequest {
        method: Method::GET,
        url: format!("{base}/health"),
        headers: HeaderMap::new(),
        body: None,
    };
    let response = upstream::send(&build_http_client(), request, HEALTH_TIMEOUT)
        .await
        .map_err(|e| TollgateError::HttpRequest {
            source: Box::new(e),
        })?;

    if !response.status.is_success() {
        return Err(TollgateError::HealthCheckFailed(response.status));
    }
    Ok(response.body)
}

fn render_report(health: &HealthResponse, base: &str) -> String {
    let mark = if health.status == "healthy" {
        '\u{2713}'
    } else {
        '\u{2717}'
    };
    let stats = &health.stats;
    [
        format!(
            "{mark} tollgate {} at {base} is {}",
            health.version, health.status
        ),
        format!(
            "  up        {}",
            Uptime(Duration::from_secs(health.uptime_seconds))
        ),
        format!("  config    {}", health.config.source),
        format!(
            "  backend   {}ms deadline",
            health.config.backend_timeout_ms
        ),
        format!("  sessions  {}", health.config.session_provider),
        format!(
            "  requests  {} forwarded / {} failed / {} rejected",
            stats.requests_forwarded, stats.requests_failed, stats.requests_rejected
        ),
    ]
    .join("\n")
}

/// Coarse uptime: the two most significant units, starting at the first
/// non-zero one.
struct Uptime(Duration);

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let units = [
            (secs / 86_400, 'd'),
            (secs / 3_600 % 24, 'h'),
            (secs / 60 % 60, 'm'),
            (secs % 60, 's'),
        ];
        let first = units
            .iter()
            .position(|(n, _)| *n > 0)
            .unwrap_or(units.len() - 1);
        for (i, (n, unit)) in units[first..].iter().take(2).enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{n}{unit}")?;
        }
        Ok(())
    }
}
