//! Scheduled Jobs
//!
//! Keep-alive ping: an outbound GET on a fixed day-of-month schedule that
//! keeps a hosted instance from idling out. Failures are logged, never
//! retried.

use chrono::{DateTime, Datelike, Duration as ChronoDuration, TimeZone, Utc};
use std::time::Duration;

/// Days of the month the ping fires on, at 00:00 UTC
pub const KEEP_ALIVE_DAYS: &[u32] = &[1, 7, 13, 19, 25, 31];

/// Look-ahead window when searching for the next run; covers any month gap
const MAX_LOOKAHEAD_DAYS: i64 = 62;

// =========================================================================
// Schedule
// =========================================================================

/// First scheduled instant strictly after `now`, or `None` when `days`
/// names no day that occurs within the look-ahead window.
pub fn next_run_after(now: DateTime<Utc>, days: &[u32]) -> Option<DateTime<Utc>> {
    let today = now.date_naive();

    (0..=MAX_LOOKAHEAD_DAYS)
        .filter_map(|offset| today.checked_add_signed(ChronoDuration::days(offset)))
        .filter(|date| days.contains(&date.day()))
        .filter_map(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .find(|candidate| *candidate > now)
}

// =========================================================================
// Keep-alive job
// =========================================================================

/// Configuration for the keep-alive job
#[derive(Debug, Clone)]
pub struct KeepAliveConfig {
    /// Target URL
    pub url: String,
    /// Days of the month to fire on
    pub days: Vec<u32>,
}

impl KeepAliveConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            days: KEEP_ALIVE_DAYS.to_vec(),
        }
    }
}

/// Periodic outbound GET, independent of request handling
pub struct KeepAliveJob {
    client: reqwest::Client,
    config: KeepAliveConfig,
}

impl KeepAliveJob {
    pub fn new(config: KeepAliveConfig) -> Result<Self, JobError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self { client, config })
    }

    /// Start the job in the background.
    /// Returns a handle that can be used to abort it.
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(&self) {
        tracing::info!(url = %self.config.url, days = ?self.config.days, "Keep-alive job started");

        loop {
            let now = Utc::now();
            let Some(next) = next_run_after(now, &self.config.days) else {
                tracing::error!(days = ?self.config.days, "Keep-alive schedule never fires, stopping");
                return;
            };

            tracing::debug!(next_run = %next, "Keep-alive ping scheduled");
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            tokio::time::sleep(wait).await;

            self.run_once().await;
        }
    }

    /// Send one ping and log the outcome
    pub async fn run_once(&self) {
        match self.ping().await {
            Ok(status) if status.is_success() => {
                tracing::info!(url = %self.config.url, status = %status, "Keep-alive GET sent successfully");
            }
            Ok(status) => {
                tracing::warn!(url = %self.config.url, status = %status, "Keep-alive GET failed");
            }
            Err(e) => {
                tracing::error!(url = %self.config.url, error = %e, "Error while sending keep-alive GET");
            }
        }
    }

    /// Issue the GET and return the response status
    pub async fn ping(&self) -> Result<reqwest::StatusCode, JobError> {
        let response = self.client.get(&self.config.url).send().await?;
        Ok(response.status())
    }
}

/// Job execution errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};
    use tokio_test::{assert_err, assert_ok};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_next_run_same_month() {
        let next = next_run_after(utc(2026, 3, 2, 9, 0), KEEP_ALIVE_DAYS).unwrap();
        assert_eq!(next, utc(2026, 3, 7, 0, 0));
    }

    #[test]
    fn test_next_run_is_strictly_after_now() {
        let next = next_run_after(utc(2026, 3, 7, 0, 0), KEEP_ALIVE_DAYS).unwrap();
        assert_eq!(next, utc(2026, 3, 13, 0, 0));
    }

    #[test]
    fn test_next_run_uses_day_31() {
        let next = next_run_after(utc(2026, 1, 25, 12, 0), KEEP_ALIVE_DAYS).unwrap();
        assert_eq!(next, utc(2026, 1, 31, 0, 0));
    }

    #[test]
    fn test_next_run_skips_missing_day_31() {
        // April has 30 days
        let next = next_run_after(utc(2026, 4, 25, 12, 0), KEEP_ALIVE_DAYS).unwrap();
        assert_eq!(next, utc(2026, 5, 1, 0, 0));
    }

    #[test]
    fn test_next_run_crosses_year() {
        let next = next_run_after(utc(2026, 12, 31, 0, 1), KEEP_ALIVE_DAYS).unwrap();
        assert_eq!(next, utc(2027, 1, 1, 0, 0));
    }

    #[test]
    fn test_schedule_that_never_fires() {
        assert_eq!(next_run_after(utc(2026, 1, 1, 0, 0), &[32]), None);
        assert_eq!(next_run_after(utc(2026, 1, 1, 0, 0), &[]), None);
    }

    #[test]
    fn test_keep_alive_config_default() {
        let config = KeepAliveConfig::new("http://localhost/health");
        assert_eq!(config.days, vec![1, 7, 13, 19, 25, 31]);
    }

    async fn spawn_target() -> String {
        let app = Router::new()
            .route("/health", get(|| async { "OK" }))
            .route("/down", get(|| async { StatusCode::SERVICE_UNAVAILABLE }));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_ping_success() {
        let base = spawn_target().await;
        let job = KeepAliveJob::new(KeepAliveConfig::new(format!("{}/health", base))).unwrap();

        let status = assert_ok!(job.ping().await);
        assert_eq!(status.as_u16(), 200);
        job.run_once().await;
    }

    #[tokio::test]
    async fn test_ping_reports_failure_status() {
        let base = spawn_target().await;
        let job = KeepAliveJob::new(KeepAliveConfig::new(format!("{}/down", base))).unwrap();

        let status = job.ping().await.unwrap();
        assert_eq!(status.as_u16(), 503);
    }

    #[tokio::test]
    async fn test_ping_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let job = KeepAliveJob::new(KeepAliveConfig::new(format!("http://{}/health", addr))).unwrap();

        let err = assert_err!(job.ping().await);
        assert!(matches!(err, JobError::Http(_)));
        job.run_once().await;
    }
}
