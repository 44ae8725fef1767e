//! Run configuration
//!
//! Two values are built once per run and passed down explicitly:
//! [`GmailConfig`] carries the credential and API location,
//! [`StatsConfig`] scopes and tunes the aggregation.

use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default Gmail REST endpoint.
pub const DEFAULT_API_BASE: &str = "https://gmail.googleapis.com";
/// Special user id meaning "the authenticated account".
pub const DEFAULT_USER: &str = "me";
pub const DEFAULT_QUERY: &str = "label:INBOX";
pub const DEFAULT_WORKERS: usize = 32;
pub const DEFAULT_THRESHOLD: u64 = 5;
/// Per-request limit, so one stalled fetch cannot hold up the run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Credential and endpoint for the Gmail API.
#[derive(Debug, Clone)]
pub struct GmailConfig {
    pub api_base: String,
    pub access_token: String,
    pub timeout: Duration,
}

impl GmailConfig {
    #[must_use]
    pub fn new(api_base: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            access_token: access_token.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load the Gmail credential from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `GMAIL_ACCESS_TOKEN`
    ///
    /// Optional (with defaults):
    /// - `GMAIL_API_BASE` (default: `https://gmail.googleapis.com`)
    /// - `GMAIL_TIMEOUT_SECS` (default: `30`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let timeout_secs = parse_var("GMAIL_TIMEOUT_SECS", DEFAULT_TIMEOUT.as_secs())?;
        if timeout_secs == 0 {
            return Err(Error::Config("GMAIL_TIMEOUT_SECS must be at least 1".into()));
        }

        Ok(Self {
            api_base: env::var("GMAIL_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            access_token: env::var("GMAIL_ACCESS_TOKEN")
                .map_err(|_| Error::Auth("GMAIL_ACCESS_TOKEN not set".into()))?,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// What to count and how hard to push the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Target mailbox (`me` or an address).
    pub user: String,
    /// Gmail search expression scoping the run.
    pub query: String,
    /// Maximum number of in-flight message fetches.
    pub workers: usize,
    /// Senders are reported only with strictly more messages than this.
    pub threshold: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            user: DEFAULT_USER.to_string(),
            query: DEFAULT_QUERY.to_string(),
            workers: DEFAULT_WORKERS,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl StatsConfig {
    /// Load stats options from environment variables
    ///
    /// Reads from `.env` file if present. All variables are optional:
    /// - `GMAIL_USER` (default: `me`)
    /// - `GMAIL_QUERY` (default: `label:INBOX`)
    /// - `STATS_WORKERS` (default: `32`)
    /// - `STATS_THRESHOLD` (default: `5`)
    ///
    /// Values are not range-checked here so later overrides can still
    /// replace them; call [`validate`](Self::validate) once they are final.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            user: env::var("GMAIL_USER").unwrap_or(defaults.user),
            query: env::var("GMAIL_QUERY").unwrap_or(defaults.query),
            workers: parse_var("STATS_WORKERS", defaults.workers)?,
            threshold: parse_var("STATS_THRESHOLD", defaults.threshold)?,
        })
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(Error::Config("worker count must be at least 1".into()));
        }
        if self.user.is_empty() {
            return Err(Error::Config("user must not be empty".into()));
        }
        Ok(())
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env::var(name).map_or(Ok(default), |raw| {
        raw.trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {name}: {e}")))
    })
}
