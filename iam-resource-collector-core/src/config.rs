//! Collector settings.
//!
//! The two required values (accounts parameter name and output bucket) come
//! from `ACCOUNTS_PARAMETER_NAME` and `BUCKET_NAME`. Everything else has a
//! default and an optional `IAM_COLLECTOR_*` override.

use std::fmt;
use std::str::FromStr;

use crate::error::{CollectorError, CollectorResult};

pub const ACCOUNTS_PARAMETER_ENV: &str = "ACCOUNTS_PARAMETER_NAME";
pub const BUCKET_ENV: &str = "BUCKET_NAME";
pub const SESSION_NAME_ENV: &str = "IAM_COLLECTOR_SESSION_NAME";
pub const KEY_PREFIX_ENV: &str = "IAM_COLLECTOR_KEY_PREFIX";
pub const PAGINATION_ENV: &str = "IAM_COLLECTOR_PAGINATION";
pub const CONCURRENCY_ENV: &str = "IAM_COLLECTOR_CONCURRENCY";
pub const SESSION_DURATION_ENV: &str = "IAM_COLLECTOR_SESSION_DURATION";

pub const DEFAULT_SESSION_NAME: &str = "IAMResourceCollector";
pub const DEFAULT_KEY_PREFIX: &str = "iam_collector";

// STS AssumeRole limits
const SESSION_NAME_LEN: std::ops::RangeInclusive<usize> = 2..=64;
const SESSION_DURATION_SECS: std::ops::RangeInclusive<i32> = 900..=43_200;

/// How far the enumerator follows IAM list pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pagination {
    /// Follow `Marker` until `IsTruncated` is false.
    #[default]
    Full,
    /// One request per resource type; large accounts are undercounted.
    FirstPage,
}

impl FromStr for Pagination {
    type Err = CollectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "first-page" | "first_page" | "single" => Ok(Self::FirstPage),
            other => Err(CollectorError::settings(format!(
                "unknown pagination mode '{other}' (expected 'full' or 'first-page')"
            ))),
        }
    }
}

impl fmt::Display for Pagination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::FirstPage => f.write_str("first-page"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// SSM parameter holding the JSON account list.
    pub accounts_parameter: String,
    /// Bucket receiving the snapshot.
    pub bucket: String,
    pub session_name: String,
    pub key_prefix: String,
    pub pagination: Pagination,
    /// Accounts processed at once. 1 means strictly sequential.
    pub concurrency: usize,
    /// Requested role session duration; `None` leaves the STS default.
    pub session_duration: Option<i32>,
}

impl CollectorSettings {
    pub fn new(accounts_parameter: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            accounts_parameter: accounts_parameter.into(),
            bucket: bucket.into(),
            session_name: DEFAULT_SESSION_NAME.to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            pagination: Pagination::default(),
            concurrency: 1,
            session_duration: None,
        }
    }

    /// Build settings from the process environment.
    pub fn from_env() -> CollectorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> CollectorResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CollectorError::settings(format!("{key} is not set")))
        };

        let mut settings = Self::new(required(ACCOUNTS_PARAMETER_ENV)?, required(BUCKET_ENV)?);

        if let Some(session_name) = lookup(SESSION_NAME_ENV) {
            settings.session_name = session_name;
        }
        if let Some(prefix) = lookup(KEY_PREFIX_ENV) {
            settings.key_prefix = prefix;
        }
        if let Some(mode) = lookup(PAGINATION_ENV) {
            settings.pagination = mode.parse()?;
        }
        if let Some(concurrency) = lookup(CONCURRENCY_ENV) {
            settings.concurrency = concurrency.trim().parse().map_err(|e| {
                CollectorError::settings(format!("{CONCURRENCY_ENV}='{concurrency}': {e}"))
            })?;
        }
        if let Some(duration) = lookup(SESSION_DURATION_ENV) {
            let secs = duration.trim().parse().map_err(|e| {
                CollectorError::settings(format!("{SESSION_DURATION_ENV}='{duration}': {e}"))
            })?;
            settings.session_duration = Some(secs);
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> CollectorResult<()> {
        if self.accounts_parameter.trim().is_empty() {
            return Err(CollectorError::settings("accounts parameter name is empty"));
        }
        if self.bucket.trim().is_empty() {
            return Err(CollectorError::settings("bucket name is empty"));
        }
        if !SESSION_NAME_LEN.contains(&self.session_name.len()) {
            return Err(CollectorError::settings(format!(
                "session name '{}' must be between 2 and 64 characters",
                self.session_name
            )));
        }
        if self.concurrency == 0 {
            return Err(CollectorError::settings("concurrency must be at least 1"));
        }
        if let Some(secs) = self.session_duration {
            if !SESSION_DURATION_SECS.contains(&secs) {
                return Err(CollectorError::settings(format!(
                    "session duration {secs}s is outside 900..=43200"
                )));
            }
        }
        Ok(())
    }
}
