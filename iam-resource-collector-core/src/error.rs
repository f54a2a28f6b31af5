//! Error taxonomy for a collector run.
//!
//! `ConfigFetch`, `ConfigParse`, `Settings` and `Publish` are fatal for the
//! run. `RoleAssumption` and `ResourceList` are scoped to a single account and
//! end up as `{"error": ...}` entries in the published snapshot.

use thiserror::Error;

use crate::aws::AwsError;

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Invalid collector settings: {0}")]
    Settings(String),

    #[error("Failed to fetch accounts parameter '{parameter}': {source}")]
    ConfigFetch {
        parameter: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to parse accounts parameter '{parameter}': {reason}")]
    ConfigParse { parameter: String, reason: String },

    #[error("Failed to assume role '{role_arn}': {source}")]
    RoleAssumption {
        role_arn: String,
        #[source]
        source: AwsError,
    },

    #[error("Failed to list IAM resources: {0}")]
    ResourceList(#[source] AwsError),

    #[error("Failed to publish results to s3://{bucket}/{key}: {reason}")]
    Publish {
        bucket: String,
        key: String,
        reason: String,
    },
}

impl CollectorError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }

    pub fn config_parse(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigParse {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

pub type CollectorResult<T> = Result<T, CollectorError>;
