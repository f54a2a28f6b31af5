//! STS helpers for cross-account role assumption

use async_trait::async_trait;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::Client as StsClient;
use chrono::{DateTime, Utc};

use crate::aws::{AwsError, AwsResult};
use crate::types::Credentials;

/// Exchanges a role ARN for temporary credentials.
#[async_trait]
pub trait RoleAssumer: Send + Sync {
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> AwsResult<Credentials>;
}

pub struct StsRoleAssumer {
    client: StsClient,
    duration_seconds: Option<i32>,
}

impl StsRoleAssumer {
    pub fn new(client: StsClient) -> Self {
        Self {
            client,
            duration_seconds: None,
        }
    }

    #[must_use]
    pub fn with_duration_seconds(mut self, duration_seconds: Option<i32>) -> Self {
        self.duration_seconds = duration_seconds;
        self
    }
}

#[async_trait]
impl RoleAssumer for StsRoleAssumer {
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> AwsResult<Credentials> {
        let out = self
            .client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .set_duration_seconds(self.duration_seconds)
            .send()
            .await
            .map_err(|e| {
                AwsError::StsError(format!("AssumeRole failed: {}", DisplayErrorContext(&e)))
            })?;

        let creds = out
            .credentials()
            .ok_or_else(|| AwsError::StsError("AssumeRole response missing Credentials".into()))?;

        Ok(Credentials {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expiration: DateTime::<Utc>::from_timestamp(creds.expiration().secs(), 0),
        })
    }
}
