//! SSM Parameter Store access for the accounts configuration.

use async_trait::async_trait;
use aws_sdk_ssm::error::DisplayErrorContext;
use aws_sdk_ssm::Client as SsmClient;

use crate::aws::{AwsError, AwsResult};

/// Read access to a key-value configuration store.
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Return the string value of `name`.
    async fn get_parameter(&self, name: &str) -> AwsResult<String>;
}

pub struct SsmParameterStore {
    client: SsmClient,
}

impl SsmParameterStore {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameter(&self, name: &str) -> AwsResult<String> {
        let response = self
            .client
            .get_parameter()
            .name(name)
            .with_decryption(true)
            .send()
            .await
            .map_err(|e| {
                AwsError::SsmError(format!(
                    "GetParameter failed for '{name}': {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        response
            .parameter()
            .and_then(|p| p.value())
            .map(str::to_string)
            .ok_or_else(|| AwsError::SsmError(format!("Parameter '{name}' has no value")))
    }
}
