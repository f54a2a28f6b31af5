//! AWS IAM client wrapper for listing account resources
//!
//! Listing results are projected down to resource names. ARNs, dates, paths
//! and attachment details are discarded.

use std::time::SystemTime;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_iam::error::DisplayErrorContext;
use aws_sdk_iam::types::PolicyScopeType;
use aws_sdk_iam::Client as IamClient;

use crate::aws::{AwsError, AwsResult};
use crate::types::{Credentials, ResourceKind};

const CREDENTIALS_PROVIDER_NAME: &str = "IAMResourceCollector";

/// One page of resource names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamePage {
    pub names: Vec<String>,
    /// Marker for the next request; `None` when the listing is complete.
    pub next_marker: Option<String>,
}

impl NamePage {
    fn new(names: Vec<String>, is_truncated: bool, marker: Option<&str>) -> Self {
        let next_marker = if is_truncated {
            let marker = marker.map(str::to_string);
            if marker.is_none() {
                log::warn!("IAM listing reported truncation without a marker, stopping");
            }
            marker
        } else {
            None
        };
        Self { names, next_marker }
    }
}

/// Paginated name listing of one account's IAM resources.
#[async_trait]
pub trait IamLister: Send + Sync {
    async fn list_names(&self, kind: ResourceKind, marker: Option<String>) -> AwsResult<NamePage>;
}

/// Builds IAM listers bound to assumed-role credentials.
pub trait IamSessionFactory: Send + Sync {
    fn lister_for(&self, credentials: &Credentials) -> Box<dyn IamLister>;
}

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

fn list_error(kind: ResourceKind, e: &(dyn std::error::Error + 'static)) -> AwsError {
    AwsError::IamError(format!(
        "Failed to list {kind}: {}",
        DisplayErrorContext(e)
    ))
}

#[async_trait]
impl IamLister for AwsIamClient {
    async fn list_names(&self, kind: ResourceKind, marker: Option<String>) -> AwsResult<NamePage> {
        match kind {
            ResourceKind::User => {
                let response = self
                    .client
                    .list_users()
                    .set_marker(marker)
                    .send()
                    .await
                    .map_err(|e| list_error(kind, &e))?;
                let names = response
                    .users()
                    .iter()
                    .map(|u| u.user_name().to_string())
                    .collect();
                Ok(NamePage::new(names, response.is_truncated(), response.marker()))
            }
            ResourceKind::Role => {
                let response = self
                    .client
                    .list_roles()
                    .set_marker(marker)
                    .send()
                    .await
                    .map_err(|e| list_error(kind, &e))?;
                let names = response
                    .roles()
                    .iter()
                    .map(|r| r.role_name().to_string())
                    .collect();
                Ok(NamePage::new(names, response.is_truncated(), response.marker()))
            }
            ResourceKind::Group => {
                let response = self
                    .client
                    .list_groups()
                    .set_marker(marker)
                    .send()
                    .await
                    .map_err(|e| list_error(kind, &e))?;
                let names = response
                    .groups()
                    .iter()
                    .map(|g| g.group_name().to_string())
                    .collect();
                Ok(NamePage::new(names, response.is_truncated(), response.marker()))
            }
            ResourceKind::Policy => {
                // Local scope: customer-managed only, no AWS-managed policies
                let response = self
                    .client
                    .list_policies()
                    .scope(PolicyScopeType::Local)
                    .set_marker(marker)
                    .send()
                    .await
                    .map_err(|e| list_error(kind, &e))?;
                let names = response
                    .policies()
                    .iter()
                    .filter_map(|p| p.policy_name().map(str::to_string))
                    .collect();
                Ok(NamePage::new(names, response.is_truncated(), response.marker()))
            }
        }
    }
}

/// Creates IAM clients from the base SDK config with the assumed credentials swapped in.
pub struct AssumedRoleIamSessions {
    base: SdkConfig,
}

impl AssumedRoleIamSessions {
    pub fn new(base: SdkConfig) -> Self {
        Self { base }
    }
}

impl IamSessionFactory for AssumedRoleIamSessions {
    fn lister_for(&self, credentials: &Credentials) -> Box<dyn IamLister> {
        let provider = aws_credential_types::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            Some(credentials.session_token.clone()),
            credentials.expiration.map(SystemTime::from),
            CREDENTIALS_PROVIDER_NAME,
        );
        let config = aws_sdk_iam::config::Builder::from(&self.base)
            .credentials_provider(provider)
            .build();
        Box::new(AwsIamClient::new(IamClient::from_conf(config)))
    }
}
