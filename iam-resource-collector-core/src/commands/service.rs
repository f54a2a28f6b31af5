//! IAM Resource Collector Service Layer
//!
//! The service owns the settings of one run plus the four remote
//! collaborators (parameter store, role assumer, IAM session factory, object
//! store). Operations live in sibling modules: `accounts.rs` (config
//! loading), `collect.rs` (the account loop) and `publish.rs` (snapshot
//! writing).

use std::sync::Arc;

use aws_config::SdkConfig;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_ssm::Client as SsmClient;
use aws_sdk_sts::Client as StsClient;

use crate::aws::iam_client::{AssumedRoleIamSessions, IamSessionFactory};
use crate::aws::s3::{ObjectStore, S3ObjectStore};
use crate::aws::ssm::{ParameterStore, SsmParameterStore};
use crate::aws::sts::{RoleAssumer, StsRoleAssumer};
use crate::config::CollectorSettings;
use crate::error::CollectorResult;

/// Remote collaborators injected into the service.
#[derive(Clone)]
pub struct CollectorClients {
    pub parameters: Arc<dyn ParameterStore>,
    pub roles: Arc<dyn RoleAssumer>,
    pub iam_sessions: Arc<dyn IamSessionFactory>,
    pub objects: Arc<dyn ObjectStore>,
}

impl CollectorClients {
    /// Production bindings on top of one shared SDK config.
    pub fn from_sdk_config(config: &SdkConfig, session_duration: Option<i32>) -> Self {
        Self {
            parameters: Arc::new(SsmParameterStore::new(SsmClient::new(config))),
            roles: Arc::new(
                StsRoleAssumer::new(StsClient::new(config))
                    .with_duration_seconds(session_duration),
            ),
            iam_sessions: Arc::new(AssumedRoleIamSessions::new(config.clone())),
            objects: Arc::new(S3ObjectStore::new(S3Client::new(config))),
        }
    }
}

/// Main service struct that holds the run settings and AWS clients
pub struct CollectorService {
    pub(crate) settings: CollectorSettings,
    pub(crate) clients: CollectorClients,
}

/// Shared SDK configuration: default credential chain, with an optional
/// region override on top of the default region resolution.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region));
    }
    loader.load().await
}

impl CollectorService {
    /// Validate the settings, then bind AWS clients to the default SDK
    /// configuration (with `region` overriding the resolved region).
    ///
    /// # Errors
    ///
    /// Returns an error if the settings are invalid. No AWS call is made in
    /// that case.
    pub async fn load(
        settings: CollectorSettings,
        region: Option<String>,
    ) -> CollectorResult<Self> {
        settings.validate()?;
        let config = load_sdk_config(region).await;
        Ok(Self::from_sdk_config(settings, &config))
    }

    pub fn from_sdk_config(settings: CollectorSettings, config: &SdkConfig) -> Self {
        let clients = CollectorClients::from_sdk_config(config, settings.session_duration);
        Self::with_clients(settings, clients)
    }

    pub fn with_clients(settings: CollectorSettings, clients: CollectorClients) -> Self {
        Self { settings, clients }
    }
}
