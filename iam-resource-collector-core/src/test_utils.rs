//! In-memory fakes for the AWS collaborators, used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::aws::iam_client::{IamLister, IamSessionFactory, NamePage};
use crate::aws::s3::ObjectStore;
use crate::aws::ssm::ParameterStore;
use crate::aws::sts::RoleAssumer;
use crate::aws::{AwsError, AwsResult};
use crate::commands::{CollectorClients, CollectorService};
use crate::config::CollectorSettings;
use crate::types::{Credentials, ResourceKind};

pub(crate) const ACCOUNTS_PARAMETER: &str = "/iam-collector/accounts";
pub(crate) const BUCKET: &str = "iam-collector-123456789012-us-east-1";

pub(crate) fn role_arn(account_id: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/CrossAccountAuditRole")
}

pub(crate) fn accounts_json(accounts: &[(&str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = accounts
        .iter()
        .map(|(name, arn)| serde_json::json!({"account_name": name, "role_arn": arn}))
        .collect();
    serde_json::Value::Array(entries).to_string()
}

pub(crate) struct FakeParameterStore {
    pub value: Result<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeParameterStore {
    pub fn returning(value: impl Into<String>) -> Self {
        Self {
            value: Ok(value.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            value: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ParameterStore for FakeParameterStore {
    async fn get_parameter(&self, name: &str) -> AwsResult<String> {
        self.calls.lock().unwrap().push(name.to_string());
        match &self.value {
            Ok(v) => Ok(v.clone()),
            Err(e) => Err(AwsError::SsmError(e.clone())),
        }
    }
}

/// Issues credentials whose access key is the role ARN, so the IAM fake can
/// tell which account a lister belongs to.
#[derive(Default)]
pub(crate) struct FakeRoleAssumer {
    pub denied: HashMap<String, String>,
    pub calls: Mutex<Vec<(String, String)>>,
}

impl FakeRoleAssumer {
    pub fn deny(mut self, role_arn: &str, message: &str) -> Self {
        self.denied.insert(role_arn.to_string(), message.to_string());
        self
    }
}

#[async_trait]
impl RoleAssumer for FakeRoleAssumer {
    async fn assume_role(&self, role_arn: &str, session_name: &str) -> AwsResult<Credentials> {
        self.calls
            .lock()
            .unwrap()
            .push((role_arn.to_string(), session_name.to_string()));
        if let Some(message) = self.denied.get(role_arn) {
            return Err(AwsError::StsError(message.clone()));
        }
        Ok(Credentials {
            access_key_id: role_arn.to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration: None,
        })
    }
}

/// Pages of names per resource kind for one account.
#[derive(Clone, Default)]
pub(crate) struct FakeAccount {
    pub pages: HashMap<ResourceKind, Vec<Vec<String>>>,
    pub failing: Option<ResourceKind>,
}

impl FakeAccount {
    pub fn with_pages(mut self, kind: ResourceKind, pages: &[&[&str]]) -> Self {
        let pages = pages
            .iter()
            .map(|page| page.iter().map(|n| n.to_string()).collect())
            .collect();
        self.pages.insert(kind, pages);
        self
    }

    pub fn with_names(self, kind: ResourceKind, names: &[&str]) -> Self {
        self.with_pages(kind, &[names])
    }

    pub fn failing_on(mut self, kind: ResourceKind) -> Self {
        self.failing = Some(kind);
        self
    }
}

/// Keyed by role ARN. Records every list request as `(role_arn, kind, marker)`.
#[derive(Default)]
pub(crate) struct FakeIamSessions {
    pub accounts: HashMap<String, FakeAccount>,
    pub requests: Arc<Mutex<Vec<(String, ResourceKind, Option<String>)>>>,
}

impl FakeIamSessions {
    pub fn account(mut self, role_arn: &str, account: FakeAccount) -> Self {
        self.accounts.insert(role_arn.to_string(), account);
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl IamSessionFactory for FakeIamSessions {
    fn lister_for(&self, credentials: &Credentials) -> Box<dyn IamLister> {
        Box::new(FakeLister {
            role_arn: credentials.access_key_id.clone(),
            account: self
                .accounts
                .get(&credentials.access_key_id)
                .cloned()
                .unwrap_or_default(),
            requests: Arc::clone(&self.requests),
        })
    }
}

pub(crate) struct FakeLister {
    role_arn: String,
    account: FakeAccount,
    requests: Arc<Mutex<Vec<(String, ResourceKind, Option<String>)>>>,
}

impl FakeLister {
    pub fn new(account: FakeAccount) -> Self {
        Self {
            role_arn: String::new(),
            account,
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<(ResourceKind, Option<String>)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(_, kind, marker)| (*kind, marker.clone()))
            .collect()
    }
}

#[async_trait]
impl IamLister for FakeLister {
    async fn list_names(&self, kind: ResourceKind, marker: Option<String>) -> AwsResult<NamePage> {
        self.requests
            .lock()
            .unwrap()
            .push((self.role_arn.clone(), kind, marker.clone()));
        if self.account.failing == Some(kind) {
            return Err(AwsError::IamError(format!(
                "Failed to list {kind}: Throttling: Rate exceeded"
            )));
        }
        let pages = self.account.pages.get(&kind).cloned().unwrap_or_default();
        let index: usize = marker.as_deref().map_or(0, |m| m.parse().unwrap());
        let names = pages.get(index).cloned().unwrap_or_default();
        let next_marker = (index + 1 < pages.len()).then(|| (index + 1).to_string());
        Ok(NamePage { names, next_marker })
    }
}

#[derive(Default)]
pub(crate) struct FakeObjectStore {
    pub fail_with: Option<String>,
    pub objects: Mutex<Vec<(String, String, String, String)>>,
}

impl FakeObjectStore {
    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            objects: Mutex::new(Vec::new()),
        }
    }

    /// Published objects as `(bucket, key, body, content_type)`.
    pub fn published(&self) -> Vec<(String, String, String, String)> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> AwsResult<()> {
        if let Some(message) = &self.fail_with {
            return Err(AwsError::S3Error(message.clone()));
        }
        self.objects.lock().unwrap().push((
            bucket.to_string(),
            key.to_string(),
            String::from_utf8(body).unwrap(),
            content_type.to_string(),
        ));
        Ok(())
    }
}

/// Fakes wired into a service, kept around so tests can inspect them afterwards.
pub(crate) struct Harness {
    pub parameters: Arc<FakeParameterStore>,
    pub roles: Arc<FakeRoleAssumer>,
    pub iam: Arc<FakeIamSessions>,
    pub objects: Arc<FakeObjectStore>,
}

impl Harness {
    pub fn new(
        parameters: FakeParameterStore,
        roles: FakeRoleAssumer,
        iam: FakeIamSessions,
        objects: FakeObjectStore,
    ) -> Self {
        Self {
            parameters: Arc::new(parameters),
            roles: Arc::new(roles),
            iam: Arc::new(iam),
            objects: Arc::new(objects),
        }
    }

    pub fn service(&self, settings: CollectorSettings) -> CollectorService {
        CollectorService::with_clients(
            settings,
            CollectorClients {
                parameters: self.parameters.clone(),
                roles: self.roles.clone(),
                iam_sessions: self.iam.clone(),
                objects: self.objects.clone(),
            },
        )
    }

    pub fn default_service(&self) -> CollectorService {
        self.service(CollectorSettings::new(ACCOUNTS_PARAMETER, BUCKET))
    }
}
