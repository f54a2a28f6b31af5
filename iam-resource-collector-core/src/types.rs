//! Data model shared by the loader, enumerator, orchestrator and publisher.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// One target account as stored in the accounts parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDescriptor {
    pub account_name: String,
    pub role_arn: String,
}

/// Temporary credentials for one assumed role session.
#[derive(Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
    pub expiration: Option<DateTime<Utc>>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .finish()
    }
}

/// The four IAM collections captured per account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    User,
    Role,
    Group,
    Policy,
}

impl ResourceKind {
    /// Listing order used by the enumerator.
    pub const ALL: [Self; 4] = [Self::User, Self::Role, Self::Group, Self::Policy];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::User => "users",
            Self::Role => "roles",
            Self::Group => "groups",
            Self::Policy => "policies",
        };
        f.write_str(name)
    }
}

/// Resource names of one account, in API response order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceInventory {
    pub users: Vec<String>,
    pub roles: Vec<String>,
    pub groups: Vec<String>,
    pub policies: Vec<String>,
}

impl ResourceInventory {
    pub fn names(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::User => &self.users,
            ResourceKind::Role => &self.roles,
            ResourceKind::Group => &self.groups,
            ResourceKind::Policy => &self.policies,
        }
    }

    pub fn names_mut(&mut self, kind: ResourceKind) -> &mut Vec<String> {
        match kind {
            ResourceKind::User => &mut self.users,
            ResourceKind::Role => &mut self.roles,
            ResourceKind::Group => &mut self.groups,
            ResourceKind::Policy => &mut self.policies,
        }
    }
}

/// Per-account outcome: an inventory or the message of the error that stopped it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountResult {
    Inventory(ResourceInventory),
    Failed { error: String },
}

impl AccountResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Account name to result, kept in configuration order.
///
/// Serializes as a JSON object. Inserting an existing name replaces the
/// value and keeps the key at its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultsMapping {
    entries: Vec<(String, AccountResult)>,
}

impl ResultsMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, account_name: String, result: AccountResult) -> Option<AccountResult> {
        if let Some((_, existing)) = self
            .entries
            .iter_mut()
            .find(|(name, _)| *name == account_name)
        {
            return Some(std::mem::replace(existing, result));
        }
        self.entries.push((account_name, result));
        None
    }

    pub fn get(&self, account_name: &str) -> Option<&AccountResult> {
        self.entries
            .iter()
            .find(|(name, _)| name == account_name)
            .map(|(_, result)| result)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AccountResult)> {
        self.entries
            .iter()
            .map(|(name, result)| (name.as_str(), result))
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_failed()).count()
    }
}

impl Serialize for ResultsMapping {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, result) in &self.entries {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// Where a snapshot was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLocation {
    pub bucket: String,
    pub key: String,
}

impl fmt::Display for SnapshotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Success payload returned to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationResponse {
    pub status_code: u16,
    pub message: String,
}

impl InvocationResponse {
    pub fn completed(location: &SnapshotLocation) -> Self {
        Self {
            status_code: 200,
            message: format!("Results written to {location}"),
        }
    }
}
