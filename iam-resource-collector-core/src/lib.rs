//! This crate provides the core logic of the IAM Resource Collector:
//! - Loading the target account list from SSM Parameter Store
//! - Cross-account role assumption through STS
//! - Enumerating IAM users, roles, groups and customer-managed policies
//! - Publishing a timestamped JSON snapshot to S3
//!

pub mod aws;
pub mod commands;
pub mod config;
mod error;
mod types;

#[cfg(test)]
mod test_utils;

// Re-exports for a small, focused public API
pub use aws::arn::extract_account_from_arn;
pub use aws::AwsError;
pub use commands::{CollectorClients, CollectorService};
pub use config::{CollectorSettings, Pagination};
pub use error::{CollectorError, CollectorResult};
pub use types::{
    AccountDescriptor, AccountResult, Credentials, InvocationResponse, ResourceInventory,
    ResourceKind, ResultsMapping, SnapshotLocation,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_account_names_in_config_order() {
        let config = r#"[
            {"account_name": "zulu", "role_arn": "arn:aws:iam::098765432109:role/CrossAccountAuditRole"},
            {"account_name": "alpha", "role_arn": "arn:aws:iam::123456789012:role/CrossAccountAuditRole"},
            {"account_name": "mike", "role_arn": "arn:aws:iam::210987654321:role/CrossAccountAuditRole"}
        ]"#;
        let accounts =
            commands::parse_accounts("/iam-collector/accounts", config).expect("should parse");

        let mut results = ResultsMapping::new();
        for account in &accounts {
            results.insert(account.account_name.clone(), AccountResult::failed("not run"));
        }
        let body = commands::render_snapshot(&results).expect("should render");

        // serde_json::Value sorts keys, so order is read from the body itself
        let positions: Vec<usize> = ["\"zulu\"", "\"alpha\"", "\"mike\""]
            .iter()
            .map(|key| body.find(key).expect("account missing from snapshot"))
            .collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "snapshot reordered accounts: {body}"
        );

        let parsed: serde_json::Value = serde_json::from_str(&body).expect("should parse snapshot");
        assert_eq!(parsed.as_object().map(serde_json::Map::len), Some(3));
        assert_eq!(parsed["alpha"]["error"], "not run");
    }
}
