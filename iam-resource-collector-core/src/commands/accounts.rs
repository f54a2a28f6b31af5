//! Accounts configuration loading

use log::{debug, info};

use crate::aws::ssm::ParameterStore;
use crate::error::{CollectorError, CollectorResult};
use crate::types::AccountDescriptor;

impl super::service::CollectorService {
    /// Fetch the accounts parameter and parse it into account descriptors.
    ///
    /// Any failure here is fatal for the run.
    pub async fn load_accounts(&self) -> CollectorResult<Vec<AccountDescriptor>> {
        fetch_accounts(
            self.clients.parameters.as_ref(),
            &self.settings.accounts_parameter,
        )
        .await
    }
}

/// Read `parameter` from the store and parse it.
pub async fn fetch_accounts(
    store: &dyn ParameterStore,
    parameter: &str,
) -> CollectorResult<Vec<AccountDescriptor>> {
    debug!("Fetching accounts parameter {}", parameter);

    let raw = store
        .get_parameter(parameter)
        .await
        .map_err(|source| CollectorError::ConfigFetch {
            parameter: parameter.to_string(),
            source,
        })?;

    let accounts = parse_accounts(parameter, &raw)?;
    info!(
        "Loaded {} account(s) from parameter {}",
        accounts.len(),
        parameter
    );
    Ok(accounts)
}

/// Parse the parameter value: a JSON array of `{"account_name", "role_arn"}` objects.
pub fn parse_accounts(parameter: &str, raw: &str) -> CollectorResult<Vec<AccountDescriptor>> {
    serde_json::from_str(raw).map_err(|e| CollectorError::config_parse(parameter, e.to_string()))
}
