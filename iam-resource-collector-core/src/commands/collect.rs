//! Collection run: load accounts, inventory each one, publish the snapshot.

use futures::stream::{self, StreamExt};
use log::{info, warn};

use crate::aws::arn::extract_account_from_arn;
use crate::commands::enumerate::enumerate_resources;
use crate::error::{CollectorError, CollectorResult};
use crate::types::{
    AccountDescriptor, AccountResult, InvocationResponse, ResourceInventory, ResultsMapping,
};

impl super::service::CollectorService {
    /// Run one collection.
    ///
    /// Config loading and publishing failures abort the run. Failures while
    /// processing an account are recorded under that account and the run
    /// carries on.
    pub async fn collect(&self) -> CollectorResult<InvocationResponse> {
        let accounts = self.load_accounts().await?;
        let results = self.collect_accounts(&accounts).await;

        let failed = results.failed_count();
        if results.is_empty() {
            info!("No accounts configured, publishing an empty snapshot");
        } else if failed > 0 {
            warn!(
                "{} of {} account(s) failed, see the snapshot for details",
                failed,
                results.len()
            );
        }

        let location = self.publish(&results).await?;
        Ok(InvocationResponse::completed(&location))
    }

    /// Process every account and gather one result per account name.
    ///
    /// Up to `settings.concurrency` accounts are in flight at once. Results
    /// are recorded in configuration order regardless.
    pub async fn collect_accounts(&self, accounts: &[AccountDescriptor]) -> ResultsMapping {
        let outcomes: Vec<(&AccountDescriptor, AccountResult)> = stream::iter(accounts)
            .map(|account| async move { (account, self.process_account(account).await) })
            .buffered(self.settings.concurrency.max(1))
            .collect()
            .await;

        let mut results = ResultsMapping::new();
        for (account, result) in outcomes {
            if results
                .insert(account.account_name.clone(), result)
                .is_some()
            {
                warn!(
                    "Account name '{}' appears more than once in config, keeping the last result",
                    account.account_name
                );
            }
        }
        results
    }

    async fn process_account(&self, account: &AccountDescriptor) -> AccountResult {
        match extract_account_from_arn(&account.role_arn) {
            Some(account_id) => info!(
                "Processing account: {} ({})",
                account.account_name, account_id
            ),
            None => info!("Processing account: {}", account.account_name),
        }

        match self.inventory_account(account).await {
            Ok(inventory) => AccountResult::Inventory(inventory),
            Err(e) => {
                warn!("Error processing account {}: {}", account.account_name, e);
                AccountResult::failed(e.to_string())
            }
        }
    }

    async fn inventory_account(
        &self,
        account: &AccountDescriptor,
    ) -> CollectorResult<ResourceInventory> {
        let credentials = self
            .clients
            .roles
            .assume_role(&account.role_arn, &self.settings.session_name)
            .await
            .map_err(|source| CollectorError::RoleAssumption {
                role_arn: account.role_arn.clone(),
                source,
            })?;

        let lister = self.clients.iam_sessions.lister_for(&credentials);
        enumerate_resources(lister.as_ref(), self.settings.pagination)
            .await
            .map_err(CollectorError::ResourceList)
    }
}
