//! Commands module - service layer for collector operations

mod accounts;
mod collect;
mod enumerate;
mod publish;
pub(crate) mod service;

pub use accounts::{fetch_accounts, parse_accounts};
pub use enumerate::enumerate_resources;
pub use publish::{render_snapshot, snapshot_key, SNAPSHOT_CONTENT_TYPE};
pub use service::{load_sdk_config, CollectorClients, CollectorService};
