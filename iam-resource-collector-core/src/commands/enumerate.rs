//! IAM resource enumeration for one assumed-role session

use log::{debug, trace};

use crate::aws::iam_client::IamLister;
use crate::aws::{AwsError, AwsResult};
use crate::config::Pagination;
use crate::types::{ResourceInventory, ResourceKind};

/// List users, roles, groups and customer-managed policies, names only.
///
/// With [`Pagination::Full`] every page is fetched; with
/// [`Pagination::FirstPage`] only the first response per kind is used. The
/// first failing request aborts the whole enumeration, as does a page that
/// hands back the marker it was requested with.
pub async fn enumerate_resources(
    lister: &dyn IamLister,
    pagination: Pagination,
) -> AwsResult<ResourceInventory> {
    let mut inventory = ResourceInventory::default();

    for kind in ResourceKind::ALL {
        let names = inventory.names_mut(kind);
        let mut marker: Option<String> = None;
        let mut pages = 0usize;
        loop {
            let page = lister.list_names(kind, marker.clone()).await?;
            pages += 1;
            trace!("Page {} of {}: {} name(s)", pages, kind, page.names.len());
            names.extend(page.names);

            match (pagination, page.next_marker) {
                (Pagination::Full, Some(next)) if marker.as_deref() == Some(next.as_str()) => {
                    return Err(AwsError::IamError(format!(
                        "Listing {kind} returned marker '{next}' twice in a row"
                    )));
                }
                (Pagination::Full, Some(next)) => marker = Some(next),
                (Pagination::FirstPage, Some(_)) => {
                    debug!("Listing of {} truncated after first page", kind);
                    break;
                }
                (_, None) => break,
            }
        }
        debug!("Listed {} {} in {} page(s)", names.len(), kind, pages);
    }

    Ok(inventory)
}
