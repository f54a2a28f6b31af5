//! Snapshot publishing

use chrono::{DateTime, Utc};
use log::info;

use crate::error::{CollectorError, CollectorResult};
use crate::types::{ResultsMapping, SnapshotLocation};

pub const SNAPSHOT_CONTENT_TYPE: &str = "application/json";

/// Object key for a snapshot taken at `now`, e.g.
/// `iam_collector/iam_resources_20240131_000000.json`.
pub fn snapshot_key(prefix: &str, now: DateTime<Utc>) -> String {
    let file_name = format!("iam_resources_{}.json", now.format("%Y%m%d_%H%M%S"));
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        file_name
    } else {
        format!("{prefix}/{file_name}")
    }
}

/// Pretty-printed JSON body, 2-space indentation.
pub fn render_snapshot(results: &ResultsMapping) -> serde_json::Result<String> {
    serde_json::to_string_pretty(results)
}

impl super::service::CollectorService {
    /// Write the results to the configured bucket under a timestamped key.
    pub async fn publish(&self, results: &ResultsMapping) -> CollectorResult<SnapshotLocation> {
        self.publish_at(results, Utc::now()).await
    }

    pub(crate) async fn publish_at(
        &self,
        results: &ResultsMapping,
        now: DateTime<Utc>,
    ) -> CollectorResult<SnapshotLocation> {
        let location = SnapshotLocation {
            bucket: self.settings.bucket.clone(),
            key: snapshot_key(&self.settings.key_prefix, now),
        };
        let publish_error = |reason: String| CollectorError::Publish {
            bucket: location.bucket.clone(),
            key: location.key.clone(),
            reason,
        };

        let body = render_snapshot(results).map_err(|e| publish_error(e.to_string()))?;
        let size = body.len();

        self.clients
            .objects
            .put_object(
                &location.bucket,
                &location.key,
                body.into_bytes(),
                SNAPSHOT_CONTENT_TYPE,
            )
            .await
            .map_err(|e| publish_error(e.to_string()))?;

        info!("Wrote {} bytes to {}", size, location);
        Ok(location)
    }
}
