use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::feed_id::FeedId;

/// A single signed report as delivered by the feed.
/// `full_report` is kept exactly as received (0x-prefixed hex) so its length can be shown as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "feedID")]
    pub feed_id: FeedId,
    pub full_report: String,
    pub valid_from_timestamp: u64,
    pub observations_timestamp: u64,
}

/// Both the websocket frames and the REST "latest" response wrap the report in this envelope.
#[derive(Debug, Deserialize)]
struct ReportEnvelope {
    report: Report,
}

impl Report {
    pub fn from_json(text: &str) -> Result<Report> {
        let envelope: ReportEnvelope = serde_json::from_str(text)?;
        Ok(envelope.report)
    }

    /// Length of the raw blob in characters, the way it arrived on the wire.
    pub fn blob_len(&self) -> usize {
        self.full_report.len()
    }
}
