use async_trait::async_trait;
use eyre::Result;

use crate::feed_id::FeedId;
use crate::report::Report;

pub mod http;

#[async_trait]
pub trait ReportFetcher {
    async fn latest_report(&self, feed_id: &FeedId) -> Result<Report>;
}
