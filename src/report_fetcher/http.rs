use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;

use crate::credentials::RequestAuthenticator;
use crate::feed_id::FeedId;
use crate::report::Report;
use crate::report_fetcher::ReportFetcher;

pub const LATEST_REPORT_PATH: &str = "/api/v1/reports/latest";

pub struct HttpReportFetcher {
    base_url: String,
    authenticator: Arc<dyn RequestAuthenticator>,
    client: reqwest::Client,
}

impl HttpReportFetcher {
    pub fn new(base_url: &str, authenticator: Arc<dyn RequestAuthenticator>) -> HttpReportFetcher {
        HttpReportFetcher {
            base_url: base_url.trim_end_matches('/').to_string(),
            authenticator,
            client: reqwest::Client::new(),
        }
    }

    async fn send_request(&self, path_and_query: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path_and_query);
        log::debug!("Requesting report from: {}", url);

        let mut request = self.client.get(&url);
        for (name, value) in self.authenticator.headers("GET", path_and_query)? {
            request = request.header(name, value);
        }
        let response = request
            .send()
            .await
            .map_err(|e| eyre::eyre!("Error requesting report: {}", e))?;
        log::debug!("Response: {:?}", response);

        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(eyre::eyre!(
                "Non-Success response when fetching report: {} {}",
                status,
                body
            ))
        }
    }
}

#[async_trait]
impl ReportFetcher for HttpReportFetcher {
    async fn latest_report(&self, feed_id: &FeedId) -> Result<Report> {
        let path_and_query = format!("{}?feedID={}", LATEST_REPORT_PATH, feed_id);
        let body = self.send_request(&path_and_query).await?;
        Report::from_json(&body)
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;
    use crate::credentials::{ApiKeyAuthenticator, Credentials};
    use crate::decoder::tests::V3_FEED_ID;

    fn fetcher(url: &str) -> HttpReportFetcher {
        let authenticator =
            ApiKeyAuthenticator::new(Credentials::new("key".to_string(), "secret".to_string()));
        HttpReportFetcher::new(url, Arc::new(authenticator))
    }

    #[tokio::test]
    async fn fetches_latest_report() {
        let mut server = mockito::Server::new_async().await;
        let response_json = format!(
            r#"{{
                "report": {{
                    "feedID": "{}",
                    "fullReport": "0x00",
                    "validFromTimestamp": 1700000000,
                    "observationsTimestamp": 1700000000
                }}
            }}"#,
            V3_FEED_ID
        );
        let mock = server
            .mock("GET", LATEST_REPORT_PATH)
            .match_query(Matcher::UrlEncoded("feedID".into(), V3_FEED_ID.into()))
            .match_header("authorization", "key")
            .match_header("x-authorization-timestamp", Matcher::Regex(r"^\d+$".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_json)
            .create_async()
            .await;

        let feed_id: FeedId = V3_FEED_ID.parse().unwrap();
        let report = fetcher(&server.url()).latest_report(&feed_id).await.unwrap();

        assert_eq!(report.feed_id, feed_id);
        assert_eq!(report.full_report, "0x00");
        assert_eq!(report.observations_timestamp, 1700000000);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn surfaces_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", LATEST_REPORT_PATH)
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body("unauthorized")
            .create_async()
            .await;

        let feed_id: FeedId = V3_FEED_ID.parse().unwrap();
        let err = fetcher(&server.url()).latest_report(&feed_id).await.unwrap_err();

        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("unauthorized"));
        mock.assert_async().await;
    }
}
