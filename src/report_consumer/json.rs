use eyre::Result;

use crate::formatter::ReportSummary;
use crate::report_consumer::ReportConsumer;

/// Writes one JSON object per report to stdout.
pub struct JsonReportConsumer {}

impl JsonReportConsumer {
    pub fn render(summary: &ReportSummary) -> Result<String> {
        Ok(serde_json::to_string(summary)?)
    }
}

impl ReportConsumer for JsonReportConsumer {
    fn consume_summary(&self, summary: &ReportSummary) -> Result<()> {
        println!("{}", Self::render(summary)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::{self, tests::v3_full_report, tests::V3_FEED_ID};
    use crate::feed_id::FeedId;
    use crate::report::Report;

    #[test]
    fn renders_summary_as_single_json_line() {
        let feed_id: FeedId = V3_FEED_ID.parse().unwrap();
        let report = Report {
            feed_id,
            full_report: v3_full_report(&feed_id),
            valid_from_timestamp: 1700000000,
            observations_timestamp: 1700000000,
        };
        let decoded = decoder::decode(&report.full_report, &feed_id).unwrap();
        let summary = ReportSummary::build("ETH/USD", &report, decoded);

        let line = JsonReportConsumer::render(&summary).unwrap();

        assert!(!line.contains('\n'));
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["feed"], "ETH/USD");
        assert_eq!(json["price"], "$2500.50");
        assert_eq!(json["marketStatus"], "n/a");
        assert_eq!(json["observationsTimestamp"], "2023-11-14T22:13:20.000Z");
        assert_eq!(json["decoded"]["version"], 3);
        assert_eq!(json["decoded"]["ask"], "2501000000000000000000");
    }
}
