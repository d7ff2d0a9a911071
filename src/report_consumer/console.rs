use std::fmt::Write;

use eyre::Result;

use crate::formatter::ReportSummary;
use crate::report::Report;
use crate::report_consumer::ReportConsumer;

const BANNER: &str = "==============================";

/// Prints reports for a human watching the terminal.
pub struct ConsoleReportConsumer {}

impl ConsoleReportConsumer {
    pub fn render_header(label: &str, report: &Report) -> String {
        format!(
            "\n{}\n📡 New Data Streams report\nFeed: {}\nRaw blob length: {} chars",
            BANNER,
            label,
            report.blob_len()
        )
    }

    pub fn render_summary(summary: &ReportSummary) -> Result<String> {
        let mut out = String::new();
        writeln!(out, "Decoded fields (payload only):")?;
        writeln!(out, "  version: {}", summary.decoded.version.number())?;
        for field in &summary.decoded.fields {
            writeln!(out, "  {}: {}", field.name, field.value)?;
        }
        writeln!(out, "Human-readable summary:")?;
        writeln!(out, "  observationsTimestamp: {}", summary.observations_timestamp)?;
        writeln!(out, "  validFromTimestamp: {}", summary.valid_from_timestamp)?;
        writeln!(out, "  marketStatus: {}", summary.market_status)?;
        write!(out, "  price: {}", summary.price)?;
        Ok(out)
    }
}

impl ReportConsumer for ConsoleReportConsumer {
    fn report_received(&self, label: &str, report: &Report) {
        println!("{}", Self::render_header(label, report));
    }

    fn consume_summary(&self, summary: &ReportSummary) -> Result<()> {
        println!("{}", Self::render_summary(summary)?);
        Ok(())
    }
}
