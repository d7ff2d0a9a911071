use eyre::Result;

use crate::formatter::ReportSummary;
use crate::report::Report;

pub mod console;
pub mod json;

pub trait ReportConsumer {
    /// Called as soon as a report arrives, before it is decoded.
    fn report_received(&self, _label: &str, _report: &Report) {}

    fn consume_summary(&self, summary: &ReportSummary) -> Result<()>;
}
