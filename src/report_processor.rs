//! # Report Processor
//! Drains stream events one at a time, in arrival order. A report is decoded and handed to the
//! consumer before the next event is looked at. Failures are logged and never stop the loop.

use eyre::{Result, WrapErr};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::decoder;
use crate::formatter::ReportSummary;
use crate::report::Report;
use crate::report_consumer::ReportConsumer;
use crate::report_stream::StreamEvent;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessorStats {
    pub reports: usize,
    pub failed_reports: usize,
    pub stream_errors: usize,
}

pub struct ReportProcessor<C: ReportConsumer> {
    consumer: C,
    label: String,
}

impl<C: ReportConsumer> ReportProcessor<C> {
    pub fn new(consumer: C, label: String) -> Self {
        Self { consumer, label }
    }

    pub fn process_report(&self, report: &Report) -> Result<()> {
        self.consumer.report_received(&self.label, report);
        let decoded = decoder::decode(&report.full_report, &report.feed_id)
            .wrap_err("Failed to decode report")?;
        let summary = ReportSummary::build(&self.label, report, decoded);
        self.consumer
            .consume_summary(&summary)
            .wrap_err("Failed to output report")
    }

    fn handle_event(&self, stats: &mut ProcessorStats, event: StreamEvent) {
        match event {
            StreamEvent::Report(report) => {
                stats.reports += 1;
                if let Err(e) = self.process_report(&report) {
                    stats.failed_reports += 1;
                    log::error!("{:#}", e);
                }
            }
            StreamEvent::Error(e) => {
                stats.stream_errors += 1;
                log::error!("Stream error: {}", e);
            }
        }
    }

    /// Runs until the sending side of `events` goes away.
    pub async fn run(&self, events: mpsc::Receiver<StreamEvent>) -> ProcessorStats {
        log::info!("Listening for reports...");
        let mut stats = ProcessorStats::default();
        let mut events = ReceiverStream::new(events);
        while let Some(event) = events.next().await {
            self.handle_event(&mut stats, event);
        }
        log::info!("Report stream ended after {} report(s)", stats.reports);
        stats
    }
}
