use std::sync::Arc;

use clap::{Parser, ValueEnum};
use eyre::{Result, WrapErr};

use datastreams_client::config::Config;
use datastreams_client::credentials::{ApiKeyAuthenticator, RequestAuthenticator};
use datastreams_client::formatter::feed_label;
use datastreams_client::report_consumer::console::ConsoleReportConsumer;
use datastreams_client::report_consumer::json::JsonReportConsumer;
use datastreams_client::report_consumer::ReportConsumer;
use datastreams_client::report_fetcher::http::HttpReportFetcher;
use datastreams_client::report_fetcher::ReportFetcher;
use datastreams_client::report_processor::ReportProcessor;
use datastreams_client::report_stream::ws::WsReportStream;
use datastreams_client::report_stream::ReportStream;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

const LOGGING_HELP: &str = "Failures are reported through the log on stderr. Keep RUST_LOG at \
error or above (default: info) to see decode and stream errors.";

#[derive(Parser)]
#[command(author, version, about, long_about = None, after_help = LOGGING_HELP)]
struct Args {
    #[arg(long, help = "Fetch the latest report over REST, print it and exit")]
    once: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty, help = "Output format")]
    output: OutputFormat,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = Config::from_env()?;
    log::debug!("Loaded config: {:?}", config);
    let label = feed_label(config.feed_name.as_deref(), &config.feed_id);
    let authenticator: Arc<dyn RequestAuthenticator> =
        Arc::new(ApiKeyAuthenticator::new(config.credentials.clone()));

    match args.output {
        OutputFormat::Pretty => {
            run(args.once, &config, label, authenticator, ConsoleReportConsumer {}).await
        }
        OutputFormat::Json => {
            run(args.once, &config, label, authenticator, JsonReportConsumer {}).await
        }
    }
}

async fn run<C: ReportConsumer>(
    once: bool,
    config: &Config,
    label: String,
    authenticator: Arc<dyn RequestAuthenticator>,
    consumer: C,
) -> Result<()> {
    let processor = ReportProcessor::new(consumer, label);

    if once {
        let fetcher = HttpReportFetcher::new(&config.rest_url, authenticator);
        let report = fetcher
            .latest_report(&config.feed_id)
            .await
            .wrap_err("Failed to fetch latest report")?;
        return processor.process_report(&report);
    }

    let mut stream = WsReportStream::new(&config.ws_url, vec![config.feed_id], authenticator);
    log::info!("Connecting to Data Streams...");
    let events = stream.connect().await.wrap_err("Failed to connect to Data Streams")?;
    log::info!("Connected.");

    // Nothing reconnects: once the stream is gone we only wait to be stopped.
    tokio::select! {
        _ = processor.run(events) => {
            log::warn!("Report stream closed, waiting for Ctrl-C");
            tokio::signal::ctrl_c().await?;
        }
        result = tokio::signal::ctrl_c() => result?,
    }
    log::info!("Shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn help_explains_where_failures_are_reported() {
        let help = Args::command().render_help().to_string();
        assert!(help.contains("RUST_LOG"));
        assert!(help.contains("decode and stream errors"));
    }

    #[test]
    fn defaults_to_streaming_pretty_output() {
        let args = Args::parse_from(["datastreams-client"]);
        assert!(!args.once);
        assert!(matches!(args.output, OutputFormat::Pretty));
    }
}
