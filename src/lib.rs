//! Client for streaming market-data reports: subscribes to a feed, decodes each report against
//! its schema and renders a human readable summary.
pub mod config;
pub mod credentials;
pub mod decoder;
pub mod feed_id;
pub mod formatter;
pub mod normalizer;
pub mod report;
pub mod report_consumer;
pub mod report_fetcher;
pub mod report_processor;
pub mod report_stream;
pub mod schema;
