//! Report streams deliver reports as they are published, in arrival order.
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::report::Report;

pub mod ws;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Unexpected frame: {0}")]
    Protocol(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Connection closed: code={code:?} reason={reason}")]
    Closed { code: Option<u16>, reason: String },
}

#[derive(Debug)]
pub enum StreamEvent {
    Report(Report),
    /// Errors are reported, they don't end the stream by themselves. The channel closing does.
    Error(StreamError),
}

#[async_trait]
pub trait ReportStream {
    /// Suspends until the stream is established. Events arrive on the returned channel.
    async fn connect(&mut self) -> Result<mpsc::Receiver<StreamEvent>, StreamError>;
}
