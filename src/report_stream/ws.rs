//! WebSocket report stream.
//! One background task reads frames and forwards them over a bounded channel. The task answers
//! pings but never reconnects: once the socket closes the channel closes with it.
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::credentials::RequestAuthenticator;
use crate::feed_id::FeedId;
use crate::report::Report;
use crate::report_stream::{ReportStream, StreamError, StreamEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub const WS_PATH: &str = "/api/v1/ws";
const EVENT_BUFFER: usize = 256;

pub struct WsReportStream {
    base_url: String,
    feed_ids: Vec<FeedId>,
    authenticator: Arc<dyn RequestAuthenticator>,
    reader: Option<JoinHandle<()>>,
}

impl WsReportStream {
    pub fn new(
        base_url: &str,
        feed_ids: Vec<FeedId>,
        authenticator: Arc<dyn RequestAuthenticator>,
    ) -> WsReportStream {
        WsReportStream {
            base_url: base_url.trim_end_matches('/').to_string(),
            feed_ids,
            authenticator,
            reader: None,
        }
    }

    fn path_and_query(&self) -> String {
        let feed_ids: Vec<String> = self.feed_ids.iter().map(FeedId::to_hex).collect();
        format!("{}?feedIDs={}", WS_PATH, feed_ids.join(","))
    }
}

#[async_trait]
impl ReportStream for WsReportStream {
    async fn connect(&mut self) -> Result<mpsc::Receiver<StreamEvent>, StreamError> {
        let path_and_query = self.path_and_query();
        let url = format!("{}{}", self.base_url, path_and_query);
        log::info!("Connecting to {}", url);

        let mut request = url
            .as_str()
            .into_client_request()
            .map_err(|e| StreamError::ConnectionFailed(e.to_string()))?;
        let headers = self
            .authenticator
            .headers("GET", &path_and_query)
            .map_err(|e| StreamError::ConnectionFailed(format!("{:#}", e)))?;
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| StreamError::ConnectionFailed(e.to_string()))?;
            let value = HeaderValue::from_str(&value)
                .map_err(|e| StreamError::ConnectionFailed(e.to_string()))?;
            request.headers_mut().insert(name, value);
        }

        let (socket, response) = connect_async(request)
            .await
            .map_err(|e| StreamError::ConnectionFailed(e.to_string()))?;
        log::info!(
            "Subscribed to {} feed(s), handshake status {}",
            self.feed_ids.len(),
            response.status()
        );

        let (sink, stream) = socket.split();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        self.reader = Some(tokio::spawn(read_frames(sink, stream, events_tx)));
        Ok(events_rx)
    }
}

impl Drop for WsReportStream {
    fn drop(&mut self) {
        if let Some(handle) = self.reader.take() {
            handle.abort();
        }
    }
}

fn parse_frame(text: &str) -> StreamEvent {
    match Report::from_json(text) {
        Ok(report) => StreamEvent::Report(report),
        Err(e) => {
            log::debug!("Unparseable frame: {}", text);
            StreamEvent::Error(StreamError::Protocol(e.to_string()))
        }
    }
}

async fn read_frames(
    mut sink: SplitSink<WsStream, Message>,
    mut stream: SplitStream<WsStream>,
    events: mpsc::Sender<StreamEvent>,
) {
    loop {
        let (event, done) = match stream.next().await {
            Some(Ok(Message::Text(text))) => (parse_frame(text.as_str()), false),
            Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                Ok(text) => (parse_frame(text), false),
                Err(e) => (StreamEvent::Error(StreamError::Protocol(e.to_string())), false),
            },
            Some(Ok(Message::Ping(data))) => {
                if let Err(e) = sink.send(Message::Pong(data)).await {
                    log::warn!("Failed to answer ping: {}", e);
                }
                continue;
            }
            Some(Ok(Message::Close(frame))) => {
                let (code, reason) = match frame {
                    Some(frame) => (
                        Some(u16::from(frame.code)),
                        frame.reason.as_str().to_string(),
                    ),
                    None => (None, String::new()),
                };
                (StreamEvent::Error(StreamError::Closed { code, reason }), true)
            }
            Some(Ok(_)) => continue,
            Some(Err(e)) => (StreamEvent::Error(StreamError::Transport(e.to_string())), true),
            None => (
                StreamEvent::Error(StreamError::Closed {
                    code: None,
                    reason: "stream ended".to_string(),
                }),
                true,
            ),
        };

        if events.send(event).await.is_err() {
            log::debug!("Event receiver dropped, stopping reader");
            return;
        }
        if done {
            return;
        }
    }
}
