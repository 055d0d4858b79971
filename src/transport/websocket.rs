use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream, StreamExt};
use futures::SinkExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use super::{TransportEvent, TransportFactory, TransportSink, TransportStream};
use crate::types::Result;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Production [`TransportFactory`] backed by `tokio-tungstenite`.
pub struct WebSocketConnector;

#[async_trait]
impl TransportFactory for WebSocketConnector {
    async fn connect(
        &self,
        url: &str,
    ) -> Result<(Box<dyn TransportSink>, Box<dyn TransportStream>)> {
        tracing::debug!("Opening WebSocket connection to {}", url);
        let (ws_stream, _response) = connect_async(url).await?;
        let (write_half, read_half) = ws_stream.split();

        Ok((
            Box::new(WebSocketSink { write: write_half }),
            Box::new(WebSocketReader { read: read_half }),
        ))
    }
}

struct WebSocketSink {
    write: SplitSink<WsStream, Message>,
}

#[async_trait]
impl TransportSink for WebSocketSink {
    async fn send(&mut self, text: String) -> Result<()> {
        self.write.send(Message::Text(text.into())).await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.write.close().await?;
        Ok(())
    }
}

struct WebSocketReader {
    read: SplitStream<WsStream>,
}

#[async_trait]
impl TransportStream for WebSocketReader {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        // Control frames are handled here so the manager only ever sees text
        // frames, errors, and end-of-stream.
        while let Some(msg_result) = self.read.next().await {
            match msg_result {
                Ok(Message::Text(text)) => {
                    return Some(TransportEvent::Text(text.to_string()));
                }
                Ok(Message::Close(frame)) => {
                    if let Some(close_frame) = frame {
                        tracing::warn!(
                            "Server closed connection: code={:?}, reason='{}'",
                            close_frame.code,
                            close_frame.reason
                        );
                    } else {
                        tracing::warn!("Server closed connection without close frame");
                    }
                    return None;
                }
                Ok(Message::Ping(data)) => {
                    tracing::debug!("Received ping ({} bytes)", data.len());
                }
                Ok(Message::Pong(data)) => {
                    tracing::debug!("Received pong ({} bytes)", data.len());
                }
                Ok(Message::Binary(data)) => {
                    tracing::warn!("Received unexpected binary message ({} bytes)", data.len());
                }
                Ok(Message::Frame(_)) => {
                    tracing::debug!("Received raw frame (internal)");
                }
                Err(e) => {
                    return Some(TransportEvent::Error(e.to_string()));
                }
            }
        }
        None
    }
}
