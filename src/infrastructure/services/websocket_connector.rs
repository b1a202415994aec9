use super::stomp::{StompCommand, StompFrame};
use crate::domain::{
    entities::TenantId,
    error::{DomainError, DomainResult},
    services::{PushConnector, PushSession},
};
use crate::infrastructure::config::SyncConfig;
use async_trait::async_trait;
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

const SUBSCRIPTION_ID: &str = "sub-0";

/// Push connector speaking STOMP over a WebSocket.
///
/// `open` only resolves after the broker's `CONNECTED` frame and the
/// `SUBSCRIBE` for the tenant topic have gone through.
pub struct StompPushConnector {
    ws_url: String,
    auth_token: Option<String>,
    topic_prefix: String,
    handshake_timeout: Duration,
}

impl StompPushConnector {
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            ws_url: config.ws_url.clone(),
            auth_token: config.auth_token.clone(),
            topic_prefix: config.topic_prefix.trim_end_matches('/').to_string(),
            handshake_timeout: config.request_timeout,
        }
    }

    fn host(&self) -> &str {
        let rest = self
            .ws_url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.ws_url);
        rest.split(['/', '?']).next().unwrap_or(rest)
    }

    async fn handshake(&self, tenant_id: &TenantId) -> DomainResult<StompSession> {
        let (ws_stream, _) = connect_async(self.ws_url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        let connect = StompFrame::connect(self.host(), self.auth_token.as_deref());
        write.send(Message::text(connect.encode())).await?;

        loop {
            let message = read.next().await.ok_or_else(|| {
                DomainError::TransportError("Connection closed during handshake".to_string())
            })??;

            match message {
                Message::Text(text) => match StompFrame::parse(text.as_str())? {
                    Some(frame) if frame.command == StompCommand::Connected => {
                        debug!(
                            "STOMP session established (version {})",
                            frame.header("version").unwrap_or("unknown")
                        );
                        break;
                    }
                    Some(frame) if frame.command == StompCommand::Error => {
                        return Err(broker_error(&frame));
                    }
                    Some(frame) => debug!("Ignoring {} frame during handshake", frame.command),
                    None => {}
                },
                Message::Ping(data) => write.send(Message::Pong(data)).await?,
                Message::Close(_) => {
                    return Err(DomainError::TransportError(
                        "Connection closed during handshake".to_string(),
                    ))
                }
                _ => {}
            }
        }

        let destination = format!("{}/{}", self.topic_prefix, tenant_id);
        write
            .send(Message::text(
                StompFrame::subscribe(SUBSCRIPTION_ID, &destination).encode(),
            ))
            .await?;
        info!("Subscribed to {}", destination);

        Ok(StompSession {
            write,
            read,
            closed: false,
        })
    }
}

#[async_trait]
impl PushConnector for StompPushConnector {
    async fn open(&self, tenant_id: &TenantId) -> DomainResult<Box<dyn PushSession>> {
        info!("Connecting to push endpoint {}", self.ws_url);
        let session = timeout(self.handshake_timeout, self.handshake(tenant_id))
            .await
            .map_err(|_| {
                DomainError::TransportError(format!(
                    "Handshake with {} timed out",
                    self.ws_url
                ))
            })??;
        Ok(Box::new(session))
    }
}

fn broker_error(frame: &StompFrame) -> DomainError {
    let message = frame.header("message").unwrap_or(frame.body.as_str());
    DomainError::TransportError(format!("Broker error: {}", message))
}

pub struct StompSession {
    write: SplitSink<WsStream, Message>,
    read: SplitStream<WsStream>,
    closed: bool,
}

impl StompSession {
    /// `Some(body)` for a `MESSAGE`, `None` for frames to skip.
    fn decode(raw: &str) -> DomainResult<Option<String>> {
        let frame = match StompFrame::parse(raw) {
            Ok(Some(frame)) => frame,
            Ok(None) => return Ok(None),
            Err(e) => {
                warn!("Dropping undecodable STOMP frame: {}", e);
                return Ok(None);
            }
        };

        match frame.command {
            StompCommand::Message => Ok(Some(frame.body)),
            StompCommand::Error => Err(broker_error(&frame)),
            other => {
                debug!("Ignoring {} frame", other);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl PushSession for StompSession {
    async fn next_frame(&mut self) -> Option<DomainResult<String>> {
        loop {
            let message = match self.read.next().await? {
                Ok(message) => message,
                Err(e) => return Some(Err(e.into())),
            };

            let decoded = match message {
                Message::Text(text) => Self::decode(text.as_str()),
                Message::Binary(data) => match std::str::from_utf8(&data) {
                    Ok(text) => Self::decode(text),
                    Err(_) => {
                        warn!("Dropping non UTF-8 binary frame");
                        Ok(None)
                    }
                },
                Message::Ping(data) => {
                    if let Err(e) = self.write.send(Message::Pong(data)).await {
                        return Some(Err(e.into()));
                    }
                    Ok(None)
                }
                Message::Close(_) => {
                    info!("Push connection closed by server");
                    self.closed = true;
                    return None;
                }
                _ => Ok(None),
            };

            match decoded {
                Ok(Some(body)) => return Some(Ok(body)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }

    async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        let disconnect = Message::text(StompFrame::disconnect().encode());
        if let Err(e) = self.write.send(disconnect).await {
            debug!("Failed to send DISCONNECT: {}", e);
        }
        if let Err(e) = self.write.send(Message::Close(None)).await {
            debug!("Failed to send close frame: {}", e);
        }
        let _ = self.write.close().await;
    }
}
