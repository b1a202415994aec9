use futures::{SinkExt, StreamExt};
use notification_sync::infrastructure::{
    services::{StompCommand, StompFrame},
    SyncConfig,
};
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};

pub fn notification_json(id: &str, tenant_id: &str, read: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "subject": format!("subject {}", id),
        "message": format!("message {}", id),
        "createdAt": "2024-05-01T12:00:00Z",
        "read": read,
        "tenantId": tenant_id,
    })
}

/// Config pointing at a wiremock API and an in-process broker, with a short
/// reconnect delay and desktop notifications off.
pub fn test_config(api_url: &str, ws_url: &str) -> SyncConfig {
    let mut config = SyncConfig::new(api_url, ws_url)
        .with_reconnect(3, Duration::from_millis(50))
        .with_request_timeout(Duration::from_secs(5));
    config.desktop_notifications = false;
    config
}

/// Polls `condition` until it holds or five seconds pass.
pub async fn eventually<F>(what: &str, mut condition: F)
where
    F: FnMut() -> bool,
{
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

pub async fn eventually_async<F, Fut>(what: &str, mut condition: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..500 {
        if condition().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {}", what);
}

#[derive(Clone, Debug)]
enum BrokerCommand {
    Push(String),
    Kick,
}

/// In-process STOMP broker. Every connection is accepted, acknowledged and
/// sent whatever `push` broadcasts after its `SUBSCRIBE`.
pub struct Broker {
    pub url: String,
    commands: broadcast::Sender<BrokerCommand>,
    subscriptions: Arc<Mutex<Vec<String>>>,
}

impl Broker {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("ws://{}/ws", listener.local_addr().unwrap());
        let (commands, _) = broadcast::channel(64);
        let subscriptions = Arc::new(Mutex::new(Vec::new()));

        let accept_commands = commands.clone();
        let accept_subscriptions = subscriptions.clone();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let rx = accept_commands.subscribe();
                tokio::spawn(serve(stream, rx, accept_subscriptions.clone()));
            }
        });

        Self {
            url,
            commands,
            subscriptions,
        }
    }

    pub fn push(&self, body: serde_json::Value) {
        let _ = self.commands.send(BrokerCommand::Push(body.to_string()));
    }

    pub fn push_raw(&self, body: &str) {
        let _ = self.commands.send(BrokerCommand::Push(body.to_string()));
    }

    /// Drops every open connection.
    pub fn kick(&self) {
        let _ = self.commands.send(BrokerCommand::Kick);
    }

    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().clone()
    }

    pub async fn wait_for_subscriptions(&self, count: usize) {
        eventually("broker subscriptions", || self.subscriptions.lock().len() >= count).await;
    }
}

async fn recv_frame(ws: &mut WebSocketStream<TcpStream>) -> Option<StompFrame> {
    while let Some(Ok(message)) = ws.next().await {
        if let Message::Text(text) = message {
            if let Ok(Some(frame)) = StompFrame::parse(text.as_str()) {
                return Some(frame);
            }
        }
    }
    None
}

async fn serve(
    stream: TcpStream,
    mut commands: broadcast::Receiver<BrokerCommand>,
    subscriptions: Arc<Mutex<Vec<String>>>,
) {
    let Ok(mut ws) = accept_async(stream).await else {
        return;
    };

    match recv_frame(&mut ws).await {
        Some(frame) if frame.command == StompCommand::Connect => {}
        _ => return,
    }
    let connected = StompFrame::new(StompCommand::Connected).with_header("version", "1.2");
    if ws.send(Message::text(connected.encode())).await.is_err() {
        return;
    }

    let destination = match recv_frame(&mut ws).await {
        Some(frame) if frame.command == StompCommand::Subscribe => {
            frame.header("destination").unwrap_or_default().to_string()
        }
        _ => return,
    };
    subscriptions.lock().push(destination.clone());

    let mut sequence = 0u64;
    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Ok(BrokerCommand::Push(body)) => {
                    sequence += 1;
                    let frame = StompFrame::new(StompCommand::Message)
                        .with_header("destination", destination.as_str())
                        .with_header("message-id", sequence.to_string())
                        .with_body(body);
                    if ws.send(Message::text(frame.encode())).await.is_err() {
                        return;
                    }
                }
                Ok(BrokerCommand::Kick) | Err(_) => {
                    let _ = ws.close(None).await;
                    return;
                }
            },
            incoming = recv_frame(&mut ws) => match incoming {
                Some(frame) if frame.command == StompCommand::Disconnect => return,
                Some(_) => {}
                None => return,
            },
        }
    }
}
