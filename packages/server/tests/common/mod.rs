//! Test helpers: an in-process server on an ephemeral port and a JSON WebSocket client.

#![allow(dead_code)]

use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kokuban_server::{
    domain::TimerSettings,
    ui::{router, state::AppState},
};
use serde_json::{Value, json};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

const RECV_TIMEOUT: Duration = Duration::from_secs(5);

pub struct TestServer {
    pub addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(TimerSettings::default(), Duration::from_secs(1)).await
    }

    pub async fn start_with(settings: TimerSettings, tick_period: Duration) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind ephemeral port");
        let addr = listener.local_addr().expect("Failed to read local addr");
        let app = router(Arc::new(AppState::in_memory(settings, tick_period)));
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });
        Self { addr, handle }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn connect(&self) -> WsClient {
        WsClient::connect(&self.ws_url()).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl WsClient {
    /// Connect and consume the `connected` greeting.
    pub async fn connect(url: &str) -> Self {
        let (stream, _) = connect_async(url).await.expect("Failed to connect");
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };
        let greeting = client.recv().await;
        assert_eq!(greeting["type"], "connected");
        client.connection_id = greeting["connectionId"]
            .as_str()
            .expect("connectionId should be a string")
            .to_string();
        client
    }

    pub async fn send(&mut self, frame: Value) {
        self.send_raw(&frame.to_string()).await;
    }

    pub async fn send_raw(&mut self, text: &str) {
        self.stream
            .send(Message::Text(text.to_string().into()))
            .await
            .expect("Failed to send frame");
    }

    /// Next text frame, decoded.
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("Timed out waiting for a frame")
                .expect("Stream closed")
                .expect("WebSocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("Frame should be JSON");
            }
        }
    }

    /// Skip frames until one of type `kind` arrives.
    pub async fn recv_type(&mut self, kind: &str) -> Value {
        loop {
            let frame = self.recv().await;
            if frame["type"] == kind {
                return frame;
            }
        }
    }

    /// Round trip through the server. Every command sent before this one has been processed
    /// once it returns, and every frame queued for this client before it has been received.
    pub async fn sync(&mut self) -> Vec<Value> {
        self.send(json!({"type": "timer_request_sync", "roomId": "__sync__"}))
            .await;
        let mut before = Vec::new();
        loop {
            let frame = self.recv().await;
            if frame["type"] == "timer_state" && frame["roomId"] == "__sync__" {
                return before;
            }
            before.push(frame);
        }
    }

    /// Join `room` and wait until the server has processed it.
    pub async fn join(&mut self, room: &str) {
        self.send(json!({"type": "join", "roomId": room})).await;
        self.sync().await;
    }

    pub async fn close(mut self) {
        let _ = self.stream.close(None).await;
    }
}
