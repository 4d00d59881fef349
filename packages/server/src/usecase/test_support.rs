//! ユースケースのテストで共有するフィクスチャ

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, ConnectionRegistry, MessagePusher, RoomId, TimerSettings},
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        repository::InMemoryRoomRepository,
    },
};

use super::relay::BroadcastRelay;

pub(crate) struct Harness {
    pub repository: Arc<InMemoryRoomRepository>,
    pub registry: Arc<InMemoryConnectionRegistry>,
    pub pusher: Arc<WebSocketMessagePusher>,
    pub relay: BroadcastRelay,
}

/// 登録済みの接続と、その接続へ送られたフレーム
pub(crate) struct TestClient {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl TestClient {
    /// これまでに受信した全フレーム（JSON としてデコード済み）
    pub fn drain(&mut self) -> Vec<Value> {
        let mut frames = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            frames.push(serde_json::from_str(&frame).expect("frame should be valid JSON"));
        }
        frames
    }

    /// これまでに受信した、指定した `type` のフレーム
    pub fn drain_type(&mut self, kind: &str) -> Vec<Value> {
        self.drain()
            .into_iter()
            .filter(|frame| frame["type"] == kind)
            .collect()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(TimerSettings::default())
    }

    pub fn with_settings(settings: TimerSettings) -> Self {
        let repository = Arc::new(InMemoryRoomRepository::new(settings));
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::default());
        let relay = BroadcastRelay::new(registry.clone(), pusher.clone());
        Self {
            repository,
            registry,
            pusher,
            relay,
        }
    }

    /// 接続を登録して `room` に参加させる
    pub async fn join(&self, room: &str) -> TestClient {
        let client = self.connect().await;
        self.registry.join(client.id, room_id(room)).await;
        client
    }

    /// どのルームにも参加せずに接続を登録する
    pub async fn connect(&self) -> TestClient {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = ConnectionId::generate();
        self.pusher.register_client(id, tx).await;
        TestClient { id, rx }
    }
}

pub(crate) fn room_id(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}
