//! Broadcast Relay：ルームのイベントを参加中の接続へ配信する
//!
//! 配信は接続ごとのチャンネルへフレームを積むだけなので、ルームのロックを保持したまま
//! 呼び出せる。これにより 1 ルーム内のイベントは状態が変わった順に届く。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, RoomEvent, RoomId};

#[derive(Clone)]
pub struct BroadcastRelay {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastRelay {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// `origin` 以外の `room_id` の参加者全員へ `event` を送る
    ///
    /// 送信できた接続を返す
    pub async fn publish(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        event: &RoomEvent,
    ) -> Vec<ConnectionId> {
        let targets: Vec<ConnectionId> = self
            .registry
            .members(room_id)
            .await
            .into_iter()
            .filter(|id| id != origin)
            .collect();
        self.deliver(room_id, targets, event).await
    }

    /// 送信元も含めて `room_id` の参加者全員へ `event` を送る
    pub async fn broadcast(&self, room_id: &RoomId, event: &RoomEvent) -> Vec<ConnectionId> {
        let targets = self.registry.members(room_id).await;
        self.deliver(room_id, targets, event).await
    }

    /// 1 つの接続へ `event` を送る。送信できたかどうかを返す
    pub async fn unicast(&self, connection_id: &ConnectionId, event: &RoomEvent) -> bool {
        match self.message_pusher.push_to(connection_id, event).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    "Failed to send '{}' to '{}': {}",
                    event.kind(),
                    connection_id,
                    e
                );
                false
            }
        }
    }

    async fn deliver(
        &self,
        room_id: &RoomId,
        targets: Vec<ConnectionId>,
        event: &RoomEvent,
    ) -> Vec<ConnectionId> {
        if let Err(e) = self.message_pusher.broadcast(targets.clone(), event).await {
            tracing::warn!(
                "Failed to relay '{}' in room '{}': {}",
                event.kind(),
                room_id,
                e
            );
        }
        targets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MessagePushError, pusher::MockMessagePusher},
        infrastructure::registry::InMemoryConnectionRegistry,
    };

    fn room_id(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn started(room: &RoomId) -> RoomEvent {
        RoomEvent::TimerStarted {
            room_id: room.clone(),
        }
    }

    #[tokio::test]
    async fn test_publish_excludes_origin() {
        // テスト項目: publish は発信元以外のルームメンバーにだけ配信する
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (alice, bob, carol) = (
            ConnectionId::generate(),
            ConnectionId::generate(),
            ConnectionId::generate(),
        );
        registry.join(alice, room_id("r")).await;
        registry.join(bob, room_id("r")).await;
        registry.join(carol, room_id("other")).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(move |targets, _| targets == &vec![bob])
            .times(1)
            .returning(|_, _| Ok(()));
        let relay = BroadcastRelay::new(registry, Arc::new(pusher));

        // when (操作):
        let targets = relay
            .publish(&room_id("r"), &alice, &started(&room_id("r")))
            .await;

        // then (期待する結果):
        assert_eq!(targets, vec![bob]);
    }

    #[tokio::test]
    async fn test_broadcast_includes_every_member() {
        // テスト項目: broadcast は発信元を含むルームの全メンバーに配信する
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let alice = ConnectionId::generate();
        let bob = ConnectionId::generate();
        registry.join(alice, room_id("r")).await;
        registry.join(bob, room_id("r")).await;

        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_broadcast()
            .withf(|targets, _| targets.len() == 2)
            .times(1)
            .returning(|_, _| Ok(()));
        let relay = BroadcastRelay::new(registry, Arc::new(pusher));

        // when (操作):
        let targets = relay.broadcast(&room_id("r"), &started(&room_id("r"))).await;

        // then (期待する結果):
        assert!(targets.contains(&alice));
        assert!(targets.contains(&bob));
    }

    #[tokio::test]
    async fn test_unicast_failure_is_reported_not_raised() {
        // テスト項目: unicast の送信失敗はエラーにせず false を返す
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(1)
            .returning(|id, _| Err(MessagePushError::ClientNotFound(id.to_string())));
        let relay = BroadcastRelay::new(registry, Arc::new(pusher));

        // when (操作):
        let delivered = relay
            .unicast(&ConnectionId::generate(), &started(&room_id("r")))
            .await;

        // then (期待する結果):
        assert!(!delivered);
    }
}
