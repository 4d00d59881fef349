//! UseCase: WebSocket 接続の登録
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() メソッド
//! - サーバー採番の ConnectionId と connected 通知
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続ごとに異なる ID が割り当てられる
//! - エッジケース：接続直後はどのルームにも参加していない

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel, RoomEvent};

/// 接続登録のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続に ID を割り当てて送信チャンネルを登録し、connected を通知する
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル
    ///
    /// # Returns
    ///
    /// 割り当てた `ConnectionId`
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id, sender)
            .await;

        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &RoomEvent::Connected { connection_id })
            .await
        {
            tracing::warn!("Failed to greet '{}': {}", connection_id, e);
        }

        connection_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pusher::MockMessagePusher;
    use crate::usecase::test_support::Harness;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_connect_assigns_id_and_sends_connected() {
        // テスト項目: 接続すると ID が割り当てられ、connected フレームが届く
        // given (前提条件):
        let harness = Harness::new();
        let usecase = ConnectClientUseCase::new(harness.pusher.clone());
        let (tx, mut rx) = mpsc::unbounded_channel();

        // when (操作):
        let connection_id = usecase.execute(tx).await;

        // then (期待する結果):
        let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(frame["type"], "connected");
        assert_eq!(frame["connectionId"], connection_id.to_string());
    }

    #[tokio::test]
    async fn test_connect_assigns_distinct_ids() {
        // テスト項目: 接続ごとに異なる ID が割り当てられる
        // given (前提条件):
        let harness = Harness::new();
        let usecase = ConnectClientUseCase::new(harness.pusher.clone());

        // when (操作):
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, _rx2) = mpsc::unbounded_channel();
        let first = usecase.execute(tx1).await;
        let second = usecase.execute(tx2).await;

        // then (期待する結果):
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_connect_registers_before_greeting() {
        // テスト項目: 送信チャンネルの登録後に connected を送る
        // given (前提条件):
        let mut pusher = MockMessagePusher::new();
        let mut seq = mockall::Sequence::new();
        pusher
            .expect_register_client()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        pusher
            .expect_push_to()
            .withf(|_, event| matches!(event, RoomEvent::Connected { .. }))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        let usecase = ConnectClientUseCase::new(Arc::new(pusher));
        let (tx, _rx) = mpsc::unbounded_channel();

        // when (操作):
        usecase.execute(tx).await;

        // then (期待する結果): モックの期待値が満たされていること
    }
}
