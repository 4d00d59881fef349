//! UseCase: WebSocket 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - レジストリと MessagePusher の両方から接続が消えること
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム参加中の接続の切断
//! - エッジケース：どのルームにも参加していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, RoomId};

/// 接続切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 接続をレジストリから外し、送信チャンネルを登録解除する
    ///
    /// # Returns
    ///
    /// 切断時に参加していたルーム（未参加なら `None`）
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let left = self.registry.leave(connection_id).await;
        self.message_pusher.unregister_client(connection_id).await;
        left
    }
}
