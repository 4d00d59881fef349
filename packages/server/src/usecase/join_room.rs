//! UseCase: ルームへの参加とコマンドの宛先ルーム解決
//!
//! 宛先ルームは「明示的な roomId → 接続が最後に参加したルーム → "global"」の順に決まります。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() / resolve() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：roomId 指定での参加、別ルームへの移動
//! - エッジケース：roomId 省略、空文字の roomId

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, RoomId, RoomRepository};

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl JoinRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 接続をルームに参加させる。ルームが無ければ作成する
    ///
    /// roomId が省略された場合は `"global"` に参加する。
    pub async fn execute(&self, connection_id: ConnectionId, requested: Option<String>) -> RoomId {
        let room_id = RoomId::resolve(requested, None);
        self.repository.get_or_create(&room_id).await;
        let previous = self.registry.join(connection_id, room_id.clone()).await;
        match previous {
            Some(previous) if previous != room_id => tracing::info!(
                "Connection '{}' moved from room '{}' to '{}'",
                connection_id,
                previous,
                room_id
            ),
            _ => tracing::info!("Connection '{}' joined room '{}'", connection_id, room_id),
        }
        room_id
    }

    /// コマンドの宛先ルームを決める
    pub async fn resolve(&self, connection_id: &ConnectionId, requested: Option<String>) -> RoomId {
        let current = self.registry.room_of(connection_id).await;
        RoomId::resolve(requested, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::FALLBACK_ROOM_ID,
        usecase::test_support::{Harness, room_id},
    };

    fn usecase(harness: &Harness) -> JoinRoomUseCase {
        JoinRoomUseCase::new(harness.repository.clone(), harness.registry.clone())
    }

    #[tokio::test]
    async fn test_join_creates_room_and_membership() {
        // テスト項目: 参加するとルームが作成され、メンバーとして登録される
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.connect().await;
        let usecase = usecase(&harness);

        // when (操作):
        let joined = usecase.execute(alice.id, Some("r".to_string())).await;

        // then (期待する結果):
        assert_eq!(joined, room_id("r"));
        assert!(harness.repository.find(&room_id("r")).await.is_some());
        assert_eq!(harness.registry.members(&room_id("r")).await, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_join_without_room_uses_fallback() {
        // テスト項目: roomId 省略・空文字では "global" に参加する
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.connect().await;
        let bob = harness.connect().await;
        let usecase = usecase(&harness);

        // when (操作):
        let a = usecase.execute(alice.id, None).await;
        let b = usecase.execute(bob.id, Some("  ".to_string())).await;

        // then (期待する結果):
        assert_eq!(a.as_str(), FALLBACK_ROOM_ID);
        assert_eq!(b.as_str(), FALLBACK_ROOM_ID);
    }

    #[tokio::test]
    async fn test_join_moves_membership() {
        // テスト項目: 別ルームに参加すると前のルームから抜ける
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.connect().await;
        let usecase = usecase(&harness);
        usecase.execute(alice.id, Some("a".to_string())).await;

        // when (操作):
        usecase.execute(alice.id, Some("b".to_string())).await;

        // then (期待する結果):
        assert!(harness.registry.members(&room_id("a")).await.is_empty());
        assert_eq!(harness.registry.members(&room_id("b")).await, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_resolve_prefers_explicit_then_current_room() {
        // テスト項目: 宛先ルームは明示指定 → 参加中のルーム → "global" の順で決まる
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.connect().await;
        let bob = harness.connect().await;
        let usecase = usecase(&harness);
        usecase.execute(alice.id, Some("r".to_string())).await;

        // when (操作):
        let explicit = usecase.resolve(&alice.id, Some("other".to_string())).await;
        let current = usecase.resolve(&alice.id, None).await;
        let fallback = usecase.resolve(&bob.id, None).await;

        // then (期待する結果):
        assert_eq!(explicit, room_id("other"));
        assert_eq!(current, room_id("r"));
        assert_eq!(fallback.as_str(), FALLBACK_ROOM_ID);
    }
}
