//! ConnectionRegistry trait 定義
//!
//! 各接続がどのルームに参加しているかを管理するインターフェース。
//! 1 つの接続は同時に 1 つのルームにのみ参加できます。

use async_trait::async_trait;

use super::value_object::{ConnectionId, RoomId, Timestamp};

/// ルームに参加している接続の情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub connection_id: ConnectionId,
    pub joined_at: Timestamp,
}

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 接続をルームに参加させる。以前のルームからは抜け、そのルームを返す
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> Option<RoomId>;

    /// 接続をレジストリから削除し、参加していたルームを返す
    async fn leave(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 接続が現在参加しているルーム
    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// ルームに参加している接続 ID の一覧
    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId>;

    /// ルームに参加している接続の詳細（参加時刻順）
    async fn member_details(&self, room_id: &RoomId) -> Vec<Member>;
}
