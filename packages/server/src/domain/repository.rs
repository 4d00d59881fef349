//! Repository trait 定義
//!
//! ルーム状態のストアへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{entity::RoomState, value_object::RoomId};

/// ルームごとのロックで保護されたルーム状態
///
/// 異なるルームへのコマンドは互いにブロックしない。
pub type SharedRoom = Arc<Mutex<RoomState>>;

/// Room Repository trait
///
/// ルームは最初に参照されたときに作成され、プロセスが終了するまで削除されない。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを取得する。存在しなければデフォルト値で作成する（冪等）
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom;

    /// 既存のルームを取得する。ルームは作成しない
    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom>;

    /// 全てのルーム ID（ソート済み）
    async fn room_ids(&self) -> Vec<RoomId>;
}
