//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロックの粒度
//!
//! マップ全体の `RwLock` はルームの検索・作成の間だけ保持します。
//! ルーム状態の変更はルームごとの `Mutex` で直列化されるため、
//! 異なるルームへのコマンドは並行に処理されます。
//!
//! ルームは削除されません（プロセス終了まで保持）。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};

use crate::domain::{RoomId, RoomRepository, RoomState, SharedRoom, TimerSettings, Timestamp};
use kokuban_shared::time::{Clock, SystemClock};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    rooms: RwLock<HashMap<RoomId, SharedRoom>>,
    /// 新しいルームのタイマー設定
    default_settings: TimerSettings,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// 新しい InMemoryRoomRepository を作成
    pub fn new(default_settings: TimerSettings) -> Self {
        Self::with_clock(default_settings, Arc::new(SystemClock))
    }

    /// 時刻の取得元を指定して作成（テスト用）
    pub fn with_clock(default_settings: TimerSettings, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            default_settings,
            clock,
        }
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn get_or_create(&self, room_id: &RoomId) -> SharedRoom {
        if let Some(room) = self.rooms.read().await.get(room_id) {
            return room.clone();
        }

        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room_id.clone())
            .or_insert_with(|| {
                tracing::info!("Room '{}' created", room_id);
                Arc::new(Mutex::new(RoomState::new(
                    room_id.clone(),
                    Timestamp::new(self.clock.now_millis()),
                    self.default_settings,
                )))
            })
            .clone()
    }

    async fn find(&self, room_id: &RoomId) -> Option<SharedRoom> {
        self.rooms.read().await.get(room_id).cloned()
    }

    async fn room_ids(&self) -> Vec<RoomId> {
        let mut ids: Vec<RoomId> = self.rooms.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }
}
