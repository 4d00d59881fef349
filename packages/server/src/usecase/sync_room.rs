//! UseCase: ルームのスナップショット送信（途中参加者の追いつき）
//!
//! スナップショットはルームのロックを保持したまま作成・送信するため、
//! 並行する変更と混ざった中途半端な状態になることはありません。
//! また、この後にリレーされるイベントは必ずスナップショットの後に届きます。

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomEvent, RoomId, RoomRepository, RoomSnapshot};

use super::relay::BroadcastRelay;

/// スナップショット送信のユースケース
pub struct SyncRoomUseCase {
    repository: Arc<dyn RoomRepository>,
    relay: BroadcastRelay,
}

impl SyncRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, relay: BroadcastRelay) -> Self {
        Self { repository, relay }
    }

    /// ルームの現在の画像とドローイングログを要求元にだけ送信する
    pub async fn execute(&self, room_id: &RoomId, requester: &ConnectionId) -> RoomSnapshot {
        let room = self.repository.get_or_create(room_id).await;
        let state = room.lock().await;
        let snapshot = RoomSnapshot {
            room_id: room_id.clone(),
            images: state.document.images().cloned().collect(),
            drawings: state.document.drawing_log().to_vec(),
        };
        tracing::debug!(
            "Sending snapshot of room '{}' ({} images, {} drawings) to '{}'",
            room_id,
            snapshot.images.len(),
            snapshot.drawings.len(),
            requester
        );
        self.relay
            .unicast(requester, &RoomEvent::Snapshot(snapshot.clone()))
            .await;
        snapshot
    }
}
