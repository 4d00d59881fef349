//! UseCase: ルーム詳細取得（HTTP API 用の読み取り専用ビュー）
//!
//! 読み取りはルームを作成しません。存在しないルームは `RoomNotFound` になります。

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, RoomId, RoomRepository};

use super::{error::GetRoomDetailError, get_rooms::RoomOverview};

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomDetailUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    pub async fn execute(&self, room_id: String) -> Result<RoomOverview, GetRoomDetailError> {
        let room_id = RoomId::new(room_id).map_err(|_| GetRoomDetailError::InvalidRoomId)?;
        let room = self
            .repository
            .find(&room_id)
            .await
            .ok_or_else(|| GetRoomDetailError::RoomNotFound(room_id.to_string()))?;
        Ok(RoomOverview::capture(&room, self.registry.as_ref()).await)
    }
}
