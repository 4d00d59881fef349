//! UseCase: ルーム一覧取得（HTTP API 用の読み取り専用ビュー）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - GetRoomsUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：複数ルームが ID 順に返り、メンバー数・画像・ドローイング数が反映される
//! - エッジケース：ルームが 1 つも無い

use std::sync::Arc;

use crate::domain::{
    ConnectionRegistry, ImageDescriptor, Member, RoomId, RoomRepository, SharedRoom, Timestamp,
    TimerState,
};

/// ルームの読み取り専用ビュー
#[derive(Debug, Clone, PartialEq)]
pub struct RoomOverview {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub members: Vec<Member>,
    pub images: Vec<ImageDescriptor>,
    pub drawings: usize,
    pub timer: TimerState,
}

impl RoomOverview {
    /// ルームのロックを短時間だけ取って現在の状態を写し取る
    pub(crate) async fn capture(room: &SharedRoom, registry: &dyn ConnectionRegistry) -> Self {
        let (id, created_at, images, drawings, timer) = {
            let state = room.lock().await;
            (
                state.id.clone(),
                state.created_at,
                state.document.images().cloned().collect(),
                state.document.drawing_log().len(),
                state.timer.clone(),
            )
        };
        let members = registry.member_details(&id).await;
        Self {
            id,
            created_at,
            members,
            images,
            drawings,
            timer,
        }
    }
}

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            repository,
            registry,
        }
    }

    /// 全ルームを ID 順で返す
    pub async fn execute(&self) -> Vec<RoomOverview> {
        let mut rooms = Vec::new();
        for room_id in self.repository.room_ids().await {
            if let Some(room) = self.repository.find(&room_id).await {
                rooms.push(RoomOverview::capture(&room, self.registry.as_ref()).await);
            }
        }
        rooms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::DrawingSegment,
        usecase::{
            edit_document::EditDocumentUseCase,
            test_support::{Harness, room_id},
        },
    };

    #[tokio::test]
    async fn test_get_rooms_empty() {
        // テスト項目: ルームが無ければ空の一覧を返す
        // given (前提条件):
        let harness = Harness::new();
        let usecase = GetRoomsUseCase::new(harness.repository.clone(), harness.registry.clone());

        // when (操作):
        let rooms = usecase.execute().await;

        // then (期待する結果):
        assert!(rooms.is_empty());
    }

    #[tokio::test]
    async fn test_get_rooms_sorted_with_counts() {
        // テスト項目: ルームは ID 順に並び、メンバー数とドローイング数が反映される
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("zeta").await;
        let _bob = harness.join("alpha").await;
        let _carol = harness.join("alpha").await;
        harness.repository.get_or_create(&room_id("zeta")).await;
        harness.repository.get_or_create(&room_id("alpha")).await;
        let editor = EditDocumentUseCase::new(harness.repository.clone(), harness.relay.clone());
        editor
            .append_drawing(&room_id("zeta"), &alice.id, DrawingSegment::default())
            .await;

        // when (操作):
        let usecase = GetRoomsUseCase::new(harness.repository.clone(), harness.registry.clone());
        let rooms = usecase.execute().await;

        // then (期待する結果):
        let ids: Vec<&str> = rooms.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
        assert_eq!(rooms[0].members.len(), 2);
        assert_eq!(rooms[0].drawings, 0);
        assert_eq!(rooms[1].members.len(), 1);
        assert_eq!(rooms[1].drawings, 1);
    }
}
