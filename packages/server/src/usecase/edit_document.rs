//! UseCase: ドキュメント（ストローク・画像）の変更
//!
//! ## 概要
//!
//! Document Mutator。ルームのドキュメントを変更し、同じイベントを発信元以外の
//! ルームメンバーへリレーします。全ての操作は失敗しません。
//!
//! - 存在しない画像への更新・削除はサーバー状態を変えず、イベントのリレーだけ行う
//!   （`MutationOutcome::RelayOnly`）。クライアントはイベントの順序が前後しても
//!   最終的に一致する
//! - ストロークの座標は検証せず、受け取ったまま保存・転送する
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 各操作がルーム状態に反映され、発信元以外にリレーされること
//! - 存在しない画像への更新が RelayOnly として扱われること
//! - clear が対象ルームだけに作用し、タイマーに触れないこと
//! - 数値でない幅の画像更新が切り上げられずに保存・リレーされること

use std::sync::Arc;

use crate::domain::{
    ConnectionId, DrawingSegment, ImageDescriptor, ImageId, Lenient, MutationOutcome, RoomEvent,
    RoomId, RoomRepository,
};

use super::relay::BroadcastRelay;

/// ドキュメント変更のユースケース
pub struct EditDocumentUseCase {
    repository: Arc<dyn RoomRepository>,
    relay: BroadcastRelay,
}

impl EditDocumentUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>, relay: BroadcastRelay) -> Self {
        Self { repository, relay }
    }

    /// ストロークをドローイングログに追加し、リレーする
    pub async fn append_drawing(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        segment: DrawingSegment,
    ) -> MutationOutcome {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.document.append_drawing(segment.clone());

        let event = RoomEvent::Drawing {
            room_id: room_id.clone(),
            segment,
        };
        self.relay.publish(room_id, origin, &event).await;
        MutationOutcome::Applied
    }

    /// 画像を追加し、リレーする。同じ ID の画像は上書きされる（後勝ち）
    pub async fn add_image(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        image: ImageDescriptor,
    ) -> MutationOutcome {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.document.add_image(image.clone());
        tracing::debug!("Image '{}' added to room '{}'", image.id.as_str(), room_id);

        let event = RoomEvent::ImageAdded {
            room_id: room_id.clone(),
            image,
        };
        self.relay.publish(room_id, origin, &event).await;
        MutationOutcome::Applied
    }

    /// 画像を置き換え、リレーする（移動・リサイズ）
    ///
    /// 幅・高さは最小サイズに切り上げられる。画像が存在しない場合も更新イベントはリレーされる。
    pub async fn update_image(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        image: ImageDescriptor,
    ) -> MutationOutcome {
        let image = image.with_min_size();
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        let outcome = state.document.update_image(image.clone());
        if outcome == MutationOutcome::RelayOnly {
            tracing::debug!(
                "Image '{}' is unknown in room '{}', relaying update only",
                image.id.as_str(),
                room_id
            );
        }

        let event = RoomEvent::ImageUpdated {
            room_id: room_id.clone(),
            image,
        };
        self.relay.publish(room_id, origin, &event).await;
        outcome
    }

    /// 画像を削除し、リレーする。画像が存在しない場合も削除イベントはリレーされる
    pub async fn delete_image(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        image_id: ImageId,
    ) -> MutationOutcome {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        let outcome = state.document.delete_image(&image_id);
        if outcome == MutationOutcome::RelayOnly {
            tracing::debug!(
                "Image '{}' is unknown in room '{}', relaying deletion only",
                image_id.as_str(),
                room_id
            );
        }

        let event = RoomEvent::ImageDeleted {
            room_id: room_id.clone(),
            image_id,
        };
        self.relay.publish(room_id, origin, &event).await;
        outcome
    }

    /// 画像とドローイングログを空にし、リレーする。タイマーには触れない
    pub async fn clear(
        &self,
        room_id: &RoomId,
        origin: &ConnectionId,
        client_id: Option<Lenient<String>>,
    ) -> MutationOutcome {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.document.clear();
        tracing::info!("Room '{}' cleared by '{}'", room_id, origin);

        let event = RoomEvent::Cleared {
            room_id: room_id.clone(),
            client_id,
        };
        self.relay.publish(room_id, origin, &event).await;
        MutationOutcome::Applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Line, MIN_IMAGE_SIZE, Point},
        usecase::test_support::{Harness, room_id},
    };

    fn usecase(harness: &Harness) -> EditDocumentUseCase {
        EditDocumentUseCase::new(harness.repository.clone(), harness.relay.clone())
    }

    fn image(id: &str) -> ImageDescriptor {
        ImageDescriptor::placed(
            ImageId::new(id.to_string()),
            "data:image/png;base64,AAAA",
            10.0,
            20.0,
            200.0,
            100.0,
        )
    }

    fn segment(n: f64) -> DrawingSegment {
        DrawingSegment {
            client_id: Some("alice".to_string().into()),
            line: Line {
                from: Point {
                    x: Some(n.into()),
                    y: Some(n.into()),
                },
                to: Point {
                    x: Some((n + 1.0).into()),
                    y: Some((n + 1.0).into()),
                },
            },
            color: Some("#222".to_string().into()),
            width: Some(3.0.into()),
        }
    }

    #[tokio::test]
    async fn test_drawing_is_relayed_to_others_only() {
        // テスト項目: A のストロークは B に届き、A 自身には届かない
        // given (前提条件):
        let harness = Harness::new();
        let mut alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let usecase = usecase(&harness);

        // when (操作):
        usecase
            .append_drawing(&room_id("r"), &alice.id, segment(1.0))
            .await;

        // then (期待する結果):
        assert!(alice.drain().is_empty());
        let frames = bob.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "drawing");
        assert_eq!(frames[0]["roomId"], "r");
        assert_eq!(frames[0]["clientId"], "alice");
        assert_eq!(frames[0]["line"]["to"]["x"], 2.0);

        let room = harness.repository.get_or_create(&room_id("r")).await;
        assert_eq!(room.lock().await.document.drawing_log(), &[segment(1.0)]);
    }

    #[tokio::test]
    async fn test_update_unknown_image_relays_without_mutation() {
        // テスト項目: 存在しない画像の更新は状態を変えないが、イベントはリレーされる
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let usecase = usecase(&harness);
        usecase.add_image(&room_id("r"), &alice.id, image("a")).await;
        bob.drain();

        // when (操作):
        let outcome = usecase
            .update_image(&room_id("r"), &alice.id, image("ghost"))
            .await;

        // then (期待する結果):
        assert_eq!(outcome, MutationOutcome::RelayOnly);
        let room = harness.repository.get_or_create(&room_id("r")).await;
        let state = room.lock().await;
        assert_eq!(state.document.image_count(), 1);
        assert!(state.document.image(&ImageId::new("ghost".to_string())).is_none());

        let frames = bob.drain();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0]["type"], "image_updated");
        assert_eq!(frames[0]["image"]["id"], "ghost");
    }

    #[tokio::test]
    async fn test_update_image_clamps_size() {
        // テスト項目: 画像の更新時、幅・高さは最小サイズに切り上げられる
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let usecase = usecase(&harness);
        usecase.add_image(&room_id("r"), &alice.id, image("a")).await;
        bob.drain();

        // when (操作):
        let mut resized = image("a");
        resized.width = Some(3.0.into());
        resized.x = Some((-40.0).into());
        let outcome = usecase.update_image(&room_id("r"), &alice.id, resized).await;

        // then (期待する結果):
        assert_eq!(outcome, MutationOutcome::Applied);
        let room = harness.repository.get_or_create(&room_id("r")).await;
        let state = room.lock().await;
        let stored = state.document.image(&ImageId::new("a".to_string())).unwrap();
        assert_eq!(stored.width, Some(MIN_IMAGE_SIZE.into()));
        assert_eq!(stored.height, Some(100.0.into()));
        assert_eq!(stored.x, Some((-40.0).into()));
        assert_eq!(bob.drain()[0]["image"]["width"], MIN_IMAGE_SIZE);
    }

    #[tokio::test]
    async fn test_update_image_with_non_numeric_width_is_stored_as_is() {
        // テスト項目: 数値でない幅の更新は切り上げられず、そのまま保存・リレーされる
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let usecase = usecase(&harness);
        usecase.add_image(&room_id("r"), &alice.id, image("a")).await;
        bob.drain();

        // when (操作):
        let mut resized = image("a");
        resized.width = Some(Lenient::Raw(serde_json::json!("big")));
        resized.height = Some(5.0.into());
        let outcome = usecase.update_image(&room_id("r"), &alice.id, resized).await;

        // then (期待する結果):
        assert_eq!(outcome, MutationOutcome::Applied);
        let room = harness.repository.get_or_create(&room_id("r")).await;
        let state = room.lock().await;
        let stored = state.document.image(&ImageId::new("a".to_string())).unwrap();
        assert_eq!(stored.width, Some(Lenient::Raw(serde_json::json!("big"))));
        assert_eq!(stored.height, Some(MIN_IMAGE_SIZE.into()));
        let frames = bob.drain();
        assert_eq!(frames[0]["image"]["width"], "big");
        assert_eq!(frames[0]["image"]["height"], MIN_IMAGE_SIZE);
    }

    #[tokio::test]
    async fn test_delete_image() {
        // テスト項目: 画像の削除が反映され、未知の ID でもリレーされる
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let usecase = usecase(&harness);
        usecase.add_image(&room_id("r"), &alice.id, image("a")).await;

        // when (操作):
        let first = usecase
            .delete_image(&room_id("r"), &alice.id, ImageId::new("a".to_string()))
            .await;
        let second = usecase
            .delete_image(&room_id("r"), &alice.id, ImageId::new("a".to_string()))
            .await;

        // then (期待する結果):
        assert_eq!(first, MutationOutcome::Applied);
        assert_eq!(second, MutationOutcome::RelayOnly);
        let deletions = bob.drain_type("image_deleted");
        assert_eq!(deletions.len(), 2);
        assert_eq!(deletions[0]["imageId"], "a");
    }

    #[tokio::test]
    async fn test_clear_affects_only_target_room() {
        // テスト項目: clear は対象ルームのみを空にし、他のルームとタイマーは影響を受けない
        // given (前提条件):
        let harness = Harness::new();
        let alice = harness.join("r").await;
        let mut bob = harness.join("r").await;
        let mut sam = harness.join("s").await;
        let usecase = usecase(&harness);
        for room in ["r", "s"] {
            usecase.add_image(&room_id(room), &alice.id, image("a")).await;
            usecase
                .append_drawing(&room_id(room), &alice.id, segment(0.0))
                .await;
        }
        let r = harness.repository.get_or_create(&room_id("r")).await;
        r.lock().await.timer.skip();
        bob.drain();
        sam.drain();

        // when (操作):
        usecase
            .clear(&room_id("r"), &alice.id, Some("alice".to_string().into()))
            .await;

        // then (期待する結果):
        {
            let state = r.lock().await;
            assert_eq!(state.document.image_count(), 0);
            assert!(state.document.drawing_log().is_empty());
            assert_eq!(state.timer.sessions_completed(), 1);
        }
        let s = harness.repository.get_or_create(&room_id("s")).await;
        {
            let state = s.lock().await;
            assert_eq!(state.document.image_count(), 1);
            assert_eq!(state.document.drawing_log().len(), 1);
        }
        let frames = bob.drain();
        assert_eq!(frames[0]["type"], "clear");
        assert_eq!(frames[0]["clientId"], "alice");
        assert!(sam.drain().is_empty());
    }

    #[tokio::test]
    async fn test_command_for_unjoined_room_still_reaches_members() {
        // テスト項目: 参加していないルーム宛てのコマンドも、そのルームのメンバーに届く
        // given (前提条件):
        let harness = Harness::new();
        let outsider = harness.connect().await;
        let mut member = harness.join("r").await;
        let usecase = usecase(&harness);

        // when (操作):
        usecase
            .append_drawing(&room_id("r"), &outsider.id, segment(5.0))
            .await;

        // then (期待する結果):
        assert_eq!(member.drain_type("drawing").len(), 1);
    }
}
