//! サーバーからクライアントへ送るイベント

use super::{
    entity::{DrawingSegment, ImageDescriptor},
    lenient::Lenient,
    timer::{PhaseTransition, TimerState},
    value_object::{ConnectionId, ImageId, RoomId},
};

/// ある時点でのルームのドキュメント全体
#[derive(Debug, Clone, PartialEq)]
pub struct RoomSnapshot {
    pub room_id: RoomId,
    /// 追加順（重なり順）の画像
    pub images: Vec<ImageDescriptor>,
    /// 到着順のドローイングログ
    pub drawings: Vec<DrawingSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoomEvent {
    /// 新しい接続に一度だけ、割り当てた ID を通知する
    Connected { connection_id: ConnectionId },
    Drawing {
        room_id: RoomId,
        segment: DrawingSegment,
    },
    ImageAdded {
        room_id: RoomId,
        image: ImageDescriptor,
    },
    ImageUpdated {
        room_id: RoomId,
        image: ImageDescriptor,
    },
    ImageDeleted {
        room_id: RoomId,
        image_id: ImageId,
    },
    Cleared {
        room_id: RoomId,
        client_id: Option<Lenient<String>>,
    },
    Snapshot(RoomSnapshot),
    TimerState {
        room_id: RoomId,
        timer: TimerState,
    },
    TimerStarted { room_id: RoomId },
    TimerPaused { room_id: RoomId },
    /// フェーズが自然に満了した。skip では送らない
    TimerFinished {
        room_id: RoomId,
        transition: PhaseTransition,
    },
}

impl RoomEvent {
    /// ログ出力用の短い名前
    pub fn kind(&self) -> &'static str {
        match self {
            RoomEvent::Connected { .. } => "connected",
            RoomEvent::Drawing { .. } => "drawing",
            RoomEvent::ImageAdded { .. } => "image_added",
            RoomEvent::ImageUpdated { .. } => "image_updated",
            RoomEvent::ImageDeleted { .. } => "image_deleted",
            RoomEvent::Cleared { .. } => "clear",
            RoomEvent::Snapshot(_) => "room_state",
            RoomEvent::TimerState { .. } => "timer_state",
            RoomEvent::TimerStarted { .. } => "timer_started",
            RoomEvent::TimerPaused { .. } => "timer_paused",
            RoomEvent::TimerFinished { .. } => "timer_finished",
        }
    }
}
