//! Conversion logic between DTOs and domain entities.

use crate::domain::{
    DrawingSegment, ImageDescriptor, ImageId, Lenient, Line, Phase, Point, RoomEvent,
    TimerSettings, TimerState,
};
use crate::infrastructure::dto::websocket as dto;

// ========================================
// DTO → Domain Entity
// ========================================

impl From<dto::PointDto> for Point {
    fn from(dto: dto::PointDto) -> Self {
        Self { x: dto.x, y: dto.y }
    }
}

impl From<dto::LineDto> for Line {
    fn from(dto: dto::LineDto) -> Self {
        Self {
            from: dto.from.into(),
            to: dto.to.into(),
        }
    }
}

/// Key an image by its wire id. A missing id becomes the empty key.
pub fn image_id_from_wire(id: Option<&Lenient<String>>) -> ImageId {
    ImageId::new(id.map(Lenient::to_key).unwrap_or_default())
}

impl From<dto::ImageDto> for ImageDescriptor {
    fn from(dto: dto::ImageDto) -> Self {
        Self {
            id: image_id_from_wire(dto.id.as_ref()),
            source_ref: dto.src,
            x: dto.x,
            y: dto.y,
            width: dto.width,
            height: dto.height,
        }
    }
}

/// Build timer settings from wire values. Anything below one minute becomes one minute.
pub fn timer_settings_from_wire(focus_minutes: i64, break_minutes: i64) -> TimerSettings {
    fn minutes(value: i64) -> u32 {
        u32::try_from(value.max(1)).unwrap_or(u32::MAX)
    }
    TimerSettings::new(minutes(focus_minutes), minutes(break_minutes))
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<Point> for dto::PointDto {
    fn from(model: Point) -> Self {
        Self {
            x: model.x,
            y: model.y,
        }
    }
}

impl From<Line> for dto::LineDto {
    fn from(model: Line) -> Self {
        Self {
            from: model.from.into(),
            to: model.to.into(),
        }
    }
}

impl From<DrawingSegment> for dto::DrawingDto {
    fn from(model: DrawingSegment) -> Self {
        Self {
            client_id: model.client_id,
            line: model.line.into(),
            color: model.color,
            width: model.width,
        }
    }
}

impl From<ImageDescriptor> for dto::ImageDto {
    fn from(model: ImageDescriptor) -> Self {
        Self {
            id: Some(Lenient::Valid(model.id.into_string())),
            src: model.source_ref,
            x: model.x,
            y: model.y,
            width: model.width,
            height: model.height,
        }
    }
}

impl From<Phase> for dto::SessionType {
    fn from(model: Phase) -> Self {
        match model {
            Phase::Focus => dto::SessionType::Focus,
            Phase::Break => dto::SessionType::Break,
        }
    }
}

impl From<&TimerState> for dto::TimerStateDto {
    fn from(model: &TimerState) -> Self {
        Self {
            time_left: model.time_left_secs(),
            is_running: model.is_running(),
            is_break: model.is_break(),
            sessions: model.sessions_completed(),
            focus_minutes: model.settings().focus_minutes(),
            break_minutes: model.settings().break_minutes(),
        }
    }
}

impl From<RoomEvent> for dto::ServerMessage {
    fn from(event: RoomEvent) -> Self {
        match event {
            RoomEvent::Connected { connection_id } => dto::ServerMessage::Connected {
                connection_id: connection_id.to_string(),
            },
            RoomEvent::Drawing { room_id, segment } => dto::ServerMessage::Drawing {
                room_id: room_id.into_string(),
                client_id: segment.client_id,
                line: segment.line.into(),
                color: segment.color,
                width: segment.width,
            },
            RoomEvent::ImageAdded { room_id, image } => dto::ServerMessage::ImageAdded {
                room_id: room_id.into_string(),
                image: image.into(),
            },
            RoomEvent::ImageUpdated { room_id, image } => dto::ServerMessage::ImageUpdated {
                room_id: room_id.into_string(),
                image: image.into(),
            },
            RoomEvent::ImageDeleted { room_id, image_id } => dto::ServerMessage::ImageDeleted {
                room_id: room_id.into_string(),
                image_id: image_id.into_string(),
            },
            RoomEvent::Cleared { room_id, client_id } => dto::ServerMessage::Clear {
                room_id: room_id.into_string(),
                client_id,
            },
            RoomEvent::Snapshot(snapshot) => dto::ServerMessage::RoomState {
                room_id: snapshot.room_id.into_string(),
                images: snapshot.images.into_iter().map(Into::into).collect(),
                drawings: snapshot.drawings.into_iter().map(Into::into).collect(),
            },
            RoomEvent::TimerState { room_id, timer } => dto::ServerMessage::TimerState {
                room_id: room_id.into_string(),
                timer: (&timer).into(),
            },
            RoomEvent::TimerStarted { room_id } => dto::ServerMessage::TimerStarted {
                room_id: room_id.into_string(),
            },
            RoomEvent::TimerPaused { room_id } => dto::ServerMessage::TimerPaused {
                room_id: room_id.into_string(),
            },
            RoomEvent::TimerFinished {
                room_id,
                transition,
            } => dto::ServerMessage::TimerFinished {
                room_id: room_id.into_string(),
                session_type: transition.completed.into(),
                next_session_type: transition.next.into(),
            },
        }
    }
}
