//! WebSocket message DTOs.
//!
//! Every frame is a JSON object tagged by `"type"` with snake_case event names and
//! camelCase payload fields, e.g. `{"type":"timer_state","timeLeft":1500,...}`.
//!
//! Drawing and image payload values are not validated. A value of the wrong JSON type is
//! kept as [`Lenient::Raw`] and relayed unchanged.

use serde::{Deserialize, Serialize};

use crate::domain::Lenient;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<Lenient<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<Lenient<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineDto {
    #[serde(default)]
    pub from: PointDto,
    #[serde(default)]
    pub to: PointDto,
}

/// A stored stroke segment as it appears in `room_state` snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawingDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Lenient<String>>,
    #[serde(default)]
    pub line: LineDto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Lenient<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Lenient<f64>>,
}

/// Image payload. Every field may be missing; a missing or non-string `id` is keyed by its
/// JSON text (empty string when absent).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Lenient<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<Lenient<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Lenient<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Lenient<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Lenient<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Lenient<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    Focus,
    Break,
}

/// Timer fields shared by the `timer_state` event and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerStateDto {
    pub time_left: u64,
    pub is_running: bool,
    pub is_break: bool,
    pub sessions: u32,
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

/// Commands sent by clients.
///
/// `room_id` is optional everywhere; see `RoomId::resolve` for the fallback chain.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Join {
        #[serde(default)]
        room_id: Option<String>,
    },
    RequestRoomState {
        #[serde(default)]
        room_id: Option<String>,
    },
    Drawing {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        client_id: Option<Lenient<String>>,
        #[serde(default)]
        line: LineDto,
        #[serde(default)]
        color: Option<Lenient<String>>,
        #[serde(default)]
        width: Option<Lenient<f64>>,
    },
    ImageAdded {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        image: ImageDto,
    },
    ImageUpdated {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        image: ImageDto,
    },
    ImageDeleted {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        image_id: Option<Lenient<String>>,
    },
    Clear {
        #[serde(default)]
        room_id: Option<String>,
        #[serde(default)]
        client_id: Option<Lenient<String>>,
    },
    TimerStart {
        #[serde(default)]
        room_id: Option<String>,
    },
    TimerPause {
        #[serde(default)]
        room_id: Option<String>,
    },
    TimerReset {
        #[serde(default)]
        room_id: Option<String>,
    },
    TimerSkip {
        #[serde(default)]
        room_id: Option<String>,
    },
    TimerSettingsUpdate {
        #[serde(default)]
        room_id: Option<String>,
        focus_minutes: i64,
        break_minutes: i64,
    },
    TimerRequestSync {
        #[serde(default)]
        room_id: Option<String>,
    },
}

impl ClientMessage {
    /// The room id carried by the command, if any.
    pub fn room_id(&self) -> Option<&str> {
        match self {
            ClientMessage::Join { room_id }
            | ClientMessage::RequestRoomState { room_id }
            | ClientMessage::Drawing { room_id, .. }
            | ClientMessage::ImageAdded { room_id, .. }
            | ClientMessage::ImageUpdated { room_id, .. }
            | ClientMessage::ImageDeleted { room_id, .. }
            | ClientMessage::Clear { room_id, .. }
            | ClientMessage::TimerStart { room_id }
            | ClientMessage::TimerPause { room_id }
            | ClientMessage::TimerReset { room_id }
            | ClientMessage::TimerSkip { room_id }
            | ClientMessage::TimerSettingsUpdate { room_id, .. }
            | ClientMessage::TimerRequestSync { room_id } => room_id.as_deref(),
        }
    }
}

/// Events pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    Connected {
        connection_id: String,
    },
    Drawing {
        room_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        client_id: Option<Lenient<String>>,
        line: LineDto,
        #[serde(skip_serializing_if = "Option::is_none")]
        color: Option<Lenient<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<Lenient<f64>>,
    },
    ImageAdded {
        room_id: String,
        image: ImageDto,
    },
    ImageUpdated {
        room_id: String,
        image: ImageDto,
    },
    ImageDeleted {
        room_id: String,
        image_id: String,
    },
    Clear {
        room_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        client_id: Option<Lenient<String>>,
    },
    RoomState {
        room_id: String,
        images: Vec<ImageDto>,
        drawings: Vec<DrawingDto>,
    },
    TimerState {
        room_id: String,
        #[serde(flatten)]
        timer: TimerStateDto,
    },
    TimerStarted {
        room_id: String,
    },
    TimerPaused {
        room_id: String,
    },
    TimerFinished {
        room_id: String,
        session_type: SessionType,
        next_session_type: SessionType,
    },
}
