//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use kokuban_shared::time::timestamp_to_rfc3339;

use crate::{
    infrastructure::dto::{
        http::{MemberDetailDto, RoomDetailDto, RoomSummaryDto},
        websocket::{ImageDto, TimerStateDto},
    },
    ui::state::AppState,
    usecase::{GetRoomDetailError, RoomOverview},
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of rooms
pub async fn get_rooms(State(state): State<Arc<AppState>>) -> Json<Vec<RoomSummaryDto>> {
    let rooms = state.get_rooms_usecase.execute().await;

    // Domain Model から DTO への変換
    let room_summaries = rooms
        .into_iter()
        .map(|room| RoomSummaryDto {
            id: room.id.as_str().to_string(),
            members: room.members.len(),
            images: room.images.len(),
            drawings: room.drawings,
            timer: TimerStateDto::from(&room.timer),
            created_at: timestamp_to_rfc3339(room.created_at.value()),
        })
        .collect();

    Json(room_summaries)
}

/// Get room detail by ID
pub async fn get_room_detail(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomDetailDto>, StatusCode> {
    match state.get_room_detail_usecase.execute(room_id).await {
        Ok(room) => Ok(Json(room_detail_dto(room))),
        Err(GetRoomDetailError::RoomNotFound(id)) => {
            tracing::debug!("Room '{}' requested but not found", id);
            Err(StatusCode::NOT_FOUND)
        }
        Err(GetRoomDetailError::InvalidRoomId) => Err(StatusCode::BAD_REQUEST),
    }
}

fn room_detail_dto(room: RoomOverview) -> RoomDetailDto {
    RoomDetailDto {
        id: room.id.as_str().to_string(),
        members: room
            .members
            .iter()
            .map(|m| MemberDetailDto {
                connection_id: m.connection_id.to_string(),
                joined_at: timestamp_to_rfc3339(m.joined_at.value()),
            })
            .collect(),
        images: room.images.into_iter().map(ImageDto::from).collect(),
        drawings: room.drawings,
        timer: TimerStateDto::from(&room.timer),
        created_at: timestamp_to_rfc3339(room.created_at.value()),
    }
}
