//! HTTP API response DTOs.

use serde::Serialize;

use super::websocket::{ImageDto, TimerStateDto};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummaryDto {
    pub id: String,
    /// Number of connections currently joined.
    pub members: usize,
    pub images: usize,
    pub drawings: usize,
    pub timer: TimerStateDto,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDetailDto {
    pub connection_id: String,
    pub joined_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetailDto {
    pub id: String,
    pub members: Vec<MemberDetailDto>,
    pub images: Vec<ImageDto>,
    /// Length of the drawing log. The segments themselves are served over WebSocket.
    pub drawings: usize,
    pub timer: TimerStateDto,
    pub created_at: String,
}
