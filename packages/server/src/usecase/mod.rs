//! UseCase 層：WebSocket 接続や HTTP API から呼び出される操作

pub mod connect_client;
pub mod disconnect_client;
pub mod edit_document;
pub mod error;
pub mod get_room_detail;
pub mod get_rooms;
pub mod join_room;
pub mod relay;
pub mod sync_room;
pub mod timer_engine;

#[cfg(test)]
pub(crate) mod test_support;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use edit_document::EditDocumentUseCase;
pub use error::GetRoomDetailError;
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_rooms::{GetRoomsUseCase, RoomOverview};
pub use join_room::JoinRoomUseCase;
pub use relay::BroadcastRelay;
pub use sync_room::SyncRoomUseCase;
pub use timer_engine::{DEFAULT_TICK_PERIOD, TimerEngineUseCase};
