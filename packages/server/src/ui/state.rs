//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::TimerSettings,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        repository::InMemoryRoomRepository,
    },
    usecase::{
        BroadcastRelay, ConnectClientUseCase, DisconnectClientUseCase, EditDocumentUseCase,
        GetRoomDetailUseCase, GetRoomsUseCase, JoinRoomUseCase, SyncRoomUseCase,
        TimerEngineUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（接続登録のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（接続切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// JoinRoomUseCase（ルーム参加と宛先解決のユースケース）
    pub join_room_usecase: Arc<JoinRoomUseCase>,
    /// EditDocumentUseCase（ホワイトボード編集のユースケース）
    pub edit_document_usecase: Arc<EditDocumentUseCase>,
    /// SyncRoomUseCase（スナップショット送信のユースケース）
    pub sync_room_usecase: Arc<SyncRoomUseCase>,
    /// TimerEngineUseCase（タイマー制御のユースケース）
    pub timer_engine_usecase: Arc<TimerEngineUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}

impl AppState {
    /// Wire every use case against the in-memory store and registry.
    ///
    /// # Arguments
    ///
    /// * `default_settings` - Timer minutes given to newly created rooms
    /// * `tick_period` - Interval between timer ticks
    pub fn in_memory(default_settings: TimerSettings, tick_period: Duration) -> Self {
        // Initialize dependencies in order:
        // 1. Repository and ConnectionRegistry
        // 2. MessagePusher
        // 3. BroadcastRelay
        // 4. UseCases

        // 1. Create Repository and ConnectionRegistry (in-memory)
        let repository = Arc::new(InMemoryRoomRepository::new(default_settings));
        let registry = Arc::new(InMemoryConnectionRegistry::new());

        // 2. Create MessagePusher (WebSocket implementation)
        let message_pusher = Arc::new(WebSocketMessagePusher::default());

        // 3. Create BroadcastRelay
        let relay = BroadcastRelay::new(registry.clone(), message_pusher.clone());

        // 4. Create UseCases
        Self {
            connect_client_usecase: Arc::new(ConnectClientUseCase::new(message_pusher.clone())),
            disconnect_client_usecase: Arc::new(DisconnectClientUseCase::new(
                registry.clone(),
                message_pusher,
            )),
            join_room_usecase: Arc::new(JoinRoomUseCase::new(
                repository.clone(),
                registry.clone(),
            )),
            edit_document_usecase: Arc::new(EditDocumentUseCase::new(
                repository.clone(),
                relay.clone(),
            )),
            sync_room_usecase: Arc::new(SyncRoomUseCase::new(repository.clone(), relay.clone())),
            timer_engine_usecase: Arc::new(TimerEngineUseCase::new(
                repository.clone(),
                relay,
                tick_period,
            )),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone(), registry.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository, registry)),
        }
    }
}
