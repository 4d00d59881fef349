//! InMemory ConnectionRegistry 実装
//!
//! 接続 → ルーム と ルーム → 接続 の両方向のマップを 1 つのロックで保持し、
//! 参加・離脱が常に両方へ同時に反映されるようにします。

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, ConnectionRegistry, Member, RoomId, Timestamp};
use kokuban_shared::time::{Clock, SystemClock};

#[derive(Default)]
struct Memberships {
    by_connection: HashMap<ConnectionId, RoomId>,
    by_room: HashMap<RoomId, BTreeMap<ConnectionId, Timestamp>>,
}

impl Memberships {
    fn remove(&mut self, connection_id: &ConnectionId) -> Option<RoomId> {
        let room_id = self.by_connection.remove(connection_id)?;
        if let Some(members) = self.by_room.get_mut(&room_id) {
            members.remove(connection_id);
            if members.is_empty() {
                self.by_room.remove(&room_id);
            }
        }
        Some(room_id)
    }
}

/// インメモリ ConnectionRegistry 実装
pub struct InMemoryConnectionRegistry {
    memberships: Mutex<Memberships>,
    clock: Arc<dyn Clock>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            memberships: Mutex::new(Memberships::default()),
            clock,
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn join(&self, connection_id: ConnectionId, room_id: RoomId) -> Option<RoomId> {
        let joined_at = Timestamp::new(self.clock.now_millis());
        let mut memberships = self.memberships.lock().await;
        let previous = memberships.remove(&connection_id);
        memberships
            .by_room
            .entry(room_id.clone())
            .or_default()
            .insert(connection_id, joined_at);
        memberships.by_connection.insert(connection_id, room_id);
        previous
    }

    async fn leave(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.memberships.lock().await.remove(connection_id)
    }

    async fn room_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        self.memberships
            .lock()
            .await
            .by_connection
            .get(connection_id)
            .cloned()
    }

    async fn members(&self, room_id: &RoomId) -> Vec<ConnectionId> {
        self.memberships
            .lock()
            .await
            .by_room
            .get(room_id)
            .map(|members| members.keys().copied().collect())
            .unwrap_or_default()
    }

    async fn member_details(&self, room_id: &RoomId) -> Vec<Member> {
        let memberships = self.memberships.lock().await;
        let mut details: Vec<Member> = memberships
            .by_room
            .get(room_id)
            .map(|members| {
                members
                    .iter()
                    .map(|(connection_id, joined_at)| Member {
                        connection_id: *connection_id,
                        joined_at: *joined_at,
                    })
                    .collect()
            })
            .unwrap_or_default();
        details.sort_by_key(|member| (member.joined_at, member.connection_id));
        details
    }
}
