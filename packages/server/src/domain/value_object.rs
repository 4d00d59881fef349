//! 値オブジェクト：ドメイン全体で使う識別子とタイムスタンプ

use std::fmt;

use uuid::Uuid;

use super::error::ValueObjectError;

/// コマンドにルーム指定が無く、接続もどのルームにも参加していないときに使うルーム
pub const FALLBACK_ROOM_ID: &str = "global";

/// ルームの識別子。空にはならない
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.trim().is_empty() {
            return Err(ValueObjectError::EmptyRoomId);
        }
        Ok(Self(value))
    }

    /// ルームを解決できないときに使う既定のルーム
    pub fn fallback() -> Self {
        Self(FALLBACK_ROOM_ID.to_string())
    }

    /// コマンドの宛先ルームを決める
    ///
    /// 空でない `requested` が最優先。無ければ接続が参加中のルーム、それも無ければ既定のルーム。
    pub fn resolve(requested: Option<String>, current: Option<RoomId>) -> Self {
        requested
            .and_then(|value| Self::new(value).ok())
            .or(current)
            .unwrap_or_else(Self::fallback)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomId {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// WebSocket 接続ごとにサーバーが割り当てる識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ConnectionId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// クライアントが指定する画像 ID。中身は解釈せず、一意性も強制しない
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for ImageId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Unix 時刻（ミリ秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    #[test]
    fn test_room_id_rejects_blank_value() {
        // テスト項目: 空白のみの RoomId は作成できない
        // given (前提条件):
        let value = "   ".to_string();

        // when (操作):
        let result = RoomId::new(value);

        // then (期待する結果):
        assert_eq!(result, Err(ValueObjectError::EmptyRoomId));
    }

    #[test]
    fn test_resolve_prefers_requested_room() {
        // テスト項目: 明示的に指定された roomId が最優先で使われる
        // given (前提条件):
        let current = Some(room("current"));

        // when (操作):
        let resolved = RoomId::resolve(Some("requested".to_string()), current);

        // then (期待する結果):
        assert_eq!(resolved, room("requested"));
    }

    #[test]
    fn test_resolve_falls_back_to_current_room() {
        // テスト項目: roomId が無い・空の場合は参加中のルームが使われる
        // given (前提条件):
        let current = Some(room("current"));

        // when (操作):
        let missing = RoomId::resolve(None, current.clone());
        let empty = RoomId::resolve(Some(String::new()), current);

        // then (期待する結果):
        assert_eq!(missing, room("current"));
        assert_eq!(empty, room("current"));
    }

    #[test]
    fn test_resolve_falls_back_to_global_room() {
        // テスト項目: roomId も参加中のルームも無い場合は global が使われる
        // given (前提条件):

        // when (操作):
        let resolved = RoomId::resolve(None, None);

        // then (期待する結果):
        assert_eq!(resolved.as_str(), FALLBACK_ROOM_ID);
    }

    #[test]
    fn test_connection_ids_are_unique() {
        // テスト項目: 生成される ConnectionId は毎回異なる
        // given (前提条件):

        // when (操作):
        let a = ConnectionId::generate();
        let b = ConnectionId::generate();

        // then (期待する結果):
        assert_ne!(a, b);
    }
}
