//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("room id must not be empty")]
    EmptyRoomId,
}

/// クライアントへのイベント送信時のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 接続の送信チャンネルが登録されていない
    #[error("client '{0}' is not connected")]
    ClientNotFound(String),

    /// 送信チャンネルはあるが受信側が閉じている
    #[error("failed to push message: {0}")]
    PushFailed(String),

    /// イベントを JSON にエンコードできなかった
    #[error("failed to encode message: {0}")]
    Encode(String),
}
