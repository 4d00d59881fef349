//! 未検証のペイロード値
//!
//! 座標・線幅・画像の位置やサイズなど、クライアントが送る値はサーバー側で検証しません。
//! 期待した型でデコードできた値は `Valid`、それ以外（数値であるべき所の文字列など）は
//! `Raw` として受け取ったまま保存し、他のクライアントへそのまま転送します。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 期待した型の値と、それ以外の JSON 値のデコード・エンコード
//! - `map_valid` が `Raw` に触れないこと
//!
//! ### どのような状況を想定しているか
//! - 正常系：数値・文字列
//! - 異常系：数値フィールドに文字列やオブジェクトが入っている

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    /// 期待した型でデコードできた値
    Valid(T),
    /// それ以外の JSON 値（受け取ったまま）
    Raw(serde_json::Value),
}

impl<T> Lenient<T> {
    pub fn valid(&self) -> Option<&T> {
        match self {
            Lenient::Valid(value) => Some(value),
            Lenient::Raw(_) => None,
        }
    }

    /// `Valid` の値だけを変換する。`Raw` はそのまま返す
    pub fn map_valid(self, f: impl FnOnce(T) -> T) -> Self {
        match self {
            Lenient::Valid(value) => Lenient::Valid(f(value)),
            raw @ Lenient::Raw(_) => raw,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Lenient::Valid(value)
    }
}

impl Lenient<String> {
    /// キーとして使う文字列表現。`Raw` は JSON 表記（数値なら `"5"`）になる
    pub fn to_key(&self) -> String {
        match self {
            Lenient::Valid(value) => value.clone(),
            Lenient::Raw(serde_json::Value::String(value)) => value.clone(),
            Lenient::Raw(value) => value.to_string(),
        }
    }
}
