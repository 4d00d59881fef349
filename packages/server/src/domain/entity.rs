//! ルーム集約：共有ドキュメント（ストロークと画像）とルームのタイマー
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - Document の画像の順序保持・上書き・削除、ドローイングログの追記とクリア
//! - リサイズ時の最小サイズへの切り上げ（数値のときだけ）
//! - RoomState の tick タスクの差し替え
//!
//! ### どのような状況を想定しているか
//! - 正常系：画像の追加・更新・削除
//! - エッジケース：存在しない画像の更新・削除、欠けた座標、数値でない幅

use indexmap::IndexMap;
use tokio::task::JoinHandle;

use super::{
    lenient::Lenient,
    timer::{TimerSettings, TimerState},
    value_object::{ImageId, RoomId, Timestamp},
};

/// リサイズで許される幅・高さの最小値
pub const MIN_IMAGE_SIZE: f64 = 20.0;

/// キャンバス上の座標。欠けた軸や数値でない値も受け取ったまま保持する
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    pub x: Option<Lenient<f64>>,
    pub y: Option<Lenient<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    pub from: Point,
    pub to: Point,
}

/// フリーハンドのストローク 1 区間。ドローイングログに追加された後は変更しない
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DrawingSegment {
    /// クライアントが生成した作者 ID（そのまま転送する）
    pub client_id: Option<Lenient<String>>,
    pub line: Line,
    pub color: Option<Lenient<String>>,
    pub width: Option<Lenient<f64>>,
}

/// キャンバスに置かれた画像。位置に制約は無い
///
/// `id` 以外のフィールドは検証せず、受け取ったまま保持する。
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDescriptor {
    pub id: ImageId,
    /// 画像データへの参照（通常は data URI）
    pub source_ref: Option<Lenient<String>>,
    pub x: Option<Lenient<f64>>,
    pub y: Option<Lenient<f64>>,
    pub width: Option<Lenient<f64>>,
    pub height: Option<Lenient<f64>>,
}

impl ImageDescriptor {
    /// 全フィールドが揃った画像
    pub fn placed(
        id: ImageId,
        source_ref: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id,
            source_ref: Some(Lenient::Valid(source_ref.into())),
            x: Some(x.into()),
            y: Some(y.into()),
            width: Some(width.into()),
            height: Some(height.into()),
        }
    }

    /// 幅・高さを [`MIN_IMAGE_SIZE`] に切り上げる（リサイズ時）
    ///
    /// 数値でない値と欠けた値はそのまま残す。
    pub fn with_min_size(mut self) -> Self {
        let clamp = |value: f64| value.max(MIN_IMAGE_SIZE);
        self.width = self.width.map(|w| w.map_valid(clamp));
        self.height = self.height.map(|h| h.map_valid(clamp));
        self
    }
}

/// ドキュメント操作がサーバーの状態を変えたか、リレーだけを行ったか
///
/// 存在しない画像を参照する操作も他のクライアントには届く。サーバー側の状態だけが変わらない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    RelayOnly,
}

/// 追加順の画像と追記専用のドローイングログ
///
/// ログは圧縮しない。ルームの再生コストは履歴とともに増える。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    images: IndexMap<ImageId, ImageDescriptor>,
    drawing_log: Vec<DrawingSegment>,
}

impl Document {
    pub fn images(&self) -> impl Iterator<Item = &ImageDescriptor> {
        self.images.values()
    }

    pub fn image(&self, id: &ImageId) -> Option<&ImageDescriptor> {
        self.images.get(id)
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn drawing_log(&self) -> &[DrawingSegment] {
        &self.drawing_log
    }

    pub fn append_drawing(&mut self, segment: DrawingSegment) {
        self.drawing_log.push(segment);
    }

    /// 画像を追加する。同じ ID の既存エントリはその位置のまま上書きされる
    pub fn add_image(&mut self, image: ImageDescriptor) {
        self.images.insert(image.id.clone(), image);
    }

    /// 既存の画像を置き換える。重なり順は変わらない
    pub fn update_image(&mut self, image: ImageDescriptor) -> MutationOutcome {
        match self.images.get_mut(&image.id) {
            Some(entry) => {
                *entry = image;
                MutationOutcome::Applied
            }
            None => MutationOutcome::RelayOnly,
        }
    }

    pub fn delete_image(&mut self, id: &ImageId) -> MutationOutcome {
        match self.images.shift_remove(id) {
            Some(_) => MutationOutcome::Applied,
            None => MutationOutcome::RelayOnly,
        }
    }

    pub fn clear(&mut self) {
        self.images.clear();
        self.drawing_log.clear();
    }
}

/// 実行中のタイマーを駆動する tick タスクのハンドル
///
/// `generation` でタスクを識別する。ルームに登録された世代と一致しない tick はルームに触れない。
#[derive(Debug)]
pub struct TickTask {
    generation: u64,
    handle: JoinHandle<()>,
}

impl TickTask {
    pub fn new(generation: u64, handle: JoinHandle<()>) -> Self {
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// 1 ルームの全状態。ルームストアが所有し、ルームごとのロックで保護される
#[derive(Debug)]
pub struct RoomState {
    pub id: RoomId,
    pub created_at: Timestamp,
    pub document: Document,
    pub timer: TimerState,
    ticker: Option<TickTask>,
    tick_generation: u64,
}

impl RoomState {
    pub fn new(id: RoomId, created_at: Timestamp, settings: TimerSettings) -> Self {
        Self {
            id,
            created_at,
            document: Document::default(),
            timer: TimerState::new(settings),
            ticker: None,
            tick_generation: 0,
        }
    }

    /// 次の tick タスクの世代番号を払い出す
    pub fn next_tick_generation(&mut self) -> u64 {
        self.tick_generation += 1;
        self.tick_generation
    }

    /// 実行中の tick タスクがあれば中断する
    pub fn cancel_ticker(&mut self) {
        if let Some(task) = self.ticker.take() {
            task.handle.abort();
        }
    }

    /// 新しい tick タスクを登録する。既存のタスクは先に中断する
    pub fn install_ticker(&mut self, task: TickTask) {
        self.cancel_ticker();
        self.ticker = Some(task);
    }

    /// 中断せずに tick タスクの登録を外す。フェーズ満了時にタスク自身が呼ぶ
    pub fn release_ticker(&mut self) {
        self.ticker = None;
    }

    pub fn owns_ticker(&self, generation: u64) -> bool {
        self.ticker
            .as_ref()
            .is_some_and(|task| task.generation() == generation)
    }

    pub fn has_ticker(&self) -> bool {
        self.ticker.is_some()
    }
}
