//! UseCase: ルームごとのポモドーロタイマー（Timer Engine）
//!
//! ## 概要
//!
//! タイマーの状態遷移は `domain::timer::TimerState` が担い、このユースケースは
//! 1 秒ごとの tick タスクのスケジューリングとイベント配信を担います。
//!
//! ## tick タスクの不変条件
//!
//! - 1 ルームにつき tick タスクは高々 1 つ。全ての制御イベントは最初に既存タスクを中断する
//! - `is_running == true` ⇔ ルームに tick タスクが登録されている
//! - tick タスクは世代番号を持ち、ルームに登録された世代と一致しない場合は何もせず終了する。
//!   中断と tick の発火が競合しても残り時間が二重に減ることはない
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - start / pause / reset / skip / update_settings の状態遷移と配信
//! - 自然満了時の timer_finished 通知（skip では通知しない）
//! - 二重 start でも tick が二重にならないこと
//!
//! ### どのような状況を想定しているか
//! - tokio の時間を停止した状態（`start_paused`）で、仮想時間を進めて検証する

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};

use crate::domain::{
    ConnectionId, RoomEvent, RoomId, RoomRepository, TickOutcome, TickTask, TimerSettings,
    TimerState,
};

use super::relay::BroadcastRelay;

/// 1 回のカウントダウン
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// タイマー制御のユースケース
#[derive(Clone)]
pub struct TimerEngineUseCase {
    repository: Arc<dyn RoomRepository>,
    relay: BroadcastRelay,
    tick_period: Duration,
}

impl TimerEngineUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        relay: BroadcastRelay,
        tick_period: Duration,
    ) -> Self {
        Self {
            repository,
            relay,
            tick_period,
        }
    }

    /// タイマーを開始（再開）する
    ///
    /// 既存の tick タスクは中断してから新しいタスクを登録する。
    pub async fn start(&self, room_id: &RoomId) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.cancel_ticker();
        state.timer.start();
        let generation = state.next_tick_generation();
        let handle = self.spawn_ticker(room_id.clone(), generation);
        state.install_ticker(TickTask::new(generation, handle));
        tracing::info!(
            "Timer started in room '{}' ({}s left)",
            room_id,
            state.timer.time_left_secs()
        );

        self.relay
            .broadcast(
                room_id,
                &RoomEvent::TimerStarted {
                    room_id: room_id.clone(),
                },
            )
            .await;
        self.broadcast_state(room_id, &state.timer).await;
        state.timer.clone()
    }

    /// タイマーを一時停止する。残り時間は保持される
    pub async fn pause(&self, room_id: &RoomId) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.cancel_ticker();
        state.timer.pause();
        tracing::info!(
            "Timer paused in room '{}' ({}s left)",
            room_id,
            state.timer.time_left_secs()
        );

        self.relay
            .broadcast(
                room_id,
                &RoomEvent::TimerPaused {
                    room_id: room_id.clone(),
                },
            )
            .await;
        self.broadcast_state(room_id, &state.timer).await;
        state.timer.clone()
    }

    /// Focus の初期状態に戻し、セッション数も 0 にする
    pub async fn reset(&self, room_id: &RoomId) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.cancel_ticker();
        state.timer.reset();
        tracing::info!("Timer reset in room '{}'", room_id);

        self.broadcast_state(room_id, &state.timer).await;
        state.timer.clone()
    }

    /// 次のフェーズへ進める。timer_finished は送らない
    pub async fn skip(&self, room_id: &RoomId) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.cancel_ticker();
        let transition = state.timer.skip();
        tracing::info!(
            "Timer skipped in room '{}' ({:?} -> {:?})",
            room_id,
            transition.completed,
            transition.next
        );

        self.broadcast_state(room_id, &state.timer).await;
        state.timer.clone()
    }

    /// フェーズの長さを変更する
    ///
    /// 実行中は残り時間を変えず、次のフェーズ遷移から新しい長さが使われる。
    pub async fn update_settings(&self, room_id: &RoomId, settings: TimerSettings) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        state.timer.update_settings(settings);
        tracing::info!(
            "Timer settings updated in room '{}' (focus {}m, break {}m)",
            room_id,
            settings.focus_minutes(),
            settings.break_minutes()
        );

        self.broadcast_state(room_id, &state.timer).await;
        state.timer.clone()
    }

    /// 現在のタイマー状態を要求元にだけ送信する
    pub async fn request_sync(&self, room_id: &RoomId, requester: &ConnectionId) -> TimerState {
        let room = self.repository.get_or_create(room_id).await;
        let state = room.lock().await;
        self.relay
            .unicast(
                requester,
                &RoomEvent::TimerState {
                    room_id: room_id.clone(),
                    timer: state.timer.clone(),
                },
            )
            .await;
        state.timer.clone()
    }

    fn spawn_ticker(&self, room_id: RoomId, generation: u64) -> JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            let period = engine.tick_period;
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !engine.tick(&room_id, generation).await {
                    break;
                }
            }
        })
    }

    /// 1 秒分カウントダウンする。tick を続けるなら `true` を返す
    async fn tick(&self, room_id: &RoomId, generation: u64) -> bool {
        let room = self.repository.get_or_create(room_id).await;
        let mut state = room.lock().await;
        if !state.owns_ticker(generation) || !state.timer.is_running() {
            tracing::debug!(
                "Stale tick task #{} for room '{}' exits",
                generation,
                room_id
            );
            return false;
        }

        match state.timer.tick() {
            TickOutcome::Running => {
                self.broadcast_state(room_id, &state.timer).await;
                true
            }
            TickOutcome::Finished(transition) => {
                state.release_ticker();
                tracing::info!(
                    "Timer finished in room '{}' ({:?} -> {:?}, {} sessions)",
                    room_id,
                    transition.completed,
                    transition.next,
                    state.timer.sessions_completed()
                );
                self.relay
                    .broadcast(
                        room_id,
                        &RoomEvent::TimerFinished {
                            room_id: room_id.clone(),
                            transition,
                        },
                    )
                    .await;
                self.broadcast_state(room_id, &state.timer).await;
                false
            }
        }
    }

    async fn broadcast_state(&self, room_id: &RoomId, timer: &TimerState) {
        self.relay
            .broadcast(
                room_id,
                &RoomEvent::TimerState {
                    room_id: room_id.clone(),
                    timer: timer.clone(),
                },
            )
            .await;
    }
}
