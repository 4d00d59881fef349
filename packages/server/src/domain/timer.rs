//! ポモドーロのカウントダウン状態機械
//!
//! ここでの状態は単なるカウンターです。1 秒ごとの tick のスケジューリングは
//! タイマーエンジンのユースケースが担い、[`TimerState::tick`] を呼び出して tick タスクを所有します。

/// 新しいルームの Focus フェーズの長さ（分）
pub const DEFAULT_FOCUS_MINUTES: u32 = 25;
/// 新しいルームの Break フェーズの長さ（分）
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

const SECONDS_PER_MINUTE: u64 = 60;

/// タイマーの 2 つのフェーズ（排他的）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn next(self) -> Self {
        match self {
            Phase::Focus => Phase::Break,
            Phase::Break => Phase::Focus,
        }
    }
}

/// フェーズの長さ（分）。どちらも 1 以上
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSettings {
    focus_minutes: u32,
    break_minutes: u32,
}

impl TimerSettings {
    /// 設定を作成する。各値は 1 分未満なら 1 分に切り上げる
    pub fn new(focus_minutes: u32, break_minutes: u32) -> Self {
        Self {
            focus_minutes: focus_minutes.max(1),
            break_minutes: break_minutes.max(1),
        }
    }

    pub fn focus_minutes(&self) -> u32 {
        self.focus_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.break_minutes
    }

    /// `phase` の長さ（秒）
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Focus => self.focus_minutes,
            Phase::Break => self.break_minutes,
        };
        u64::from(minutes) * SECONDS_PER_MINUTE
    }
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self::new(DEFAULT_FOCUS_MINUTES, DEFAULT_BREAK_MINUTES)
    }
}

/// フェーズ遷移：終わったフェーズと次のフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseTransition {
    pub completed: Phase,
    pub next: Phase,
}

/// 1 回の tick の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// 現在のフェーズに残り時間があり、タイマーは動き続ける
    Running,
    /// フェーズが満了し、タイマーは停止して次のフェーズに移った
    Finished(PhaseTransition),
}

/// 1 ルームのカウントダウン状態
///
/// 不変条件：`time_left_secs` はアンダーフローしない。`sessions_completed` は Focus→Break の
/// 遷移でだけ増える。分の設定は常に 1 以上。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    time_left_secs: u64,
    is_running: bool,
    phase: Phase,
    sessions_completed: u32,
    settings: TimerSettings,
}

impl TimerState {
    /// 停止中の Focus フェーズ（残り時間は Focus の長さ）
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            time_left_secs: settings.duration_secs(Phase::Focus),
            is_running: false,
            phase: Phase::Focus,
            sessions_completed: 0,
            settings,
        }
    }

    pub fn time_left_secs(&self) -> u64 {
        self.time_left_secs
    }

    pub fn is_running(&self) -> bool {
        self.is_running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_break(&self) -> bool {
        self.phase == Phase::Break
    }

    pub fn sessions_completed(&self) -> u32 {
        self.sessions_completed
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    pub fn start(&mut self) {
        self.is_running = true;
    }

    /// カウントダウンを止める。残り時間は保持され、再開できる
    pub fn pause(&mut self) {
        self.is_running = false;
    }

    pub fn reset(&mut self) {
        self.is_running = false;
        self.phase = Phase::Focus;
        self.time_left_secs = self.settings.duration_secs(Phase::Focus);
        self.sessions_completed = 0;
    }

    /// 現在のフェーズが満了したものとして次のフェーズへ進む
    pub fn skip(&mut self) -> PhaseTransition {
        self.is_running = false;
        self.advance_phase()
    }

    /// フェーズの長さを更新する
    ///
    /// 停止中は現在のフェーズの残り時間を再計算する。実行中は残り時間を変えず、
    /// 新しい長さは次のフェーズ遷移から使われる。
    pub fn update_settings(&mut self, settings: TimerSettings) {
        self.settings = settings;
        if !self.is_running {
            self.time_left_secs = self.settings.duration_secs(self.phase);
        }
    }

    /// 1 秒カウントダウンする。停止中は何もしない
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::Running;
        }
        self.time_left_secs = self.time_left_secs.saturating_sub(1);
        if self.time_left_secs > 0 {
            return TickOutcome::Running;
        }
        self.is_running = false;
        TickOutcome::Finished(self.advance_phase())
    }

    fn advance_phase(&mut self) -> PhaseTransition {
        let completed = self.phase;
        if completed == Phase::Focus {
            self.sessions_completed += 1;
        }
        self.phase = completed.next();
        self.time_left_secs = self.settings.duration_secs(self.phase);
        PhaseTransition {
            completed,
            next: self.phase,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}
