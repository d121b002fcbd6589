// src/types.rs
use serde::Serialize;

// 工作模式, cycled by the mode button
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize)]
pub enum Mode {
    #[default]
    Live,
    Trigger,
    Measure,
    TriggerOffset,
}

impl Mode {
    pub fn next(self) -> Self {
        match self {
            Mode::Live => Mode::Trigger,
            Mode::Trigger => Mode::Measure,
            Mode::Measure => Mode::TriggerOffset,
            Mode::TriggerOffset => Mode::Live,
        }
    }
    pub fn label(self) -> &'static str {
        match self {
            Mode::Live => "LIVE",
            Mode::Trigger => "TRIGGER",
            Mode::Measure => "MEASURE",
            // distinct from Trigger so the title says which counter moves the window
            Mode::TriggerOffset => "TRIGGER OFFSET",
        }
    }
    /// Modes that show a trigger window instead of the raw frame.
    pub fn uses_trigger(self) -> bool {
        !matches!(self, Mode::Live)
    }
}

// 缩放轴
#[derive(PartialEq, Eq, Clone, Copy, Debug, Default, Serialize)]
pub enum ScalingAxis {
    X,
    #[default]
    Y,
}

impl ScalingAxis {
    pub fn toggled(self) -> Self {
        match self {
            ScalingAxis::X => ScalingAxis::Y,
            ScalingAxis::Y => ScalingAxis::X,
        }
    }
    pub fn label(self) -> &'static str {
        match self {
            ScalingAxis::X => "X",
            ScalingAxis::Y => "Y",
        }
    }
}

// 按键边沿事件
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ButtonEdge {
    ModeAdvance,
    ScaleAxisToggle,
    CursorToggle,
}

// 编码器计数, sampled once at the start of a cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepCounters {
    pub primary: i64,
    pub scale: i64,
    pub cursor: i64,
}
