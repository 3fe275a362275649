//! 每日经文轮换
//!
//! - `state` - 持久化的排列、游标与今日记录
//! - `engine` - 推进、强制推进、重置与进度

pub mod engine;
pub mod state;

pub use engine::{RotationEngine, RotationStats};
pub use state::{
    DailySelectionRecord, Progress, RotationState, Selection, DAILY_SELECTION_KEY,
    ROTATION_STATE_KEY,
};
