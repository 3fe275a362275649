//! 轮换状态与今日记录
//!
//! 两者都以 JSON 存在键值存储中，分别位于 `rotation_state` 和 `daily_selection`。

use chrono::{DateTime, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{ContentError, ContentResult};

pub const ROTATION_STATE_KEY: &str = "rotation_state";
pub const DAILY_SELECTION_KEY: &str = "daily_selection";

fn first_cycle() -> u32 {
    1
}

/// 一个周期的随机排列与游标
///
/// `permutation` 是 `0..N` 的一个排列，`cursor` 指向下一个待用位置，取值 `0..=N`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationState {
    pub permutation: Vec<u32>,
    pub cursor: u32,
    #[serde(default = "first_cycle")]
    pub cycle_count: u32,
    pub created_at: DateTime<Utc>,
    pub last_reset: DateTime<Utc>,
}

impl RotationState {
    /// 生成新的随机排列（Fisher-Yates）
    pub fn generate<R: Rng + ?Sized>(
        len: u32,
        rng: &mut R,
        now: DateTime<Utc>,
        cycle_count: u32,
    ) -> Self {
        let mut permutation: Vec<u32> = (0..len).collect();
        permutation.shuffle(rng);
        Self {
            permutation,
            cursor: 0,
            cycle_count,
            created_at: now,
            last_reset: now,
        }
    }

    /// 进入下一个周期，保留首次创建时间
    pub fn next_cycle<R: Rng + ?Sized>(&self, rng: &mut R, now: DateTime<Utc>) -> Self {
        let mut next = Self::generate(self.len(), rng, now, self.cycle_count.saturating_add(1));
        next.created_at = self.created_at;
        next
    }

    pub fn len(&self) -> u32 {
        self.permutation.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }

    /// 本周期已全部用完
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.len()
    }

    /// 校验排列与游标；不合法的状态不会被修补
    pub fn validate(&self, expected_len: usize) -> ContentResult<()> {
        if self.permutation.len() != expected_len {
            return Err(ContentError::PersistenceFailed(format!(
                "轮换状态与经文索引不一致: 排列长度 {}, 经文数 {}",
                self.permutation.len(),
                expected_len
            )));
        }
        if self.cursor as usize > expected_len {
            return Err(ContentError::PersistenceFailed(format!(
                "轮换游标越界: {} > {}",
                self.cursor, expected_len
            )));
        }

        let mut seen = vec![false; expected_len];
        for &index in &self.permutation {
            match seen.get_mut(index as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(ContentError::PersistenceFailed(format!(
                        "轮换排列已损坏: 位置 {} 越界或重复",
                        index
                    )));
                }
            }
        }
        Ok(())
    }
}

/// 进度 `current / total`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub current: u32,
    pub total: u32,
    pub fraction: f64,
}

impl Progress {
    pub fn new(current: u32, total: u32) -> Self {
        let fraction = if total == 0 {
            0.0
        } else {
            f64::from(current) / f64::from(total)
        };
        Self {
            current,
            total,
            fraction,
        }
    }

    pub fn percentage(&self) -> f64 {
        self.fraction * 100.0
    }
}

/// 引擎返回的今日位置信息
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub unit_index: u32,
    pub cursor_at_selection: u32,
    pub progress: Progress,
}

/// 今日记录
///
/// 同一 `selection_date` 下位置字段写入后不再变化，只有译本与经文文本可以重写。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySelectionRecord {
    pub unit_index: u32,
    pub canonical_reference: String,
    /// 尚未成功呈现时为空
    pub translation_id: Option<String>,
    pub rendered_text: Option<String>,
    pub selection_date: NaiveDate,
    pub cursor_at_selection: u32,
    pub progress_numerator: u32,
    pub progress_denominator: u32,
}

impl DailySelectionRecord {
    /// 是否已用指定译本呈现
    pub fn is_rendered_in(&self, translation_id: &str) -> bool {
        self.rendered_text.is_some()
            && self
                .translation_id
                .as_deref()
                .is_some_and(|id| id.eq_ignore_ascii_case(translation_id))
    }

    pub fn progress(&self) -> Progress {
        Progress::new(self.progress_numerator, self.progress_denominator)
    }

    pub fn selection(&self) -> Selection {
        Selection {
            unit_index: self.unit_index,
            cursor_at_selection: self.cursor_at_selection,
            progress: self.progress(),
        }
    }
}
