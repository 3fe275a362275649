//! 轮换引擎
//!
//! 每个周期按一次随机排列依次取经文，周期内每节经文恰好出现一次。
//! 同一天重复调用返回同一结果；跨天时游标前进一格，用完后生成新排列。

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tokio::sync::Mutex;

use super::state::{
    DailySelectionRecord, Progress, RotationState, Selection, DAILY_SELECTION_KEY,
    ROTATION_STATE_KEY,
};
use crate::clock::Clock;
use crate::corpus::CorpusIndex;
use crate::error::{helpers, ContentResult};
use crate::storage::kv::{get_json, to_json_bytes, KeyValueStore};

/// 轮换统计
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationStats {
    pub total_units: u32,
    pub cursor: u32,
    pub used: u32,
    pub remaining: u32,
    pub cycle_count: u32,
    pub progress_percentage: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub last_reset: Option<DateTime<Utc>>,
}

/// 轮换引擎
pub struct RotationEngine {
    store: Arc<dyn KeyValueStore>,
    corpus: Arc<CorpusIndex>,
    clock: Arc<dyn Clock>,
    /// 所有读改写都在这把锁内进行
    rng: Mutex<StdRng>,
}

impl RotationEngine {
    pub fn new(store: Arc<dyn KeyValueStore>, corpus: Arc<CorpusIndex>, clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(store, corpus, clock, StdRng::from_os_rng())
    }

    /// 固定随机种子，用于可复现的排列
    pub fn with_seed(
        store: Arc<dyn KeyValueStore>,
        corpus: Arc<CorpusIndex>,
        clock: Arc<dyn Clock>,
        seed: u64,
    ) -> Self {
        Self::with_rng(store, corpus, clock, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        store: Arc<dyn KeyValueStore>,
        corpus: Arc<CorpusIndex>,
        clock: Arc<dyn Clock>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            corpus,
            clock,
            rng: Mutex::new(rng),
        }
    }

    pub fn corpus(&self) -> &Arc<CorpusIndex> {
        &self.corpus
    }

    fn total(&self) -> u32 {
        self.corpus.len() as u32
    }

    /// 返回今天的位置；今天还没有记录时推进一格
    pub async fn current_or_advance(&self, today: NaiveDate) -> ContentResult<Selection> {
        Ok(self.select_for_today(today).await?.selection())
    }

    /// 同 [`current_or_advance`](Self::current_or_advance)，返回完整记录
    pub async fn select_for_today(&self, today: NaiveDate) -> ContentResult<DailySelectionRecord> {
        let mut rng = self.rng.lock().await;
        self.advance_locked(&mut rng, today).await
    }

    /// 丢弃今天的记录并再推进一格（消耗一个位置）
    pub async fn force_advance(&self, today: NaiveDate) -> ContentResult<DailySelectionRecord> {
        let mut rng = self.rng.lock().await;
        self.store.delete(DAILY_SELECTION_KEY).await?;
        tracing::info!("强制推进今日经文: {}", today);
        self.advance_locked(&mut rng, today).await
    }

    /// 丢弃排列与今日记录，下次调用从新周期开始
    pub async fn reset_cycle(&self) -> ContentResult<()> {
        let _guard = self.rng.lock().await;
        self.store.delete(ROTATION_STATE_KEY).await?;
        self.store.delete(DAILY_SELECTION_KEY).await?;
        tracing::info!("轮换周期已重置");
        Ok(())
    }

    /// 改写今日记录的译本与文本
    ///
    /// 记录已被并发的强制推进替换（日期或游标不匹配）时不写入，返回 `None`。
    pub async fn update_rendering(
        &self,
        today: NaiveDate,
        cursor_at_selection: u32,
        translation_id: &str,
        rendered_text: String,
    ) -> ContentResult<Option<DailySelectionRecord>> {
        let _guard = self.rng.lock().await;
        let Some(mut record) = self.load_record().await? else {
            return Ok(None);
        };
        if record.selection_date != today || record.cursor_at_selection != cursor_at_selection {
            tracing::debug!(
                "今日记录已变化，放弃改写 (期望游标 {}, 实际 {})",
                cursor_at_selection,
                record.cursor_at_selection
            );
            return Ok(None);
        }

        record.translation_id = Some(translation_id.to_string());
        record.rendered_text = Some(rendered_text);
        self.store
            .put(DAILY_SELECTION_KEY, to_json_bytes(&record)?)
            .await?;
        Ok(Some(record))
    }

    /// 今天的记录（如有）
    pub async fn today_record(&self, today: NaiveDate) -> ContentResult<Option<DailySelectionRecord>> {
        Ok(self
            .load_record()
            .await?
            .filter(|record| record.selection_date == today))
    }

    /// 周期进度，尚未开始时为 `0 / N`
    pub async fn progress(&self) -> ContentResult<Progress> {
        let cursor = self.load_state().await?.map_or(0, |state| state.cursor);
        Ok(Progress::new(cursor, self.total()))
    }

    pub async fn stats(&self) -> ContentResult<RotationStats> {
        let total = self.total();
        let state = self.load_state().await?;
        let cursor = state.as_ref().map_or(0, |s| s.cursor);

        Ok(RotationStats {
            total_units: total,
            cursor,
            used: cursor,
            remaining: total.saturating_sub(cursor),
            cycle_count: state.as_ref().map_or(0, |s| s.cycle_count),
            progress_percentage: Progress::new(cursor, total).percentage(),
            created_at: state.as_ref().map(|s| s.created_at),
            last_reset: state.as_ref().map(|s| s.last_reset),
        })
    }

    async fn advance_locked(&self, rng: &mut StdRng, today: NaiveDate) -> ContentResult<DailySelectionRecord> {
        if let Some(record) = self.load_record().await? {
            if record.selection_date == today {
                tracing::debug!("今日已有记录: {}", record.canonical_reference);
                return Ok(record);
            }
        }

        let total = self.total();
        let now = self.clock.now();
        let mut state = match self.load_state().await? {
            Some(state) => state,
            None => {
                tracing::info!("生成新的轮换排列: {} 节经文", total);
                RotationState::generate(total, rng, now, 1)
            }
        };

        if state.is_exhausted() {
            state = state.next_cycle(rng, now);
            tracing::info!("第 {} 个周期开始", state.cycle_count);
        }

        let cursor = state.cursor;
        let unit_index = state.permutation[cursor as usize];
        let unit = self.corpus.get(unit_index as usize).ok_or_else(|| {
            helpers::persistence_error(format!("排列中的位置越界: {}", unit_index))
        })?;

        let record = DailySelectionRecord {
            unit_index,
            canonical_reference: unit.canonical_reference.clone(),
            translation_id: None,
            rendered_text: None,
            selection_date: today,
            cursor_at_selection: cursor,
            progress_numerator: cursor + 1,
            progress_denominator: total,
        };
        state.cursor = cursor + 1;

        // 记录与游标同批提交，不会出现只写入其一的情况
        self.store
            .put_many(vec![
                (DAILY_SELECTION_KEY.to_string(), to_json_bytes(&record)?),
                (ROTATION_STATE_KEY.to_string(), to_json_bytes(&state)?),
            ])
            .await?;

        tracing::info!(
            "今日经文 {}: {} ({}/{})",
            today,
            record.canonical_reference,
            record.progress_numerator,
            total
        );
        Ok(record)
    }

    async fn load_state(&self) -> ContentResult<Option<RotationState>> {
        let state: Option<RotationState> = get_json(self.store.as_ref(), ROTATION_STATE_KEY).await?;
        if let Some(state) = &state {
            state.validate(self.corpus.len())?;
        }
        Ok(state)
    }

    async fn load_record(&self) -> ContentResult<Option<DailySelectionRecord>> {
        get_json(self.store.as_ref(), DAILY_SELECTION_KEY).await
    }
}
