//! 时间来源
//!
//! 轮换引擎按"今天"推进，缓存按获取时间判断过期，两者都从 [`Clock`] 取时间，
//! 测试中可替换为 [`ManualClock`]。

use std::sync::Mutex;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// 时间来源
pub trait Clock: Send + Sync {
    /// 当前时刻
    fn now(&self) -> DateTime<Utc>;

    /// 当前日历日
    fn today(&self) -> NaiveDate;
}

/// 系统时钟，日历日取本地时区
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// 手动时钟，日历日取 UTC 日期
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// 设定当前时刻
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.lock() = instant;
    }

    /// 向前拨动时钟
    pub fn advance(&self, delta: Duration) {
        let mut now = self.lock();
        *now += delta;
    }

    /// 拨到下一个日历日的同一时刻
    pub fn next_day(&self) {
        self.advance(Duration::days(1));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        // 锁中只存一个时间值，中毒后内容仍然有效
        self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.lock()
    }

    fn today(&self) -> NaiveDate {
        self.lock().date_naive()
    }
}
