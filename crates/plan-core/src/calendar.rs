//! 規劃期間（月）

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PlanError, Result};

/// 月份期間，所有階段輸出共用的有序鍵
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    /// 年
    pub year: i32,
    /// 月（1-12）
    pub month: u32,
}

impl Period {
    /// 創建新的期間
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(PlanError::invalid(
                "month",
                format!("月份必須介於 1 到 12，實際為 {}", month),
            ));
        }
        Ok(Self { year, month })
    }

    /// 取得日期所屬的期間
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// 下一個期間
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// 往後推算 n 個期間
    pub fn advance(self, n: usize) -> Self {
        (0..n).fold(self, |period, _| period.succ())
    }

    /// 月份在季節係數表中的索引（0 = 一月）
    pub fn month_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// 期間標籤（YYYY-MM）
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// 兩個期間之間相差的月數（other 在後為正）
    pub fn months_until(&self, other: Period) -> i64 {
        (other.year as i64 - self.year as i64) * 12 + (other.month as i64 - self.month as i64)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Default for Period {
    fn default() -> Self {
        Self {
            year: 2025,
            month: 1,
        }
    }
}

/// 檢查期間序列嚴格遞增
pub fn ensure_chronological(stage: &str, periods: impl IntoIterator<Item = Period>) -> Result<()> {
    let mut previous: Option<Period> = None;
    for period in periods {
        if let Some(prev) = previous {
            if period <= prev {
                return Err(PlanError::mismatch(
                    stage,
                    format!("期間未按時間順序排列：{} 之後出現 {}", prev, period),
                ));
            }
        }
        previous = Some(period);
    }
    Ok(())
}

/// 檢查兩個階段輸出的期間鍵一致（長度與順序）
pub fn ensure_aligned(
    stage: &str,
    expected: impl ExactSizeIterator<Item = Period>,
    actual: impl ExactSizeIterator<Item = Period>,
) -> Result<()> {
    if expected.len() != actual.len() {
        return Err(PlanError::mismatch(
            stage,
            format!("期間數量不一致：預期 {}，實際 {}", expected.len(), actual.len()),
        ));
    }
    for (index, (want, got)) in expected.zip(actual).enumerate() {
        if want != got {
            return Err(PlanError::mismatch(
                stage,
                format!("第 {} 期不一致：預期 {}，實際 {}", index + 1, want, got),
            ));
        }
    }
    Ok(())
}
