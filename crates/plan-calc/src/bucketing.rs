//! 銷售記錄的月份分桶

use plan_core::{numeric, Period, SalesRecord};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 歷史期數上限
pub const MAX_HISTORY_PERIODS: usize = 12;

/// 月份銷售彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyBucket {
    pub period: Period,
    /// 銷售件數（需求）
    pub units: Decimal,
    pub revenue: Decimal,
    pub order_count: usize,
}

impl MonthlyBucket {
    fn empty(period: Period) -> Self {
        Self {
            period,
            units: Decimal::ZERO,
            revenue: Decimal::ZERO,
            order_count: 0,
        }
    }

    /// 平均售價；無銷售件數時為空
    pub fn average_price(&self) -> Option<Decimal> {
        self.revenue.checked_div(self.units)
    }
}

/// 時間分桶計算器
pub struct SalesBucketer;

impl SalesBucketer {
    /// 按月份彙總銷售記錄
    ///
    /// 取最近一筆銷售所在月份往前最多 12 個月，無銷售的月份補 0。
    pub fn monthly(records: &[SalesRecord]) -> plan_core::Result<Vec<MonthlyBucket>> {
        let mut grouped: BTreeMap<Period, MonthlyBucket> = BTreeMap::new();
        for record in records {
            let period = record.period();
            let bucket = grouped
                .entry(period)
                .or_insert_with(|| MonthlyBucket::empty(period));
            bucket.units = numeric::add(bucket.units, record.item_count, "月銷售件數")?;
            bucket.revenue = numeric::add(bucket.revenue, record.revenue, "月銷售金額")?;
            bucket.order_count += 1;
        }

        let (earliest, latest) = match (grouped.keys().next(), grouped.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Ok(Vec::new()),
        };

        let span = (earliest.months_until(latest) + 1) as usize;
        let start = if span > MAX_HISTORY_PERIODS {
            earliest.advance(span - MAX_HISTORY_PERIODS)
        } else {
            earliest
        };

        let buckets: Vec<MonthlyBucket> = Self::create_buckets(start, span.min(MAX_HISTORY_PERIODS))
            .into_iter()
            .map(|period| {
                grouped
                    .remove(&period)
                    .unwrap_or_else(|| MonthlyBucket::empty(period))
            })
            .collect();

        tracing::debug!(
            "銷售分桶：{} 筆記錄 → {} 個月（{} 起）",
            records.len(),
            buckets.len(),
            start
        );

        Ok(buckets)
    }

    /// 從起始期間建立連續的月份桶
    pub fn create_buckets(start: Period, count: usize) -> Vec<Period> {
        std::iter::successors(Some(start), |period| Some(period.succ()))
            .take(count)
            .collect()
    }
}
