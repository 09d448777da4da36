//! ABC 分類

use plan_core::{numeric, AbcClass, ClassificationEntry, PlanError, Valued};
use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 各類別彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub class: AbcClass,
    pub item_count: usize,
    pub total_value: Decimal,
    /// 佔總金額百分比
    pub value_share_pct: Decimal,
}

/// ABC 分類計算器
pub struct Classifier;

impl Classifier {
    /// 依年消耗金額分類
    ///
    /// 依金額由大到小排序（同額保持輸入順序），累計 ≤ 80% 為 A、≤ 95% 為 B、其餘為 C。
    /// 總金額為 0 時返回空結果。
    pub fn classify<T: Valued + Sync>(items: &[T]) -> plan_core::Result<Vec<ClassificationEntry>> {
        let mut valued: Vec<(&T, Decimal)> = items
            .par_iter()
            .map(|item| Ok((item, item.annual_value()?)))
            .collect::<plan_core::Result<Vec<_>>>()?;

        if let Some((item, value)) = valued.iter().find(|(_, value)| *value < Decimal::ZERO) {
            return Err(PlanError::invalid(
                "annual_value",
                format!("{} 年消耗金額不可為負：{}", item.identity(), value),
            ));
        }

        let total = numeric::sum(valued.iter().map(|(_, value)| *value), "年消耗總金額")?;
        if total.is_zero() {
            tracing::debug!("總金額為 0，返回空分類結果（{} 筆）", items.len());
            return Ok(Vec::new());
        }

        // 穩定排序：同額時保留原順序
        valued.sort_by(|a, b| b.1.cmp(&a.1));

        let hundred = Decimal::ONE_HUNDRED;
        let mut running = Decimal::ZERO;
        let entries = valued
            .into_iter()
            .map(|(item, value)| {
                running += value;
                // 以累計金額計算百分比，最後一筆恰為 100
                let accumulated = running / total * hundred;
                ClassificationEntry {
                    identity: item.identity().to_string(),
                    annual_quantity: item.annual_quantity(),
                    unit_price: item.unit_price(),
                    annual_value: value,
                    percentage: value / total * hundred,
                    accumulated_percentage: accumulated,
                    class: AbcClass::from_accumulated(accumulated),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            "ABC 分類完成：{} 筆，總金額 {}",
            entries.len(),
            total
        );

        Ok(entries)
    }

    /// 分類，結果為空時返回資料不足錯誤
    pub fn classify_non_empty<T: Valued + Sync>(
        items: &[T],
    ) -> plan_core::Result<Vec<ClassificationEntry>> {
        let entries = Self::classify(items)?;
        if entries.is_empty() {
            return Err(PlanError::InsufficientData(format!(
                "無法分類：{} 筆資料的總金額為 0",
                items.len()
            )));
        }
        Ok(entries)
    }

    /// 依類別彙總（固定返回 A、B、C 三筆）
    pub fn summarize(entries: &[ClassificationEntry]) -> Vec<ClassSummary> {
        let grand_total: Decimal = entries.iter().map(|e| e.annual_value).sum();

        [AbcClass::A, AbcClass::B, AbcClass::C]
            .into_iter()
            .map(|class| {
                let members = entries.iter().filter(|e| e.class == class);
                let (item_count, total_value) = members
                    .fold((0usize, Decimal::ZERO), |(count, sum), e| {
                        (count + 1, sum + e.annual_value)
                    });
                let value_share_pct = total_value
                    .checked_div(grand_total)
                    .map(|share| share * Decimal::ONE_HUNDRED)
                    .unwrap_or(Decimal::ZERO);

                ClassSummary {
                    class,
                    item_count,
                    total_value,
                    value_share_pct,
                }
            })
            .collect()
    }
}
