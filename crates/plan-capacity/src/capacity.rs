//! 人工產能規劃

use plan_core::calendar::ensure_chronological;
use plan_core::{numeric, CapacityPlanEntry, PlanError, PlanningParameters, ProductionPlanEntry};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const STAGE: &str = "capacity";

/// 產能規劃器
pub struct CapacityPlanner;

impl CapacityPlanner {
    /// 依生產計劃計算每期所需與可用工時
    ///
    /// 利用率上限為 100%，超出部分以加班工時與追加班次表示。
    pub fn plan(
        production: &[ProductionPlanEntry],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<CapacityPlanEntry>> {
        ensure_chronological(STAGE, production.iter().map(|p| p.period))?;

        let available_hours = params.available_hours_per_period()?;
        let shift_hours = params.effective_hours_per_shift()?;
        if available_hours <= Decimal::ZERO || shift_hours <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "available_hours",
                format!("可用工時必須大於 0，實際為 {}", available_hours),
            ));
        }

        let entries = production
            .iter()
            .map(|entry| {
                let required_hours = numeric::mul(
                    entry.production,
                    params.standard_hours_per_unit,
                    &format!("{} 所需工時", entry.period),
                )?;
                // 比率溢位時必然超過上限
                let utilization_pct = required_hours
                    .checked_div(available_hours)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                    .map_or(Decimal::ONE_HUNDRED, |pct| pct.min(Decimal::ONE_HUNDRED));
                let overtime_hours = (required_hours - available_hours).max(Decimal::ZERO);
                let additional_shifts_needed = overtime_hours
                    .checked_div(shift_hours)
                    .and_then(|shifts| shifts.ceil().to_u32())
                    .ok_or_else(|| {
                        PlanError::CalculationError(format!(
                            "{} 追加班次超出範圍：{}",
                            entry.period, overtime_hours
                        ))
                    })?;

                Ok(CapacityPlanEntry {
                    period: entry.period,
                    required_hours,
                    available_hours,
                    utilization_pct,
                    overtime_hours,
                    additional_shifts_needed,
                })
            })
            .collect::<plan_core::Result<Vec<_>>>()?;

        tracing::debug!(
            "產能計劃完成：{} 期，需加班 {} 期",
            entries.len(),
            entries.iter().filter(|e| e.overtime_hours > Decimal::ZERO).count()
        );

        Ok(entries)
    }
}
