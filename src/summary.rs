//! 規劃彙總（儀表板與匯出用）

use plan_core::{numeric, CapacityPlanEntry, FinancialPlanEntry, ProductionPlanEntry};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 規劃彙總
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub total_profit: Decimal,

    /// 有定義毛利率期間的平均；全部期間營收為 0 時為空
    pub average_margin: Option<Decimal>,

    /// 平均利用率；沒有期間時為空
    pub average_utilization: Option<Decimal>,

    pub peak_utilization: Decimal,
    pub total_production: Decimal,
    pub total_overtime_hours: Decimal,
}

impl PlanSummary {
    /// 由各階段結果彙總
    pub fn from_plans(
        production: &[ProductionPlanEntry],
        capacity: &[CapacityPlanEntry],
        financial: &[FinancialPlanEntry],
    ) -> plan_core::Result<Self> {
        let total_revenue = numeric::sum(financial.iter().map(|f| f.revenue), "總營收")?;
        let total_cost = numeric::sum(financial.iter().map(|f| f.total_cost), "總成本")?;

        Ok(Self {
            total_revenue,
            total_cost,
            total_profit: numeric::sub(total_revenue, total_cost, "總利潤")?,
            average_margin: mean(financial.iter().filter_map(|f| f.margin_pct), "平均毛利率")?,
            average_utilization: mean(capacity.iter().map(|c| c.utilization_pct), "平均利用率")?,
            peak_utilization: capacity
                .iter()
                .map(|c| c.utilization_pct)
                .max()
                .unwrap_or(Decimal::ZERO),
            total_production: numeric::sum(production.iter().map(|p| p.production), "總生產量")?,
            total_overtime_hours: numeric::sum(
                capacity.iter().map(|c| c.overtime_hours),
                "總加班工時",
            )?,
        })
    }
}

/// 沒有資料時為空
fn mean(mut values: impl Iterator<Item = Decimal>, what: &str) -> plan_core::Result<Option<Decimal>> {
    let (sum, count) = values.try_fold((Decimal::ZERO, 0u64), |(sum, count), v| {
        numeric::add(sum, v, what).map(|sum| (sum, count + 1))
    })?;
    Ok(sum.checked_div(Decimal::from(count)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::Period;

    fn financial(month: u32, revenue: i64, cost: i64) -> FinancialPlanEntry {
        let revenue = Decimal::from(revenue);
        let cost = Decimal::from(cost);
        let profit = revenue - cost;
        FinancialPlanEntry {
            period: Period::new(2025, month).unwrap(),
            material_cost: cost,
            labor_cost: Decimal::ZERO,
            overhead_cost: Decimal::ZERO,
            total_cost: cost,
            revenue,
            profit,
            margin_pct: profit
                .checked_div(revenue)
                .map(|r| r * Decimal::ONE_HUNDRED),
        }
    }

    fn capacity(month: u32, utilization: i64, overtime: i64) -> CapacityPlanEntry {
        CapacityPlanEntry {
            period: Period::new(2025, month).unwrap(),
            required_hours: Decimal::ZERO,
            available_hours: Decimal::from(160),
            utilization_pct: Decimal::from(utilization),
            overtime_hours: Decimal::from(overtime),
            additional_shifts_needed: 0,
        }
    }

    #[test]
    fn test_summary_totals() {
        let financial = vec![financial(1, 1000, 800), financial(2, 2000, 1000), financial(3, 0, 100)];
        let capacity = vec![capacity(1, 50, 0), capacity(2, 100, 20), capacity(3, 30, 0)];

        let summary = PlanSummary::from_plans(&[], &capacity, &financial).unwrap();

        assert_eq!(summary.total_revenue, Decimal::from(3000));
        assert_eq!(summary.total_cost, Decimal::from(1900));
        assert_eq!(summary.total_profit, Decimal::from(1100));
        // (20 + 50) / 2，第三期毛利率為空不計入
        assert_eq!(summary.average_margin, Some(Decimal::from(35)));
        assert_eq!(summary.average_utilization, Some(Decimal::from(60)));
        assert_eq!(summary.peak_utilization, Decimal::from(100));
        assert_eq!(summary.total_overtime_hours, Decimal::from(20));
    }

    #[test]
    fn test_empty_summary() {
        let summary = PlanSummary::from_plans(&[], &[], &[]).unwrap();
        assert_eq!(summary.total_profit, Decimal::ZERO);
        assert_eq!(summary.average_margin, None);
        assert_eq!(summary.average_utilization, None);
    }

    #[test]
    fn test_revenue_total_overflow() {
        let mut first = financial(1, 0, 0);
        first.revenue = Decimal::from_i128_with_scale(5 * 10i128.pow(28), 0);
        let second = first.clone();

        assert!(matches!(
            PlanSummary::from_plans(&[], &[], &[first, second]),
            Err(plan_core::PlanError::CalculationError(_))
        ));
    }
}
