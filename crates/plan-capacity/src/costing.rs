//! 成本、營收與毛利規劃

use plan_calc::PlanWarning;
use plan_core::calendar::ensure_aligned;
use plan_core::{
    numeric, CapacityPlanEntry, FinancialPlanEntry, PlanningParameters, ProductionPlanEntry,
};
use rust_decimal::Decimal;

const STAGE: &str = "financial";

/// 財務規劃器
pub struct FinancialPlanner;

impl FinancialPlanner {
    /// 依生產與產能計劃計算每期成本與毛利
    ///
    /// 兩份輸入必須逐期對齊；營收為 0 的期間毛利率為空，不影響其他期間。
    pub fn plan(
        production: &[ProductionPlanEntry],
        capacity: &[CapacityPlanEntry],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<FinancialPlanEntry>> {
        ensure_aligned(
            STAGE,
            production.iter().map(|p| p.period),
            capacity.iter().map(|c| c.period),
        )?;

        let overtime_rate =
            numeric::mul(params.labor_cost_per_hour, params.overtime_premium, "加班費率")?;

        let entries = production
            .iter()
            .zip(capacity)
            .map(|(prod, cap)| {
                let what = |name: &str| format!("{} {}", prod.period, name);

                let material_cost =
                    numeric::mul(prod.production, params.material_cost_per_unit, &what("材料成本"))?;
                let labor_cost = numeric::add(
                    numeric::mul(cap.regular_hours(), params.labor_cost_per_hour, &what("人工成本"))?,
                    numeric::mul(cap.overtime_hours, overtime_rate, &what("加班成本"))?,
                    &what("人工成本"),
                )?;
                let overhead_cost =
                    numeric::mul(prod.production, params.overhead_cost_per_unit, &what("製造費用"))?;
                let total_cost =
                    numeric::sum([material_cost, labor_cost, overhead_cost], &what("總成本"))?;
                let revenue =
                    numeric::mul(prod.demand, params.average_selling_price, &what("營收"))?;
                let profit = numeric::sub(revenue, total_cost, &what("利潤"))?;
                let margin_pct = profit
                    .checked_div(revenue)
                    .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

                Ok(FinancialPlanEntry {
                    period: prod.period,
                    material_cost,
                    labor_cost,
                    overhead_cost,
                    total_cost,
                    revenue,
                    profit,
                    margin_pct,
                })
            })
            .collect::<plan_core::Result<Vec<_>>>()?;

        tracing::debug!(
            "財務計劃完成：{} 期，其中 {} 期可計算毛利率",
            entries.len(),
            entries.iter().filter_map(|e| e.margin_pct).count()
        );

        Ok(entries)
    }

    /// 毛利率無法計算的期間
    pub fn warnings(entries: &[FinancialPlanEntry]) -> Vec<PlanWarning> {
        entries
            .iter()
            .filter(|e| e.margin_pct.is_none())
            .map(|e| {
                PlanWarning::info(
                    STAGE,
                    e.period.label(),
                    "營收為 0，毛利率不適用".to_string(),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_core::{PlanError, Period};

    fn period(i: usize) -> Period {
        Period::new(2025, 1).unwrap().advance(i)
    }

    fn production(i: usize, demand: i64, units: i64) -> ProductionPlanEntry {
        ProductionPlanEntry {
            period: period(i),
            demand: Decimal::from(demand),
            beginning_inventory: Decimal::ZERO,
            net_requirement: Decimal::from(units),
            production: Decimal::from(units),
            ending_inventory: Decimal::ZERO,
        }
    }

    fn capacity(i: usize, required: i64, available: i64) -> CapacityPlanEntry {
        let required = Decimal::from(required);
        let available = Decimal::from(available);
        CapacityPlanEntry {
            period: period(i),
            required_hours: required,
            available_hours: available,
            utilization_pct: (required / available * Decimal::ONE_HUNDRED).min(Decimal::ONE_HUNDRED),
            overtime_hours: (required - available).max(Decimal::ZERO),
            additional_shifts_needed: 0,
        }
    }

    fn params() -> PlanningParameters {
        PlanningParameters::default()
            .with_unit_costs(Decimal::from(20), Decimal::from(5), Decimal::from(15))
            .with_average_selling_price(Decimal::from(45))
    }

    #[test]
    fn test_regular_period() {
        let plan = FinancialPlanner::plan(
            &[production(0, 100, 100)],
            &[capacity(0, 50, 160)],
            &params(),
        )
        .unwrap();

        let entry = &plan[0];
        assert_eq!(entry.material_cost, Decimal::from(2000));
        assert_eq!(entry.labor_cost, Decimal::from(750));
        assert_eq!(entry.overhead_cost, Decimal::from(500));
        assert_eq!(entry.total_cost, Decimal::from(3250));
        assert_eq!(entry.revenue, Decimal::from(4500));
        assert_eq!(entry.profit, Decimal::from(1250));
        // 1250 / 4500 × 100
        let margin = entry.margin_pct.unwrap();
        assert!((margin - Decimal::new(27778, 3)).abs() < Decimal::new(1, 3));
    }

    #[test]
    fn test_overtime_premium() {
        // 正常 160 小時 × 15 + 加班 40 小時 × 15 × 1.5
        let plan = FinancialPlanner::plan(
            &[production(0, 400, 400)],
            &[capacity(0, 200, 160)],
            &params(),
        )
        .unwrap();

        assert_eq!(plan[0].labor_cost, Decimal::from(2400 + 900));
    }

    #[test]
    fn test_zero_revenue_margin_is_none() {
        let plan = FinancialPlanner::plan(
            &[production(0, 0, 50), production(1, 100, 100)],
            &[capacity(0, 25, 160), capacity(1, 50, 160)],
            &params(),
        )
        .unwrap();

        assert_eq!(plan[0].revenue, Decimal::ZERO);
        assert_eq!(plan[0].margin_pct, None);
        assert!(plan[0].profit < Decimal::ZERO);
        // 其他期間不受影響
        assert!(plan[1].margin_pct.is_some());

        let warnings = FinancialPlanner::warnings(&plan);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject, "2025-01");
    }

    #[test]
    fn test_oversized_products_are_calculation_errors() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(28), 0);

        // 營收：需求 × 售價 45
        let mut demand_heavy = production(0, 0, 0);
        demand_heavy.demand = huge;
        assert!(matches!(
            FinancialPlanner::plan(&[demand_heavy], &[capacity(0, 0, 160)], &params()),
            Err(PlanError::CalculationError(_))
        ));

        // 材料成本：生產量 × 20
        let mut output_heavy = production(0, 0, 0);
        output_heavy.production = huge;
        assert!(matches!(
            FinancialPlanner::plan(&[output_heavy], &[capacity(0, 0, 160)], &params()),
            Err(PlanError::CalculationError(_))
        ));

        // 加班成本：加班工時 × 22.5
        let mut overtime_heavy = capacity(0, 0, 160);
        overtime_heavy.overtime_hours = huge;
        assert!(matches!(
            FinancialPlanner::plan(&[production(0, 0, 0)], &[overtime_heavy], &params()),
            Err(PlanError::CalculationError(_))
        ));
    }

    #[test]
    fn test_misaligned_inputs() {
        let result = FinancialPlanner::plan(
            &[production(0, 10, 10), production(1, 10, 10)],
            &[capacity(0, 5, 160)],
            &params(),
        );
        assert!(matches!(result, Err(PlanError::PeriodMismatch { .. })));

        let shifted = FinancialPlanner::plan(
            &[production(0, 10, 10)],
            &[capacity(1, 5, 160)],
            &params(),
        );
        assert!(matches!(shifted, Err(PlanError::PeriodMismatch { .. })));
    }
}
