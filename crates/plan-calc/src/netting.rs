//! 淨需求與生產計劃

use plan_core::calendar::ensure_chronological;
use plan_core::plan::round_units;
use plan_core::{
    numeric, ForecastPoint, LotSizePolicy, PlanError, PlanningParameters, Period,
    ProductionPlanEntry,
};
use rust_decimal::Decimal;

/// 生產計劃器
pub struct ProductionPlanner;

impl ProductionPlanner {
    /// 依預測期間產生生產計劃
    ///
    /// `economic_lot` 僅在批量政策為經濟批量時使用（來自 `LotSizer::aggregate`）。
    pub fn plan(
        points: &[ForecastPoint],
        params: &PlanningParameters,
        economic_lot: Option<Decimal>,
    ) -> plan_core::Result<Vec<ProductionPlanEntry>> {
        let demands: Vec<(Period, Decimal)> = points
            .iter()
            .map(|p| (p.period, p.planning_demand()))
            .collect();
        Self::plan_demands(&demands, params, economic_lot)
    }

    /// 按時間順序逐期計算（期末庫存帶入下一期）
    pub fn plan_demands(
        demands: &[(Period, Decimal)],
        params: &PlanningParameters,
        economic_lot: Option<Decimal>,
    ) -> plan_core::Result<Vec<ProductionPlanEntry>> {
        ensure_chronological("production", demands.iter().map(|(period, _)| *period))?;
        let lot = Self::resolve_lot(params, economic_lot)?;

        let (entries, final_inventory) = demands.iter().try_fold(
            (Vec::with_capacity(demands.len()), params.initial_inventory),
            |(mut entries, inventory), &(period, demand)| {
                if demand < Decimal::ZERO {
                    return Err(PlanError::invalid(
                        "demand",
                        format!("{} 需求不可為負：{}", period, demand),
                    ));
                }

                let net_requirement = numeric::add(demand, params.safety_stock, "淨需求")
                    .and_then(|gross| numeric::sub(gross, inventory, "淨需求"))?
                    .max(Decimal::ZERO);
                let production = Self::lot_size(net_requirement, lot)?;
                let ending_inventory = numeric::add(inventory, production, "期末庫存")
                    .and_then(|available| numeric::sub(available, demand, "期末庫存"))?
                    .max(Decimal::ZERO);

                entries.push(ProductionPlanEntry {
                    period,
                    demand,
                    beginning_inventory: inventory,
                    net_requirement,
                    production,
                    ending_inventory,
                });

                Ok((entries, ending_inventory))
            },
        )?;

        tracing::debug!(
            "生產計劃完成：{} 期，期末庫存 {}",
            entries.len(),
            final_inventory
        );

        Ok(entries)
    }

    /// 決定批量單位；None 表示批對批
    fn resolve_lot(
        params: &PlanningParameters,
        economic_lot: Option<Decimal>,
    ) -> plan_core::Result<Option<Decimal>> {
        match params.lot_size_policy {
            LotSizePolicy::LotForLot => Ok(None),
            LotSizePolicy::LotMultiple => Ok(Some(params.lot_multiple)),
            LotSizePolicy::EconomicOrderQuantity => {
                let eoq = economic_lot.ok_or_else(|| {
                    PlanError::invalid("lot_size_policy", "經濟批量政策需要產品族 EOQ")
                })?;
                let lot = round_units(eoq);
                if lot <= Decimal::ZERO {
                    return Err(PlanError::invalid(
                        "lot_size_policy",
                        format!("經濟批量必須大於 0，實際為 {}", eoq),
                    ));
                }
                Ok(Some(lot))
            }
        }
    }

    /// 淨需求向上取整到批量倍數
    fn lot_size(net_requirement: Decimal, lot: Option<Decimal>) -> plan_core::Result<Decimal> {
        match lot {
            Some(lot) if lot > Decimal::ZERO => {
                numeric::mul((net_requirement / lot).ceil(), lot, "批量生產量")
            }
            _ => Ok(net_requirement),
        }
    }
}
