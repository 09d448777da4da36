//! 經濟訂購量（EOQ）批量計算

use plan_core::{numeric, CatalogItem, EoqEntry, PlanError, PlanningParameters};
use rayon::prelude::*;
use rust_decimal::{Decimal, MathematicalOps};

/// 一年天數
const DAYS_PER_YEAR: u32 = 365;

/// 批量計算器
pub struct LotSizer;

impl LotSizer {
    /// 經濟訂購量
    /// EOQ = sqrt(2 * 年需求量 * 訂購成本 / 持有成本)
    pub fn economic_order_quantity(
        annual_demand: Decimal,
        ordering_cost: Decimal,
        holding_cost: Decimal,
    ) -> plan_core::Result<Decimal> {
        if holding_cost <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "holding_cost",
                format!("持有成本必須大於 0，實際為 {}", holding_cost),
            ));
        }
        if annual_demand <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "annual_demand",
                format!("年需求必須大於 0，實際為 {}", annual_demand),
            ));
        }
        if ordering_cost <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "ordering_cost",
                format!("訂購成本必須大於 0，實際為 {}", ordering_cost),
            ));
        }

        let radicand = Decimal::TWO
            .checked_mul(annual_demand)
            .and_then(|v| v.checked_mul(ordering_cost))
            .and_then(|v| v.checked_div(holding_cost))
            .ok_or_else(|| PlanError::CalculationError("EOQ 計算溢位".to_string()))?;

        radicand
            .sqrt()
            .ok_or_else(|| PlanError::CalculationError(format!("無法開平方: {}", radicand)))
    }

    /// 計算單一商品的 EOQ、再訂購點與週期指標
    pub fn size(item: &CatalogItem, params: &PlanningParameters) -> plan_core::Result<EoqEntry> {
        let demand = item.effective_annual_demand(params.default_annual_demand);
        let ordering_cost = params.ordering_cost;
        let holding_cost = params.holding_cost(item.unit_price)?;

        let eoq = Self::economic_order_quantity(demand, ordering_cost, holding_cost).map_err(
            |e| match e {
                PlanError::InvalidParameter { field, reason } => PlanError::InvalidParameter {
                    field,
                    reason: format!("商品 {}: {}", item.id, reason),
                },
                other => other,
            },
        )?;

        let days_per_year = Decimal::from(DAYS_PER_YEAR);
        let orders_per_year = numeric::div(demand, eoq, "年訂購次數")?;
        let days_between_orders = numeric::div(days_per_year, orders_per_year, "訂購間隔天數")?;
        let reorder_point = numeric::mul(demand / days_per_year, params.lead_time_days, "再訂購點")?;

        let annual_ordering_cost = numeric::mul(orders_per_year, ordering_cost, "年訂購成本")?;
        let annual_holding_cost = numeric::mul(eoq / Decimal::TWO, holding_cost, "年持有成本")?;
        let total_annual_cost =
            numeric::add(annual_ordering_cost, annual_holding_cost, "年總成本")?;

        Ok(EoqEntry {
            item_id: item.id.clone(),
            annual_demand: demand,
            ordering_cost,
            holding_cost,
            eoq,
            orders_per_year,
            days_between_orders,
            reorder_point,
            annual_ordering_cost,
            annual_holding_cost,
            total_annual_cost,
            on_hand_stock: item.on_hand_stock,
            needs_reorder: item.on_hand_stock <= reorder_point,
        })
    }

    /// 計算全部商品（各商品獨立，並行計算，保持輸入順序）
    pub fn size_all(
        items: &[CatalogItem],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<EoqEntry>> {
        let entries = items
            .par_iter()
            .map(|item| Self::size(item, params))
            .collect::<plan_core::Result<Vec<_>>>()?;

        tracing::debug!(
            "EOQ 計算完成：{} 筆，需再訂購 {} 筆",
            entries.len(),
            entries.iter().filter(|e| e.needs_reorder).count()
        );

        Ok(entries)
    }

    /// 產品族經濟批量
    ///
    /// 以全部商品的年需求總和為 D，持有成本以平均售價計算。
    pub fn aggregate(
        items: &[CatalogItem],
        params: &PlanningParameters,
    ) -> plan_core::Result<Decimal> {
        let total_demand = numeric::sum(
            items
                .iter()
                .map(|item| item.effective_annual_demand(params.default_annual_demand)),
            "產品族年需求",
        )?;

        Self::economic_order_quantity(
            total_demand,
            params.ordering_cost,
            params.holding_cost(params.average_selling_price)?,
        )
    }
}
