//! 規劃結果模型（每次執行重新產生，不可變）

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::Period;

/// 四捨五入到整數單位（僅供顯示）
pub fn round_units(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// ABC 類別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    /// 累計 ≤ 80%
    A,
    /// 累計 ≤ 95%
    B,
    /// 其餘
    C,
}

impl AbcClass {
    /// 依累計百分比判定類別
    pub fn from_accumulated(accumulated_pct: Decimal) -> Self {
        if accumulated_pct <= Decimal::from(80) {
            Self::A
        } else if accumulated_pct <= Decimal::from(95) {
            Self::B
        } else {
            Self::C
        }
    }
}

/// ABC 分類結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationEntry {
    /// 識別碼（商品ID或原物料名稱）
    pub identity: String,

    /// 年用量
    pub annual_quantity: Decimal,

    /// 單價
    pub unit_price: Decimal,

    /// 年消耗金額
    pub annual_value: Decimal,

    /// 佔總金額百分比
    pub percentage: Decimal,

    /// 累計百分比
    pub accumulated_percentage: Decimal,

    /// 類別
    pub class: AbcClass,
}

/// 經濟訂購量結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EoqEntry {
    /// 商品ID
    pub item_id: String,

    /// 年需求（D）
    pub annual_demand: Decimal,

    /// 每次訂購成本（S）
    pub ordering_cost: Decimal,

    /// 單位年持有成本（H）
    pub holding_cost: Decimal,

    /// 經濟訂購量
    pub eoq: Decimal,

    /// 每年訂購次數
    pub orders_per_year: Decimal,

    /// 訂購間隔天數
    pub days_between_orders: Decimal,

    /// 再訂購點
    pub reorder_point: Decimal,

    /// 年訂購成本 D/Q × S
    pub annual_ordering_cost: Decimal,

    /// 年持有成本 Q/2 × H
    pub annual_holding_cost: Decimal,

    /// 年度總成本
    pub total_annual_cost: Decimal,

    /// 現有庫存
    pub on_hand_stock: Decimal,

    /// 現有庫存是否已達再訂購點
    pub needs_reorder: bool,
}

impl EoqEntry {
    pub fn rounded_eoq(&self) -> Decimal {
        round_units(self.eoq)
    }

    pub fn rounded_reorder_point(&self) -> Decimal {
        round_units(self.reorder_point)
    }

    pub fn rounded_days_between_orders(&self) -> Decimal {
        round_units(self.days_between_orders)
    }
}

/// 預測資料來源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// 合成基準（準確度指標不具意義）
    Synthetic,
    /// 歷史銷售資料
    Historical,
}

/// 預測點
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// 期間
    pub period: Period,

    /// 實際需求（未來期間為空）
    pub actual_demand: Option<Decimal>,

    /// 預測需求（移動平均前 window-1 期為空）
    pub forecast_demand: Option<Decimal>,

    /// 季節係數
    pub seasonal_factor: Decimal,

    /// 成長係數
    pub growth_factor: Decimal,

    /// 信心分數（僅未來期間）
    pub confidence: Option<Decimal>,
}

impl ForecastPoint {
    /// 是否為未來期間
    pub fn is_future(&self) -> bool {
        self.actual_demand.is_none()
    }

    /// 規劃用需求：有預測用預測，否則用實際
    pub fn planning_demand(&self) -> Decimal {
        self.forecast_demand
            .or(self.actual_demand)
            .unwrap_or(Decimal::ZERO)
    }

    /// 預測誤差（實際 - 預測），兩者皆存在時才有值
    pub fn error(&self) -> Option<Decimal> {
        match (self.actual_demand, self.forecast_demand) {
            (Some(actual), Some(forecast)) => Some(actual - forecast),
            _ => None,
        }
    }
}

/// 生產計劃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlanEntry {
    pub period: Period,
    pub demand: Decimal,
    pub beginning_inventory: Decimal,
    /// 淨需求 = max(0, 需求 + 安全庫存 - 期初庫存)
    pub net_requirement: Decimal,
    pub production: Decimal,
    pub ending_inventory: Decimal,
}

/// 產能計劃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityPlanEntry {
    pub period: Period,
    pub required_hours: Decimal,
    pub available_hours: Decimal,
    /// 利用率，限制在 [0, 100]
    pub utilization_pct: Decimal,
    /// 超出可用工時的部分
    pub overtime_hours: Decimal,
    pub additional_shifts_needed: u32,
}

impl CapacityPlanEntry {
    /// 正常工時內完成的時數
    pub fn regular_hours(&self) -> Decimal {
        self.required_hours.min(self.available_hours)
    }
}

/// 財務計劃
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialPlanEntry {
    pub period: Period,
    pub material_cost: Decimal,
    pub labor_cost: Decimal,
    pub overhead_cost: Decimal,
    pub total_cost: Decimal,
    pub revenue: Decimal,
    pub profit: Decimal,
    /// 毛利率；營收為 0 時為空
    pub margin_pct: Option<Decimal>,
}
