//! 規劃參數配置

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{numeric, PlanError, Period, Result};

/// 預測期數上限
pub const MAX_FORECAST_HORIZON: usize = 12;

/// 規劃參數（明確傳入，引擎內不讀取任何全域狀態）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningParameters {
    /// 期初庫存
    pub initial_inventory: Decimal,

    /// 安全庫存
    pub safety_stock: Decimal,

    /// 每期工作天數
    pub working_days_per_period: Decimal,

    /// 每日班次
    pub shifts_per_day: Decimal,

    /// 每班工時
    pub hours_per_shift: Decimal,

    /// 人工效率（0-1）
    pub labor_efficiency: Decimal,

    /// 每小時人工成本
    pub labor_cost_per_hour: Decimal,

    /// 單位材料成本
    pub material_cost_per_unit: Decimal,

    /// 單位製造費用
    pub overhead_cost_per_unit: Decimal,

    /// 每次訂購成本（S）
    pub ordering_cost: Decimal,

    /// 持有成本率（單價的比例）
    pub holding_cost_rate: Decimal,

    /// 前置時間（天）
    pub lead_time_days: Decimal,

    /// 平均售價
    pub average_selling_price: Decimal,

    /// 加班費率倍數
    pub overtime_premium: Decimal,

    /// 生產批量倍數
    pub lot_multiple: Decimal,

    /// 單位標準工時
    pub standard_hours_per_unit: Decimal,

    /// 缺少需求代理值時的年需求預設值
    pub default_annual_demand: Decimal,

    /// 每月成長率
    pub growth_rate_per_month: Decimal,

    /// 季節係數表
    pub seasonal_factors: SeasonalProfile,

    /// 預測模型
    pub forecast_method: ForecastMethod,

    /// 未來預測期數
    pub forecast_horizon: usize,

    /// 每期信心衰減（百分點）
    pub confidence_decay: Decimal,

    /// 信心下限（百分比）
    pub confidence_floor: Decimal,

    /// 資料來源偏好
    pub data_source: DataSourcePreference,

    /// 合成基準序列的起始期間
    pub baseline_start: Period,

    /// 生產批量政策
    pub lot_size_policy: LotSizePolicy,
}

impl Default for PlanningParameters {
    fn default() -> Self {
        Self {
            initial_inventory: Decimal::from(500),
            safety_stock: Decimal::from(100),
            working_days_per_period: Decimal::from(22),
            shifts_per_day: Decimal::ONE,
            hours_per_shift: Decimal::from(8),
            labor_efficiency: Decimal::new(85, 2),
            labor_cost_per_hour: Decimal::from(15),
            material_cost_per_unit: Decimal::from(20),
            overhead_cost_per_unit: Decimal::from(5),
            ordering_cost: Decimal::from(90),
            holding_cost_rate: Decimal::new(20, 2),
            lead_time_days: Decimal::from(7),
            average_selling_price: Decimal::from(45),
            overtime_premium: Decimal::new(15, 1),
            lot_multiple: Decimal::from(10),
            standard_hours_per_unit: Decimal::new(5, 1),
            default_annual_demand: Decimal::from(2400),
            growth_rate_per_month: Decimal::new(2, 2),
            seasonal_factors: SeasonalProfile::default(),
            forecast_method: ForecastMethod::default(),
            forecast_horizon: 6,
            confidence_decay: Decimal::from(5),
            confidence_floor: Decimal::from(70),
            data_source: DataSourcePreference::Auto,
            baseline_start: Period::default(),
            lot_size_policy: LotSizePolicy::LotMultiple,
        }
    }
}

impl PlanningParameters {
    /// 從 JSON 載入（未提供的欄位使用預設值）
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| PlanError::invalid("parameters", format!("無法解析 JSON: {}", e)))
    }

    /// 建構器模式：設置期初庫存
    pub fn with_initial_inventory(mut self, qty: Decimal) -> Self {
        self.initial_inventory = qty;
        self
    }

    /// 建構器模式：設置安全庫存
    pub fn with_safety_stock(mut self, qty: Decimal) -> Self {
        self.safety_stock = qty;
        self
    }

    /// 建構器模式：設置批量倍數
    pub fn with_lot_multiple(mut self, multiple: Decimal) -> Self {
        self.lot_multiple = multiple;
        self
    }

    /// 建構器模式：設置訂購成本與持有成本率
    pub fn with_order_costs(mut self, ordering_cost: Decimal, holding_cost_rate: Decimal) -> Self {
        self.ordering_cost = ordering_cost;
        self.holding_cost_rate = holding_cost_rate;
        self
    }

    /// 建構器模式：設置人力配置
    pub fn with_labor(
        mut self,
        working_days: Decimal,
        shifts_per_day: Decimal,
        hours_per_shift: Decimal,
        efficiency: Decimal,
    ) -> Self {
        self.working_days_per_period = working_days;
        self.shifts_per_day = shifts_per_day;
        self.hours_per_shift = hours_per_shift;
        self.labor_efficiency = efficiency;
        self
    }

    /// 建構器模式：設置成本參數
    pub fn with_unit_costs(
        mut self,
        material_cost: Decimal,
        overhead_cost: Decimal,
        labor_cost_per_hour: Decimal,
    ) -> Self {
        self.material_cost_per_unit = material_cost;
        self.overhead_cost_per_unit = overhead_cost;
        self.labor_cost_per_hour = labor_cost_per_hour;
        self
    }

    /// 建構器模式：設置平均售價
    pub fn with_average_selling_price(mut self, price: Decimal) -> Self {
        self.average_selling_price = price;
        self
    }

    /// 建構器模式：設置單位標準工時
    pub fn with_standard_hours_per_unit(mut self, hours: Decimal) -> Self {
        self.standard_hours_per_unit = hours;
        self
    }

    /// 建構器模式：設置預測模型
    pub fn with_forecast_method(mut self, method: ForecastMethod) -> Self {
        self.forecast_method = method;
        self
    }

    /// 建構器模式：設置未來預測期數
    pub fn with_forecast_horizon(mut self, horizon: usize) -> Self {
        self.forecast_horizon = horizon;
        self
    }

    /// 建構器模式：設置資料來源偏好
    pub fn with_data_source(mut self, preference: DataSourcePreference) -> Self {
        self.data_source = preference;
        self
    }

    /// 建構器模式：設置生產批量政策
    pub fn with_lot_size_policy(mut self, policy: LotSizePolicy) -> Self {
        self.lot_size_policy = policy;
        self
    }

    /// 建構器模式：設置合成基準起始期間
    pub fn with_baseline_start(mut self, start: Period) -> Self {
        self.baseline_start = start;
        self
    }

    /// 建構器模式：設置每月成長率
    pub fn with_growth_rate(mut self, rate: Decimal) -> Self {
        self.growth_rate_per_month = rate;
        self
    }

    /// 單位持有成本 H = 單價 × 持有成本率
    pub fn holding_cost(&self, unit_price: Decimal) -> Result<Decimal> {
        numeric::mul(unit_price, self.holding_cost_rate, "持有成本")
    }

    /// 每期可用工時
    pub fn available_hours_per_period(&self) -> Result<Decimal> {
        let day_hours =
            numeric::mul(self.shifts_per_day, self.effective_hours_per_shift()?, "每日工時")?;
        numeric::mul(self.working_days_per_period, day_hours, "每期可用工時")
    }

    /// 單一班次的有效工時
    pub fn effective_hours_per_shift(&self) -> Result<Decimal> {
        numeric::mul(self.hours_per_shift, self.labor_efficiency, "每班有效工時")
    }

    /// 預測信心分數：max(下限, 100 - 衰減 × h)
    pub fn confidence_at(&self, horizon: usize) -> Decimal {
        self.confidence_decay
            .checked_mul(Decimal::from(horizon as u64))
            .and_then(|decay| Decimal::ONE_HUNDRED.checked_sub(decay))
            .map_or(self.confidence_floor, |raw| raw.max(self.confidence_floor))
    }

    /// 在計算開始前檢查全部參數
    pub fn validate(&self) -> Result<()> {
        ensure_non_negative("initial_inventory", self.initial_inventory)?;
        ensure_non_negative("safety_stock", self.safety_stock)?;
        ensure_positive("working_days_per_period", self.working_days_per_period)?;
        ensure_positive("shifts_per_day", self.shifts_per_day)?;
        ensure_positive("hours_per_shift", self.hours_per_shift)?;
        ensure_positive("labor_efficiency", self.labor_efficiency)?;
        if self.labor_efficiency > Decimal::ONE {
            return Err(PlanError::invalid(
                "labor_efficiency",
                format!("人工效率必須介於 0 到 1，實際為 {}", self.labor_efficiency),
            ));
        }
        self.available_hours_per_period()?;
        ensure_non_negative("labor_cost_per_hour", self.labor_cost_per_hour)?;
        ensure_non_negative("material_cost_per_unit", self.material_cost_per_unit)?;
        ensure_non_negative("overhead_cost_per_unit", self.overhead_cost_per_unit)?;
        ensure_positive("ordering_cost", self.ordering_cost)?;
        ensure_positive("holding_cost_rate", self.holding_cost_rate)?;
        ensure_non_negative("lead_time_days", self.lead_time_days)?;
        ensure_positive("average_selling_price", self.average_selling_price)?;
        if self.overtime_premium < Decimal::ONE {
            return Err(PlanError::invalid(
                "overtime_premium",
                format!("加班費率倍數不可小於 1，實際為 {}", self.overtime_premium),
            ));
        }
        ensure_positive("lot_multiple", self.lot_multiple)?;
        ensure_positive("standard_hours_per_unit", self.standard_hours_per_unit)?;
        ensure_positive("default_annual_demand", self.default_annual_demand)?;
        ensure_non_negative("growth_rate_per_month", self.growth_rate_per_month)?;
        self.seasonal_factors.validate()?;
        self.forecast_method.validate()?;
        if self.forecast_horizon > MAX_FORECAST_HORIZON {
            return Err(PlanError::invalid(
                "forecast_horizon",
                format!(
                    "預測期數不可超過 {}，實際為 {}",
                    MAX_FORECAST_HORIZON, self.forecast_horizon
                ),
            ));
        }
        ensure_non_negative("confidence_decay", self.confidence_decay)?;
        if self.confidence_floor < Decimal::ZERO || self.confidence_floor > Decimal::ONE_HUNDRED {
            return Err(PlanError::invalid(
                "confidence_floor",
                format!("信心下限必須介於 0 到 100，實際為 {}", self.confidence_floor),
            ));
        }
        Ok(())
    }
}

fn ensure_positive(field: &str, value: Decimal) -> Result<()> {
    if value <= Decimal::ZERO {
        return Err(PlanError::invalid(
            field,
            format!("必須大於 0，實際為 {}", value),
        ));
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: Decimal) -> Result<()> {
    if value < Decimal::ZERO {
        return Err(PlanError::invalid(
            field,
            format!("不可為負，實際為 {}", value),
        ));
    }
    Ok(())
}

/// 季節係數表（一月到十二月各一個乘數）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile(pub [Decimal; 12]);

impl SeasonalProfile {
    /// 無季節性（全部為 1）
    pub fn flat() -> Self {
        Self([Decimal::ONE; 12])
    }

    /// 指定期間的季節係數
    pub fn factor(&self, period: Period) -> Decimal {
        self.0[period.month_index()]
    }

    fn validate(&self) -> Result<()> {
        for (index, factor) in self.0.iter().enumerate() {
            if *factor <= Decimal::ZERO {
                return Err(PlanError::invalid(
                    "seasonal_factors",
                    format!("{} 月季節係數必須大於 0，實際為 {}", index + 1, factor),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SeasonalProfile {
    /// 預設值為編輯性估計（十二月旺季、二月淡季），應由產品負責人確認
    fn default() -> Self {
        Self([
            Decimal::new(10, 1),
            Decimal::new(9, 1),
            Decimal::new(10, 1),
            Decimal::new(11, 1),
            Decimal::new(12, 1),
            Decimal::new(11, 1),
            Decimal::new(10, 1),
            Decimal::new(10, 1),
            Decimal::new(11, 1),
            Decimal::new(12, 1),
            Decimal::new(15, 1),
            Decimal::new(18, 1),
        ])
    }
}

/// 預測模型
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastMethod {
    /// 簡單移動平均
    MovingAverage { window: usize },

    /// 指數平滑
    ExponentialSmoothing { alpha: Decimal },
}

impl ForecastMethod {
    /// 三期移動平均
    pub fn moving_average() -> Self {
        Self::MovingAverage { window: 3 }
    }

    /// α = 0.7 的指數平滑
    pub fn exponential_smoothing() -> Self {
        Self::ExponentialSmoothing {
            alpha: Decimal::new(7, 1),
        }
    }

    /// 模型名稱
    pub fn name(&self) -> &'static str {
        match self {
            Self::MovingAverage { .. } => "moving_average",
            Self::ExponentialSmoothing { .. } => "exponential_smoothing",
        }
    }

    fn validate(&self) -> Result<()> {
        match *self {
            Self::MovingAverage { window } => {
                if window == 0 {
                    return Err(PlanError::invalid("forecast_method.window", "視窗必須至少為 1"));
                }
            }
            Self::ExponentialSmoothing { alpha } => {
                if alpha <= Decimal::ZERO || alpha > Decimal::ONE {
                    return Err(PlanError::invalid(
                        "forecast_method.alpha",
                        format!("α 必須介於 (0, 1]，實際為 {}", alpha),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for ForecastMethod {
    fn default() -> Self {
        Self::exponential_smoothing()
    }
}

/// 預測資料來源偏好
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSourcePreference {
    /// 有銷售資料則使用，否則退回合成基準
    #[default]
    Auto,
    /// 必須使用歷史銷售資料
    Historical,
    /// 一律使用合成基準
    Synthetic,
}

/// 生產批量政策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LotSizePolicy {
    /// 批對批：生產量等於淨需求
    LotForLot,

    /// 向上取整到批量倍數
    #[default]
    LotMultiple,

    /// 以產品族經濟批量為單位生產
    EconomicOrderQuantity,
}
