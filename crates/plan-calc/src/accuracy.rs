//! 預測準確度指標

use plan_core::{numeric, ForecastPoint, PlanError};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 預測準確度指標（僅計算有預測值的期間）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccuracyMetrics {
    /// 參與評估的期數
    pub periods_evaluated: usize,

    /// 平均絕對偏差
    pub mad: Decimal,

    /// 均方偏差
    pub msd: Decimal,

    /// 平均絕對百分比誤差 = 100 × Σ|誤差| / Σ實際
    pub mape: Decimal,

    /// 偏誤（誤差平均）
    pub bias: Decimal,

    /// 準確度 = max(0, 100 - MAPE)
    pub accuracy: Decimal,

    /// 追蹤訊號 = Σ誤差 / MAD；MAD 為 0 時為空
    pub tracking_signal: Option<Decimal>,
}

impl AccuracyMetrics {
    /// 評估預測序列
    pub fn evaluate(points: &[ForecastPoint]) -> plan_core::Result<Self> {
        let pairs: Vec<(Decimal, Decimal)> = points
            .iter()
            .filter_map(|p| Some((p.actual_demand?, p.error()?)))
            .collect();

        if pairs.is_empty() {
            return Err(PlanError::InsufficientData(
                "沒有同時具備實際值與預測值的期間".to_string(),
            ));
        }

        let sum_actual = numeric::sum(pairs.iter().map(|(actual, _)| *actual), "實際需求總和")?;
        if sum_actual <= Decimal::ZERO {
            return Err(PlanError::DegenerateForecast(format!(
                "{} 期實際需求總和為 {}，無法計算 MAPE",
                pairs.len(),
                sum_actual
            )));
        }

        let n = Decimal::from(pairs.len() as u64);
        let sum_error = numeric::sum(pairs.iter().map(|(_, e)| *e), "誤差總和")?;
        let sum_abs = numeric::sum(pairs.iter().map(|(_, e)| e.abs()), "絕對誤差總和")?;
        let sum_sq = pairs.iter().try_fold(Decimal::ZERO, |acc, (_, e)| {
            numeric::add(acc, numeric::mul(*e, *e, "誤差平方")?, "誤差平方和")
        })?;

        let mad = sum_abs / n;
        let mape = numeric::div(
            numeric::mul(Decimal::ONE_HUNDRED, sum_abs, "MAPE")?,
            sum_actual,
            "MAPE",
        )?;

        Ok(Self {
            periods_evaluated: pairs.len(),
            mad,
            msd: sum_sq / n,
            mape,
            bias: sum_error / n,
            accuracy: (Decimal::ONE_HUNDRED - mape).max(Decimal::ZERO),
            tracking_signal: sum_error.checked_div(mad),
        })
    }
}
