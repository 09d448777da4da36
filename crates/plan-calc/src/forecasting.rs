//! 需求預測（季節性基準 + 移動平均 / 指數平滑）

use plan_core::{
    numeric, CatalogItem, DataSource, DataSourcePreference, ForecastMethod, ForecastPoint,
    PlanError, PlanningParameters, SalesRecord,
};
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use crate::accuracy::AccuracyMetrics;
use crate::bucketing::SalesBucketer;
use crate::PlanWarning;

const STAGE: &str = "forecast";

/// 基準序列期數（合成基準固定 12 期）
pub const BASELINE_PERIODS: usize = 12;

/// 預測結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastReport {
    /// 資料來源；合成基準的準確度指標不具意義
    pub data_source: DataSource,

    pub method: ForecastMethod,

    /// 基準期間在前，未來期間在後
    pub points: Vec<ForecastPoint>,

    /// 準確度指標；無法計算時為空
    pub metrics: Option<AccuracyMetrics>,

    pub comparison: ForecastComparison,

    pub warnings: Vec<PlanWarning>,
}

impl ForecastReport {
    /// 基準期間（有實際值）
    pub fn baseline(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| !p.is_future())
    }

    /// 未來期間
    pub fn future(&self) -> impl Iterator<Item = &ForecastPoint> {
        self.points.iter().filter(|p| p.is_future())
    }
}

/// 兩種模型在同一序列上的比較
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastComparison {
    pub moving_average: Option<AccuracyMetrics>,
    pub exponential_smoothing: Option<AccuracyMetrics>,
    /// MAD 較低的模型
    pub preferred: Option<ForecastMethod>,
}

/// 需求預測器
pub struct Forecaster;

impl Forecaster {
    /// 產生預測
    ///
    /// 有銷售資料時以歷史月份為基準，否則以商品需求代理值合成 12 期基準。
    pub fn forecast(
        catalog: &[CatalogItem],
        sales: &[SalesRecord],
        params: &PlanningParameters,
    ) -> plan_core::Result<ForecastReport> {
        let mut warnings = Vec::new();

        let (data_source, mut points) = match (params.data_source, sales.is_empty()) {
            (DataSourcePreference::Historical, true) => {
                return Err(PlanError::InsufficientData(
                    "指定使用歷史資料，但沒有任何銷售記錄".to_string(),
                ));
            }
            (DataSourcePreference::Synthetic, _) | (DataSourcePreference::Auto, true) => {
                warnings.push(PlanWarning::info(
                    STAGE,
                    "baseline".to_string(),
                    "使用合成基準，準確度指標僅供參考".to_string(),
                ));
                (DataSource::Synthetic, Self::synthetic_baseline(catalog, params)?)
            }
            _ => (DataSource::Historical, Self::historical_baseline(sales, params)?),
        };

        let actuals: Vec<Decimal> = points
            .iter()
            .map(|p| p.actual_demand.unwrap_or(Decimal::ZERO))
            .collect();
        let fitted = Self::smooth(&actuals, params.forecast_method)?;
        for (point, forecast) in points.iter_mut().zip(&fitted) {
            point.forecast_demand = *forecast;
        }

        let metrics = Self::evaluate_tolerant(&points, &mut warnings)?;
        let comparison = Self::compare(&actuals, params.forecast_method);

        let future = Self::project(&points, &actuals, &fitted, params)?;
        points.extend(future);

        tracing::debug!(
            "預測完成：來源 {:?}，模型 {}，基準 {} 期，未來 {} 期",
            data_source,
            params.forecast_method.name(),
            actuals.len(),
            params.forecast_horizon
        );

        Ok(ForecastReport {
            data_source,
            method: params.forecast_method,
            points,
            metrics,
            comparison,
            warnings,
        })
    }

    /// 依模型平滑
    pub fn smooth(
        actuals: &[Decimal],
        method: ForecastMethod,
    ) -> plan_core::Result<Vec<Option<Decimal>>> {
        match method {
            ForecastMethod::MovingAverage { window } => Self::moving_average(actuals, window),
            ForecastMethod::ExponentialSmoothing { alpha } => {
                Self::exponential_smoothing(actuals, alpha)
            }
        }
    }

    /// 簡單移動平均：第 i 期（i ≥ window-1）為第 i-window+1..=i 期實際值的平均，之前為空
    pub fn moving_average(
        actuals: &[Decimal],
        window: usize,
    ) -> plan_core::Result<Vec<Option<Decimal>>> {
        let window = window.max(1);
        let divisor = Decimal::from(window as u64);

        (0..actuals.len())
            .map(|i| {
                if i + 1 < window {
                    Ok(None)
                } else {
                    let sum =
                        numeric::sum(actuals[i + 1 - window..=i].iter().copied(), "移動平均")?;
                    Ok(Some(sum / divisor))
                }
            })
            .collect()
    }

    /// 指數平滑：F[0] = A[0]，F[i] = α·A[i-1] + (1-α)·F[i-1]
    pub fn exponential_smoothing(
        actuals: &[Decimal],
        alpha: Decimal,
    ) -> plan_core::Result<Vec<Option<Decimal>>> {
        let mut fitted = Vec::with_capacity(actuals.len());
        let mut previous: Option<(Decimal, Decimal)> = None;

        for &actual in actuals {
            let forecast = match previous {
                None => actual,
                Some((prev_actual, prev_forecast)) => {
                    Self::smoothed_level(prev_actual, prev_forecast, alpha)?
                }
            };
            fitted.push(Some(forecast));
            previous = Some((actual, forecast));
        }

        Ok(fitted)
    }

    /// α·實際 + (1-α)·預測
    fn smoothed_level(
        actual: Decimal,
        forecast: Decimal,
        alpha: Decimal,
    ) -> plan_core::Result<Decimal> {
        numeric::add(
            numeric::mul(alpha, actual, "指數平滑")?,
            numeric::mul(Decimal::ONE - alpha, forecast, "指數平滑")?,
            "指數平滑",
        )
    }

    /// 下一期的平滑水準（未來投影的基數）
    pub fn next_level(
        actuals: &[Decimal],
        fitted: &[Option<Decimal>],
        method: ForecastMethod,
    ) -> plan_core::Result<Option<Decimal>> {
        let Some(&last_actual) = actuals.last() else {
            return Ok(None);
        };
        let level = match method {
            ForecastMethod::MovingAverage { window } => {
                let take = window.max(1).min(actuals.len());
                let sum =
                    numeric::sum(actuals[actuals.len() - take..].iter().copied(), "移動平均")?;
                sum / Decimal::from(take as u64)
            }
            ForecastMethod::ExponentialSmoothing { alpha } => {
                let last_forecast = fitted.last().copied().flatten().unwrap_or(last_actual);
                Self::smoothed_level(last_actual, last_forecast, alpha)?
            }
        };
        Ok(Some(level))
    }

    /// 合成 12 期基準：平均月需求 × 季節係數 × (1 + idx × 月成長率)
    pub fn synthetic_baseline(
        catalog: &[CatalogItem],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<ForecastPoint>> {
        if catalog.is_empty() {
            return Err(PlanError::InsufficientData(
                "沒有銷售記錄也沒有商品，無法合成需求基準".to_string(),
            ));
        }

        let annual_demand = numeric::sum(
            catalog
                .iter()
                .map(|item| item.effective_annual_demand(params.default_annual_demand)),
            "年需求總和",
        )?;
        let avg_monthly = annual_demand / Decimal::from(BASELINE_PERIODS as u64);

        SalesBucketer::create_buckets(params.baseline_start, BASELINE_PERIODS)
            .into_iter()
            .enumerate()
            .map(|(idx, period)| {
                let seasonal_factor = params.seasonal_factors.factor(period);
                let growth = numeric::mul(
                    Decimal::from(idx as u64),
                    params.growth_rate_per_month,
                    "成長係數",
                )?;
                let growth_factor = numeric::add(Decimal::ONE, growth, "成長係數")?;
                let demand = numeric::mul(avg_monthly, seasonal_factor, "合成需求")
                    .and_then(|v| numeric::mul(v, growth_factor, "合成需求"))?;

                Ok(ForecastPoint {
                    period,
                    actual_demand: Some(demand),
                    forecast_demand: None,
                    seasonal_factor,
                    growth_factor,
                    confidence: None,
                })
            })
            .collect()
    }

    /// 以歷史銷售月份為基準
    pub fn historical_baseline(
        sales: &[SalesRecord],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<ForecastPoint>> {
        let points = SalesBucketer::monthly(sales)?
            .into_iter()
            .map(|bucket| ForecastPoint {
                period: bucket.period,
                actual_demand: Some(bucket.units),
                forecast_demand: None,
                seasonal_factor: params.seasonal_factors.factor(bucket.period),
                growth_factor: Decimal::ONE,
                confidence: None,
            })
            .collect();
        Ok(points)
    }

    /// 投影未來期間：水準 × 季節係數 × 成長^h，信心隨期數遞減
    pub fn project(
        baseline: &[ForecastPoint],
        actuals: &[Decimal],
        fitted: &[Option<Decimal>],
        params: &PlanningParameters,
    ) -> plan_core::Result<Vec<ForecastPoint>> {
        let (last, level) = match (
            baseline.last(),
            Self::next_level(actuals, fitted, params.forecast_method)?,
        ) {
            (Some(last), Some(level)) => (last.period, level),
            _ => return Ok(Vec::new()),
        };

        let growth = numeric::add(Decimal::ONE, params.growth_rate_per_month, "月成長率")?;

        (1..=params.forecast_horizon)
            .map(|h| {
                let period = last.advance(h);
                let seasonal_factor = params.seasonal_factors.factor(period);
                let growth_factor = growth.checked_powu(h as u64).ok_or_else(|| {
                    PlanError::CalculationError(format!("成長係數溢位：{}^{}", growth, h))
                })?;
                let forecast = level
                    .checked_mul(seasonal_factor)
                    .and_then(|v| v.checked_mul(growth_factor))
                    .ok_or_else(|| {
                        PlanError::CalculationError(format!("{} 預測值溢位", period))
                    })?;

                Ok(ForecastPoint {
                    period,
                    actual_demand: None,
                    forecast_demand: Some(forecast),
                    seasonal_factor,
                    growth_factor,
                    confidence: Some(params.confidence_at(h)),
                })
            })
            .collect()
    }

    /// 以兩種模型評估同一序列
    ///
    /// 移動平均沿用設定的視窗（否則 3 期），指數平滑沿用設定的 α（否則 0.7）。
    pub fn compare(actuals: &[Decimal], configured: ForecastMethod) -> ForecastComparison {
        let (ma_method, es_method) = match configured {
            ForecastMethod::MovingAverage { .. } => {
                (configured, ForecastMethod::exponential_smoothing())
            }
            ForecastMethod::ExponentialSmoothing { .. } => {
                (ForecastMethod::moving_average(), configured)
            }
        };

        let evaluate = |method: ForecastMethod| {
            let fitted = Self::smooth(actuals, method).ok()?;
            let points: Vec<ForecastPoint> = actuals
                .iter()
                .zip(fitted)
                .map(|(actual, forecast)| ForecastPoint {
                    period: Default::default(),
                    actual_demand: Some(*actual),
                    forecast_demand: forecast,
                    seasonal_factor: Decimal::ONE,
                    growth_factor: Decimal::ONE,
                    confidence: None,
                })
                .collect();
            AccuracyMetrics::evaluate(&points).ok()
        };

        let moving_average = evaluate(ma_method);
        let exponential_smoothing = evaluate(es_method);

        let preferred = match (&moving_average, &exponential_smoothing) {
            (Some(ma), Some(es)) if ma.mad < es.mad => Some(ma_method),
            (Some(ma), Some(es)) if es.mad < ma.mad => Some(es_method),
            (Some(_), Some(_)) => Some(configured),
            (Some(_), None) => Some(ma_method),
            (None, Some(_)) => Some(es_method),
            (None, None) => None,
        };

        ForecastComparison {
            moving_average,
            exponential_smoothing,
            preferred,
        }
    }

    /// 計算準確度；資料退化時以空值代替並記錄警告
    fn evaluate_tolerant(
        points: &[ForecastPoint],
        warnings: &mut Vec<PlanWarning>,
    ) -> plan_core::Result<Option<AccuracyMetrics>> {
        match AccuracyMetrics::evaluate(points) {
            Ok(metrics) => Ok(Some(metrics)),
            Err(e @ (PlanError::DegenerateForecast(_) | PlanError::InsufficientData(_))) => {
                tracing::warn!("準確度指標無法計算：{}", e);
                warnings.push(PlanWarning::warning(STAGE, "metrics".to_string(), e.to_string()));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
