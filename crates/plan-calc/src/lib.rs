//! # Plan Calculation Engine
//!
//! 需求面計算：ABC 分類、經濟訂購量、需求預測、生產計劃

pub mod accuracy;
pub mod bucketing;
pub mod classification;
pub mod forecasting;
pub mod lot_sizing;
pub mod netting;

// Re-export 主要類型
pub use accuracy::AccuracyMetrics;
pub use bucketing::{MonthlyBucket, SalesBucketer};
pub use classification::{ClassSummary, Classifier};
pub use forecasting::{ForecastComparison, ForecastReport, Forecaster};
pub use lot_sizing::LotSizer;
pub use netting::ProductionPlanner;

use serde::{Deserialize, Serialize};

/// 規劃警告（局部容忍的退化情況）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanWarning {
    /// 發生的階段
    pub stage: String,
    /// 相關對象（期間、商品ID等）
    pub subject: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl PlanWarning {
    pub fn new(stage: &str, subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            stage: stage.to_string(),
            subject,
            message,
            severity,
        }
    }

    pub fn info(stage: &str, subject: String, message: String) -> Self {
        Self::new(stage, subject, message, WarningSeverity::Info)
    }

    pub fn warning(stage: &str, subject: String, message: String) -> Self {
        Self::new(stage, subject, message, WarningSeverity::Warning)
    }
}

/// 無法容忍的情況一律以 `PlanError` 返回，不會出現在警告中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
