//! # Plan Core
//!
//! 庫存與生產規劃引擎的核心資料模型與類型定義

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod numeric;
pub mod plan;
pub mod sales;

// Re-export 主要類型
pub use calendar::Period;
pub use catalog::{CatalogItem, Material, Valued};
pub use config::{
    DataSourcePreference, ForecastMethod, LotSizePolicy, PlanningParameters, SeasonalProfile,
};
pub use plan::{
    AbcClass, CapacityPlanEntry, ClassificationEntry, DataSource, EoqEntry, FinancialPlanEntry,
    ForecastPoint, ProductionPlanEntry,
};
pub use sales::SalesRecord;

/// 規劃引擎錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanError {
    #[error("無效的參數 {field}: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("資料不足: {0}")]
    InsufficientData(String),

    #[error("預測退化: {0}")]
    DegenerateForecast(String),

    #[error("{stage} 階段期間不一致: {reason}")]
    PeriodMismatch { stage: String, reason: String },

    #[error("計算錯誤: {0}")]
    CalculationError(String),
}

impl PlanError {
    /// 建立參數錯誤
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// 建立期間不一致錯誤
    pub fn mismatch(stage: &str, reason: impl Into<String>) -> Self {
        Self::PeriodMismatch {
            stage: stage.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
