//! # Plan Cache
//!
//! 緩存模組：以輸入內容指紋記憶規劃結果

pub mod fingerprint;
pub mod memo;

// Re-export 主要類型
pub use fingerprint::Fingerprint;
pub use memo::{CacheStats, PlanCache};

/// 緩存錯誤
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("無法序列化輸入: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<CacheError> for plan_core::PlanError {
    fn from(err: CacheError) -> Self {
        plan_core::PlanError::CalculationError(err.to_string())
    }
}
