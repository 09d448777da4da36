//! # Plan
//!
//! 庫存與生產規劃引擎：給定商品目錄、歷史銷售與規劃參數，產生可重現的規劃結果
//!
//! ```
//! use plan::{PlanInputs, PlanningEngine, PlanningParameters};
//! use plan::model::CatalogItem;
//! use rust_decimal::Decimal;
//!
//! let catalog = vec![CatalogItem::new(
//!     "TEE-001".to_string(),
//!     "Custom Tee".to_string(),
//!     "shirts".to_string(),
//!     Decimal::from(25),
//! )];
//!
//! let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();
//! let bundle = engine.run(&PlanInputs::new(catalog)).unwrap();
//! assert_eq!(bundle.classification.len(), 1);
//! ```

pub mod engine;
pub mod summary;

pub use plan_cache as cache;
pub use plan_calc as calc;
pub use plan_capacity as capacity;
pub use plan_core as model;

// Re-export 主要類型
pub use engine::{CachedPlanner, PlanBundle, PlanInputs, PlanningEngine};
pub use plan_core::{PlanError, PlanningParameters, Result};
pub use summary::PlanSummary;
