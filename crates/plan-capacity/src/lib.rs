//! # Plan Capacity
//!
//! 資源面計算模組（人工產能、成本與毛利）

pub mod capacity;
pub mod costing;

// Re-export 主要類型
pub use capacity::CapacityPlanner;
pub use costing::FinancialPlanner;
