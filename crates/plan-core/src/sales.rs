//! 歷史銷售記錄模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::Period;

/// 銷售記錄（由銷售子系統提供，唯讀）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    /// 下單日期
    pub order_date: NaiveDate,

    /// 件數
    pub item_count: Decimal,

    /// 營收
    pub revenue: Decimal,
}

impl SalesRecord {
    /// 創建新的銷售記錄
    pub fn new(order_date: NaiveDate, item_count: Decimal, revenue: Decimal) -> Self {
        Self {
            order_date,
            item_count,
            revenue,
        }
    }

    /// 所屬月份期間
    pub fn period(&self) -> Period {
        Period::from_date(self.order_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sales_record() {
        let record = SalesRecord::new(
            NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            Decimal::from(3),
            Decimal::from(180),
        );

        assert_eq!(record.item_count, Decimal::from(3));
        assert_eq!(record.period(), Period::new(2025, 3).unwrap());
    }
}
