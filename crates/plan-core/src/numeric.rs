//! 溢位檢查的 Decimal 運算
//!
//! 通過驗證的輸入仍可能超出 Decimal 範圍（約 7.9e28），運算一律經此返回 `CalculationError`。

use rust_decimal::Decimal;

use crate::{PlanError, Result};

fn overflow(what: &str) -> PlanError {
    PlanError::CalculationError(format!("{} 超出數值範圍", what))
}

pub fn mul(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_mul(rhs).ok_or_else(|| overflow(what))
}

pub fn add(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_add(rhs).ok_or_else(|| overflow(what))
}

pub fn sub(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_sub(rhs).ok_or_else(|| overflow(what))
}

/// 除數為 0 同樣視為計算錯誤；允許為空的比率請直接用 `checked_div`
pub fn div(lhs: Decimal, rhs: Decimal, what: &str) -> Result<Decimal> {
    lhs.checked_div(rhs).ok_or_else(|| overflow(what))
}

/// 逐項累加
pub fn sum<I>(values: I, what: &str) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| add(acc, v, what))
}
