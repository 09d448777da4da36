//! 輸入內容指紋

use plan_core::{CatalogItem, Material, PlanningParameters, SalesRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::CacheError;

/// 指紋命名空間
const NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_0c3a_4b7e_4f21_9a55_3c2e_8b10_d4e7);

/// 輸入內容指紋（UUID v5，相同內容必得相同指紋）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(Uuid);

impl Fingerprint {
    /// 計算任意可序列化值的指紋
    pub fn of<T: Serialize + ?Sized>(value: &T) -> Result<Self, CacheError> {
        let bytes = serde_json::to_vec(value)?;
        Ok(Self(Uuid::new_v5(&NAMESPACE, &bytes)))
    }

    /// 計算規劃輸入（商品、銷售、原物料、參數）的指紋
    pub fn of_inputs(
        catalog: &[CatalogItem],
        sales: &[SalesRecord],
        materials: &[Material],
        params: &PlanningParameters,
    ) -> Result<Self, CacheError> {
        Self::of(&(catalog, sales, materials, params))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
