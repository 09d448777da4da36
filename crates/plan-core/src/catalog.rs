//! 商品目錄與原物料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// ABC 分類所需的共同能力：識別、年用量、單價
pub trait Valued {
    /// 識別碼
    fn identity(&self) -> &str;

    /// 年用量
    fn annual_quantity(&self) -> Decimal;

    /// 單價
    fn unit_price(&self) -> Decimal;

    /// 年消耗金額 = 年用量 × 單價
    fn annual_value(&self) -> Result<Decimal> {
        crate::numeric::mul(
            self.annual_quantity(),
            self.unit_price(),
            &format!("{} 年消耗金額", self.identity()),
        )
    }
}

/// 商品目錄項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// 商品ID
    pub id: String,

    /// 名稱
    pub name: String,

    /// 分類
    pub category: String,

    /// 單價（> 0）
    pub unit_price: Decimal,

    /// 現有庫存（≥ 0）
    pub on_hand_stock: Decimal,

    /// 年需求代理值（評論數或明確需求欄位；0 表示缺失）
    pub annual_demand_proxy: Decimal,
}

impl CatalogItem {
    /// 創建新的商品
    pub fn new(id: String, name: String, category: String, unit_price: Decimal) -> Self {
        Self {
            id,
            name,
            category,
            unit_price,
            on_hand_stock: Decimal::ZERO,
            annual_demand_proxy: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置現有庫存
    pub fn with_stock(mut self, stock: Decimal) -> Self {
        self.on_hand_stock = stock;
        self
    }

    /// 建構器模式：設置年需求代理值
    pub fn with_demand_proxy(mut self, demand: Decimal) -> Self {
        self.annual_demand_proxy = demand;
        self
    }

    /// 有效年需求：代理值 ≤ 0 時退回預設值
    pub fn effective_annual_demand(&self, fallback: Decimal) -> Decimal {
        if self.annual_demand_proxy > Decimal::ZERO {
            self.annual_demand_proxy
        } else {
            fallback
        }
    }

    /// 產生套用需求預設值後的新項目（不修改原項目）
    pub fn resolved(&self, fallback: Decimal) -> Self {
        Self {
            annual_demand_proxy: self.effective_annual_demand(fallback),
            ..self.clone()
        }
    }

    /// 檢查商品資料
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PlanError::invalid("catalog.id", "商品ID不可為空"));
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "catalog.unit_price",
                format!("商品 {} 單價必須大於 0，實際為 {}", self.id, self.unit_price),
            ));
        }
        if self.on_hand_stock < Decimal::ZERO {
            return Err(PlanError::invalid(
                "catalog.on_hand_stock",
                format!("商品 {} 庫存不可為負：{}", self.id, self.on_hand_stock),
            ));
        }
        if self.annual_demand_proxy < Decimal::ZERO {
            return Err(PlanError::invalid(
                "catalog.annual_demand_proxy",
                format!("商品 {} 需求代理值不可為負：{}", self.id, self.annual_demand_proxy),
            ));
        }
        Ok(())
    }
}

impl Valued for CatalogItem {
    fn identity(&self) -> &str {
        &self.id
    }

    fn annual_quantity(&self) -> Decimal {
        self.annual_demand_proxy
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

/// 原物料（與商品平行，用於原物料 ABC 分析）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 名稱
    pub name: String,

    /// 年用量（≥ 0）
    pub annual_quantity: Decimal,

    /// 單位（如 碼、件、捲）
    pub unit: String,

    /// 單價（> 0）
    pub unit_price: Decimal,
}

impl Material {
    /// 創建新的原物料
    pub fn new(name: String, annual_quantity: Decimal, unit: String, unit_price: Decimal) -> Self {
        Self {
            name,
            annual_quantity,
            unit,
            unit_price,
        }
    }

    /// 檢查原物料資料
    pub fn validate(&self) -> Result<()> {
        if self.annual_quantity < Decimal::ZERO {
            return Err(PlanError::invalid(
                "material.annual_quantity",
                format!("原物料 {} 年用量不可為負", self.name),
            ));
        }
        if self.unit_price <= Decimal::ZERO {
            return Err(PlanError::invalid(
                "material.unit_price",
                format!("原物料 {} 單價必須大於 0", self.name),
            ));
        }
        Ok(())
    }
}

impl Valued for Material {
    fn identity(&self) -> &str {
        &self.name
    }

    fn annual_quantity(&self) -> Decimal {
        self.annual_quantity
    }

    fn unit_price(&self) -> Decimal {
        self.unit_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> CatalogItem {
        CatalogItem::new(
            "TEE-001".to_string(),
            "Custom Tee".to_string(),
            "shirts".to_string(),
            Decimal::from(25),
        )
    }

    #[test]
    fn test_create_catalog_item() {
        let item = shirt()
            .with_stock(Decimal::from(40))
            .with_demand_proxy(Decimal::from(1200));

        assert_eq!(item.id, "TEE-001");
        assert_eq!(item.on_hand_stock, Decimal::from(40));
        assert_eq!(item.annual_value().unwrap(), Decimal::from(30000));
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_demand_fallback() {
        let item = shirt();
        let fallback = Decimal::from(2400);

        assert_eq!(item.effective_annual_demand(fallback), fallback);

        let resolved = item.resolved(fallback);
        assert_eq!(resolved.annual_demand_proxy, fallback);
        // 原項目不變
        assert_eq!(item.annual_demand_proxy, Decimal::ZERO);

        let explicit = shirt().with_demand_proxy(Decimal::from(300));
        assert_eq!(explicit.effective_annual_demand(fallback), Decimal::from(300));
    }

    #[test]
    fn test_invalid_catalog_item() {
        let mut item = shirt();
        item.unit_price = Decimal::ZERO;
        assert!(matches!(
            item.validate(),
            Err(PlanError::InvalidParameter { .. })
        ));

        let negative_stock = shirt().with_stock(Decimal::from(-1));
        assert!(negative_stock.validate().is_err());

        let mut blank = shirt();
        blank.id = "  ".to_string();
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_material_valued() {
        let denim = Material::new(
            "Denim".to_string(),
            Decimal::from(500),
            "yard".to_string(),
            Decimal::from(8),
        );

        assert_eq!(denim.identity(), "Denim");
        assert_eq!(denim.annual_value().unwrap(), Decimal::from(4000));
        assert!(denim.validate().is_ok());
    }

    #[test]
    fn test_annual_value_overflow() {
        let item = CatalogItem::new(
            "BIG".to_string(),
            "Big".to_string(),
            "misc".to_string(),
            Decimal::from(1_000_000_000_000_000i64),
        )
        .with_demand_proxy(Decimal::from(1_000_000_000_000_000i64));

        assert!(item.validate().is_ok());
        assert!(matches!(
            item.annual_value(),
            Err(PlanError::CalculationError(_))
        ));
    }
}
