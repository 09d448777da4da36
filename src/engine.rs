//! 規劃引擎主流程

use plan_cache::{CacheStats, Fingerprint, PlanCache};
use plan_calc::{
    ClassSummary, Classifier, ForecastReport, Forecaster, LotSizer, PlanWarning, ProductionPlanner,
};
use plan_capacity::{CapacityPlanner, FinancialPlanner};
use plan_core::calendar::ensure_aligned;
use plan_core::{
    CapacityPlanEntry, CatalogItem, ClassificationEntry, EoqEntry, FinancialPlanEntry, Material,
    PlanError, PlanningParameters, ProductionPlanEntry, SalesRecord,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::summary::PlanSummary;

/// 規劃輸入（由呼叫端在執行前取得）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanInputs {
    pub catalog: Vec<CatalogItem>,

    /// 歷史銷售；為空時使用合成基準
    pub sales: Vec<SalesRecord>,

    /// 原物料（選用，供原物料 ABC 分析）
    pub materials: Vec<Material>,
}

impl PlanInputs {
    pub fn new(catalog: Vec<CatalogItem>) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    /// 建構器模式：設置歷史銷售
    pub fn with_sales(mut self, sales: Vec<SalesRecord>) -> Self {
        self.sales = sales;
        self
    }

    /// 建構器模式：設置原物料
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }
}

/// 一次規劃的完整結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanBundle {
    pub classification: Vec<ClassificationEntry>,
    pub class_summary: Vec<ClassSummary>,
    pub material_classification: Vec<ClassificationEntry>,
    pub eoq: Vec<EoqEntry>,
    /// 產品族經濟批量
    pub family_lot: Decimal,
    pub forecast: ForecastReport,
    pub production: Vec<ProductionPlanEntry>,
    pub capacity: Vec<CapacityPlanEntry>,
    pub financial: Vec<FinancialPlanEntry>,
    pub summary: PlanSummary,
    pub warnings: Vec<PlanWarning>,
}

/// 規劃引擎（無狀態，相同輸入必得相同輸出）
#[derive(Debug, Clone)]
pub struct PlanningEngine {
    params: PlanningParameters,
}

impl PlanningEngine {
    /// 創建引擎，參數在此一次檢查完畢
    pub fn new(params: PlanningParameters) -> plan_core::Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn parameters(&self) -> &PlanningParameters {
        &self.params
    }

    /// 檢查輸入資料
    pub fn validate_inputs(&self, inputs: &PlanInputs) -> plan_core::Result<()> {
        if inputs.catalog.is_empty() {
            return Err(PlanError::InsufficientData("商品目錄為空".to_string()));
        }
        for item in &inputs.catalog {
            item.validate()?;
        }
        for material in &inputs.materials {
            material.validate()?;
        }
        for record in &inputs.sales {
            if record.item_count < Decimal::ZERO {
                return Err(PlanError::invalid(
                    "sales.item_count",
                    format!("{} 的銷售件數不可為負", record.order_date),
                ));
            }
            if record.revenue < Decimal::ZERO {
                return Err(PlanError::invalid(
                    "sales.revenue",
                    format!("{} 的銷售金額不可為負", record.order_date),
                ));
            }
        }
        Ok(())
    }

    /// 主規劃入口
    ///
    /// 分類 → EOQ → 預測 → 生產 → 產能 → 財務，任何驗證錯誤都在計算前返回。
    pub fn run(&self, inputs: &PlanInputs) -> plan_core::Result<PlanBundle> {
        tracing::info!(
            "開始規劃計算：商品 {} 筆，銷售 {} 筆，原物料 {} 筆",
            inputs.catalog.len(),
            inputs.sales.len(),
            inputs.materials.len()
        );
        let start_time = std::time::Instant::now();

        self.validate_inputs(inputs)?;
        let params = &self.params;

        let catalog: Vec<CatalogItem> = inputs
            .catalog
            .iter()
            .map(|item| item.resolved(params.default_annual_demand))
            .collect();
        let mut warnings = Vec::new();

        // Step 1: ABC 分類
        tracing::debug!("Step 1: ABC 分類");
        let classification = Classifier::classify_non_empty(&catalog)?;
        let class_summary = Classifier::summarize(&classification);
        let material_classification = Classifier::classify(&inputs.materials)?;
        if !inputs.materials.is_empty() && material_classification.is_empty() {
            warnings.push(PlanWarning::warning(
                "classification",
                "materials".to_string(),
                "原物料總金額為 0，未產生分類".to_string(),
            ));
        }

        // Step 2: 經濟訂購量
        tracing::debug!("Step 2: EOQ");
        let eoq = LotSizer::size_all(&catalog, params)?;
        let family_lot = LotSizer::aggregate(&catalog, params)?;

        // Step 3: 需求預測
        tracing::debug!("Step 3: 需求預測");
        let forecast = Forecaster::forecast(&catalog, &inputs.sales, params)?;
        warnings.extend(forecast.warnings.iter().cloned());

        // Step 4: 生產計劃
        tracing::debug!("Step 4: 生產計劃");
        let production = ProductionPlanner::plan(&forecast.points, params, Some(family_lot))?;
        ensure_aligned(
            "production",
            forecast.points.iter().map(|p| p.period),
            production.iter().map(|p| p.period),
        )?;

        // Step 5: 產能計劃
        tracing::debug!("Step 5: 產能計劃");
        let capacity = CapacityPlanner::plan(&production, params)?;
        for entry in capacity.iter().filter(|c| c.overtime_hours > Decimal::ZERO) {
            warnings.push(PlanWarning::warning(
                "capacity",
                entry.period.label(),
                format!(
                    "需加班 {} 小時，建議追加 {} 班",
                    entry.overtime_hours.round_dp(1),
                    entry.additional_shifts_needed
                ),
            ));
        }

        // Step 6: 財務計劃
        tracing::debug!("Step 6: 財務計劃");
        let financial = FinancialPlanner::plan(&production, &capacity, params)?;
        warnings.extend(FinancialPlanner::warnings(&financial));

        let summary = PlanSummary::from_plans(&production, &capacity, &financial)?;

        tracing::info!("規劃計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "規劃期數: {}，總生產 {}，警告 {} 筆",
            production.len(),
            summary.total_production,
            warnings.len()
        );

        Ok(PlanBundle {
            classification,
            class_summary,
            material_classification,
            eoq,
            family_lot,
            forecast,
            production,
            capacity,
            financial,
            summary,
            warnings,
        })
    }
}

/// 帶記憶緩存的規劃器：輸入指紋不變時直接返回上次結果
#[derive(Debug, Clone)]
pub struct CachedPlanner {
    engine: PlanningEngine,
    cache: PlanCache<PlanBundle>,
}

impl CachedPlanner {
    pub fn new(params: PlanningParameters) -> plan_core::Result<Self> {
        Ok(Self {
            engine: PlanningEngine::new(params)?,
            cache: PlanCache::new(),
        })
    }

    /// 執行規劃（命中緩存時不重新計算）
    pub fn plan(&mut self, inputs: &PlanInputs) -> plan_core::Result<PlanBundle> {
        let fingerprint = Fingerprint::of_inputs(
            &inputs.catalog,
            &inputs.sales,
            &inputs.materials,
            self.engine.parameters(),
        )?;
        let engine = &self.engine;
        self.cache
            .get_or_try_compute(fingerprint, || engine.run(inputs))
    }

    /// 更換參數並清除緩存
    pub fn set_parameters(&mut self, params: PlanningParameters) -> plan_core::Result<()> {
        self.engine = PlanningEngine::new(params)?;
        if self.cache.is_warm() {
            tracing::debug!("參數變更，清除規劃緩存");
            self.cache.invalidate();
        }
        Ok(())
    }

    pub fn engine(&self) -> &PlanningEngine {
        &self.engine
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
