//! 集成測試

use chrono::NaiveDate;
use plan::calc::{Classifier, WarningSeverity};
use plan::model::{
    AbcClass, CatalogItem, DataSource, DataSourcePreference, Material, Period, PlanError,
    PlanningParameters, SalesRecord,
};
use plan::{CachedPlanner, PlanInputs, PlanningEngine};
use rstest::rstest;
use rust_decimal::Decimal;

fn item(id: &str, price: i64, demand: i64) -> CatalogItem {
    CatalogItem::new(
        id.to_string(),
        format!("Custom {}", id),
        "apparel".to_string(),
        Decimal::from(price),
    )
    .with_demand_proxy(Decimal::from(demand))
}

/// 2024 全年每月 100 件
fn flat_sales() -> Vec<SalesRecord> {
    (0..12)
        .map(|i| {
            let period = Period::new(2024, 1).unwrap().advance(i);
            SalesRecord::new(
                NaiveDate::from_ymd_opt(period.year, period.month, 10).unwrap(),
                Decimal::from(100),
                Decimal::from(4500),
            )
        })
        .collect()
}

#[test]
fn test_synthetic_pipeline() {
    // 場景：3 個商品年金額 8000 / 1500 / 500，沒有銷售資料
    let inputs = PlanInputs::new(vec![
        item("HOODIE", 80, 100),
        item("TEE", 15, 100),
        item("CAP", 5, 100),
    ]);
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();
    let bundle = engine.run(&inputs).unwrap();

    // 1. ABC 分類
    let classes: Vec<_> = bundle
        .classification
        .iter()
        .map(|e| (e.identity.as_str(), e.class))
        .collect();
    assert_eq!(
        classes,
        vec![("HOODIE", AbcClass::A), ("TEE", AbcClass::B), ("CAP", AbcClass::C)]
    );
    assert_eq!(bundle.class_summary.len(), 3);

    // 2. 每個商品都有 EOQ
    assert_eq!(bundle.eoq.len(), 3);
    assert!(bundle.eoq.iter().all(|e| e.eoq > Decimal::ZERO));

    // 3. 合成基準必須明確標示
    assert_eq!(bundle.forecast.data_source, DataSource::Synthetic);
    assert_eq!(bundle.forecast.baseline().count(), 12);
    assert_eq!(bundle.forecast.future().count(), 6);
    assert!(bundle
        .warnings
        .iter()
        .any(|w| w.stage == "forecast" && w.subject == "baseline"));

    // 4. 生產量都是批量倍數，期末庫存不為負
    for entry in &bundle.production {
        assert_eq!(entry.production % Decimal::from(10), Decimal::ZERO);
        assert!(entry.ending_inventory >= Decimal::ZERO);
    }

    // 5. 彙總與各期一致
    let revenue: Decimal = bundle.financial.iter().map(|f| f.revenue).sum();
    assert_eq!(bundle.summary.total_revenue, revenue);
    assert_eq!(
        bundle.summary.total_profit,
        bundle.summary.total_revenue - bundle.summary.total_cost
    );
}

#[test]
fn test_historical_pipeline() {
    let inputs = PlanInputs::new(vec![item("TEE", 25, 1200)]).with_sales(flat_sales());
    let params = PlanningParameters::default().with_data_source(DataSourcePreference::Historical);
    let engine = PlanningEngine::new(params).unwrap();
    let bundle = engine.run(&inputs).unwrap();

    assert_eq!(bundle.forecast.data_source, DataSource::Historical);

    // 穩定序列：指數平滑完全吻合
    let metrics = bundle.forecast.metrics.as_ref().unwrap();
    assert_eq!(metrics.mad, Decimal::ZERO);
    assert_eq!(metrics.accuracy, Decimal::ONE_HUNDRED);

    // 2025-01：100 × 1.0（一月季節係數）× 1.02
    let first_future = bundle.forecast.future().next().unwrap();
    assert_eq!(first_future.period, Period::new(2025, 1).unwrap());
    assert_eq!(first_future.forecast_demand, Some(Decimal::from(102)));
    assert_eq!(first_future.confidence, Some(Decimal::from(95)));

    // 期初庫存 500、安全庫存 100：前 4 期不需生產
    let productions: Vec<_> = bundle.production.iter().take(5).map(|p| p.production).collect();
    assert_eq!(
        productions,
        vec![
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::ZERO,
            Decimal::from(100)
        ]
    );

    // 每期 50 工時，遠低於 149.6 可用工時
    assert!(bundle
        .capacity
        .iter()
        .take(12)
        .all(|c| c.overtime_hours == Decimal::ZERO && c.additional_shifts_needed == 0));
}

#[test]
fn test_historical_without_sales_fails() {
    let params = PlanningParameters::default().with_data_source(DataSourcePreference::Historical);
    let engine = PlanningEngine::new(params).unwrap();

    let result = engine.run(&PlanInputs::new(vec![item("TEE", 25, 1200)]));
    assert!(matches!(result, Err(PlanError::InsufficientData(_))));
}

#[test]
fn test_deterministic_output() {
    let inputs = PlanInputs::new(vec![item("HOODIE", 45, 600), item("TEE", 25, 0)])
        .with_sales(flat_sales());
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();

    let first = engine.run(&inputs).unwrap();
    let second = engine.run(&inputs).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_validation_fails_before_any_stage() {
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();

    // 一個無效商品就整體失敗，不產生部分結果
    let inputs = PlanInputs::new(vec![item("TEE", 25, 1200), item("BAD", 0, 100)]);
    match engine.run(&inputs) {
        Err(PlanError::InvalidParameter { field, .. }) => assert_eq!(field, "catalog.unit_price"),
        other => panic!("expected InvalidParameter, got {:?}", other),
    }

    let params = PlanningParameters::default().with_order_costs(Decimal::from(90), Decimal::ZERO);
    assert!(matches!(
        PlanningEngine::new(params),
        Err(PlanError::InvalidParameter { .. })
    ));
}

#[test]
fn test_zero_value_classification() {
    let materials = vec![
        Material::new("Cotton".to_string(), Decimal::ZERO, "kg".to_string(), Decimal::from(8)),
        Material::new("Ink".to_string(), Decimal::ZERO, "l".to_string(), Decimal::from(30)),
    ];

    assert!(matches!(
        Classifier::classify_non_empty(&materials),
        Err(PlanError::InsufficientData(_))
    ));

    // 在完整流程中只產生警告
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();
    let bundle = engine
        .run(&PlanInputs::new(vec![item("TEE", 25, 1200)]).with_materials(materials))
        .unwrap();
    assert!(bundle.material_classification.is_empty());
    assert!(bundle
        .warnings
        .iter()
        .any(|w| w.subject == "materials" && w.severity == WarningSeverity::Warning));
}

// 通過驗證但超出 Decimal 範圍的輸入：返回錯誤而非中止程序
#[rstest]
#[case::annual_value(1_000_000_000_000_000, 1_000_000_000_000_000)]
#[case::forecast_error_squares(10, 10_000_000_000_000_000)]
fn test_oversized_inputs_return_calculation_error(#[case] price: i64, #[case] demand: i64) {
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();
    let inputs = PlanInputs::new(vec![item("HUGE", price, demand)]);

    assert!(engine.validate_inputs(&inputs).is_ok());
    assert!(matches!(
        engine.run(&inputs),
        Err(PlanError::CalculationError(_))
    ));
}

#[test]
fn test_negative_sales_revenue_rejected() {
    let mut sales = flat_sales();
    sales[3].revenue = Decimal::from(-4500);
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();

    match engine.run(&PlanInputs::new(vec![item("TEE", 25, 1200)]).with_sales(sales)) {
        Err(PlanError::InvalidParameter { field, .. }) => assert_eq!(field, "sales.revenue"),
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn test_overtime_surfaces_as_warning() {
    // 需求遠超過產能
    let inputs = PlanInputs::new(vec![item("HOODIE", 45, 24000)]);
    let engine = PlanningEngine::new(PlanningParameters::default()).unwrap();
    let bundle = engine.run(&inputs).unwrap();

    assert!(bundle.summary.total_overtime_hours > Decimal::ZERO);
    assert_eq!(bundle.summary.peak_utilization, Decimal::ONE_HUNDRED);
    assert!(bundle.capacity.iter().any(|c| c.additional_shifts_needed > 0));
    assert!(bundle.warnings.iter().any(|w| w.stage == "capacity"));
}

#[test]
fn test_cached_planner_recomputes_on_change() {
    let mut planner = CachedPlanner::new(PlanningParameters::default()).unwrap();
    let inputs = PlanInputs::new(vec![item("TEE", 25, 1200)]);

    let first = planner.plan(&inputs).unwrap();
    let _ = planner.plan(&inputs).unwrap();
    assert_eq!(planner.cache_stats().hits, 1);

    let changed = PlanInputs::new(vec![item("TEE", 25, 1200).with_stock(Decimal::from(500))]);
    let second = planner.plan(&changed).unwrap();
    assert_eq!(planner.cache_stats().misses, 2);
    assert_ne!(first.eoq[0].needs_reorder, second.eoq[0].needs_reorder);
}

#[rstest]
#[case::auto_with_sales(DataSourcePreference::Auto, true, DataSource::Historical)]
#[case::auto_without_sales(DataSourcePreference::Auto, false, DataSource::Synthetic)]
#[case::forced_synthetic(DataSourcePreference::Synthetic, true, DataSource::Synthetic)]
#[case::forced_historical(DataSourcePreference::Historical, true, DataSource::Historical)]
fn test_data_source_selection(
    #[case] preference: DataSourcePreference,
    #[case] with_sales: bool,
    #[case] expected: DataSource,
) {
    let mut inputs = PlanInputs::new(vec![item("TEE", 25, 1200)]);
    if with_sales {
        inputs = inputs.with_sales(flat_sales());
    }
    let engine =
        PlanningEngine::new(PlanningParameters::default().with_data_source(preference)).unwrap();

    assert_eq!(engine.run(&inputs).unwrap().forecast.data_source, expected);
}

#[test]
fn test_bundle_exports_as_json() {
    // 全年零銷售：營收為 0 的期間毛利率輸出為 null，不會出現 NaN
    let sales: Vec<SalesRecord> = flat_sales()
        .into_iter()
        .map(|r| SalesRecord::new(r.order_date, Decimal::ZERO, Decimal::ZERO))
        .collect();
    let params = PlanningParameters::default().with_growth_rate(Decimal::ZERO);
    let engine = PlanningEngine::new(params).unwrap();
    let bundle = engine
        .run(&PlanInputs::new(vec![item("TEE", 25, 1200)]).with_sales(sales))
        .unwrap();

    assert!(bundle.forecast.metrics.is_none());
    assert!(bundle.financial.iter().all(|f| f.margin_pct.is_none()));
    assert_eq!(bundle.summary.average_margin, None);

    let json = serde_json::to_value(&bundle).unwrap();
    assert_eq!(json["forecast"]["data_source"], "historical");
    assert!(json["financial"][0]["margin_pct"].is_null());
    assert!(!json.to_string().contains("NaN"));
}
