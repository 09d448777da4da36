//! 服飾訂製店規劃示例
//!
//! 商品目錄 + 一年半的銷售記錄 → 分類、EOQ、預測、生產、產能與財務計劃

use anyhow::Context;
use chrono::NaiveDate;
use plan::model::{CatalogItem, LotSizePolicy, Material, Period, SalesRecord};
use plan::{CachedPlanner, PlanInputs, PlanningParameters};
use rust_decimal::{Decimal, RoundingStrategy};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    println!("=== 服飾訂製店規劃示例 ===\n");

    // 1. 商品目錄（帽子沒有需求代理值，使用預設年需求）
    let catalog = vec![
        CatalogItem::new("HOODIE-001".to_string(), "Custom Hoodie".to_string(), "hoodies".to_string(), Decimal::from(55))
            .with_stock(Decimal::from(120))
            .with_demand_proxy(Decimal::from(1800)),
        CatalogItem::new("TEE-001".to_string(), "Custom Tee".to_string(), "shirts".to_string(), Decimal::from(25))
            .with_stock(Decimal::from(300))
            .with_demand_proxy(Decimal::from(4200)),
        CatalogItem::new("CAP-001".to_string(), "Embroidered Cap".to_string(), "hats".to_string(), Decimal::from(18)),
        CatalogItem::new("TOTE-001".to_string(), "Printed Tote".to_string(), "bags".to_string(), Decimal::from(12))
            .with_stock(Decimal::from(40))
            .with_demand_proxy(Decimal::from(600)),
    ];

    let materials = vec![
        Material::new("Cotton".to_string(), Decimal::from(3200), "kg".to_string(), Decimal::from(8)),
        Material::new("Ink".to_string(), Decimal::from(150), "l".to_string(), Decimal::from(30)),
        Material::new("Thread".to_string(), Decimal::from(900), "spool".to_string(), Decimal::from(2)),
    ];

    // 2. 2024-01 起 18 個月的銷售（每月兩筆訂單，年底旺季）
    let start = Period::new(2024, 1)?;
    let sales: Vec<SalesRecord> = (0..18)
        .flat_map(|m| {
            let period = start.advance(m);
            let base = 300 + 10 * m as i64 + if period.month >= 11 { 200 } else { 0 };
            [5u32, 20].into_iter().filter_map(move |day| {
                NaiveDate::from_ymd_opt(period.year, period.month, day).map(|date| {
                    let units = Decimal::from(base / 2);
                    SalesRecord::new(date, units, units * Decimal::from(45))
                })
            })
        })
        .collect();

    // 3. 參數：以產品族經濟批量生產
    let params = PlanningParameters::from_json(
        r#"{ "safety_stock": "150", "forecast_horizon": 6 }"#,
    )
    .context("參數解析失敗")?
    .with_lot_size_policy(LotSizePolicy::EconomicOrderQuantity);

    let inputs = PlanInputs::new(catalog)
        .with_sales(sales)
        .with_materials(materials);

    let mut planner = CachedPlanner::new(params)?;
    let bundle = planner.plan(&inputs)?;

    println!("ABC 分類:");
    for entry in &bundle.classification {
        println!(
            "  - {:<10} 年金額 {:>10} 累計 {:>6}% → {:?}",
            entry.identity,
            entry.annual_value.round_dp(0),
            entry.accumulated_percentage.round_dp(1),
            entry.class
        );
    }

    println!("\n原物料 ABC:");
    for entry in &bundle.material_classification {
        println!("  - {:<10} {:?}", entry.identity, entry.class);
    }

    println!("\nEOQ（產品族批量 {}）:", bundle.family_lot.round_dp(0));
    for entry in &bundle.eoq {
        println!(
            "  - {:<10} EOQ {:>5} 再訂購點 {:>4} 每 {:>3} 天下單{}",
            entry.item_id,
            entry.rounded_eoq(),
            entry.rounded_reorder_point(),
            entry.rounded_days_between_orders(),
            if entry.needs_reorder { "（需補貨）" } else { "" }
        );
    }

    println!(
        "\n預測（來源 {:?}，模型 {}）:",
        bundle.forecast.data_source,
        bundle.forecast.method.name()
    );
    if let Some(metrics) = &bundle.forecast.metrics {
        println!("  MAPE {}%，準確度 {}%", metrics.mape.round_dp(1), metrics.accuracy.round_dp(1));
    }

    println!("\n期間      需求   生產   期末庫存  利用率  加班   毛利率");
    for ((prod, cap), fin) in bundle
        .production
        .iter()
        .zip(&bundle.capacity)
        .zip(&bundle.financial)
    {
        println!(
            "  {}  {:>5}  {:>5}  {:>8}  {:>5}%  {:>5}  {}",
            prod.period,
            prod.demand.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
            prod.production,
            prod.ending_inventory.round_dp(0),
            cap.utilization_pct.round_dp(1),
            cap.overtime_hours.round_dp(1),
            fin.margin_pct
                .map(|m| format!("{}%", m.round_dp(1)))
                .unwrap_or_else(|| "-".to_string())
        );
    }

    let summary = &bundle.summary;
    println!("\n彙總:");
    println!("  總營收 {}", summary.total_revenue.round_dp(2));
    println!("  總成本 {}", summary.total_cost.round_dp(2));
    println!("  總利潤 {}", summary.total_profit.round_dp(2));
    println!("  總加班 {} 小時", summary.total_overtime_hours.round_dp(1));

    if !bundle.warnings.is_empty() {
        println!("\n警告:");
        for warning in &bundle.warnings {
            println!("  [{:?}] {}/{}: {}", warning.severity, warning.stage, warning.subject, warning.message);
        }
    }

    // 再次執行：輸入未變，直接命中緩存
    planner.plan(&inputs)?;
    println!("\n緩存統計: {:?}", planner.cache_stats());

    Ok(())
}
