use std::collections::HashMap;

use fxlab::sim::factor::{FactorMarket, HedgeStrategy};
use fxlab::{FactorStudy, LocalStorage, RunSettings, StudyEngine};
use tempfile::TempDir;

async fn run_study(tenors: Vec<f64>, runs: usize) -> (TempDir, Vec<csv::StringRecord>) {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let settings = RunSettings::new(output_path.clone(), runs, 42, 1);
    let storage = LocalStorage::new(output_path);
    let study = FactorStudy::new(
        storage,
        settings,
        FactorMarket::default(),
        tenors,
        FactorStudy::<LocalStorage, RunSettings>::all_strategies(),
    );

    StudyEngine::new(study).run().await.unwrap();

    let csv_path = temp_dir.path().join("factor-hedging_results.csv");
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows = reader.records().map(|r| r.unwrap()).collect();
    (temp_dir, rows)
}

#[tokio::test]
async fn test_factor_hedging_reduces_pnl_std_most() {
    let (_dir, rows) = run_study(vec![0.5], 20_000).await;
    assert_eq!(rows.len(), 3);

    let mut std_by_strategy: HashMap<String, f64> = HashMap::new();
    for row in &rows {
        std_by_strategy.insert(row[1].to_string(), row[4].parse().unwrap());
    }

    let none = std_by_strategy["none"];
    let triangle = std_by_strategy["triangle"];
    let factor = std_by_strategy["factor"];

    // The course result: hedging on the true factor shocks beats the ad hoc
    // triangle shocks, and both beat leaving the forward unhedged.
    assert!(factor < triangle, "factor {} !< triangle {}", factor, triangle);
    assert!(triangle < none, "triangle {} !< none {}", triangle, none);
}

#[tokio::test]
async fn test_tenor_grid_produces_full_table() {
    let tenors = vec![0.1, 0.25, 0.5, 0.75, 1.0, 2.0];
    let (_dir, rows) = run_study(tenors.clone(), 2_000).await;
    assert_eq!(rows.len(), tenors.len() * 3);

    // Every row carries a non-negative std and finite notionals.
    for row in &rows {
        let n1: f64 = row[2].parse().unwrap();
        let n2: f64 = row[3].parse().unwrap();
        let std_bp: f64 = row[4].parse().unwrap();
        assert!(n1.is_finite() && n2.is_finite());
        assert!(std_bp >= 0.0);
    }
}

#[test]
fn test_triangle_and_factor_agree_at_the_first_benchmark() {
    // Hedging a forward at exactly t1: both strategies put the whole hedge
    // on the first benchmark with the same discounting, so the notionals
    // coincide.
    let market = FactorMarket::default();
    let (tri_n1, tri_n2) = market.hedge_notionals(market.t1, HedgeStrategy::Triangle);
    let (fac_n1, fac_n2) = market.hedge_notionals(market.t1, HedgeStrategy::Factor);
    assert!((tri_n1 - fac_n1).abs() < 1e-12);
    assert!((tri_n2 - fac_n2).abs() < 1e-12);
}
