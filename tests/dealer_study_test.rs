use fxlab::sim::dealer::{DealerParams, HedgePolicy};
use fxlab::{DealerStudy, LocalStorage, RunSettings, StudyEngine};
use tempfile::TempDir;

fn small_params() -> DealerParams {
    DealerParams {
        steps: 100,
        ..DealerParams::default()
    }
}

#[tokio::test]
async fn test_end_to_end_dealer_study() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let settings = RunSettings::new(output_path.clone(), 500, 42, 1);
    let storage = LocalStorage::new(output_path.clone());
    let study = DealerStudy::new(
        storage,
        settings,
        small_params(),
        vec![HedgePolicy::Full, HedgePolicy::ToLimit],
    );

    let engine = StudyEngine::new_with_monitoring(study, false);
    let result = engine.run().await;
    assert!(result.is_ok());

    let csv_path = temp_dir.path().join("dealer-hedging_results.csv");
    assert!(csv_path.exists());

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["policy", "runs", "pnl_mean_bp", "pnl_std_bp", "sharpe"]
    );

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "full");
    assert_eq!(&rows[1][0], "to-limit");

    for row in &rows {
        assert_eq!(&row[1], "500");
        let std_bp: f64 = row[3].parse().unwrap();
        assert!(std_bp > 0.0);
    }

    let summary_path = temp_dir.path().join("dealer-hedging_summary.json");
    let summary: serde_json::Value =
        serde_json::from_slice(&std::fs::read(summary_path).unwrap()).unwrap();
    assert_eq!(summary["study"], "dealer-hedging");
    assert_eq!(summary["rows"], 2);
    assert_eq!(summary["summary"]["runs"], 500);
}

#[tokio::test]
async fn test_dealer_study_is_deterministic() {
    async fn run_once(dir: &TempDir) -> String {
        let output_path = dir.path().to_str().unwrap().to_string();
        let settings = RunSettings::new(output_path.clone(), 300, 7, 2);
        let storage = LocalStorage::new(output_path);
        let study = DealerStudy::new(storage, settings, small_params(), vec![HedgePolicy::Full]);
        StudyEngine::new(study).run().await.unwrap();
        let csv_path = dir.path().join("dealer-hedging_results.csv");
        std::fs::read_to_string(csv_path).unwrap()
    }

    let dir_a = TempDir::new().unwrap();
    let dir_b = TempDir::new().unwrap();
    let a = run_once(&dir_a).await;
    let b = run_once(&dir_b).await;
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_dealer_study_rejects_empty_policies() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let settings = RunSettings::new(output_path.clone(), 100, 1, 1);
    let storage = LocalStorage::new(output_path);
    let study = DealerStudy::new(storage, settings, small_params(), vec![]);

    let result = StudyEngine::new(study).run().await;
    assert!(result.is_err());
}
