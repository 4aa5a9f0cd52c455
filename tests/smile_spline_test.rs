use fxlab::smile::{SmileQuotes, VolSpline};
use fxlab::{LocalStorage, RunSettings, SmileStudy, StudyEngine};
use tempfile::TempDir;

#[tokio::test]
async fn test_end_to_end_smile_study() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let extrap_factors = vec![0.01, 10.0];
    let curve_points = 50;

    let settings = RunSettings::new(output_path.clone(), 1, 42, 1);
    let storage = LocalStorage::new(output_path);
    let study = SmileStudy::new(
        storage,
        settings,
        SmileQuotes::default(),
        extrap_factors.clone(),
        curve_points,
    );

    StudyEngine::new(study).run().await.unwrap();

    let csv_path = temp_dir.path().join("smile-spline_results.csv");
    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), extrap_factors.len() * curve_points);

    for row in &rows {
        let vol: f64 = row[2].parse().unwrap();
        assert!(vol > 0.0 && vol < 1.0);
    }

    // The wide extrapolation factor covers a much larger strike range.
    let strike_span = |factor: &str| -> f64 {
        let strikes: Vec<f64> = rows
            .iter()
            .filter(|row| &row[0] == factor)
            .map(|row| row[1].parse().unwrap())
            .collect();
        strikes.last().unwrap() - strikes.first().unwrap()
    };
    assert!(strike_span("10") > strike_span("0.01") * 2.0);
}

#[test]
fn test_smile_curve_passes_through_quoted_vols() {
    let quotes = SmileQuotes::default();
    let strikes = quotes.strikes().unwrap();
    let vols = quotes.vols();

    let spline = VolSpline::fit(&strikes, &vols, quotes.texp, 3.0).unwrap();
    for (k, v) in strikes.iter().zip(vols.iter()) {
        assert!((spline.volatility(*k) - v).abs() < 1e-6);
    }

    // Positive risk reversals skew the smile towards the call wing.
    assert!(spline.volatility(strikes[4]) > spline.volatility(strikes[0]));
    assert!(spline.volatility(strikes[4]) > spline.volatility(quotes.atm_strike()));
}

#[tokio::test]
async fn test_smile_study_rejects_empty_factors() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let settings = RunSettings::new(output_path.clone(), 1, 42, 1);
    let storage = LocalStorage::new(output_path);
    let study = SmileStudy::new(storage, settings, SmileQuotes::default(), vec![], 50);

    assert!(StudyEngine::new(study).run().await.is_err());
}
