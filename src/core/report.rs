use chrono::Utc;

use crate::core::{Storage, StudyOutcome};
use crate::utils::error::{LabError, Result};

/// Writes a study outcome through the storage port: the results table as
/// `<study>_results.csv` and a JSON summary as `<study>_summary.json`.
/// Returns the path of the CSV under the configured output directory.
pub async fn write_outcome<S: Storage>(
    storage: &S,
    output_path: &str,
    outcome: &StudyOutcome,
) -> Result<String> {
    let csv_name = format!("{}_results.csv", outcome.study);
    let json_name = format!("{}_summary.json", outcome.study);

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&outcome.table.headers)?;
    for row in &outcome.table.rows {
        writer.write_record(row)?;
    }
    let csv_data = writer
        .into_inner()
        .map_err(|e| LabError::ReportError {
            message: format!("could not finalize CSV buffer: {}", e),
        })?;

    tracing::debug!("Writing {} ({} rows)", csv_name, outcome.table.rows.len());
    storage.write_file(&csv_name, &csv_data).await?;

    let summary = serde_json::json!({
        "study": outcome.study,
        "generated_at": Utc::now().to_rfc3339(),
        "fxlab_version": env!("CARGO_PKG_VERSION"),
        "rows": outcome.table.rows.len(),
        "summary": outcome.summary,
    });
    storage
        .write_file(&json_name, &serde_json::to_vec_pretty(&summary)?)
        .await?;

    Ok(format!("{}/{}", output_path, csv_name))
}
