use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::utils::error::{LabError, Result};

/// One point of a study's scenario grid, e.g. a (tenor, strategy) pair or a
/// hedge policy. Parameters are kept as loose JSON values so the engine can
/// drive any study without knowing its parameter set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub label: String,
    pub params: HashMap<String, serde_json::Value>,
}

impl Scenario {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            params: HashMap::new(),
        }
    }

    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn param_f64(&self, key: &str) -> Result<f64> {
        self.params
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| LabError::SimulationError {
                message: format!("scenario '{}' has no numeric param '{}'", self.label, key),
            })
    }

    pub fn param_str(&self, key: &str) -> Result<&str> {
        self.params
            .get(key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| LabError::SimulationError {
                message: format!("scenario '{}' has no string param '{}'", self.label, key),
            })
    }
}

/// Tabular study results, written out as CSV.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.headers.len());
        self.rows.push(row);
    }
}

/// Everything a completed study hands to the reporting stage.
#[derive(Debug, Clone)]
pub struct StudyOutcome {
    pub study: String,
    pub table: ReportTable,
    pub summary: serde_json::Value,
}
