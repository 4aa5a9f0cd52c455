pub mod dealer_study;
pub mod engine;
pub mod factor_study;
pub mod report;
pub mod smile_study;

pub use crate::domain::model::{ReportTable, Scenario, StudyOutcome};
pub use crate::domain::ports::{SimConfigProvider, Storage, Study};
pub use crate::utils::error::Result;

pub use dealer_study::DealerStudy;
pub use engine::StudyEngine;
pub use factor_study::FactorStudy;
pub use smile_study::SmileStudy;
