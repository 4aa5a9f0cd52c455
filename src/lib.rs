pub mod config;
pub mod core;
pub mod domain;
pub mod math;
pub mod sim;
pub mod smile;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, StudyCommand};

pub use config::{cli::LocalStorage, RunSettings};
pub use core::{DealerStudy, FactorStudy, SmileStudy, StudyEngine};
pub use utils::error::{LabError, Result};
