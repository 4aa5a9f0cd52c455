pub mod dealer;
pub mod factor;

pub use dealer::{simulate_paths, DealerParams, HedgePolicy};
pub use factor::{FactorMarket, HedgeStrategy};
