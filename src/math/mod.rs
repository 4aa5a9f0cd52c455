pub mod linear;
pub mod stats;

pub use linear::solve_dense;
pub use stats::RunningStats;
