pub mod quotes;
pub mod spline;

pub use quotes::SmileQuotes;
pub use spline::VolSpline;
