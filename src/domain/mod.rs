// Domain layer: study models and ports shared by the engine and the
// concrete studies.

pub mod model;
pub mod ports;
