pub mod metric;
pub mod percentage;

pub use metric::{Metric, Unavailable};

/// Literal rendered wherever a metric is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";
