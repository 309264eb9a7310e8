mod metrics;
mod wrapper;

pub use metrics::TextMetrics;
pub use wrapper::break_lines;
