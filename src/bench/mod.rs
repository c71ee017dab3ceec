//! Parsing of `go test -bench` text output.

mod extra_metrics;
mod line;
mod record;

pub use extra_metrics::ExtraMetrics;
pub use line::{Line, RunContext};
pub use record::BenchmarkRecord;
