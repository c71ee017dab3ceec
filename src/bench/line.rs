use super::extra_metrics::{ExtraMetrics, parse_extra_metrics};
use super::record::BenchmarkRecord;

const PKG_PREFIX: &str = "pkg:";
const GOOS_PREFIX: &str = "goos:";
const GOARCH_PREFIX: &str = "goarch:";

/// A classified line of `go test -bench` output.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Pkg(String),
    Goos(String),
    Goarch(String),
    Benchmark {
        record: BenchmarkRecord,
        extra_metrics: Option<ExtraMetrics>,
    },
    /// Anything else: test logs, `PASS`, package summaries...
    Ignored,
}

impl Line {
    pub fn classify(line: &str) -> Self {
        if let Some(pkg) = line.strip_prefix(PKG_PREFIX) {
            return Line::Pkg(pkg.trim().to_string());
        }
        if let Some(goos) = line.strip_prefix(GOOS_PREFIX) {
            return Line::Goos(goos.trim().to_string());
        }
        if let Some(goarch) = line.strip_prefix(GOARCH_PREFIX) {
            return Line::Goarch(goarch.trim().to_string());
        }

        match BenchmarkRecord::parse(line) {
            Ok(record) => Line::Benchmark {
                record,
                extra_metrics: parse_extra_metrics(line),
            },
            Err(_) => Line::Ignored,
        }
    }
}

/// Package and platform declared by the most recent context lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunContext {
    pub pkg: String,
    pub goos: String,
    pub goarch: String,
}

impl RunContext {
    /// Apply a context line. Returns `false` for lines that do not carry context.
    pub fn update(&mut self, line: &Line) -> bool {
        match line {
            Line::Pkg(pkg) => self.pkg.clone_from(pkg),
            Line::Goos(goos) => self.goos.clone_from(goos),
            Line::Goarch(goarch) => self.goarch.clone_from(goarch),
            Line::Benchmark { .. } | Line::Ignored => return false,
        }
        true
    }
}
