use std::ops::BitOr;

use thiserror::Error;

/// Standard measurement labels reported by the Go benchmark harness.
pub const NS_PER_OP_UNIT: &str = "ns/op";
pub const MB_PER_S_UNIT: &str = "MB/s";
pub const ALLOCED_BYTES_PER_OP_UNIT: &str = "B/op";
pub const ALLOCS_PER_OP_UNIT: &str = "allocs/op";

pub const STANDARD_UNITS: [&str; 4] = [
    NS_PER_OP_UNIT,
    MB_PER_S_UNIT,
    ALLOCED_BYTES_PER_OP_UNIT,
    ALLOCS_PER_OP_UNIT,
];

/// Set of standard measurements present on a [`BenchmarkRecord`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measured(u8);

impl Measured {
    pub const NONE: Self = Self(0);
    pub const NS_PER_OP: Self = Self(1 << 0);
    pub const MB_PER_S: Self = Self(1 << 1);
    pub const ALLOCED_BYTES_PER_OP: Self = Self(1 << 2);
    pub const ALLOCS_PER_OP: Self = Self(1 << 3);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl BitOr for Measured {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("two fields required, have {0}")]
    TooFewFields(usize),
    #[error("first field does not start with \"Benchmark\"")]
    NotABenchmark,
    #[error("invalid iteration count {0:?}")]
    InvalidIterations(String),
}

/// One parsed result line, e.g. `BenchmarkDecode-8   1000000   1042 ns/op   64 B/op`.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRecord {
    name: String,
    iterations: u64,
    measured: Measured,
    ns_per_op: f64,
    mb_per_s: f64,
    alloced_bytes_per_op: u64,
    allocs_per_op: u64,
}

impl BenchmarkRecord {
    /// Parse a benchmark result line.
    ///
    /// Fields are separated by any amount of whitespace. The name is kept verbatim,
    /// including its `-N` GOMAXPROCS suffix. Trailing `<value> <unit>` pairs with an
    /// unknown unit or an unparseable value are ignored.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 2 {
            return Err(RecordError::TooFewFields(fields.len()));
        }
        if !fields[0].starts_with("Benchmark") {
            return Err(RecordError::NotABenchmark);
        }
        let iterations = fields[1]
            .parse::<u64>()
            .map_err(|_| RecordError::InvalidIterations(fields[1].to_string()))?;

        let mut record = Self {
            name: fields[0].to_string(),
            iterations,
            measured: Measured::NONE,
            ns_per_op: 0.0,
            mb_per_s: 0.0,
            alloced_bytes_per_op: 0,
            allocs_per_op: 0,
        };
        for pair in fields[2..].chunks_exact(2) {
            record.parse_measurement(pair[0], pair[1]);
        }

        Ok(record)
    }

    fn parse_measurement(&mut self, quantity: &str, unit: &str) {
        match unit {
            NS_PER_OP_UNIT => {
                if let Ok(value) = quantity.parse() {
                    self.ns_per_op = value;
                    self.measured.insert(Measured::NS_PER_OP);
                }
            }
            MB_PER_S_UNIT => {
                if let Ok(value) = quantity.parse() {
                    self.mb_per_s = value;
                    self.measured.insert(Measured::MB_PER_S);
                }
            }
            ALLOCED_BYTES_PER_OP_UNIT => {
                if let Ok(value) = quantity.parse() {
                    self.alloced_bytes_per_op = value;
                    self.measured.insert(Measured::ALLOCED_BYTES_PER_OP);
                }
            }
            ALLOCS_PER_OP_UNIT => {
                if let Ok(value) = quantity.parse() {
                    self.allocs_per_op = value;
                    self.measured.insert(Measured::ALLOCS_PER_OP);
                }
            }
            _ => {}
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn ns_per_op(&self) -> Option<f64> {
        self.measured
            .contains(Measured::NS_PER_OP)
            .then_some(self.ns_per_op)
    }

    pub fn mb_per_s(&self) -> Option<f64> {
        self.measured
            .contains(Measured::MB_PER_S)
            .then_some(self.mb_per_s)
    }

    pub fn alloced_bytes_per_op(&self) -> Option<u64> {
        self.measured
            .contains(Measured::ALLOCED_BYTES_PER_OP)
            .then_some(self.alloced_bytes_per_op)
    }

    pub fn allocs_per_op(&self) -> Option<u64> {
        self.measured
            .contains(Measured::ALLOCS_PER_OP)
            .then_some(self.allocs_per_op)
    }
}

#[cfg(test)]
impl BenchmarkRecord {
    pub fn measured(&self) -> Measured {
        self.measured
    }
}
