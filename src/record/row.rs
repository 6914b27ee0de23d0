/// Throughput columns in fixed file order. A well-formed log file yields
/// exactly one value per column.
pub const THROUGHPUT_COLUMNS: [&str; 6] = [
    "write",
    "rewrite",
    "read",
    "reread",
    "randread",
    "randwrite",
];

/// The subset of columns that get plotted.
pub const PLOT_METRICS: [&str; 4] = ["write", "read", "randread", "randwrite"];

/// Column index of a named throughput metric.
pub fn metric_index(name: &str) -> Option<usize> {
    THROUGHPUT_COLUMNS.iter().position(|c| *c == name)
}

/// One benchmark run, identified by block size and thread count.
///
/// Parsed from archive member names like `iozone-r1024-t8.log`. Ordering is
/// (bs, threads) so tables iterate block-size-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunKey {
    /// I/O transfer unit size in KB.
    pub bs: u32,
    /// Concurrent worker threads.
    pub threads: u32,
}

/// One parsed log file.
///
/// `key` is `None` when the member name does not follow the naming
/// convention; such records carry throughput values but cannot be placed in
/// a table. `throughput` is in MB/s, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Archive member name the record came from.
    pub source: String,
    pub key: Option<RunKey>,
    pub throughput: Vec<f64>,
}

impl Record {
    /// True when the record can participate in aggregation: named run plus
    /// one value per throughput column.
    pub fn is_complete(&self) -> bool {
        self.key.is_some() && self.throughput.len() == THROUGHPUT_COLUMNS.len()
    }
}
