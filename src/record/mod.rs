//! Per-file record parsing for iozone benchmark logs.

pub mod parse;
pub mod row;

pub use parse::{RecordPatterns, parse_record};
pub use row::{PLOT_METRICS, Record, RunKey, THROUGHPUT_COLUMNS, metric_index};
