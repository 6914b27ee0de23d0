//! Aggregation model: merge parsed records from one or more archives into a
//! single averaged table, keyed by (block size, thread count).

pub mod filter;
pub mod pivot;

pub use filter::FilterSpec;
pub use pivot::{PivotTable, pivot};

use crate::Result;
use crate::record::{PLOT_METRICS, Record, RunKey, THROUGHPUT_COLUMNS, metric_index};
use anyhow::bail;
use std::collections::BTreeMap;

/// Averaged throughput table. One row per run key, columns in
/// [`THROUGHPUT_COLUMNS`] order, values in MB/s rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchTable {
    rows: BTreeMap<RunKey, [f64; 6]>,
}

impl BenchTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &RunKey) -> Option<&[f64; 6]> {
        self.rows.get(key)
    }

    /// Rows in (bs, threads) order.
    pub fn iter(&self) -> impl Iterator<Item = (&RunKey, &[f64; 6])> {
        self.rows.iter()
    }

    /// Distinct block sizes, ascending.
    pub fn block_sizes(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self.rows.keys().map(|k| k.bs).collect();
        out.dedup();
        out
    }

    /// Distinct thread counts, ascending.
    pub fn thread_counts(&self) -> Vec<u32> {
        let mut out: Vec<u32> = self.rows.keys().map(|k| k.threads).collect();
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Rows matching the filter, as a new table.
    pub fn filtered(&self, filter: &FilterSpec) -> BenchTable {
        BenchTable {
            rows: self
                .rows
                .iter()
                .filter(|(key, _)| filter.matches(key))
                .map(|(key, values)| (*key, *values))
                .collect(),
        }
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Average records from one or more archives into a single table.
///
/// Rows are grouped by run key, so archives may enumerate their members in
/// any order. Records without a key, or with a throughput count other than
/// one per column, cannot be placed in the table; they are reported and
/// skipped. Zero usable rows is an error: callers must not proceed to
/// plotting.
pub fn aggregate(datasets: &[Vec<Record>]) -> Result<BenchTable> {
    let mut groups: BTreeMap<RunKey, Vec<[f64; 6]>> = BTreeMap::new();

    for records in datasets {
        for rec in records {
            let Some(key) = rec.key else {
                tracing::warn!("skipping {}: member name carries no run key", rec.source);
                continue;
            };
            if rec.throughput.len() != THROUGHPUT_COLUMNS.len() {
                tracing::warn!(
                    "skipping {}: expected {} throughput values, found {}",
                    rec.source,
                    THROUGHPUT_COLUMNS.len(),
                    rec.throughput.len()
                );
                continue;
            }
            let mut values = [0.0; 6];
            values.copy_from_slice(&rec.throughput);
            groups.entry(key).or_default().push(values);
        }
    }

    if groups.is_empty() {
        bail!("no input data");
    }

    let rows = groups
        .into_iter()
        .map(|(key, samples)| {
            let n = samples.len() as f64;
            let mut mean = [0.0; 6];
            for sample in &samples {
                for (acc, v) in mean.iter_mut().zip(sample) {
                    *acc += v;
                }
            }
            for v in &mut mean {
                *v = round2(*v / n);
            }
            (key, mean)
        })
        .collect();

    Ok(BenchTable { rows })
}

/// Combined-chart input: one row per (dataset, run) with the four plot
/// metrics, ordered by dataset label then run key.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonRow {
    pub label: String,
    pub key: RunKey,
    pub metrics: [f64; 4],
}

/// Reshape filtered per-dataset tables into combined-chart rows.
pub fn comparison(datasets: &[(String, BenchTable)]) -> Vec<ComparisonRow> {
    let metric_cols: Vec<usize> = PLOT_METRICS
        .iter()
        .map(|m| metric_index(m).expect("plot metric is a throughput column"))
        .collect();

    let mut out = Vec::new();
    for (label, table) in datasets {
        for (key, values) in table.iter() {
            let mut metrics = [0.0; 4];
            for (slot, &col) in metrics.iter_mut().zip(&metric_cols) {
                *slot = values[col];
            }
            out.push(ComparisonRow {
                label: label.clone(),
                key: *key,
                metrics,
            });
        }
    }
    out
}
