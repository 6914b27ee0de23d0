use crate::Result;
use crate::record::{PLOT_METRICS, metric_index};
use crate::table::BenchTable;
use anyhow::Context;
use chrono::Local;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Dump averaged tables as plain text: a date-stamped header line per
/// dataset, then one row per run with the plotted metric columns.
pub fn dump_tables(path: &Path, datasets: &[(String, BenchTable)]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("create dump file {}", path.display()))?;
    let now = Local::now().format("%Y-%m-%d %H:%M:%S");

    let cols: Vec<usize> = PLOT_METRICS
        .iter()
        .map(|m| metric_index(m).expect("plot metric is a throughput column"))
        .collect();

    for (label, table) in datasets {
        writeln!(file, "{label} {now}")?;
        write!(file, "{:>6} {:>6}", "bs", "thread")?;
        for metric in PLOT_METRICS {
            write!(file, " {metric:>10}")?;
        }
        writeln!(file)?;
        for (key, values) in table.iter() {
            write!(file, "{:>6} {:>6}", key.bs, key.threads)?;
            for &col in &cols {
                write!(file, " {:>10.2}", values[col])?;
            }
            writeln!(file)?;
        }
        writeln!(file)?;
    }

    tracing::info!("wrote {}", path.display());
    Ok(())
}
