use crate::Result;
use crate::record::metric_index;
use crate::table::BenchTable;
use anyhow::bail;

/// One metric reshaped for a grouped bar chart: block sizes down the rows,
/// thread counts across the columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTable {
    pub metric: String,
    pub block_sizes: Vec<u32>,
    pub thread_counts: Vec<u32>,
    /// `values[row][col]`; `None` where the (bs, threads) run is absent.
    pub values: Vec<Vec<Option<f64>>>,
}

/// Pivot the table by block size x thread count for a single metric.
pub fn pivot(table: &BenchTable, metric: &str) -> Result<PivotTable> {
    let Some(col) = metric_index(metric) else {
        bail!("unknown metric {metric:?}");
    };

    let block_sizes = table.block_sizes();
    let thread_counts = table.thread_counts();

    let values = block_sizes
        .iter()
        .map(|&bs| {
            thread_counts
                .iter()
                .map(|&threads| {
                    table
                        .get(&crate::record::RunKey { bs, threads })
                        .map(|row| row[col])
                })
                .collect()
        })
        .collect();

    Ok(PivotTable {
        metric: metric.to_string(),
        block_sizes,
        thread_counts,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Record, RunKey};
    use crate::table::aggregate;
    use pretty_assertions::assert_eq;

    fn rec(bs: u32, threads: u32, write: f64) -> Record {
        Record {
            source: format!("iozone-r{bs}-t{threads}.log"),
            key: Some(RunKey { bs, threads }),
            throughput: vec![write, 0.0, 0.0, 0.0, 0.0, 0.0],
        }
    }

    #[test]
    fn pivot_lays_out_bs_rows_and_thread_columns() {
        let table = aggregate(&[vec![
            rec(128, 4, 10.0),
            rec(128, 8, 20.0),
            rec(1024, 8, 40.0),
        ]])
        .unwrap();

        let p = pivot(&table, "write").unwrap();
        assert_eq!(p.block_sizes, vec![128, 1024]);
        assert_eq!(p.thread_counts, vec![4, 8]);
        assert_eq!(
            p.values,
            vec![
                vec![Some(10.0), Some(20.0)],
                vec![None, Some(40.0)],
            ]
        );
    }

    #[test]
    fn unknown_metric_is_rejected() {
        let table = aggregate(&[vec![rec(128, 4, 1.0)]]).unwrap();
        assert!(pivot(&table, "latency").is_err());
    }
}
