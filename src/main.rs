use clap::Parser;
use std::path::{Path, PathBuf};

mod config;
mod fetch;
mod record;
mod render;
mod table;

use config::Config;
use record::RecordPatterns;
use table::{BenchTable, ComparisonRow, FilterSpec};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "iozone-viz")]
#[command(about = "IOzone benchmark throughput visualizer", long_about = None)]
struct Cli {
    /// Extra diagnostics; also opens rendered charts in the image viewer.
    #[arg(short, long)]
    verbose: bool,

    /// Archive name to merge; repeat to merge several (merge mode).
    #[arg(short = 'f', long = "zfile")]
    zfile: Vec<String>,

    /// Dump the grouped mean tables to this file instead of plotting.
    #[arg(short = 'd', long = "file")]
    file: Option<PathBuf>,

    /// Merge mode only: plot each metric as a separate chart.
    #[arg(short = 'p', long = "sparate")]
    sparate: bool,

    /// Thread filter 1~16; repeatable.
    #[arg(short = 't', long = "thread")]
    thread: Vec<u32>,

    /// Block size filter 4~2048; repeatable.
    #[arg(short = 's', long = "bs")]
    bs: Vec<u32>,

    /// Base URL benchmark archives are fetched from.
    #[arg(long)]
    url: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::default();
    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    let patterns = RecordPatterns::new()?;

    if !cli.zfile.is_empty() {
        return merge_mode(&cli, &config, &patterns);
    }
    comparison_mode(&cli, &config, &patterns)
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Fetch each archive, parse its members, and average everything into one
/// table. Unreachable or unreadable archives are skipped; zero usable rows
/// is an error.
fn load_dataset(urls: &[String], config: &Config, patterns: &RecordPatterns) -> Result<BenchTable> {
    let mut datasets = Vec::new();
    for url in urls {
        let entries = match fetch::fetch_dataset(url, config) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!("skipping {url}: {err:#}");
                continue;
            }
        };
        let records: Vec<record::Record> = entries
            .iter()
            .map(|e| record::parse_record(&e.name, &e.content, patterns))
            .collect();
        tracing::debug!(
            "{url}: {} log files, {} complete records",
            entries.len(),
            records.iter().filter(|r| r.is_complete()).count()
        );
        datasets.push(records);
    }
    let table = table::aggregate(&datasets)?;
    tracing::debug!("aggregated {} rows", table.len());
    Ok(table)
}

/// Merge the named archives into one averaged table and plot it: one chart
/// per metric with `--sparate`, a single combined chart otherwise.
fn merge_mode(cli: &Cli, config: &Config, patterns: &RecordPatterns) -> Result<()> {
    let urls: Vec<String> = cli.zfile.iter().map(|z| config.archive_url(z)).collect();
    let merged = load_dataset(&urls, config, patterns)?;
    let name = archive_stem(&cli.zfile[0]);

    if cli.sparate {
        for metric in record::PLOT_METRICS {
            let p = table::pivot(&merged, metric)?;
            let title = format!("{name} {metric} perftest");
            let path = PathBuf::from(&name).join(format!("{title}.png"));
            let groups: Vec<String> = p.block_sizes.iter().map(u32::to_string).collect();
            let series: Vec<render::BarSeries> = p
                .thread_counts
                .iter()
                .enumerate()
                .map(|(col, t)| render::BarSeries {
                    name: t.to_string(),
                    values: p
                        .values
                        .iter()
                        .map(|row| row[col].unwrap_or(f64::NAN))
                        .collect(),
                })
                .collect();
            render::render_grouped_bars(
                &path,
                &title,
                "Block size (KB)",
                &groups,
                &series,
                config.chart_size,
            )?;
            if cli.verbose {
                render::show_image(&path);
            }
        }
        return Ok(());
    }

    let rows = table::comparison(&[(name.clone(), merged)]);
    let title = format!("{name} perftest");
    let path = PathBuf::from(format!("{title}.png"));
    render_comparison(&path, &title, &rows, false, config)?;
    if cli.verbose {
        render::show_image(&path);
    }
    Ok(())
}

/// Load the configured comparison datasets, then either dump their tables
/// or filter and plot the combined chart.
fn comparison_mode(cli: &Cli, config: &Config, patterns: &RecordPatterns) -> Result<()> {
    let mut datasets: Vec<(String, BenchTable)> = Vec::new();
    for prefix in &config.datasets {
        match load_dataset(&config.dataset_urls(prefix), config, patterns) {
            Ok(table) => datasets.push((prefix.clone(), table)),
            Err(err) => tracing::warn!("skipping dataset {prefix}: {err:#}"),
        }
    }
    if datasets.is_empty() {
        anyhow::bail!("no input data");
    }

    if let Some(path) = &cli.file {
        return render::dump_tables(path, &datasets);
    }

    let filter = FilterSpec::from_cli(&cli.bs, &cli.thread);
    let filtered: Vec<(String, BenchTable)> = datasets
        .iter()
        .map(|(label, table)| (label.clone(), table.filtered(&filter)))
        .collect();
    let rows = table::comparison(&filtered);
    if rows.is_empty() {
        anyhow::bail!("filter ({}) matched no rows", filter.suffix());
    }
    if cli.verbose {
        print_rows(&rows);
    }

    let labels: Vec<&str> = filtered.iter().map(|(label, _)| label.as_str()).collect();
    let title = format!("{} perftest", labels.join(" vs "));
    let suffix = filter.suffix();
    let file_name = if suffix.is_empty() {
        format!("{title}.png")
    } else {
        format!("{title} {suffix}.png")
    };
    let path = PathBuf::from(file_name);
    render_comparison(&path, &title, &rows, true, config)?;
    if cli.verbose {
        render::show_image(&path);
    }
    Ok(())
}

/// Combined chart: one bar group per row, the four plot metrics as series.
fn render_comparison(
    path: &Path,
    title: &str,
    rows: &[ComparisonRow],
    with_label: bool,
    config: &Config,
) -> Result<()> {
    let groups: Vec<String> = rows
        .iter()
        .map(|r| {
            if with_label {
                format!("({}, {}, {})", r.label, r.key.bs, r.key.threads)
            } else {
                format!("({}, {})", r.key.bs, r.key.threads)
            }
        })
        .collect();
    let series: Vec<render::BarSeries> = record::PLOT_METRICS
        .iter()
        .enumerate()
        .map(|(m, metric)| render::BarSeries {
            name: metric.to_string(),
            values: rows.iter().map(|r| r.metrics[m]).collect(),
        })
        .collect();
    render::render_grouped_bars(
        path,
        title,
        "Block size (KB), Thread",
        &groups,
        &series,
        config.chart_size,
    )
}

fn print_rows(rows: &[ComparisonRow]) {
    print!("{:>24}", "");
    for metric in record::PLOT_METRICS {
        print!(" {metric:>10}");
    }
    println!();
    for r in rows {
        print!(
            "{:>24}",
            format!("({}, {}, {})", r.label, r.key.bs, r.key.threads)
        );
        for v in r.metrics {
            print!(" {v:>10.2}");
        }
        println!();
    }
}

/// Directory/title stem for a merge-mode archive name: basename without the
/// tarball suffix.
fn archive_stem(name: &str) -> String {
    let base = Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    base.strip_suffix(".tar.gz")
        .or_else(|| base.strip_suffix(".tgz"))
        .unwrap_or(&base)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_collects_repeatable_filters() {
        let cli = Cli::try_parse_from(["iozone-viz", "-t", "4", "-t", "8", "-s", "128"]).unwrap();
        assert_eq!(cli.thread, vec![4, 8]);
        assert_eq!(cli.bs, vec![128]);
        let filter = FilterSpec::from_cli(&cli.bs, &cli.thread);
        assert_eq!(filter.suffix(), "bs 128 thread 4 8");
    }

    #[test]
    fn zfile_flags_select_merge_mode_inputs() {
        let cli =
            Cli::try_parse_from(["iozone-viz", "-f", "run1.tar.gz", "-f", "run2.tar.gz", "-p"])
                .unwrap();
        assert_eq!(cli.zfile, vec!["run1.tar.gz", "run2.tar.gz"]);
        assert!(cli.sparate);
    }

    #[test]
    fn archive_stem_strips_tarball_suffixes() {
        assert_eq!(archive_stem("run1.tar.gz"), "run1");
        assert_eq!(archive_stem("nightly/run2.tgz"), "run2");
        assert_eq!(archive_stem("plain"), "plain");
    }
}
