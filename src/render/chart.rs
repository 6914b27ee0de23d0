use crate::Result;
use anyhow::bail;
use plotters::prelude::*;
use std::fs;
use std::path::Path;

/// One legend entry worth of bars: a value per group, NaN where the group
/// has no bar.
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Draw a grouped bar chart: one bar group per x label, one colored bar per
/// series inside each group. The y axis is always throughput in MB/s.
pub fn render_grouped_bars(
    path: &Path,
    title: &str,
    x_desc: &str,
    groups: &[String],
    series: &[BarSeries],
    size: (u32, u32),
) -> Result<()> {
    if groups.is_empty() || series.is_empty() {
        bail!("nothing to plot for {title:?}");
    }
    for s in series {
        if s.values.len() != groups.len() {
            bail!(
                "series {:?} has {} values for {} groups",
                s.name,
                s.values.len(),
                groups.len()
            );
        }
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let y_max = series
        .iter()
        .flat_map(|s| s.values.iter())
        .filter(|v| v.is_finite())
        .fold(0.0f64, |acc, &v| acc.max(v));
    let y_max = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let n = groups.len();
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(55)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..n as f64 - 0.5, 0.0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v: &f64| {
            let i = v.round();
            if (v - i).abs() < 1e-6 && i >= 0.0 && (i as usize) < n {
                groups[i as usize].clone()
            } else {
                String::new()
            }
        })
        .x_desc(x_desc)
        .y_desc("Throughput MB/s")
        .draw()?;

    // Bars of one group share 0.8 of the unit slot, centered on the group.
    let bar_width = 0.8 / series.len() as f64;
    for (j, s) in series.iter().enumerate() {
        let color = Palette99::pick(j).to_rgba();
        chart
            .draw_series(s.values.iter().enumerate().filter_map(|(g, &v)| {
                if !v.is_finite() {
                    return None;
                }
                let x0 = g as f64 - 0.4 + j as f64 * bar_width;
                Some(Rectangle::new([(x0, 0.0), (x0 + bar_width, v)], color.filled()))
            }))?
            .label(s.name.as_str())
            .legend(move |(x, y)| {
                Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .draw()?;

    root.present()?;
    tracing::info!("wrote {}", path.display());
    Ok(())
}
