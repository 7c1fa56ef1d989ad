use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use tracing::warn;

use crate::config::ensure_parent;
use crate::eda::stats::FreqEntry;

const CHART_SIZE: (u32, u32) = (1280, 720);
const HIST_BINS: usize = 30;
const LABEL_MAX: usize = 18;

/// Vertical bar chart of category/city/supplier counts. Skipped (with a
/// warning, not an error) when there is nothing to draw.
pub fn bar_chart(path: &Path, title: &str, y_desc: &str, entries: &[FreqEntry]) -> Result<()> {
    if entries.is_empty() {
        warn!(chart = %path.display(), "no data, chart skipped");
        return Ok(());
    }
    ensure_parent(path)?;
    draw_bars(path, title, y_desc, entries)
        .map_err(|e| anyhow::anyhow!("rendering {}: {e}", path.display()))
}

fn draw_bars(
    path: &Path,
    title: &str,
    y_desc: &str,
    entries: &[FreqEntry],
) -> Result<(), Box<dyn std::error::Error>> {
    let max = entries.iter().map(|e| e.count).max().unwrap_or(1) as u32;
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(24)
        .x_label_area_size(120)
        .y_label_area_size(60)
        .build_cartesian_2d((0..entries.len()).into_segmented(), 0u32..max + max / 5 + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len().min(30))
        .x_label_style(("sans-serif", 13).into_font().transform(FontTransform::Rotate90))
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => entries
                .get(*i)
                .map(|e| truncate(&e.name, LABEL_MAX))
                .unwrap_or_default(),
            SegmentValue::Last => String::new(),
        })
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, e)| {
        Rectangle::new(
            [
                (SegmentValue::Exact(i), 0),
                (SegmentValue::Exact(i + 1), e.count as u32),
            ],
            BLUE.mix(0.6).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Price histogram with fixed-width bins across the observed range.
pub fn histogram(path: &Path, title: &str, values: &[f64]) -> Result<()> {
    if values.is_empty() {
        warn!(chart = %path.display(), "no data, chart skipped");
        return Ok(());
    }
    ensure_parent(path)?;
    draw_histogram(path, title, values)
        .map_err(|e| anyhow::anyhow!("rendering {}: {e}", path.display()))
}

fn draw_histogram(
    path: &Path,
    title: &str,
    values: &[f64],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        // Degenerate single-price dataset; widen so the axis stays sane.
        min -= 1.0;
        max += 1.0;
    }
    let width = (max - min) / HIST_BINS as f64;

    let mut counts = vec![0u32; HIST_BINS];
    for v in values {
        let bin = (((v - min) / width) as usize).min(HIST_BINS - 1);
        counts[bin] += 1;
    }
    let peak = counts.iter().copied().max().unwrap_or(1);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(24)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(min..max, 0u32..peak + peak / 5 + 1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Price")
        .y_desc("Listings")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, c)| {
        let x0 = min + i as f64 * width;
        Rectangle::new([(x0, 0), (x0 + width, *c)], GREEN.mix(0.5).filled())
    }))?;

    root.present()?;
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}
