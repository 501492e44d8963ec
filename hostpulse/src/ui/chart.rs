//! Multi-series history chart: CPU %, RAM %, CPU temperature.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};

use crate::downsample::{downsample, AlignedSeries, MAX_CHART_POINTS};
use crate::types::Snapshot;

pub fn draw_history_chart(f: &mut ratatui::Frame<'_>, area: Rect, history: &[Snapshot]) {
    let block = Block::default().borders(Borders::ALL).title("History");
    if history.is_empty() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new("waiting for samples..."), inner);
        return;
    }

    // Columns are index-aligned with the timestamp column; a missing CPU
    // temperature becomes NaN, never a shorter column.
    let series = AlignedSeries {
        timestamps: history.iter().map(|s| s.ts as f64 / 1000.0).collect(),
        values: vec![
            history.iter().map(|s| f64::from(s.cpu.percent)).collect(),
            history.iter().map(|s| f64::from(s.ram.percent)).collect(),
            history
                .iter()
                .map(|s| s.cpu.temperature.map(f64::from).unwrap_or(f64::NAN))
                .collect(),
        ],
    };
    let series = downsample(series, MAX_CHART_POINTS);

    let cpu = points(&series, 0);
    let ram = points(&series, 1);
    let temp = points(&series, 2);

    let x_min = series.timestamps.first().copied().unwrap_or(0.0);
    let mut x_max = series.timestamps.last().copied().unwrap_or(0.0);
    if x_max <= x_min {
        x_max = x_min + 1.0;
    }

    let datasets = vec![
        Dataset::default()
            .name("cpu %")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&cpu),
        Dataset::default()
            .name("ram %")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Magenta))
            .data(&ram),
        Dataset::default()
            .name("cpu °C")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&temp),
    ];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([x_min, x_max])
                .labels(vec![Span::raw(clock(x_min)), Span::raw(clock(x_max))]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, 100.0])
                .labels(vec![Span::raw("0"), Span::raw("50"), Span::raw("100")]),
        );
    f.render_widget(chart, area);
}

// NaN samples are dropped at render time only; the aligned series keeps
// them so indexes stay comparable across columns.
fn points(series: &AlignedSeries, column: usize) -> Vec<(f64, f64)> {
    series
        .timestamps
        .iter()
        .zip(series.values[column].iter())
        .filter(|(_, v)| !v.is_nan())
        .map(|(t, v)| (*t, *v))
        .collect()
}

fn clock(ts_secs: f64) -> String {
    chrono::DateTime::from_timestamp(ts_secs as i64, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_default()
}
