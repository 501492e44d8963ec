//! CPU / RAM / GPU gauges for the current snapshot.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

use crate::types::Snapshot;
use crate::ui::util::{human, load_color};

pub fn draw_gauges(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>, stale: bool) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let (cpu_pct, cpu_title) = match m {
        Some(mm) => {
            let temp = mm
                .cpu
                .temperature
                .map(|t| format!(" | {t:.0}°C"))
                .unwrap_or_default();
            (mm.cpu.percent, format!("CPU{temp}"))
        }
        None => (0.0, "CPU".into()),
    };
    draw_pct_gauge(f, cols[0], &cpu_title, cpu_pct, load_color(cpu_pct), stale);

    let (ram_pct, ram_title) = match m {
        Some(mm) => (
            mm.ram.percent,
            format!("RAM {} / {}", human(mm.ram.used), human(mm.ram.total)),
        ),
        None => (0.0, "RAM".into()),
    };
    draw_pct_gauge(f, cols[1], &ram_title, ram_pct, Color::Magenta, stale);

    // First GPU only; the chart view covers the rest.
    let (gpu_pct, gpu_title) = match m.and_then(|mm| mm.gpu.first()) {
        Some(g) => (g.load * 100.0, format!("GPU {:.0}°C", g.temperature)),
        None => (0.0, "GPU".into()),
    };
    draw_pct_gauge(f, cols[2], &gpu_title, gpu_pct, Color::Green, stale);
}

fn draw_pct_gauge(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    pct: f32,
    color: Color,
    stale: bool,
) {
    let color = if stale { Color::DarkGray } else { color };
    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .gauge_style(Style::default().fg(color))
        .ratio(f64::from(pct.clamp(0.0, 100.0)) / 100.0)
        .label(format!("{pct:.1}%"));
    f.render_widget(g, area);
}
