//! Top processes table, sorted by CPU descending.

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

use crate::types::{ProcessInfo, Snapshot};
use crate::ui::util::load_color;

const COLS: [Constraint; 4] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(50), // Name
    Constraint::Length(8),      // CPU %
    Constraint::Length(10),     // Mem MB
];

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, m: Option<&Snapshot>) {
    let block = Block::default().borders(Borders::ALL).title("Processes");
    let Some(procs) = m.and_then(|mm| mm.processes.as_deref()) else {
        let inner = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(Paragraph::new("no process data"), inner);
        return;
    };

    let mut sorted: Vec<&ProcessInfo> = procs.iter().collect();
    sorted.sort_by(|a, b| {
        b.cpu_percent
            .partial_cmp(&a.cpu_percent)
            .unwrap_or(Ordering::Equal)
    });

    let viewport = area.height.saturating_sub(3) as usize; // borders + header
    let rows = sorted.iter().take(viewport).map(|p| {
        Row::new(vec![
            Cell::from(p.pid.to_string()),
            Cell::from(p.name.clone()),
            Cell::from(format!("{:>5.1}", p.cpu_percent))
                .style(Style::default().fg(load_color(p.cpu_percent))),
            Cell::from(format!("{:>7.1}", p.mem_mb)),
        ])
    });

    let table = Table::new(rows, COLS)
        .header(
            Row::new(vec!["PID", "NAME", "CPU%", "MEM MB"])
                .style(Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD)),
        )
        .block(block);
    f.render_widget(table, area);
}
