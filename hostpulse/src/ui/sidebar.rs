//! Host list sidebar: one row per monitored host with a state dot and the
//! current CPU load.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
};

use crate::session::ConnectionState;

pub struct HostRow {
    pub name: String,
    pub state: ConnectionState,
    pub cpu: Option<f32>,
}

pub fn draw_host_list(f: &mut ratatui::Frame<'_>, area: Rect, rows: &[HostRow], selected: usize) {
    let items: Vec<ListItem> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let dot_color = match row.state {
                ConnectionState::Connected => Color::Green,
                ConnectionState::Connecting => Color::Yellow,
                ConnectionState::Disconnected => Color::Red,
            };
            let cpu = row
                .cpu
                .map(|v| format!(" {v:>5.1}%"))
                .unwrap_or_default();
            let mut style = Style::default();
            if i == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(dot_color)),
                Span::raw(format!("{}{cpu}", row.name)),
            ]))
            .style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Hosts (↑/↓ select, x remove)"),
    );
    f.render_widget(list, area);
}
