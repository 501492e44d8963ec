//! Top header: host identity, connection status, last update time.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::session::ConnectionState;

pub fn draw_header(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    name: &str,
    address: &str,
    state: ConnectionState,
    last_ts: Option<u64>,
) {
    // Last-known values stay on screen during blips; the status text is the
    // only staleness signal.
    let status = match state {
        ConnectionState::Connected => "connected".to_string(),
        _ => "connecting...".to_string(),
    };
    let updated = last_ts
        .and_then(|ts| chrono::DateTime::from_timestamp_millis(ts as i64))
        .map(|dt| format!(" | updated {}", dt.format("%H:%M:%S")))
        .unwrap_or_default();
    let title = format!(
        "hostpulse — {name} ({address}) | {status}{updated}  (press 'q' to quit)"
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
