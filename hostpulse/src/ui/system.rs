//! Static hardware/OS panel for the selected host.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::types::StaticInfo;
use crate::ui::util::human;

pub fn draw_system(f: &mut ratatui::Frame<'_>, area: Rect, info: Option<&StaticInfo>) {
    let block = Block::default().borders(Borders::ALL).title("System");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(si) = info else {
        f.render_widget(Paragraph::new("waiting for static info..."), inner);
        return;
    };

    let label = Style::default().fg(Color::Gray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("OS   ", label),
            Span::raw(format!(
                "{} {} ({})",
                si.os.distro, si.os.release, si.os.arch
            )),
        ]),
        Line::from(vec![
            Span::styled("CPU  ", label),
            Span::raw(format!(
                "{} — {} cores ({} physical) @ {:.1}GHz",
                si.cpu.brand, si.cpu.cores, si.cpu.physical_cores, si.cpu.speed
            )),
        ]),
        Line::from(vec![
            Span::styled("RAM  ", label),
            Span::raw(ram_line(si)),
        ]),
    ];
    for gpu in &si.gpus {
        lines.push(Line::from(vec![
            Span::styled("GPU  ", label),
            Span::raw(format!("{} ({} MB)", gpu.name, gpu.memory_total)),
        ]));
    }
    for drive in &si.storage {
        let pct = if drive.total > 0 {
            (drive.used as f64 / drive.total as f64 * 100.0).round() as u16
        } else {
            0
        };
        lines.push(Line::from(vec![
            Span::styled("DISK ", label),
            Span::raw(format!(
                "{} {} / {} ({pct}%)",
                drive.name,
                human(drive.used),
                human(drive.total)
            )),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn ram_line(si: &StaticInfo) -> String {
    match si.mem.layout.first() {
        Some(stick) => format!(
            "{} {} @ {}MHz",
            human(si.mem.total),
            stick.kind,
            stick.clock_speed
        ),
        None => human(si.mem.total),
    }
}
