//! App state and main loop: input handling, per-host sessions, drawing.

use std::{io, time::Duration};

use anyhow::bail;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Terminal,
};
use tokio::time::sleep;
use tracing::warn;

use crate::hosts::{save_hosts, HostEntry, HostsFile};
use crate::session::{ConnectionState, HostSession};
use crate::ui::chart::draw_history_chart;
use crate::ui::gauges::draw_gauges;
use crate::ui::header::draw_header;
use crate::ui::processes::draw_processes;
use crate::ui::sidebar::{draw_host_list, HostRow};
use crate::ui::system::draw_system;

struct MonitoredHost {
    entry: HostEntry,
    session: HostSession,
}

pub struct App {
    hosts: Vec<MonitoredHost>,
    registry: HostsFile,
    selected: usize,
    should_quit: bool,
}

impl App {
    /// Open one independent session per host. Entries with an unparseable
    /// address are skipped with a warning.
    pub fn new(entries: Vec<HostEntry>, registry: HostsFile) -> anyhow::Result<Self> {
        let mut hosts = Vec::with_capacity(entries.len());
        for entry in entries {
            match HostSession::open(&entry.address) {
                Ok(session) => hosts.push(MonitoredHost { entry, session }),
                Err(err) => warn!(address = %entry.address, %err, "skipping host"),
            }
        }
        if hosts.is_empty() {
            bail!("no usable host addresses");
        }
        Ok(Self {
            hosts,
            registry,
            selected: 0,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        res
    }

    async fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> anyhow::Result<()> {
        loop {
            // Input (non-blocking)
            while event::poll(Duration::from_millis(10))? {
                if let Event::Key(k) = event::read()? {
                    match k.code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.should_quit = true;
                        }
                        KeyCode::Up | KeyCode::Char('k') => {
                            self.selected = self.selected.saturating_sub(1);
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            if self.selected + 1 < self.hosts.len() {
                                self.selected += 1;
                            }
                        }
                        KeyCode::Char('x') => self.remove_selected(),
                        _ => {}
                    }
                }
            }
            if self.should_quit {
                break;
            }

            terminal.draw(|f| self.draw(f))?;

            // Sessions ingest in the background; the UI only needs a
            // modest redraw tick.
            sleep(Duration::from_millis(250)).await;
        }

        for host in &self.hosts {
            host.session.close();
        }
        Ok(())
    }

    fn remove_selected(&mut self) {
        if self.hosts.is_empty() {
            return;
        }
        let removed = self.hosts.remove(self.selected);
        removed.session.close();
        if self.registry.remove(&removed.entry.address) {
            if let Err(err) = save_hosts(&self.registry) {
                warn!(%err, "failed to save hosts file");
            }
        }
        if self.selected > 0 && self.selected >= self.hosts.len() {
            self.selected -= 1;
        }
        if self.hosts.is_empty() {
            self.should_quit = true;
        }
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(26), Constraint::Min(40)])
            .split(f.area());

        let rows: Vec<HostRow> = self
            .hosts
            .iter()
            .map(|h| HostRow {
                name: h.entry.name.clone(),
                state: h.session.connection_state(),
                cpu: h.session.current_metrics().map(|m| m.cpu.percent),
            })
            .collect();
        draw_host_list(f, cols[0], &rows, self.selected);

        let Some(host) = self.hosts.get(self.selected) else {
            return;
        };
        let state = host.session.connection_state();
        let current = host.session.current_metrics();
        let info = host.session.static_info();
        let history = host.session.history();

        let main = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(3), // gauges
                Constraint::Min(8),    // history chart
                Constraint::Length(9), // system + processes
            ])
            .split(cols[1]);

        draw_header(
            f,
            main[0],
            &host.entry.name,
            &host.entry.address,
            state,
            current.as_ref().map(|m| m.ts),
        );
        draw_gauges(
            f,
            main[1],
            current.as_ref(),
            state != ConnectionState::Connected,
        );
        draw_history_chart(f, main[2], &history);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main[3]);
        draw_system(f, bottom[0], info.as_ref());
        draw_processes(f, bottom[1], current.as_ref());
    }
}
