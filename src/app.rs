//! App state and main loop: input handling, pumping the telemetry client,
//! updating chart histories, and drawing.

use std::{collections::VecDeque, io, time::Duration};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Rect},
    Terminal,
};
use tokio::time::sleep;

use crate::client::ClientDriver;
use crate::history::{push_capped, NetRates};
use crate::ui::cpu::{draw_cpu_avg_graph, draw_per_core_bars};
use crate::ui::status::StatusView;
use crate::ui::{
    disks::draw_disks,
    header::draw_header,
    mem::draw_mem,
    net::{draw_net_spark, draw_net_table},
    overview::draw_overview,
    status::draw_status,
    swap::draw_swap,
};

const HIST_CAP: usize = 600;

pub struct App {
    driver: ClientDriver,

    // CPU avg history (0..100)
    cpu_hist: VecDeque<u64>,

    // Network rate derivation + histories of KB/s
    net_rates: NetRates,
    rx_hist: VecDeque<u64>,
    tx_hist: VecDeque<u64>,
    rx_peak: u64,
    tx_peak: u64,

    // Wall clock of the most recent snapshot
    last_update: Option<DateTime<Local>>,
    seen_updates: u64,

    should_quit: bool,
}

impl App {
    pub fn new(endpoint: String) -> Self {
        Self {
            driver: ClientDriver::new(Some(endpoint)),
            cpu_hist: VecDeque::with_capacity(HIST_CAP),
            net_rates: NetRates::new(),
            rx_hist: VecDeque::with_capacity(HIST_CAP),
            tx_hist: VecDeque::with_capacity(HIST_CAP),
            rx_peak: 0,
            tx_peak: 0,
            last_update: None,
            seen_updates: 0,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        self.driver.connect();

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let res = self.event_loop(&mut terminal).await;

        // Teardown
        self.driver.shutdown();
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, LeaveAlternateScreen)?;
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
                        KeyCode::Char('r') | KeyCode::Char('R') => {
                            self.driver.reconnect();
                        }
                        KeyCode::Char('f') | KeyCode::Char('F') => {
                            self.driver.refresh();
                        }
                        _ => {}
                    }
                }
            }
            if self.should_quit {
                break;
            }

            // Drain transport events and fold fresh snapshots into histories
            self.driver.pump();
            if self.driver.updates() != self.seen_updates {
                self.seen_updates = self.driver.updates();
                self.last_update = Some(Local::now());
                self.update_histories();
            }

            terminal.draw(|f| self.draw(f))?;

            // Tick rate
            sleep(Duration::from_millis(250)).await;
        }

        Ok(())
    }

    fn update_histories(&mut self) {
        let Some(s) = self.driver.data() else { return };

        let v = s.cpu_avg().clamp(0.0, 100.0).round() as u64;

        // Sum cumulative counters across all ifaces, then diff into KB/s
        let rx_total = s.network.iter().map(|n| n.total_bytes_recv).sum::<u64>();
        let tx_total = s.network.iter().map(|n| n.total_bytes_sent).sum::<u64>();

        push_capped(&mut self.cpu_hist, v, HIST_CAP);
        let (rx_kb, tx_kb) = self.net_rates.sample(rx_total, tx_total);
        push_capped(&mut self.rx_hist, rx_kb, HIST_CAP);
        push_capped(&mut self.tx_hist, tx_kb, HIST_CAP);
        self.rx_peak = self.rx_peak.max(rx_kb);
        self.tx_peak = self.tx_peak.max(tx_kb);
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();
        let snapshot = self.driver.data();

        // Root rows: header, status, top (cpu avg + per-core), memory, swap, bottom
        let rows = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),   // header
                Constraint::Length(1),   // connection status
                Constraint::Ratio(1, 3), // top row
                Constraint::Length(3),   // memory (left) + system card (right, part 1)
                Constraint::Length(3),   // swap (left)   + system card (right, part 2)
                Constraint::Min(10),     // bottom: disks (left), net (right)
            ])
            .split(area);

        draw_header(f, rows[0], snapshot);
        draw_status(
            f,
            rows[1],
            &StatusView {
                connected: self.driver.is_connected(),
                loading: self.driver.is_loading(),
                error: self.driver.error(),
                last_update: self.last_update,
            },
        );

        // Top row: left CPU avg, right per-core
        let top_lr = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[2]);

        draw_cpu_avg_graph(f, top_lr[0], &self.cpu_hist, snapshot);
        draw_per_core_bars(f, top_lr[1], snapshot);

        // Memory + Swap rows split into left/right columns
        let mem_lr = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[3]);
        let swap_lr = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(66), Constraint::Percentage(34)])
            .split(rows[4]);

        draw_mem(f, mem_lr[0], snapshot);
        draw_swap(f, swap_lr[0], snapshot);

        // Right: system card spans the same vertical space as Memory + Swap
        let overview_area = Rect {
            x: mem_lr[1].x,
            y: mem_lr[1].y,
            width: mem_lr[1].width,
            height: mem_lr[1].height + swap_lr[1].height,
        };
        draw_overview(f, overview_area, snapshot);

        // Bottom area: left = disks, right = network
        let bottom_lr = ratatui::layout::Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[5]);

        draw_disks(f, bottom_lr[0], snapshot);

        let right_stack = ratatui::layout::Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // download
                Constraint::Length(5), // upload
                Constraint::Min(4),    // per-interface totals
            ])
            .split(bottom_lr[1]);

        draw_net_spark(
            f,
            right_stack[0],
            &format!(
                "Download (KB/s) — now: {} | peak: {}",
                self.rx_hist.back().copied().unwrap_or(0),
                self.rx_peak
            ),
            &self.rx_hist,
            ratatui::style::Color::Green,
        );
        draw_net_spark(
            f,
            right_stack[1],
            &format!(
                "Upload (KB/s) — now: {} | peak: {}",
                self.tx_hist.back().copied().unwrap_or(0),
                self.tx_peak
            ),
            &self.tx_hist,
            ratatui::style::Color::Blue,
        );
        draw_net_table(f, right_stack[2], snapshot);
    }
}
