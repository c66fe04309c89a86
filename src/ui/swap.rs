//! Swap gauge.

use crate::types::Snapshot;
use crate::ui::util::human;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Gauge},
};

pub fn draw_swap(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    let (used, total, pct) = if let Some(ss) = s {
        let m = &ss.memory;
        let pct = if m.swap_total > 0 { (m.swap_used as f64 / m.swap_total as f64 * 100.0) as u16 } else { 0 };
        (m.swap_used, m.swap_total, pct)
    } else { (0, 0, 0) };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Swap"))
        .gauge_style(Style::default().fg(Color::Yellow))
        .percent(pct)
        .label(format!("{} / {}", human(used), human(total)));
    f.render_widget(g, area);
}
