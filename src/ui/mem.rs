//! Memory gauge.

use crate::types::Snapshot;
use crate::ui::theme;
use crate::ui::util::human;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Gauge},
};

pub fn draw_mem(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    let (used, total, pct) = if let Some(ss) = s {
        let m = &ss.memory;
        let pct = if m.total > 0 { (m.used as f64 / m.total as f64 * 100.0) as u16 } else { 0 };
        (m.used, m.total, pct)
    } else { (0, 0, 0) };

    let g = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Memory"))
        .gauge_style(Style::default().fg(theme::usage_color(pct, theme::MEM_THRESHOLDS)))
        .percent(pct)
        .label(format!("{} / {}", human(used), human(total)));
    f.render_widget(g, area);
}
