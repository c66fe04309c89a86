//! System overview card: OS, uptime, CPU model and core count.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::types::Snapshot;
use crate::ui::theme;
use crate::ui::util::{format_uptime, truncate_middle};

pub fn draw_overview(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    let block = Block::default().borders(Borders::ALL).title("System");
    let Some(ss) = s else {
        f.render_widget(block, area);
        return;
    };

    let model = ss
        .cpu
        .first()
        .map(|c| truncate_middle(&c.model, area.width.saturating_sub(10) as usize))
        .unwrap_or_else(|| "unknown".into());
    let cores: u32 = ss.cpu.first().map(|c| c.cores).unwrap_or(0);

    let dim = Style::default().fg(theme::DIM);
    let lines = vec![
        Line::from(vec![Span::styled("OS     ", dim), Span::raw(ss.host.os.clone())]),
        Line::from(vec![
            Span::styled("Uptime ", dim),
            Span::raw(format_uptime(ss.host.uptime)),
        ]),
        Line::from(vec![Span::styled("CPU    ", dim), Span::raw(model)]),
        Line::from(vec![
            Span::styled("Cores  ", dim),
            Span::raw(format!("{cores} ({} reported)", ss.cpu.len())),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}
