//! Top header with hostname, OS and uptime.

use crate::types::Snapshot;
use crate::ui::util::format_uptime;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    let title = if let Some(ss) = s {
        format!(
            "ssetop — {} | {} | up {}  ('q' quit, 'r' reconnect, 'f' refresh)",
            ss.host.hostname,
            ss.host.os,
            format_uptime(ss.host.uptime)
        )
    } else {
        "ssetop — waiting for data... ('q' quit, 'r' reconnect, 'f' refresh)".into()
    };
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
