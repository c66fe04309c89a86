//! Disk cards with per-mountpoint gauge and title line.

use crate::types::Snapshot;
use crate::ui::theme;
use crate::ui::util::{human, truncate_middle};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders, Gauge},
};

pub fn draw_disks(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("Disks"), area);
    let Some(ss) = s else { return; };

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height < 3 { return; }

    let per_disk_h = 3u16;
    let max_cards = (inner.height / per_disk_h).min(ss.disk.len() as u16) as usize;

    let constraints: Vec<Constraint> = (0..max_cards).map(|_| Constraint::Length(per_disk_h)).collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, slot) in rows.iter().enumerate() {
        let d = &ss.disk[i];
        let pct = d.used_percent.clamp(0.0, 100.0).round() as u16;

        let title = format!(
            "{} [{}]   {} / {}  ({}%)",
            truncate_middle(&d.mountpoint, (slot.width.saturating_sub(6)) as usize / 2),
            d.fs_type,
            human(d.used),
            human(d.total),
            pct
        );

        let card = Block::default().borders(Borders::ALL).title(title);
        f.render_widget(card, *slot);

        let inner_card = Rect {
            x: slot.x + 1,
            y: slot.y + 1,
            width: slot.width.saturating_sub(2),
            height: slot.height.saturating_sub(2),
        };
        if inner_card.height == 0 { continue; }

        let gauge_rect = Rect {
            x: inner_card.x,
            y: inner_card.y + inner_card.height / 2,
            width: inner_card.width,
            height: 1,
        };

        let g = Gauge::default()
            .percent(pct)
            .gauge_style(Style::default().fg(theme::usage_color(pct, theme::DISK_THRESHOLDS)));

        f.render_widget(g, gauge_rect);
    }
}
