//! Network sparklines (download/upload) and per-interface totals.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Row, Sparkline, Table},
};
use std::collections::VecDeque;

use crate::types::Snapshot;
use crate::ui::theme;
use crate::ui::util::{human, truncate_middle};

pub fn draw_net_spark(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    title: &str,
    hist: &VecDeque<u64>,
    color: Color,
) {
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();

    let spark = Sparkline::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string()),
        )
        .data(&data)
        .style(Style::default().fg(color));
    f.render_widget(spark, area);
}

pub fn draw_net_table(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    let block = Block::default().borders(Borders::ALL).title("Interfaces");
    let Some(ss) = s else {
        f.render_widget(block, area);
        return;
    };

    let name_w = area.width.saturating_sub(24).max(8) as usize;
    let rows: Vec<Row> = ss
        .network
        .iter()
        .map(|n| {
            Row::new(vec![
                truncate_middle(&n.interface_name, name_w),
                human(n.total_bytes_recv),
                human(n.total_bytes_sent),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Min(8),
            Constraint::Length(10),
            Constraint::Length(10),
        ],
    )
    .header(Row::new(vec!["iface", "recv", "sent"]).style(Style::default().fg(theme::DIM)))
    .block(block);
    f.render_widget(table, area);
}
