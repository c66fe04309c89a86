//! CPU average sparkline + per-core usage bars.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Sparkline},
};

use crate::types::Snapshot;
use crate::ui::theme;

pub fn draw_cpu_avg_graph(
    f: &mut ratatui::Frame<'_>,
    area: Rect,
    hist: &std::collections::VecDeque<u64>,
    s: Option<&Snapshot>,
) {
    let title = if let Some(ss) = s {
        format!("CPU avg (now: {:>5.1}%)", ss.cpu_avg())
    } else {
        "CPU avg".into()
    };
    let max_points = area.width.saturating_sub(2) as usize;
    let start = hist.len().saturating_sub(max_points);
    let data: Vec<u64> = hist.iter().skip(start).cloned().collect();
    let spark = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .data(&data)
        .max(100)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(spark, area);
}

pub fn draw_per_core_bars(f: &mut ratatui::Frame<'_>, area: Rect, s: Option<&Snapshot>) {
    f.render_widget(
        Block::default().borders(Borders::ALL).title("Per-core"),
        area,
    );
    let Some(ss) = s else { return; };

    let inner = Rect {
        x: area.x + 1,
        y: area.y + 1,
        width: area.width.saturating_sub(2),
        height: area.height.saturating_sub(2),
    };
    if inner.height == 0 {
        return;
    }

    let rows = inner.height as usize;
    let show_n = rows.min(ss.cpu.len());
    let constraints: Vec<Constraint> = (0..show_n).map(|_| Constraint::Length(1)).collect();
    let vchunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (i, rect) in vchunks.iter().enumerate().take(show_n) {
        let usage = ss.cpu[i].usage.clamp(0.0, 100.0);
        let pct = usage.round() as u16;
        let width = rect.width.saturating_sub(12) as usize;
        let filled = (width as f64 * usage / 100.0).round() as usize;
        let bar: String = "▮".repeat(filled) + &"▯".repeat(width.saturating_sub(filled));
        let line = Line::from(vec![
            Span::styled(format!("{i:>3} "), Style::default().fg(theme::DIM)),
            Span::styled(
                bar,
                Style::default().fg(theme::usage_color(pct, theme::CPU_THRESHOLDS)),
            ),
            Span::raw(format!(" {usage:>5.1}%")),
        ]);
        f.render_widget(Paragraph::new(line), *rect);
    }
}
