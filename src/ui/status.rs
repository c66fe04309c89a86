//! Connection status line: indicator dot, message, last-update time.

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::ui::theme;

pub struct StatusView<'a> {
    pub connected: bool,
    pub loading: bool,
    pub error: Option<&'a str>,
    pub last_update: Option<DateTime<Local>>,
}

pub fn draw_status(f: &mut ratatui::Frame<'_>, area: Rect, v: &StatusView<'_>) {
    let (dot, label, color) = if v.connected {
        ("●", "connected".to_string(), theme::OK)
    } else if let Some(err) = v.error {
        ("●", err.to_string(), theme::CRIT)
    } else if v.loading {
        ("○", "connecting...".to_string(), theme::WARN)
    } else {
        ("○", "disconnected".to_string(), theme::DIM)
    };

    let mut spans = vec![
        Span::styled(format!("{dot} "), Style::default().fg(color)),
        Span::raw(label),
    ];
    // A connected stream can still carry a warning (e.g. one bad payload).
    if v.connected {
        if let Some(err) = v.error {
            spans.push(Span::styled(
                format!("  ⚠ {err}"),
                Style::default().fg(theme::WARN),
            ));
        }
    }
    if let Some(t) = v.last_update {
        spans.push(Span::styled(
            format!("  updated {}", t.format("%H:%M:%S")),
            Style::default().fg(theme::DIM),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
