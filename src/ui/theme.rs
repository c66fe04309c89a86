//! Shared UI theme constants.

use ratatui::style::Color;

/// Medium/high usage cutoffs; each resource keeps its own pair.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub medium: u16,
    pub high: u16,
}

pub const CPU_THRESHOLDS: Thresholds = Thresholds { medium: 50, high: 80 };
pub const MEM_THRESHOLDS: Thresholds = Thresholds { medium: 75, high: 90 };
pub const DISK_THRESHOLDS: Thresholds = Thresholds { medium: 75, high: 90 };

pub const OK: Color = Color::Green;
pub const WARN: Color = Color::Yellow;
pub const CRIT: Color = Color::Red;
pub const DIM: Color = Color::Rgb(170, 170, 180);

pub fn usage_color(pct: u16, t: Thresholds) -> Color {
    if pct >= t.high {
        CRIT
    } else if pct >= t.medium {
        WARN
    } else {
        OK
    }
}
