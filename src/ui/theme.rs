use ratatui::style::{Color, Modifier, Style};

use rust_decimal::Decimal;

use crate::notifier::{Inputs, WarningState};

pub(crate) const HEADER_BG: Color = Color::Rgb(30, 30, 46);
pub(crate) const HEADER_FG: Color = Color::Rgb(205, 214, 244);
pub(crate) const ACCENT: Color = Color::Rgb(137, 180, 250);
pub(crate) const GREEN: Color = Color::Rgb(166, 227, 161);
pub(crate) const RED: Color = Color::Rgb(243, 139, 168);
pub(crate) const YELLOW: Color = Color::Rgb(249, 226, 175);
pub(crate) const SURFACE: Color = Color::Rgb(49, 50, 68);
pub(crate) const TEXT: Color = Color::Rgb(205, 214, 244);
pub(crate) const TEXT_DIM: Color = Color::Rgb(127, 132, 156);
pub(crate) const OVERLAY: Color = Color::Rgb(69, 71, 90);
pub(crate) const COMMAND_BG: Color = Color::Rgb(24, 24, 37);

pub(crate) fn header_style() -> Style {
    Style::default()
        .fg(HEADER_FG)
        .bg(HEADER_BG)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn selected_style() -> Style {
    Style::default().fg(HEADER_BG).bg(ACCENT)
}

pub(crate) fn normal_style() -> Style {
    Style::default().fg(TEXT)
}

pub(crate) fn dim_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub(crate) fn amount_style() -> Style {
    Style::default().fg(RED)
}

pub(crate) fn alt_row_style() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub(crate) fn command_bar_style() -> Style {
    Style::default().fg(TEXT).bg(COMMAND_BG)
}

pub(crate) fn status_bar_style() -> Style {
    Style::default().fg(TEXT_DIM).bg(SURFACE)
}

pub(crate) fn block_title_style() -> Style {
    Style::default().fg(TEXT_DIM).add_modifier(Modifier::BOLD)
}

/// Color for spend measured against the limit: red once exceeded, yellow
/// from the 80% threshold, green otherwise. Dismissal does not change it.
pub(crate) fn usage_color(spend: Decimal, limit: Option<Decimal>) -> Color {
    let state = WarningState::evaluate(&Inputs {
        spend,
        limit,
        dismissed: false,
    });
    if state.exceeded {
        RED
    } else if state.approaching || limit.is_some_and(|l| l > Decimal::ZERO && spend == l) {
        // exactly at the limit is neither state but still not "fine"
        YELLOW
    } else {
        GREEN
    }
}

/// Banner style for the active warning, if any. Exceeded wins.
pub(crate) fn warning_banner_style(warnings: WarningState) -> Option<Style> {
    let bg = if warnings.exceeded {
        RED
    } else if warnings.approaching {
        YELLOW
    } else {
        return None;
    };
    Some(Style::default().fg(HEADER_BG).bg(bg).add_modifier(Modifier::BOLD))
}
