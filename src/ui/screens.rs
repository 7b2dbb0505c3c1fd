pub(crate) mod analytics;
pub(crate) mod dashboard;
pub(crate) mod expenses;
pub(crate) mod limits;

use ratatui::{
    style::Style,
    text::Span,
    widgets::{Block, Borders},
};

use super::theme;

/// Bordered panel with a dim bold title, shared by every screen.
pub(crate) fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::block_title_style()))
}
