//! Log pane: the single diagnostic surface
//!
//! Shows every line pushed to the log sink - text the engine emitted through
//! its `_log` import and failures reported by the bridge itself. The app sets
//! the scroll offset to `usize::MAX` after a step to pin the pane to the
//! newest line; the clamp below turns that into "bottom".

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::ui::theme::DEFAULT_THEME;

/// Scroll state for the log pane.
pub struct LogScrollState {
    pub offset: usize,
}

/// Render the log pane.
pub fn render_log_pane(
    frame: &mut Frame,
    area: Rect,
    lines: &[String],
    is_focused: bool,
    scroll_state: &mut LogScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Log ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let visible_height = area.height.saturating_sub(2) as usize;
    let max_offset = lines.len().saturating_sub(visible_height);
    if scroll_state.offset > max_offset {
        scroll_state.offset = max_offset;
    }

    let items: Vec<ListItem> = if lines.is_empty() {
        vec![ListItem::new("(no output)").style(Style::default().fg(DEFAULT_THEME.comment))]
    } else {
        lines
            .iter()
            .skip(scroll_state.offset)
            .take(visible_height)
            .map(|line| ListItem::new(line.as_str()).style(Style::default().fg(DEFAULT_THEME.fg)))
            .collect()
    };

    frame.render_widget(List::new(items).block(block), area);
}
