//! Interpreter state pane: current position and the value stack

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::snapshot::StateSnapshot;
use crate::ui::theme::DEFAULT_THEME;

/// Scroll state for the interpreter pane.
pub struct StateScrollState {
    pub offset: usize,
}

/// Render the interpreter state pane.
pub fn render_state_pane(
    frame: &mut Frame,
    area: Rect,
    state: Option<&StateSnapshot>,
    is_focused: bool,
    scroll_state: &mut StateScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Interpreter ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut items: Vec<ListItem> = Vec::new();

    match state {
        None => {
            items.push(
                ListItem::new("(no state)").style(Style::default().fg(DEFAULT_THEME.comment)),
            );
        }
        Some(state) => {
            items.push(ListItem::new(Line::from(vec![
                Span::styled(
                    "Position: ",
                    Style::default()
                        .fg(DEFAULT_THEME.primary)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    state.position_display(),
                    Style::default().fg(DEFAULT_THEME.fg),
                ),
            ])));

            items.push(ListItem::new(Line::from(Span::styled(
                "Value stack:",
                Style::default()
                    .fg(DEFAULT_THEME.primary)
                    .add_modifier(Modifier::BOLD),
            ))));

            if state.value_stack.is_empty() {
                items.push(
                    ListItem::new("  (empty)").style(Style::default().fg(DEFAULT_THEME.comment)),
                );
            } else {
                // Top of stack first
                for (slot, value) in state.value_stack.iter().enumerate().rev() {
                    items.push(ListItem::new(Line::from(vec![
                        Span::styled(
                            format!("  [{}] ", slot),
                            Style::default().fg(DEFAULT_THEME.comment),
                        ),
                        Span::styled(value.display(), Style::default().fg(DEFAULT_THEME.number)),
                        Span::styled(
                            format!(" {}", value.kind().label()),
                            Style::default().fg(DEFAULT_THEME.type_name),
                        ),
                    ])));
                }
            }
        }
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    let max_offset = items.len().saturating_sub(visible_height);
    if scroll_state.offset > max_offset {
        scroll_state.offset = max_offset;
    }

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible).block(block), area);
}
