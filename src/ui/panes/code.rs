//! Code pane rendering: the decoded guest program with the current
//! instruction highlighted
//!
//! Every function block from the program snapshot is shown with its display
//! name (exported name or "function {i}"), a locals summary and its
//! instruction list. The instruction the engine reports as current is
//! highlighted and kept inside the visible window while stepping.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::snapshot::ProgramSnapshot;
use crate::ui::theme::DEFAULT_THEME;

/// Scroll state for the code pane.
pub struct CodeScrollState {
    pub offset: usize,
}

/// Render the code pane.
///
/// `highlight` is the `(function, instruction)` pair reported by the latest
/// state snapshot, if it locates inside the program.
pub fn render_code_pane(
    frame: &mut Frame,
    area: Rect,
    program: Option<&ProgramSnapshot>,
    highlight: Option<(usize, usize)>,
    is_focused: bool,
    scroll_state: &mut CodeScrollState,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let mut items: Vec<ListItem> = Vec::new();
    let mut highlight_row: Option<usize> = None;

    match program {
        None => {
            items.push(
                ListItem::new("(no program loaded)")
                    .style(Style::default().fg(DEFAULT_THEME.comment)),
            );
        }
        Some(program) => {
            for (func_index, function) in program.functions.iter().enumerate() {
                let mut header = vec![Span::styled(
                    format!("{}:", function.display_name(func_index)),
                    Style::default()
                        .fg(DEFAULT_THEME.function)
                        .add_modifier(Modifier::BOLD),
                )];
                if !function.locals.is_empty() {
                    let summary = function
                        .locals
                        .iter()
                        .map(|l| format!("{}x{}", l.count, l.value_type.label()))
                        .collect::<Vec<_>>()
                        .join(", ");
                    header.push(Span::styled(
                        format!("  locals: {}", summary),
                        Style::default().fg(DEFAULT_THEME.comment),
                    ));
                }
                items.push(ListItem::new(Line::from(header)));

                for (instr_index, instruction) in function.instructions.iter().enumerate() {
                    let is_current = highlight == Some((func_index, instr_index));

                    let mut spans = vec![Span::styled(
                        format!("  {}", instruction.op),
                        Style::default().fg(DEFAULT_THEME.fg),
                    )];
                    if !instruction.params.is_empty() {
                        let params = instruction
                            .params
                            .iter()
                            .map(|p| p.display())
                            .collect::<Vec<_>>()
                            .join(", ");
                        spans.push(Span::styled(
                            format!(" {}", params),
                            Style::default().fg(DEFAULT_THEME.secondary),
                        ));
                    }

                    let mut line = Line::from(spans);
                    if is_current {
                        highlight_row = Some(items.len());
                        line = line.style(
                            Style::default()
                                .bg(DEFAULT_THEME.current_line_bg)
                                .add_modifier(Modifier::BOLD),
                        );
                    }
                    items.push(ListItem::new(line));
                }

                // Blank separator between functions
                items.push(ListItem::new(""));
            }
        }
    }

    let visible_height = area.height.saturating_sub(2) as usize;
    clamp_scroll(scroll_state, items.len(), visible_height, highlight_row);

    let visible: Vec<ListItem> = items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible).block(block), area);
}

/// Keep the highlighted row inside the window, then clamp to content bounds.
fn clamp_scroll(
    scroll_state: &mut CodeScrollState,
    total: usize,
    visible_height: usize,
    highlight_row: Option<usize>,
) {
    if let Some(row) = highlight_row {
        if row < scroll_state.offset {
            scroll_state.offset = row;
        } else if visible_height > 0 && row >= scroll_state.offset + visible_height {
            scroll_state.offset = row + 1 - visible_height;
        }
    }
    let max_offset = total.saturating_sub(visible_height);
    if scroll_state.offset > max_offset {
        scroll_state.offset = max_offset;
    }
}
