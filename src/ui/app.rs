//! Main TUI application state and logic

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;

use crate::bridge::Engine;
use crate::session::{DebugSession, LogSink, StepOutcome};
use crate::ui::panes::{CodeScrollState, LogScrollState, StateScrollState};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Code,
    State,
    Log,
}

impl FocusedPane {
    /// Move focus to the next pane (code -> state -> log)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Code => FocusedPane::State,
            FocusedPane::State => FocusedPane::Log,
            FocusedPane::Log => FocusedPane::Code,
        }
    }
}

/// The main application state
pub struct App<E: Engine> {
    /// The debugging session being driven
    pub session: DebugSession<E>,

    /// The diagnostic log surface shared with the engine's `_log` callback
    log: LogSink,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll state
    code_scroll: CodeScrollState,
    state_scroll: StateScrollState,
    log_scroll: LogScrollState,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl<E: Engine> App<E> {
    /// Create a new app around an established session.
    pub fn new(session: DebugSession<E>, log: LogSink) -> Self {
        App {
            session,
            log,
            focused_pane: FocusedPane::Code,
            code_scroll: CodeScrollState { offset: 0 },
            state_scroll: StateScrollState { offset: 0 },
            log_scroll: LogScrollState { offset: usize::MAX },
            should_quit: false,
            status_message: String::from("Ready - press → to step"),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes above, one-line status bar below
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        // Left column: code. Right column: interpreter state over log.
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(pane_area);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[1]);

        super::panes::render_code_pane(
            frame,
            columns[0],
            self.session.program(),
            self.session.highlight(),
            self.focused_pane == FocusedPane::Code,
            &mut self.code_scroll,
        );

        super::panes::render_state_pane(
            frame,
            right_rows[0],
            self.session.latest_state(),
            self.focused_pane == FocusedPane::State,
            &mut self.state_scroll,
        );

        let log_lines = self.log.borrow();
        super::panes::render_log_pane(
            frame,
            right_rows[1],
            log_lines.as_slice(),
            self.focused_pane == FocusedPane::Log,
            &mut self.log_scroll,
        );
        drop(log_lines);

        super::panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.session.state(),
            self.session.steps(),
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Right | KeyCode::Char('n') => {
                self.step();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Code => {
                    self.code_scroll.offset = self.code_scroll.offset.saturating_sub(1);
                }
                FocusedPane::State => {
                    self.state_scroll.offset = self.state_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Log => {
                    self.log_scroll.offset = self.log_scroll.offset.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Code => {
                    self.code_scroll.offset = self.code_scroll.offset.saturating_add(1);
                }
                FocusedPane::State => {
                    self.state_scroll.offset = self.state_scroll.offset.saturating_add(1);
                }
                FocusedPane::Log => {
                    self.log_scroll.offset = self.log_scroll.offset.saturating_add(1);
                }
            },
            _ => {}
        }
    }

    /// Advance the session by one instruction
    fn step(&mut self) {
        match self.session.step() {
            Ok(StepOutcome::Stepped) => {
                self.status_message = "Stepped".to_string();
                // Follow the newest log line
                self.log_scroll.offset = usize::MAX;
            }
            Ok(StepOutcome::Halted) => {
                self.status_message = "Program halted".to_string();
                self.log_scroll.offset = usize::MAX;
            }
            Err(e) => {
                self.status_message = format!("Error: {}", e);
                self.log_scroll.offset = usize::MAX;
            }
        }
    }
}
