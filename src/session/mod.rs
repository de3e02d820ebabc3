//! The debugging session: one guest program, one engine, one state machine
//!
//! [`DebugSession`] owns the engine handle and the decoded view models, and
//! drives one debugging turn per external trigger:
//!
//! ```text
//! Unloaded → Loaded → Stepping (self-loop) → Halted
//!                 \────────────┴──────────→ Failed
//! ```
//!
//! The program snapshot is decoded once per session and memoized; the state
//! snapshot is re-fetched and re-decoded after every step. There is no retry
//! logic anywhere: every bridge failure is fatal and reported through the
//! log sink, and a failure mid-session moves the machine to `Failed`, a
//! terminal state in which the engine is never re-entered.

use std::cell::RefCell;
use std::rc::Rc;

use crate::bridge::{DebugError, Engine};
use crate::snapshot::{decode_program, decode_state, ProgramSnapshot, StateSnapshot};

/// Single diagnostic surface: fed by the engine's `_log` callback and by the
/// bridge itself, drained by the log pane.
pub type LogSink = Rc<RefCell<Vec<String>>>;

pub fn new_log_sink() -> LogSink {
    Rc::new(RefCell::new(Vec::new()))
}

/// Lifecycle of a debugging session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unloaded,
    Loaded,
    Stepping,
    Halted,
    /// A bridge or decode failure invalidated the session; terminal.
    Failed,
}

impl SessionState {
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Unloaded => "UNLOADED",
            SessionState::Loaded => "LOADED",
            SessionState::Stepping => "STEPPING",
            SessionState::Halted => "HALTED",
            SessionState::Failed => "FAILED",
        }
    }
}

/// Result of one step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Execution advanced and the view models were refreshed.
    Stepped,
    /// The session is in a terminal state (halted or failed) and the request
    /// was a no-op.
    Halted,
}

/// Owns the engine handle, the memoized program snapshot and the latest state
/// snapshot for one debugging session.
pub struct DebugSession<E: Engine> {
    engine: E,
    state: SessionState,
    program: Option<ProgramSnapshot>,
    latest: Option<StateSnapshot>,
    steps: usize,
    log: LogSink,
}

impl<E: Engine> DebugSession<E> {
    pub fn new(engine: E, log: LogSink) -> Self {
        DebugSession {
            engine,
            state: SessionState::Unloaded,
            program: None,
            latest: None,
            steps: 0,
            log,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Access the underlying engine (tests assert on call counts through
    /// this).
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Successful steps taken so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The memoized program snapshot; `None` before a successful load.
    pub fn program(&self) -> Option<&ProgramSnapshot> {
        self.program.as_ref()
    }

    /// The latest decoded state snapshot; `None` before a successful load.
    pub fn latest_state(&self) -> Option<&StateSnapshot> {
        self.latest.as_ref()
    }

    /// The `(function, instruction)` pair to highlight, if the current
    /// position locates inside the program snapshot.
    pub fn highlight(&self) -> Option<(usize, usize)> {
        self.latest.as_ref()?.locate(self.program.as_ref()?)
    }

    /// Copy the guest program into engine memory, ask the engine to load it,
    /// and establish the initial view models.
    ///
    /// On any failure the session stays `Unloaded` and nothing is cached.
    pub fn load(&mut self, guest: &[u8]) -> Result<(), DebugError> {
        match self.try_load(guest) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.report(&e);
                Err(e)
            }
        }
    }

    fn try_load(&mut self, guest: &[u8]) -> Result<(), DebugError> {
        let length = u32::try_from(guest.len()).map_err(|_| DebugError::Load {
            status: 0,
            message: "guest program exceeds the engine's address space".to_string(),
        })?;

        let offset = self.engine.allocate(length)?;
        self.engine.write_guest(offset, guest)?;
        self.engine.load(offset, length)?;

        let text = self.engine.introspect_program()?;
        let program = decode_program(&text)?;
        let text = self.engine.introspect_state()?;
        let state = decode_state(&text)?;

        self.state = if state.locate(&program).is_some() {
            SessionState::Loaded
        } else {
            SessionState::Halted
        };
        self.program = Some(program);
        self.latest = Some(state);
        Ok(())
    }

    /// Advance execution by one instruction and refresh the state snapshot.
    ///
    /// A no-op in `Halted` and `Failed`; an error in `Unloaded`. Any failure
    /// mid-session leaves the previously decoded snapshot in place and moves
    /// the session to `Failed` - the engine is not re-entered afterwards.
    pub fn step(&mut self) -> Result<StepOutcome, DebugError> {
        match self.state {
            SessionState::Unloaded => {
                let e = DebugError::NotLoaded;
                self.report(&e);
                Err(e)
            }
            SessionState::Halted | SessionState::Failed => Ok(StepOutcome::Halted),
            SessionState::Loaded | SessionState::Stepping => match self.try_step() {
                Ok(outcome) => Ok(outcome),
                Err(e) => {
                    self.state = SessionState::Failed;
                    self.report(&e);
                    Err(e)
                }
            },
        }
    }

    fn try_step(&mut self) -> Result<StepOutcome, DebugError> {
        self.engine.step()?;
        let text = self.engine.introspect_state()?;
        // Decode into a local first so a malformed snapshot cannot partially
        // overwrite the previous view model.
        let state = decode_state(&text)?;
        self.steps += 1;

        let located = self
            .program
            .as_ref()
            .is_some_and(|program| state.locate(program).is_some());
        self.latest = Some(state);

        if located {
            self.state = SessionState::Stepping;
            Ok(StepOutcome::Stepped)
        } else {
            self.state = SessionState::Halted;
            Ok(StepOutcome::Halted)
        }
    }

    fn report(&self, error: &DebugError) {
        self.log.borrow_mut().push(error.to_string());
    }
}
