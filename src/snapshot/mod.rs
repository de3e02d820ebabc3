//! Decoding of the engine's JSON snapshots into typed view models
//!
//! The engine produces two snapshot shapes on demand:
//!
//! - **program** — the static guest program structure
//!   (`{sections:[{section_type, content}]}`); decoded once per session by
//!   [`decode_program`] into an immutable [`ProgramSnapshot`].
//! - **state** — the dynamic interpreter state
//!   (`{current_position:[..], value_stack:[..]}`); re-decoded after every
//!   step by [`decode_state`] into a fresh [`StateSnapshot`], never cached.
//!
//! Both decoders validate shape at this boundary; everything downstream
//! (session, UI) works on the typed models only.

pub mod program;
pub mod state;

pub use program::{decode_program, FunctionBlock, Instruction, Local, Param, ProgramSnapshot};
pub use state::{decode_state, StackValue, StateSnapshot};

use serde::Deserialize;

/// The four numeric kinds the engine's value model knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum NumKind {
    I32,
    I64,
    F32,
    F64,
}

impl NumKind {
    /// Lowercase display name, as shown in the UI ("i32", "f64", ...).
    pub fn label(self) -> &'static str {
        match self {
            NumKind::I32 => "i32",
            NumKind::I64 => "i64",
            NumKind::F32 => "f32",
            NumKind::F64 => "f64",
        }
    }
}
