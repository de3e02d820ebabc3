//! The engine bridge: typed access to the sandboxed execution engine
//!
//! The engine is an opaque wasm module with a fixed low-level contract: it
//! exports `malloc`, `load`, `next_instruction`, `get_program`,
//! `get_interpreter` and a linear `memory`, and imports a single synchronous
//! log callback (`env::_log`). This module wraps that contract:
//!
//! - **[`Engine`]** — the trait seam the step controller drives; tests supply
//!   a scripted implementation, production uses [`WasmEngine`].
//! - **[`wasm`]** — the wasmtime-backed [`WasmEngine`].
//! - **[`marshal`]** — raw byte marshaling over the shared linear memory.
//! - **[`errors`]** — the crate-wide [`DebugError`] taxonomy.

pub mod errors;
pub mod marshal;
pub mod wasm;

pub use errors::DebugError;
pub use wasm::WasmEngine;

/// Entry points the step controller needs from an execution engine.
///
/// Every call is blocking and synchronous; no two engine calls overlap. Any
/// failure is fatal to the debugging session.
pub trait Engine {
    /// Request `size` bytes inside engine memory; returns the start offset.
    fn allocate(&mut self, size: u32) -> Result<u32, DebugError>;

    /// Copy the guest program bytes into engine memory at `offset`.
    fn write_guest(&mut self, offset: u32, bytes: &[u8]) -> Result<(), DebugError>;

    /// Tell the engine to treat `[offset, offset+length)` as the guest program
    /// and prepare initial execution state.
    fn load(&mut self, offset: u32, length: u32) -> Result<(), DebugError>;

    /// Advance execution by exactly one instruction.
    fn step(&mut self) -> Result<(), DebugError>;

    /// Fetch the JSON description of the static program structure.
    fn introspect_program(&mut self) -> Result<String, DebugError>;

    /// Fetch the JSON description of the current interpreter state.
    fn introspect_state(&mut self) -> Result<String, DebugError>;
}
