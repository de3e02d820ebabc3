//! # Introduction
//!
//! wasmstep hosts a sandboxed execution engine (an interpreter compiled to
//! WebAssembly), loads a guest program into the engine's linear memory, and
//! single-steps it from a terminal UI built with
//! [ratatui](https://docs.rs/ratatui). After every step the engine's internal
//! state is re-fetched as JSON and decoded into typed view models.
//!
//! ## Debugging pipeline
//!
//! ```text
//! Bytes → Engine Bridge → Marshaler → load → Step loop → Snapshot Decoder → TUI
//! ```
//!
//! 1. [`fetch`] — retrieves engine and guest bytes from a path or URL.
//! 2. [`bridge`] — instantiates the engine (wasmtime), wires the `_log`
//!    callback import, marshals bytes across the memory boundary, and exposes
//!    the engine's entry points behind the [`bridge::Engine`] trait.
//! 3. [`snapshot`] — decodes the two JSON snapshot shapes: the static
//!    [`snapshot::ProgramSnapshot`] (once per session) and the dynamic
//!    [`snapshot::StateSnapshot`] (after every step).
//! 4. [`session`] — the step controller: `Unloaded → Loaded → Stepping →
//!    Halted`, with the program snapshot memoized for the session.
//! 5. [`ui`] — ratatui-based TUI; not part of the stable library API.

pub mod bridge;
pub mod fetch;
pub mod session;
pub mod snapshot;
pub mod ui;
