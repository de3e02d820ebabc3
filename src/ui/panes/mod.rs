//! TUI pane rendering modules
//!
//! Each pane module exports a stateless `render_*` function plus its scroll
//! state type; the app owns the state and passes it in on every frame.
//!
//! - [`code`]: decoded program structure with the current instruction
//!   highlighted
//! - [`state`]: current position and value stack
//! - [`log`]: the diagnostic log surface
//! - [`status`]: status bar with session state and keybindings

pub mod code;
pub mod log;
pub mod state;
pub mod status;

pub use code::{render_code_pane, CodeScrollState};
pub use log::{render_log_pane, LogScrollState};
pub use state::{render_state_pane, StateScrollState};
pub use status::render_status_bar;
