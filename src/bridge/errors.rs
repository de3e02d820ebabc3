//! Error types for the debugging bridge
//!
//! This module defines [`DebugError`], which represents every failure that can
//! occur between fetching raw bytes and rendering a decoded snapshot.
//!
//! All bridge errors are fatal - there is no retry anywhere in the session, and
//! every failure is reported through the log sink and the status line.

use std::fmt;

/// Errors raised by the byte loader, the engine bridge, the memory marshaler
/// and the snapshot decoder
#[derive(Debug, Clone)]
pub enum DebugError {
    /// Byte retrieval failed (filesystem or HTTP transport)
    Fetch { source: String, message: String },

    /// The engine module bytes were malformed, or a required export was missing
    Instantiation { message: String },

    /// The engine reported failure allocating guest program space
    Allocation { size: u32, message: String },

    /// The engine rejected the guest program
    Load { status: u32, message: String },

    /// A null-terminator scan ran past the end of engine memory
    OutOfBoundsRead { offset: usize, size: usize },

    /// A byte copy would have run past the end of engine memory
    OutOfBoundsWrite {
        offset: usize,
        len: usize,
        size: usize,
    },

    /// Bytes pulled out of engine memory were not valid UTF-8
    InvalidUtf8 { offset: usize },

    /// A JSON snapshot violated the engine's wire contract
    MalformedSnapshot { message: String },

    /// A step was requested before a guest program was loaded
    NotLoaded,

    /// An engine entry point trapped
    EngineCall {
        entry_point: &'static str,
        message: String,
    },
}

impl fmt::Display for DebugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugError::Fetch { source, message } => {
                write!(f, "Failed to fetch '{}': {}", source, message)
            }
            DebugError::Instantiation { message } => {
                write!(f, "Failed to instantiate engine: {}", message)
            }
            DebugError::Allocation { size, message } => {
                write!(f, "Engine allocation of {} bytes failed: {}", size, message)
            }
            DebugError::Load { status, message } => {
                if message.is_empty() {
                    write!(f, "Engine rejected guest program (status {})", status)
                } else {
                    write!(
                        f,
                        "Engine rejected guest program (status {}): {}",
                        status, message
                    )
                }
            }
            DebugError::OutOfBoundsRead { offset, size } => {
                write!(
                    f,
                    "No null terminator from offset {} within {} bytes of engine memory",
                    offset, size
                )
            }
            DebugError::OutOfBoundsWrite { offset, len, size } => {
                write!(
                    f,
                    "Write of {} bytes at offset {} exceeds engine memory of {} bytes",
                    len, offset, size
                )
            }
            DebugError::InvalidUtf8 { offset } => {
                write!(f, "Invalid UTF-8 in engine memory at offset {}", offset)
            }
            DebugError::MalformedSnapshot { message } => {
                write!(f, "Malformed snapshot: {}", message)
            }
            DebugError::NotLoaded => {
                write!(f, "Step requested before a guest program was loaded")
            }
            DebugError::EngineCall {
                entry_point,
                message,
            } => {
                write!(f, "Engine call '{}' trapped: {}", entry_point, message)
            }
        }
    }
}

impl std::error::Error for DebugError {}
