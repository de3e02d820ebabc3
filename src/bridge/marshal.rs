//! Byte marshaling across the host/engine memory boundary
//!
//! The engine exposes a flat, growable linear memory. The host never holds a
//! view across engine calls: any call may grow (and thereby reallocate) the
//! region, so callers re-acquire the byte slice before every marshaling call
//! and pass it in here.

use crate::bridge::errors::DebugError;

/// Read a null-terminated UTF-8 string starting at `offset`.
///
/// The scan is bounded by the end of `view`; a region with no terminator is a
/// protocol mismatch, not an invitation to keep scanning.
pub fn read_cstring(view: &[u8], offset: usize) -> Result<&str, DebugError> {
    let region = view.get(offset..).ok_or(DebugError::OutOfBoundsRead {
        offset,
        size: view.len(),
    })?;

    let nul = region
        .iter()
        .position(|&b| b == 0)
        .ok_or(DebugError::OutOfBoundsRead {
            offset,
            size: view.len(),
        })?;

    std::str::from_utf8(&region[..nul]).map_err(|_| DebugError::InvalidUtf8 { offset })
}

/// Copy `bytes` into the region starting at `offset`.
///
/// The destination must already have been sized by an engine allocation call;
/// the only check here is that the copy stays inside the region.
pub fn write_bytes(view: &mut [u8], offset: usize, bytes: &[u8]) -> Result<(), DebugError> {
    let size = view.len();
    let dest = offset
        .checked_add(bytes.len())
        .and_then(|end| view.get_mut(offset..end))
        .ok_or(DebugError::OutOfBoundsWrite {
            offset,
            len: bytes.len(),
            size,
        })?;

    dest.copy_from_slice(bytes);
    Ok(())
}
