//! Byte loader for engine modules and guest programs
//!
//! A source is either a filesystem path or an `http(s)://` URL; both resolve
//! to raw bytes or a [`DebugError::Fetch`].

use std::io::Read;

use crate::bridge::DebugError;

/// Fetch raw bytes from a path or URL.
pub fn fetch(source: &str) -> Result<Vec<u8>, DebugError> {
    if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source)
    } else {
        std::fs::read(source).map_err(|e| DebugError::Fetch {
            source: source.to_string(),
            message: e.to_string(),
        })
    }
}

fn fetch_url(url: &str) -> Result<Vec<u8>, DebugError> {
    let response = ureq::get(url).call().map_err(|e| DebugError::Fetch {
        source: url.to_string(),
        message: e.to_string(),
    })?;

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DebugError::Fetch {
            source: url.to_string(),
            message: e.to_string(),
        })?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_a_fetch_error() {
        assert!(matches!(
            fetch("/nonexistent/wasmstep/engine.wasm"),
            Err(DebugError::Fetch { .. })
        ));
    }
}
