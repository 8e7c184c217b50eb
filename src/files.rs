//! Reads a whole source file into a `String` for the cursor to consume —
//! the engine's input cursor owns the full text up front rather than
//! reading a line at a time, so there is no streaming reader to keep here.

use crate::error::ForthError;
use std::fs;
use std::path::Path;

pub fn read_source(path: impl AsRef<Path>) -> Result<String, ForthError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| ForthError::Host(format!("cannot read {}: {}", path.display(), e)))
}
