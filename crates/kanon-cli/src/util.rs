//! Shared utility functions for CLI commands

use std::io::Read;
use std::path::Path;

use crate::error::Result;

/// Read a manifest from a file, or from stdin when the path is `-`
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }
    Ok(std::fs::read_to_string(path)?)
}

/// Human-readable name of an input for messages
pub fn input_name(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}
