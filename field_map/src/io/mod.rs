//! File input and output helpers for persisted map data.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

pub mod points;

/// Reads a file to string.
pub fn read_to_string(path: &Path) -> io::Result<String> {
    let mut buffer = String::new();
    File::open(path)?.read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Writes a string to a file, replacing any prior contents.
pub fn write_string(path: &Path, contents: &str) -> io::Result<()> {
    File::create(path)?.write_all(contents.as_bytes())
}
