use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(filename: &str, content: &str) -> std::io::Result<()> {
    let path = Path::new(filename);
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

/// Read a JSON document (style, filter rows) from disk
pub fn read_json_file<T: DeserializeOwned>(filename: &str) -> Result<T> {
    let content = std::fs::read_to_string(filename)
        .with_context(|| format!("Failed to read {}", filename))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", filename))
}
