//! Memory state files.
//!
//! The CLI persists memory as the pretty-printed JSON snapshot produced by
//! `HierarchicalMemory::to_value`.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read a state file. Returns `None` when the file does not exist.
pub fn load(path: &Path) -> Result<Option<Value>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    let value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse state file {}", path.display()))?;
    Ok(Some(value))
}

/// Write a state file, creating parent directories as needed.
pub fn save(path: &Path, snapshot: &Value) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).context("Failed to create state directory")?;
    }

    let content = serde_json::to_string_pretty(snapshot).context("Failed to serialize memory")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write state file {}", path.display()))?;
    Ok(())
}
