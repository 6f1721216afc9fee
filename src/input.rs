// Domain list input - one hostname per line

use crate::Result;
use std::fs;
use std::path::Path;

/// Load the domain list from a text file.
///
/// Lines are trimmed; blank lines and `#` comments are dropped. A missing
/// file is a startup error, not a per-domain one.
pub fn load_domains<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
        anyhow::anyhow!("Failed to read domains file {:?}: {}", path.as_ref(), e)
    })?;

    Ok(parse_domains(&contents))
}

/// Parse domain names from text, preserving file order.
pub fn parse_domains(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
