// Wordlist loading for directory guessing

use std::fs;
use std::path::Path;
use tracing::debug;

/// Load wordlist from file. Lines are trimmed; blank lines and `#` comments
/// are skipped. Order and duplicates are kept.
pub fn load_wordlist(path: &Path) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Error reading wordlist file {}: {}", path.display(), e))?;

    let words = parse_words(&content);
    if words.is_empty() {
        return Err(format!(
            "Wordlist {} is empty or contains only comments",
            path.display()
        ));
    }

    debug!("Loaded {} words from {}", words.len(), path.display());
    Ok(words)
}

pub fn parse_words(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
