//! HackerTarget host search response parsing.
//!
//! The service answers with `host,ip` CSV lines, or a single plain-text
//! line when it refuses the query.

use std::collections::HashSet;

use crate::error::ParseError;

const UPSTREAM_ERROR_MARKERS: &[&str] = &["error", "api count exceeded"];

/// Parse `host,ip` lines, collecting distinct hosts.
pub fn parse(body: &[u8]) -> Result<HashSet<String>, ParseError> {
    let text = std::str::from_utf8(body).map_err(|e| ParseError::Malformed(e.to_string()))?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(HashSet::new());
    }

    let first_line = text.lines().next().unwrap_or_default().to_ascii_lowercase();
    if !first_line.contains(',')
        && UPSTREAM_ERROR_MARKERS.iter().any(|marker| first_line.starts_with(marker))
    {
        return Err(ParseError::Upstream(first_line));
    }

    Ok(text
        .lines()
        .filter_map(|line| line.split_once(','))
        .map(|(host, _)| host.trim())
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .collect())
}
