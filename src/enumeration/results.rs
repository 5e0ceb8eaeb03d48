//! Shared result set guarded by the aggregation lock.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Canonical form of a discovered name, or `None` if nothing is left.
pub fn normalize(name: &str) -> Option<String> {
    let name = name.trim().trim_end_matches('.').to_ascii_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Deduplicated subdomains for one enumeration call.
#[derive(Debug, Default)]
pub struct ResultSet {
    names: Mutex<HashSet<String>>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one source's names atomically. Returns how many were new.
    pub fn merge<I>(&self, names: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let normalized: Vec<String> = names.into_iter().filter_map(|n| normalize(&n)).collect();

        let mut set = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        normalized.into_iter().filter(|n| set.insert(n.clone())).count()
    }

    pub fn len(&self) -> usize {
        self.names.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy out the names, sorted for stable presentation.
    pub fn snapshot(&self) -> Vec<String> {
        let set = self.names.lock().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = set.iter().cloned().collect();
        drop(set);
        names.sort();
        names
    }
}
