//! Round-robin proxy rotation.

use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use crate::proxy_pool::endpoint::{ProxyAuth, ProxyEndpoint};

/// The pool is empty; callers proceed without a proxy.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no proxy configured")]
pub struct NoProxyConfigured;

/// Round-robin selector over an immutable proxy pool.
/// The cursor is the only mutable state and lives behind a mutex.
#[derive(Debug, Default)]
pub struct ProxyRotator {
    proxies: Vec<ProxyEndpoint>,
    cursor: Mutex<usize>,
}

impl ProxyRotator {
    pub fn new(proxies: Vec<ProxyEndpoint>) -> Self {
        Self {
            proxies,
            cursor: Mutex::new(0),
        }
    }

    /// Return the endpoint at the cursor and advance it by one, wrapping.
    pub fn next(&self) -> Result<(&ProxyEndpoint, Option<&ProxyAuth>), NoProxyConfigured> {
        if self.proxies.is_empty() {
            return Err(NoProxyConfigured);
        }

        let mut cursor = self.cursor.lock().unwrap_or_else(PoisonError::into_inner);
        let index = *cursor % self.proxies.len();
        *cursor = (index + 1) % self.proxies.len();
        drop(cursor);

        let endpoint = &self.proxies[index];
        Ok((endpoint, endpoint.auth.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.proxies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proxies.is_empty()
    }
}
