//! Response parsing strategies, one per source kind.

use std::collections::HashSet;
use std::fmt;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::sources::{crtsh, hackertarget};

/// How a source's raw response body turns into subdomain names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// JSON array of certificate records with a `common_name` field.
    CrtSh,
    /// `host,ip` CSV lines.
    HackerTarget,
}

impl ParseStrategy {
    /// Parse a body into a set of names. Pure; no I/O.
    pub fn parse(&self, body: &[u8]) -> Result<HashSet<String>, ParseError> {
        match self {
            ParseStrategy::CrtSh => crtsh::parse(body),
            ParseStrategy::HackerTarget => hackertarget::parse(body),
        }
    }
}

impl fmt::Display for ParseStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseStrategy::CrtSh => write!(f, "crt_sh"),
            ParseStrategy::HackerTarget => write!(f, "hacker_target"),
        }
    }
}
