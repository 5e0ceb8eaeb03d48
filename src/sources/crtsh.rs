//! Certificate Transparency (crt.sh) response parsing.

use std::collections::HashSet;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;

/// One crt.sh JSON record. Only `common_name` is used.
#[derive(Debug, Deserialize)]
struct CrtShRecord {
    #[serde(default)]
    common_name: Option<Value>,
}

/// Parse a crt.sh JSON array, collecting distinct `common_name` values.
///
/// Records without a string `common_name` are skipped. A blank body is an
/// empty result; anything else that is not a JSON array is malformed.
pub fn parse(body: &[u8]) -> Result<HashSet<String>, ParseError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(HashSet::new());
    }

    let records: Vec<CrtShRecord> =
        serde_json::from_slice(body).map_err(|e| ParseError::Malformed(e.to_string()))?;

    Ok(records
        .into_iter()
        .filter_map(|record| match record.common_name {
            Some(Value::String(name)) => Some(name),
            _ => None,
        })
        .collect())
}
