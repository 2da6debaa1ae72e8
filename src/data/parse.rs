use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawRecord {
    #[serde(default, rename = "Name")]
    pub(super) name: String,
    #[serde(default, rename = "Type")]
    pub(super) kind: String,
    #[serde(default, rename = "Designtechs")]
    pub(super) designtechs: Vec<String>,
    #[serde(default, rename = "Interoperability")]
    pub(super) interoperability: String,
    #[serde(default, rename = "Description")]
    pub(super) description: String,
    #[serde(default, rename = "Website")]
    pub(super) website: String,
}

pub(super) fn parse_records(raw: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(raw).context("invalid dataset JSON; expected an array of records")
}

/// Splits a comma-delimited field into trimmed, non-empty tokens.
pub(crate) fn split_tokens(field: &str) -> Vec<String> {
    field
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
