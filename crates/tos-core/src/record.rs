//! Structured analysis results

use serde::{Deserialize, Deserializer, Serialize};

/// Analysis of a single chunk.
///
/// All four fields are always present. Missing keys and `null` values in the
/// model output deserialize to the empty default, so list fields are never
/// absent, only empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub red_flags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub financial_clauses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// Merged analysis of a whole document.
///
/// List fields never contain the same string twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub summary: String,
    pub red_flags: Vec<String>,
    pub financial_clauses: Vec<String>,
    pub recommendations: Vec<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
