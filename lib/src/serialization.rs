//! Byte codecs for artifact bundles.
//!
//! Fitted components are persisted as plain serde data (class lists, tree
//! nodes, weight vectors), never as live lookup tables. The binary codec is
//! bincode; JSON is available for artifacts that need to be inspected or
//! edited by hand.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// On-disk encoding of an artifact bundle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArtifactFormat {
    /// Compact binary bundle.
    #[default]
    Bincode,
    /// Human-readable bundle.
    Json,
}

impl ArtifactFormat {
    /// Pick the format from a file extension: `.json` is JSON, anything else is bincode.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ArtifactFormat::Json,
            _ => ArtifactFormat::Bincode,
        }
    }

    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, String> {
        match self {
            ArtifactFormat::Bincode => bincode::serialize(value).map_err(|e| e.to_string()),
            ArtifactFormat::Json => serde_json::to_vec_pretty(value).map_err(|e| e.to_string()),
        }
    }

    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, String> {
        match self {
            ArtifactFormat::Bincode => bincode::deserialize(bytes).map_err(|e| e.to_string()),
            ArtifactFormat::Json => serde_json::from_slice(bytes).map_err(|e| e.to_string()),
        }
    }
}
