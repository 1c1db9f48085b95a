use crate::error::Result;
use crate::probability::BinMethod;
use crate::{DEFAULT_MASK_FILL_VALUE, DEFAULT_NUM_BINS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by geometry generation and logits binning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Bins per channel.
    pub num_bins: usize,
    /// Sentinel for masked cells.
    pub mask_fill_value: f32,
    /// Class prediction method for logits.
    pub method: BinMethod,
    /// Append the heavy/light chain delimiter column to model input.
    pub chain_delimiter: bool,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            num_bins: DEFAULT_NUM_BINS,
            mask_fill_value: DEFAULT_MASK_FILL_VALUE,
            method: BinMethod::default(),
            chain_delimiter: true,
        }
    }
}

impl GeometryConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
