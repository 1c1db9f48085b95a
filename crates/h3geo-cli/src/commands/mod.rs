pub mod bin;
pub mod encode;
pub mod geometry;
pub mod inspect;
pub mod pdb2fasta;

use anyhow::{Context, Result};
use h3geo_core::GeometryConfig;

pub(crate) fn load_config(path: Option<&str>) -> Result<GeometryConfig> {
    match path {
        Some(path) => GeometryConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config from {}", path)),
        None => Ok(GeometryConfig::default()),
    }
}
