use super::load_config;
use anyhow::Result;
use candle_core::{Device, Tensor};
use h3geo_core::discretize;
use h3geo_io::{CoordinateProvider, ResidueCoordinates};
use std::collections::HashMap;

pub fn execute(input: String, output: String, config: Option<String>) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let device = Device::Cpu;

    let residues = ResidueCoordinates::from_file(&input)?;
    log::info!("Read {} residues from {}", residues.len(), input);

    let geometry = residues.dist_angle_matrix(None, config.mask_fill_value, &device)?;
    let binned = discretize(&geometry, config.num_bins)?;

    let tensors: HashMap<String, Tensor> = [
        ("geometry".to_string(), geometry),
        ("binned".to_string(), binned),
    ]
    .into();
    candle_core::safetensors::save(&tensors, &output)?;
    log::info!("Wrote geometry and {}-bin classes to {}", config.num_bins, output);
    Ok(())
}
