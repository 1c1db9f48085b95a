use super::load_config;
use anyhow::Result;
use candle_core::{Device, Tensor};
use h3geo_model::{prepare_model_input, read_fasta};
use std::collections::HashMap;

pub fn execute(
    input: String,
    output: String,
    no_chain_delimiter: bool,
    config: Option<String>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let chain_delimiter = config.chain_delimiter && !no_chain_delimiter;

    let fasta = read_fasta(&input)?;
    let encoded = prepare_model_input(&fasta, chain_delimiter, &Device::Cpu)?;
    log::info!(
        "Encoded {} residues from {} into {} channels",
        encoded.dim(2)?,
        input,
        encoded.dim(1)?
    );

    let tensors: HashMap<String, Tensor> = [("input".to_string(), encoded)].into();
    candle_core::safetensors::save(&tensors, &output)?;
    log::info!("Wrote model input to {}", output);
    Ok(())
}
