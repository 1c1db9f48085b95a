use super::load_config;
use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use h3geo_core::{
    predict_classes, probabilities_from_logits, reconstruct, reconstruct_distances, BinMethod,
};
use std::collections::HashMap;

pub fn execute(
    input: String,
    output: String,
    method: Option<String>,
    config: Option<String>,
) -> Result<()> {
    let config = load_config(config.as_deref())?;
    let method = match method {
        Some(name) => BinMethod::parse(&name)?,
        None => config.method,
    };

    let mut inputs = candle_core::safetensors::load(&input, &Device::Cpu)?;
    let logits = inputs
        .remove("logits")
        .ok_or_else(|| anyhow!("{} has no `logits` tensor", input))?;

    let probabilities = probabilities_from_logits(&logits)?;
    let classes = predict_classes(&probabilities, method)?;
    let (outmats, num_bins) = (logits.dim(0)?, logits.dim(1)?);
    if num_bins != config.num_bins {
        log::warn!(
            "Logits have {} bins, config expects {}; using {}",
            num_bins,
            config.num_bins,
            num_bins
        );
    }

    let values = if outmats == 4 {
        reconstruct(&classes, num_bins)?
    } else {
        log::warn!(
            "Expected 4 output matrices, got {}; reconstructing distances only",
            outmats
        );
        reconstruct_distances(&classes.get(0)?, num_bins)?
    };

    let tensors: HashMap<String, Tensor> = [
        ("probabilities".to_string(), probabilities),
        ("classes".to_string(), classes),
        ("values".to_string(), values),
    ]
    .into();
    candle_core::safetensors::save(&tensors, &output)?;
    log::info!("Binned {} output matrices with `{}` into {}", outmats, method, output);
    Ok(())
}
