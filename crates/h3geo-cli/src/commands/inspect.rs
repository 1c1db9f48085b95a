use anyhow::Result;
use candle_core::Device;
use h3geo_model::ModelCheckpoint;

pub fn execute(checkpoint: String) -> Result<()> {
    let checkpoint = ModelCheckpoint::load(&checkpoint, &Device::Cpu)?;
    println!("{}", serde_json::to_string_pretty(checkpoint.config())?);
    for name in checkpoint.tensor_names() {
        log::debug!("tensor {}", name);
    }
    Ok(())
}
