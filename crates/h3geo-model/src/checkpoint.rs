//! Safetensors checkpoints for geometry predictors.
//!
//! Weights are stored as ordinary safetensors tensors. Architecture
//! hyperparameters live in the string metadata of the header:
//!
//! | key            | default                      |
//! |----------------|------------------------------|
//! | `num_blocks1D` | 3                            |
//! | `num_blocks2D` | 25                           |
//! | `dilation_cycle` | 0                          |
//! | `in_layer`     | first tensor in storage order |
//! | `out_layer`    | last tensor in storage order  |
//!
//! The input width is dim 1 of the input layer and the number of output bins
//! is dim 0 of the output layer.
use anyhow::{anyhow, bail, Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const DEFAULT_NUM_BLOCKS_1D: usize = 3;
const DEFAULT_NUM_BLOCKS_2D: usize = 25;
const DEFAULT_DILATION_CYCLE: usize = 0;

/// Architecture hyperparameters recovered from a checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckpointConfig {
    pub in_planes: usize,
    pub num_out_bins: usize,
    pub num_blocks_1d: usize,
    pub num_blocks_2d: usize,
    pub dilation_cycle: usize,
    pub in_layer: String,
    pub out_layer: String,
}

/// Builds a concrete architecture from checkpoint weights.
pub trait ModelBuilder: Sized {
    fn build(config: &CheckpointConfig, vb: VarBuilder) -> Result<Self>;
}

pub struct ModelCheckpoint {
    path: PathBuf,
    config: CheckpointConfig,
    tensors: HashMap<String, Tensor>,
    device: Device,
}

fn metadata_usize(metadata: &HashMap<String, String>, key: &str, default: usize) -> Result<usize> {
    match metadata.get(key) {
        Some(value) => value
            .trim()
            .parse::<usize>()
            .with_context(|| format!("Checkpoint metadata {} is not an integer: {}", key, value)),
        None => Ok(default),
    }
}

impl ModelCheckpoint {
    pub fn load(path: impl AsRef<Path>, device: &Device) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            bail!("No file at {}", path.display());
        }
        let buffer =
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let (_, header) = SafeTensors::read_metadata(&buffer)
            .with_context(|| format!("Invalid safetensors header in {}", path.display()))?;
        let metadata = header.metadata().clone().unwrap_or_default();

        let mut layers: Vec<(String, Vec<usize>, usize)> = header
            .tensors()
            .into_iter()
            .map(|(name, info)| (name, info.shape.clone(), info.data_offsets.0))
            .collect();
        layers.sort_by(|a, b| a.2.cmp(&b.2).then_with(|| a.0.cmp(&b.0)));
        if layers.is_empty() {
            bail!("Checkpoint {} contains no tensors", path.display());
        }

        let in_layer = match metadata.get("in_layer") {
            Some(name) => name.clone(),
            None => layers[0].0.clone(),
        };
        let out_layer = match metadata.get("out_layer") {
            Some(name) => name.clone(),
            None => layers[layers.len() - 1].0.clone(),
        };
        let shape_of = |name: &str| -> Result<&Vec<usize>> {
            layers
                .iter()
                .find(|(layer, _, _)| layer == name)
                .map(|(_, shape, _)| shape)
                .ok_or_else(|| anyhow!("Layer {} not found in {}", name, path.display()))
        };
        let in_planes = *shape_of(&in_layer)?
            .get(1)
            .ok_or_else(|| anyhow!("Input layer {} has rank < 2", in_layer))?;
        let num_out_bins = *shape_of(&out_layer)?
            .first()
            .ok_or_else(|| anyhow!("Output layer {} is a scalar", out_layer))?;

        let config = CheckpointConfig {
            in_planes,
            num_out_bins,
            num_blocks_1d: metadata_usize(&metadata, "num_blocks1D", DEFAULT_NUM_BLOCKS_1D)?,
            num_blocks_2d: metadata_usize(&metadata, "num_blocks2D", DEFAULT_NUM_BLOCKS_2D)?,
            dilation_cycle: metadata_usize(&metadata, "dilation_cycle", DEFAULT_DILATION_CYCLE)?,
            in_layer,
            out_layer,
        };
        let tensors = candle_core::safetensors::load_buffer(&buffer, device)?;
        log::info!(
            "Loaded {} tensors from {} ({} input planes, {} output bins)",
            tensors.len(),
            path.display(),
            config.in_planes,
            config.num_out_bins
        );

        Ok(Self {
            path: path.to_path_buf(),
            config,
            tensors,
            device: device.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &CheckpointConfig {
        &self.config
    }

    pub fn tensor_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tensors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn var_builder(&self, dtype: DType) -> VarBuilder<'static> {
        VarBuilder::from_tensors(self.tensors.clone(), dtype, &self.device)
    }

    /// Instantiate `M` with this checkpoint's weights in f32.
    pub fn build<M: ModelBuilder>(&self) -> Result<M> {
        M::build(&self.config, self.var_builder(DType::F32))
    }
}
