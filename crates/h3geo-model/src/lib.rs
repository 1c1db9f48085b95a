//! # h3geo-model
//!
//! Glue between sequence files, trained geometry predictors and the binning
//! routines in `h3geo-core`.
//!
//! A predictor is anything implementing [`LogitsModel`]; every `candle_nn::Module`
//! qualifies. Weights come from a safetensors [`ModelCheckpoint`] whose metadata
//! carries the architecture hyperparameters, and the caller's architecture is
//! instantiated through [`ModelBuilder`].
mod checkpoint;
mod input;

pub use self::checkpoint::{CheckpointConfig, ModelBuilder, ModelCheckpoint};
pub use self::input::{
    get_logits_from_model, get_probs_from_model, heavy_chain_length, load_full_seq,
    prepare_model_input, read_fasta, LogitsModel,
};
