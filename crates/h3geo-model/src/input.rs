use anyhow::{bail, Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::Module;
use h3geo_core::{probabilities_from_logits, SequenceEncoder};
use h3geo_io::parse_fasta;
use std::path::Path;

/// A trained predictor mapping `(batch, channels, len)` encoded sequences to
/// `(batch, outmats, bins, len, len)` logits.
pub trait LogitsModel {
    fn logits(&self, input: &Tensor) -> Result<Tensor>;
}

impl<M: Module> LogitsModel for M {
    fn logits(&self, input: &Tensor) -> Result<Tensor> {
        Ok(self.forward(input)?)
    }
}

pub fn read_fasta(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// All sequence lines of a FASTA file joined together, chains in file order.
pub fn load_full_seq(fasta: &str) -> String {
    fasta
        .lines()
        .filter(|line| !line.starts_with('>'))
        .map(str::trim_end)
        .collect()
}

/// Length of the heavy chain, the record whose id contains `:H`. Zero if absent.
pub fn heavy_chain_length(fasta: &str) -> usize {
    parse_fasta(fasta)
        .iter()
        .filter(|record| record.id.contains(":H"))
        .last()
        .map(|record| record.sequence.len())
        .unwrap_or(0)
}

/// One-hot encode a FASTA file's full sequence as `(1, channels, len)`.
///
/// With `chain_delimiter` an extra channel is appended that is 1 only at the
/// last heavy-chain residue.
pub fn prepare_model_input(fasta: &str, chain_delimiter: bool, device: &Device) -> Result<Tensor> {
    let encoder = SequenceEncoder::default();
    let mut seq = encoder.one_hot(&load_full_seq(fasta), device)?;
    if chain_delimiter {
        let h_len = heavy_chain_length(fasta);
        if h_len == 0 {
            bail!("No heavy chain detected. Cannot add chain delimiter");
        }
        let len = seq.dim(0)?;
        if h_len > len {
            bail!(
                "Heavy chain length {} exceeds the encoded sequence length {}",
                h_len,
                len
            );
        }
        let mut delimiter = vec![0f32; len];
        delimiter[h_len - 1] = 1.0;
        let delimiter = Tensor::from_vec(delimiter, (len, 1), device)?;
        seq = Tensor::cat(&[&seq, &delimiter], 1)?;
    }
    Ok(seq.unsqueeze(0)?.transpose(1, 2)?.contiguous()?)
}

/// Logits `(outmats, bins, len, len)` for the sequence in `fasta`.
pub fn get_logits_from_model(
    model: &impl LogitsModel,
    fasta: &str,
    chain_delimiter: bool,
    device: &Device,
) -> Result<Tensor> {
    let input = prepare_model_input(fasta, chain_delimiter, device)?;
    log::debug!("model input shape {:?}", input.dims());
    let logits = model.logits(&input)?;
    Ok(logits.get(0)?)
}

/// Per-pair bin probabilities `(outmats, len, len, bins)` for the sequence in `fasta`.
pub fn get_probs_from_model(
    model: &impl LogitsModel,
    fasta: &str,
    chain_delimiter: bool,
    device: &Device,
) -> Result<Tensor> {
    let logits = get_logits_from_model(model, fasta, chain_delimiter, device)?;
    Ok(probabilities_from_logits(&logits)?)
}
