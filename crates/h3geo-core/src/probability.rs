//! Logits to per-pair bin probabilities and predicted classes.
use crate::error::{H3Error, Result};
use candle_core::{DType, Tensor, D};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumString};

/// How a probability distribution over bins is collapsed to a class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BinMethod {
    /// Most probable bin.
    #[default]
    Max,
    /// Expected bin index, rounded.
    Avg,
}

impl BinMethod {
    pub fn parse(name: &str) -> Result<Self> {
        BinMethod::from_str(name).map_err(|_| {
            H3Error::invalid(format!(
                "unknown binning method '{}', expected 'max' or 'avg'",
                name
            ))
        })
    }
}

/// Softmax over the bin axis of `(outmats, bins, n, n)` logits.
///
/// The bin axis is moved last, so the output is `(outmats, n, n, bins)`.
pub fn probabilities_from_logits(logits: &Tensor) -> Result<Tensor> {
    if logits.rank() != 4 {
        return Err(H3Error::shape(
            "(outmats, bins, n, n) logits",
            logits.dims(),
        ));
    }
    let logits = logits
        .to_dtype(DType::F32)?
        .transpose(1, 2)?
        .transpose(2, 3)?
        .contiguous()?;
    Ok(candle_nn::ops::softmax(&logits, D::Minus1)?)
}

/// Collapse the last (bin) axis of `probabilities` to i64 class indices.
pub fn predict_classes(probabilities: &Tensor, method: BinMethod) -> Result<Tensor> {
    let probabilities = probabilities.to_dtype(DType::F32)?;
    let classes = match method {
        BinMethod::Max => probabilities.argmax(D::Minus1)?,
        BinMethod::Avg => {
            let num_bins = probabilities.dim(D::Minus1)?;
            let indices = Tensor::arange(0f32, num_bins as f32, probabilities.device())?;
            probabilities
                .broadcast_mul(&indices)?
                .sum(D::Minus1)?
                .round()?
        }
    };
    Ok(classes.to_dtype(DType::I64)?)
}

/// Predicted classes for logits (`are_logits`) or already-normalized probabilities.
pub fn bin_matrix(tensor: &Tensor, are_logits: bool, method: BinMethod) -> Result<Tensor> {
    let probabilities = if are_logits {
        probabilities_from_logits(tensor)?
    } else {
        tensor.clone()
    };
    predict_classes(&probabilities, method)
}
