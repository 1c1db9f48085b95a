//! Batch padding and band fills for pairwise matrices.
use crate::error::{H3Error, Result};
use candle_core::{Device, Tensor};
use std::str::FromStr;
use strum::{Display, EnumString};

/// Region of a matrix filled relative to a diagonal offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum FillMethod {
    /// Columns `[0, i - k]` of row `i`.
    Below,
    /// Columns `[i - k, n)` of row `i`.
    Above,
    /// The band `[i - k, i + k]` around the main diagonal.
    Between,
    /// Everything farther than `k - 1` from the main diagonal, on both sides.
    Symmetric,
}

impl FillMethod {
    pub fn parse(name: &str) -> Result<Self> {
        FillMethod::from_str(name).map_err(|_| {
            H3Error::invalid(format!(
                "{} is an invalid fill method, expected one of below, above, symmetric, between",
                name
            ))
        })
    }
}

/// Element-wise maximum of the shapes of `tensors`.
pub fn max_shape(tensors: &[Tensor]) -> Result<Vec<usize>> {
    let first = tensors
        .first()
        .ok_or_else(|| H3Error::invalid("max_shape of an empty tensor list"))?;
    let mut shape = first.dims().to_vec();
    for tensor in &tensors[1..] {
        if tensor.rank() != shape.len() {
            return Err(H3Error::shape(
                format!("rank {} tensor", shape.len()),
                tensor.dims(),
            ));
        }
        for (max, &dim) in shape.iter_mut().zip(tensor.dims()) {
            *max = (*max).max(dim);
        }
    }
    Ok(shape)
}

/// Right-pad every tensor with `pad_value` to the common max shape and stack them.
pub fn pad_to_same_shape(tensors: &[Tensor], pad_value: f32) -> Result<Tensor> {
    let target = max_shape(tensors)?;
    let padded = tensors
        .iter()
        .map(|tensor| {
            let mut padded = tensor.clone();
            for (axis, &size) in target.iter().enumerate() {
                let missing = size - padded.dim(axis)?;
                if missing == 0 {
                    continue;
                }
                let mut pad_shape = padded.dims().to_vec();
                pad_shape[axis] = missing;
                let pad = Tensor::full(pad_value, pad_shape, padded.device())?
                    .to_dtype(padded.dtype())?;
                padded = Tensor::cat(&[&padded, &pad], axis)?;
            }
            Ok(padded)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Tensor::stack(&padded, 0)?)
}

fn row_bounds(method: FillMethod, row: i64, k: i64, n: i64) -> (i64, i64) {
    match method {
        FillMethod::Below => (0, n.min((row - k + 1).max(0))),
        FillMethod::Above => (n.min((row - k).max(0)), n),
        // symmetric is expressed through `between`
        FillMethod::Between | FillMethod::Symmetric => {
            (n.min((row - k).max(0)), n.min(row + k + 1))
        }
    }
}

fn fill_mask(rows: usize, cols: usize, k: i64, method: FillMethod) -> Vec<u8> {
    if method == FillMethod::Symmetric {
        return fill_mask(rows, cols, k - 1, FillMethod::Between)
            .into_iter()
            .map(|v| 1 - v)
            .collect();
    }
    let mut mask = vec![0u8; rows * cols];
    for row in 0..rows {
        let (left, right) = row_bounds(method, row as i64, k, rows as i64);
        let left = left.clamp(0, cols as i64) as usize;
        let right = right.clamp(0, cols as i64) as usize;
        for col in left..right.max(left) {
            mask[row * cols + col] = 1;
        }
    }
    mask
}

/// Copy of `matrix` with the region selected by `method` around diagonal offset
/// `diagonal_index` set to `fill_value`. Row bounds are clamped to the row count.
pub fn fill_diagonally(
    matrix: &Tensor,
    diagonal_index: i64,
    fill_value: f32,
    method: FillMethod,
) -> Result<Tensor> {
    let (rows, cols) = matrix.dims2()?;
    let device: &Device = matrix.device();
    let mask = fill_mask(rows, cols, diagonal_index, method);
    let mask = Tensor::from_vec(mask, (rows, cols), device)?;
    let fill = Tensor::full(fill_value, (rows, cols), device)?.to_dtype(matrix.dtype())?;
    Ok(mask.where_cond(&fill, matrix)?)
}
