//! Residue masks.
//!
//! A residue is usable when its mask bit is set. Pairwise cells are usable only
//! when both residues are; everything else is overwritten with a sentinel.
use crate::error::{H3Error, Result};
use candle_core::{DType, Device, Tensor};

/// Presence test for atom coordinates.
///
/// Missing atoms are stored as the zero vector, so an atom counts as present when
/// its components do not sum to zero. An atom sitting exactly on the origin (or on
/// the `x + y + z = 0` plane) is reported missing.
pub fn coordinate_presence(coords: &[[f32; 3]]) -> Vec<bool> {
    coords.iter().map(|[x, y, z]| x + y + z != 0.0).collect()
}

/// `[n, n]` u8 mask with `pairwise[i, j] = mask[i] && mask[j]`.
pub fn pairwise_mask(mask: &[bool], device: &Device) -> Result<Tensor> {
    let n = mask.len();
    let m = Tensor::from_iter(mask.iter().map(|&v| u8::from(v)), device)?;
    let pairwise = m
        .unsqueeze(1)?
        .broadcast_mul(&m.unsqueeze(0)?)?
        .contiguous()?;
    debug_assert_eq!(pairwise.dims(), &[n, n]);
    Ok(pairwise)
}

/// Replace every cell of `matrix` whose pairwise mask is zero with `fill_value`.
pub fn apply_pairwise_mask(matrix: &Tensor, pairwise: &Tensor, fill_value: f32) -> Result<Tensor> {
    if matrix.dims() != pairwise.dims() {
        return Err(H3Error::shape(
            format!("mask of shape {:?}", matrix.dims()),
            pairwise.dims(),
        ));
    }
    let fill = Tensor::full(fill_value, matrix.dims(), matrix.device())?.to_dtype(matrix.dtype())?;
    let pairwise = if pairwise.dtype() == DType::U8 {
        pairwise.clone()
    } else {
        pairwise.to_dtype(DType::F32)?.ne(0f32)?
    };
    Ok(pairwise.where_cond(matrix, &fill)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_coordinate_presence() {
        let coords = [[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [0.0, 0.0, 0.5], [1.0, -1.0, 0.0]];
        // the last atom is real but sums to zero
        assert_eq!(coordinate_presence(&coords), vec![false, true, true, false]);
    }

    #[test]
    fn test_pairwise_mask_values() {
        let device = Device::Cpu;
        let pairwise = pairwise_mask(&[true, true, false, false, true], &device).unwrap();
        let rows: Vec<Vec<u8>> = pairwise.to_vec2().unwrap();
        assert_eq!(rows[0], vec![1, 1, 0, 0, 1]);
        assert_eq!(rows[2], vec![0, 0, 0, 0, 0]);
        assert_eq!(rows[4], vec![1, 1, 0, 0, 1]);
    }

    #[test]
    fn test_pairwise_mask_is_symmetric() {
        let device = Device::Cpu;
        let mut rng = StdRng::seed_from_u64(11);
        for n in 1..20 {
            let mask: Vec<bool> = (0..n).map(|_| rng.gen_bool(0.7)).collect();
            let rows: Vec<Vec<u8>> = pairwise_mask(&mask, &device).unwrap().to_vec2().unwrap();
            for i in 0..n {
                for j in 0..n {
                    assert_eq!(rows[i][j], rows[j][i]);
                    assert_eq!(rows[i][j] == 1, mask[i] && mask[j]);
                }
            }
        }
    }

    #[test]
    fn test_apply_pairwise_mask() {
        let device = Device::Cpu;
        let matrix = Tensor::new(&[[1f32, 2.0], [3.0, f32::NAN]], &device).unwrap();
        let pairwise = pairwise_mask(&[true, false], &device).unwrap();
        let masked: Vec<Vec<f32>> = apply_pairwise_mask(&matrix, &pairwise, -1.0)
            .unwrap()
            .to_vec2()
            .unwrap();
        assert_eq!(masked, vec![vec![1.0, -1.0], vec![-1.0, -1.0]]);

        let wrong = pairwise_mask(&[true, false, true], &device).unwrap();
        assert!(matches!(
            apply_pairwise_mask(&matrix, &wrong, -1.0),
            Err(H3Error::ShapeMismatch { .. })
        ));
    }
}
