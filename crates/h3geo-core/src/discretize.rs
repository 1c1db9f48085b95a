//! Conversion between real-valued geometry matrices and bin classes.
use crate::bins::{bin_values, bins_for, GeometryChannel};
use crate::error::{H3Error, Result};
use candle_core::{DType, Tensor};
use strum::IntoEnumIterator;

const NUM_CHANNELS: usize = 4;

fn check_stack(tensor: &Tensor) -> Result<()> {
    match tensor.dims() {
        [NUM_CHANNELS, n, m] if n == m => Ok(()),
        dims => Err(H3Error::shape("[4, n, n] geometry stack", dims)),
    }
}

fn discretize_channel(
    values: &Tensor,
    channel: GeometryChannel,
    num_bins: usize,
) -> Result<Tensor> {
    let bins = bins_for(channel, num_bins)?;
    let mut classes = values.zeros_like()?.to_dtype(DType::I64)?;
    for (idx, &(lower, upper)) in bins.iter().enumerate() {
        let in_bin = values
            .ge(lower as f32)?
            .mul(&values.lt(upper as f32)?)?;
        let class = Tensor::full(idx as i64, values.dims(), values.device())?;
        classes = in_bin.where_cond(&class, &classes)?;
    }
    Ok(classes)
}

/// Bin every cell of a `[4, n, n]` geometry stack, returning i64 class indices.
///
/// Cells that fall into no bin (masked sentinels below a channel's range, NaN)
/// are left at class 0.
pub fn discretize(geometry: &Tensor, num_bins: usize) -> Result<Tensor> {
    check_stack(geometry)?;
    let geometry = geometry.to_dtype(DType::F32)?;
    let channels = GeometryChannel::iter()
        .map(|channel| discretize_channel(&geometry.get(channel.to_index())?, channel, num_bins))
        .collect::<Result<Vec<_>>>()?;
    Ok(Tensor::stack(&channels, 0)?)
}

fn lookup_values(classes: &Tensor, channel: GeometryChannel, num_bins: usize) -> Result<Tensor> {
    let values = bin_values(&bins_for(channel, num_bins)?)?;
    let ids = classes.to_dtype(DType::I64)?.flatten_all()?;
    if let Some(bad) = ids
        .to_vec1::<i64>()?
        .into_iter()
        .find(|&c| c < 0 || c >= num_bins as i64)
    {
        return Err(H3Error::invalid(format!(
            "class {} out of range for {} {} bins",
            bad, num_bins, channel
        )));
    }
    let table = Tensor::from_vec(values, num_bins, classes.device())?;
    Ok(table.index_select(&ids, 0)?.reshape(classes.dims())?)
}

/// Map a `[4, n, n]` class stack back to bin representative values.
pub fn reconstruct(classes: &Tensor, num_bins: usize) -> Result<Tensor> {
    check_stack(classes)?;
    let channels = GeometryChannel::iter()
        .map(|channel| lookup_values(&classes.get(channel.to_index())?, channel, num_bins))
        .collect::<Result<Vec<_>>>()?;
    Ok(Tensor::stack(&channels, 0)?)
}

/// Single-channel inverse for `[n, n]` distance class maps.
pub fn reconstruct_distances(classes: &Tensor, num_bins: usize) -> Result<Tensor> {
    let (n, m) = classes.dims2()?;
    if n != m {
        return Err(H3Error::shape("[n, n] distance classes", classes.dims()));
    }
    lookup_values(classes, GeometryChannel::Distance, num_bins)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bins::classify;
    use candle_core::Device;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_classes(rng: &mut StdRng, n: usize, num_bins: usize) -> Tensor {
        let data: Vec<i64> = (0..NUM_CHANNELS * n * n)
            .map(|_| rng.gen_range(0..num_bins as i64))
            .collect();
        Tensor::from_vec(data, (NUM_CHANNELS, n, n), &Device::Cpu).unwrap()
    }

    #[test]
    fn test_discretize_known_values() {
        let device = Device::Cpu;
        let geometry = Tensor::new(
            &[
                [[0.0f32, 4.2], [16.0, 100.0]],
                [[-180.0, 179.9], [0.0, -0.1]],
                [[-165.0, 15.0], [90.0, 100.0]],
                [[0.0, 179.9], [15.0, 90.0]],
            ],
            &device,
        )
        .unwrap();
        let classes: Vec<Vec<Vec<i64>>> = discretize(&geometry, 24).unwrap().to_vec3().unwrap();
        assert_eq!(classes[0], vec![vec![0, 1], vec![23, 23]]);
        assert_eq!(classes[1], vec![vec![0, 23], vec![12, 11]]);
        assert_eq!(classes[2], vec![vec![1, 13], vec![18, 18]]);
        assert_eq!(classes[3], vec![vec![0, 23], vec![2, 12]]);
    }

    #[test]
    fn test_sentinel_and_nan_fall_into_class_zero() {
        let device = Device::Cpu;
        let geometry = Tensor::new(
            &[
                [[-1.0f32, 5.0], [f32::NAN, -1.0]],
                [[-1.0, f32::NAN], [100.0, -1.0]],
                [[-1.0, 0.0], [0.0, f32::NAN]],
                [[-1.0, 181.0], [f32::NAN, 45.0]],
            ],
            &device,
        )
        .unwrap();
        let classes: Vec<Vec<Vec<i64>>> = discretize(&geometry, 26).unwrap().to_vec3().unwrap();
        assert_eq!(classes[0], vec![vec![0, 3], vec![0, 0]]);
        // -1 is a valid dihedral and lands in a middle bin
        assert_eq!(classes[1][0][0], 12);
        assert_eq!(classes[1][0][1], 0);
        assert_eq!(classes[3], vec![vec![0, 0], vec![0, 6]]);
    }

    #[test]
    fn test_discretize_matches_scalar_classify() {
        let mut rng = StdRng::seed_from_u64(17);
        let n = 6;
        let data: Vec<f32> = (0..NUM_CHANNELS * n * n)
            .map(|i| match i / (n * n) {
                0 => rng.gen_range(0.0..30.0),
                3 => rng.gen_range(0.0..180.0),
                _ => rng.gen_range(-180.0..180.0),
            })
            .collect();
        let geometry = Tensor::from_vec(data.clone(), (NUM_CHANNELS, n, n), &Device::Cpu).unwrap();
        let classes = discretize(&geometry, 26)
            .unwrap()
            .flatten_all()
            .unwrap()
            .to_vec1::<i64>()
            .unwrap();
        for (i, (value, class)) in data.iter().zip(classes).enumerate() {
            let channel = GeometryChannel::from_index(i / (n * n)).unwrap();
            let bins = bins_for(channel, 26).unwrap();
            assert_eq!(classify(*value, &bins).unwrap() as i64, class);
        }
    }

    #[test]
    fn test_round_trip_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(1);
        for num_bins in [3, 12, 26, 37] {
            let classes = random_classes(&mut rng, 7, num_bins);
            let values = reconstruct(&classes, num_bins).unwrap();
            let again = discretize(&values, num_bins).unwrap();
            let first: Vec<Vec<Vec<i64>>> = classes.to_vec3().unwrap();
            let second: Vec<Vec<Vec<i64>>> = again.to_vec3().unwrap();
            assert_eq!(first, second, "num_bins {num_bins}");
        }
    }

    #[test]
    fn test_reconstruct_values() {
        let device = Device::Cpu;
        let classes = Tensor::new(&[[0i64, 1], [24, 25]], &device).unwrap();
        let values: Vec<Vec<f32>> = reconstruct_distances(&classes, 26)
            .unwrap()
            .to_vec2()
            .unwrap();
        assert_eq!(values, vec![vec![3.75, 4.25], vec![15.75, 16.25]]);
    }

    #[test]
    fn test_reconstruct_rejects_bad_classes() {
        let device = Device::Cpu;
        let classes = Tensor::new(&[[0i64, 26], [1, 2]], &device).unwrap();
        assert!(matches!(
            reconstruct_distances(&classes, 26),
            Err(H3Error::InvalidArgument(_))
        ));
        let classes = Tensor::new(&[[0i64, -1], [1, 2]], &device).unwrap();
        assert!(reconstruct_distances(&classes, 26).is_err());

        let flat = Tensor::zeros((3, 2, 2), DType::I64, &device).unwrap();
        assert!(matches!(
            reconstruct(&flat, 26),
            Err(H3Error::ShapeMismatch { .. })
        ));
    }
}
