//! Bin boundaries for the four geometry channels.
//!
//! Each channel is split into `num_bins` half-open intervals `[lower, upper)`.
//! Distances get a `[0, 4)` catch-all bin, `num_bins - 2` bins of 0.5 Å and an
//! unbounded last bin. Dihedrals (omega, theta) span `[-180, 180)` and the planar
//! angle (phi) spans `[0, 180)`, both split evenly.
use crate::error::{H3Error, Result};
use strum::{Display, EnumIter, EnumString};

/// A half-open `[lower, upper)` interval.
pub type Bin = (f64, f64);

const FIRST_DIST_BIN: f64 = 4.0;
const DIST_BIN_WIDTH: f64 = 0.5;

/// The four channels of a geometry matrix, in stacking order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum GeometryChannel {
    /// Cβ (or Cα) distance
    Distance = 0,
    /// Cβ-Cβ dihedral
    Omega = 1,
    /// Cα-Cβ dihedral
    Theta = 2,
    /// Cα-Cβ-Cβ planar angle
    Phi = 3,
}

impl GeometryChannel {
    pub fn to_index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        match idx {
            0 => Some(Self::Distance),
            1 => Some(Self::Omega),
            2 => Some(Self::Theta),
            3 => Some(Self::Phi),
            _ => None,
        }
    }
}

fn even_bins(first_bin: f64, span: f64, num_bins: usize) -> Vec<Bin> {
    let bin_width = span / num_bins as f64;
    (0..num_bins)
        .map(|i| {
            (
                first_bin + bin_width * i as f64,
                first_bin + bin_width * (i + 1) as f64,
            )
        })
        .collect()
}

fn dist_bins(num_bins: usize) -> Vec<Bin> {
    let mut bins: Vec<Bin> = (0..num_bins - 2)
        .map(|i| {
            (
                FIRST_DIST_BIN + DIST_BIN_WIDTH * i as f64,
                FIRST_DIST_BIN + DIST_BIN_WIDTH + DIST_BIN_WIDTH * i as f64,
            )
        })
        .collect();
    let last_upper = bins[bins.len() - 1].1;
    bins.push((last_upper, f64::INFINITY));
    bins.insert(0, (0.0, FIRST_DIST_BIN));
    bins
}

/// Ordered bins for `channel`. `num_bins` must be at least 3.
pub fn bins_for(channel: GeometryChannel, num_bins: usize) -> Result<Vec<Bin>> {
    if num_bins < 3 {
        return Err(H3Error::invalid(format!(
            "num_bins must be >= 3 to build {} bins, got {}",
            channel, num_bins
        )));
    }
    let bins = match channel {
        GeometryChannel::Distance => dist_bins(num_bins),
        GeometryChannel::Omega | GeometryChannel::Theta => even_bins(-180.0, 360.0, num_bins),
        GeometryChannel::Phi => even_bins(0.0, 180.0, num_bins),
    };
    Ok(bins)
}

/// Representative value of each bin.
///
/// Every bin is represented by its lower bound plus half the width of bin 1,
/// and bin 0 is then extrapolated as `values[1] - 2 * half_width`. For the
/// distance channel this gives 3.75 for `[0, 4)` rather than its midpoint;
/// trained models are evaluated against exactly these values.
pub fn bin_values(bins: &[Bin]) -> Result<Vec<f32>> {
    if bins.len() < 3 {
        return Err(H3Error::invalid(format!(
            "at least 3 bins are needed for bin values, got {}",
            bins.len()
        )));
    }
    let half_width = (bins[2].0 - bins[1].0) / 2.0;
    let mut values: Vec<f64> = bins.iter().map(|(lower, _)| lower + half_width).collect();
    values[0] = values[1] - 2.0 * half_width;
    Ok(values.into_iter().map(|v| v as f32).collect())
}

/// Index of the first bin containing `value`.
///
/// Bounds are compared at `f32` precision, like the tensor comparisons in
/// [`crate::discretize`].
pub fn classify(value: f32, bins: &[Bin]) -> Option<usize> {
    bins.iter()
        .position(|&(lower, upper)| value >= lower as f32 && value < upper as f32)
}

/// Bin layout for all four channels at a fixed bin count.
#[derive(Debug, Clone)]
pub struct BinScheme {
    num_bins: usize,
}

impl BinScheme {
    pub fn new(num_bins: usize) -> Result<Self> {
        // validates the count once, so the accessors below cannot fail on it
        bins_for(GeometryChannel::Distance, num_bins)?;
        Ok(Self { num_bins })
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    pub fn bins(&self, channel: GeometryChannel) -> Result<Vec<Bin>> {
        bins_for(channel, self.num_bins)
    }

    pub fn values(&self, channel: GeometryChannel) -> Result<Vec<f32>> {
        bin_values(&self.bins(channel)?)
    }

    /// Class index for `value` in `channel`, or a coverage error if no bin holds it.
    pub fn classify(&self, channel: GeometryChannel, value: f32) -> Result<usize> {
        classify(value, &self.bins(channel)?).ok_or_else(|| H3Error::DomainCoverage {
            value,
            channel: channel.to_string(),
        })
    }

    /// Representative value for class `idx` of `channel`.
    pub fn value_of(&self, channel: GeometryChannel, idx: usize) -> Result<f32> {
        self.values(channel)?.get(idx).copied().ok_or_else(|| {
            H3Error::invalid(format!(
                "class {} out of range for {} bins",
                idx, self.num_bins
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use strum::IntoEnumIterator;

    #[test]
    fn test_dist_bins_26() {
        let bins = bins_for(GeometryChannel::Distance, 26).unwrap();
        assert_eq!(bins.len(), 26);
        assert_eq!(bins[0], (0.0, 4.0));
        assert_eq!(bins[1], (4.0, 4.5));
        for (i, (lower, upper)) in bins.iter().enumerate().skip(1).take(24) {
            assert_eq!(*lower, 4.0 + 0.5 * (i - 1) as f64);
            assert_eq!(upper - lower, 0.5);
        }
        assert_eq!(bins[25], (16.0, f64::INFINITY));
    }

    #[test]
    fn test_angle_bins() {
        let omega = bins_for(GeometryChannel::Omega, 24).unwrap();
        assert_eq!(omega[0], (-180.0, -165.0));
        assert_eq!(omega[23], (165.0, 180.0));

        let theta = bins_for(GeometryChannel::Theta, 24).unwrap();
        assert_eq!(omega, theta);

        let phi = bins_for(GeometryChannel::Phi, 12).unwrap();
        assert_eq!(phi[0], (0.0, 15.0));
        assert_eq!(phi[11], (165.0, 180.0));
    }

    #[test]
    fn test_too_few_bins() {
        for channel in GeometryChannel::iter() {
            assert!(matches!(
                bins_for(channel, 2),
                Err(H3Error::InvalidArgument(_))
            ));
        }
        assert!(BinScheme::new(0).is_err());
        assert!(BinScheme::new(3).is_ok());
    }

    #[test]
    fn test_bin_values_asymmetry() {
        let values = bin_values(&bins_for(GeometryChannel::Distance, 26).unwrap()).unwrap();
        assert_eq!(values[1], 4.25);
        assert_eq!(values[2], 4.75);
        // extrapolated, not the midpoint of [0, 4)
        assert_eq!(values[0], 3.75);
        assert_eq!(values[25], 16.25);

        let values = bin_values(&bins_for(GeometryChannel::Phi, 12).unwrap()).unwrap();
        assert_eq!(values[0], 7.5);
        assert_eq!(values[11], 172.5);
    }

    #[test]
    fn test_classify() {
        let bins = bins_for(GeometryChannel::Distance, 26).unwrap();
        assert_eq!(classify(0.0, &bins), Some(0));
        assert_eq!(classify(3.99, &bins), Some(0));
        assert_eq!(classify(4.0, &bins), Some(1));
        assert_eq!(classify(15.99, &bins), Some(24));
        assert_eq!(classify(250.0, &bins), Some(25));
        assert_eq!(classify(-1.0, &bins), None);
        assert_eq!(classify(f32::NAN, &bins), None);

        let scheme = BinScheme::new(26).unwrap();
        assert!(matches!(
            scheme.classify(GeometryChannel::Phi, 180.0),
            Err(H3Error::DomainCoverage { .. })
        ));
        assert_eq!(scheme.classify(GeometryChannel::Omega, -180.0).unwrap(), 0);
    }

    #[test]
    fn test_bins_are_exhaustive() {
        let mut rng = StdRng::seed_from_u64(7);
        for num_bins in 3..40 {
            for channel in GeometryChannel::iter() {
                let bins = bins_for(channel, num_bins).unwrap();
                assert_eq!(bins.len(), num_bins);
                // contiguous
                for pair in bins.windows(2) {
                    assert_eq!(pair[0].1, pair[1].0);
                }
                let (low, high) = match channel {
                    GeometryChannel::Distance => (0.0f32, 100.0f32),
                    GeometryChannel::Omega | GeometryChannel::Theta => (-180.0, 180.0),
                    GeometryChannel::Phi => (0.0, 180.0),
                };
                for _ in 0..200 {
                    let value: f32 = rng.gen_range(low..high);
                    let hits = bins
                        .iter()
                        .filter(|&&(l, u)| value >= l as f32 && value < u as f32)
                        .count();
                    assert_eq!(hits, 1, "{channel} value {value} with {num_bins} bins");
                    let idx = classify(value, &bins).unwrap();
                    assert!(idx < num_bins);
                }
            }
        }
    }

    #[test]
    fn test_channel_names() {
        assert_eq!(GeometryChannel::Distance.to_string(), "distance");
        assert_eq!("phi".parse::<GeometryChannel>().unwrap(), GeometryChannel::Phi);
        assert_eq!(GeometryChannel::from_index(2), Some(GeometryChannel::Theta));
        assert_eq!(GeometryChannel::from_index(4), None);
    }
}
