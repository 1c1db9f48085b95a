//! Inter-residue geometry matrices.
//!
//! For a chain of `n` residues each generator returns an `[n, n]` f32 matrix:
//!
//! - distance between the Cβ (or Cα) atoms
//! - omega: the Cα-Cβ-Cβ-Cα dihedral
//! - theta: the N-Cα-Cβ-Cβ dihedral
//! - phi: the Cα-Cβ-Cβ planar angle
//!
//! All angles are in degrees. Per-residue vectors are broadcast along rows, so
//! cell `[i, j]` of an unsymmetric quantity is built from residue `j`'s bond and
//! then the whole matrix is transposed once. Models trained on these matrices
//! depend on that index convention.
use crate::error::{H3Error, Result};
use crate::mask::{apply_pairwise_mask, coordinate_presence, pairwise_mask};
use candle_core::{Device, Tensor, D};

/// Per-residue backbone coordinates.
///
/// Missing atoms are the zero vector. `cb_or_ca` holds Cβ where the residue has
/// one, Cα otherwise, and the origin when both are absent.
#[derive(Debug, Clone, Default)]
pub struct CoordinateSet {
    pub ca: Vec<[f32; 3]>,
    pub cb: Vec<[f32; 3]>,
    pub n: Vec<[f32; 3]>,
    pub cb_or_ca: Vec<[f32; 3]>,
}

impl CoordinateSet {
    pub fn new(
        ca: Vec<[f32; 3]>,
        cb: Vec<[f32; 3]>,
        n: Vec<[f32; 3]>,
        cb_or_ca: Vec<[f32; 3]>,
    ) -> Result<Self> {
        let len = ca.len();
        if cb.len() != len || n.len() != len || cb_or_ca.len() != len {
            return Err(H3Error::invalid(format!(
                "coordinate arrays differ in length: CA {}, CB {}, N {}, CB-or-CA {}",
                len,
                cb.len(),
                n.len(),
                cb_or_ca.len()
            )));
        }
        Ok(Self {
            ca,
            cb,
            n,
            cb_or_ca,
        })
    }

    /// Build the set from CA/CB/N alone, using the zero-vector presence test to
    /// pick the Cβ-or-Cα fallback.
    pub fn from_backbone(ca: Vec<[f32; 3]>, cb: Vec<[f32; 3]>, n: Vec<[f32; 3]>) -> Result<Self> {
        let cb_or_ca = coordinate_presence(&cb)
            .into_iter()
            .zip(cb.iter().zip(ca.iter()))
            .map(|(has_cb, (cb, ca))| if has_cb { *cb } else { *ca })
            .collect();
        Self::new(ca, cb, n, cb_or_ca)
    }

    pub fn len(&self) -> usize {
        self.ca.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ca.is_empty()
    }

    /// Residues with a Cβ atom, by the zero-vector presence test.
    pub fn cb_mask(&self) -> Vec<bool> {
        coordinate_presence(&self.cb)
    }

    fn points_to_tensor(points: &[[f32; 3]], device: &Device) -> Result<Tensor> {
        let flat: Vec<f32> = points.iter().flatten().copied().collect();
        Ok(Tensor::from_vec(flat, (points.len(), 3), device)?)
    }

    /// `(ca, cb, n, cb_or_ca)` as `[n, 3]` tensors.
    pub fn to_tensors(&self, device: &Device) -> Result<(Tensor, Tensor, Tensor, Tensor)> {
        Ok((
            Self::points_to_tensor(&self.ca, device)?,
            Self::points_to_tensor(&self.cb, device)?,
            Self::points_to_tensor(&self.n, device)?,
            Self::points_to_tensor(&self.cb_or_ca, device)?,
        ))
    }
}

/// Custom Cross-Product Fn over the last dimension.
pub fn cross_product(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    let last_dim = match a.dims().last() {
        Some(3) => a.rank() - 1,
        _ => return Err(H3Error::shape("[..., 3] vectors", a.dims())),
    };
    if b.dims().last() != Some(&3) {
        return Err(H3Error::shape("[..., 3] vectors", b.dims()));
    }

    let a0 = a.narrow(last_dim, 0, 1)?;
    let a1 = a.narrow(last_dim, 1, 1)?;
    let a2 = a.narrow(last_dim, 2, 1)?;

    let b0 = b.narrow(last_dim, 0, 1)?;
    let b1 = b.narrow(last_dim, 1, 1)?;
    let b2 = b.narrow(last_dim, 2, 1)?;

    let c0 = ((&a1 * &b2)? - (&a2 * &b1)?)?;
    let c1 = ((&a2 * &b0)? - (&a0 * &b2)?)?;
    let c2 = ((&a0 * &b1)? - (&a1 * &b0)?)?;

    Ok(Tensor::cat(&[&c0, &c1, &c2], last_dim)?)
}

fn norm_keepdim(x: &Tensor) -> Result<Tensor> {
    Ok(x.sqr()?.sum_keepdim(D::Minus1)?.sqrt()?)
}

fn normalize(x: &Tensor) -> Result<Tensor> {
    Ok(x.broadcast_div(&norm_keepdim(x)?)?)
}

fn dot(a: &Tensor, b: &Tensor) -> Result<Tensor> {
    Ok((a * b)?.sum(D::Minus1)?)
}

/// `[n, 3]` -> `[n, n, 3]` with `out[i, j] = v[j]`.
fn expand_rows(v: &Tensor) -> Result<Tensor> {
    let (n, xyz) = v.dims2()?;
    Ok(v.unsqueeze(0)?.broadcast_as((n, n, xyz))?.contiguous()?)
}

/// `[n, 3]` -> `[n, n, 3]` with `out[i, j] = p[i] - p[j]`.
fn pair_differences(points: &Tensor) -> Result<Tensor> {
    Ok(points
        .unsqueeze(1)?
        .broadcast_sub(&points.unsqueeze(0)?)?
        .contiguous()?)
}

// candle has no atan2/acos kernels; finish the angle on the host.
fn map_to_degrees(x: &Tensor, f: impl Fn(f32) -> f32) -> Result<Tensor> {
    let (rows, cols) = x.dims2()?;
    let values: Vec<f32> = x
        .flatten_all()?
        .to_vec1::<f32>()?
        .into_iter()
        .map(|v| f(v).to_degrees())
        .collect();
    Ok(Tensor::from_vec(values, (rows, cols), x.device())?)
}

fn atan2_degrees(y: &Tensor, x: &Tensor) -> Result<Tensor> {
    let (rows, cols) = y.dims2()?;
    let ys = y.flatten_all()?.to_vec1::<f32>()?;
    let xs = x.flatten_all()?.to_vec1::<f32>()?;
    let values: Vec<f32> = ys
        .iter()
        .zip(xs.iter())
        .map(|(y, x)| y.atan2(*x).to_degrees())
        .collect();
    Ok(Tensor::from_vec(values, (rows, cols), y.device())?)
}

/// Dihedral angle about the bond vectors `b1`, `b2`, `b3`, each `[n, n, 3]`.
fn dihedral(b1: &Tensor, b2: &Tensor, b3: &Tensor) -> Result<Tensor> {
    let n1 = normalize(&cross_product(b1, b2)?)?;
    let n2 = normalize(&cross_product(b2, b3)?)?;
    let m1 = cross_product(&normalize(b2)?, &n1)?;
    atan2_degrees(&dot(&m1, &n2)?, &dot(&n1, &n2)?)
}

fn check_points(points: &Tensor, mask: &[bool]) -> Result<usize> {
    let (n, xyz) = points.dims2()?;
    if xyz != 3 {
        return Err(H3Error::shape("[n, 3] coordinates", points.dims()));
    }
    if mask.len() != n {
        return Err(H3Error::invalid(format!(
            "mask has {} entries for {} residues",
            mask.len(),
            n
        )));
    }
    Ok(n)
}

fn masked(matrix: Tensor, mask: &[bool], fill_value: f32) -> Result<Tensor> {
    let pairwise = pairwise_mask(mask, matrix.device())?;
    apply_pairwise_mask(&matrix, &pairwise, fill_value)
}

/// Euclidean distances between all pairs of `points` (`[n, 3]`).
///
/// With a mask, cells where either residue is invalid hold `fill_value`.
pub fn pairwise_distance(
    points: &Tensor,
    mask: Option<&[bool]>,
    fill_value: f32,
) -> Result<Tensor> {
    let distances = pair_differences(points)?.sqr()?.sum(D::Minus1)?.sqrt()?;
    match mask {
        Some(mask) => {
            check_points(points, mask)?;
            masked(distances, mask, fill_value)
        }
        None => Ok(distances),
    }
}

/// Cβ-Cβ dihedral: cell `[i, j]` is the Cα(j)-Cβ(j)-Cβ(i)-Cα(i) torsion.
pub fn cb_cb_dihedral(ca: &Tensor, cb: &Tensor, mask: &[bool], fill_value: f32) -> Result<Tensor> {
    check_points(ca, mask)?;
    let b1 = expand_rows(&(cb - ca)?)?;
    let b2 = pair_differences(cb)?;
    let b3 = b1.transpose(0, 1)?.neg()?.contiguous()?;
    let omega = dihedral(&b1, &b2, &b3)?;
    masked(omega, mask, fill_value)
}

/// Cα-Cβ dihedral: cell `[i, j]` is the N(i)-Cα(i)-Cβ(i)-Cβ(j) torsion.
pub fn ca_cb_dihedral(
    ca: &Tensor,
    cb: &Tensor,
    n: &Tensor,
    mask: &[bool],
    fill_value: f32,
) -> Result<Tensor> {
    check_points(ca, mask)?;
    let b1 = expand_rows(&(ca - n)?)?;
    let b2 = expand_rows(&(cb - ca)?)?;
    let b3 = pair_differences(cb)?;
    let theta = dihedral(&b1, &b2, &b3)?.t()?.contiguous()?;
    masked(theta, mask, fill_value)
}

/// Cα-Cβ-Cβ planar angle: cell `[i, j]` is the angle at Cβ(i) between Cα(i) and Cβ(j).
pub fn ca_cb_cb_planar(ca: &Tensor, cb: &Tensor, mask: &[bool], fill_value: f32) -> Result<Tensor> {
    check_points(ca, mask)?;
    let v1 = expand_rows(&(ca - cb)?)?;
    let v2 = pair_differences(cb)?;
    let norms = (v1.sqr()?.sum(D::Minus1)?.sqrt()? * v2.sqr()?.sum(D::Minus1)?.sqrt()?)?;
    let cosines = (dot(&v1, &v2)? / norms)?;
    let phi = map_to_degrees(&cosines, f32::acos)?.t()?.contiguous()?;
    masked(phi, mask, fill_value)
}

/// Build the `[4, n, n]` distance/omega/theta/phi stack for a coordinate set.
///
/// `mask` defaults to all residues valid. The distance channel uses it as given;
/// the angle channels additionally drop residues without a Cβ.
pub fn protein_dist_angle_matrix(
    coords: &CoordinateSet,
    mask: Option<&[bool]>,
    fill_value: f32,
    device: &Device,
) -> Result<Tensor> {
    if coords.is_empty() {
        return Err(H3Error::invalid("coordinate set has no residues"));
    }
    let seq_mask = match mask {
        Some(mask) => mask.to_vec(),
        None => vec![true; coords.len()],
    };
    let angle_mask: Vec<bool> = seq_mask
        .iter()
        .zip(coords.cb_mask())
        .map(|(&valid, has_cb)| valid && has_cb)
        .collect();
    log::debug!(
        "building geometry for {} residues ({} with usable Cβ)",
        coords.len(),
        angle_mask.iter().filter(|&&v| v).count()
    );

    let (ca, cb, n, cb_or_ca) = coords.to_tensors(device)?;
    let channels = [
        pairwise_distance(&cb_or_ca, Some(&seq_mask), fill_value)?,
        cb_cb_dihedral(&ca, &cb, &angle_mask, fill_value)?,
        ca_cb_dihedral(&ca, &cb, &n, &angle_mask, fill_value)?,
        ca_cb_cb_planar(&ca, &cb, &angle_mask, fill_value)?,
    ];
    Ok(Tensor::stack(&channels, 0)?)
}
