//! # h3geo-core
//!
//! Inter-residue geometry and binning for CDR-H3 loop modeling.
//!
//! __h3geo-core__ provides functionality for:
//! * Computing pairwise distance, dihedral and planar-angle matrices from backbone coordinates
//! * Masking residues with missing atoms
//! * Discretizing geometry matrices into bin classes and reconstructing values from classes
//! * Turning model logits into per-pair probability distributions and predicted classes
//! * Encoding amino-acid sequences for model input
//!
//! The main entry point is [`protein_dist_angle_matrix`], which takes a [`CoordinateSet`]
//! and returns the 4-channel geometry tensor that [`discretize`] turns into training targets.
//!
mod bins;
mod config;
mod discretize;
mod encoding;
mod error;
mod geometry;
mod mask;
mod probability;
mod tensor_utils;

pub use self::bins::{bin_values, bins_for, classify, Bin, BinScheme, GeometryChannel};
pub use self::config::GeometryConfig;
pub use self::discretize::{discretize, reconstruct, reconstruct_distances};
pub use self::encoding::{aa1to_int, aa3to1, int_to_aa1, AminoAcidAlphabet, SequenceEncoder};
pub use self::error::{H3Error, Result};
pub use self::geometry::{
    ca_cb_cb_planar, ca_cb_dihedral, cb_cb_dihedral, cross_product, pairwise_distance,
    protein_dist_angle_matrix, CoordinateSet,
};
pub use self::mask::{apply_pairwise_mask, coordinate_presence, pairwise_mask};
pub use self::probability::{bin_matrix, predict_classes, probabilities_from_logits, BinMethod};
pub use self::tensor_utils::{fill_diagonally, max_shape, pad_to_same_shape, FillMethod};

/// Sentinel written into masked cells of geometry matrices.
pub const DEFAULT_MASK_FILL_VALUE: f32 = -1.0;

/// Number of bins used by the trained models.
pub const DEFAULT_NUM_BINS: usize = 26;
