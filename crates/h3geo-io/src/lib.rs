//! # h3geo-io
//!
//! Reading antibody structures and sequences.
//!
//! * [`ResidueCoordinates`] pulls per-residue N/Cα/Cβ coordinates out of a `pdbtbx::PDB`
//! * [`pdb2fasta`] writes one FASTA record per chain of a structure file
//! * [`parse_fasta`] reads FASTA text into records
mod coordinates;
mod fasta;

pub use self::coordinates::{open_structure, CoordinateProvider, ResidueCoordinates};
pub use self::fasta::{fasta_basename, parse_fasta, pdb2fasta, pdb_to_fasta, FastaRecord};
