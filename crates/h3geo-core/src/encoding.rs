//! Amino-acid codes and one-hot sequence encoding.
use crate::error::{H3Error, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::encoding::one_hot;

#[rustfmt::skip]
pub fn aa3to1(aa: &str) -> char {
    match aa {
        "ALA" => 'A', "CYS" => 'C', "ASP" => 'D',
        "GLU" => 'E', "PHE" => 'F', "GLY" => 'G',
        "HIS" => 'H', "ILE" => 'I', "LYS" => 'K',
        "LEU" => 'L', "MET" => 'M', "ASN" => 'N',
        "PRO" => 'P', "GLN" => 'Q', "ARG" => 'R',
        "SER" => 'S', "THR" => 'T', "VAL" => 'V',
        "TRP" => 'W', "TYR" => 'Y', "SEC" => 'U',
        "PYL" => 'O', "ASX" => 'B', "GLX" => 'Z',
        "XLE" => 'J', _     => 'X',
    }
}

#[rustfmt::skip]
pub fn aa1to_int(aa: char) -> Option<u32> {
    match aa {
        'A' => Some(0),  'C' => Some(1),  'D' => Some(2),
        'E' => Some(3),  'F' => Some(4),  'G' => Some(5),
        'H' => Some(6),  'I' => Some(7),  'K' => Some(8),
        'L' => Some(9),  'M' => Some(10), 'N' => Some(11),
        'P' => Some(12), 'Q' => Some(13), 'R' => Some(14),
        'S' => Some(15), 'T' => Some(16), 'V' => Some(17),
        'W' => Some(18), 'Y' => Some(19), _   => None,
    }
}

pub fn int_to_aa1(aa_int: u32) -> char {
    STANDARD_LETTERS
        .get(aa_int as usize)
        .copied()
        .unwrap_or('X')
}

const STANDARD_LETTERS: [char; 20] = [
    'A', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'V', 'W',
    'Y',
];

/// Ordered residue letters; a letter's position is its integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AminoAcidAlphabet {
    letters: &'static [char],
}

impl AminoAcidAlphabet {
    /// The 20 standard residues, `ACDEFGHIKLMNPQRSTVWY`.
    pub const fn standard() -> Self {
        Self {
            letters: &STANDARD_LETTERS,
        }
    }

    pub fn len(&self) -> usize {
        self.letters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }

    pub fn index_of(&self, letter: char) -> Option<u32> {
        self.letters
            .iter()
            .position(|&l| l == letter)
            .map(|idx| idx as u32)
    }

    pub fn letter(&self, idx: u32) -> Option<char> {
        self.letters.get(idx as usize).copied()
    }
}

impl Default for AminoAcidAlphabet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Turns residue strings into index and one-hot tensors.
#[derive(Debug, Clone, Default)]
pub struct SequenceEncoder {
    alphabet: AminoAcidAlphabet,
}

impl SequenceEncoder {
    pub fn new(alphabet: AminoAcidAlphabet) -> Self {
        Self { alphabet }
    }

    pub fn alphabet(&self) -> &AminoAcidAlphabet {
        &self.alphabet
    }

    /// Integer codes for `seq`. Letters outside the alphabet are dropped.
    pub fn letters_to_indices(&self, seq: &str) -> Vec<u32> {
        let indices: Vec<u32> = seq
            .chars()
            .filter_map(|c| self.alphabet.index_of(c))
            .collect();
        let skipped = seq.chars().count() - indices.len();
        if skipped > 0 {
            log::debug!("skipped {} residues outside the alphabet", skipped);
        }
        indices
    }

    /// `(len, alphabet_size)` f32 one-hot encoding.
    pub fn one_hot(&self, seq: &str, device: &Device) -> Result<Tensor> {
        self.one_hot_with_depth(seq, self.alphabet.len(), device)
    }

    /// One-hot encoding with an explicit width.
    pub fn one_hot_with_depth(&self, seq: &str, depth: usize, device: &Device) -> Result<Tensor> {
        let indices = self.letters_to_indices(seq);
        if let Some(&max) = indices.iter().max() {
            if max as usize >= depth {
                return Err(H3Error::invalid(format!(
                    "one-hot depth {} cannot hold residue index {}",
                    depth, max
                )));
            }
        }
        if indices.is_empty() {
            return Ok(Tensor::zeros((0, depth), DType::F32, device)?);
        }
        let indices = Tensor::new(indices.as_slice(), device)?;
        Ok(one_hot(indices, depth, 1f32, 0f32)?)
    }
}
