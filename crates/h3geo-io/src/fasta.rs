use crate::coordinates::open_structure;
use anyhow::Result;
use h3geo_core::aa3to1;
use itertools::Itertools;
use pdbtbx::PDB;
use std::path::Path;

const FASTA_LINE_WIDTH: usize = 80;

/// One `>`-headed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    /// First whitespace-separated token of the header.
    pub id: String,
    /// The full header line without `>`.
    pub description: String,
    pub sequence: String,
}

/// Split FASTA text into records. Sequence lines are trimmed and joined.
pub fn parse_fasta(text: &str) -> Vec<FastaRecord> {
    let mut records: Vec<FastaRecord> = Vec::new();
    for line in text.lines() {
        if let Some(header) = line.strip_prefix('>') {
            let description = header.trim().to_string();
            let id = description
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string();
            records.push(FastaRecord {
                id,
                description,
                sequence: String::new(),
            });
        } else if let Some(record) = records.last_mut() {
            record.sequence.push_str(line.trim());
        }
    }
    records
}

/// FASTA text for every chain of `pdb`, one-letter codes wrapped at 80 columns.
///
/// Headers are `>{pdb_id}:{chain}\t{length}`.
pub fn pdb_to_fasta(pdb: &PDB, pdb_id: &str) -> String {
    let mut fasta = String::new();
    for chain in pdb.chains() {
        let seq: String = chain
            .residues()
            .map(|residue| aa3to1(residue.name().unwrap_or_default()))
            .collect();
        fasta.push_str(&format!(">{}:{}\t{}\n", pdb_id, chain.id(), seq.len()));
        for line in &seq.chars().chunks(FASTA_LINE_WIDTH) {
            fasta.extend(line);
            fasta.push('\n');
        }
    }
    fasta
}

/// Convert a structure file to FASTA.
///
/// With `num_chains` set, a structure with a different chain count is skipped
/// with a warning and an empty string is returned.
pub fn pdb2fasta(path: impl AsRef<Path>, num_chains: Option<usize>) -> Result<String> {
    let path = path.as_ref();
    let pdb_id = path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_default()
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string();
    let pdb = open_structure(path)?;

    let real_num_chains = pdb.chain_count();
    if let Some(expected) = num_chains {
        if expected != real_num_chains {
            log::warn!(
                "Skipping {}. Expected {} chains, got {}",
                path.display(),
                expected,
                real_num_chains
            );
            return Ok(String::new());
        }
    }
    Ok(pdb_to_fasta(&pdb, &pdb_id))
}

/// File name of `path` with a trailing `.fasta` removed.
pub fn fasta_basename(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let is_fasta = path.extension().is_some_and(|ext| ext == "fasta");
    let name = if is_fasta {
        path.file_stem()
    } else {
        path.file_name()
    };
    name.map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use h3geo_test_data::TestFile;

    #[test]
    fn test_parse_fasta() {
        let records = parse_fasta(TestFile::fasta_01().contents());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "h3_fixture:H");
        assert_eq!(records[0].description, "h3_fixture:H\t5");
        assert_eq!(records[0].sequence, "EVGLY");
        assert_eq!(records[1].sequence, "DIQ");

        let wrapped = parse_fasta(">x desc\nACD \nEF\n\n>y\nG\n");
        assert_eq!(wrapped[0].id, "x");
        assert_eq!(wrapped[0].sequence, "ACDEF");
        assert_eq!(wrapped[1].sequence, "G");
    }

    #[test]
    fn test_pdb2fasta() {
        let (pdb_file, _dir) = TestFile::antibody_01().create_temp_named().unwrap();
        let fasta = pdb2fasta(&pdb_file, None).unwrap();
        assert_eq!(fasta, TestFile::fasta_01().contents());
        assert_eq!(pdb2fasta(&pdb_file, Some(2)).unwrap(), fasta);
    }

    #[test]
    fn test_pdb2fasta_chain_count_mismatch() {
        let (pdb_file, _dir) = TestFile::antibody_01().create_temp_named().unwrap();
        assert_eq!(pdb2fasta(&pdb_file, Some(3)).unwrap(), "");
    }

    #[test]
    fn test_pdb_id_is_caller_supplied() {
        let (pdb_file, _temp) = TestFile::antibody_01().create_temp().unwrap();
        let pdb = open_structure(&pdb_file).unwrap();
        let fasta = pdb_to_fasta(&pdb, "1abc");
        assert_eq!(fasta, ">1abc:H\t5\nEVGLY\n>1abc:L\t3\nDIQ\n");
    }

    #[test]
    fn test_fasta_basename() {
        assert_eq!(fasta_basename("/data/1abc.fasta"), "1abc");
        assert_eq!(fasta_basename("1abc.fa"), "1abc.fa");
        assert_eq!(fasta_basename("dir/x.y.fasta"), "x.y");
    }
}
