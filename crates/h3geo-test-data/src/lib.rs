//! h3geo-test-data
//!
//! Small antibody fixtures embedded in the crate for use in tests.
//!
//! The test files are represented as `TestFile` objects which package the raw bytes
//! and write them to temporary files for programs to operate on.
use std::fs;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile, TempDir};

#[derive(Debug)]
/// Test File
///
/// Example usage:
///
/// ```ignore
/// // returns (filepath, _tempfile_handle).
/// // _handle ensures the tempfile remains in scope
/// use h3geo_test_data::TestFile;
/// let (pdb_file, _temp) = TestFile::antibody_01().create_temp().unwrap();
/// ```
pub struct TestFile {
    filebinary: &'static [u8],
    name: &'static str,
    suffix: &'static str,
}

impl TestFile {
    /// Heavy chain `EVGLY` (GLY 3 has no CB) and light chain `DIQ`.
    pub fn antibody_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/h3_fixture.pdb"),
            name: "h3_fixture",
            suffix: "pdb",
        }
    }
    /// FASTA of `antibody_01`, records `h3_fixture:H` and `h3_fixture:L`.
    pub fn fasta_01() -> Self {
        Self {
            filebinary: include_bytes!("../data/h3_fixture.fasta"),
            name: "h3_fixture",
            suffix: "fasta",
        }
    }
    /// Light chain only.
    pub fn fasta_light_only() -> Self {
        Self {
            filebinary: include_bytes!("../data/light_only.fasta"),
            name: "light_only",
            suffix: "fasta",
        }
    }

    pub fn contents(&self) -> &'static str {
        std::str::from_utf8(self.filebinary).unwrap_or_default()
    }

    pub fn create_temp(&self) -> std::io::Result<(String, NamedTempFile)> {
        let temp = Builder::new()
            .suffix(&format!(".{}", self.suffix))
            .tempfile()?;

        fs::write(&temp, self.filebinary)?;
        let path = temp.path().to_string_lossy().into_owned();

        Ok((path, temp))
    }

    /// Like `create_temp`, but keeps the fixture's own file name inside a temp dir.
    pub fn create_temp_named(&self) -> std::io::Result<(PathBuf, TempDir)> {
        let dir = TempDir::new()?;
        let path = dir.path().join(format!("{}.{}", self.name, self.suffix));
        fs::write(&path, self.filebinary)?;
        Ok((path, dir))
    }
}
