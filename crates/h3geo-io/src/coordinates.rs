use anyhow::{anyhow, Result};
use candle_core::{Device, Tensor};
use h3geo_core::{protein_dist_angle_matrix, CoordinateSet};
use itertools::Itertools;
use pdbtbx::{Residue, PDB};
use std::path::Path;

/// Open a PDB or mmCIF file, logging any non-fatal parser warnings.
pub fn open_structure(path: impl AsRef<Path>) -> Result<PDB> {
    let path = path.as_ref();
    let path_str = path
        .to_str()
        .ok_or_else(|| anyhow!("Path is not valid UTF-8: {}", path.display()))?;
    let (pdb, warnings) = pdbtbx::open(path_str)
        .map_err(|errors| anyhow!("Could not read {}: {:?}", path.display(), errors))?;
    for warning in &warnings {
        log::debug!("{}: {:?}", path.display(), warning);
    }
    Ok(pdb)
}

/// Per-residue backbone coordinates, in chain then residue order.
///
/// Absent atoms are the zero vector; geometry treats a point whose components
/// sum to zero as absent.
#[derive(Debug, Clone, Default)]
pub struct ResidueCoordinates {
    pub chain_ids: Vec<String>,
    pub residue_names: Vec<String>,
    pub ca: Vec<[f32; 3]>,
    pub cb: Vec<[f32; 3]>,
    pub n: Vec<[f32; 3]>,
    pub cb_or_ca: Vec<[f32; 3]>,
}

fn atom_coord(residue: &Residue, name: &str) -> Option<[f32; 3]> {
    residue.atoms().find(|atom| atom.name() == name).map(|atom| {
        let (x, y, z) = atom.pos();
        [x as f32, y as f32, z as f32]
    })
}

impl From<&PDB> for ResidueCoordinates {
    // PDB --> Chain --> Residue, one row per residue
    fn from(pdb_data: &PDB) -> Self {
        let (chain_ids, residue_names, ca, cb, n, cb_or_ca): (
            Vec<String>,
            Vec<String>,
            Vec<[f32; 3]>,
            Vec<[f32; 3]>,
            Vec<[f32; 3]>,
            Vec<[f32; 3]>,
        ) = pdb_data
            .chains()
            .flat_map(|chain| {
                let chain_id = chain.id().to_string();
                chain.residues().map(move |residue| {
                    let ca = atom_coord(residue, "CA");
                    let cb = atom_coord(residue, "CB");
                    let n = atom_coord(residue, "N");
                    (
                        chain_id.clone(),
                        residue.name().unwrap_or_default().to_string(),
                        ca.unwrap_or_default(),
                        cb.unwrap_or_default(),
                        n.unwrap_or_default(),
                        cb.or(ca).unwrap_or_default(),
                    )
                })
            })
            .multiunzip();

        Self {
            chain_ids,
            residue_names,
            ca,
            cb,
            n,
            cb_or_ca,
        }
    }
}

impl ResidueCoordinates {
    pub fn from_pdb(pdb: &PDB) -> Self {
        Self::from(pdb)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let pdb = open_structure(path)?;
        Ok(Self::from(&pdb))
    }

    pub fn len(&self) -> usize {
        self.ca.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ca.is_empty()
    }
}

/// Anything that can hand out a [`CoordinateSet`] for geometry generation.
pub trait CoordinateProvider {
    fn coordinate_set(&self) -> Result<CoordinateSet>;

    /// The `[4, n, n]` distance/omega/theta/phi stack for these residues.
    fn dist_angle_matrix(
        &self,
        mask: Option<&[bool]>,
        fill_value: f32,
        device: &Device,
    ) -> Result<Tensor> {
        let coords = self.coordinate_set()?;
        Ok(protein_dist_angle_matrix(&coords, mask, fill_value, device)?)
    }
}

impl CoordinateProvider for ResidueCoordinates {
    fn coordinate_set(&self) -> Result<CoordinateSet> {
        Ok(CoordinateSet::new(
            self.ca.clone(),
            self.cb.clone(),
            self.n.clone(),
            self.cb_or_ca.clone(),
        )?)
    }
}

impl CoordinateProvider for PDB {
    fn coordinate_set(&self) -> Result<CoordinateSet> {
        ResidueCoordinates::from(self).coordinate_set()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use h3geo_test_data::TestFile;

    fn fixture() -> ResidueCoordinates {
        let (pdb_file, _temp) = TestFile::antibody_01().create_temp().unwrap();
        ResidueCoordinates::from_file(&pdb_file).unwrap()
    }

    #[test]
    fn test_residue_coordinates_from_pdb() {
        let coords = fixture();
        assert_eq!(coords.len(), 8);
        assert_eq!(
            coords.residue_names,
            ["GLU", "VAL", "GLY", "LEU", "TYR", "ASP", "ILE", "GLN"]
        );
        assert_eq!(coords.chain_ids.iter().dedup().collect::<Vec<_>>(), ["H", "L"]);
        assert_eq!(coords.ca[0], [12.3, 12.0, 8.0]);
        assert_eq!(coords.n[0], [11.413, 11.249, 7.2]);
    }

    #[test]
    fn test_glycine_falls_back_to_ca() {
        let coords = fixture();
        let cb_mask = coords.coordinate_set().unwrap().cb_mask();
        assert_eq!(cb_mask, [true, true, false, true, true, true, true, true]);
        assert_eq!(coords.cb[2], [0.0, 0.0, 0.0]);
        assert_eq!(coords.cb_or_ca[2], coords.ca[2]);
        assert_eq!(coords.cb_or_ca[3], coords.cb[3]);
    }

    #[test]
    fn test_dist_angle_matrix_from_structure() {
        let coords = fixture();
        let geometry = coords.dist_angle_matrix(None, -1.0, &Device::Cpu).unwrap();
        assert_eq!(geometry.dims(), &[4, 8, 8]);

        let dist: Vec<Vec<f32>> = geometry.get(0).unwrap().to_vec2().unwrap();
        let expected = coords.cb[0]
            .iter()
            .zip(coords.cb[1].iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f32>()
            .sqrt();
        assert!((dist[0][1] - expected).abs() < 1e-4);
        // glycine keeps its distances
        assert!(dist[2][4] > 0.0);

        let omega: Vec<Vec<f32>> = geometry.get(1).unwrap().to_vec2().unwrap();
        assert!(omega[2].iter().all(|&v| v == -1.0));
        assert!(omega[0][1] > -180.0 && omega[0][1] <= 180.0);
    }

    #[test]
    fn test_missing_file() {
        assert!(ResidueCoordinates::from_file("/nonexistent/structure.pdb").is_err());
    }
}
