use anyhow::{Context, Result};
use h3geo_io::pdb2fasta;

pub fn execute(input: String, num_chains: Option<usize>, output: Option<String>) -> Result<()> {
    let fasta = pdb2fasta(&input, num_chains)?;
    match output {
        Some(path) => {
            std::fs::write(&path, fasta).with_context(|| format!("Failed to write {}", path))?;
            log::info!("Wrote {}", path);
        }
        None => print!("{}", fasta),
    }
    Ok(())
}
