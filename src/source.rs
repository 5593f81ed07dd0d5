use camino::Utf8PathBuf;

use crate::error::KeggError;
use crate::genome::KeggGenome;

pub trait PathwayCatalog {
    fn pathways(&self) -> Result<Vec<(String, String)>, KeggError>;
}

pub trait GenomeCatalog {
    fn genomes(&self) -> Result<Box<dyn Iterator<Item = KeggGenome> + '_>, KeggError>;
}

/// Obtains local copies of the two per-organism files.
///
/// Implementations must report missing data with [`KeggError::NotFound`] so
/// callers can tell it apart from transport failures.
pub trait GenomeFileFetcher {
    fn list_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError>;
    fn link_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError>;
}
