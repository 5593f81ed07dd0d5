use camino::Utf8PathBuf;
use tracing::{debug, warn};

use crate::error::KeggError;
use crate::genome::KeggGenome;
use crate::source::GenomeFileFetcher;

#[derive(Debug, Clone)]
pub struct GenomeFiles {
    pub genome: KeggGenome,
    pub list_path: Utf8PathBuf,
    pub link_path: Utf8PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverStats {
    pub fetched: usize,
    pub missing: usize,
    pub failed: usize,
}

pub struct GenomePaths<'a, F: GenomeFileFetcher + ?Sized> {
    genomes: Box<dyn Iterator<Item = KeggGenome> + 'a>,
    fetcher: &'a F,
    stats: DriverStats,
}

impl<'a, F: GenomeFileFetcher + ?Sized> GenomePaths<'a, F> {
    pub fn new<I>(genomes: I, fetcher: &'a F) -> Self
    where
        I: IntoIterator<Item = KeggGenome>,
        I::IntoIter: 'a,
    {
        Self {
            genomes: Box::new(genomes.into_iter()),
            fetcher,
            stats: DriverStats::default(),
        }
    }

    pub fn stats(&self) -> DriverStats {
        self.stats
    }

    fn fetch(&self, genome: &KeggGenome) -> Result<(Utf8PathBuf, Utf8PathBuf), KeggError> {
        let list_path = self.fetcher.list_pathway_genome(&genome.code)?;
        let link_path = self.fetcher.link_pathway_genome(&genome.code)?;
        Ok((list_path, link_path))
    }
}

impl<F: GenomeFileFetcher + ?Sized> Iterator for GenomePaths<'_, F> {
    type Item = GenomeFiles;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let genome = self.genomes.next()?;
            match self.fetch(&genome) {
                Ok((list_path, link_path)) => {
                    self.stats.fetched += 1;
                    return Some(GenomeFiles {
                        genome,
                        list_path,
                        link_path,
                    });
                }
                Err(err) if err.is_not_found() => {
                    debug!(genome = %genome.code, url = err.url(), "no pathway data published");
                    self.stats.missing += 1;
                }
                Err(err) => {
                    report_fetch_failure(&genome, &err);
                    self.stats.failed += 1;
                }
            }
        }
    }
}

fn report_fetch_failure(genome: &KeggGenome, err: &KeggError) {
    let status = err
        .status()
        .map(|status| format!("[HTTP {status}] "))
        .unwrap_or_default();
    let taxonomy = genome
        .taxonomy_id
        .as_deref()
        .map(|id| format!("; taxonomy:{id}"))
        .unwrap_or_default();
    warn!(
        genome = %genome.code,
        name = %genome.name,
        taxonomy = genome.taxonomy_id.as_deref(),
        url = err.url(),
        "{status}error downloading {} ({}{taxonomy}): {err}",
        genome.code,
        genome.name,
    );
}
