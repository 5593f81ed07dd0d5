use tracing::{debug, warn};

use crate::catalog::map_terms;
use crate::domain::{KEGG_PATHWAY_PREFIX, Ontology, Relation, Term};
use crate::driver::{DriverStats, GenomePaths};
use crate::error::KeggError;
use crate::join::join_genome_files;
use crate::source::{GenomeCatalog, GenomeFileFetcher, PathwayCatalog};

pub const ONTOLOGY_NAME: &str = "KEGG Pathways";

pub fn ontology() -> Ontology {
    Ontology {
        name: ONTOLOGY_NAME.to_string(),
        prefix: KEGG_PATHWAY_PREFIX.to_string(),
        typedefs: Relation::ALL.iter().map(|rel| rel.typedef()).collect(),
        auto_generated_by: format!("bio2obo:{KEGG_PATHWAY_PREFIX}"),
        date: chrono::Utc::now().format("%d:%m:%Y %H:%M").to_string(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub map_terms: usize,
    pub genomes_joined: usize,
    pub genomes_missing: usize,
    pub genomes_failed: usize,
    pub unresolved_links: usize,
    pub skipped_lines: usize,
    pub terms: usize,
}

pub struct TermStream<'a, F: GenomeFileFetcher + ?Sized> {
    map_terms: std::vec::IntoIter<Term>,
    genomes: GenomePaths<'a, F>,
    current: std::vec::IntoIter<Term>,
    summary: RunSummary,
}

impl<'a, F: GenomeFileFetcher + ?Sized> TermStream<'a, F> {
    pub fn new(map_terms: Vec<Term>, genomes: GenomePaths<'a, F>) -> Self {
        let summary = RunSummary {
            map_terms: map_terms.len(),
            ..RunSummary::default()
        };
        Self {
            map_terms: map_terms.into_iter(),
            genomes,
            current: Vec::new().into_iter(),
            summary,
        }
    }

    pub fn summary(&self) -> RunSummary {
        let DriverStats {
            missing, failed, ..
        } = self.genomes.stats();
        RunSummary {
            genomes_missing: missing,
            genomes_failed: self.summary.genomes_failed + failed,
            ..self.summary
        }
    }

    fn advance_genome(&mut self) -> bool {
        for files in self.genomes.by_ref() {
            match join_genome_files(&files.genome, &files.list_path, &files.link_path) {
                Ok(join) => {
                    debug!(
                        genome = %files.genome.code,
                        terms = join.terms.len(),
                        unresolved = join.unresolved.len(),
                        "joined genome"
                    );
                    self.summary.genomes_joined += 1;
                    self.summary.unresolved_links += join.unresolved.len();
                    self.summary.skipped_lines += join.skipped_lines;
                    self.current = join.terms.into_iter();
                    return true;
                }
                Err(err) => {
                    warn!(genome = %files.genome.code, error = %err, "skipping genome");
                    self.summary.genomes_failed += 1;
                }
            }
        }
        false
    }
}

impl<F: GenomeFileFetcher + ?Sized> Iterator for TermStream<'_, F> {
    type Item = Term;

    fn next(&mut self) -> Option<Term> {
        if let Some(term) = self.map_terms.next() {
            self.summary.terms += 1;
            return Some(term);
        }
        loop {
            if let Some(term) = self.current.next() {
                self.summary.terms += 1;
                return Some(term);
            }
            if !self.advance_genome() {
                return None;
            }
        }
    }
}

pub fn iter_terms<S>(source: &S) -> Result<TermStream<'_, S>, KeggError>
where
    S: PathwayCatalog + GenomeCatalog + GenomeFileFetcher,
{
    let map_terms = map_terms(source)?;
    let genomes = source.genomes()?;
    Ok(TermStream::new(map_terms, GenomePaths::new(genomes, source)))
}
