use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader};

use camino::Utf8Path;
use tracing::{debug, warn};

use crate::domain::{Relation, Term};
use crate::error::KeggError;
use crate::genome::KeggGenome;
use crate::resolver::{gene_reference, pathway_code, pathway_reference, reference_map};

#[derive(Debug, Default)]
pub struct GenomeJoin {
    pub terms: Vec<Term>,
    pub unresolved: Vec<String>,
    pub skipped_lines: usize,
}

pub type PathwayGenes = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Default)]
struct TermArena {
    terms: Vec<Term>,
    index: HashMap<String, usize>,
}

impl TermArena {
    fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    fn insert(&mut self, term: Term) {
        self.index
            .insert(term.identifier().to_string(), self.terms.len());
        self.terms.push(term);
    }

    fn get_mut(&mut self, code: &str) -> Option<&mut Term> {
        let slot = *self.index.get(code)?;
        self.terms.get_mut(slot)
    }

    fn into_terms(self) -> Vec<Term> {
        self.terms
    }
}

pub fn join_genome_files(
    genome: &KeggGenome,
    list_path: &Utf8Path,
    link_path: &Utf8Path,
) -> Result<GenomeJoin, KeggError> {
    let listing = open(list_path)?;
    let links = open(link_path)?;
    join_genome(genome, listing, list_path.as_str(), links, link_path.as_str())
}

pub fn join_genome<L: BufRead, K: BufRead>(
    genome: &KeggGenome,
    listing: L,
    listing_label: &str,
    links: K,
    links_label: &str,
) -> Result<GenomeJoin, KeggError> {
    let mut arena = TermArena::default();
    let mut skipped_lines = 0;

    for (index, line) in listing.lines().enumerate() {
        let line = line.map_err(|err| KeggError::Filesystem(err.to_string()))?;
        if line.trim().is_empty() {
            continue;
        }
        match pathway_term(genome, &line, listing_label, index + 1) {
            Ok(term) if arena.contains(term.identifier()) => {
                debug!(
                    genome = %genome.code,
                    pathway = %term.identifier(),
                    "duplicate pathway listing ignored"
                );
            }
            Ok(term) => arena.insert(term),
            Err(err) => {
                warn!(genome = %genome.code, error = %err, "skipping pathway listing line");
                skipped_lines += 1;
            }
        }
    }

    let (genes, skipped_links) = parse_link_table(links, links_label)?;
    skipped_lines += skipped_links;

    let mut unresolved = Vec::new();
    for (pathway, gene_ids) in genes {
        let Some(term) = arena.get_mut(&pathway) else {
            warn!(
                genome = %genome.code,
                pathway = %pathway,
                "could not find kegg.pathway:{pathway}"
            );
            unresolved.push(pathway);
            continue;
        };
        for gene_id in gene_ids {
            term.append_relationship(Relation::HasPart, gene_reference(&gene_id));
        }
    }

    Ok(GenomeJoin {
        terms: arena.into_terms(),
        unresolved,
        skipped_lines,
    })
}

fn pathway_term(
    genome: &KeggGenome,
    line: &str,
    label: &str,
    line_number: usize,
) -> Result<Term, KeggError> {
    let (raw_code, name) = line
        .trim()
        .split_once('\t')
        .ok_or_else(|| KeggError::MalformedLine {
            path: label.to_string(),
            line_number,
            line: line.to_string(),
        })?;
    let map = reference_map(raw_code)?;

    let mut term = Term::new(pathway_reference(raw_code, Some(name.trim())));
    term.append_relationship(Relation::SpeciesSpecific, map);
    term.append_relationship(Relation::InKeggTaxon, genome.reference());
    if let Some(taxonomy_id) = &genome.taxonomy_id {
        term.set_species(taxonomy_id);
    }
    Ok(term)
}

/// Groups `<gene-id>\t<path:code>` lines by pathway code. Returns the grouping
/// and the number of lines that had no tab separator.
pub fn parse_link_table<R: BufRead>(
    reader: R,
    label: &str,
) -> Result<(PathwayGenes, usize), KeggError> {
    let mut genes = PathwayGenes::new();
    let mut skipped = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| KeggError::Filesystem(err.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some((gene_id, pathway)) = trimmed.split_once('\t') else {
            warn!(path = label, line_number = index + 1, line = %line, "skipping link line");
            skipped += 1;
            continue;
        };
        genes
            .entry(pathway_code(pathway).to_string())
            .or_default()
            .insert(gene_id.trim().to_string());
    }
    Ok((genes, skipped))
}

fn open(path: &Utf8Path) -> Result<BufReader<File>, KeggError> {
    let file = File::open(path.as_std_path())
        .map_err(|err| KeggError::Filesystem(format!("open {path}: {err}")))?;
    Ok(BufReader::new(file))
}
