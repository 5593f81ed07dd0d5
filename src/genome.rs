use std::io::BufRead;

use tracing::{debug, warn};

use crate::domain::Reference;
use crate::resolver::genome_reference;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeggGenome {
    pub code: String,
    pub name: String,
    pub taxonomy_id: Option<String>,
}

impl KeggGenome {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        taxonomy_id: Option<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            taxonomy_id,
        }
    }

    pub fn reference(&self) -> Reference {
        genome_reference(&self.code, &self.name)
    }
}

pub fn parse_genome_line(line: &str) -> Option<KeggGenome> {
    let (_entry, rest) = line.trim().split_once('\t')?;
    let (codes, name) = match rest.split_once(';') {
        Some((codes, name)) => (codes, name.trim()),
        None => (rest, ""),
    };
    let tokens = codes
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>();
    let code = tokens
        .first()
        .filter(|token| !is_taxonomy_id(token))?;
    let taxonomy_id = tokens
        .last()
        .filter(|token| tokens.len() > 1 && is_taxonomy_id(token))
        .map(|token| token.to_string());
    Some(KeggGenome::new(*code, name, taxonomy_id))
}

pub fn iter_genomes<R: BufRead>(reader: R) -> impl Iterator<Item = KeggGenome> {
    reader
        .lines()
        .map_while(|line| {
            line.map_err(|err| warn!(error = %err, "genome list read failed"))
                .ok()
        })
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| {
            let genome = parse_genome_line(&line);
            if genome.is_none() {
                debug!(line_number = index + 1, line = %line, "skipping genome entry");
            }
            genome
        })
}

fn is_taxonomy_id(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|ch| ch.is_ascii_digit())
}
