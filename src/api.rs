use std::fs::File;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

use crate::catalog::parse_pathway_catalog;
use crate::error::KeggError;
use crate::genome::{KeggGenome, iter_genomes};
use crate::kegg::KeggClient;
use crate::source::{GenomeCatalog, GenomeFileFetcher, PathwayCatalog};
use crate::store::Store;

#[derive(Clone)]
pub struct KeggApi<C: KeggClient> {
    store: Store,
    client: C,
    force: bool,
}

impl<C: KeggClient> KeggApi<C> {
    pub fn new(store: Store, client: C) -> Self {
        Self {
            store,
            client,
            force: false,
        }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn ensure_list_pathways(&self) -> Result<Utf8PathBuf, KeggError> {
        let path = self.store.pathway_list_path();
        self.ensure(&path, |temp| self.client.download_pathway_list(temp))?;
        Ok(path)
    }

    pub fn ensure_list_genomes(&self) -> Result<Utf8PathBuf, KeggError> {
        let path = self.store.genome_list_path();
        self.ensure(&path, |temp| self.client.download_genome_list(temp))?;
        Ok(path)
    }

    pub fn ensure_list_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError> {
        let path = self.store.genome_pathway_list_path(code);
        self.ensure(&path, |temp| {
            self.client.download_genome_pathway_list(code, temp)
        })?;
        Ok(path)
    }

    pub fn ensure_link_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError> {
        let path = self.store.genome_pathway_links_path(code);
        self.ensure(&path, |temp| {
            self.client.download_genome_pathway_links(code, temp)
        })?;
        Ok(path)
    }

    fn ensure<F>(&self, path: &Utf8Path, download: F) -> Result<(), KeggError>
    where
        F: FnOnce(&std::path::Path) -> Result<(), KeggError>,
    {
        if !self.force && Store::exists(path) {
            debug!(path = %path, "using cached file");
            return Ok(());
        }
        debug!(path = %path, "downloading");
        Store::write_file_atomic(path, download)
    }
}

impl<C: KeggClient> PathwayCatalog for KeggApi<C> {
    fn pathways(&self) -> Result<Vec<(String, String)>, KeggError> {
        let path = self.ensure_list_pathways()?;
        parse_pathway_catalog(open(&path)?, path.as_str())
    }
}

impl<C: KeggClient> GenomeCatalog for KeggApi<C> {
    fn genomes(&self) -> Result<Box<dyn Iterator<Item = KeggGenome> + '_>, KeggError> {
        let path = self.ensure_list_genomes()?;
        Ok(Box::new(iter_genomes(open(&path)?)))
    }
}

impl<C: KeggClient> GenomeFileFetcher for KeggApi<C> {
    fn list_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError> {
        self.ensure_list_pathway_genome(code)
    }

    fn link_pathway_genome(&self, code: &str) -> Result<Utf8PathBuf, KeggError> {
        self.ensure_link_pathway_genome(code)
    }
}

fn open(path: &Utf8Path) -> Result<BufReader<File>, KeggError> {
    let file = File::open(path.as_std_path())
        .map_err(|err| KeggError::Filesystem(format!("open {path}: {err}")))?;
    Ok(BufReader::new(file))
}
