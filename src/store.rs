use std::fs;
use std::path::Path;

use camino::{Utf8Path, Utf8PathBuf};
use directories::BaseDirs;
use tempfile::{Builder, NamedTempFile};

use crate::domain::KEGG_PATHWAY_PREFIX;
use crate::error::KeggError;

#[derive(Debug, Clone)]
pub struct Store {
    cache_root: Utf8PathBuf,
}

impl Store {
    pub fn new() -> Result<Self, KeggError> {
        Ok(Self::new_with_root(default_cache_root()?))
    }

    pub fn new_with_root(cache_root: Utf8PathBuf) -> Self {
        Self { cache_root }
    }

    pub fn cache_root(&self) -> &Utf8Path {
        &self.cache_root
    }

    fn pathway_dir(&self) -> Utf8PathBuf {
        self.cache_root.join(KEGG_PATHWAY_PREFIX)
    }

    pub fn pathway_list_path(&self) -> Utf8PathBuf {
        self.pathway_dir().join("list_pathway.tsv")
    }

    pub fn genome_list_path(&self) -> Utf8PathBuf {
        self.cache_root.join("kegg.genome").join("list_genome.tsv")
    }

    pub fn genome_dir(&self, code: &str) -> Utf8PathBuf {
        self.pathway_dir().join("genomes").join(code)
    }

    pub fn genome_pathway_list_path(&self, code: &str) -> Utf8PathBuf {
        self.genome_dir(code).join(format!("list_pathway_{code}.tsv"))
    }

    pub fn genome_pathway_links_path(&self, code: &str) -> Utf8PathBuf {
        self.genome_dir(code).join(format!("link_pathway_{code}.tsv"))
    }

    pub fn default_output_path(&self) -> Utf8PathBuf {
        self.pathway_dir()
            .join(format!("{KEGG_PATHWAY_PREFIX}.jsonl"))
    }

    pub fn ensure_cache_root(&self) -> Result<(), KeggError> {
        fs::create_dir_all(self.cache_root.as_std_path())
            .map_err(|err| KeggError::Filesystem(err.to_string()))
    }

    pub fn exists(path: &Utf8Path) -> bool {
        path.as_std_path().is_file()
    }

    /// Writes `dest` through a temporary sibling file so readers never see a
    /// partial download. The temporary file is removed if `fill` fails.
    pub fn write_file_atomic<F>(dest: &Utf8Path, fill: F) -> Result<(), KeggError>
    where
        F: FnOnce(&Path) -> Result<(), KeggError>,
    {
        let temp = Self::temp_sibling(dest)?;
        fill(temp.path())?;
        Self::persist(temp, dest)
    }

    pub fn temp_sibling(dest: &Utf8Path) -> Result<NamedTempFile, KeggError> {
        let parent = dest
            .parent()
            .ok_or_else(|| KeggError::Filesystem("invalid destination path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| KeggError::Filesystem(err.to_string()))?;
        Builder::new()
            .prefix("kegg-pathway-obo")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| KeggError::Filesystem(err.to_string()))
    }

    pub fn persist(temp: NamedTempFile, dest: &Utf8Path) -> Result<(), KeggError> {
        temp.persist(dest.as_std_path())
            .map_err(|err| KeggError::Filesystem(format!("persist {dest}: {err}")))?;
        Ok(())
    }
}

fn default_cache_root() -> Result<Utf8PathBuf, KeggError> {
    BaseDirs::new()
        .and_then(|dirs| {
            Utf8PathBuf::from_path_buf(dirs.home_dir().join(".cache").join("kegg-pathway-obo")).ok()
        })
        .ok_or_else(|| KeggError::Filesystem("unable to resolve cache directory".to_string()))
}
