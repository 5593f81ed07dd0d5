use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum KeggError {
    #[error("malformed identifier: {0}")]
    MalformedIdentifier(String),

    #[error("malformed line {line_number} in {path}: {line:?}")]
    MalformedLine {
        path: String,
        line_number: usize,
        line: String,
    },

    #[error("KEGG resource not found: {url}")]
    NotFound { url: String },

    #[error("KEGG request to {url} failed: {message}")]
    KeggHttp { url: String, message: String },

    #[error("KEGG returned status {status} for {url}: {message}")]
    KeggStatus {
        status: u16,
        url: String,
        message: String,
    },

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("failed to serialize ontology: {0}")]
    Serialize(String),
}

impl KeggError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, KeggError::NotFound { .. })
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            KeggError::NotFound { url }
            | KeggError::KeggHttp { url, .. }
            | KeggError::KeggStatus { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            KeggError::NotFound { .. } => Some(404),
            KeggError::KeggStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
