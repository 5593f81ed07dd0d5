use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};

use crate::error::KeggError;

pub const DEFAULT_BASE_URL: &str = "https://rest.kegg.jp";

pub trait KeggClient: Send + Sync {
    fn download_pathway_list(&self, destination: &Path) -> Result<(), KeggError>;
    fn download_genome_list(&self, destination: &Path) -> Result<(), KeggError>;
    fn download_genome_pathway_list(&self, code: &str, destination: &Path)
    -> Result<(), KeggError>;
    fn download_genome_pathway_links(
        &self,
        code: &str,
        destination: &Path,
    ) -> Result<(), KeggError>;
}

#[derive(Clone)]
pub struct KeggHttpClient {
    client: Client,
    base_url: String,
}

impl KeggHttpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, KeggError> {
        let mut headers = HeaderMap::new();
        let agent = format!("kegg-pathway-obo/{}", env!("CARGO_PKG_VERSION"));
        headers.insert(USER_AGENT, user_agent(base_url, &agent)?);
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| KeggError::KeggHttp {
                url: base_url.to_string(),
                message: err.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn pathway_list_url(&self) -> String {
        format!("{}/list/pathway", self.base_url)
    }

    pub fn genome_list_url(&self) -> String {
        format!("{}/list/genome", self.base_url)
    }

    pub fn genome_pathway_list_url(&self, code: &str) -> String {
        format!("{}/list/pathway/{code}", self.base_url)
    }

    pub fn genome_pathway_links_url(&self, code: &str) -> String {
        format!("{}/link/pathway/{code}", self.base_url)
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), KeggError> {
        let mut response = self.send_with_retries(url)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(KeggError::NotFound {
                url: url.to_string(),
            });
        }
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "KEGG request failed".to_string());
            return Err(KeggError::KeggStatus {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            });
        }
        let mut file =
            File::create(destination).map_err(|err| KeggError::Filesystem(err.to_string()))?;
        std::io::copy(&mut response, &mut file)
            .map_err(|err| KeggError::Filesystem(err.to_string()))?;
        Ok(())
    }

    fn send_with_retries(&self, url: &str) -> Result<reqwest::blocking::Response, KeggError> {
        const MAX_RETRIES: usize = 3;
        const BASE_DELAY_MS: u64 = 200;
        let mut attempt = 0usize;
        loop {
            match self.client.get(url).send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < MAX_RETRIES && is_retryable_status(status) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Ok(resp);
                }
                Err(err) => {
                    if attempt < MAX_RETRIES && is_retryable_error(&err) {
                        let delay = BASE_DELAY_MS * (attempt as u64 + 1);
                        thread::sleep(Duration::from_millis(delay));
                        attempt += 1;
                        continue;
                    }
                    return Err(KeggError::KeggHttp {
                        url: url.to_string(),
                        message: err.to_string(),
                    });
                }
            }
        }
    }
}

impl KeggClient for KeggHttpClient {
    fn download_pathway_list(&self, destination: &Path) -> Result<(), KeggError> {
        self.download(&self.pathway_list_url(), destination)
    }

    fn download_genome_list(&self, destination: &Path) -> Result<(), KeggError> {
        self.download(&self.genome_list_url(), destination)
    }

    fn download_genome_pathway_list(
        &self,
        code: &str,
        destination: &Path,
    ) -> Result<(), KeggError> {
        self.download(&self.genome_pathway_list_url(code), destination)
    }

    fn download_genome_pathway_links(
        &self,
        code: &str,
        destination: &Path,
    ) -> Result<(), KeggError> {
        self.download(&self.genome_pathway_links_url(code), destination)
    }
}

fn user_agent(base_url: &str, agent: &str) -> Result<HeaderValue, KeggError> {
    HeaderValue::from_str(agent).map_err(|err| KeggError::KeggHttp {
        url: base_url.to_string(),
        message: format!("invalid user agent: {err}"),
    })
}

fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_request()
}
