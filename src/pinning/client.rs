use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use tracing::debug;

use super::files::{ListFilesResponse, Page, PinResponse, Visibility};
use crate::cleaner::pager::{DeleteOutcome, FileStore};
use crate::common::config::Config;
use crate::common::credentials::PinataCredentials;
use crate::common::errors::{OnpullError, Result};

/// Name given to every pinned memory upload
pub const MEMORY_FILE_NAME: &str = "memory.txt";

/// Blocking client for the Pinata REST API.
///
/// The bearer credential is fixed at construction and never changes.
pub struct PinataClient {
    http: Client,
    api_url: String,
    credentials: PinataCredentials,
}

impl PinataClient {
    pub fn new(config: &Config, credentials: PinataCredentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OnpullError::Transport {
                url: config.pinata_api_url.clone(),
                source: e,
            })?;
        Ok(Self {
            http,
            api_url: config.pinata_api_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    fn files_url(&self) -> String {
        format!("{}/v3/files", self.api_url)
    }

    /// Fetch one page of file records for a visibility scope
    pub fn list_files(
        &self,
        page_token: Option<&str>,
        limit: u32,
        visibility: Visibility,
    ) -> Result<Page> {
        let url = self.files_url();
        let mut query = vec![
            ("limit", limit.to_string()),
            ("visibility", visibility.to_string()),
        ];
        if let Some(token) = page_token {
            query.push(("page_token", token.to_string()));
        }

        debug!(%visibility, limit, page_token = ?page_token, "listing files");

        let resp = self
            .http
            .get(&url)
            .query(&query)
            .bearer_auth(self.credentials.jwt.expose())
            .send()
            .map_err(|e| OnpullError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| OnpullError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if !status.is_success() {
            return Err(OnpullError::Listing {
                visibility,
                status: status.as_u16(),
                detail: body,
            });
        }

        let parsed: ListFilesResponse =
            serde_json::from_str(&body).map_err(|e| OnpullError::Decode {
                url,
                message: e.to_string(),
            })?;
        Ok(parsed.into())
    }

    /// Delete a single file by id. Only a 200 counts as success.
    pub fn delete_file(&self, id: &str) -> DeleteOutcome {
        let url = format!("{}/{}", self.files_url(), id);
        let resp = self
            .http
            .delete(&url)
            .bearer_auth(self.credentials.jwt.expose())
            .send();

        match resp {
            Ok(resp) if resp.status() == StatusCode::OK => DeleteOutcome::Deleted,
            Ok(resp) => {
                let status = resp.status();
                let detail = resp
                    .text()
                    .unwrap_or_else(|e| format!("status {} (body unreadable: {})", status, e));
                DeleteOutcome::Failed { detail }
            }
            Err(e) => DeleteOutcome::Failed {
                detail: e.to_string(),
            },
        }
    }

    /// Pin raw bytes as a file and return its CID
    pub fn pin_bytes(&self, content: Vec<u8>) -> Result<String> {
        let url = format!("{}/pinning/pinFileToIPFS", self.api_url);
        let part = multipart::Part::bytes(content)
            .file_name(MEMORY_FILE_NAME)
            .mime_str("application/octet-stream")
            .map_err(|e| OnpullError::Transport {
                url: url.clone(),
                source: e,
            })?;
        let form = multipart::Form::new().part("file", part);

        let resp = self
            .http
            .post(&url)
            .bearer_auth(self.credentials.jwt.expose())
            .multipart(form)
            .send()
            .map_err(|e| OnpullError::Transport {
                url: url.clone(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| OnpullError::Transport {
            url: url.clone(),
            source: e,
        })?;

        if status.as_u16() >= 400 {
            // Prefer the structured error if the service sent JSON
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .map(|v| v.to_string())
                .unwrap_or(body);
            return Err(OnpullError::Pin {
                status: status.as_u16(),
                detail,
            });
        }

        let pinned: PinResponse = serde_json::from_str(&body).map_err(|e| OnpullError::Decode {
            url,
            message: e.to_string(),
        })?;
        debug!(cid = %pinned.ipfs_hash, size = ?pinned.pin_size, "pinned memory");
        Ok(pinned.ipfs_hash)
    }
}

/// Read-only access to pinned content
pub trait ContentGateway {
    fn fetch(&self, cid: &str) -> Result<Vec<u8>>;
}

/// Public IPFS gateway; needs no credential
pub struct Gateway {
    http: Client,
    gateway_url: String,
}

impl Gateway {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OnpullError::Transport {
                url: config.gateway_url.clone(),
                source: e,
            })?;
        Ok(Self {
            http,
            gateway_url: config.gateway_url.trim_end_matches('/').to_string(),
        })
    }
}

impl ContentGateway for Gateway {
    fn fetch(&self, cid: &str) -> Result<Vec<u8>> {
        let url = format!("{}/ipfs/{}", self.gateway_url, cid);
        let resp = self.http.get(&url).send().map_err(|e| OnpullError::Transport {
            url: url.clone(),
            source: e,
        })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(OnpullError::Gateway {
                url,
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().map_err(|e| OnpullError::Transport { url, source: e })?;
        Ok(bytes.to_vec())
    }
}

/// Sink for encrypted memory bodies
pub trait ContentPinner {
    fn pin(&self, content: Vec<u8>) -> Result<String>;
}

impl ContentPinner for PinataClient {
    fn pin(&self, content: Vec<u8>) -> Result<String> {
        self.pin_bytes(content)
    }
}

impl FileStore for PinataClient {
    fn list_page(
        &mut self,
        page_token: Option<&str>,
        limit: u32,
        visibility: Visibility,
    ) -> Result<Page> {
        self.list_files(page_token, limit, visibility)
    }

    fn delete_one(&mut self, id: &str) -> DeleteOutcome {
        self.delete_file(id)
    }
}
