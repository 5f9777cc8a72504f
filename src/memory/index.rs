use reqwest::blocking::Client;
use tracing::debug;

use super::record::{LookupKey, MemoryRow};
use crate::common::config::Config;
use crate::common::credentials::SupabaseCredentials;
use crate::common::errors::{OnpullError, Result};

/// Where memory rows are recorded and looked up
pub trait MemoryIndex {
    fn insert(&self, row: &MemoryRow) -> Result<()>;

    /// Rows whose `key` column equals `value`, oldest first
    fn query(&self, key: LookupKey, value: &str) -> Result<Vec<MemoryRow>>;
}

/// Memory index backed by a Supabase table through its REST endpoint
pub struct SupabaseIndex {
    http: Client,
    table_url: String,
    credentials: SupabaseCredentials,
}

impl SupabaseIndex {
    pub fn new(config: &Config, credentials: SupabaseCredentials) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| OnpullError::Transport {
                url: credentials.url.clone(),
                source: e,
            })?;
        Ok(Self {
            http,
            table_url: format!("{}/rest/v1/{}", credentials.url, config.memory_table),
            credentials,
        })
    }

    fn authed(&self, req: reqwest::blocking::RequestBuilder) -> reqwest::blocking::RequestBuilder {
        let key = self.credentials.key.expose();
        req.header("apikey", key).bearer_auth(key)
    }
}

impl MemoryIndex for SupabaseIndex {
    fn insert(&self, row: &MemoryRow) -> Result<()> {
        let resp = self
            .authed(self.http.post(&self.table_url))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .map_err(|e| OnpullError::Transport {
                url: self.table_url.clone(),
                source: e,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().unwrap_or_default();
            return Err(OnpullError::Index {
                status: status.as_u16(),
                detail,
            });
        }
        debug!(batch_id = %row.batch_id, cid = %row.ipfs_cid, "indexed memory");
        Ok(())
    }

    fn query(&self, key: LookupKey, value: &str) -> Result<Vec<MemoryRow>> {
        let filter = format!("eq.{}", value);
        let resp = self
            .authed(self.http.get(&self.table_url))
            .query(&[
                ("select", "*"),
                (key.column(), filter.as_str()),
                ("order", "created_at.asc"),
            ])
            .send()
            .map_err(|e| OnpullError::Transport {
                url: self.table_url.clone(),
                source: e,
            })?;

        let status = resp.status();
        let body = resp.text().map_err(|e| OnpullError::Transport {
            url: self.table_url.clone(),
            source: e,
        })?;
        if !status.is_success() {
            return Err(OnpullError::Index {
                status: status.as_u16(),
                detail: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| OnpullError::Decode {
            url: self.table_url.clone(),
            message: e.to_string(),
        })
    }
}
