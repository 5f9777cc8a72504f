use serde::{Deserialize, Serialize};
use std::fmt;

/// Partition of the remote file set. Each one is listed and cleaned
/// independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    /// Scopes in the order a full cleanup visits them
    pub const ALL: [Visibility; 2] = [Visibility::Public, Visibility::Private];

    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pinned file as reported by the listing endpoint.
///
/// Only `id` matters locally; everything else is kept verbatim so it
/// can be logged before deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: String,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

impl FileRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: serde_json::Map::new(),
        }
    }

    /// Display name if the remote sent one
    pub fn name(&self) -> Option<&str> {
        self.attributes.get("name").and_then(|v| v.as_str())
    }

    pub fn cid(&self) -> Option<&str> {
        self.attributes.get("cid").and_then(|v| v.as_str())
    }
}

/// One page of a listing, after defaults have been applied
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub files: Vec<FileRecord>,
    /// Cursor for the next page. `None` when the listing is exhausted;
    /// an empty string from the remote is normalised to `None`.
    pub next_page_token: Option<String>,
}

impl Page {
    pub fn new(files: Vec<FileRecord>, next_page_token: Option<&str>) -> Self {
        Self {
            files,
            next_page_token: next_page_token
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Wire shape of `GET /v3/files`.
///
/// Missing `data` means an empty page, missing `files` means no records,
/// and a missing or null `next_page_token` means no further page.
#[derive(Debug, Default, Deserialize)]
pub struct ListFilesResponse {
    #[serde(default)]
    pub data: Option<ListFilesData>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListFilesData {
    #[serde(default)]
    pub files: Vec<FileRecord>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<ListFilesResponse> for Page {
    fn from(resp: ListFilesResponse) -> Self {
        let data = resp.data.unwrap_or_default();
        Page::new(data.files, data.next_page_token.as_deref())
    }
}

/// Response of `POST /pinning/pinFileToIPFS`
#[derive(Debug, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default)]
    pub pin_size: Option<u64>,
}
