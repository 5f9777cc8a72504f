use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use super::cipher::MemoryCipher;
use super::index::MemoryIndex;
use super::record::{LookupKey, MemoryRow};
use crate::common::errors::{OnpullError, Result};
use crate::pinning::client::{ContentGateway, ContentPinner};

/// Placeholder body that recall treats as "nothing stored"
const EMPTY_MARKER: &str = "EMPTY";

/// A memory that has been pinned and indexed
#[derive(Debug, Clone, Serialize)]
pub struct Archived {
    pub cid: String,
    pub batch_id: String,
    pub encrypted: bool,
}

/// A memory read back from the gateway
#[derive(Debug, Clone, Serialize)]
pub struct Recalled {
    /// 1-based position among all matching rows, skipped ones included
    pub position: usize,
    pub row: MemoryRow,
    pub content: String,
}

/// Single memory pulled out of an import file
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSource {
    pub content: String,
    /// Records after the first one, which are ignored
    pub skipped_records: usize,
}

#[derive(Debug, Deserialize)]
struct ImportRecord {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

/// Encrypt (when a key is configured), pin, then index one memory
pub fn archive(
    pinner: &dyn ContentPinner,
    index: &dyn MemoryIndex,
    cipher: Option<&MemoryCipher>,
    ai_id: &str,
    content: &str,
) -> Result<Archived> {
    require_ai_id(ai_id)?;
    if content.trim().is_empty() {
        return Err(OnpullError::validation("Memory content is empty"));
    }

    let body = match cipher {
        Some(cipher) => cipher.encrypt(content.as_bytes()),
        None => {
            warn!(ai_id, "no encryption key configured, pinning plaintext");
            content.as_bytes().to_vec()
        }
    };

    let cid = pinner.pin(body)?;
    let row = MemoryRow::new(ai_id, content, &cid, Utc::now());
    index.insert(&row)?;

    info!(ai_id, cid = %cid, batch_id = %row.batch_id, "memory archived");
    Ok(Archived {
        cid,
        batch_id: row.batch_id,
        encrypted: cipher.is_some(),
    })
}

/// Look memories up by `key = value` and read each one back.
/// Empty bodies and the `EMPTY` placeholder are skipped.
pub fn recall(
    gateway: &dyn ContentGateway,
    index: &dyn MemoryIndex,
    cipher: Option<&MemoryCipher>,
    key: LookupKey,
    value: &str,
) -> Result<Vec<Recalled>> {
    if value.trim().is_empty() {
        return Err(OnpullError::validation("Lookup value is empty"));
    }

    let rows = index.query(key, value)?;
    let mut recalled = Vec::new();

    for (idx, row) in rows.into_iter().enumerate() {
        let raw = gateway.fetch(&row.ipfs_cid)?;
        let content = match cipher {
            Some(cipher) => String::from_utf8(cipher.decrypt(&raw)?)
                .map_err(|_| OnpullError::crypto("decrypted memory is not UTF-8"))?,
            None => decode_dropping_invalid(&raw),
        };

        if is_blank_memory(&content) {
            continue;
        }
        recalled.push(Recalled {
            position: idx + 1,
            row,
            content,
        });
    }

    Ok(recalled)
}

/// Read the first memory out of a JSON file
pub fn read_import(path: &Path) -> Result<ImportSource> {
    let text = std::fs::read_to_string(path).map_err(|e| OnpullError::io(path, e))?;
    parse_import(&text)
}

/// Accepts either one object or an array of objects. Only the first
/// record is used; its `content` field wins over `text`.
pub fn parse_import(text: &str) -> Result<ImportSource> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| OnpullError::validation(format!("Import file is not valid JSON: {}", e)))?;

    let (first, skipped_records) = match value {
        serde_json::Value::Array(mut items) => {
            if items.is_empty() {
                return Err(OnpullError::validation("Import file contains no records"));
            }
            let skipped = items.len() - 1;
            (items.swap_remove(0), skipped)
        }
        other => (other, 0),
    };

    let record: ImportRecord = serde_json::from_value(first)
        .map_err(|e| OnpullError::validation(format!("Import record is malformed: {}", e)))?;
    let content = record
        .content
        .filter(|c| !c.is_empty())
        .or(record.text)
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(OnpullError::validation(
            "Import record is empty or has no content/text field",
        ));
    }

    Ok(ImportSource {
        content,
        skipped_records,
    })
}

/// Only a truly empty body or the `EMPTY` placeholder counts as blank;
/// whitespace-only memories are still shown
fn is_blank_memory(content: &str) -> bool {
    content.is_empty() || content.trim().to_uppercase() == EMPTY_MARKER
}

/// UTF-8 decode that skips invalid byte sequences instead of replacing them
fn decode_dropping_invalid(raw: &[u8]) -> String {
    raw.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

fn require_ai_id(ai_id: &str) -> Result<()> {
    if ai_id.trim().is_empty() {
        return Err(OnpullError::validation("AI id is empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_object() {
        let src = parse_import(r#"{"content":"remember this","ai_id":"other"}"#).unwrap();
        assert_eq!(src.content, "remember this");
        assert_eq!(src.skipped_records, 0);
    }

    #[test]
    fn test_parse_array_takes_first() {
        let src = parse_import(r#"[{"text":"first"},{"text":"second"},{"text":"third"}]"#).unwrap();
        assert_eq!(src.content, "first");
        assert_eq!(src.skipped_records, 2);
    }

    #[test]
    fn test_parse_falls_back_to_text() {
        let src = parse_import(r#"{"content":"","text":"from text"}"#).unwrap();
        assert_eq!(src.content, "from text");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert!(parse_import(r#"{"content":"   "}"#).is_err());
        assert!(parse_import(r#"{"title":"no body"}"#).is_err());
        assert!(parse_import("[]").is_err());
        assert!(parse_import("not json").is_err());
    }

    #[test]
    fn test_blank_memory_detection() {
        assert!(is_blank_memory(""));
        assert!(is_blank_memory(" empty "));
        assert!(is_blank_memory("EMPTY\n"));
        assert!(!is_blank_memory("  \n"));
        assert!(!is_blank_memory("empty handed"));
    }

    #[test]
    fn test_invalid_utf8_is_dropped() {
        assert_eq!(decode_dropping_invalid(b"ab\xffcd"), "abcd");
        assert_eq!(decode_dropping_invalid("記\u{FFFD}憶".as_bytes()), "記\u{FFFD}憶");
        assert_eq!(decode_dropping_invalid(b"\xe8\xa8"), "");
    }
}
