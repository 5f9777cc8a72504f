use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// One row of the memory index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryRow {
    pub ai_id: String,
    pub created_at: String,
    pub hash_key: String,
    pub ipfs_cid: String,
    pub batch_id: String,
}

impl MemoryRow {
    /// Build the index row for freshly pinned content
    pub fn new(ai_id: &str, content: &str, ipfs_cid: &str, now: DateTime<Utc>) -> Self {
        let created_at = naive_iso_timestamp(now);
        Self {
            ai_id: ai_id.to_string(),
            hash_key: hash_key(content, &created_at),
            created_at,
            ipfs_cid: ipfs_cid.to_string(),
            batch_id: uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// UTC timestamp without an offset suffix. The fraction is printed as six
/// digits and omitted entirely on a whole second, so rows line up with
/// the ones already in the index.
fn naive_iso_timestamp(now: DateTime<Utc>) -> String {
    if now.nanosecond() / 1_000 == 0 {
        now.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// SHA-256 hex digest of the plaintext followed by its timestamp
pub fn hash_key(content: &str, created_at: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hasher.update(created_at.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Column a recall query filters on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKey {
    AiId,
    IpfsCid,
    BatchId,
}

impl LookupKey {
    pub fn column(&self) -> &'static str {
        match self {
            LookupKey::AiId => "ai_id",
            LookupKey::IpfsCid => "ipfs_cid",
            LookupKey::BatchId => "batch_id",
        }
    }
}

impl fmt::Display for LookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for LookupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai_id" => Ok(LookupKey::AiId),
            "ipfs_cid" => Ok(LookupKey::IpfsCid),
            "batch_id" => Ok(LookupKey::BatchId),
            other => Err(format!("unknown lookup column '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_row_fields() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 0).unwrap();
        let row = MemoryRow::new("ai_core_001", "hello", "bafycid", now);

        assert_eq!(row.ai_id, "ai_core_001");
        assert_eq!(row.created_at, "2025-03-01T08:30:00");
        assert_eq!(row.ipfs_cid, "bafycid");
        assert_eq!(row.hash_key, hash_key("hello", &row.created_at));
        assert_eq!(row.hash_key.len(), 64);
        assert!(uuid::Uuid::parse_str(&row.batch_id).is_ok());
    }

    #[test]
    fn test_created_at_keeps_microseconds() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 5).unwrap()
            + chrono::Duration::microseconds(26_490);
        assert_eq!(naive_iso_timestamp(now), "2025-03-01T08:30:05.026490");

        let sub_micro = Utc.with_ymd_and_hms(2025, 3, 1, 8, 30, 5).unwrap()
            + chrono::Duration::nanoseconds(999);
        assert_eq!(naive_iso_timestamp(sub_micro), "2025-03-01T08:30:05");
    }

    #[test]
    fn test_hash_key_known_value() {
        // sha256("abc")
        assert_eq!(
            hash_key("ab", "c"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_lookup_key_parse() {
        assert_eq!("batch_id".parse::<LookupKey>().unwrap(), LookupKey::BatchId);
        assert!("display_name".parse::<LookupKey>().is_err());
        assert_eq!(LookupKey::IpfsCid.to_string(), "ipfs_cid");
    }
}
