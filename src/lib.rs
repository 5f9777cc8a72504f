//! # onpull
//!
//! Personal memory archiving on top of IPFS.
//!
//! - **Archive**: encrypt a short text memory, pin it through Pinata and
//!   index the CID in a Supabase table
//! - **Recall**: look memories up by identity, CID or batch and decrypt them
//! - **Import**: archive the first record of a JSON export
//! - **Keygen**: generate a per-identity encryption key
//! - **Clean**: page through every pinned file, public then private, and
//!   delete them one by one

pub mod cleaner;
pub mod cli;
pub mod common;
pub mod memory;
pub mod pinning;

pub use cleaner::{clean_all, Boundary, CleanupReport, DeleteOutcome, FileStore, Pager, ScopeReport};
pub use common::errors::{OnpullError, Result};
pub use pinning::{FileRecord, Page, Visibility};
