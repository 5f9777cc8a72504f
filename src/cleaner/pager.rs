use serde::Serialize;
use tracing::{debug, info, warn};

use crate::common::errors::{OnpullError, Result};
use crate::pinning::files::{Page, Visibility};

/// Result of a single delete request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Remote refused or the request never completed; `detail` is the
    /// response body or transport error text
    Failed { detail: String },
}

/// Remote listing and deletion of pinned files
pub trait FileStore {
    fn list_page(
        &mut self,
        page_token: Option<&str>,
        limit: u32,
        visibility: Visibility,
    ) -> Result<Page>;

    fn delete_one(&mut self, id: &str) -> DeleteOutcome;
}

/// A delete that the remote refused
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub id: String,
    pub detail: String,
}

/// What one cleanup pass over a scope did.
///
/// `attempted` counts every delete request issued, failed or not;
/// `succeeded` only counts confirmed deletions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScopeReport {
    pub visibility: Visibility,
    pub attempted: usize,
    pub succeeded: usize,
    pub pages_fetched: usize,
    pub failures: Vec<DeleteFailure>,
}

impl ScopeReport {
    fn new(visibility: Visibility) -> Self {
        Self {
            visibility,
            attempted: 0,
            succeeded: 0,
            pages_fetched: 0,
            failures: Vec::new(),
        }
    }
}

/// Drains a visibility scope page by page, deleting every record found
pub struct Pager<S> {
    store: S,
    limit: u32,
}

impl<S: FileStore> Pager<S> {
    /// A zero page size would never drain a scope, so it is refused
    pub fn new(store: S, limit: u32) -> Result<Self> {
        if limit == 0 {
            return Err(OnpullError::config("page limit must be at least 1"));
        }
        Ok(Self { store, limit })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Delete every file in `visibility`.
    ///
    /// Stops at the first empty page or the first page without a next
    /// token. A listing failure aborts the pass; individual delete
    /// failures are recorded and the pass continues.
    pub fn clean_scope(&mut self, visibility: Visibility) -> Result<ScopeReport> {
        let mut report = ScopeReport::new(visibility);
        let mut page_token: Option<String> = None;

        loop {
            let page = self
                .store
                .list_page(page_token.as_deref(), self.limit, visibility)?;
            report.pages_fetched += 1;
            debug!(
                %visibility,
                page = report.pages_fetched,
                files = page.files.len(),
                "fetched page"
            );

            if page.is_empty() {
                break;
            }

            for file in &page.files {
                info!(%visibility, id = %file.id, name = file.name().unwrap_or(""), "deleting file");
                match self.store.delete_one(&file.id) {
                    DeleteOutcome::Deleted => {
                        info!(id = %file.id, "deleted");
                        report.succeeded += 1;
                    }
                    DeleteOutcome::Failed { detail } => {
                        warn!(id = %file.id, %detail, "delete failed");
                        report.failures.push(DeleteFailure {
                            id: file.id.clone(),
                            detail,
                        });
                    }
                }
                report.attempted += 1;
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        info!(
            %visibility,
            attempted = report.attempted,
            succeeded = report.succeeded,
            "scope cleanup finished"
        );
        Ok(report)
    }
}
