use serde::Serialize;
use tracing::error;

use super::pager::{FileStore, Pager, ScopeReport};
use crate::common::errors::{OnpullError, Result};
use crate::pinning::files::Visibility;

/// How a listing failure in one scope affects the scopes after it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// First scope failure stops the whole run
    #[default]
    AllOrNothing,
    /// Each scope gets its own failure boundary
    PerScope,
}

/// Per-scope result of a full cleanup run
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScopeResult {
    Completed(ScopeReport),
    Failed {
        visibility: Visibility,
        error: String,
    },
}

impl ScopeResult {
    pub fn visibility(&self) -> Visibility {
        match self {
            ScopeResult::Completed(report) => report.visibility,
            ScopeResult::Failed { visibility, .. } => *visibility,
        }
    }
}

/// Report from cleaning every scope
#[derive(Debug, Default, Serialize)]
pub struct CleanupReport {
    pub scopes: Vec<ScopeResult>,
}

impl CleanupReport {
    pub fn total_attempted(&self) -> usize {
        self.completed().map(|r| r.attempted).sum()
    }

    pub fn total_succeeded(&self) -> usize {
        self.completed().map(|r| r.succeeded).sum()
    }

    pub fn has_failed_scope(&self) -> bool {
        self.scopes
            .iter()
            .any(|s| matches!(s, ScopeResult::Failed { .. }))
    }

    fn completed(&self) -> impl Iterator<Item = &ScopeReport> {
        self.scopes.iter().filter_map(|s| match s {
            ScopeResult::Completed(report) => Some(report),
            ScopeResult::Failed { .. } => None,
        })
    }
}

/// Clean `public` then `private`, one after the other.
///
/// With [`Boundary::AllOrNothing`] a scope failure is returned as the
/// error and later scopes never run. With [`Boundary::PerScope`] the
/// failure is recorded in the report and the next scope still runs.
/// Errors that are not scope-specific always abort.
pub fn clean_all<S: FileStore>(pager: &mut Pager<S>, boundary: Boundary) -> Result<CleanupReport> {
    let mut report = CleanupReport::default();

    for visibility in Visibility::ALL {
        match pager.clean_scope(visibility) {
            Ok(scope) => report.scopes.push(ScopeResult::Completed(scope)),
            Err(e) if boundary == Boundary::PerScope && e.is_scope_fatal() => {
                error!(%visibility, error = %e, "scope cleanup aborted");
                report.scopes.push(ScopeResult::Failed {
                    visibility,
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleaner::pager::DeleteOutcome;
    use crate::pinning::files::{FileRecord, Page};

    /// Public listing always fails; private holds one file
    struct BrokenPublicStore {
        scopes_listed: Vec<Visibility>,
    }

    impl FileStore for BrokenPublicStore {
        fn list_page(
            &mut self,
            _page_token: Option<&str>,
            _limit: u32,
            visibility: Visibility,
        ) -> Result<Page> {
            self.scopes_listed.push(visibility);
            match visibility {
                Visibility::Public => Err(OnpullError::Listing {
                    visibility,
                    status: 503,
                    detail: "unavailable".to_string(),
                }),
                Visibility::Private => Ok(Page::new(vec![FileRecord::new("p1")], None)),
            }
        }

        fn delete_one(&mut self, _id: &str) -> DeleteOutcome {
            DeleteOutcome::Deleted
        }
    }

    fn broken_pager() -> Pager<BrokenPublicStore> {
        Pager::new(
            BrokenPublicStore {
                scopes_listed: Vec::new(),
            },
            100,
        )
        .unwrap()
    }

    #[test]
    fn test_all_or_nothing_skips_private() {
        let mut pager = broken_pager();
        let result = clean_all(&mut pager, Boundary::AllOrNothing);

        assert!(matches!(result, Err(OnpullError::Listing { status: 503, .. })));
        assert_eq!(pager.store().scopes_listed, vec![Visibility::Public]);
    }

    #[test]
    fn test_per_scope_boundary_still_cleans_private() {
        let mut pager = broken_pager();
        let report = clean_all(&mut pager, Boundary::PerScope).unwrap();

        assert!(report.has_failed_scope());
        assert_eq!(report.scopes.len(), 2);
        assert_eq!(report.scopes[0].visibility(), Visibility::Public);
        assert_eq!(report.scopes[1].visibility(), Visibility::Private);
        assert_eq!(report.total_attempted(), 1);
        assert_eq!(report.total_succeeded(), 1);
        assert_eq!(
            pager.store().scopes_listed,
            vec![Visibility::Public, Visibility::Private]
        );
    }
}
