pub mod driver;
pub mod pager;

pub use driver::{clean_all, Boundary, CleanupReport, ScopeResult};
pub use pager::{DeleteFailure, DeleteOutcome, FileStore, Pager, ScopeReport};
