//! The persistent index that maps original accession numbers to their
//! assigned serial numbers, backed by SQLite, along with the reconciliation
//! step that merges an external linkage list into the index.

pub mod index;
pub mod linkage;

pub use index::{Index, IndexError};
pub use linkage::{LinkageError, ReconcileSummary, reconcile};
