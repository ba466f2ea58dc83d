//! Pseudonymization of DICOM-style imaging records: quarantine screening,
//! whitelist-based attribute filtering, and accession number substitution
//! against a persistent, reconciled serial number index.

pub use pseudon_core as core;
pub use pseudon_index as index;
pub use pseudon_pipeline as pipeline;
pub use pseudon_rules as rules;

#[cfg(test)]
mod integration_tests;
