//! Structured error type for every fallible operation this crate exposes.

use std::path::PathBuf;

/// The five error kinds produced by parsers, the sysfs reader, the event
/// resolver and the catalog adapter.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// An input string (range, range-list, assignment, assignment-list or
    /// config-def) violated its grammar.
    #[error("failed to parse {what}: {input:?}")]
    Parse { what: &'static str, input: String },

    /// A sysfs file or directory that is required for the operation to
    /// proceed does not exist.
    #[error("sysfs node missing: {0}")]
    MissingSysfsNode(PathBuf),

    /// Opening, reading or listing a sysfs node failed for a reason other
    /// than the node being absent.
    #[error("sysfs i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No event with the requested name exists in the given PMU instance.
    #[error("event {0:?} not found")]
    EventNotFound(String),

    /// `catalog_for` found no catalog entry whose cpuid pattern matches the
    /// running CPU.
    #[error("no catalog applies to this cpu")]
    NoApplicableCatalog,
}

pub type Result<T> = std::result::Result<T, Error>;
