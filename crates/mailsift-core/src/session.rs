//! Extraction sessions: open, traverse, close, write.

use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::criteria::Criteria;
use crate::error::{Error, Result};
use crate::output::{OutputConfig, write_records};
use crate::store::{LocalStore, MailStore, StoreError};
use crate::traverse::{Traversal, TraversalStats, collect_matches};

/// Everything one extraction run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Path of the mail store to read.
    pub store_path: PathBuf,
    /// Filters applied to every message.
    pub criteria: Criteria,
    /// Where the matches are written.
    pub output: OutputConfig,
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    /// Number of records written.
    pub written: usize,
    /// File the records were written to.
    pub output_path: PathBuf,
    /// Traversal counters.
    pub stats: TraversalStats,
}

/// Runs `f` against an opened store and closes the store afterwards,
/// whether or not `f` succeeded.
///
/// # Errors
///
/// Returns the error from `f` if it failed. If `f` succeeded but closing
/// fails, returns the close error. A close error that follows a failure of
/// `f` is logged and the original error is returned.
pub fn with_store<S, T, F>(store: S, f: F) -> Result<T>
where
    S: MailStore,
    F: FnOnce(&S) -> Result<T>,
{
    let outcome = f(&store);
    let closed = store.close();

    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(e)) => Err(Error::Store(e)),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(close_error)) => {
            warn!("Failed to close mail store after error: {}", close_error);
            Err(e)
        }
    }
}

/// Traverses an opened store, closing it when done.
///
/// # Errors
///
/// Returns an error if the traversal or the close fails.
pub fn search<S: MailStore>(store: S, criteria: &Criteria) -> Result<Traversal> {
    with_store(store, |store| {
        let root = store.root()?;
        Ok(collect_matches(root, criteria)?)
    })
}

/// Opens the store at `config.store_path`, collects matching records, and
/// writes them to `config.output`.
///
/// Nothing is written if the store cannot be opened or traversed.
///
/// # Errors
///
/// - [`Error::StoreNotFound`] if the path does not exist
/// - [`Error::StoreOpen`] if the store cannot be opened
/// - [`Error::Store`] if reading the store fails
/// - [`Error::OutputWrite`] if the output cannot be written
pub fn run(config: &ExtractConfig) -> Result<ExtractReport> {
    let path = config.store_path.as_path();
    if !path.exists() {
        return Err(Error::StoreNotFound(path.to_path_buf()));
    }

    info!("Opening mail store {}", path.display());
    let store = LocalStore::open(path).map_err(|e| match e {
        StoreError::NotFound(path) => Error::StoreNotFound(path),
        other => Error::StoreOpen(other),
    })?;

    debug!("Criteria: {:?}", config.criteria);
    let traversal = search(store, &config.criteria)?;
    let Traversal { matches, stats } = traversal;
    info!(
        "Scanned {} messages in {} folders, {} matched",
        stats.messages_scanned, stats.folders_visited, stats.messages_matched
    );

    write_records(matches.as_slice(), &config.output)?;
    info!("Wrote {} records to {}", matches.len(), config.output.path.display());

    Ok(ExtractReport {
        written: matches.len(),
        output_path: config.output.path.clone(),
        stats,
    })
}
