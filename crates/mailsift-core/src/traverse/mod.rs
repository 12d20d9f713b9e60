//! Folder hierarchy traversal.
//!
//! Folders are visited in post-order: every child subtree, left to right,
//! is finished before the folder's own messages are examined. For a
//! folder `A` with child `B`, matches from `B` therefore precede matches
//! from `A`'s direct messages.
//!
//! The walk runs on an explicit stack, so hierarchy depth is limited by
//! memory rather than by the call stack.

mod collector;

use tracing::debug;

pub use collector::Matches;

use crate::criteria::Criteria;
use crate::extract::extract_record;
use crate::record::EmailRecord;
use crate::store::{Folder, StoreResult};

/// Counters gathered during a traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TraversalStats {
    /// Folders visited, including the root.
    pub folders_visited: usize,
    /// Messages extracted and tested.
    pub messages_scanned: usize,
    /// Messages that matched.
    pub messages_matched: usize,
}

/// Outcome of a traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversal {
    /// Matching records in traversal order.
    pub matches: Matches,
    /// Counters.
    pub stats: TraversalStats,
}

/// A folder being visited: its child cursor and the matches gathered from
/// the subtrees finished so far.
struct Frame<F> {
    folder: F,
    next_child: usize,
    matches: Matches,
}

impl<F: Folder> Frame<F> {
    const fn new(folder: F) -> Self {
        Self {
            folder,
            next_child: 0,
            matches: Matches::new(),
        }
    }
}

/// Collects the records matching `criteria` from `root` and all its
/// descendants.
///
/// # Errors
///
/// Returns the first store error other than an undecodable delivery
/// time; such errors are recovered during extraction.
pub fn collect_matches<F: Folder>(root: F, criteria: &Criteria) -> StoreResult<Traversal> {
    let mut stats = TraversalStats::default();
    let mut stack = vec![Frame::new(root)];

    while let Some(frame) = stack.last_mut() {
        if frame.next_child < frame.folder.sub_folder_count() {
            let child = frame.folder.sub_folder(frame.next_child)?;
            frame.next_child += 1;
            stack.push(Frame::new(child));
            continue;
        }

        // All children done: add this folder's own matches and hand the
        // subtree's sequence to the parent.
        let Some(mut finished) = stack.pop() else {
            break;
        };
        let own = folder_matches(&finished.folder, criteria)?;
        stats.folders_visited += 1;
        stats.messages_scanned += finished.folder.message_count();
        debug!(
            "Folder '{}': {} of {} messages matched",
            finished.folder.name(),
            own.len(),
            finished.folder.message_count()
        );
        finished.matches.extend(own);

        match stack.last_mut() {
            Some(parent) => parent.matches.append(&mut finished.matches),
            None => {
                stats.messages_matched = finished.matches.len();
                return Ok(Traversal {
                    matches: finished.matches,
                    stats,
                });
            }
        }
    }

    Ok(Traversal::default())
}

/// Collects the matching records among `folder`'s own messages, ignoring
/// its children.
///
/// # Errors
///
/// Returns the first store error other than an undecodable delivery time.
pub fn folder_matches<F: Folder>(folder: &F, criteria: &Criteria) -> StoreResult<Vec<EmailRecord>> {
    let mut matched = Vec::new();
    for index in 0..folder.message_count() {
        let record = extract_record(&folder.message(index)?)?;
        if criteria.matches(&record) {
            matched.push(record);
        }
    }
    Ok(matched)
}
