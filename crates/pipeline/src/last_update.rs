//! Last-modified timestamps for documents.

use std::fs;
use std::time::UNIX_EPOCH;

/// Looks up when a document was last updated, in milliseconds since the epoch.
pub trait LastUpdateLookup: Send + Sync {
    /// Timestamp for the document `id`, or `None` when unknown.
    fn last_update(&self, id: &str) -> Option<u64>;
}

impl<F> LastUpdateLookup for F
where
    F: Fn(&str) -> Option<u64> + Send + Sync,
{
    fn last_update(&self, id: &str) -> Option<u64> {
        (self)(id)
    }
}

/// Reads the filesystem modification time of the document path.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileMtime;

impl LastUpdateLookup for FileMtime {
    fn last_update(&self, id: &str) -> Option<u64> {
        let modified = fs::metadata(id).and_then(|meta| meta.modified()).ok()?;
        let since_epoch = modified.duration_since(UNIX_EPOCH).ok()?;
        u64::try_from(since_epoch.as_millis()).ok()
    }
}

/// Returns the same timestamp for every document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FixedLastUpdate(pub Option<u64>);

impl LastUpdateLookup for FixedLastUpdate {
    fn last_update(&self, _id: &str) -> Option<u64> {
        self.0
    }
}
