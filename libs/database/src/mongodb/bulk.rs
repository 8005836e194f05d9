//! Sequential batching for unordered bulk inserts.

use std::collections::HashSet;
use std::future::Future;
use tracing::{debug, info, warn};

use super::DocumentResult;

/// Default number of documents sent per `insert_many` call.
pub const DEFAULT_BULK_BATCH_SIZE: usize = 5000;

/// Feed `docs` to `insert` in consecutive batches of at most `batch_size`.
///
/// `insert` receives ownership of one batch and returns the documents that
/// were actually stored. Batches run one after another; a batch that comes
/// back short is logged and the run continues. Any `Err` aborts the run.
pub async fn insert_in_batches<T, F, Fut>(
    docs: Vec<T>,
    batch_size: usize,
    mut insert: F,
) -> DocumentResult<Vec<T>>
where
    F: FnMut(Vec<T>) -> Fut,
    Fut: Future<Output = DocumentResult<Vec<T>>>,
{
    let batch_size = batch_size.max(1);
    let total = docs.len();
    let mut stored = Vec::with_capacity(total);
    let mut pending = docs.into_iter().peekable();
    let mut batch_no = 0usize;

    while pending.peek().is_some() {
        let batch: Vec<T> = pending.by_ref().take(batch_size).collect();
        let sent = batch.len();
        batch_no += 1;

        let inserted = insert(batch).await?;
        if inserted.len() < sent {
            warn!(
                batch = batch_no,
                sent,
                inserted = inserted.len(),
                "Some documents in batch were rejected"
            );
        } else {
            debug!(batch = batch_no, inserted = sent, "Batch inserted");
        }
        stored.extend(inserted);
    }

    info!(total, inserted = stored.len(), batches = batch_no, "Bulk insert finished");
    Ok(stored)
}

/// Drop the entries whose positions appear in `failed`.
pub fn without_failed<T>(batch: Vec<T>, failed: &[usize]) -> Vec<T> {
    if failed.is_empty() {
        return batch;
    }
    let failed: HashSet<usize> = failed.iter().copied().collect();
    batch
        .into_iter()
        .enumerate()
        .filter(|(index, _)| !failed.contains(index))
        .map(|(_, doc)| doc)
        .collect()
}
