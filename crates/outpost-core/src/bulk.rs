//! Bulk deletion with partial-failure tolerance.
//!
//! One item failing to delete must not stop the rest of the selection.
//! Failures are logged and counted; the caller decides how to present the
//! report.

use std::future::Future;

use uuid::Uuid;

use tracing::warn;

/// Outcome of a bulk delete over a selection of ids.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BulkDeleteReport {
    pub deleted: usize,
    pub failed: usize,
}

/// Delete each id in turn with `delete_one`, continuing past failures.
pub async fn bulk_delete<F, Fut>(ids: &[Uuid], mut delete_one: F) -> BulkDeleteReport
where
    F: FnMut(Uuid) -> Fut,
    Fut: Future<Output = anyhow::Result<()>>,
{
    let mut report = BulkDeleteReport::default();

    for &id in ids {
        match delete_one(id).await {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                warn!(%id, error = %e, "bulk delete item failed, continuing");
                report.failed += 1;
            }
        }
    }

    report
}
