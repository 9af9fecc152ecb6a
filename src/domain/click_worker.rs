//! Background worker applying click increments.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, error, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;

/// Consumes click events and increments link counters.
///
/// At most `concurrency` increments run at once. A failed increment is
/// logged and dropped; it is never retried, so a click is counted at most
/// once. The worker stops when every sender is dropped, after the queue is
/// drained and in-flight increments have finished.
pub async fn run_click_worker<L>(
    mut rx: mpsc::Receiver<ClickEvent>,
    repository: Arc<L>,
    concurrency: usize,
) where
    L: LinkRepository + ?Sized + 'static,
{
    let concurrency = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(concurrency));

    while let Some(event) = rx.recv().await {
        let Ok(permit) = semaphore.clone().acquire_owned().await else {
            break;
        };
        let repository = repository.clone();

        tokio::spawn(async move {
            let _permit = permit;
            process_click(repository.as_ref(), &event).await;
        });
    }

    // Wait for in-flight increments.
    let _ = semaphore.acquire_many(concurrency as u32).await;
    info!("Click worker stopped");
}

async fn process_click<L>(repository: &L, event: &ClickEvent)
where
    L: LinkRepository + ?Sized,
{
    match repository.increment_clicks(&event.short_code).await {
        Ok(0) => warn!(code = %event.short_code, "Click for unknown short code dropped"),
        Ok(_) => debug!(code = %event.short_code, "Click recorded"),
        Err(e) => error!(code = %event.short_code, error = %e, "Failed to record click"),
    }
}
