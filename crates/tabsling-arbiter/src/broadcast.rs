//! Best-effort delivery to every page detector.

use tabsling_protocols::{PageMessage, PageMessenger};
use tracing::debug;

/// Send `message` to every page. Returns how many pages accepted it.
///
/// Pages without a detector, or that went away, are skipped; nothing is
/// retried.
pub async fn broadcast(pages: &dyn PageMessenger, message: &PageMessage) -> usize {
    let mut delivered = 0;
    for tab in pages.pages().await {
        match pages.send(tab, message.clone()).await {
            Ok(_) => delivered += 1,
            Err(e) => debug!("Skipped {} while broadcasting: {}", tab, e),
        }
    }
    delivered
}
