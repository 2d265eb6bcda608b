//! In-process request channel from a detector to the arbiter.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tabsling_protocols::{ArbiterClient, MessagingError, Request, Response};

use crate::arbiter::IntentArbiter;

/// Delivers detector requests straight to an [`IntentArbiter`].
///
/// [`invalidate`](Self::invalidate) makes every later request fail the way
/// a reloaded extension does.
pub struct LocalArbiterClient {
    arbiter: Arc<IntentArbiter>,
    invalidated: AtomicBool,
}

impl LocalArbiterClient {
    pub fn new(arbiter: Arc<IntentArbiter>) -> Self {
        Self {
            arbiter,
            invalidated: AtomicBool::new(false),
        }
    }

    pub fn invalidate(&self) {
        self.invalidated.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ArbiterClient for LocalArbiterClient {
    async fn request(&self, request: Request) -> Result<Response, MessagingError> {
        if self.invalidated.load(Ordering::SeqCst) {
            return Err(MessagingError::ContextInvalidated);
        }
        Ok(self.arbiter.handle_request(request).await)
    }
}
