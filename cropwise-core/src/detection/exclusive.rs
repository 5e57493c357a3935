//! Session-wide mutual exclusion for long-running operations.
//!
//! Both detection kinds and the downstream encode decode the same source, so
//! they share one token: whichever starts first holds it until its guard is
//! dropped, and everyone else gets `CoreError::Busy`.

use crate::error::{CoreError, CoreResult};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable handle to a session's exclusive-operation flag.
#[derive(Debug, Clone, Default)]
pub struct ExclusiveToken {
    held: Arc<AtomicBool>,
}

impl ExclusiveToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the token for `operation`, or fails with `Busy` if anything
    /// else holds it. Never waits.
    pub fn try_acquire(&self, operation: &'static str) -> CoreResult<OperationGuard> {
        self.held
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| {
                log::debug!("Rejected '{}': another operation holds the token", operation);
                CoreError::Busy
            })?;
        log::debug!("Acquired exclusive token for '{}'", operation);
        Ok(OperationGuard {
            held: Arc::clone(&self.held),
            operation,
        })
    }

    #[must_use]
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}

/// Proof of holding the token. Dropping it releases the token.
#[derive(Debug)]
#[must_use = "the token is released as soon as the guard is dropped"]
pub struct OperationGuard {
    held: Arc<AtomicBool>,
    operation: &'static str,
}

impl OperationGuard {
    #[must_use]
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl Drop for OperationGuard {
    fn drop(&mut self) {
        self.held.store(false, Ordering::Release);
        log::debug!("Released exclusive token held by '{}'", self.operation);
    }
}
