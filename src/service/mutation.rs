use std::sync::atomic::{AtomicBool, Ordering};

use crate::api_error::ApiError;

/// At most one in-flight request per user-initiated action.
#[derive(Debug, Default)]
pub struct MutationGate {
    pending: AtomicBool,
}

/// Held for the lifetime of one dispatched mutation.
#[derive(Debug)]
pub struct MutationGuard<'a> {
    gate: &'a MutationGate,
}

impl MutationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn begin(&self) -> Result<MutationGuard<'_>, ApiError> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| ApiError::MutationInFlight)?;
        Ok(MutationGuard { gate: self })
    }
}

impl Drop for MutationGuard<'_> {
    fn drop(&mut self) {
        self.gate.pending.store(false, Ordering::Release);
    }
}
