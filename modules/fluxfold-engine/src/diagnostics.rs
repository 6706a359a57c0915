//! Optional diagnostic side channel.
//!
//! Reports every reducer with the action that produced it, and every
//! published snapshot under the `CHANGES` label. Purely observational.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::StreamExt;
use tracing::info;

use crate::changes::Changes;

pub(crate) const CHANGES_LABEL: &str = "CHANGES";

#[derive(Debug, Default)]
pub(crate) struct Diagnostics {
    enabled: AtomicBool,
}

impl Diagnostics {
    /// Switch on. Returns false if it was already on.
    pub(crate) fn enable(&self) -> bool {
        !self.enabled.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn reducer(&self, action: &str, seq: u64) {
        if self.is_enabled() {
            info!(action, seq, "reducer");
        }
    }
}

/// Log every snapshot from `changes` until the subscription ends.
pub(crate) async fn observe_changes<S: Debug>(mut changes: Changes<S>) {
    while let Some(snapshot) = changes.next().await {
        info!(label = CHANGES_LABEL, state = ?snapshot, "snapshot");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_is_idempotent() {
        let diagnostics = Diagnostics::default();
        assert!(!diagnostics.is_enabled());
        assert!(diagnostics.enable());
        assert!(!diagnostics.enable());
        assert!(diagnostics.is_enabled());
    }
}
