//! The fold loop: merged reducers in, snapshots out.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::anyhow;
use futures::stream::BoxStream;
use futures::StreamExt;
use tracing::{debug, error, info};

use crate::changes::{ChangeBus, FoldStatus};
use crate::diagnostics::Diagnostics;
use crate::reducer::Reducer;

/// A reducer tagged with the action whose handler emitted it.
pub(crate) type Tagged<S> = (Arc<str>, Reducer<S>);

/// Apply reducers in arrival order until every handler stream ends or a
/// reducer fails.
///
/// Sole owner of the accumulator, so exactly one reducer is ever in flight.
/// A reducer that returns an error or panics halts the pipeline for good:
/// the error is recorded, subscriptions are closed, and dropping `merged`
/// drops every payload receiver so later dispatches are refused.
pub(crate) async fn run<S>(
    mut merged: BoxStream<'static, Tagged<S>>,
    bus: Arc<ChangeBus<S>>,
    diagnostics: Arc<Diagnostics>,
) where
    S: Send + Sync + 'static,
{
    let mut acc = bus.current();
    let mut seq: u64 = 0;

    loop {
        let Some((action, reducer)) = merged.next().await else {
            break;
        };
        seq += 1;
        diagnostics.reducer(&action, seq);

        // The unwind boundary stops here; the bus is only touched afterwards.
        let applied = panic::catch_unwind(AssertUnwindSafe(|| reducer.apply(&acc)))
            .unwrap_or_else(|payload| {
                Err(anyhow!("reducer panicked: {}", panic_message(&*payload)))
            });

        match applied {
            Ok(next) => {
                acc = Arc::new(next);
                let version = bus.publish(acc.clone());
                debug!(action = %action, version, "snapshot published");
            }
            Err(e) => {
                error!(action = %action, error = %e, "reducer failed, halting store");
                drop(merged);
                bus.close(FoldStatus::Halted {
                    action: action.to_string(),
                    error: format!("{e:#}"),
                });
                return;
            }
        }
    }

    info!(reducers = seq, "all action streams ended");
    bus.close(FoldStatus::Finished);
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        *msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
