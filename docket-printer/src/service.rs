//! Async facade over the synchronous engine.
//!
//! Driver work blocks on socket I/O, so the engine runs on the blocking
//! pool via `spawn_blocking`. A worker that panics or is cancelled still
//! yields a failure outcome; callers never see a join error.

use std::any::Any;
use std::sync::Arc;

use tracing::{error, instrument, warn};

use docket_core::{PrintOutcome, PrintRequest};

use crate::driver::DriverFactory;
use crate::error::PrintError;
use crate::session::PrintEngine;

/// Cheaply cloneable handle; clones share one engine.
pub struct PrintService<F>
where
    F: DriverFactory + Send + Sync + 'static,
{
    engine: Arc<PrintEngine<F>>,
}

impl<F> Clone for PrintService<F>
where
    F: DriverFactory + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<F> PrintService<F>
where
    F: DriverFactory + Send + Sync + 'static,
{
    pub fn new(engine: PrintEngine<F>) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Probe driver availability off the async runtime.
    #[instrument(skip(self))]
    pub async fn is_available(&self) -> bool {
        let engine = Arc::clone(&self.engine);
        match tokio::task::spawn_blocking(move || engine.is_available()).await {
            Ok(available) => available,
            Err(err) => {
                warn!(error = %err, "availability probe did not finish");
                false
            }
        }
    }

    /// Print on the blocking pool and marshal the outcome back.
    #[instrument(skip(self, request), fields(copies = request.copies))]
    pub async fn print_direct(&self, request: PrintRequest) -> PrintOutcome {
        let engine = Arc::clone(&self.engine);
        match tokio::task::spawn_blocking(move || engine.print_direct(&request)).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => {
                let reason = panic_message(err.into_panic());
                error!(error = %reason, "print worker panicked");
                PrintOutcome::failure(PrintError::Unexpected(reason).to_string())
            }
            Err(err) => {
                error!(error = %err, "print worker cancelled");
                PrintOutcome::failure(PrintError::Unexpected(err.to_string()).to_string())
            }
        }
    }

    /// Decode a loose JSON payload and print it.
    ///
    /// Only a non-object top level is rejected outright; malformed
    /// sections and fields degrade inside the request model instead.
    #[instrument(skip(self, payload))]
    pub async fn print_direct_value(&self, payload: serde_json::Value) -> PrintOutcome {
        if !payload.is_object() {
            warn!("rejecting non-object payload");
            return PrintOutcome::failure("Invalid payload");
        }
        match serde_json::from_value::<PrintRequest>(payload) {
            Ok(request) => self.print_direct(request).await,
            Err(err) => {
                warn!(error = %err, "rejecting undecodable payload");
                PrintOutcome::failure("Invalid payload")
            }
        }
    }
}

/// Panic payloads are strings more often than not; surface them.
fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "Unexpected error".to_string()
    }
}
