//! Print session controller
//!
//! Owns the connect → transaction → per-copy send → status check →
//! disconnect lifecycle. Every request produces exactly one
//! [`PrintOutcome`]; the connection is released on every exit path, with
//! each release step independently best-effort.

use std::time::Duration;

use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};

use docket_core::{PrintOutcome, PrintRequest};

use crate::compose::ReceiptComposer;
use crate::driver::{DriverFactory, PrinterDriver, PrinterLang, PrinterModel};
use crate::error::{PrintError, PrintResult};
use crate::status::interpret_status;

/// Connect timeout applied when the request does not carry one.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Engine-level rendering configuration, fixed across requests.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Timezone receipt timestamps render in.
    pub timezone: Tz,
    /// Group line items under category headers instead of the flat list.
    pub group_items_by_category: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timezone: chrono_tz::Europe::London,
            group_items_by_category: false,
        }
    }
}

/// The print engine: one driver per request, synchronous throughout.
///
/// Callers needing an async boundary wrap this in
/// [`crate::service::PrintService`]; same-target serialization is the
/// caller's responsibility.
pub struct PrintEngine<F: DriverFactory> {
    factory: F,
    config: EngineConfig,
}

impl<F: DriverFactory> PrintEngine<F> {
    /// Engine with default rendering configuration.
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, EngineConfig::default())
    }

    pub fn with_config(factory: F, config: EngineConfig) -> Self {
        Self { factory, config }
    }

    /// Probe whether a driver can be constructed and a command buffer
    /// cleared. Never fails outward.
    pub fn is_available(&self) -> bool {
        match self.factory.open(PrinterModel::default(), PrinterLang::default()) {
            Ok(mut driver) => match driver.clear_buffer() {
                Ok(()) => true,
                Err(err) => {
                    warn!(error = %err, "printer buffer probe failed");
                    false
                }
            },
            Err(err) => {
                warn!(error = %err, "printer driver unavailable");
                false
            }
        }
    }

    /// Run one print request to completion.
    ///
    /// Never propagates an error: validation, transport, device status
    /// and unexpected failures all collapse into the outcome after the
    /// connection has been released.
    #[instrument(
        skip(self, request),
        fields(target = %request.config.target, copies = request.copies)
    )]
    pub fn print_direct(&self, request: &PrintRequest) -> PrintOutcome {
        // Validation happens before any driver exists.
        if request.config.target.trim().is_empty() {
            return PrintOutcome::failure(PrintError::MissingTarget.to_string());
        }

        let model = PrinterModel::resolve(request.config.model.as_deref());
        let lang = PrinterLang::resolve(request.config.lang.as_deref());
        let mut driver = match self.factory.open(model, lang) {
            Ok(driver) => driver,
            Err(err) => {
                warn!(error = %err, "driver construction failed");
                return PrintOutcome::failure(PrintError::from(err).to_string());
            }
        };

        let result = self.run(&mut driver, request);
        release(&mut driver);

        match result {
            Ok(copies) => {
                info!(copies, "print complete");
                PrintOutcome::success(copies)
            }
            Err(err) => {
                warn!(error = %err, "print failed");
                PrintOutcome::failure(err.to_string())
            }
        }
    }

    /// The forward path of the state machine; any error bails out to the
    /// caller's release.
    fn run(&self, driver: &mut F::Driver, request: &PrintRequest) -> PrintResult<u32> {
        let config = &request.config;
        let timeout = Duration::from_millis(config.timeout.unwrap_or(DEFAULT_TIMEOUT_MS));
        let copies = request.copies.max(1);

        driver.connect(&config.target, timeout)?;
        driver.begin_transaction()?;

        let composer = ReceiptComposer::new(config.paper_profile(), self.config.timezone)
            .with_grouping(self.config.group_items_by_category);

        for copy in 1..=copies {
            driver.clear_buffer()?;
            composer.compose(driver, request)?;
            driver.send()?;
            if let Some(problem) = interpret_status(&driver.status()?) {
                warn!(copy, problem = %problem, "device unhealthy after send");
                return Err(problem.into());
            }
            debug!(copy, "copy sent");
        }

        driver.end_transaction()?;
        driver.disconnect()?;
        Ok(copies)
    }
}

/// Best-effort teardown: end transaction, disconnect, clear buffer, drop
/// the listener. Each step swallows its own error so release never
/// overrides the print result, and it runs on success paths too, where
/// the duplicate calls are harmless.
fn release<D: PrinterDriver + ?Sized>(driver: &mut D) {
    if let Err(err) = driver.end_transaction() {
        debug!(error = %err, "end transaction during release");
    }
    if let Err(err) = driver.disconnect() {
        debug!(error = %err, "disconnect during release");
    }
    if let Err(err) = driver.clear_buffer() {
        debug!(error = %err, "buffer clear during release");
    }
    driver.detach_listener();
}
