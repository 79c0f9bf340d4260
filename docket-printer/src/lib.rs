//! # docket-printer
//!
//! Print transaction engine for networked receipt printers.
//!
//! ## Scope
//!
//! This crate handles HOW a print job reaches paper:
//! - Vendor-neutral driver abstraction (connect, buffer, send, status)
//! - Receipt composition into driver calls
//! - Connect → transaction → per-copy send → status lifecycle
//! - Async facade over the blocking pool
//!
//! What a receipt says (payload model, money and column formatting)
//! lives in docket-core.
//!
//! ## Example
//!
//! ```ignore
//! use docket_printer::{PrintEngine, PrintService};
//!
//! // `factory` is any DriverFactory, e.g. an ePOS SDK binding.
//! let service = PrintService::new(PrintEngine::new(factory));
//!
//! let outcome = service.print_direct_value(payload).await;
//! if !outcome.ok {
//!     eprintln!("print failed: {:?}", outcome.error);
//! }
//! ```

mod compose;
mod driver;
mod error;
mod service;
mod session;
mod status;
pub mod testing;

// Re-exports
pub use compose::ReceiptComposer;
pub use driver::{
    Alignment, CutKind, DrawerPin, DriverError, DriverFactory, DriverResult, Font, PrinterDriver,
    PrinterLang, PrinterModel, PulseWidth, TextStyle,
};
pub use error::{PrintError, PrintResult};
pub use service::PrintService;
pub use session::{DEFAULT_TIMEOUT_MS, EngineConfig, PrintEngine};
pub use status::{AutoRecover, DeviceStatus, PaperStatus, StatusProblem, interpret_status};
