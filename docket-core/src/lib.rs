//! # docket-core
//!
//! Receipt data model and text formatting - no I/O, no driver coupling.
//!
//! ## Scope
//!
//! This crate handles WHAT a receipt says:
//! - Typed print request/outcome model with a lenient serde boundary
//! - Minor-unit money formatting
//! - Column-aware label/value line layout
//! - Paper-size resolution (58mm/80mm column profiles)
//!
//! Driving a physical printer (HOW it prints) lives in docket-printer.

mod money;
mod paper;
mod request;

// Re-exports
pub use money::{DEFAULT_CURRENCY, currency_symbol, format_column_line, format_money};
pub use paper::PaperProfile;
pub use request::{
    BarcodeRequest, LineItem, PrintOptions, PrintOutcome, PrintRequest, PrinterConfig, QrRequest,
    Receipt, StoreInfo, non_blank,
};
