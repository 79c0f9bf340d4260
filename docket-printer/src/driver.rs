//! Printer driver abstraction
//!
//! The engine drives any vendor SDK through the [`PrinterDriver`] trait:
//! buffered primitives (text, alignment, feed, cut, pulse, barcode, QR),
//! a synchronous send, and a status query. Adapters implement it against
//! the real transport; tests use the recording double in
//! [`crate::testing`].

use std::time::Duration;

use thiserror::Error;

use crate::status::DeviceStatus;

// ========== Transport errors ==========

/// Transport/driver level errors, a closed vendor code set.
///
/// Each variant renders as the sentence shown to the caller; codes outside
/// the known set travel as [`DriverError::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("Invalid parameters supplied")]
    Param,
    #[error("Failed to connect to printer")]
    Connect,
    #[error("Printer connection timed out")]
    Timeout,
    #[error("Printer out of memory")]
    Memory,
    #[error("Illegal printer command")]
    Illegal,
    #[error("Printer is processing another job")]
    Processing,
    #[error("Printer not found")]
    NotFound,
    #[error("Printer is currently in use")]
    InUse,
    #[error("Printer disconnected")]
    Disconnected,
    #[error("Printer connection already open")]
    AlreadyOpen,
    #[error("Printer instance already used")]
    AlreadyUsed,
    #[error("Too many print jobs queued")]
    QueueOverflow,
    #[error("Printer client limit exceeded")]
    ClientLimit,
    #[error("Printer command unsupported")]
    Unsupported,
    #[error("Printer reported failure")]
    Failure,
    #[error("Printer command sequence error")]
    Sequence,
    #[error("Printer is offline")]
    Offline,
    /// Vendor code outside the known set.
    #[error("Printer error {0}")]
    Other(i32),
}

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

// ========== Primitive arguments ==========

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Device font selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Font {
    #[default]
    A,
    B,
}

/// Text style applied to subsequent text primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub font: Font,
}

impl TextStyle {
    /// Plain body text.
    pub fn regular() -> Self {
        Self {
            bold: false,
            font: Font::A,
        }
    }

    /// Emphasized text (store name, grand total).
    pub fn bold() -> Self {
        Self {
            bold: true,
            font: Font::A,
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::regular()
    }
}

/// Paper cut styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CutKind {
    /// Feed to the cut position first. The safe default.
    #[default]
    Feed,
    /// Cut in place without feeding.
    NoFeed,
}

impl CutKind {
    /// Resolve from the host configuration name; anything unrecognized
    /// falls back to feed-cut.
    pub fn from_config(raw: Option<&str>) -> Self {
        match raw {
            Some(name) if name.trim().eq_ignore_ascii_case("CUT_NO_FEED") => CutKind::NoFeed,
            _ => CutKind::Feed,
        }
    }
}

/// Cash-drawer connector pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerPin {
    Pin2,
    Pin5,
}

/// Drawer kick pulse width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseWidth {
    Ms100,
    Ms200,
    Ms300,
    Ms400,
    Ms500,
}

// ========== Device selection ==========

/// Supported printer models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrinterModel {
    #[default]
    TmM30,
    TmM30II,
    TmM30III,
}

impl PrinterModel {
    /// Resolve a model from the host configuration name.
    ///
    /// Case-insensitive; unknown or missing names fall back to the
    /// baseline TM-m30.
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PrinterModel::default();
        };
        let name = raw.trim();
        if name.eq_ignore_ascii_case("TM_M30III") {
            PrinterModel::TmM30III
        } else if name.eq_ignore_ascii_case("TM_M30II") {
            PrinterModel::TmM30II
        } else if name.eq_ignore_ascii_case("TM_M30") {
            PrinterModel::TmM30
        } else {
            PrinterModel::default()
        }
    }
}

/// Printer character-set/language profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrinterLang {
    /// Alphanumeric/Katakana, the baseline profile.
    #[default]
    Ank,
    Japanese,
    Chinese,
}

impl PrinterLang {
    /// Resolve a language profile from the host configuration name, same
    /// fallback rule as [`PrinterModel::resolve`].
    pub fn resolve(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PrinterLang::default();
        };
        let name = raw.trim();
        if name.eq_ignore_ascii_case("MODEL_JAPANESE") {
            PrinterLang::Japanese
        } else if name.eq_ignore_ascii_case("MODEL_CHINESE") {
            PrinterLang::Chinese
        } else {
            PrinterLang::Ank
        }
    }
}

// ========== Driver traits ==========

/// One open driver instance, bound to a model and language profile.
///
/// Primitive calls buffer commands on the device object; nothing reaches
/// paper until [`PrinterDriver::send`]. All calls are synchronous - the
/// async boundary lives above the engine, not in the driver.
pub trait PrinterDriver {
    /// Open the connection to `target`, waiting at most `timeout`.
    fn connect(&mut self, target: &str, timeout: Duration) -> DriverResult<()>;

    fn disconnect(&mut self) -> DriverResult<()>;

    fn begin_transaction(&mut self) -> DriverResult<()>;

    fn end_transaction(&mut self) -> DriverResult<()>;

    fn set_align(&mut self, align: Alignment) -> DriverResult<()>;

    fn set_style(&mut self, style: TextStyle) -> DriverResult<()>;

    /// Character cell scaling, 1 = normal. Width and height scale
    /// independently.
    fn set_size(&mut self, width: u8, height: u8) -> DriverResult<()>;

    fn add_text(&mut self, text: &str) -> DriverResult<()>;

    fn add_feed(&mut self, lines: u8) -> DriverResult<()>;

    fn add_cut(&mut self, cut: CutKind) -> DriverResult<()>;

    fn add_pulse(&mut self, pin: DrawerPin, width: PulseWidth) -> DriverResult<()>;

    /// Append a Code128 barcode, human-readable text below.
    fn add_barcode(&mut self, data: &str, module_width: u8, height: u8) -> DriverResult<()>;

    /// Append a model-2 QR symbol. `size` is the module size in dots.
    fn add_qr(&mut self, data: &str, size: u8) -> DriverResult<()>;

    fn clear_buffer(&mut self) -> DriverResult<()>;

    /// Transmit everything buffered since the last clear.
    fn send(&mut self) -> DriverResult<()>;

    /// Current device status, queried after each send.
    fn status(&mut self) -> DriverResult<DeviceStatus>;

    /// Drop any registered completion listener. Best-effort, part of
    /// teardown.
    fn detach_listener(&mut self) {}
}

/// Produces a driver instance per print request.
pub trait DriverFactory {
    type Driver: PrinterDriver;

    /// Construct a driver for the resolved model and language profile.
    fn open(&self, model: PrinterModel, lang: PrinterLang) -> DriverResult<Self::Driver>;
}
