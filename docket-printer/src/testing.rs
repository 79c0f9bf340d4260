//! Scriptable in-memory driver for exercising compose and session logic
//! without hardware.
//!
//! [`RecordingDriver`] logs every call in invocation order and fails (or
//! panics) on cue; [`RecordingFactory`] shares one log across every
//! driver it opens so a whole transaction reads as a single sequence.
//! Faults are recorded before they fire, so the log always shows the
//! attempt.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::driver::{
    Alignment, CutKind, DrawerPin, DriverError, DriverFactory, DriverResult, PrinterDriver,
    PrinterLang, PrinterModel, PulseWidth, TextStyle,
};
use crate::status::DeviceStatus;

/// One recorded driver or factory invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Open {
        model: PrinterModel,
        lang: PrinterLang,
    },
    Connect {
        target: String,
        timeout: Duration,
    },
    Disconnect,
    BeginTransaction,
    EndTransaction,
    SetAlign(Alignment),
    SetStyle(TextStyle),
    SetSize {
        width: u8,
        height: u8,
    },
    Text(String),
    Feed(u8),
    Cut(CutKind),
    Pulse {
        pin: DrawerPin,
        width: PulseWidth,
    },
    Barcode {
        data: String,
        module_width: u8,
        height: u8,
    },
    Qr {
        data: String,
        size: u8,
    },
    ClearBuffer,
    Send,
    QueryStatus,
    DetachListener,
}

#[derive(Debug, Clone, Default)]
struct Faults {
    connect: Option<DriverError>,
    connect_panic: Option<String>,
    send: Option<(u32, DriverError)>,
    code: Option<DriverError>,
    clear: Option<DriverError>,
}

fn fire(fault: Option<DriverError>) -> DriverResult<()> {
    match fault {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Driver double backed by a shared call log.
#[derive(Debug)]
pub struct RecordingDriver {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    faults: Faults,
    statuses: VecDeque<DeviceStatus>,
    sends: u32,
}

impl RecordingDriver {
    /// Standalone driver with its own log.
    pub fn new() -> Self {
        Self::with_log(Arc::new(Mutex::new(Vec::new())))
    }

    fn with_log(calls: Arc<Mutex<Vec<RecordedCall>>>) -> Self {
        Self {
            calls,
            faults: Faults::default(),
            statuses: VecDeque::new(),
            sends: 0,
        }
    }

    pub fn with_connect_fault(mut self, error: DriverError) -> Self {
        self.faults.connect = Some(error);
        self
    }

    /// Fail `send` on the given 1-based attempt.
    pub fn with_send_fault(mut self, attempt: u32, error: DriverError) -> Self {
        self.faults.send = Some((attempt, error));
        self
    }

    /// Fail both barcode and QR appends.
    pub fn with_code_fault(mut self, error: DriverError) -> Self {
        self.faults.code = Some(error);
        self
    }

    pub fn with_clear_fault(mut self, error: DriverError) -> Self {
        self.faults.clear = Some(error);
        self
    }

    /// Queue status responses; once drained, a healthy status is
    /// reported.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = DeviceStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Snapshot of the call log.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl PrinterDriver for RecordingDriver {
    fn connect(&mut self, target: &str, timeout: Duration) -> DriverResult<()> {
        self.record(RecordedCall::Connect {
            target: target.to_string(),
            timeout,
        });
        if let Some(message) = &self.faults.connect_panic {
            panic!("{message}");
        }
        fire(self.faults.connect)
    }

    fn disconnect(&mut self) -> DriverResult<()> {
        self.record(RecordedCall::Disconnect);
        Ok(())
    }

    fn begin_transaction(&mut self) -> DriverResult<()> {
        self.record(RecordedCall::BeginTransaction);
        Ok(())
    }

    fn end_transaction(&mut self) -> DriverResult<()> {
        self.record(RecordedCall::EndTransaction);
        Ok(())
    }

    fn set_align(&mut self, align: Alignment) -> DriverResult<()> {
        self.record(RecordedCall::SetAlign(align));
        Ok(())
    }

    fn set_style(&mut self, style: TextStyle) -> DriverResult<()> {
        self.record(RecordedCall::SetStyle(style));
        Ok(())
    }

    fn set_size(&mut self, width: u8, height: u8) -> DriverResult<()> {
        self.record(RecordedCall::SetSize { width, height });
        Ok(())
    }

    fn add_text(&mut self, text: &str) -> DriverResult<()> {
        self.record(RecordedCall::Text(text.to_string()));
        Ok(())
    }

    fn add_feed(&mut self, lines: u8) -> DriverResult<()> {
        self.record(RecordedCall::Feed(lines));
        Ok(())
    }

    fn add_cut(&mut self, cut: CutKind) -> DriverResult<()> {
        self.record(RecordedCall::Cut(cut));
        Ok(())
    }

    fn add_pulse(&mut self, pin: DrawerPin, width: PulseWidth) -> DriverResult<()> {
        self.record(RecordedCall::Pulse { pin, width });
        Ok(())
    }

    fn add_barcode(&mut self, data: &str, module_width: u8, height: u8) -> DriverResult<()> {
        self.record(RecordedCall::Barcode {
            data: data.to_string(),
            module_width,
            height,
        });
        fire(self.faults.code)
    }

    fn add_qr(&mut self, data: &str, size: u8) -> DriverResult<()> {
        self.record(RecordedCall::Qr {
            data: data.to_string(),
            size,
        });
        fire(self.faults.code)
    }

    fn clear_buffer(&mut self) -> DriverResult<()> {
        self.record(RecordedCall::ClearBuffer);
        fire(self.faults.clear)
    }

    fn send(&mut self) -> DriverResult<()> {
        self.sends += 1;
        self.record(RecordedCall::Send);
        match self.faults.send {
            Some((attempt, err)) if attempt == self.sends => Err(err),
            _ => Ok(()),
        }
    }

    fn status(&mut self) -> DriverResult<DeviceStatus> {
        self.record(RecordedCall::QueryStatus);
        Ok(self.statuses.pop_front().unwrap_or_default())
    }

    fn detach_listener(&mut self) {
        self.record(RecordedCall::DetachListener);
    }
}

/// Factory double; every driver it opens appends to the same log.
///
/// Clones share the log and counters, so a test can keep one handle
/// while the engine owns another.
#[derive(Debug, Clone)]
pub struct RecordingFactory {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    opened: Arc<AtomicUsize>,
    open_fault: Option<DriverError>,
    faults: Faults,
    statuses: Vec<DeviceStatus>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            opened: Arc::new(AtomicUsize::new(0)),
            open_fault: None,
            faults: Faults::default(),
            statuses: Vec::new(),
        }
    }

    /// Refuse to construct drivers at all.
    pub fn with_open_fault(mut self, error: DriverError) -> Self {
        self.open_fault = Some(error);
        self
    }

    pub fn with_connect_fault(mut self, error: DriverError) -> Self {
        self.faults.connect = Some(error);
        self
    }

    /// Panic inside `connect`, for exercising worker isolation.
    pub fn with_connect_panic(mut self, message: impl Into<String>) -> Self {
        self.faults.connect_panic = Some(message.into());
        self
    }

    /// Fail `send` on the given 1-based attempt of each driver.
    pub fn with_send_fault(mut self, attempt: u32, error: DriverError) -> Self {
        self.faults.send = Some((attempt, error));
        self
    }

    pub fn with_code_fault(mut self, error: DriverError) -> Self {
        self.faults.code = Some(error);
        self
    }

    pub fn with_clear_fault(mut self, error: DriverError) -> Self {
        self.faults.clear = Some(error);
        self
    }

    /// Status responses handed to each opened driver, in order.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = DeviceStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Snapshot of the shared call log.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `open` was attempted.
    pub fn open_count(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }
}

impl Default for RecordingFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DriverFactory for RecordingFactory {
    type Driver = RecordingDriver;

    fn open(&self, model: PrinterModel, lang: PrinterLang) -> DriverResult<RecordingDriver> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.calls
            .lock()
            .unwrap()
            .push(RecordedCall::Open { model, lang });
        if let Some(err) = self.open_fault {
            return Err(err);
        }
        let mut driver = RecordingDriver::with_log(Arc::clone(&self.calls));
        driver.faults = self.faults.clone();
        driver.statuses = self.statuses.iter().copied().collect();
        Ok(driver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_records_in_invocation_order() {
        let mut driver = RecordingDriver::new();
        driver.set_align(Alignment::Center).unwrap();
        driver.add_text("hi\n").unwrap();
        driver.add_feed(2).unwrap();

        assert_eq!(
            driver.calls(),
            vec![
                RecordedCall::SetAlign(Alignment::Center),
                RecordedCall::Text("hi\n".to_string()),
                RecordedCall::Feed(2),
            ]
        );
    }

    #[test]
    fn test_send_fault_fires_only_on_selected_attempt() {
        let mut driver = RecordingDriver::new().with_send_fault(2, DriverError::Disconnected);
        assert!(driver.send().is_ok());
        assert_eq!(driver.send(), Err(DriverError::Disconnected));
        assert!(driver.send().is_ok());
    }

    #[test]
    fn test_factory_shares_a_single_log() {
        let factory = RecordingFactory::new();
        let mut first = factory
            .open(PrinterModel::default(), PrinterLang::default())
            .unwrap();
        first.send().unwrap();
        let mut second = factory
            .open(PrinterModel::TmM30II, PrinterLang::Japanese)
            .unwrap();
        second.disconnect().unwrap();

        assert_eq!(factory.open_count(), 2);
        assert_eq!(
            factory.calls(),
            vec![
                RecordedCall::Open {
                    model: PrinterModel::TmM30,
                    lang: PrinterLang::Ank,
                },
                RecordedCall::Send,
                RecordedCall::Open {
                    model: PrinterModel::TmM30II,
                    lang: PrinterLang::Japanese,
                },
                RecordedCall::Disconnect,
            ]
        );
    }

    #[test]
    fn test_statuses_drain_then_report_healthy() {
        let low = DeviceStatus {
            paper: crate::status::PaperStatus::NearEnd,
            ..DeviceStatus::default()
        };
        let mut driver = RecordingDriver::new().with_statuses([low]);
        assert_eq!(driver.status().unwrap(), low);
        assert_eq!(driver.status().unwrap(), DeviceStatus::default());
    }
}
