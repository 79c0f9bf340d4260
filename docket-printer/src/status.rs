//! Device status model and interpretation
//!
//! The driver reports raw status flags after every send; [`interpret_status`]
//! reduces them to the single most actionable problem, or none when the
//! device is healthy.

use thiserror::Error;

/// Paper level reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperStatus {
    #[default]
    Loaded,
    NearEnd,
    Empty,
}

/// Error condition the device wants cleared before it resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoRecover {
    /// No recovery pending.
    #[default]
    None,
    HeadOverheat,
    CoverOpen,
    PaperJam,
    PaperEnd,
    /// Recovery requested without a specific cause code.
    Other(i32),
}

/// Raw device status snapshot from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceStatus {
    pub connected: bool,
    pub online: bool,
    pub cover_open: bool,
    pub paper: PaperStatus,
    pub recover: AutoRecover,
    /// Vendor status code, 0 when clear.
    pub error_code: i32,
}

impl Default for DeviceStatus {
    /// A healthy, printable device.
    fn default() -> Self {
        Self {
            connected: true,
            online: true,
            cover_open: false,
            paper: PaperStatus::Loaded,
            recover: AutoRecover::None,
            error_code: 0,
        }
    }
}

/// One actionable reason the device cannot print right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StatusProblem {
    #[error("Printer is offline")]
    Offline,
    #[error("Printer is not connected")]
    NotConnected,
    #[error("Printer cover is open")]
    CoverOpen,
    #[error("Printer is out of paper")]
    PaperEmpty,
    #[error("Printer paper is near end")]
    PaperNearEnd,
    #[error("Printer head overheated")]
    HeadOverheat,
    #[error("Paper jam detected")]
    PaperJam,
    #[error("Printer requires recovery")]
    NeedsRecovery,
    #[error("Printer error status {0}")]
    ErrorCode(i32),
}

/// Reduce a status snapshot to its most urgent problem.
///
/// Priority: offline > not connected > cover open > paper empty > paper
/// near end > pending recovery > generic error code. `None` means the
/// device can print.
pub fn interpret_status(status: &DeviceStatus) -> Option<StatusProblem> {
    if !status.online {
        return Some(StatusProblem::Offline);
    }
    if !status.connected {
        return Some(StatusProblem::NotConnected);
    }
    if status.cover_open {
        return Some(StatusProblem::CoverOpen);
    }
    match status.paper {
        PaperStatus::Empty => return Some(StatusProblem::PaperEmpty),
        PaperStatus::NearEnd => return Some(StatusProblem::PaperNearEnd),
        PaperStatus::Loaded => {}
    }
    match status.recover {
        AutoRecover::HeadOverheat => return Some(StatusProblem::HeadOverheat),
        AutoRecover::CoverOpen => return Some(StatusProblem::CoverOpen),
        AutoRecover::PaperJam => return Some(StatusProblem::PaperJam),
        AutoRecover::PaperEnd => return Some(StatusProblem::PaperEmpty),
        AutoRecover::Other(_) => return Some(StatusProblem::NeedsRecovery),
        AutoRecover::None => {}
    }
    if status.error_code != 0 {
        return Some(StatusProblem::ErrorCode(status.error_code));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_healthy_status_is_none() {
        assert_eq!(interpret_status(&DeviceStatus::default()), None);
    }

    #[test]
    fn test_offline_beats_everything() {
        let status = DeviceStatus {
            online: false,
            connected: false,
            cover_open: true,
            paper: PaperStatus::Empty,
            recover: AutoRecover::PaperJam,
            error_code: 7,
        };
        assert_eq!(interpret_status(&status), Some(StatusProblem::Offline));
    }

    #[test]
    fn test_not_connected() {
        let status = DeviceStatus {
            connected: false,
            ..DeviceStatus::default()
        };
        assert_eq!(interpret_status(&status), Some(StatusProblem::NotConnected));
        assert_eq!(
            StatusProblem::NotConnected.to_string(),
            "Printer is not connected"
        );
    }

    #[test]
    fn test_cover_open() {
        let status = DeviceStatus {
            cover_open: true,
            paper: PaperStatus::Empty,
            ..DeviceStatus::default()
        };
        assert_eq!(interpret_status(&status), Some(StatusProblem::CoverOpen));
    }

    #[test]
    fn test_paper_levels() {
        let empty = DeviceStatus {
            paper: PaperStatus::Empty,
            ..DeviceStatus::default()
        };
        let problem = interpret_status(&empty).unwrap();
        assert_eq!(problem, StatusProblem::PaperEmpty);
        assert_eq!(problem.to_string(), "Printer is out of paper");

        let near_end = DeviceStatus {
            paper: PaperStatus::NearEnd,
            ..DeviceStatus::default()
        };
        assert_eq!(
            interpret_status(&near_end),
            Some(StatusProblem::PaperNearEnd)
        );
    }

    #[test]
    fn test_recover_conditions() {
        let overheat = DeviceStatus {
            recover: AutoRecover::HeadOverheat,
            ..DeviceStatus::default()
        };
        assert_eq!(
            interpret_status(&overheat),
            Some(StatusProblem::HeadOverheat)
        );

        // Paper-end recovery reads as out of paper to the operator.
        let paper_end = DeviceStatus {
            recover: AutoRecover::PaperEnd,
            ..DeviceStatus::default()
        };
        assert_eq!(interpret_status(&paper_end), Some(StatusProblem::PaperEmpty));

        let unspecified = DeviceStatus {
            recover: AutoRecover::Other(250),
            ..DeviceStatus::default()
        };
        let problem = interpret_status(&unspecified).unwrap();
        assert_eq!(problem, StatusProblem::NeedsRecovery);
        assert_eq!(problem.to_string(), "Printer requires recovery");
    }

    #[test]
    fn test_generic_error_code_last() {
        let status = DeviceStatus {
            error_code: 42,
            ..DeviceStatus::default()
        };
        let problem = interpret_status(&status).unwrap();
        assert_eq!(problem, StatusProblem::ErrorCode(42));
        assert_eq!(problem.to_string(), "Printer error status 42");
    }
}
