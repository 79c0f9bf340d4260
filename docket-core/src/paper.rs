//! Paper profile derived from a free-form size string
//!
//! Two physical widths exist in the field:
//! - 58mm paper: 32 characters per line
//! - 80mm paper: 48 characters per line

/// Printer paper width as an available text-column count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaperProfile {
    /// 58mm roll, 32 columns.
    Narrow,
    /// 80mm roll, 48 columns.
    #[default]
    Wide,
}

impl PaperProfile {
    /// Text columns available on this paper.
    pub fn columns(self) -> usize {
        match self {
            PaperProfile::Narrow => 32,
            PaperProfile::Wide => 48,
        }
    }

    /// Resolve a profile from whatever the host configuration calls the
    /// paper size ("58mm", "80", "2inch", "Receipt 80x297", ...).
    ///
    /// Checked in order: the digits alone (57/58 vs 79/80), then inch
    /// names, then digit substrings. Anything unrecognized is wide.
    pub fn from_config(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return PaperProfile::default();
        };

        let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits == "57" || digits == "58" {
            return PaperProfile::Narrow;
        }
        if digits == "79" || digits == "80" {
            return PaperProfile::Wide;
        }

        let upper = raw.to_uppercase();
        if upper.contains("2IN") {
            return PaperProfile::Narrow;
        }
        if upper.contains("3IN") {
            return PaperProfile::Wide;
        }
        if upper.contains("58") || upper.contains("57") {
            return PaperProfile::Narrow;
        }
        if upper.contains("80") || upper.contains("79") {
            return PaperProfile::Wide;
        }

        PaperProfile::default()
    }
}
