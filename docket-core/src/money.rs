//! Money formatting and column-aware line layout
//!
//! Amounts are integers in minor currency units (pence/cents) everywhere;
//! division happens only at the formatting edge, in integer math.

/// Currency assumed when the payload supplies none or an unknown code.
pub const DEFAULT_CURRENCY: &str = "GBP";

/// Symbol for a currency code.
///
/// Case-insensitive, surrounding whitespace ignored. Unknown or blank
/// codes fall back to the GBP symbol.
pub fn currency_symbol(code: &str) -> &'static str {
    let code = code.trim();
    if code.eq_ignore_ascii_case("USD") {
        "$"
    } else if code.eq_ignore_ascii_case("EUR") {
        "€"
    } else {
        // GBP and everything unrecognized
        "£"
    }
}

/// Format a minor-unit amount as a symbol-prefixed decimal string.
///
/// ```
/// use docket_core::format_money;
///
/// assert_eq!(format_money(12345, "GBP"), "£123.45");
/// assert_eq!(format_money(500, "USD"), "$5.00");
/// assert_eq!(format_money(-250, "EUR"), "-€2.50");
/// ```
pub fn format_money(amount_minor: i64, currency: &str) -> String {
    let symbol = currency_symbol(currency);
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{}{}{}.{:02}", sign, symbol, abs / 100, abs % 100)
}

/// Lay out a label/value pair across a fixed number of text columns.
///
/// The value is right-aligned, the label left-aligned and padded into the
/// remaining width minus one separating space. Oversized values are
/// hard-truncated to the full width; when no room remains for the label it
/// is dropped; labels that only partially fit end with `…`. Embedded
/// newlines are flattened to spaces. `columns == 0` degrades to the value
/// alone. The result always ends in `\n` and, on the padded path, is
/// exactly `columns` characters before it.
///
/// Widths are counted in characters: receipts here are single-width
/// ANK/Latin text, one column per character.
pub fn format_column_line(label: &str, value: &str, columns: usize) -> String {
    let value = value.replace('\n', " ");
    if columns == 0 {
        return format!("{}\n", value);
    }

    let value: String = value.chars().take(columns).collect();
    let value_width = value.chars().count();

    // One column reserved for the separating space.
    let label_width = columns.saturating_sub(value_width + 1);
    if label_width == 0 {
        return format!("{}\n", value);
    }

    let label = label.replace('\n', " ");
    let label = fit_label(&label, label_width);
    format!("{:<width$} {}\n", label, value, width = label_width)
}

/// Truncate a label to `width` characters, marking the cut with `…`.
fn fit_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    if width == 1 {
        return "…".to_string();
    }
    let mut fitted: String = label.chars().take(width - 1).collect();
    fitted.push('…');
    fitted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_money_gbp() {
        assert_eq!(format_money(12345, "GBP"), "£123.45");
    }

    #[test]
    fn test_format_money_usd() {
        assert_eq!(format_money(500, "USD"), "$5.00");
    }

    #[test]
    fn test_format_money_eur() {
        assert_eq!(format_money(999, "EUR"), "€9.99");
    }

    #[test]
    fn test_format_money_unknown_currency_falls_back() {
        assert_eq!(format_money(100, "JPY"), "£1.00");
        assert_eq!(format_money(100, ""), "£1.00");
    }

    #[test]
    fn test_format_money_case_and_whitespace() {
        assert_eq!(format_money(250, "usd"), "$2.50");
        assert_eq!(format_money(250, " EUR "), "€2.50");
    }

    #[test]
    fn test_format_money_negative() {
        assert_eq!(format_money(-200, "GBP"), "-£2.00");
    }

    #[test]
    fn test_format_money_sub_pound() {
        assert_eq!(format_money(5, "GBP"), "£0.05");
        assert_eq!(format_money(0, "GBP"), "£0.00");
    }

    #[test]
    fn test_column_line_exact_width() {
        let line = format_column_line("Espresso", "£2.50", 20);
        assert_eq!(line, "Espresso       £2.50\n");
        assert_eq!(line.chars().count(), 21); // 20 columns + newline
        assert!(line.ends_with('\n'));
    }

    #[test]
    fn test_column_line_truncates_long_label() {
        let line = format_column_line("A very long product name", "£10.00", 20);
        assert_eq!(line, "A very long … £10.00\n");
        assert_eq!(line.chars().count(), 21);
    }

    #[test]
    fn test_column_line_value_fills_width() {
        // Value plus separator leaves nothing for the label.
        assert_eq!(format_column_line("Tea", "£2.50", 6), "£2.50\n");
        assert_eq!(format_column_line("Tea", "£2.50", 5), "£2.50\n");
    }

    #[test]
    fn test_column_line_oversized_value_truncated() {
        assert_eq!(format_column_line("x", "0123456789", 4), "0123\n");
    }

    #[test]
    fn test_column_line_single_label_column() {
        assert_eq!(format_column_line("AB", "£2.50", 7), "… £2.50\n");
    }

    #[test]
    fn test_column_line_zero_width() {
        assert_eq!(format_column_line("Tea", "£2.50", 0), "£2.50\n");
    }

    #[test]
    fn test_column_line_flattens_newlines() {
        let line = format_column_line("a\nb", "c\nd", 10);
        assert_eq!(line, "a b    c d\n");
    }

    #[test]
    fn test_column_line_counts_chars_not_bytes() {
        // '£' and '€' are multi-byte but single-column.
        let line = format_column_line("Café", "€9.99", 16);
        assert_eq!(line.chars().count(), 17);
        assert_eq!(line, "Café       €9.99\n");
    }
}
