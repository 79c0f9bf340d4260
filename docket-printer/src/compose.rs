//! Receipt composer
//!
//! Builds the ordered primitive sequence for one physical copy of a
//! receipt: header, metadata, line items (flat or grouped by category),
//! totals, optional barcode/QR, footer, drawer pulse, cut. The sequence
//! is deterministic for a given request; the paper profile only affects
//! column layout of the item lines.

use chrono::DateTime;
use chrono_tz::Tz;
use tracing::warn;

use docket_core::{
    BarcodeRequest, DEFAULT_CURRENCY, LineItem, PaperProfile, PrintOptions, PrintRequest,
    QrRequest, Receipt, StoreInfo, format_column_line, format_money, non_blank,
};

use crate::driver::{
    Alignment, CutKind, DrawerPin, DriverResult, PrinterDriver, PulseWidth, TextStyle,
};

const DEFAULT_BARCODE_HEIGHT: i64 = 80;
const DEFAULT_BARCODE_WIDTH: i64 = 3;
const DEFAULT_QR_SIZE: i64 = 6;

/// Renders one receipt copy into driver primitives.
pub struct ReceiptComposer {
    paper: PaperProfile,
    timezone: Tz,
    group_by_category: bool,
}

impl ReceiptComposer {
    /// Composer for the given paper width, timestamps rendered in
    /// `timezone`. Items print flat, in input order.
    pub fn new(paper: PaperProfile, timezone: Tz) -> Self {
        Self {
            paper,
            timezone,
            group_by_category: false,
        }
    }

    /// Group items under upper-cased category headers instead of the flat
    /// list. Categories keep first-seen order; blank categories pool
    /// under `Other`.
    pub fn with_grouping(mut self, group_by_category: bool) -> Self {
        self.group_by_category = group_by_category;
        self
    }

    /// Emit the full primitive sequence for one copy.
    ///
    /// Fails only on driver errors from required primitives; barcode/QR
    /// problems are logged and skipped.
    pub fn compose<D>(&self, driver: &mut D, request: &PrintRequest) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        let currency = non_blank(request.receipt.currency.as_deref()).unwrap_or(DEFAULT_CURRENCY);

        self.header(driver, &request.store)?;
        self.metadata(driver, &request.receipt)?;
        self.items(driver, &request.receipt, currency)?;
        self.totals(driver, &request.receipt, currency)?;
        self.codes(driver, &request.print_options);
        self.footer(driver, &request.footer_lines)?;
        self.hardware(driver, &request.print_options)
    }

    fn header<D>(&self, driver: &mut D, store: &StoreInfo) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        driver.set_align(Alignment::Center)?;
        if let Some(name) = non_blank(store.name.as_deref()) {
            driver.set_size(2, 2)?;
            driver.set_style(TextStyle::bold())?;
            driver.add_text(&format!("{}\n", name))?;
            driver.set_size(1, 1)?;
            driver.set_style(TextStyle::regular())?;
        }
        if let Some(address) = non_blank(store.address.as_deref()) {
            driver.add_text(&format!("{}\n", address))?;
        }
        if let Some(phone) = non_blank(store.phone.as_deref()) {
            driver.add_text(&format!("Tel: {}\n", phone))?;
        }
        driver.add_feed(1)
    }

    fn metadata<D>(&self, driver: &mut D, receipt: &Receipt) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        driver.set_align(Alignment::Left)?;
        if let Some(raw) = non_blank(receipt.created_at.as_deref()) {
            driver.add_text(&format!("Date: {}\n", self.format_timestamp(raw)))?;
        }
        if let Some(order_id) = non_blank(receipt.order_id.as_deref()) {
            driver.add_text(&format!("Order: {}\n", order_id))?;
        }
        if let Some(table) = non_blank(receipt.table.as_deref()) {
            driver.add_text(&format!("Table: {}\n", table))?;
        }
        if let Some(server) = non_blank(receipt.server.as_deref()) {
            driver.add_text(&format!("Server: {}\n", server))?;
        }
        if let Some(note) = non_blank(receipt.note.as_deref()) {
            driver.add_text(&format!("Note: {}\n", note))?;
        }
        driver.add_feed(1)
    }

    fn items<D>(&self, driver: &mut D, receipt: &Receipt, currency: &str) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        if receipt.items.is_empty() {
            return Ok(());
        }
        driver.set_align(Alignment::Left)?;

        if self.group_by_category {
            for (category, group) in group_items(&receipt.items) {
                driver.add_text(&format!("{}\n", category.to_uppercase()))?;
                for item in group {
                    self.item_lines(driver, item, currency)?;
                }
                driver.add_feed(1)?;
            }
        } else {
            for item in &receipt.items {
                self.item_lines(driver, item, currency)?;
            }
            driver.add_feed(1)?;
        }
        Ok(())
    }

    fn item_lines<D>(&self, driver: &mut D, item: &LineItem, currency: &str) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        let label = format!("{} x {}", item.qty.max(0), item.name.as_deref().unwrap_or(""));
        let price = format_money(item.line_total_pence(), currency);
        driver.add_text(&format_column_line(&label, &price, self.paper.columns()))?;

        if let Some(note) = non_blank(item.note.as_deref()) {
            driver.add_text(&format!("  - {}\n", note))?;
        }
        Ok(())
    }

    fn totals<D>(&self, driver: &mut D, receipt: &Receipt, currency: &str) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        driver.set_align(Alignment::Right)?;

        let sub_total = receipt.sub_total.unwrap_or(0);
        driver.add_text(&format!("Subtotal: {}\n", format_money(sub_total, currency)))?;

        if let Some(discount) = receipt.discount.filter(|v| *v != 0) {
            driver.add_text(&format!("Discount: {}\n", format_money(-discount, currency)))?;
        }
        if let Some(service) = receipt.service_charge.filter(|v| *v != 0) {
            driver.add_text(&format!("Service: {}\n", format_money(service, currency)))?;
        }
        if let Some(tax) = receipt.tax.filter(|v| *v != 0) {
            driver.add_text(&format!("Tax: {}\n", format_money(tax, currency)))?;
        }

        let total = receipt.total.unwrap_or(sub_total);
        driver.set_style(TextStyle::bold())?;
        driver.add_text(&format!("TOTAL: {}\n", format_money(total, currency)))?;
        driver.set_style(TextStyle::regular())?;
        driver.add_feed(1)
    }

    /// Barcode and QR blocks. Failures here never fail the receipt.
    fn codes<D>(&self, driver: &mut D, options: &PrintOptions)
    where
        D: PrinterDriver + ?Sized,
    {
        if let Some(barcode) = &options.print_barcode {
            self.barcode(driver, barcode);
        }
        if let Some(qr) = &options.print_qr {
            self.qr(driver, qr);
        }
    }

    fn barcode<D>(&self, driver: &mut D, barcode: &BarcodeRequest)
    where
        D: PrinterDriver + ?Sized,
    {
        let Some(data) = non_blank(barcode.data.as_deref()) else {
            return;
        };
        let height = barcode.height.unwrap_or(DEFAULT_BARCODE_HEIGHT).clamp(1, 255) as u8;
        let width = barcode.width.unwrap_or(DEFAULT_BARCODE_WIDTH).clamp(2, 6) as u8;

        let appended = driver
            .add_barcode(data, width, height)
            .and_then(|_| driver.add_feed(1));
        if let Err(err) = appended {
            warn!(error = %err, "skipping barcode");
        }
    }

    fn qr<D>(&self, driver: &mut D, qr: &QrRequest)
    where
        D: PrinterDriver + ?Sized,
    {
        let Some(data) = non_blank(qr.data.as_deref()) else {
            return;
        };
        let size = qr.size.unwrap_or(DEFAULT_QR_SIZE).clamp(1, 255) as u8;

        let appended = driver.add_qr(data, size).and_then(|_| driver.add_feed(1));
        if let Err(err) = appended {
            warn!(error = %err, "skipping qr code");
        }
    }

    fn footer<D>(&self, driver: &mut D, lines: &[String]) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        if lines.is_empty() {
            return Ok(());
        }
        driver.set_align(Alignment::Center)?;
        for line in lines {
            driver.add_text(&format!("{}\n", line))?;
        }
        driver.add_feed(1)
    }

    fn hardware<D>(&self, driver: &mut D, options: &PrintOptions) -> DriverResult<()>
    where
        D: PrinterDriver + ?Sized,
    {
        if options.open_drawer {
            driver.add_pulse(DrawerPin::Pin2, PulseWidth::Ms100)?;
        }
        driver.add_cut(CutKind::from_config(options.cut_type.as_deref()))
    }

    /// RFC 3339 timestamps (with or without milliseconds, `Z` or numeric
    /// offset) render as `%d/%m/%Y %H:%M` in the configured timezone;
    /// anything unparsable passes through raw.
    fn format_timestamp(&self, raw: &str) -> String {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(parsed) => parsed
                .with_timezone(&self.timezone)
                .format("%d/%m/%Y %H:%M")
                .to_string(),
            Err(_) => raw.to_string(),
        }
    }
}

/// Group items by category, first-seen order, blanks pooled under `Other`.
fn group_items(items: &[LineItem]) -> Vec<(&str, Vec<&LineItem>)> {
    let mut groups: Vec<(&str, Vec<&LineItem>)> = Vec::new();
    for item in items {
        let category = non_blank(item.category.as_deref()).unwrap_or("Other");
        match groups.iter_mut().find(|(name, _)| *name == category) {
            Some((_, group)) => group.push(item),
            None => groups.push((category, vec![item])),
        }
    }
    groups
}
