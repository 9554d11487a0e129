use std::path::Path;

use csv::WriterBuilder;

use crate::cost::{round_money, tax_amount, total_with_tax, CostedInvoice};
use crate::error::Result;
use crate::fmt::money;
use crate::models::{InvoiceLine, RunTotals};

/// Output column order: the input fields plus the derived billing fields.
pub const REPORT_FIELDS: &[&str] = &[
    "equipment_number",
    "serial_number",
    "item_desc",
    "customer_name",
    "make",
    "model",
    "address",
    "city",
    "state",
    "zip",
    "location",
    "cost_center",
    "ip_address",
    "mac_address",
    "install_date",
    "lease_end_date",
    "model_price",
    "monthly_payment",
];

const COL_EQUIPMENT_NUMBER: usize = 0;
const COL_SERIAL_NUMBER: usize = 1;
const COL_INSTALL_DATE: usize = 14;
const COL_MODEL_PRICE: usize = 16;
const COL_MONTHLY_PAYMENT: usize = 17;

pub struct WrittenReport {
    pub rows_written: usize,
    /// Equipment numbers skipped because their lease already ended.
    pub expired: Vec<i64>,
}

/// Write the invoice: header, one row per active lease, two blank spacer
/// rows, then the subtotal/tax/total summary block. The spacer rows are
/// written outside the CSV writer, which would otherwise quote a lone
/// empty field.
pub fn write_invoice(path: &Path, invoice: &CostedInvoice) -> Result<WrittenReport> {
    let mut buf = Vec::new();
    let mut rows_written = 0;
    let mut expired = Vec::new();

    {
        let mut wtr = WriterBuilder::new().from_writer(&mut buf);
        wtr.write_record(REPORT_FIELDS)?;
        for line in &invoice.lines {
            if !line.active {
                expired.push(line.record.equipment_number);
                continue;
            }
            wtr.write_record(&body_row(line))?;
            rows_written += 1;
        }
        wtr.flush()?;
    }

    buf.extend_from_slice(b"\n\n");

    {
        let mut wtr = WriterBuilder::new().from_writer(&mut buf);
        for row in summary_rows(&invoice.totals) {
            wtr.write_record(&row)?;
        }
        wtr.flush()?;
    }

    std::fs::write(path, &buf)?;
    Ok(WrittenReport { rows_written, expired })
}

fn body_row(line: &InvoiceLine) -> Vec<String> {
    let r = &line.record;
    vec![
        r.equipment_number.to_string(),
        r.serial_number.clone(),
        r.item_desc.clone(),
        r.customer_name.clone(),
        r.make.clone(),
        r.model.clone(),
        r.address.clone(),
        r.city.clone(),
        r.state.clone(),
        r.zip.clone().unwrap_or_default(),
        r.location.clone(),
        line.cost_center.clone(),
        r.ip_address.to_string(),
        r.mac_address.clone(),
        r.install_date.format("%Y-%m-%d").to_string(),
        line.lease_end_date.format("%Y-%m-%d").to_string(),
        format!("{:.2}", line.model_price),
        format!("{:.2}", line.monthly_payment),
    ]
}

/// The three trailing summary rows, positioned by column.
pub fn summary_rows(totals: &RunTotals) -> [Vec<String>; 3] {
    let machines = totals.total_cost_of_machines;
    let monthly = totals.total_monthly_payment;

    let mut row_a = blank_row();
    row_a[COL_EQUIPMENT_NUMBER] = "Total due this month:".to_string();
    row_a[COL_SERIAL_NUMBER] = money(total_with_tax(monthly));
    row_a[COL_INSTALL_DATE] = "Subtotal:".to_string();
    row_a[COL_MODEL_PRICE] = money(round_money(machines));
    row_a[COL_MONTHLY_PAYMENT] = money(round_money(monthly));

    let mut row_b = blank_row();
    row_b[COL_INSTALL_DATE] = "Tax:".to_string();
    row_b[COL_MODEL_PRICE] = money(tax_amount(machines));
    row_b[COL_MONTHLY_PAYMENT] = money(tax_amount(monthly));

    let mut row_c = blank_row();
    row_c[COL_INSTALL_DATE] = "Total:".to_string();
    row_c[COL_MODEL_PRICE] = money(total_with_tax(machines));
    row_c[COL_MONTHLY_PAYMENT] = money(total_with_tax(monthly));

    [row_a, row_b, row_c]
}

fn blank_row() -> Vec<String> {
    vec![String::new(); REPORT_FIELDS.len()]
}
