use chrono::{Months, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::catalog::PriceCatalog;
use crate::error::{BillingError, Result};
use crate::models::{EquipmentRecord, InvoiceLine, RunTotals};
use crate::prompt::Prompter;

/// Lease term in calendar months.
pub const LEASE_TERM_MONTHS: u32 = 60;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 8.25% sales tax on the lease charges.
pub fn tax_rate() -> Decimal {
    Decimal::new(825, 4)
}

pub fn tax_amount(value: Decimal) -> Decimal {
    round_money(value * tax_rate())
}

pub fn total_with_tax(value: Decimal) -> Decimal {
    round_money(value * (Decimal::ONE + tax_rate()))
}

/// The cost center is the token immediately after a standalone `CC:` in the
/// location string. Validation only guarantees the substring, so e.g.
/// "Room CC:4521" contains it but has no standalone token.
pub fn extract_cost_center(location: &str) -> Option<&str> {
    let mut tokens = location.split_whitespace();
    while let Some(token) = tokens.next() {
        if token == "CC:" {
            return tokens.next();
        }
    }
    None
}

pub fn lease_end_date(install_date: NaiveDate) -> NaiveDate {
    install_date
        .checked_add_months(Months::new(LEASE_TERM_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

pub fn monthly_payment(model_price: Decimal) -> Decimal {
    round_money(model_price / Decimal::from(LEASE_TERM_MONTHS))
}

#[derive(Debug)]
pub struct CostedInvoice {
    pub lines: Vec<InvoiceLine>,
    pub totals: RunTotals,
}

/// Derive the billing fields for every accepted record, in acceptance order,
/// accumulating totals over leases still active on `run_date`. A record
/// whose location has no standalone cost-center token stops the run for an
/// operator decision: continue with a blank cost center, or abort.
pub fn compute(
    records: Vec<EquipmentRecord>,
    catalog: &PriceCatalog,
    run_date: NaiveDate,
    prompter: &dyn Prompter,
) -> Result<CostedInvoice> {
    let mut lines = Vec::with_capacity(records.len());
    let mut totals = RunTotals::default();

    for record in records {
        let cost_center = match extract_cost_center(&record.location) {
            Some(code) => code.to_string(),
            None => {
                let message = format!("Check CC for MDS {}", record.equipment_number);
                if !prompter.confirm_continue(&message)? {
                    return Err(BillingError::Aborted);
                }
                eprintln!(
                    "MDS {}: no cost-center token in location {:?}",
                    record.equipment_number, record.location
                );
                String::new()
            }
        };

        // The schema guarantees every accepted model is priced.
        let model_price = catalog.price(&record.model).unwrap_or_default();
        let end_date = lease_end_date(record.install_date);
        let monthly = monthly_payment(model_price);
        let active = end_date > run_date;

        if active {
            totals.total_cost_of_machines += model_price;
            totals.total_monthly_payment += monthly;
        }

        lines.push(InvoiceLine {
            record,
            cost_center,
            lease_end_date: end_date,
            model_price,
            monthly_payment: monthly,
            active,
        });
    }

    Ok(CostedInvoice { lines, totals })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::net::IpAddr;

    /// Deterministic stand-in for the operator.
    struct StubPrompter {
        answer: bool,
        asked: Cell<usize>,
    }

    impl StubPrompter {
        fn new(answer: bool) -> Self {
            Self { answer, asked: Cell::new(0) }
        }
    }

    impl Prompter for StubPrompter {
        fn choose_input_file(&self) -> Result<String> {
            Err(BillingError::NoInputSelected)
        }
        fn choose_output_file(&self) -> Result<String> {
            Err(BillingError::NoOutputSelected)
        }
        fn confirm_continue(&self, _message: &str) -> Result<bool> {
            self.asked.set(self.asked.get() + 1);
            Ok(self.answer)
        }
    }

    fn record(equipment_number: i64, model: &str, location: &str, install: &str) -> EquipmentRecord {
        EquipmentRecord {
            equipment_number,
            serial_number: "SN-1".to_string(),
            item_desc: "Copier".to_string(),
            customer_name: "DHR".to_string(),
            make: "Kyocera".to_string(),
            model: model.to_string(),
            address: "100 Main St".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip: Some("78701".to_string()),
            location: location.to_string(),
            ip_address: IpAddr::from([10, 0, 0, 5]),
            mac_address: "00:1A:2B:3C:4D:5E".to_string(),
            install_date: crate::schema::parse_install_date(install).unwrap(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_cost_center() {
        assert_eq!(extract_cost_center("Room 2 CC: 4521"), Some("4521"));
        assert_eq!(extract_cost_center("CC: 9 front desk"), Some("9"));
        assert_eq!(extract_cost_center("Room CC:4521"), None);
        assert_eq!(extract_cost_center("Room 2 CC:"), None);
        assert_eq!(extract_cost_center("no token"), None);
    }

    #[test]
    fn test_lease_end_date_is_sixty_calendar_months() {
        assert_eq!(lease_end_date(ymd(2023, 1, 1)), ymd(2028, 1, 1));
        assert_eq!(lease_end_date(ymd(2019, 8, 31)), ymd(2024, 8, 31));
        // Month-end clamping
        assert_eq!(lease_end_date(ymd(2020, 2, 29)), ymd(2025, 2, 28));
    }

    #[test]
    fn test_monthly_payment_rounding() {
        // 1450.50 / 60 = 24.175, a decimal midpoint
        assert_eq!(monthly_payment(Decimal::new(145050, 2)), Decimal::new(2418, 2));
        // 985.50 / 60 = 16.425
        assert_eq!(monthly_payment(Decimal::new(98550, 2)), Decimal::new(1643, 2));
        assert_eq!(monthly_payment(Decimal::new(717000, 2)), Decimal::new(11950, 2));
    }

    #[test]
    fn test_monthly_payment_for_every_catalog_entry() {
        let catalog = PriceCatalog::default();
        for (_, price) in catalog.iter() {
            let monthly = monthly_payment(price);
            // Two decimal places, within half a cent of price / 60
            assert_eq!(monthly, round_money(monthly));
            let diff = (monthly * Decimal::from(LEASE_TERM_MONTHS) - price).abs();
            assert!(diff <= Decimal::new(30, 2), "diff {diff} too large");
        }
    }

    #[test]
    fn test_compute_totals_exclude_expired_leases() {
        let catalog = PriceCatalog::default();
        let prompter = StubPrompter::new(true);
        let records = vec![
            record(1001, "MA4500ifx", "Room 2 CC: 4521", "2023-01-01"),
            record(1002, "M5526cdw", "Lab CC: 9", "2015-01-01"),
        ];
        let costed = compute(records, &catalog, ymd(2024, 1, 1), &prompter).unwrap();
        assert_eq!(costed.lines.len(), 2);
        assert!(costed.lines[0].active);
        assert!(!costed.lines[1].active);
        assert_eq!(costed.lines[0].cost_center, "4521");
        assert_eq!(costed.lines[0].lease_end_date, ymd(2028, 1, 1));
        assert_eq!(costed.lines[0].model_price, Decimal::new(145050, 2));
        assert_eq!(costed.lines[0].monthly_payment, Decimal::new(2418, 2));
        assert_eq!(costed.totals.total_cost_of_machines, Decimal::new(145050, 2));
        assert_eq!(costed.totals.total_monthly_payment, Decimal::new(2418, 2));
        assert_eq!(prompter.asked.get(), 0);
    }

    #[test]
    fn test_compute_confirms_on_missing_token_and_continues() {
        let catalog = PriceCatalog::default();
        let prompter = StubPrompter::new(true);
        // Substring present, but glued to the code: no standalone token
        let records = vec![record(1003, "MA4500ifx", "Room CC:4521", "2023-01-01")];
        let costed = compute(records, &catalog, ymd(2024, 1, 1), &prompter).unwrap();
        assert_eq!(prompter.asked.get(), 1);
        assert_eq!(costed.lines[0].cost_center, "");
        assert!(costed.lines[0].active);
    }

    #[test]
    fn test_compute_aborts_when_operator_declines() {
        let catalog = PriceCatalog::default();
        let prompter = StubPrompter::new(false);
        let records = vec![record(1004, "MA4500ifx", "Room CC:4521", "2023-01-01")];
        let result = compute(records, &catalog, ymd(2024, 1, 1), &prompter);
        assert!(matches!(result, Err(BillingError::Aborted)));
    }

    #[test]
    fn test_tax_helpers() {
        assert_eq!(tax_amount(Decimal::new(145050, 2)), Decimal::new(11967, 2));
        assert_eq!(total_with_tax(Decimal::new(145050, 2)), Decimal::new(157017, 2));
        assert_eq!(total_with_tax(Decimal::new(2418, 2)), Decimal::new(2617, 2));
    }
}
