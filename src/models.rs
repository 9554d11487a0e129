use std::net::IpAddr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// One leased device, as validated from a single input row.
#[derive(Debug, Clone)]
pub struct EquipmentRecord {
    pub equipment_number: i64,
    pub serial_number: String,
    pub item_desc: String,
    pub customer_name: String,
    pub make: String,
    pub model: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub location: String,
    pub ip_address: IpAddr,
    pub mac_address: String,
    pub install_date: NaiveDate,
}

/// A record with the billing fields derived by the cost engine.
#[derive(Debug, Clone)]
pub struct InvoiceLine {
    pub record: EquipmentRecord,
    pub cost_center: String,
    pub lease_end_date: NaiveDate,
    pub model_price: Decimal,
    pub monthly_payment: Decimal,
    /// True while the lease end date is after the run date.
    pub active: bool,
}

/// Running sums over active leases.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunTotals {
    pub total_cost_of_machines: Decimal,
    pub total_monthly_payment: Decimal,
}
