use crate::catalog::PriceCatalog;
use crate::models::EquipmentRecord;
use crate::schema::{self, RawRow, ValidationFailure};

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_MAC: &str = "00:00:00:00:00:00";

/// A row rejected by the schema, kept together with its reasons.
#[derive(Debug, Clone)]
pub struct RejectedRow {
    pub row: RawRow,
    pub failure: ValidationFailure,
}

impl RejectedRow {
    /// Raw equipment number for notices; rejected rows may not have one.
    pub fn equipment_number(&self) -> &str {
        self.row.equipment_number.as_deref().unwrap_or("?")
    }
}

/// Classify every raw row as accepted or rejected, preserving input order.
pub fn partition(
    rows: Vec<RawRow>,
    catalog: &PriceCatalog,
) -> (Vec<EquipmentRecord>, Vec<RejectedRow>) {
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();
    for row in rows {
        match schema::validate(&row, catalog) {
            Ok(record) => accepted.push(record),
            Err(failure) => rejected.push(RejectedRow { row, failure }),
        }
    }
    (accepted, rejected)
}

#[derive(Debug, Default)]
pub struct RepairOutcome {
    pub promoted: Vec<EquipmentRecord>,
    pub corrected: usize,
    pub dropped: Vec<RejectedRow>,
}

/// One repair pass over the rejected rows: substitute default network
/// identities for blank ones, then re-validate — but only when the model is
/// priced, since no default can salvage an unknown model. Rows that still
/// fail are dropped for good.
pub fn repair(rejected: &[RejectedRow], catalog: &PriceCatalog) -> RepairOutcome {
    let mut outcome = RepairOutcome::default();
    for item in rejected {
        let mut row = item.row.clone();
        if row.ip_address.is_none() {
            row.ip_address = Some(DEFAULT_IP.to_string());
        }
        if row.mac_address.is_none() {
            row.mac_address = Some(DEFAULT_MAC.to_string());
        }
        let model_priced = row.model.as_deref().is_some_and(|m| catalog.contains(m));
        if !model_priced {
            outcome.dropped.push(item.clone());
            continue;
        }
        match schema::validate(&row, catalog) {
            Ok(record) => {
                outcome.promoted.push(record);
                outcome.corrected += 1;
            }
            Err(failure) => outcome.dropped.push(RejectedRow { row, failure }),
        }
    }
    outcome
}
