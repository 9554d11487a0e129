use std::fmt;
use std::net::IpAddr;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::PriceCatalog;
use crate::models::EquipmentRecord;

/// Source column name → canonical field name. Canonical names are accepted
/// as headers too, so a previously generated invoice can be re-ingested.
pub const FIELD_ALIASES: &[(&str, &str)] = &[
    ("Equipment number", "equipment_number"),
    ("Serial number", "serial_number"),
    ("Item desc.", "item_desc"),
    ("Customer name", "customer_name"),
    ("Make", "make"),
    ("Model", "model"),
    ("Address", "address"),
    ("City", "city"),
    ("State", "state"),
    ("Zip", "zip"),
    ("Location", "location"),
    ("IP address", "ip_address"),
    ("MAC address", "mac_address"),
    ("Install date", "install_date"),
];

static MAC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Fa-f]{2}([:-][0-9A-Fa-f]{2}){5}$").unwrap());

/// Resolve one header cell to its canonical field name, if it is one we know.
pub fn canonical_field(header: &str) -> Option<&'static str> {
    let header = header.trim_start_matches('\u{feff}').trim();
    FIELD_ALIASES
        .iter()
        .find(|(alias, canonical)| header == *alias || header == *canonical)
        .map(|(_, canonical)| *canonical)
}

/// One input row after header aliasing, before validation. Blank cells are
/// `None`; all values are whitespace-trimmed.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    pub equipment_number: Option<String>,
    pub serial_number: Option<String>,
    pub item_desc: Option<String>,
    pub customer_name: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub location: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub install_date: Option<String>,
}

impl RawRow {
    pub fn set(&mut self, field: &str, value: String) {
        match field {
            "equipment_number" => self.equipment_number = Some(value),
            "serial_number" => self.serial_number = Some(value),
            "item_desc" => self.item_desc = Some(value),
            "customer_name" => self.customer_name = Some(value),
            "make" => self.make = Some(value),
            "model" => self.model = Some(value),
            "address" => self.address = Some(value),
            "city" => self.city = Some(value),
            "state" => self.state = Some(value),
            "zip" => self.zip = Some(value),
            "location" => self.location = Some(value),
            "ip_address" => self.ip_address = Some(value),
            "mac_address" => self.mac_address = Some(value),
            "install_date" => self.install_date = Some(value),
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    MissingField,
    TypeCoercion,
    MissingCostCenter,
    UnknownModel,
    InvalidNetworkAddress,
}

#[derive(Debug, Clone)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
    pub message: String,
}

/// Everything wrong with one row. Rows with a failure go to the Failed set
/// for a repair attempt; they never abort the run.
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    pub fn has_kind(&self, kind: FieldErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

fn missing(field: &'static str) -> FieldError {
    FieldError {
        field,
        kind: FieldErrorKind::MissingField,
        message: "field is required".to_string(),
    }
}

fn require(value: Option<&str>, field: &'static str, errors: &mut Vec<FieldError>) -> String {
    match value {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            errors.push(missing(field));
            String::new()
        }
    }
}

/// Dates arrive either ISO or US-style from the fleet export.
pub fn parse_install_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
}

/// Validate one raw row against the schema, accumulating every field error
/// rather than stopping at the first.
pub fn validate(row: &RawRow, catalog: &PriceCatalog) -> Result<EquipmentRecord, ValidationFailure> {
    let mut errors = Vec::new();

    let equipment_number = match row.equipment_number.as_deref() {
        None => {
            errors.push(missing("equipment_number"));
            0
        }
        Some(s) => s.parse::<i64>().unwrap_or_else(|_| {
            errors.push(FieldError {
                field: "equipment_number",
                kind: FieldErrorKind::TypeCoercion,
                message: format!("not an integer: {s}"),
            });
            0
        }),
    };

    let serial_number = require(row.serial_number.as_deref(), "serial_number", &mut errors);
    let item_desc = require(row.item_desc.as_deref(), "item_desc", &mut errors);
    let customer_name = require(row.customer_name.as_deref(), "customer_name", &mut errors);
    let make = require(row.make.as_deref(), "make", &mut errors);
    let address = require(row.address.as_deref(), "address", &mut errors);
    let city = require(row.city.as_deref(), "city", &mut errors);
    let state = require(row.state.as_deref(), "state", &mut errors);

    let location = require(row.location.as_deref(), "location", &mut errors);
    if !location.is_empty() && !location.contains("CC:") {
        errors.push(FieldError {
            field: "location",
            kind: FieldErrorKind::MissingCostCenter,
            message: "equipment is missing its cost center".to_string(),
        });
    }

    let model = require(row.model.as_deref(), "model", &mut errors);
    if !model.is_empty() && !catalog.contains(&model) {
        errors.push(FieldError {
            field: "model",
            kind: FieldErrorKind::UnknownModel,
            message: format!("model has no price in the catalog: {model}"),
        });
    }

    let install_date = match row.install_date.as_deref() {
        None => {
            errors.push(missing("install_date"));
            NaiveDate::default()
        }
        Some(s) => parse_install_date(s).unwrap_or_else(|| {
            errors.push(FieldError {
                field: "install_date",
                kind: FieldErrorKind::TypeCoercion,
                message: format!("not a recognized date: {s}"),
            });
            NaiveDate::default()
        }),
    };

    // Network identities are required; the repair pass substitutes defaults
    // for rows that arrive with blank ones.
    let ip_address = match row.ip_address.as_deref() {
        None => {
            errors.push(missing("ip_address"));
            IpAddr::from([0, 0, 0, 0])
        }
        Some(s) => s.parse::<IpAddr>().unwrap_or_else(|_| {
            errors.push(FieldError {
                field: "ip_address",
                kind: FieldErrorKind::InvalidNetworkAddress,
                message: format!("not a valid IP address: {s}"),
            });
            IpAddr::from([0, 0, 0, 0])
        }),
    };

    let mac_address = match row.mac_address.as_deref() {
        None => {
            errors.push(missing("mac_address"));
            String::new()
        }
        Some(s) if MAC_RE.is_match(s) => s.to_string(),
        Some(s) => {
            errors.push(FieldError {
                field: "mac_address",
                kind: FieldErrorKind::InvalidNetworkAddress,
                message: format!("not a valid MAC address: {s}"),
            });
            String::new()
        }
    };

    if !errors.is_empty() {
        return Err(ValidationFailure { errors });
    }

    Ok(EquipmentRecord {
        equipment_number,
        serial_number,
        item_desc,
        customer_name,
        make,
        model,
        address,
        city,
        state,
        zip: row.zip.clone(),
        location,
        ip_address,
        mac_address,
        install_date,
    })
}
