use std::path::Path;

use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::catalog::PriceCatalog;
use crate::cost;
use crate::error::Result;
use crate::fmt::money;

pub fn run(catalog_path: Option<&str>) -> Result<()> {
    let catalog = match catalog_path {
        Some(path) => PriceCatalog::from_json_file(Path::new(path))?,
        None => PriceCatalog::default(),
    };

    let mut table = Table::new();
    table.set_header(vec![
        "Model".to_string(),
        "Price".to_string(),
        format!("Monthly ({} mo)", cost::LEASE_TERM_MONTHS),
    ]);
    for (model, price) in catalog.iter() {
        table.add_row(vec![
            Cell::new(model),
            Cell::new(money(price)),
            Cell::new(money(price / Decimal::from(cost::LEASE_TERM_MONTHS))),
        ]);
    }
    println!("{table}");
    println!("{} models priced", catalog.len());
    Ok(())
}
