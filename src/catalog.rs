use std::collections::BTreeMap;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{BillingError, Result};

/// Unit purchase price per supported device model.
///
/// The built-in table covers the current fleet; `--catalog` swaps it for a
/// JSON object of `"model": "price"` pairs (prices as decimal strings).
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct PriceCatalog {
    prices: BTreeMap<String, Decimal>,
}

impl Default for PriceCatalog {
    fn default() -> Self {
        let prices = [
            ("MA4500ifx", Decimal::new(145050, 2)),
            ("M5526cdw", Decimal::new(98550, 2)),
            ("MZ4000i", Decimal::new(717000, 2)),
            ("P2040dw", Decimal::new(68363, 2)),
            ("TASKalfa 2554ci", Decimal::new(797000, 2)),
            ("MA4000cix", Decimal::new(180757, 2)),
            ("ECOSYS M2540dw", Decimal::new(120000, 2)),
            ("M2635dw", Decimal::new(120000, 2)),
        ]
        .into_iter()
        .map(|(model, price)| (model.to_string(), price))
        .collect();
        Self { prices }
    }
}

impl PriceCatalog {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog: PriceCatalog = serde_json::from_str(&content)?;
        if catalog.prices.is_empty() {
            return Err(BillingError::CatalogEmpty(path.display().to_string()));
        }
        Ok(catalog)
    }

    pub fn contains(&self, model: &str) -> bool {
        self.prices.contains_key(model)
    }

    pub fn price(&self, model: &str) -> Option<Decimal> {
        self.prices.get(model).copied()
    }

    /// Models in sorted order, for display.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.prices.iter().map(|(model, price)| (model.as_str(), *price))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}
