//! Scenario catalog: the bundled days, or a replacement loaded from disk.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

use super::types::DayScenario;

const BUNDLED_CATALOG: &str = include_str!("../../config/scenarios.toml");

/// On-disk layout: a list of `[[scenario]]` tables.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(rename = "scenario", default)]
    scenarios: Vec<DayScenario>,
}

/// Ordered, validated list of scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioCatalog {
    scenarios: Vec<DayScenario>,
}

impl ScenarioCatalog {
    /// The catalog compiled into the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_toml_str(BUNDLED_CATALOG)
    }

    /// Load a catalog file, replacing the bundled scenarios entirely.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::IoRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let catalog = Self::from_toml_str(&content)?;
        info!(
            path = %path.display(),
            scenarios = catalog.len(),
            "Scenario catalog loaded from file"
        );
        Ok(catalog)
    }

    /// Bundled catalog unless a scenario file is given.
    pub fn from_optional_path(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load(Path::new(p)),
            None => Self::bundled(),
        }
    }

    /// Parse and validate catalog TOML.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| Error::catalog_invalid(format!("Failed to parse TOML: {}", e)))?;

        let catalog = Self {
            scenarios: file.scenarios,
        };
        catalog.validate()?;
        catalog.warn_coverage_gaps();

        debug!(scenarios = catalog.len(), "Scenario catalog ready");
        Ok(catalog)
    }

    fn validate(&self) -> Result<()> {
        if self.scenarios.is_empty() {
            return Err(Error::catalog_invalid("catalog contains no scenarios"));
        }

        let mut titles = HashSet::new();
        let mut days = HashSet::new();

        for s in &self.scenarios {
            let title = s.title.trim();
            if title.is_empty() {
                return Err(Error::catalog_invalid(format!("day {} has an empty title", s.day)));
            }
            if !titles.insert(title) {
                return Err(Error::catalog_invalid(format!("duplicate title '{}'", title)));
            }
            if !days.insert(s.day) {
                return Err(Error::catalog_invalid(format!("duplicate day {}", s.day)));
            }
            if !(s.budget.is_finite() && s.budget > 0.0) {
                return Err(Error::catalog_invalid(format!(
                    "'{}': budget must be a positive number",
                    title
                )));
            }

            if s.request.is_empty() {
                return Err(Error::catalog_invalid(format!("'{}': request is empty", title)));
            }
            let mut requested = HashSet::new();
            for line in &s.request {
                if line.item.trim().is_empty() || line.quantity == 0 {
                    return Err(Error::catalog_invalid(format!(
                        "'{}': request lines need an item name and a positive quantity",
                        title
                    )));
                }
                if !requested.insert(line.item.as_str()) {
                    return Err(Error::catalog_invalid(format!(
                        "'{}': item '{}' requested twice",
                        title, line.item
                    )));
                }
            }

            if s.suppliers.is_empty() {
                return Err(Error::catalog_invalid(format!("'{}': no supplier options", title)));
            }
            for supplier in &s.suppliers {
                if supplier.name.trim().is_empty() {
                    return Err(Error::catalog_invalid(format!(
                        "'{}': supplier without a name",
                        title
                    )));
                }
                let mut priced = HashSet::new();
                for price in &supplier.prices {
                    if !(price.unit_price.is_finite() && price.unit_price > 0.0) {
                        return Err(Error::catalog_invalid(format!(
                            "'{}': {} quotes a non-positive price for '{}'",
                            title, supplier.name, price.item
                        )));
                    }
                    if !priced.insert(price.item.as_str()) {
                        return Err(Error::catalog_invalid(format!(
                            "'{}': {} prices '{}' twice",
                            title, supplier.name, price.item
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    /// Suppliers that leave requested items unpriced are allowed, but noted.
    fn warn_coverage_gaps(&self) {
        for s in &self.scenarios {
            for gap in s.coverage_gaps() {
                warn!(
                    scenario = %s.title,
                    supplier = %gap.supplier,
                    missing = ?gap.missing,
                    "Supplier does not quote every requested item"
                );
            }
        }
    }

    /// All scenarios in catalog order.
    pub fn scenarios(&self) -> &[DayScenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Look a scenario up by day number or exact title.
    pub fn find(&self, key: &str) -> Result<&DayScenario> {
        let key = key.trim();
        let by_day = key
            .parse::<u32>()
            .ok()
            .and_then(|day| self.scenarios.iter().find(|s| s.day == day));

        by_day
            .or_else(|| self.scenarios.iter().find(|s| s.title == key))
            .ok_or_else(|| Error::ScenarioNotFound {
                day: key.to_string(),
            })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
