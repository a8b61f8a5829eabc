//! Scenario records: one working day's procurement situation.
//!
//! Everything here is immutable once the catalog is loaded. Request lines and
//! supplier prices are kept as ordered lists so rendering follows declaration
//! order.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Line items
// ─────────────────────────────────────────────────────────────────

/// One requested item and its quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestLine {
    pub item: String,
    pub quantity: u32,
}

/// One item a supplier quotes, with its unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub item: String,
    pub unit_price: f64,
}

// ─────────────────────────────────────────────────────────────────
// Supplier Option
// ─────────────────────────────────────────────────────────────────

/// A supplier's quote sheet for the day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierOption {
    /// Supplier name as shown to the intern
    pub name: String,

    /// Unit prices, in the order they are quoted
    pub prices: Vec<ItemPrice>,

    /// Free-text delivery description (e.g. "2 days")
    pub delivery: String,

    /// Free-text reliability remark
    #[serde(default)]
    pub reliability_note: String,
}

impl SupplierOption {
    /// Unit price for an item, if this supplier quotes it
    pub fn price_of(&self, item: &str) -> Option<f64> {
        self.prices
            .iter()
            .find(|p| p.item == item)
            .map(|p| p.unit_price)
    }

    /// Price the scenario's full request against this supplier's sheet.
    pub fn quote(&self, scenario: &DayScenario) -> Quote {
        let mut lines = Vec::new();
        let mut unquoted = Vec::new();

        for req in &scenario.request {
            match self.price_of(&req.item) {
                Some(unit_price) => lines.push(QuoteLine {
                    item: req.item.clone(),
                    quantity: req.quantity,
                    unit_price,
                    line_total: unit_price * f64::from(req.quantity),
                }),
                None => unquoted.push(req.item.clone()),
            }
        }

        let total = lines.iter().map(|l| l.line_total).sum();

        Quote {
            supplier: self.name.clone(),
            lines,
            unquoted,
            total,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Quote
// ─────────────────────────────────────────────────────────────────

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteLine {
    pub item: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub line_total: f64,
}

/// Cost of buying the whole request from a single supplier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub supplier: String,
    pub lines: Vec<QuoteLine>,
    /// Requested items the supplier does not price
    pub unquoted: Vec<String>,
    pub total: f64,
}

impl Quote {
    /// Whether every requested item is priced
    pub fn is_complete(&self) -> bool {
        self.unquoted.is_empty()
    }

    /// Whether the priced total fits under the budget ceiling
    pub fn within_budget(&self, budget: f64) -> bool {
        self.total <= budget
    }
}

// ─────────────────────────────────────────────────────────────────
// Day Scenario
// ─────────────────────────────────────────────────────────────────

/// One day of the internship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayScenario {
    /// Day number used to pick the scenario from the CLI
    pub day: u32,

    /// Title, unique within the catalog
    pub title: String,

    /// What the warehouse asked for
    pub request: Vec<RequestLine>,

    /// Finance budget ceiling in USD
    pub budget: f64,

    /// Supplier options, in presentation order
    #[serde(rename = "supplier")]
    pub suppliers: Vec<SupplierOption>,

    /// Optional disruption for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_event: Option<String>,
}

impl DayScenario {
    /// The special event, treating a blank string as absent
    pub fn special_event(&self) -> Option<&str> {
        self.special_event
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Quotes from every supplier, in presentation order
    pub fn quotes(&self) -> Vec<Quote> {
        self.suppliers.iter().map(|s| s.quote(self)).collect()
    }

    /// Requested items each supplier fails to price.
    ///
    /// Suppliers that cover the full request are omitted.
    pub fn coverage_gaps(&self) -> Vec<CoverageGap> {
        self.suppliers
            .iter()
            .filter_map(|supplier| {
                let missing: Vec<String> = self
                    .request
                    .iter()
                    .filter(|r| supplier.price_of(&r.item).is_none())
                    .map(|r| r.item.clone())
                    .collect();
                (!missing.is_empty()).then(|| CoverageGap {
                    supplier: supplier.name.clone(),
                    missing,
                })
            })
            .collect()
    }
}

/// Requested items one supplier does not quote.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageGap {
    pub supplier: String,
    pub missing: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
