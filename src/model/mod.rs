//! # Report Model
//!
//! The input representation for report generation: page setup, the trip
//! being reported on, and the already-resolved records that fill its
//! tables. Everything here deserializes from camelCase JSON with sensible
//! defaults, so a minimal input only needs a trip.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Page size. Defaults to A4.
    #[serde(default)]
    pub size: PageSize,

    /// Left and right margin in points (1/72 inch).
    #[serde(default = "default_margin")]
    pub margin_horizontal: f64,

    /// Top and bottom margin in points.
    #[serde(default = "default_margin")]
    pub margin_vertical: f64,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin_horizontal: default_margin(),
            margin_vertical: default_margin(),
        }
    }
}

fn default_margin() -> f64 {
    36.0
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for cell padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// A monetary amount in a given currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

impl Price {
    pub fn new(amount: f64, currency: &str) -> Self {
        Self {
            amount,
            currency: currency.to_string(),
        }
    }

    /// Amount with its currency symbol, e.g. `$12.50` or `NOK 99.00`.
    pub fn currency_formatted(&self) -> String {
        let sign = if self.amount < 0.0 { "-" } else { "" };
        let abs = self.amount.abs();
        match currency_symbol(&self.currency) {
            Some(symbol) => format!("{sign}{symbol}{abs:.2}"),
            None => format!("{sign}{} {abs:.2}", self.currency),
        }
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
        "EUR" => Some("\u{20ac}"),
        "GBP" => Some("\u{a3}"),
        "JPY" => Some("\u{a5}"),
        // Only symbols the standard fonts can encode; others use the code
        _ => None,
    }
}

/// Format a date as year-month-day joined by `separator`.
pub fn format_date(date: NaiveDate, separator: &str) -> String {
    format!(
        "{:04}{sep}{:02}{sep}{:02}",
        date.year(),
        date.month(),
        date.day(),
        sep = separator
    )
}

/// The trip (expense report) being rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub cost_center: String,
    #[serde(default)]
    pub comment: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A single expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub name: String,
    pub date: NaiveDate,
    pub price: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default = "default_true")]
    pub reimbursable: bool,
}

fn default_true() -> bool {
    true
}

/// A driven distance, billed at `rate` per unit of distance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distance {
    pub date: NaiveDate,
    #[serde(default)]
    pub location: String,
    pub distance: f64,
    pub rate: f64,
    #[serde(default)]
    pub comment: String,
}

impl Distance {
    pub fn price(&self) -> f64 {
        self.distance * self.rate
    }
}

/// Sum of all receipts in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub count: usize,
}

/// The receipts belonging to one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub category: String,
    pub receipts: Vec<Receipt>,
}

/// Group receipts by category, in order of each category's first appearance.
pub fn group_by_category(receipts: &[Receipt]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for receipt in receipts {
        match groups.iter_mut().find(|g| g.category == receipt.category) {
            Some(group) => group.receipts.push(receipt.clone()),
            None => groups.push(CategoryGroup {
                category: receipt.category.clone(),
                receipts: vec![receipt.clone()],
            }),
        }
    }
    groups
}

/// Sum receipts per category, in order of each category's first appearance.
pub fn sum_by_category(receipts: &[Receipt]) -> Vec<CategorySummary> {
    group_by_category(receipts)
        .into_iter()
        .map(|group| CategorySummary {
            price: group.receipts.iter().map(|r| r.price).sum(),
            tax: group.receipts.iter().map(|r| r.tax).sum(),
            count: group.receipts.len(),
            category: group.category,
        })
        .collect()
}
