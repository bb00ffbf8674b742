//! Summary figures shown in the report header.

use crate::model::{Distance, Receipt};
use crate::report::preferences::{Preference, PreferenceSource};

/// Amounts closer than this are treated as equal.
pub const EPSILON: f64 = 0.0001;

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReceiptsTotals {
    /// Sum of receipt prices, including tax.
    pub receipts: f64,
    pub tax: f64,
    /// Receipts total with tax removed.
    pub no_tax: f64,
    pub reimbursable: f64,
    pub distance: f64,
    /// Receipts plus distances.
    pub net: f64,
}

impl ReceiptsTotals {
    /// Totals over the receipts that appear in the report and all distances.
    pub fn compute(
        receipts: &[Receipt],
        distances: &[Distance],
        preferences: &dyn PreferenceSource,
    ) -> Self {
        let pre_tax = preferences.flag(Preference::UsePreTaxPrice);
        let gross = |r: &Receipt| if pre_tax { r.price + r.tax } else { r.price };

        let receipts_total: f64 = receipts.iter().map(gross).sum();
        let tax: f64 = receipts.iter().map(|r| r.tax).sum();
        let reimbursable = receipts
            .iter()
            .filter(|r| r.reimbursable)
            .map(gross)
            .sum();
        let distance: f64 = distances.iter().map(Distance::price).sum();

        Self {
            receipts: receipts_total,
            tax,
            no_tax: receipts_total - tax,
            reimbursable,
            distance,
            net: receipts_total + distance,
        }
    }
}
