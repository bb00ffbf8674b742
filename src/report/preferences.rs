//! User preferences consumed by the report composer.

use serde::{Deserialize, Serialize};

/// Boolean report options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preference {
    PrintLandscape,
    OmitDefaultTable,
    IncludeTaxField,
    UsePreTaxPrice,
    OnlyIncludeReimbursable,
    PrintDistanceTable,
    PrintDistanceAsDailyReceipt,
    CategoricalSummation,
    SeparateByCategory,
    IncludeCostCenter,
}

/// Read-only access to the user's report settings.
pub trait PreferenceSource {
    fn flag(&self, preference: Preference) -> bool;

    /// Separator between the year, month and day of printed dates.
    fn date_separator(&self) -> &str;

    /// Receipts priced below this are left out of the receipts table.
    fn minimum_receipt_price(&self) -> Option<f64>;
}

/// Preferences as read from a report input file. Every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserPreferences {
    pub print_landscape: bool,
    pub omit_default_table: bool,
    pub include_tax_field: bool,
    pub use_pre_tax_price: bool,
    pub only_include_reimbursable: bool,
    pub print_distance_table: bool,
    pub print_distance_as_daily_receipt: bool,
    pub categorical_summation: bool,
    pub separate_by_category: bool,
    pub include_cost_center: bool,
    pub date_separator: String,
    pub minimum_receipt_price: Option<f64>,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            print_landscape: false,
            omit_default_table: false,
            include_tax_field: false,
            use_pre_tax_price: false,
            only_include_reimbursable: false,
            print_distance_table: false,
            print_distance_as_daily_receipt: false,
            categorical_summation: false,
            separate_by_category: false,
            include_cost_center: false,
            date_separator: "/".to_string(),
            minimum_receipt_price: None,
        }
    }
}

impl UserPreferences {
    /// Set a flag, for building preferences in code.
    pub fn with(mut self, preference: Preference, value: bool) -> Self {
        *self.flag_mut(preference) = value;
        self
    }

    fn flag_mut(&mut self, preference: Preference) -> &mut bool {
        match preference {
            Preference::PrintLandscape => &mut self.print_landscape,
            Preference::OmitDefaultTable => &mut self.omit_default_table,
            Preference::IncludeTaxField => &mut self.include_tax_field,
            Preference::UsePreTaxPrice => &mut self.use_pre_tax_price,
            Preference::OnlyIncludeReimbursable => &mut self.only_include_reimbursable,
            Preference::PrintDistanceTable => &mut self.print_distance_table,
            Preference::PrintDistanceAsDailyReceipt => &mut self.print_distance_as_daily_receipt,
            Preference::CategoricalSummation => &mut self.categorical_summation,
            Preference::SeparateByCategory => &mut self.separate_by_category,
            Preference::IncludeCostCenter => &mut self.include_cost_center,
        }
    }
}

impl PreferenceSource for UserPreferences {
    fn flag(&self, preference: Preference) -> bool {
        match preference {
            Preference::PrintLandscape => self.print_landscape,
            Preference::OmitDefaultTable => self.omit_default_table,
            Preference::IncludeTaxField => self.include_tax_field,
            Preference::UsePreTaxPrice => self.use_pre_tax_price,
            Preference::OnlyIncludeReimbursable => self.only_include_reimbursable,
            Preference::PrintDistanceTable => self.print_distance_table,
            Preference::PrintDistanceAsDailyReceipt => self.print_distance_as_daily_receipt,
            Preference::CategoricalSummation => self.categorical_summation,
            Preference::SeparateByCategory => self.separate_by_category,
            Preference::IncludeCostCenter => self.include_cost_center,
        }
    }

    fn date_separator(&self) -> &str {
        &self.date_separator
    }

    fn minimum_receipt_price(&self) -> Option<f64> {
        self.minimum_receipt_price
    }
}
