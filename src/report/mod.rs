//! # Report Composition
//!
//! Decides which sections an expense report contains and turns each of
//! them into grid rows. The sections, in order:
//!
//! ```text
//!   Header            trip name, totals, date range      always
//!   Receipts          receipts table (+ daily distances)  unless Plus and "omit default table"
//!   Distances         distance table                      "print distance table"
//!   CategorySummary   one row per category                Plus and "categorical summation"
//!   CategoryGroups    one table per category              Plus and "separate by category"
//! ```
//!
//! Each section is gated by one predicate in [`SECTIONS`] and separated
//! from the previous one by a spacer row. The composed rows go into a
//! single [`GridRenderer`], which is measured and rendered once.

pub mod columns;
pub mod preferences;
pub mod purchases;
pub mod totals;

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::Result;
use crate::font::FontContext;
use crate::layout::{
    CellRenderer, GridRenderer, PageDecorations, PageGeometry, RenderTarget, RowRenderer,
};
use crate::model::{format_date, CategoryGroup, CategorySummary, Distance, Price, Receipt, Trip};
use crate::style::{Alignment, ColorStyle, FontRole};
use crate::table::TableGenerator;

pub use columns::{CategoryColumn, ColumnFormat, DistanceColumn, ReceiptColumn, ReportColumns};
pub use preferences::{Preference, PreferenceSource, UserPreferences};
pub use purchases::{EntitlementSource, InAppPurchase, PurchaseFamily, PurchaseWallet};
pub use totals::ReceiptsTotals;

use totals::{approx_eq, EPSILON};

/// Gap between sections and between category groups.
pub const SECTION_SPACING: f64 = 40.0;
/// Gap between a category group's title and its table.
pub const GROUP_TITLE_SPACING: f64 = 10.0;

/// Name and category given to receipts synthesized from distances.
const DISTANCE_RECEIPT_NAME: &str = "Distance";

/// Everything one report is built from.
#[derive(Clone, Copy)]
pub struct ReportContext<'a> {
    pub trip: &'a Trip,
    pub receipts: &'a [Receipt],
    pub distances: &'a [Distance],
    pub categories: &'a [CategorySummary],
    pub groups: &'a [CategoryGroup],
    pub columns: &'a ReportColumns,
    pub preferences: &'a dyn PreferenceSource,
    pub entitlements: &'a dyn EntitlementSource,
}

impl ReportContext<'_> {
    fn flag(&self, preference: Preference) -> bool {
        self.preferences.flag(preference)
    }

    fn has_plus(&self) -> bool {
        self.entitlements
            .has_active_purchase(InAppPurchase::SmartReceiptsPlus)
    }

    fn column_format(&self) -> ColumnFormat {
        ColumnFormat {
            currency: self.trip.currency.clone(),
            date_separator: self.preferences.date_separator().to_string(),
            pre_tax: self.flag(Preference::UsePreTaxPrice),
        }
    }

    fn price(&self, amount: f64) -> String {
        Price::new(amount, &self.trip.currency).currency_formatted()
    }

    pub fn keeps_receipt(&self, receipt: &Receipt) -> bool {
        keeps_receipt(receipt, self.preferences)
    }
}

/// Whether a receipt passes the reimbursable and minimum price filters.
pub fn keeps_receipt(receipt: &Receipt, preferences: &dyn PreferenceSource) -> bool {
    if preferences.flag(Preference::OnlyIncludeReimbursable) && !receipt.reimbursable {
        return false;
    }
    match preferences.minimum_receipt_price() {
        Some(minimum) => receipt.price >= minimum,
        None => true,
    }
}

/// The receipts that pass [`keeps_receipt`], in their original order.
/// Totals, category sums and category groups are all built from these.
pub fn kept_receipts(receipts: &[Receipt], preferences: &dyn PreferenceSource) -> Vec<Receipt> {
    receipts
        .iter()
        .filter(|r| keeps_receipt(r, preferences))
        .cloned()
        .collect()
}

/// An independently includable block of the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    Receipts,
    Distances,
    CategorySummary,
    CategoryGroups,
}

pub type SectionPredicate = fn(&ReportContext<'_>) -> bool;

/// Every section with the condition for including it, in report order.
pub const SECTIONS: [(Section, SectionPredicate); 5] = [
    (Section::Header, include_header),
    (Section::Receipts, include_receipts),
    (Section::Distances, include_distances),
    (Section::CategorySummary, include_category_summary),
    (Section::CategoryGroups, include_category_groups),
];

pub fn include_header(_: &ReportContext<'_>) -> bool {
    true
}

pub fn include_receipts(ctx: &ReportContext<'_>) -> bool {
    !ctx.receipts.is_empty() && !(ctx.has_plus() && ctx.flag(Preference::OmitDefaultTable))
}

pub fn include_distances(ctx: &ReportContext<'_>) -> bool {
    ctx.flag(Preference::PrintDistanceTable) && !ctx.distances.is_empty()
}

pub fn include_category_summary(ctx: &ReportContext<'_>) -> bool {
    ctx.has_plus() && ctx.flag(Preference::CategoricalSummation) && !ctx.categories.is_empty()
}

pub fn include_category_groups(ctx: &ReportContext<'_>) -> bool {
    ctx.has_plus()
        && ctx.flag(Preference::SeparateByCategory)
        && ctx
            .groups
            .iter()
            .any(|group| group.receipts.iter().any(|r| ctx.keeps_receipt(r)))
}

/// Collapse distances into one receipt per day. The price is the sum of
/// that day's distance charges and the comment lists its locations.
pub fn distances_as_daily_receipts(distances: &[Distance]) -> Vec<Receipt> {
    let mut days: BTreeMap<NaiveDate, (f64, Vec<&str>)> = BTreeMap::new();
    for distance in distances {
        let (price, locations) = days.entry(distance.date).or_default();
        *price += distance.price();
        if !distance.location.is_empty() && !locations.contains(&distance.location.as_str()) {
            locations.push(&distance.location);
        }
    }

    days.into_iter()
        .map(|(date, (price, locations))| Receipt {
            name: DISTANCE_RECEIPT_NAME.to_string(),
            date,
            price,
            tax: 0.0,
            category: DISTANCE_RECEIPT_NAME.to_string(),
            comment: locations.join("; "),
            payment_method: String::new(),
            reimbursable: true,
        })
        .collect()
}

/// Builds the rows of a report and renders them.
pub struct ReportSectionComposer<'a> {
    ctx: ReportContext<'a>,
}

impl<'a> ReportSectionComposer<'a> {
    pub fn new(ctx: ReportContext<'a>) -> Self {
        Self { ctx }
    }

    /// The sections this report contains, in order.
    pub fn included_sections(&self) -> Vec<Section> {
        SECTIONS
            .iter()
            .filter(|(section, include)| {
                let included = include(&self.ctx);
                log::debug!("Section {section:?}: {}", if included { "included" } else { "skipped" });
                included
            })
            .map(|(section, _)| *section)
            .collect()
    }

    /// All rows of the report, sections separated by spacers.
    pub fn compose(&self) -> Result<Vec<RowRenderer>> {
        let mut rows = Vec::new();
        for (i, section) in self.included_sections().into_iter().enumerate() {
            if i > 0 {
                rows.push(RowRenderer::spacer(SECTION_SPACING));
            }
            rows.extend(self.section_rows(section)?);
        }
        Ok(rows)
    }

    fn section_rows(&self, section: Section) -> Result<Vec<RowRenderer>> {
        match section {
            Section::Header => Ok(self.header_rows()),
            Section::Receipts => self.receipts_table(),
            Section::Distances => self.distances_table(),
            Section::CategorySummary => self.category_summary_table(),
            Section::CategoryGroups => self.category_group_tables(),
        }
    }

    /// Receipts shown in the receipts table, before filtering. Includes
    /// the daily distance receipts when those are enabled.
    pub fn receipts_table_records(&self) -> Vec<Receipt> {
        let mut records = self.ctx.receipts.to_vec();
        if self.ctx.flag(Preference::PrintDistanceAsDailyReceipt) {
            records.extend(distances_as_daily_receipts(self.ctx.distances));
            records.sort_by_key(|r| r.date);
        }
        records
    }

    pub fn totals(&self) -> ReceiptsTotals {
        let kept = kept_receipts(self.ctx.receipts, self.ctx.preferences);
        ReceiptsTotals::compute(&kept, self.ctx.distances, self.ctx.preferences)
    }

    /// The lines of the header block, with the font role of each.
    pub fn header_lines(&self) -> Vec<(String, FontRole)> {
        let ctx = &self.ctx;
        let totals = self.totals();
        let mut lines = vec![(ctx.trip.name.clone(), FontRole::Title)];
        let mut line = |text: String| lines.push((text, FontRole::Default));

        if !approx_eq(totals.receipts, totals.net) {
            line(format!("Receipts Total: {}", ctx.price(totals.receipts)));
        }
        if ctx.flag(Preference::IncludeTaxField) {
            if ctx.flag(Preference::UsePreTaxPrice) && totals.tax > EPSILON {
                line(format!("Total Tax: {}", ctx.price(totals.tax)));
            } else if !approx_eq(totals.no_tax, totals.receipts)
                && totals.no_tax > EPSILON
            {
                line(format!("Receipts Total (Tax Excluded): {}", ctx.price(totals.no_tax)));
            }
        }
        if !ctx.flag(Preference::OnlyIncludeReimbursable)
            && !approx_eq(totals.reimbursable, totals.receipts)
        {
            line(format!("Total Reimbursable: {}", ctx.price(totals.reimbursable)));
        }
        if !ctx.distances.is_empty() {
            line(format!("Distance Total: {}", ctx.price(totals.distance)));
        }
        line(format!("Gross Total: {}", ctx.price(totals.net)));

        let separator = ctx.preferences.date_separator();
        line(format!(
            "From: {} To: {}",
            format_date(ctx.trip.start_date, separator),
            format_date(ctx.trip.end_date, separator)
        ));
        if ctx.flag(Preference::IncludeCostCenter) && !ctx.trip.cost_center.is_empty() {
            line(format!("Cost Center: {}", ctx.trip.cost_center));
        }
        if !ctx.trip.comment.is_empty() {
            line(format!("Comment: {}", ctx.trip.comment));
        }
        lines
    }

    fn header_rows(&self) -> Vec<RowRenderer> {
        let color = ColorStyle::Default.color();
        self.header_lines()
            .into_iter()
            .map(|(text, role)| {
                RowRenderer::new(CellRenderer::text(text, color, role.font()))
                    .aligned(Alignment::Start)
            })
            .collect()
    }

    fn receipts_table(&self) -> Result<Vec<RowRenderer>> {
        let columns = self.ctx.columns.receipt_columns(&self.ctx.column_format());
        let records = self.receipts_table_records();
        let rows = TableGenerator::new(&columns)?
            .filter(|r| self.ctx.keeps_receipt(r))
            .with_footer(true)
            .generate(&records);
        rows
    }

    fn distances_table(&self) -> Result<Vec<RowRenderer>> {
        let columns = self.ctx.columns.distance_columns(&self.ctx.column_format());
        let rows = TableGenerator::new(&columns)?
            .with_footer(true)
            .generate(self.ctx.distances);
        rows
    }

    fn category_summary_table(&self) -> Result<Vec<RowRenderer>> {
        let columns = self.ctx.columns.category_columns(&self.ctx.column_format());
        let rows = TableGenerator::new(&columns)?
            .with_footer(true)
            .generate(self.ctx.categories);
        rows
    }

    fn category_group_tables(&self) -> Result<Vec<RowRenderer>> {
        let columns = self.ctx.columns.receipt_columns(&self.ctx.column_format());
        let title_color = ColorStyle::Outline.color();
        let mut rows = Vec::new();
        for group in self.ctx.groups {
            let receipts = kept_receipts(&group.receipts, self.ctx.preferences);
            if receipts.is_empty() {
                log::debug!("Category group {:?} has no receipts left after filtering", group.category);
                continue;
            }
            if !rows.is_empty() {
                rows.push(RowRenderer::spacer(SECTION_SPACING));
            }
            rows.push(
                RowRenderer::new(CellRenderer::text(
                    group.category.clone(),
                    title_color,
                    FontRole::TableHeader.font(),
                ))
                .aligned(Alignment::Start),
            );
            rows.push(RowRenderer::spacer(GROUP_TITLE_SPACING));
            rows.extend(
                TableGenerator::new(&columns)?
                    .with_header(false)
                    .with_footer(true)
                    .generate(&receipts)?,
            );
        }
        Ok(rows)
    }

    /// Lay out and draw the report onto `target`. Returns the page count.
    ///
    /// With "print landscape" set the geometry is turned for the duration
    /// of the call and restored afterwards, also when an error occurs.
    pub fn write(
        &self,
        geometry: &mut PageGeometry,
        decorations: PageDecorations,
        fonts: &FontContext,
        target: &mut dyn RenderTarget,
    ) -> Result<usize> {
        let landscape = self.ctx.flag(Preference::PrintLandscape);
        let oriented = geometry.orient(landscape)?;
        if oriented.is_swapped() {
            log::debug!("Printing report in landscape");
        }

        let rows = self.compose()?;
        let mut grid = GridRenderer::new(&oriented)?.with_decorations(decorations)?;
        grid.add_rows(rows)?;
        grid.measure(fonts)?;
        grid.render(target, fonts)
    }
}
