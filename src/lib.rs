//! # Folio
//!
//! Renders expense reports as paginated PDF documents.
//!
//! A report is a flat list of rows: title and total lines, table headers,
//! one row per receipt, totals footers and the spacers between them. Rows
//! are never split. The layout engine measures every row once, decides on
//! which page it lands, and only then draws anything, so the page count is
//! known before the first page is written.
//!
//! ## Architecture
//!
//! ```text
//! Input (JSON/API)
//!       ↓
//!   [model]    trip, receipts, distances, page setup
//!       ↓
//!   [report]   pick sections, compute totals, build rows
//!       ↓       (tables via [table])
//!   [layout]   measure rows, paginate, render pages
//!       ↓
//!   [pdf]      serialize to PDF bytes
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod report;
pub mod style;
pub mod table;
pub mod text;

use std::time::Instant;

use serde::{Deserialize, Serialize};

pub use error::{FolioError, Result};

use font::FontContext;
use layout::{PageDecorations, PageGeometry};
use model::{
    group_by_category, sum_by_category, CategoryGroup, CategorySummary, Distance, Metadata,
    PageSetup, Receipt, Trip,
};
use pdf::PdfDocument;
use report::{
    kept_receipts, PurchaseWallet, ReportColumns, ReportContext, ReportSectionComposer,
    UserPreferences,
};

/// Everything needed to render one report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    #[serde(default)]
    pub page: PageSetup,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(default)]
    pub decorations: PageDecorations,
    pub trip: Trip,
    #[serde(default)]
    pub receipts: Vec<Receipt>,
    #[serde(default)]
    pub distances: Vec<Distance>,
    /// Per-category sums. Derived from the receipts when absent.
    #[serde(default)]
    pub categories: Option<Vec<CategorySummary>>,
    /// Receipts grouped by category. Derived from the receipts when absent.
    #[serde(default)]
    pub groups: Option<Vec<CategoryGroup>>,
    #[serde(default)]
    pub columns: ReportColumns,
    #[serde(default)]
    pub preferences: UserPreferences,
    #[serde(default)]
    pub purchases: PurchaseWallet,
}

impl ReportInput {
    /// Category sums and groups for the report. Values given in the input
    /// are used as they are; missing ones are derived from the receipts
    /// that pass the receipt filters, so they agree with the header totals.
    pub fn category_data(&self) -> (Vec<CategorySummary>, Vec<CategoryGroup>) {
        let kept = kept_receipts(&self.receipts, &self.preferences);
        let categories = match &self.categories {
            Some(categories) => categories.clone(),
            None => sum_by_category(&kept),
        };
        let groups = match &self.groups {
            Some(groups) => groups.clone(),
            None => group_by_category(&kept),
        };
        (categories, groups)
    }
}

/// Render a report to PDF bytes.
pub fn render_report(input: &ReportInput) -> Result<Vec<u8>> {
    let t0 = Instant::now();
    let fonts = FontContext::new();

    let (categories, groups) = input.category_data();

    let composer = ReportSectionComposer::new(ReportContext {
        trip: &input.trip,
        receipts: &input.receipts,
        distances: &input.distances,
        categories: &categories,
        groups: &groups,
        columns: &input.columns,
        preferences: &input.preferences,
        entitlements: &input.purchases,
    });

    let mut geometry = PageGeometry::from_setup(&input.page, 0.0, 0.0)?;
    let mut document = PdfDocument::new();
    let pages = composer.write(&mut geometry, input.decorations.clone(), &fonts, &mut document)?;
    let t_layout = t0.elapsed();

    let mut metadata = input.metadata.clone();
    if metadata.title.is_none() {
        metadata.title = Some(input.trip.name.clone());
    }
    let bytes = document.finish(&metadata, &fonts);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, serialize={:.1}ms, total={:.1}ms ({} pages, {} bytes)",
        t_layout.as_secs_f64() * 1000.0,
        (t_total - t_layout).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages,
        bytes.len(),
    );
    Ok(bytes)
}

/// Render a report described as JSON to PDF bytes.
pub fn render_json(json: &str) -> Result<Vec<u8>> {
    let input: ReportInput = serde_json::from_str(json)?;
    render_report(&input)
}
