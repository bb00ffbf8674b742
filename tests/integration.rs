//! Integration tests for the Folio report pipeline.
//!
//! These tests exercise the full path from report input to PDF output.
//! They verify:
//! - JSON deserialization and defaults
//! - Section selection from preferences and purchases
//! - Pagination of long reports
//! - PDF output is structurally valid
//! - Orientation and decorations reach the output

use chrono::NaiveDate;

use folio::error::FolioError;
use folio::font::FontContext;
use folio::layout::{
    CellRenderer, GridRenderer, PageDecorations, PageGeometry, Rect, RenderTarget, RowRenderer,
    Stroke,
};
use folio::model::{Receipt, Trip};
use folio::report::{
    kept_receipts, InAppPurchase, Preference, PurchaseWallet, ReportColumns, ReportContext,
    ReportSectionComposer, UserPreferences,
};
use folio::style::{Color, FontSpec};
use folio::{render_json, render_report, ReportInput};

// ─── Helpers ────────────────────────────────────────────────────

/// A render target that remembers what was drawn where.
#[derive(Default)]
struct Recorder {
    pages: Vec<(f64, f64)>,
    texts: Vec<(usize, f64, f64, String)>,
    rects: usize,
}

impl RenderTarget for Recorder {
    fn new_page(&mut self, width: f64, height: f64) -> folio::Result<()> {
        self.pages.push((width, height));
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: f64,
        baseline: f64,
        text: &str,
        _font: &FontSpec,
        _color: Color,
    ) -> folio::Result<()> {
        let page = self.pages.len().checked_sub(1).ok_or_else(|| {
            FolioError::LayoutState("text before first page".to_string())
        })?;
        self.texts.push((page, x, baseline, text.to_string()));
        Ok(())
    }

    fn draw_rect(&mut self, _rect: Rect, _fill: Option<Color>, _stroke: Option<Stroke>) -> folio::Result<()> {
        self.rects += 1;
        Ok(())
    }

    fn page_size(&self) -> Option<(f64, f64)> {
        self.pages.last().copied()
    }
}

impl Recorder {
    fn has_text(&self, needle: &str) -> bool {
        self.texts.iter().any(|(_, _, _, t)| t == needle)
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
}

fn trip() -> Trip {
    Trip {
        name: "Spring Conference".to_string(),
        start_date: date(1),
        end_date: date(5),
        currency: "USD".to_string(),
        cost_center: String::new(),
        comment: String::new(),
    }
}

fn receipts(count: usize) -> Vec<Receipt> {
    (0..count)
        .map(|i| Receipt {
            name: format!("Receipt {i}"),
            date: date(1 + (i % 5) as u32),
            price: 10.0 + i as f64,
            tax: 0.0,
            category: ["Meals", "Travel", "Lodging"][i % 3].to_string(),
            comment: String::new(),
            payment_method: String::new(),
            reimbursable: true,
        })
        .collect()
}

fn input(receipts: Vec<Receipt>) -> ReportInput {
    ReportInput {
        page: Default::default(),
        metadata: Default::default(),
        decorations: PageDecorations::default(),
        trip: trip(),
        receipts,
        distances: Vec::new(),
        categories: None,
        groups: None,
        columns: ReportColumns::default(),
        preferences: UserPreferences::default(),
        purchases: PurchaseWallet::default(),
    }
}

fn assert_valid_pdf(bytes: &[u8]) {
    assert!(bytes.len() > 50, "PDF too small to be valid");
    assert!(bytes.starts_with(b"%PDF-1.7"), "Missing PDF header");
    assert!(bytes.windows(5).any(|w| w == b"%%EOF"), "Missing %%EOF marker");
    assert!(bytes.windows(4).any(|w| w == b"xref"), "Missing xref table");
    assert!(bytes.windows(7).any(|w| w == b"trailer"), "Missing trailer");
}

fn page_count(bytes: &[u8]) -> usize {
    let text = String::from_utf8_lossy(bytes);
    text.split("/Count ")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|n| n.parse().ok())
        .expect("page tree has a /Count")
}

// ─── Basic Pipeline Tests ───────────────────────────────────────

#[test]
fn test_minimal_json() {
    let json = r#"{
        "trip": { "name": "Day trip", "startDate": "2024-03-01", "endDate": "2024-03-01" }
    }"#;
    let bytes = render_json(json).unwrap();
    assert_valid_pdf(&bytes);
    assert_eq!(page_count(&bytes), 1);
    assert!(String::from_utf8_lossy(&bytes).contains("/Title (Day trip)"));
}

#[test]
fn test_receipts_json_with_defaults() {
    let json = r#"{
        "page": { "size": "Letter" },
        "trip": { "name": "Client visit", "startDate": "2024-03-01", "endDate": "2024-03-02" },
        "receipts": [
            { "name": "Taxi", "date": "2024-03-01", "price": 23.5 },
            { "name": "Lunch", "date": "2024-03-02", "price": 14, "reimbursable": false }
        ]
    }"#;
    let bytes = render_json(json).unwrap();
    assert_valid_pdf(&bytes);
    assert!(String::from_utf8_lossy(&bytes).contains("/MediaBox [0 0 612.00 792.00]"));
}

#[test]
fn test_long_report_paginates() {
    let bytes = render_report(&input(receipts(150))).unwrap();
    assert_valid_pdf(&bytes);
    assert!(page_count(&bytes) > 1);
}

#[test]
fn test_landscape_preference_turns_pages() {
    let mut report = input(receipts(3));
    report.preferences.print_landscape = true;
    let bytes = render_report(&report).unwrap();
    assert!(String::from_utf8_lossy(&bytes).contains("/MediaBox [0 0 841.89 595.28]"));
}

// ─── Error Tests ────────────────────────────────────────────────

#[test]
fn test_parse_error_has_hint() {
    let err = render_json(r#"{ "trip": { "name": "x" }, }"#).unwrap_err();
    assert!(matches!(err, FolioError::Parse { .. }));
    assert!(err.to_string().contains("Hint:"));
}

#[test]
fn test_schema_mismatch_is_a_parse_error() {
    let err = render_json(r#"{ "trip": { "name": "x", "startDate": "yesterday", "endDate": "2024-03-01" } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("doesn't match the report schema"));
}

#[test]
fn test_margins_leaving_no_room_are_rejected() {
    let mut report = input(receipts(1));
    report.page.margin_horizontal = 400.0;
    assert!(matches!(
        render_report(&report),
        Err(FolioError::LayoutConfiguration(_))
    ));
}

#[test]
fn test_unformattable_price_aborts_the_report() {
    let mut items = receipts(4);
    items[2].price = f64::NAN;
    match render_report(&input(items)) {
        Err(FolioError::CellFormatting { column, row, .. }) => {
            assert_eq!(column, "Price");
            assert_eq!(row, 2);
        }
        other => panic!("expected CellFormatting, got {:?}", other.map(|b| b.len())),
    }
}

// ─── Section Composition Tests ──────────────────────────────────

fn compose_into(
    receipts: &[Receipt],
    preferences: &UserPreferences,
    wallet: &PurchaseWallet,
) -> Recorder {
    let trip = trip();
    let kept = kept_receipts(receipts, preferences);
    let categories = folio::model::sum_by_category(&kept);
    let groups = folio::model::group_by_category(&kept);
    let columns = ReportColumns::default();
    let composer = ReportSectionComposer::new(ReportContext {
        trip: &trip,
        receipts,
        distances: &[],
        categories: &categories,
        groups: &groups,
        columns: &columns,
        preferences,
        entitlements: wallet,
    });
    let mut geometry = PageGeometry::new(612.0, 792.0, 36.0, 36.0, 0.0, 0.0).unwrap();
    let mut recorder = Recorder::default();
    composer
        .write(
            &mut geometry,
            PageDecorations::default(),
            &FontContext::new(),
            &mut recorder,
        )
        .unwrap();
    recorder
}

#[test]
fn test_category_summary_requires_plus() {
    let items = receipts(6);
    let prefs = UserPreferences::default().with(Preference::CategoricalSummation, true);

    let free = compose_into(&items, &prefs, &PurchaseWallet::default());
    assert!(!free.has_text("Receipts"));

    let plus = PurchaseWallet::default().with_purchase(InAppPurchase::SmartReceiptsPlus);
    let paid = compose_into(&items, &prefs, &plus);
    assert!(paid.has_text("Receipts"));
    assert!(paid.has_text("Meals"));
}

#[test]
fn test_grouped_tables_draw_group_titles() {
    let items = receipts(6);
    let prefs = UserPreferences::default()
        .with(Preference::SeparateByCategory, true)
        .with(Preference::OmitDefaultTable, true);
    let plus = PurchaseWallet::default().with_purchase(InAppPurchase::SmartReceiptsPlus);
    let recorder = compose_into(&items, &prefs, &plus);

    for title in ["Meals", "Travel", "Lodging"] {
        assert!(recorder.has_text(title), "missing group title {title}");
    }
    // Default table omitted and group tables have no header row
    assert!(!recorder.has_text("Name"));
}

#[test]
fn test_filtered_receipts_absent_from_category_sections() {
    let mut items = receipts(2);
    items.push(Receipt {
        name: "Souvenir".to_string(),
        date: date(3),
        price: 20.0,
        tax: 0.0,
        category: "Gifts".to_string(),
        comment: String::new(),
        payment_method: String::new(),
        reimbursable: false,
    });
    let prefs = UserPreferences::default()
        .with(Preference::OnlyIncludeReimbursable, true)
        .with(Preference::CategoricalSummation, true)
        .with(Preference::SeparateByCategory, true);
    let plus = PurchaseWallet::default().with_purchase(InAppPurchase::SmartReceiptsPlus);
    let recorder = compose_into(&items, &prefs, &plus);

    // Receipt 0 ($10) and receipt 1 ($11) survive the filter
    assert!(recorder.has_text("Gross Total: $21.00"));
    assert!(!recorder.has_text("Souvenir"));
    assert!(!recorder.has_text("Gifts"));
    assert!(!recorder.has_text("$20.00"));
    assert!(!recorder.has_text("$41.00"));
}

// ─── Grid Tests ─────────────────────────────────────────────────

#[test]
fn test_grid_scenario_two_pages() {
    let geometry = PageGeometry::new(600.0, 800.0, 20.0, 20.0, 0.0, 0.0).unwrap();
    let mut grid = GridRenderer::new(&geometry).unwrap();
    grid.add_rows((0..5).map(|_| RowRenderer::spacer(200.0))).unwrap();

    let fonts = FontContext::new();
    assert_eq!(grid.measure(&fonts).unwrap(), 2);
    let mut recorder = Recorder::default();
    assert_eq!(grid.render(&mut recorder, &fonts).unwrap(), 2);
    assert_eq!(recorder.pages, vec![(600.0, 800.0), (600.0, 800.0)]);
    assert_eq!(grid.rows_on_page(0), vec![0, 1, 2]);
    assert_eq!(grid.rows_on_page(1), vec![3, 4]);
}

#[test]
fn test_every_row_is_placed_once_in_order() {
    let geometry = PageGeometry::new(595.28, 841.89, 36.0, 36.0, 12.0, 12.0).unwrap();
    let font = FontSpec::new("Helvetica", 11.0, 400);
    let mut grid = GridRenderer::new(&geometry).unwrap();
    for i in 0..200 {
        let text = "word ".repeat(i % 40);
        grid.add_row(RowRenderer::new(CellRenderer::text(text, Color::BLACK, font.clone())))
            .unwrap();
    }

    let fonts = FontContext::new();
    let pages = grid.measure(&fonts).unwrap();
    let placements = grid.placements().unwrap();
    assert_eq!(placements.len(), 200);

    let usable = geometry.usable_height();
    for page in 0..pages {
        let used: f64 = placements.iter().filter(|p| p.page == page).map(|p| p.height).sum();
        assert!(used <= usable + 1e-6, "page {page} overfilled: {used} > {usable}");
    }
    for pair in placements.windows(2) {
        assert!(
            pair[1].page > pair[0].page
                || (pair[1].page == pair[0].page && pair[1].y >= pair[0].y + pair[0].height - 1e-9)
        );
    }
}

#[test]
fn test_page_numbers_drawn_with_total() {
    let mut report = input(receipts(150));
    report.decorations = PageDecorations {
        header: Some("Expense report".to_string()),
        footer: None,
        page_numbers: true,
    };
    let trip = report.trip.clone();
    let columns = ReportColumns::default();
    let composer = ReportSectionComposer::new(ReportContext {
        trip: &trip,
        receipts: &report.receipts,
        distances: &[],
        categories: &[],
        groups: &[],
        columns: &columns,
        preferences: &report.preferences,
        entitlements: &report.purchases,
    });
    let mut geometry = PageGeometry::from_setup(&report.page, 0.0, 0.0).unwrap();
    let mut recorder = Recorder::default();
    let pages = composer
        .write(&mut geometry, report.decorations.clone(), &FontContext::new(), &mut recorder)
        .unwrap();

    assert!(pages > 1);
    assert!(recorder.has_text(&format!("Page 1 of {pages}")));
    assert!(recorder.has_text(&format!("Page {pages} of {pages}")));
    let headers = recorder.texts.iter().filter(|(_, _, _, t)| t == "Expense report").count();
    assert_eq!(headers, pages);
}
