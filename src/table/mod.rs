//! # Table Generation
//!
//! Turns a slice of typed records and an ordered list of [`Column`]s into
//! grid rows: an optional header row, one row per record and an optional
//! totals footer. Every table row is a single [`TableCellGroup`] so the
//! grid paginates it like any other row.
//!
//! Generation is all-or-nothing. If any cell fails to format, no rows are
//! returned.

use std::cmp::Ordering;

use crate::error::{FolioError, Result};
use crate::layout::{CellRenderer, ColumnWidth, RowRenderer, Stroke, TableCellGroup, TextCell};
use crate::model::Edges;
use crate::style::{Color, ColorStyle, FontRole, FontSpec};

/// Formats one record as cell text. `Err` carries a message describing
/// why the value cannot be shown.
pub type Extractor<T> = Box<dyn Fn(&T) -> std::result::Result<String, String>>;

/// Formats the footer cell of a column from the records in the table.
pub type FooterFn<T> = Box<dyn Fn(&[&T]) -> std::result::Result<String, String>>;

/// One column of a table: its header, width and how to format a record.
pub struct Column<T> {
    pub header: String,
    pub width: ColumnWidth,
    extract: Extractor<T>,
    footer: Option<FooterFn<T>>,
}

impl<T> Column<T> {
    pub fn new(
        header: impl Into<String>,
        extract: impl Fn(&T) -> std::result::Result<String, String> + 'static,
    ) -> Self {
        Self {
            header: header.into(),
            width: ColumnWidth::Auto,
            extract: Box::new(extract),
            footer: None,
        }
    }

    pub fn with_width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    pub fn with_footer(
        mut self,
        footer: impl Fn(&[&T]) -> std::result::Result<String, String> + 'static,
    ) -> Self {
        self.footer = Some(Box::new(footer));
        self
    }

    pub fn has_footer(&self) -> bool {
        self.footer.is_some()
    }

    pub fn extract(&self, record: &T) -> std::result::Result<String, String> {
        (self.extract)(record)
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("width", &self.width)
            .field("footer", &self.footer.is_some())
            .finish()
    }
}

/// Fonts, colors and spacing of generated tables.
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub header_font: FontSpec,
    pub body_font: FontSpec,
    pub footer_font: FontSpec,
    pub text_color: Color,
    pub header_fill: Option<Color>,
    pub footer_fill: Option<Color>,
    pub border: Option<Stroke>,
    pub cell_padding: Edges,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            header_font: FontRole::TableHeader.font(),
            body_font: FontRole::Table.font(),
            footer_font: FontRole::TableHeader.font(),
            text_color: ColorStyle::Default.color(),
            header_fill: Some(ColorStyle::HeaderFill.color()),
            footer_fill: Some(ColorStyle::FooterFill.color()),
            border: Some(Stroke {
                color: ColorStyle::Outline.color(),
                width: 0.5,
            }),
            cell_padding: Edges::symmetric(3.0, 4.0),
        }
    }
}

type Filter<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type Comparator<'a, T> = Box<dyn Fn(&T, &T) -> Ordering + 'a>;

/// Builds the rows of one table.
pub struct TableGenerator<'a, T> {
    columns: &'a [Column<T>],
    filter: Option<Filter<'a, T>>,
    sort: Option<Comparator<'a, T>>,
    header: bool,
    footer: bool,
    style: TableStyle,
}

impl<'a, T> TableGenerator<'a, T> {
    /// A generator emitting a header row and no footer. At least one
    /// column is required.
    pub fn new(columns: &'a [Column<T>]) -> Result<Self> {
        if columns.is_empty() {
            return Err(FolioError::LayoutConfiguration(
                "a table needs at least one column".to_string(),
            ));
        }
        Ok(Self {
            columns,
            filter: None,
            sort: None,
            header: true,
            footer: false,
            style: TableStyle::default(),
        })
    }

    /// Keep only records matching `predicate`. Survivors keep their order.
    pub fn filter(mut self, predicate: impl Fn(&T) -> bool + 'a) -> Self {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Stable-sort the surviving records.
    pub fn sort_by(mut self, compare: impl Fn(&T, &T) -> Ordering + 'a) -> Self {
        self.sort = Some(Box::new(compare));
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_footer(mut self, footer: bool) -> Self {
        self.footer = footer;
        self
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    fn row(&self, texts: Vec<String>, font: &FontSpec, fill: Option<Color>) -> RowRenderer {
        let cells = texts
            .into_iter()
            .map(|text| {
                CellRenderer::Text(
                    TextCell::new(text, self.style.text_color, font.clone())
                        .with_padding(self.style.cell_padding),
                )
            })
            .collect();
        RowRenderer::new(CellRenderer::Group(TableCellGroup {
            cells,
            widths: self.columns.iter().map(|c| c.width).collect(),
            border: self.style.border,
            background: fill,
        }))
    }

    /// Generate the table rows for `records`.
    pub fn generate(&self, records: &[T]) -> Result<Vec<RowRenderer>> {
        let mut survivors: Vec<(usize, &T)> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.as_ref().map_or(true, |keep| keep(record)))
            .collect();
        if let Some(compare) = &self.sort {
            survivors.sort_by(|(_, a), (_, b)| compare(a, b));
        }

        let mut rows = Vec::with_capacity(survivors.len() + 2);

        if self.header {
            let headers = self.columns.iter().map(|c| c.header.clone()).collect();
            rows.push(self.row(headers, &self.style.header_font, self.style.header_fill));
        }

        for (index, record) in &survivors {
            let texts = self
                .columns
                .iter()
                .map(|column| {
                    column.extract(record).map_err(|message| FolioError::CellFormatting {
                        column: column.header.clone(),
                        row: *index,
                        message,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(self.row(texts, &self.style.body_font, None));
        }

        if self.footer && self.columns.iter().any(Column::has_footer) {
            let included: Vec<&T> = survivors.iter().map(|(_, record)| *record).collect();
            let texts = self
                .columns
                .iter()
                .map(|column| match &column.footer {
                    Some(footer) => footer(&included).map_err(|message| FolioError::CellFormatting {
                        column: column.header.clone(),
                        row: included.len(),
                        message,
                    }),
                    None => Ok(String::new()),
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(self.row(texts, &self.style.footer_font, self.style.footer_fill));
        }

        log::debug!(
            "Generated table: {} of {} records, {} rows",
            survivors.len(),
            records.len(),
            rows.len()
        );
        Ok(rows)
    }
}
