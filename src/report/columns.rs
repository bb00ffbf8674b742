//! The columns a report table can show, and how each one formats its
//! records.

use serde::{Deserialize, Serialize};

use crate::model::{format_date, CategorySummary, Distance, Price, Receipt};
use crate::table::Column;

/// Formatting settings shared by all columns of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnFormat {
    pub currency: String,
    pub date_separator: String,
    /// Receipt prices exclude tax.
    pub pre_tax: bool,
}

fn money(amount: f64, currency: &str) -> Result<String, String> {
    if amount.is_finite() {
        Ok(Price::new(amount, currency).currency_formatted())
    } else {
        Err(format!("amount {amount} is not a number"))
    }
}

fn sum<T>(records: &[&T], amount: impl Fn(&T) -> f64) -> f64 {
    records.iter().map(|r| amount(*r)).sum()
}

/// A money column with a summing footer.
fn money_column<T: 'static>(
    header: &str,
    format: &ColumnFormat,
    amount: fn(&T) -> f64,
) -> Column<T> {
    let currency = format.currency.clone();
    let footer_currency = currency.clone();
    Column::new(header, move |r: &T| money(amount(r), &currency))
        .with_footer(move |records: &[&T]| money(sum(records, amount), &footer_currency))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReceiptColumn {
    Name,
    Price,
    Tax,
    PriceExTax,
    Currency,
    Date,
    Category,
    Comment,
    PaymentMethod,
    Reimbursable,
}

impl ReceiptColumn {
    pub fn defaults() -> Vec<Self> {
        vec![
            ReceiptColumn::Name,
            ReceiptColumn::Price,
            ReceiptColumn::Date,
            ReceiptColumn::Category,
            ReceiptColumn::Comment,
            ReceiptColumn::Reimbursable,
        ]
    }

    pub fn header(self) -> &'static str {
        match self {
            ReceiptColumn::Name => "Name",
            ReceiptColumn::Price => "Price",
            ReceiptColumn::Tax => "Tax",
            ReceiptColumn::PriceExTax => "Price (Ex Tax)",
            ReceiptColumn::Currency => "Currency",
            ReceiptColumn::Date => "Date",
            ReceiptColumn::Category => "Category",
            ReceiptColumn::Comment => "Comment",
            ReceiptColumn::PaymentMethod => "Payment Method",
            ReceiptColumn::Reimbursable => "Reimbursable",
        }
    }

    pub fn column(self, format: &ColumnFormat) -> Column<Receipt> {
        let header = self.header();
        match self {
            ReceiptColumn::Name => Column::new(header, |r: &Receipt| Ok(r.name.clone())),
            ReceiptColumn::Price => money_column(header, format, |r: &Receipt| r.price),
            ReceiptColumn::Tax => money_column(header, format, |r: &Receipt| r.tax),
            ReceiptColumn::PriceExTax => {
                if format.pre_tax {
                    money_column(header, format, |r: &Receipt| r.price)
                } else {
                    money_column(header, format, |r: &Receipt| r.price - r.tax)
                }
            }
            ReceiptColumn::Currency => {
                let currency = format.currency.clone();
                Column::new(header, move |_: &Receipt| Ok(currency.clone()))
            }
            ReceiptColumn::Date => {
                let separator = format.date_separator.clone();
                Column::new(header, move |r: &Receipt| Ok(format_date(r.date, &separator)))
            }
            ReceiptColumn::Category => Column::new(header, |r: &Receipt| Ok(r.category.clone())),
            ReceiptColumn::Comment => Column::new(header, |r: &Receipt| Ok(r.comment.clone())),
            ReceiptColumn::PaymentMethod => {
                Column::new(header, |r: &Receipt| Ok(r.payment_method.clone()))
            }
            ReceiptColumn::Reimbursable => Column::new(header, |r: &Receipt| {
                Ok(if r.reimbursable { "Yes" } else { "No" }.to_string())
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistanceColumn {
    Date,
    Location,
    Distance,
    Rate,
    Price,
    Comment,
}

impl DistanceColumn {
    pub fn defaults() -> Vec<Self> {
        vec![
            DistanceColumn::Date,
            DistanceColumn::Location,
            DistanceColumn::Distance,
            DistanceColumn::Rate,
            DistanceColumn::Price,
            DistanceColumn::Comment,
        ]
    }

    pub fn header(self) -> &'static str {
        match self {
            DistanceColumn::Date => "Date",
            DistanceColumn::Location => "Location",
            DistanceColumn::Distance => "Distance",
            DistanceColumn::Rate => "Rate",
            DistanceColumn::Price => "Price",
            DistanceColumn::Comment => "Comment",
        }
    }

    pub fn column(self, format: &ColumnFormat) -> Column<Distance> {
        let header = self.header();
        match self {
            DistanceColumn::Date => {
                let separator = format.date_separator.clone();
                Column::new(header, move |d: &Distance| Ok(format_date(d.date, &separator)))
            }
            DistanceColumn::Location => Column::new(header, |d: &Distance| Ok(d.location.clone())),
            DistanceColumn::Distance => Column::new(header, |d: &Distance| {
                if d.distance.is_finite() {
                    Ok(format!("{:.2}", d.distance))
                } else {
                    Err(format!("distance {} is not a number", d.distance))
                }
            })
            .with_footer(|records: &[&Distance]| Ok(format!("{:.2}", sum(records, |d| d.distance)))),
            DistanceColumn::Rate => {
                let currency = format.currency.clone();
                Column::new(header, move |d: &Distance| money(d.rate, &currency))
            }
            DistanceColumn::Price => money_column(header, format, Distance::price),
            DistanceColumn::Comment => Column::new(header, |d: &Distance| Ok(d.comment.clone())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryColumn {
    Name,
    Price,
    Tax,
    Count,
}

impl CategoryColumn {
    pub fn defaults() -> Vec<Self> {
        vec![
            CategoryColumn::Name,
            CategoryColumn::Price,
            CategoryColumn::Tax,
            CategoryColumn::Count,
        ]
    }

    pub fn header(self) -> &'static str {
        match self {
            CategoryColumn::Name => "Category",
            CategoryColumn::Price => "Price",
            CategoryColumn::Tax => "Tax",
            CategoryColumn::Count => "Receipts",
        }
    }

    pub fn column(self, format: &ColumnFormat) -> Column<CategorySummary> {
        let header = self.header();
        match self {
            CategoryColumn::Name => {
                Column::new(header, |c: &CategorySummary| Ok(c.category.clone()))
            }
            CategoryColumn::Price => money_column(header, format, |c: &CategorySummary| c.price),
            CategoryColumn::Tax => money_column(header, format, |c: &CategorySummary| c.tax),
            CategoryColumn::Count => Column::new(header, |c: &CategorySummary| Ok(c.count.to_string()))
                .with_footer(|records: &[&CategorySummary]| {
                    Ok(records.iter().map(|c| c.count).sum::<usize>().to_string())
                }),
        }
    }
}

/// Which columns each table shows, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportColumns {
    pub receipts: Vec<ReceiptColumn>,
    pub distances: Vec<DistanceColumn>,
    pub categories: Vec<CategoryColumn>,
}

impl Default for ReportColumns {
    fn default() -> Self {
        Self {
            receipts: ReceiptColumn::defaults(),
            distances: DistanceColumn::defaults(),
            categories: CategoryColumn::defaults(),
        }
    }
}

impl ReportColumns {
    pub fn receipt_columns(&self, format: &ColumnFormat) -> Vec<Column<Receipt>> {
        self.receipts.iter().map(|c| c.column(format)).collect()
    }

    pub fn distance_columns(&self, format: &ColumnFormat) -> Vec<Column<Distance>> {
        self.distances.iter().map(|c| c.column(format)).collect()
    }

    pub fn category_columns(&self, format: &ColumnFormat) -> Vec<Column<CategorySummary>> {
        self.categories.iter().map(|c| c.column(format)).collect()
    }
}
