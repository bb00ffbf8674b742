//! # Page Break Decisions
//!
//! Rows are unbreakable, so the only question for each row is whether it
//! goes on the current page or starts the next one.

/// Tolerance for accumulated floating point error when comparing heights.
const EPSILON: f64 = 1e-9;

/// What to do with a row, given the space left on the current page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Place the row on the current page (it fits).
    Place,
    /// Move the row to the top of the next page.
    MoveToNextPage,
    /// The row is taller than a whole page. It is placed alone at the top
    /// of a page and allowed to overflow it. `fresh_page` is false when
    /// the current page is still empty and can take it.
    Overflow { fresh_page: bool },
}

/// Decide where a row `row_height` tall goes.
///
/// `remaining_height` is the space left on the current page,
/// `page_height` the usable height of an empty page.
pub fn decide_break(
    remaining_height: f64,
    page_height: f64,
    row_height: f64,
    page_is_empty: bool,
) -> BreakDecision {
    if row_height <= remaining_height + EPSILON {
        return BreakDecision::Place;
    }

    if row_height > page_height + EPSILON {
        return BreakDecision::Overflow {
            fresh_page: !page_is_empty,
        };
    }

    BreakDecision::MoveToNextPage
}
