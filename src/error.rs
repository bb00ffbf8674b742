//! Structured error types for the Folio report renderer.
//!
//! Every layout error is fatal for the report being generated: an
//! incomplete report is never written.

use thiserror::Error;

/// The unified error type returned by all public Folio API functions.
#[derive(Debug, Error)]
pub enum FolioError {
    /// Page size, margins or reserves leave no usable content area, or a
    /// table was defined without columns.
    #[error("Layout configuration error: {0}")]
    LayoutConfiguration(String),

    /// An operation was called in a state that does not allow it (adding
    /// rows after render, drawing before measuring, ...).
    #[error("Layout state error: {0}")]
    LayoutState(String),

    /// A column could not format the value of a record.
    #[error("Cannot format column '{column}' for row {row}: {message}")]
    CellFormatting {
        column: String,
        row: usize,
        message: String,
    },

    /// JSON input failed to parse as a valid report.
    #[error("Failed to parse report: {source}{}", hint_suffix(.hint))]
    Parse {
        source: serde_json::Error,
        hint: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {hint}")
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the report schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input, is the JSON truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        FolioError::Parse { source: e, hint }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
