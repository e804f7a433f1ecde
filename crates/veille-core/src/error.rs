// crates/veille-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Input rejected: {0}")]
    Parser(#[from] veille_parser::ParserError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl ReportError {
    /// True when the input is structurally unusable (a required column is missing).
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ReportError::Parser(err) if err.is_schema_error())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
