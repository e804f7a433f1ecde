use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    /// One or more required columns are absent from the header row. No partial
    /// record set is produced.
    #[error("missing required column(s): {}", missing.join(", "))]
    MissingColumns { missing: Vec<&'static str> },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("unsupported delimiter {0:?}; expected ',', ';' or tab")]
    UnsupportedDelimiter(char),
}

impl ParserError {
    pub fn is_schema_error(&self) -> bool {
        matches!(self, ParserError::MissingColumns { .. })
    }
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}
