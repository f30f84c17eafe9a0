use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("unsupported file type '{0}': upload a .csv, .xlsx or .xls file")]
    UnsupportedExtension(String),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet parse error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook has no worksheets")]
    NoWorksheet,

    #[error("file contains no rows")]
    Empty,

    /// The header row names other columns but not this required one.
    #[error("header row has no '{0}' column")]
    MissingColumn(&'static str),
}
