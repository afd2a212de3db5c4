//! Import and export error types for CSV intake and report downloads

use thiserror::Error;

use super::core_error::CoreError;

#[derive(Error, Debug)]
pub enum ImportExportError {
    /// Import operation failed
    #[error("Import failed: {0}")]
    ImportFailed(String),

    /// Export operation failed
    #[error("Export failed: {0}")]
    ExportFailed(String),

    /// Header row lacks a mandatory column
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// File has no data rows
    #[error("File is empty")]
    EmptyFile,

    /// CSV parsing/writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Output was not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImportExportError> for CoreError {
    fn from(err: ImportExportError) -> Self {
        match err {
            ImportExportError::MissingColumn(_)
            | ImportExportError::EmptyFile
            | ImportExportError::ImportFailed(_)
            | ImportExportError::CsvError(_) => CoreError::validation(err.to_string()),
            _ => CoreError::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CoreErrorKind;

    #[test]
    fn test_missing_column_is_validation() {
        let err = ImportExportError::MissingColumn("email".to_string());
        assert_eq!(err.to_string(), "Missing required column: email");
        assert_eq!(CoreError::from(err).kind(), CoreErrorKind::Validation);
    }
}
