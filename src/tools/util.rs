//! Utility functions for tools

use crate::error::AppError;
use crate::records::RecordStore;
use std::path::Path;

/// Load the record store named by `--data`
pub fn load_store(data: Option<&Path>) -> Result<RecordStore, AppError> {
    let path = data.ok_or_else(|| {
        AppError::InvalidInput("No data file specified. Use --data <file.json>".to_string())
    })?;

    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "data file {} does not exist",
            path.display()
        )));
    }

    RecordStore::load_json_file(path)
}

/// Make a value safe to place inside a markdown table cell
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\n', '\r'], " ")
}

/// Format a percentage with one decimal
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell("a|b"), "a\\|b");
        assert_eq!(escape_cell("line1\nline2"), "line1 line2");
    }

    #[test]
    fn test_missing_data_argument() {
        let err = load_store(None).unwrap_err();
        assert_eq!(err.error_code(), "invalid_input");
    }

    #[test]
    fn test_missing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_store(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert_eq!(err.error_code(), "not_found");
        assert!(err.message().contains("absent.json"));
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(66.66), "66.7%");
        assert_eq!(percent(100.0), "100.0%");
    }
}
