//! JSON loading for record stores
//!
//! Accepts a top-level array of flat objects, the shape produced by most
//! spreadsheet-to-JSON exporters. Column order follows first appearance.

use super::{RecordStore, Value};
use crate::error::AppError;
use serde_json::Value as JsonValue;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

impl RecordStore {
    /// Parse a store from JSON text
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let parsed: JsonValue = serde_json::from_str(json)?;

        let JsonValue::Array(items) = parsed else {
            return Err(AppError::DataLoad(
                "expected a top-level JSON array of records".to_string(),
            ));
        };

        let mut rows = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match item {
                JsonValue::Object(map) => {
                    rows.push(map.into_iter().map(|(k, v)| (k, json_to_value(v))));
                }
                other => {
                    return Err(AppError::DataLoad(format!(
                        "record {} is not an object: {}",
                        i, other
                    )));
                }
            }
        }

        let store = RecordStore::from_pairs(rows);
        debug!(
            "Parsed {} records across {} columns",
            store.len(),
            store.schema().columns().len()
        );
        Ok(store)
    }

    /// Load a store from a JSON file on disk
    pub fn load_json_file(path: &Path) -> Result<Self, AppError> {
        let data = fs::read_to_string(path)?;
        let store = Self::from_json_str(&data)?;
        info!("Loaded {} records from {}", store.len(), path.display());
        Ok(store)
    }
}

fn json_to_value(value: JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Empty,
        JsonValue::String(s) => Value::from(s),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Empty),
        JsonValue::Bool(b) => Value::Text(b.to_string()),
        nested => Value::Text(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::Field;
    use std::io::Write;

    #[test]
    fn test_load_array_of_objects() {
        let json = r#"[
            {"Contrat": "001-NVM-173", "Code_Unite": "NVM", "Statut_Final": "KO", "Montant": 1200},
            {"Contrat": "002-ABC-999", "Code_Unite": null, "Statut_Final": "OK"}
        ]"#;
        let store = RecordStore::from_json_str(json).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(
            store.schema().columns(),
            &["Contrat", "Code_Unite", "Statut_Final", "Montant"]
        );
        let first = store.record(0).unwrap();
        assert_eq!(first.column("Montant"), Some(&Value::Number(1200.0)));
        let second = store.record(1).unwrap();
        assert_eq!(second.get(Field::Agency), Some(&Value::Empty));
        assert_eq!(second.column("Montant"), Some(&Value::Empty));
    }

    #[test]
    fn test_rejects_non_array() {
        let err = RecordStore::from_json_str(r#"{"Contrat": "x"}"#).unwrap_err();
        assert!(matches!(err, AppError::DataLoad(_)));
    }

    #[test]
    fn test_rejects_scalar_rows() {
        let err = RecordStore::from_json_str(r#"[{"Contrat": "x"}, 42]"#).unwrap_err();
        assert!(err.to_string().contains("record 1"));
    }

    #[test]
    fn test_invalid_json() {
        let err = RecordStore::from_json_str("[{").unwrap_err();
        assert_eq!(err.error_code(), "data_load_failed");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"Contrat": "001", "Date_Integration": "2024-09-15"}}]"#
        )
        .unwrap();

        let store = RecordStore::load_json_file(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.record(0).unwrap().integration_date().is_some());
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = RecordStore::load_json_file(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
