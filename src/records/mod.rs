//! In-memory record store
//!
//! A store is built once per loaded file and never mutated afterwards.
//! Everything the search core needs repeatedly (field positions, distinct
//! agency codes, coerced integration dates) is resolved at build time.

pub mod date;
mod load;

pub use date::try_parse_date;

use crate::error::AppError;
use chrono::NaiveDate;
use chrono::NaiveDateTime;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

/// A single cell value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Number(f64),
    /// Native date cell; JSON carries dates as text, so only stores built
    /// through `RecordStore::new` or `from_pairs` hold these
    Date(NaiveDateTime),
    Empty,
}

impl Value {
    /// String representation used for matching and display
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s.as_str()),
            Value::Empty => Cow::Borrowed(""),
            other => Cow::Owned(other.to_string()),
        }
    }

    /// True for empty cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Text(s) => s.trim().is_empty(),
            Value::Empty => true,
            Value::Number(_) | Value::Date(_) => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Number(n) if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Value::Empty => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Value::Empty
        } else {
            Value::Text(s.to_string())
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Value::Empty
        } else {
            Value::Text(s)
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Date(dt)
    }
}

/// Fields the search core understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Contract,
    Agency,
    Status,
    IntegrationDate,
    Phase,
    ContractType,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Contract,
        Field::Agency,
        Field::Status,
        Field::IntegrationDate,
        Field::Phase,
        Field::ContractType,
    ];

    /// Column header carrying this field in uploaded sheets
    pub fn column_name(self) -> &'static str {
        match self {
            Field::Contract => "Contrat",
            Field::Agency => "Code_Unite",
            Field::Status => "Statut_Final",
            Field::IntegrationDate => "Date_Integration",
            Field::Phase => "Initial/Avenant",
            Field::ContractType => "Type (libellé)",
        }
    }

    fn slot(self) -> usize {
        match self {
            Field::Contract => 0,
            Field::Agency => 1,
            Field::Status => 2,
            Field::IntegrationDate => 3,
            Field::Phase => 4,
            Field::ContractType => 5,
        }
    }
}

/// Column layout of a store, with known fields resolved to positions
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<String>,
    known: [Option<usize>; 6],
}

impl Schema {
    pub fn new(columns: Vec<String>) -> Self {
        let mut known = [None; 6];
        for field in Field::ALL {
            known[field.slot()] = columns.iter().position(|c| c == field.column_name());
        }
        Self { columns, known }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn index_of(&self, field: Field) -> Option<usize> {
        self.known[field.slot()]
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.index_of(field).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Immutable table of records
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    schema: Schema,
    rows: Vec<Vec<Value>>,
    integration_dates: Vec<Option<NaiveDate>>,
    agencies: Vec<String>,
    contract_types: Vec<String>,
    contracts: Vec<String>,
}

impl RecordStore {
    /// Build a store from a column list and row-major values
    ///
    /// Short rows are padded with empty cells; rows longer than the header
    /// are rejected.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, AppError> {
        let width = columns.len();
        let mut padded = Vec::with_capacity(rows.len());

        for (i, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(AppError::DataLoad(format!(
                    "row {} has {} values but only {} columns",
                    i,
                    row.len(),
                    width
                )));
            }
            row.resize(width, Value::Empty);
            padded.push(row);
        }

        let schema = Schema::new(columns);
        let integration_dates = match schema.index_of(Field::IntegrationDate) {
            Some(idx) => padded.iter().map(|row| try_parse_date(&row[idx])).collect(),
            None => vec![None; padded.len()],
        };
        let agencies = distinct_column(&schema, &padded, Field::Agency);
        let contract_types = distinct_column(&schema, &padded, Field::ContractType);
        let contracts = distinct_column(&schema, &padded, Field::Contract);

        Ok(Self {
            schema,
            rows: padded,
            integration_dates,
            agencies,
            contract_types,
            contracts,
        })
    }

    /// Build a store from rows of `(column, value)` pairs
    ///
    /// Columns are ordered by first appearance; a column missing from a row
    /// is an empty cell.
    pub fn from_pairs<R, K, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut columns: Vec<String> = Vec::new();
        let mut table: Vec<Vec<Value>> = Vec::new();

        for pairs in rows {
            let mut row: Vec<Value> = vec![Value::Empty; columns.len()];
            for (key, value) in pairs {
                let key = key.into();
                let idx = match columns.iter().position(|c| *c == key) {
                    Some(idx) => idx,
                    None => {
                        columns.push(key);
                        columns.len() - 1
                    }
                };
                if row.len() <= idx {
                    row.resize(idx + 1, Value::Empty);
                }
                row[idx] = value.into();
            }
            table.push(row);
        }

        // Every row is at most as wide as the final header, so this cannot fail
        Self::new(columns, table).unwrap_or_default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn has_field(&self, field: Field) -> bool {
        self.schema.has_field(field)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Record at `index`, if in range
    pub fn record(&self, index: usize) -> Option<RecordRef<'_>> {
        (index < self.rows.len()).then_some(RecordRef { store: self, index })
    }

    pub fn iter(&self) -> impl Iterator<Item = RecordRef<'_>> + '_ {
        (0..self.rows.len()).map(move |index| RecordRef { store: self, index })
    }

    /// Distinct non-blank agency codes in first-seen order
    pub fn agencies(&self) -> &[String] {
        &self.agencies
    }

    /// Distinct non-blank contract type labels in first-seen order
    pub fn contract_types(&self) -> &[String] {
        &self.contract_types
    }

    /// Distinct non-blank contract identifiers in first-seen order
    pub fn contracts(&self) -> &[String] {
        &self.contracts
    }
}

fn distinct_column(schema: &Schema, rows: &[Vec<Value>], field: Field) -> Vec<String> {
    let Some(idx) = schema.index_of(field) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for row in rows {
        let value = &row[idx];
        if value.is_blank() {
            continue;
        }
        let text = value.to_string();
        if seen.insert(text.clone()) {
            out.push(text);
        }
    }
    out
}

/// Borrowed view of one record
#[derive(Debug, Clone, Copy)]
pub struct RecordRef<'a> {
    store: &'a RecordStore,
    index: usize,
}

impl<'a> RecordRef<'a> {
    /// Store the record belongs to
    pub fn store(&self) -> &'a RecordStore {
        self.store
    }

    /// Position of the record in the store (its original order)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &'a [Value] {
        &self.store.rows[self.index]
    }

    pub fn get(&self, field: Field) -> Option<&'a Value> {
        let idx = self.store.schema.index_of(field)?;
        Some(&self.store.rows[self.index][idx])
    }

    pub fn text(&self, field: Field) -> Option<Cow<'a, str>> {
        self.get(field).map(Value::as_text)
    }

    pub fn column(&self, name: &str) -> Option<&'a Value> {
        let idx = self.store.schema.column_index(name)?;
        Some(&self.store.rows[self.index][idx])
    }

    /// Integration date coerced at load time
    pub fn integration_date(&self) -> Option<NaiveDate> {
        self.store.integration_dates[self.index]
    }

    /// Whether the final status is the success marker `OK`
    pub fn is_success(&self) -> Option<bool> {
        self.text(Field::Status).map(|s| is_success_status(&s))
    }
}

/// `OK`, compared case-insensitively, is the only success status
pub fn is_success_status(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("OK")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn sample_store() -> RecordStore {
        RecordStore::from_pairs(vec![
            vec![
                ("Contrat", "001-NVM-173"),
                ("Code_Unite", "NVM"),
                ("Statut_Final", "KO"),
                ("Date_Integration", "2024-09-15"),
            ],
            vec![
                ("Contrat", "002-ABC-999"),
                ("Code_Unite", "ABC"),
                ("Statut_Final", "ok"),
                ("Date_Integration", "n/a"),
            ],
            vec![
                ("Contrat", "003-NVM-001"),
                ("Code_Unite", "NVM"),
                ("Statut_Final", ""),
            ],
        ])
    }

    #[test]
    fn test_schema_resolution() {
        let store = sample_store();
        assert!(store.has_field(Field::Contract));
        assert!(store.has_field(Field::IntegrationDate));
        assert!(!store.has_field(Field::Phase));
        assert!(!store.has_field(Field::ContractType));
        assert_eq!(store.schema().columns().len(), 4);
    }

    #[test]
    fn test_missing_column_becomes_empty() {
        let store = sample_store();
        let third = store.record(2).unwrap();
        assert_eq!(third.get(Field::IntegrationDate), Some(&Value::Empty));
        assert!(third.integration_date().is_none());
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        let store = sample_store();
        assert_eq!(store.agencies(), &["NVM".to_string(), "ABC".to_string()]);
        assert_eq!(store.contracts().len(), 3);
        assert!(store.contract_types().is_empty());
    }

    #[test]
    fn test_integration_dates_precomputed() {
        let store = sample_store();
        assert_eq!(store.record(0).unwrap().integration_date().unwrap().month(), 9);
        assert!(store.record(1).unwrap().integration_date().is_none());
    }

    #[test]
    fn test_success_status() {
        let store = sample_store();
        assert_eq!(store.record(0).unwrap().is_success(), Some(false));
        assert_eq!(store.record(1).unwrap().is_success(), Some(true));
        assert_eq!(store.record(2).unwrap().is_success(), Some(false));
    }

    #[test]
    fn test_rejects_wide_rows() {
        let err = RecordStore::new(
            vec!["Contrat".to_string()],
            vec![vec![Value::from("a"), Value::from("b")]],
        )
        .unwrap_err();
        assert!(matches!(err, AppError::DataLoad(_)));
    }

    #[test]
    fn test_native_date_cells() {
        let dt = NaiveDate::from_ymd_opt(2024, 12, 3)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let store = RecordStore::from_pairs(vec![vec![
            ("Contrat", Value::from("001-NVM-173")),
            ("Date_Integration", Value::from(dt)),
        ]]);
        let record = store.record(0).unwrap();
        assert_eq!(record.integration_date().unwrap().month(), 12);
        assert_eq!(
            record.text(Field::IntegrationDate).unwrap(),
            "2024-12-03 09:30:00"
        );
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(173.0).to_string(), "173");
        assert_eq!(Value::Number(1.5).to_string(), "1.5");
        assert_eq!(Value::Empty.to_string(), "");
        assert_eq!(Value::from("").as_text(), "");
        assert!(Value::Text("  ".to_string()).is_blank());
    }
}
