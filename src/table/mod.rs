pub mod date_parser;
pub mod schema;
pub mod value;

pub use schema::{column_kinds, ColumnKind};
pub use value::Value;

use tracing::debug;

/// One row to append: ordered `(column, value)` pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter. A repeated column overwrites the earlier value.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(c, _)| *c == column) {
            Some((_, v)) => *v = value,
            None => self.fields.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.iter().find(|(c, _)| c == column).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// In-memory table: named, ordered columns and rows aligned to them.
///
/// Every row has exactly `columns.len()` cells; missing cells are [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty table with a fixed column set.
    pub fn with_columns<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Build from raw parts; short rows are padded with `Null`, long rows truncated.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by row index and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(idx))
    }

    /// Row `i` as a [`Record`] carrying every column.
    pub fn record(&self, i: usize) -> Option<Record> {
        let row = self.rows.get(i)?;
        Some(Record {
            fields: self.columns.iter().cloned().zip(row.iter().cloned()).collect(),
        })
    }

    /// Append one record at the end, in memory only.
    ///
    /// Unknown columns are added after the existing ones (earlier rows get `Null`);
    /// columns the record omits get `Null`.
    pub fn append(&mut self, record: Record) {
        for (name, _) in &record.fields {
            if self.column_index(name).is_none() {
                debug!(column = %name, "append: adding new column");
                self.columns.push(name.clone());
                for row in &mut self.rows {
                    row.push(Value::Null);
                }
            }
        }

        let mut row = vec![Value::Null; self.columns.len()];
        for (name, value) in record.fields {
            if let Some(idx) = self.column_index(&name) {
                row[idx] = value;
            }
        }
        self.rows.push(row);
    }

    /// Explicitly parse string cells of `column` as dates.
    /// Returns how many cells were converted; unknown columns convert nothing.
    pub fn parse_dates(&mut self, column: &str) -> usize {
        let Some(idx) = self.column_index(column) else {
            return 0;
        };
        let mut converted = 0;
        for row in &mut self.rows {
            let parsed = row[idx].as_str().and_then(date_parser::parse_date);
            if let Some(d) = parsed {
                row[idx] = Value::Date(d);
                converted += 1;
            }
        }
        converted
    }

    /// JSON array of row objects, used by `--json` output.
    pub fn to_json(&self) -> serde_json::Value {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let obj: serde_json::Map<String, serde_json::Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Value::to_json))
                    .collect();
                serde_json::Value::Object(obj)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn append_to_empty_table_adopts_record_order() {
        let mut t = RecordTable::new();
        t.append(Record::new().with("b", 1).with("a", "x"));
        assert_eq!(t.columns(), ["b", "a"]);
        assert_eq!(t.rows(), [vec![Value::Int(1), Value::Str("x".into())]]);
    }

    #[test]
    fn append_widens_and_pads() {
        let mut t = RecordTable::with_columns(["a", "b"]);
        t.append(Record::new().with("a", 1).with("b", 2));
        t.append(Record::new().with("c", "new").with("a", 3));

        assert_eq!(t.columns(), ["a", "b", "c"]);
        assert_eq!(t.rows()[0], vec![Value::Int(1), Value::Int(2), Value::Null]);
        assert_eq!(
            t.rows()[1],
            vec![Value::Int(3), Value::Null, Value::Str("new".into())]
        );
    }

    #[test]
    fn record_set_overwrites_repeated_column() {
        let r = Record::new().with("a", 1).with("a", 2);
        assert_eq!(r.fields().len(), 1);
        assert_eq!(r.get("a"), Some(&Value::Int(2)));
    }

    #[test]
    fn record_view_matches_row() {
        let mut t = RecordTable::new();
        let rec = Record::new().with("x", 1.5).with("y", "z");
        t.append(rec.clone());
        assert_eq!(t.record(0), Some(rec));
        assert_eq!(t.record(1), None);
        assert_eq!(t.get(0, "y"), Some(&Value::Str("z".into())));
    }

    #[test]
    fn parse_dates_converts_only_matching_cells() {
        let mut t = RecordTable::new();
        t.append(Record::new().with("Due Date", "2024-05-01"));
        t.append(Record::new().with("Due Date", "soon"));
        t.append(Record::new().with("Due Date", Value::Null));

        assert_eq!(t.parse_dates("Due Date"), 1);
        assert_eq!(
            t.get(0, "Due Date"),
            Some(&Value::Date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()))
        );
        assert_eq!(t.get(1, "Due Date"), Some(&Value::Str("soon".into())));
        assert_eq!(t.parse_dates("missing"), 0);
    }

    #[test]
    fn from_parts_normalises_row_width() {
        let t = RecordTable::from_parts(
            vec!["a".into(), "b".into()],
            vec![vec![Value::Int(1)], vec![Value::Int(1), Value::Int(2), Value::Int(3)]],
        );
        assert_eq!(t.rows()[0], vec![Value::Int(1), Value::Null]);
        assert_eq!(t.rows()[1], vec![Value::Int(1), Value::Int(2)]);
    }
}
