use super::{RecordTable, Value};
use std::fmt;
use tracing::debug;

/// Summary of the kinds of value found in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Only `Null` cells (or no rows).
    Empty,
    Int,
    Float,
    Date,
    Str,
    /// Non-null cells disagree on kind.
    Mixed,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Empty => "empty",
            ColumnKind::Int => "int",
            ColumnKind::Float => "float",
            ColumnKind::Date => "date",
            ColumnKind::Str => "str",
            ColumnKind::Mixed => "mixed",
        }
    }

    fn of(value: &Value) -> Self {
        match value {
            Value::Null => ColumnKind::Empty,
            Value::Int(_) => ColumnKind::Int,
            Value::Float(_) => ColumnKind::Float,
            Value::Date(_) => ColumnKind::Date,
            Value::Str(_) => ColumnKind::Str,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// For each column:
///  - Ignore null cells
///  - The first non-null cell sets the kind
///  - Any later disagreement marks the column `Mixed`
pub fn column_kinds(table: &RecordTable) -> Vec<(String, ColumnKind)> {
    table
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let mut kind = ColumnKind::Empty;
            for row in table.rows() {
                let cell = ColumnKind::of(&row[idx]);
                match (kind, cell) {
                    (_, ColumnKind::Empty) => {}
                    (ColumnKind::Empty, c) => kind = c,
                    (k, c) if k != c => {
                        debug!(column = %name, first = %k, other = %c, "column kinds disagree");
                        kind = ColumnKind::Mixed;
                        break;
                    }
                    _ => {}
                }
            }
            (name.clone(), kind)
        })
        .collect()
}
