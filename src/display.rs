use crate::table::{ColumnKind, RecordTable};
use prettytable::{format, Cell, Row, Table};

/// Box-drawn view of a table for the terminal.
pub fn render_table(table: &RecordTable) -> Table {
    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.set_titles(Row::new(
        table
            .columns()
            .iter()
            .map(|c| Cell::new(c).style_spec("bFg"))
            .collect(),
    ));
    for row in table.rows() {
        out.add_row(Row::new(
            row.iter()
                .map(|v| {
                    let cell = Cell::new(&v.to_string());
                    if v.as_f64().is_some() {
                        cell.style_spec("r")
                    } else {
                        cell
                    }
                })
                .collect(),
        ));
    }
    out
}

/// Column name / inferred kind listing for `describe`.
pub fn render_kinds(kinds: &[(String, ColumnKind)]) -> Table {
    let mut out = Table::new();
    out.set_format(*format::consts::FORMAT_BOX_CHARS);
    out.set_titles(Row::new(vec![
        Cell::new("Column").style_spec("bFg"),
        Cell::new("Kind").style_spec("bFg"),
    ]));
    for (name, kind) in kinds {
        out.add_row(Row::new(vec![Cell::new(name), Cell::new(kind.as_str())]));
    }
    out
}
