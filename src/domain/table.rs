// Inventory table domain model
use serde::Serialize;
use std::fmt;

/// A single cell. Serializes as a bare JSON string, number or null.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Missing,
}

impl Value {
    /// Numeric reading of the cell. Text cells that parse as a number count,
    /// so one stray value does not hide the rest of a mixed column.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(s) => parse_number(s),
            Value::Missing => None,
        }
    }

    /// Text form used for category matching; `None` for missing cells.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Missing => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Number(n) => write!(f, "{}", n),
            Value::Missing => Ok(()),
        }
    }
}

/// Ordered records stored positionally against the header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from raw text cells, inferring numeric columns.
    ///
    /// A column is numeric when every non-empty cell parses as `f64`.
    /// Empty cells become `Value::Missing` in every column. Rows shorter
    /// than the header are padded with missing cells.
    pub fn from_raw(columns: Vec<String>, raw_rows: Vec<Vec<String>>) -> Self {
        Self::from_raw_with_text(columns, raw_rows, &[])
    }

    /// Like `from_raw`, but `text_columns` are never inferred as numeric
    /// and keep their source text exactly (`"1.10"` stays `"1.10"`).
    pub fn from_raw_with_text(
        columns: Vec<String>,
        raw_rows: Vec<Vec<String>>,
        text_columns: &[&str],
    ) -> Self {
        let width = columns.len();
        let numeric: Vec<bool> = (0..width)
            .map(|idx| {
                !text_columns.contains(&columns[idx].as_str())
                    && raw_rows.iter().all(|row| match row.get(idx) {
                    Some(cell) if !cell.is_empty() => parse_number(cell).is_some(),
                    _ => true,
                })
            })
            .collect();

        let rows = raw_rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                (0..width)
                    .map(|idx| match cells.next() {
                        Some(cell) if cell.is_empty() => Value::Missing,
                        Some(cell) if numeric[idx] => {
                            parse_number(&cell).map(Value::Number).unwrap_or(Value::Missing)
                        }
                        Some(cell) => Value::Text(cell),
                        None => Value::Missing,
                    })
                    .collect()
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

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cells of one column in row order, `None` if the column is absent.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Sub-table restricted to `names`, in the given order.
    /// Names that are not columns of this table are skipped.
    pub fn select(&self, names: &[&str]) -> Table {
        let indices: Vec<usize> = names.iter().filter_map(|n| self.column_index(n)).collect();
        Table {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        }
    }

    /// Rows for which `keep` returns true, with the same columns.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&[Value]) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|n| n.is_finite())
}
