//! Tabular results returned by the external store.

use std::collections::BTreeSet;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// A materialised query result.
///
/// Values are kept as the store reports them (text or null). Column lookups
/// are case-insensitive because unquoted identifiers come back upper-cased
/// while some statements (e.g. `LIST`) return lower-case column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// A table with no columns and no rows.
    ///
    /// This is also the shape every failed fetch collapses into.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table, padding or truncating rows to the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Column names in store order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, matched case-insensitively.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
    }

    /// Value of `column` in row `row`, if both exist and the cell is not null.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)?.as_deref()
    }

    /// Iterate rows in store order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |values| Row {
            table: self,
            values,
        })
    }

    /// All values of one column (nulls included). Empty if the column is absent.
    pub fn column_values(&self, column: &str) -> Vec<Option<&str>> {
        match self.column_index(column) {
            Some(idx) => self.rows.iter().map(|r| r[idx].as_deref()).collect(),
            None => Vec::new(),
        }
    }

    /// Distinct non-null values of one column, sorted.
    pub fn unique_sorted(&self, column: &str) -> Vec<String> {
        self.column_values(column)
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// First `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Stack `other` below `self`.
    ///
    /// Columns are the union of both tables in first-seen order (matched
    /// case-insensitively); cells missing on either side are null.
    pub fn concat(&self, other: &Table) -> Table {
        let mut columns = self.columns.clone();
        for c in &other.columns {
            if !columns.iter().any(|e| e.eq_ignore_ascii_case(c)) {
                columns.push(c.clone());
            }
        }

        let mut rows = Vec::with_capacity(self.len() + other.len());
        for source in [self, other] {
            let mapping: Vec<Option<usize>> =
                columns.iter().map(|c| source.column_index(c)).collect();
            for row in &source.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|idx| idx.and_then(|i| row[i].clone()))
                        .collect(),
                );
            }
        }

        Self { columns, rows }
    }

    /// Append rows from a further result partition with the same columns.
    pub(crate) fn extend_rows(&mut self, rows: Vec<Vec<Option<String>>>) {
        let width = self.columns.len();
        self.rows.extend(rows.into_iter().map(|mut row| {
            row.resize(width, None);
            row
        }));
    }
}

/// Borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    values: &'a [Option<String>],
}

impl<'a> Row<'a> {
    /// Value of `column` in this row, if the column exists and is not null.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.table.column_index(column)?;
        self.values.get(idx)?.as_deref()
    }
}

/// Serialised as an array of `{column: value}` objects.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in self.rows() {
            seq.serialize_element(&RowObject(row))?;
        }
        seq.end()
    }
}

struct RowObject<'a>(Row<'a>);

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let columns = self.0.table.columns();
        let mut map = serializer.serialize_map(Some(columns.len()))?;
        for (name, value) in columns.iter().zip(self.0.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
