//! Result sets and cell values returned by the MySQL session.

use std::time::Duration;

/// Represents the result of executing a SQL statement.
///
/// A statement either produced a result set, possibly with no rows, or it
/// was a command such as `USE shop`. `has_result_set` tells the two apart;
/// an empty result set may still have unknown columns when the server could
/// not describe them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResult {
    /// Column metadata, in projection order.
    pub columns: Vec<ColumnInfo>,

    pub rows: Vec<Row>,

    /// Time taken to execute the statement.
    pub execution_time: Duration,

    /// Number of rows in the result.
    pub row_count: usize,

    /// Rows affected as reported by the server.
    pub rows_affected: u64,

    /// False for commands.
    pub has_result_set: bool,
}

impl QueryResult {
    /// Creates a result for a statement that produced no result set.
    pub fn command(rows_affected: u64) -> Self {
        Self {
            rows_affected,
            ..Self::default()
        }
    }

    /// Creates a result set; `row_count` follows `rows`.
    pub fn with_data(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        let row_count = rows.len();
        Self {
            columns,
            rows,
            execution_time: Duration::ZERO,
            row_count,
            rows_affected: 0,
            has_result_set: true,
        }
    }

    pub fn with_execution_time(mut self, duration: Duration) -> Self {
        self.execution_time = duration;
        self
    }

    /// Returns true if the statement produced no result set at all.
    pub fn is_command(&self) -> bool {
        !self.has_result_set
    }

    /// Returns true if the result set has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the column names in projection order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Name and driver type name of one result column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,

    /// Column data type, as named by the driver.
    pub data_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
        }
    }
}

/// Cells of one row, in column order.
pub type Row = Vec<Value>;

/// One cell, decoded from the server's text representation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// SQL `NULL`.
    #[default]
    Null,

    /// Signed integer.
    Int(i64),

    /// Unsigned integer (`BIGINT UNSIGNED` does not fit in i64).
    UInt(u64),

    /// `FLOAT` or `DOUBLE`.
    Float(f64),

    /// Fixed-point number, kept as the server's text to avoid rounding.
    Decimal(String),

    /// Character data.
    String(String),

    /// Binary data, or text that is not valid UTF-8.
    Bytes(Vec<u8>),

    /// Date, time, datetime or timestamp, as formatted by the server.
    Temporal(String),
}

impl Value {
    /// Returns true for values that render right-aligned.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Value::Int(_) | Value::UInt(_) | Value::Float(_) | Value::Decimal(_)
        )
    }

    /// Converts the value to its display form.
    pub fn to_display_string(&self) -> String {
        match self {
            Value::Null => "NULL".to_string(),
            Value::Int(i) => i.to_string(),
            Value::UInt(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Decimal(d) => d.clone(),
            Value::String(s) => s.clone(),
            Value::Bytes(b) => match std::str::from_utf8(b) {
                Ok(text) => text.to_string(),
                Err(_) => format!("<{} bytes>", b.len()),
            },
            Value::Temporal(t) => t.clone(),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Value::UInt(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}
