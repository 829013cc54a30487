use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Connection level configuration passed to [`super::connect`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Maximum number of retries for failed HTTP exchanges. Defaults to 3.
    pub max_retries: Option<u32>,
    /// Switches the connection to autocommit mode when set.
    pub autocommit: Option<bool>,
    /// Switches the connection to readonly mode when set.
    pub readonly: Option<bool>,
    /// Connection properties sent to the server when the connection is opened
    /// (`user`, `password`, ...).
    pub info: HashMap<String, String>,
}

impl ConnectOptions {
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    pub fn autocommit(mut self, autocommit: bool) -> Self {
        self.autocommit = Some(autocommit);
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = Some(readonly);
        self
    }

    pub fn info(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }
}

/// Describes how to add columns that a statement references but the table lacks.
///
/// ```json
/// {
///     "table": "MY_TABLE",
///     "columns": {
///         "C1": "BIGINT",
///         "C2": "VARCHAR"
///     }
/// }
/// ```
///
/// A column is removed from `columns` once it has been added, so the same column is never
/// added twice by one execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub table: String,
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
}

impl ColumnHint {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Adds a column name with its type declaration (e.g. `VARCHAR`, `ARRAY[BIGINT]`).
    pub fn with_column(mut self, name: impl Into<String>, declaration: impl Into<String>) -> Self {
        self.columns.insert(name.into(), declaration.into());
        self
    }

    /// Returns the `ALTER TABLE` statement that adds `column`, if the hint can fix it.
    ///
    /// `None` when the table name is empty, or when `column` has no non-empty declaration.
    pub fn alter_statement(&self, column: &str) -> Option<String> {
        if self.table.is_empty() {
            return None;
        }

        let declaration = self
            .columns
            .get(column)
            .filter(|declaration| !declaration.is_empty())?;

        Some(format!(
            "ALTER TABLE {} ADD {} {}",
            self.table, column, declaration
        ))
    }
}

/// Outcome of one statement execution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecuteOutcome {
    /// Number of affected rows for DML and DDL, `None` for queries.
    pub update_count: Option<u64>,
    /// Column labels of the result set.
    pub columns: Vec<String>,
    /// Rows of the first frame.
    pub rows: Vec<Vec<serde_json::Value>>,
    /// Whether the first frame holds the whole result set.
    pub done: bool,
}
