//! # Self-Healing Cursor
//!
//! [`SelfHealingCursor`] wraps a [`StatementExecutor`] and repairs one kind of failure: a
//! statement referencing a column that the table does not have (yet).
//!
//! ## How it works
//!
//! 1. Execute the statement.
//! 2. On failure, [`classify`] the error. Only a statement error whose message matches
//!    `Undefined column. columnName=<NAME>` is recoverable.
//! 3. Look `<NAME>` up in the caller's [`ColumnHint`] and run
//!    `ALTER TABLE <table> ADD <NAME> <declaration>`.
//! 4. Remove `<NAME>` from the hint and go back to 1.
//!
//! Every non-recoverable path hands back the original error value untouched. Because each
//! correction removes one column from the hint, the loop runs at most `columns + 1` times.
//!
//! ## Caveat
//!
//! Classification relies on the exact wording of Phoenix' `ColumnNotFoundException`. If the
//! server words it differently nothing is recognised and every error is returned as is.
use super::{ColumnHint, ExecuteOutcome, StatementExecutor};
use crate::error::Error;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info};

static UNDEFINED_COLUMN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Undefined column. columnName=(.+)").expect("valid undefined column regex")
});

/// A recoverable failure recognised by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The statement references a column the table does not have.
    UndefinedColumn { column: String },
}

/// Classifies a failed execution.
///
/// Returns `None` for anything but a statement error reporting an undefined column.
pub fn classify(error: &Error) -> Option<Failure> {
    let statement_error = error.as_statement_error()?;
    let captures = UNDEFINED_COLUMN.captures(&statement_error.message)?;

    Some(Failure::UndefinedColumn {
        column: captures[1].to_string(),
    })
}

/// Cursor that adds missing columns described by a [`ColumnHint`] and retries.
pub struct SelfHealingCursor<E> {
    inner: E,
}

impl<E> SelfHealingCursor<E>
where
    E: StatementExecutor,
{
    pub fn new(inner: E) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut E {
        &mut self.inner
    }

    pub fn into_inner(self) -> E {
        self.inner
    }

    /// Executes `operation`, adding the columns it misses when `hint` describes them.
    ///
    /// # Arguments
    ///
    /// * `operation` - The statement.
    /// * `parameters` - Values bound to the statement's placeholders.
    /// * `hint` - How to add missing columns. Every column added is **removed from the hint**.
    ///
    /// # Returns
    ///
    /// * `Ok(outcome)` - The statement succeeded, possibly after adding columns.
    /// * `Err(error)` - The original error of the statement when it cannot be repaired, or the
    ///   error of a failed `ALTER TABLE`.
    pub async fn execute(
        &mut self,
        operation: &str,
        parameters: Option<&[Value]>,
        mut hint: Option<&mut ColumnHint>,
    ) -> Result<ExecuteOutcome, Error> {
        loop {
            let error = match self.inner.execute(operation, parameters).await {
                Ok(outcome) => return Ok(outcome),
                Err(error) => error,
            };

            let Some(hint) = hint.as_deref_mut() else {
                return Err(error);
            };

            let Some(Failure::UndefinedColumn { column }) = classify(&error) else {
                return Err(error);
            };

            let Some(alter) = hint.alter_statement(&column) else {
                debug!(%column, table = %hint.table, "hint cannot add the undefined column");
                return Err(error);
            };

            info!(%column, table = %hint.table, "adding undefined column");
            self.inner.execute(&alter, None).await?;

            hint.columns.remove(&column);
        }
    }

    pub async fn close(&mut self) -> Result<(), Error> {
        self.inner.close().await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::{DatabaseError, InterfaceError};

    fn statement_error(message: &str) -> Error {
        DatabaseError::new(message, Some(504), Some("42703".to_string())).into()
    }

    /// Executor whose table never gains the column: every statement but `ALTER TABLE` fails.
    #[derive(Default)]
    struct ColumnNeverAppears {
        executed: Vec<String>,
    }

    impl StatementExecutor for ColumnNeverAppears {
        async fn execute(
            &mut self,
            operation: &str,
            _parameters: Option<&[Value]>,
        ) -> Result<ExecuteOutcome, Error> {
            self.executed.push(operation.to_string());
            if operation.starts_with("ALTER TABLE") {
                return Ok(ExecuteOutcome::default());
            }
            Err(statement_error("Undefined column. columnName=FOO"))
        }

        async fn close(&mut self) -> Result<(), Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn consumed_columns_are_not_added_twice() {
        let mut cursor = SelfHealingCursor::new(ColumnNeverAppears::default());
        let mut hint = ColumnHint::new("T").with_column("FOO", "BIGINT");

        let err = cursor
            .execute("UPSERT INTO T (FOO) VALUES (1)", None, Some(&mut hint))
            .await
            .unwrap_err();

        assert_eq!(
            cursor.inner().executed,
            vec![
                "UPSERT INTO T (FOO) VALUES (1)",
                "ALTER TABLE T ADD FOO BIGINT",
                "UPSERT INTO T (FOO) VALUES (1)",
            ]
        );
        assert!(hint.columns.is_empty());

        let Error::Database(db) = &err else {
            panic!("Expected the statement error, got {err:?}");
        };
        assert_eq!(db.code, Some(504));
        assert_eq!(db.message, "Undefined column. columnName=FOO");
    }

    #[test]
    fn undefined_column_is_classified() {
        assert_eq!(
            classify(&statement_error("Undefined column. columnName=FOO")),
            Some(Failure::UndefinedColumn {
                column: "FOO".to_string()
            })
        );
    }

    #[test]
    fn column_name_stops_at_line_end() {
        assert_eq!(
            classify(&statement_error(
                "ERROR 504 (42703): Undefined column. columnName=T.FOO\n\tat org.apache.phoenix"
            )),
            Some(Failure::UndefinedColumn {
                column: "T.FOO".to_string()
            })
        );
    }

    #[test]
    fn other_errors_are_not_classified() {
        assert_eq!(classify(&statement_error("Syntax error.")), None);

        let data_error = DatabaseError::new(
            "Undefined column. columnName=FOO",
            Some(201),
            Some("22000".to_string()),
        );
        assert_eq!(classify(&data_error.into()), None);

        assert_eq!(classify(&InterfaceError::ConnectionClosed.into()), None);
    }
}
