//! Runs one statement on an open connection.
use pheal_core::{ColumnHint, Connection, Error, ExecuteOutcome, HttpService};
use serde_json::Value;
use tracing::warn;

#[cfg(test)]
mod integration_test;

/// Executes `sql` through a self-healing cursor and commits when asked to.
///
/// The cursor is closed whether the statement succeeds or not. When both fail, the error of
/// the statement is returned.
pub async fn execute<S: HttpService>(
    connection: &Connection<S>,
    sql: &str,
    params: Option<&[Value]>,
    hint: Option<&mut ColumnHint>,
    commit: bool,
) -> Result<ExecuteOutcome, Error> {
    let mut cursor = connection.cursor()?;
    let result = cursor.execute(sql, params, hint).await;

    let outcome = match (result, cursor.close().await) {
        (Ok(outcome), closed) => {
            closed?;
            outcome
        }
        (Err(err), closed) => {
            if let Err(close_err) = closed {
                warn!(error = %close_err, "failed to close the cursor");
            }
            return Err(err);
        }
    };

    if commit {
        connection.commit().await?;
    }
    Ok(outcome)
}
