use colored::*;
use pheal_core::{DatabaseError, Error, ExecuteOutcome, InferError};
use serde_json::{Map, Value};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// Columns added to the table while executing a statement, with their declarations.
pub struct AddedColumns(pub String, pub Vec<(String, String)>);

/// Result of `pheal infer`.
pub struct Inferred(pub String, pub Value);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}", self.0)?;
        Ok(())
    }
}

impl From<ExecuteOutcome> for FormattedString {
    fn from(outcome: ExecuteOutcome) -> Self {
        if let Some(count) = outcome.update_count {
            let noun = if count == 1 { "row" } else { "rows" };
            return FormattedString(format!("{} {noun} affected", count.to_string().green()));
        }

        let rows: Vec<Value> = outcome
            .rows
            .into_iter()
            .map(|row| {
                let object: Map<String, Value> = outcome.columns.iter().cloned().zip(row).collect();
                Value::Object(object)
            })
            .collect();

        let mut out = serde_json::to_string_pretty(&rows).unwrap_or_else(|_| format!("{rows:?}"));
        if !outcome.done {
            out.push_str(&format!("\n{}", "(first frame only)".yellow()));
        }
        FormattedString(out)
    }
}

impl From<AddedColumns> for FormattedString {
    fn from(AddedColumns(table, columns): AddedColumns) -> Self {
        let mut out = format!("Added columns to {}:\n", table.cyan());
        for (name, declaration) in columns {
            out.push_str(&format!("  + {} {}\n", name.green(), declaration));
        }
        FormattedString(out.trim_end().to_string())
    }
}

impl From<Inferred> for FormattedString {
    fn from(Inferred(declaration, value): Inferred) -> Self {
        FormattedString(format!("{} {}", declaration.cyan().bold(), value))
    }
}

impl From<InferError> for FormattedString {
    fn from(err: InferError) -> Self {
        FormattedString(format!("{}\n\n'{}'", "Inference Failed:".red().bold(), err))
    }
}

impl From<anyhow::Error> for FormattedString {
    fn from(err: anyhow::Error) -> Self {
        let title = match err.downcast_ref::<Error>() {
            Some(Error::Database(db)) => format!(
                "{} {}",
                "Statement Failed:".red().bold(),
                database_details(db)
            ),
            Some(Error::Interface(_)) => "Request Failed:".red().bold().to_string(),
            None => "Error:".red().bold().to_string(),
        };

        FormattedString(format!("{title}\n\n'{err:#}'"))
    }
}

fn database_details(err: &DatabaseError) -> String {
    let mut details = Vec::new();
    if let Some(code) = err.code {
        details.push(format!("code={code}"));
    }
    if let Some(sql_state) = &err.sql_state {
        details.push(format!("state={sql_state}"));
    }
    details.join(" ")
}
