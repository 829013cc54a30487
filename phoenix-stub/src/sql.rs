//! The tiny SQL dialect understood by the stub.
//!
//! ```text
//! ALTER TABLE <table> ADD <column> <declaration>
//! UPSERT INTO <table> (<column>, ...) VALUES (<literal or ?>, ...)
//! SELECT <column>, ... | * FROM <table>
//! ```
//!
//! Identifiers are case-insensitive and stored upper-cased, like unquoted Phoenix identifiers.
use avatica_proto::{Rep, TypedValue};
use regex::Regex;
use std::sync::LazyLock;

static ALTER_ADD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*ALTER\s+TABLE\s+(\w+)\s+ADD\s+(\w+)\s+(.+?)\s*;?\s*$")
        .expect("valid alter regex")
});

static UPSERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*UPSERT\s+INTO\s+(\w+)\s*\(([^)]*)\)\s*VALUES\s*\((.*)\)\s*;?\s*$")
        .expect("valid upsert regex")
});

static SELECT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*SELECT\s+(.+?)\s+FROM\s+(\w+)\s*;?\s*$")
        .expect("valid select regex")
});

/// An error raised while compiling or running a statement, rendered the way Phoenix does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlError {
    pub code: u32,
    pub sql_state: &'static str,
    pub message: String,
    pub exception: &'static str,
}

impl SqlError {
    pub fn undefined_column(column: &str) -> Self {
        Self {
            code: 504,
            sql_state: "42703",
            message: format!("Undefined column. columnName={column}"),
            exception: "org.apache.phoenix.schema.ColumnNotFoundException",
        }
    }

    pub fn undefined_table(table: &str) -> Self {
        Self {
            code: 1012,
            sql_state: "42M03",
            message: format!("Table undefined. tableName={table}"),
            exception: "org.apache.phoenix.schema.TableNotFoundException",
        }
    }

    pub fn duplicate_column(column: &str) -> Self {
        Self {
            code: 514,
            sql_state: "42892",
            message: format!(
                "A duplicate column name was detected in the object definition or ALTER TABLE statement. columnName={column}"
            ),
            exception: "org.apache.phoenix.schema.ColumnAlreadyExistsException",
        }
    }

    pub fn syntax(sql: &str) -> Self {
        Self {
            code: 601,
            sql_state: "42P00",
            message: format!("Syntax error. Unsupported statement: {}", sql.trim()),
            exception: "org.apache.phoenix.exception.PhoenixParserException",
        }
    }

    pub fn illegal_data(detail: &str) -> Self {
        Self {
            code: 201,
            sql_state: "22000",
            message: format!("Illegal data. {detail}"),
            exception: "java.sql.SQLException",
        }
    }

    /// `ERROR <code> (<state>): <message>`
    pub fn phoenix_message(&self) -> String {
        format!("ERROR {} ({}): {}", self.code, self.sql_state, self.message)
    }
}

/// A value slot of an `UPSERT`.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Parameter,
    Literal(TypedValue),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    AlterAdd {
        table: String,
        column: String,
        declaration: String,
    },
    Upsert {
        table: String,
        columns: Vec<String>,
        values: Vec<Slot>,
    },
    Select {
        table: String,
        /// `None` for `*`.
        columns: Option<Vec<String>>,
    },
}

impl Statement {
    pub fn parse(sql: &str) -> Result<Self, SqlError> {
        if let Some(captures) = ALTER_ADD.captures(sql) {
            return Ok(Statement::AlterAdd {
                table: identifier(&captures[1]),
                column: identifier(&captures[2]),
                declaration: captures[3].to_uppercase(),
            });
        }

        if let Some(captures) = UPSERT.captures(sql) {
            let columns = identifiers(&captures[2]);
            let values = split_values(&captures[3])
                .iter()
                .map(|value| parse_slot(value))
                .collect::<Result<Vec<_>, _>>()?;

            if columns.len() != values.len() {
                return Err(SqlError::illegal_data(&format!(
                    "{} columns but {} values",
                    columns.len(),
                    values.len()
                )));
            }

            return Ok(Statement::Upsert {
                table: identifier(&captures[1]),
                columns,
                values,
            });
        }

        if let Some(captures) = SELECT.captures(sql) {
            let columns = match captures[1].trim() {
                "*" => None,
                list => Some(identifiers(list)),
            };
            return Ok(Statement::Select {
                table: identifier(&captures[2]),
                columns,
            });
        }

        Err(SqlError::syntax(sql))
    }

    /// Number of `?` placeholders.
    pub fn parameter_count(&self) -> usize {
        match self {
            Statement::Upsert { values, .. } => values
                .iter()
                .filter(|slot| matches!(slot, Slot::Parameter))
                .count(),
            _ => 0,
        }
    }
}

fn identifier(raw: &str) -> String {
    raw.trim().to_uppercase()
}

fn identifiers(list: &str) -> Vec<String> {
    list.split(',').map(identifier).collect()
}

/// Splits a `VALUES` list on commas that are not inside a string literal.
fn split_values(list: &str) -> Vec<String> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut in_string = false;

    for c in list.chars() {
        match c {
            '\'' => {
                in_string = !in_string;
                current.push(c);
            }
            ',' if !in_string => values.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    values.push(current);

    values.into_iter().map(|v| v.trim().to_string()).collect()
}

fn parse_slot(raw: &str) -> Result<Slot, SqlError> {
    if raw == "?" {
        return Ok(Slot::Parameter);
    }

    if raw.eq_ignore_ascii_case("NULL") {
        return Ok(Slot::Literal(null_value()));
    }

    if let Some(text) = raw.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        return Ok(Slot::Literal(TypedValue {
            r#type: Rep::String.into(),
            string_value: text.replace("''", "'"),
            ..Default::default()
        }));
    }

    if let Ok(number) = raw.parse::<i64>() {
        return Ok(Slot::Literal(TypedValue {
            r#type: Rep::Long.into(),
            number_value: number,
            ..Default::default()
        }));
    }

    if let Ok(number) = raw.parse::<f64>() {
        return Ok(Slot::Literal(TypedValue {
            r#type: Rep::Double.into(),
            double_value: number,
            ..Default::default()
        }));
    }

    Err(SqlError::illegal_data(&format!("Unsupported literal {raw}")))
}

pub fn null_value() -> TypedValue {
    TypedValue {
        r#type: Rep::Null.into(),
        null: true,
        ..Default::default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn statements_are_parsed() {
        assert_eq!(
            Statement::parse("alter table t add foo bigint").unwrap(),
            Statement::AlterAdd {
                table: "T".to_string(),
                column: "FOO".to_string(),
                declaration: "BIGINT".to_string(),
            }
        );

        let upsert = Statement::parse("UPSERT INTO T (ID, NAME) VALUES (?, 'a, b')").unwrap();
        assert_eq!(upsert.parameter_count(), 1);

        assert_eq!(
            Statement::parse("SELECT * FROM t").unwrap(),
            Statement::Select {
                table: "T".to_string(),
                columns: None,
            }
        );
    }

    #[test]
    fn unknown_statements_are_syntax_errors() {
        assert_eq!(
            Statement::parse("DROP TABLE T").unwrap_err().sql_state,
            "42P00"
        );
    }
}
