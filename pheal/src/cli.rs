//! # CLI
//!
//! This module defines the command-line interface of `pheal` using `clap`.
//!
//! It is responsible for parsing user input and validating it (e.g., ensuring parameters are valid JSON
//! and connection properties are `key=value`).
use clap::{Args, Parser, Subcommand};
use pheal_core::ColumnHint;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pheal", version, about = "Self-healing Avatica / Phoenix query CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Execute a statement on a query server
    ///
    /// When the statement fails because it references a column the table does not have, and
    /// the hint describes that column, the column is added and the statement is run again.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// pheal exec --url http://localhost:8765/ \
    ///     "UPSERT INTO EVENTS (ID, SOURCE) VALUES (?, ?)" \
    ///     --param 1 --param '"web"' \
    ///     --hint '{"table": "EVENTS", "columns": {"SOURCE": "VARCHAR"}}'
    /// ```
    Exec(ExecArgs),

    /// Infer the column declaration of a JSON value
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// pheal infer '[1, 2, 3]'
    /// ```
    Infer {
        /// JSON literal (string, number or array of one of them)
        #[arg(value_parser = parse_json)]
        value: serde_json::Value,
    },
}

#[derive(Args)]
pub struct ExecArgs {
    /// The statement to execute
    pub sql: String,

    /// The query server URL (e.g. http://localhost:8765/)
    #[arg(short, long, env = "PHEAL_URL")]
    pub url: String,

    /// Maximum number of retries for failed HTTP exchanges
    #[arg(long, env = "PHEAL_MAX_RETRIES")]
    pub max_retries: Option<u32>,

    /// Switch the connection to autocommit mode
    #[arg(long)]
    pub autocommit: bool,

    /// Switch the connection to readonly mode
    #[arg(long)]
    pub readonly: bool,

    /// Connection property sent when opening the connection (e.g. user=phoenix)
    #[arg(short = 'i', long = "info", value_parser = parse_key_value)]
    pub info: Vec<(String, String)>,

    /// Statement parameter as a JSON literal, in placeholder order
    #[arg(short, long = "param", value_parser = parse_json)]
    pub params: Vec<serde_json::Value>,

    /// Column hint as JSON: {"table": "T", "columns": {"C": "VARCHAR"}}
    #[arg(long, value_parser = parse_hint, conflicts_with = "hint_file")]
    pub hint: Option<ColumnHint>,

    /// Path to a JSON file holding the column hint
    #[arg(long)]
    pub hint_file: Option<PathBuf>,
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| "Format must be 'key=value'".to_string())
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}

fn parse_hint(value: &str) -> Result<ColumnHint, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid hint: {e}"))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_values_are_split_on_first_equal_sign() {
        assert_eq!(
            parse_key_value("password=a=b").unwrap(),
            ("password".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("user").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[test]
    fn exec_arguments_are_parsed() {
        let cli = Cli::try_parse_from([
            "pheal",
            "exec",
            "SELECT * FROM T",
            "--url",
            "http://localhost:8765/",
            "-p",
            "1",
            "--param",
            "\"x\"",
            "--hint",
            r#"{"table": "T", "columns": {"C": "VARCHAR"}}"#,
        ])
        .unwrap();

        let Commands::Exec(args) = cli.command else {
            panic!("Expected the exec command");
        };
        assert_eq!(args.params, vec![serde_json::json!(1), serde_json::json!("x")]);
        assert_eq!(
            args.hint,
            Some(ColumnHint::new("T").with_column("C", "VARCHAR"))
        );
        assert!(!args.autocommit);
    }

    #[test]
    fn hint_and_hint_file_conflict() {
        let result = Cli::try_parse_from([
            "pheal",
            "exec",
            "SELECT * FROM T",
            "--url",
            "http://localhost:8765/",
            "--hint",
            r#"{"table": "T"}"#,
            "--hint-file",
            "hint.json",
        ]);

        assert!(result.is_err());
    }
}
