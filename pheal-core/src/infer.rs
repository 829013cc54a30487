//! # Column Type Inference
//!
//! Guesses the Phoenix column declaration of a literal value. Useful to build a
//! [`crate::ColumnHint`] from the data about to be written:
//!
//! | value                      | declaration      |
//! |----------------------------|------------------|
//! | string                     | `VARCHAR`        |
//! | integer within `i64`       | `BIGINT`         |
//! | float                      | `DOUBLE`         |
//! | array of one of the above  | `ARRAY[<type>]`  |
//!
//! Anything else is rejected.
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferError {
    #[error("Unsupported data type: {0}")]
    UnsupportedType(&'static str),
    #[error("Unsupported array item type: {0}")]
    UnsupportedArrayItem(&'static str),
    #[error("Array items must share one type, found {first} and {other}")]
    MixedArray {
        first: &'static str,
        other: &'static str,
    },
    #[error("Cannot infer the item type of an empty array")]
    EmptyArray,
    #[error("Integer {0} does not fit in a BIGINT")]
    IntegerOutOfRange(u64),
}

/// Infers the column declaration of `value`.
///
/// # Returns
///
/// The declaration together with the value to write. The value is returned unchanged.
///
/// # Example
///
/// ```
/// use pheal_core::infer;
/// use serde_json::json;
///
/// assert_eq!(infer(&json!("abc")).unwrap(), ("VARCHAR".to_string(), json!("abc")));
/// assert_eq!(infer(&json!([1, 2])).unwrap().0, "ARRAY[BIGINT]");
/// assert!(infer(&json!([1, "x"])).is_err());
/// ```
pub fn infer(value: &Value) -> Result<(String, Value), InferError> {
    let declaration = match value {
        Value::Array(items) => format!("ARRAY[{}]", array_item_type(items)?),
        scalar => scalar_type(scalar)?.to_string(),
    };

    Ok((declaration, value.clone()))
}

fn scalar_type(value: &Value) -> Result<&'static str, InferError> {
    match value {
        Value::String(_) => Ok("VARCHAR"),
        Value::Number(n) if n.is_i64() => Ok("BIGINT"),
        Value::Number(n) if n.is_u64() => Err(InferError::IntegerOutOfRange(
            n.as_u64().unwrap_or(u64::MAX),
        )),
        Value::Number(_) => Ok("DOUBLE"),
        other => Err(InferError::UnsupportedType(json_type_name(other))),
    }
}

fn array_item_type(items: &[Value]) -> Result<&'static str, InferError> {
    let mut item_type = None;

    for item in items {
        let current = scalar_type(item).map_err(|err| match err {
            InferError::IntegerOutOfRange(_) => err,
            _ => InferError::UnsupportedArrayItem(json_type_name(item)),
        })?;

        match item_type {
            None => item_type = Some(current),
            Some(first) if first != current => {
                return Err(InferError::MixedArray {
                    first,
                    other: current,
                });
            }
            Some(_) => {}
        }
    }

    item_type.ok_or(InferError::EmptyArray)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
