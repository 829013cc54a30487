//! Conversions between JSON values and Avatica `TypedValue`s.
use crate::error::InterfaceError;
use avatica_proto::{ColumnValue, Rep, TypedValue};
use serde_json::{Number, Value};

/// Marshals a statement parameter.
pub fn to_typed_value(value: &Value) -> Result<TypedValue, InterfaceError> {
    let typed = match value {
        Value::Null => TypedValue {
            r#type: Rep::Null.into(),
            null: true,
            ..Default::default()
        },
        Value::Bool(b) => TypedValue {
            r#type: Rep::Boolean.into(),
            bool_value: *b,
            ..Default::default()
        },
        Value::Number(n) if n.is_u64() && !n.is_i64() => {
            return Err(InterfaceError::UnsupportedParameter(value.clone()));
        }
        Value::Number(n) => match n.as_i64() {
            Some(i) => TypedValue {
                r#type: Rep::Long.into(),
                number_value: i,
                ..Default::default()
            },
            None => TypedValue {
                r#type: Rep::Double.into(),
                double_value: n.as_f64().unwrap_or(f64::NAN),
                ..Default::default()
            },
        },
        Value::String(s) => TypedValue {
            r#type: Rep::String.into(),
            string_value: s.clone(),
            ..Default::default()
        },
        Value::Array(items) => {
            let array_value = items
                .iter()
                .map(to_typed_value)
                .collect::<Result<Vec<_>, _>>()?;
            let component_type = array_value
                .first()
                .map(|item| item.r#type)
                .unwrap_or(Rep::Null.into());

            TypedValue {
                r#type: Rep::Array.into(),
                array_value,
                component_type,
                ..Default::default()
            }
        }
        Value::Object(_) => return Err(InterfaceError::UnsupportedParameter(value.clone())),
    };

    Ok(typed)
}

/// Unmarshals one column of a result row.
pub fn from_column_value(column: &ColumnValue) -> Value {
    if column.has_array_value {
        return Value::Array(column.array_value.iter().map(from_typed_value).collect());
    }

    match (&column.scalar_value, column.value.first()) {
        (Some(scalar), _) => from_typed_value(scalar),
        (None, Some(legacy)) => from_typed_value(legacy),
        (None, None) => Value::Null,
    }
}

pub fn from_typed_value(value: &TypedValue) -> Value {
    if value.null || value.implicitly_null {
        return Value::Null;
    }

    match value.r#type() {
        Rep::PrimitiveBoolean | Rep::Boolean => Value::Bool(value.bool_value),
        Rep::PrimitiveByte
        | Rep::PrimitiveShort
        | Rep::PrimitiveInt
        | Rep::PrimitiveLong
        | Rep::Byte
        | Rep::Short
        | Rep::Integer
        | Rep::Long
        | Rep::BigInteger
        | Rep::JavaSqlTime
        | Rep::JavaSqlTimestamp
        | Rep::JavaSqlDate
        | Rep::JavaUtilDate => Value::from(value.number_value),
        Rep::PrimitiveFloat | Rep::PrimitiveDouble | Rep::Float | Rep::Double => {
            Number::from_f64(value.double_value).map_or(Value::Null, Value::Number)
        }
        Rep::PrimitiveChar | Rep::Character | Rep::String | Rep::BigDecimal | Rep::Number => {
            Value::String(value.string_value.clone())
        }
        Rep::ByteString => {
            Value::Array(value.bytes_value.iter().map(|b| Value::from(*b)).collect())
        }
        Rep::Array => Value::Array(value.array_value.iter().map(from_typed_value).collect()),
        Rep::Null | Rep::Object | Rep::Struct | Rep::Multiset => Value::Null,
    }
}
