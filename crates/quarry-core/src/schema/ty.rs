use crate::{stmt::Value, Result};

/// The declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Boolean,
    Integer,
    Double,
    Text,
    Blob,
}

impl Type {
    /// Coerces a driver value into this declared type.
    ///
    /// Storage engines are loose about scalar representations: booleans come
    /// back as integers, integer columns feed double expressions. Exact
    /// matches and NULL pass through; integers and booleans convert to each
    /// other; integers widen to doubles. Anything else is a mismatch.
    pub fn coerce(self, value: Value) -> Result<Value> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (Self::Boolean, Value::Bool(v)) => Ok(Value::Bool(v)),
            (Self::Boolean, Value::I64(v)) => Ok(Value::Bool(v != 0)),
            (Self::Integer, Value::I64(v)) => Ok(Value::I64(v)),
            (Self::Integer, Value::Bool(v)) => Ok(Value::I64(v.into())),
            (Self::Double, Value::F64(v)) => Ok(Value::F64(v)),
            (Self::Double, Value::I64(v)) => Ok(Value::F64(v as f64)),
            (Self::Text, Value::String(v)) => Ok(Value::String(v)),
            (Self::Blob, Value::Bytes(v)) => Ok(Value::Bytes(v)),
            (ty, value) => Err(crate::err!(
                "cannot coerce {} value into {:?} column",
                value.kind_name(),
                ty
            )),
        }
    }
}
