//! Decoded primitive values.

use std::sync::Arc;

use crate::error::ValueTypeError;

/// A single primitive produced by a [`Deserializer`](crate::Deserializer).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(Arc<str>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::String(Arc::from(s.as_ref()))
    }

    /// Numeric view used for series samples. Strings have none.
    pub fn as_f64(&self) -> Option<f64> {
        Some(match self {
            Value::Bool(v) => f64::from(u8::from(*v)),
            Value::I8(v) => f64::from(*v),
            Value::I16(v) => f64::from(*v),
            Value::I32(v) => f64::from(*v),
            Value::I64(v) => *v as f64,
            Value::U8(v) => f64::from(*v),
            Value::U16(v) => f64::from(*v),
            Value::U32(v) => f64::from(*v),
            Value::U64(v) => *v as f64,
            Value::F32(v) => f64::from(*v),
            Value::F64(v) => *v,
            Value::String(_) => return None,
        })
    }

    pub fn try_f64(&self) -> Result<f64, ValueTypeError> {
        self.as_f64().ok_or_else(|| self.type_mismatch("number"))
    }

    pub fn try_str(&self) -> Result<&str, ValueTypeError> {
        match self {
            Value::String(v) => Ok(v.as_ref()),
            _ => Err(self.type_mismatch("String")),
        }
    }

    /// Interpret an unsigned or non-negative signed integer as a length/count.
    pub fn try_usize(&self) -> Result<usize, ValueTypeError> {
        let out = match self {
            Value::U8(v) => Some(usize::from(*v)),
            Value::U16(v) => Some(usize::from(*v)),
            Value::U32(v) => usize::try_from(*v).ok(),
            Value::U64(v) => usize::try_from(*v).ok(),
            Value::I32(v) => usize::try_from(*v).ok(),
            Value::I64(v) => usize::try_from(*v).ok(),
            _ => None,
        };
        out.ok_or_else(|| self.type_mismatch("unsigned length"))
    }

    pub fn type_mismatch(&self, expected: impl Into<String>) -> ValueTypeError {
        ValueTypeError::new(expected, self.variant_name())
    }

    fn variant_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "Bool",
            Value::I8(_) => "I8",
            Value::I16(_) => "I16",
            Value::I32(_) => "I32",
            Value::I64(_) => "I64",
            Value::U8(_) => "U8",
            Value::U16(_) => "U16",
            Value::U32(_) => "U32",
            Value::U64(_) => "U64",
            Value::F32(_) => "F32",
            Value::F64(_) => "F64",
            Value::String(_) => "String",
        }
    }
}
