//! Sequential primitive decoder contract.

use crate::{error::DecodeError, schema::PrimitiveKind, value::Value};

/// Stateful cursor over one message payload.
///
/// A parser binds the deserializer to each new payload with [`init`] and then
/// pulls primitives in schema order; every successful call advances the
/// cursor. Instances are used by one parser at a time (`&mut self`).
///
/// [`init`]: Deserializer::init
pub trait Deserializer: Send {
    /// Bind to a new payload and reset the cursor to its first value.
    fn init(&mut self, data: &[u8]) -> Result<(), DecodeError>;

    /// Decode one primitive of the given kind.
    fn decode(&mut self, kind: PrimitiveKind) -> Result<Value, DecodeError>;

    /// Decode the runtime length prefix of a variable-length array.
    fn decode_len(&mut self) -> Result<usize, DecodeError> {
        Ok(self.decode(PrimitiveKind::U32)?.try_usize()?)
    }

    /// Bytes not consumed yet.
    fn bytes_left(&self) -> usize;

    fn decode_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(self.decode(PrimitiveKind::F64)?.try_f64()?)
    }

    fn decode_string(&mut self) -> Result<String, DecodeError> {
        Ok(self.decode(PrimitiveKind::String)?.try_str()?.to_string())
    }
}
