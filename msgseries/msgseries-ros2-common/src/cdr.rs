//! CDR payload decoding behind the [`Deserializer`] contract.

use std::sync::Arc;

use bytes::{Buf, Bytes};
use msgseries_core::{DecodeError, Deserializer, PrimitiveKind, Value};

/// Size of the encapsulation header that precedes every CDR payload.
const ENCAPSULATION_LEN: usize = 4;

fn primitive_align_size(kind: PrimitiveKind) -> usize {
    match kind {
        PrimitiveKind::I16 | PrimitiveKind::U16 => 2,
        PrimitiveKind::I32 | PrimitiveKind::U32 | PrimitiveKind::F32 | PrimitiveKind::String => 4,
        PrimitiveKind::I64 | PrimitiveKind::U64 | PrimitiveKind::F64 => 8,
        PrimitiveKind::Bool | PrimitiveKind::I8 | PrimitiveKind::U8 => 1,
    }
}

/// [`Deserializer`] for ROS 2 CDR payloads.
///
/// Both little- and big-endian encapsulations are accepted. Alignment is
/// computed relative to the end of the encapsulation header.
#[derive(Debug, Default)]
pub struct CdrDeserializer {
    buf: Bytes,
    initial_len: usize,
    little_endian: bool,
}

impl CdrDeserializer {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_encapsulation(&mut self) -> Result<(), DecodeError> {
        self.ensure(ENCAPSULATION_LEN)?;
        let _representation_id = self.buf.get_u8();
        let endianness = self.buf.get_u8();
        self.buf.advance(2);
        self.little_endian = match endianness {
            0x00 => false,
            0x01 => true,
            other => {
                return Err(DecodeError::Unsupported(format!(
                    "CDR representation options 0x{other:02x}"
                )));
            }
        };
        Ok(())
    }

    fn current_offset(&self) -> usize {
        self.initial_len - self.buf.remaining()
    }

    fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            return Err(DecodeError::UnexpectedEof { needed, remaining });
        }
        Ok(())
    }

    fn align(&mut self, n: usize) -> Result<(), DecodeError> {
        let relative_offset = self.current_offset().saturating_sub(ENCAPSULATION_LEN);
        let pad = (n - (relative_offset % n)) % n;
        self.ensure(pad)?;
        self.buf.advance(pad);
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.align(4)?;
        self.ensure(4)?;
        Ok(if self.little_endian {
            self.buf.get_u32_le()
        } else {
            self.buf.get_u32()
        })
    }

    fn decode_str(&mut self) -> Result<Arc<str>, DecodeError> {
        let len = self.read_u32()? as usize;
        if len == 0 {
            return Ok(Arc::from(""));
        }
        self.ensure(len)?;
        let bytes = self.buf.copy_to_bytes(len);
        if bytes.last() != Some(&0) {
            return Err(DecodeError::InvalidData(
                "string missing null terminator".to_string(),
            ));
        }
        std::str::from_utf8(&bytes[..len - 1])
            .map(Arc::from)
            .map_err(|e| DecodeError::InvalidData(format!("invalid UTF-8: {e}")))
    }
}

macro_rules! read_endian {
    ($self:ident, $le:ident, $be:ident) => {
        if $self.little_endian {
            $self.buf.$le()
        } else {
            $self.buf.$be()
        }
    };
}

impl Deserializer for CdrDeserializer {
    fn init(&mut self, data: &[u8]) -> Result<(), DecodeError> {
        self.buf = Bytes::copy_from_slice(data);
        self.initial_len = self.buf.len();
        self.read_encapsulation()
    }

    fn decode(&mut self, kind: PrimitiveKind) -> Result<Value, DecodeError> {
        let size = primitive_align_size(kind);
        self.align(size)?;
        self.ensure(size)?;

        Ok(match kind {
            PrimitiveKind::Bool => Value::Bool(self.buf.get_u8() != 0),
            PrimitiveKind::I8 => Value::I8(self.buf.get_i8()),
            PrimitiveKind::U8 => Value::U8(self.buf.get_u8()),
            PrimitiveKind::I16 => Value::I16(read_endian!(self, get_i16_le, get_i16)),
            PrimitiveKind::U16 => Value::U16(read_endian!(self, get_u16_le, get_u16)),
            PrimitiveKind::I32 => Value::I32(read_endian!(self, get_i32_le, get_i32)),
            PrimitiveKind::U32 => Value::U32(read_endian!(self, get_u32_le, get_u32)),
            PrimitiveKind::I64 => Value::I64(read_endian!(self, get_i64_le, get_i64)),
            PrimitiveKind::U64 => Value::U64(read_endian!(self, get_u64_le, get_u64)),
            PrimitiveKind::F32 => Value::F32(read_endian!(self, get_f32_le, get_f32)),
            PrimitiveKind::F64 => Value::F64(read_endian!(self, get_f64_le, get_f64)),
            PrimitiveKind::String => Value::String(self.decode_str()?),
        })
    }

    fn decode_len(&mut self) -> Result<usize, DecodeError> {
        Ok(self.read_u32()? as usize)
    }

    fn bytes_left(&self) -> usize {
        self.buf.remaining()
    }
}
