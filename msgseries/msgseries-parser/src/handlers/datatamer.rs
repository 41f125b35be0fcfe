//! DataTamer schemas and snapshots.
//!
//! A `Schemas` message announces, per schema hash, the producer's channel
//! name and a text listing of its fields (`float64 x`, `int32[3] arr`,
//! `float32[] vec`). A `Snapshot` names the schema by hash and carries a
//! packed little-endian payload holding only the fields whose bit is set in
//! `active_mask`. Dynamic arrays are prefixed by a `u32` element count.
//!
//! Samples land at `<channel>/<channel_name>/<field>`, array elements at
//! `<field>/<index>`.

use std::{fmt, str::FromStr};

use bytes::{Buf, TryGetError};
use msgseries_core::{DecodeError, FieldPath, PrimitiveKind, Value};

use crate::{context::ParseContext, error::ParseError};

type Result<T> = std::result::Result<T, ParseError>;

// hash, channel_name and schema_text prefixes.
const SCHEMA_MIN_SIZE: usize = 8 + 4 + 4;

/// Registry key of a DataTamer schema. The entry holds the producer's
/// channel name followed by one normalized declaration per field.
pub(crate) fn schema_key(channel: &str, hash: u64) -> String {
    format!("{channel}#datatamer/{hash}")
}

pub(crate) fn schemas(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    let path = prefix.child("schemas");
    let len = ctx.read_count(&path, SCHEMA_MIN_SIZE)?;
    for i in 0..len {
        let item = path.index(i);
        let hash = read_u64(ctx, &item.child("hash"))?;
        let channel_name = ctx.read_string(&item.child("channel_name"))?;
        let text = ctx.read_string(&item.child("schema_text"))?;
        match parse_schema_text(&text) {
            Ok(fields) => {
                let mut entry = Vec::with_capacity(fields.len() + 1);
                entry.push(channel_name);
                entry.extend(fields.iter().map(ToString::to_string));
                ctx.registry.register(&schema_key(ctx.channel, hash), entry);
            }
            Err(err) => {
                tracing::warn!(
                    hash,
                    channel_name = %channel_name,
                    error = %err,
                    "unsupported DataTamer schema"
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn snapshot(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    let stamp = read_u64(ctx, &prefix.child("timestamp_nsec"))?;
    ctx.found_stamp(stamp as f64 / 1e9);
    let hash = read_u64(ctx, &prefix.child("schema_hash"))?;
    let mask = read_bytes(ctx, &prefix.child("active_mask"))?;
    let payload_path = prefix.child("payload");
    let payload = read_bytes(ctx, &payload_path)?;

    let key = schema_key(ctx.channel, hash);
    let entry = ctx.registry.get(&key)?;
    let Some((channel_name, decls)) = entry.split_first() else {
        return Err(ParseError::MissingSchema { channel: key });
    };
    let base = FieldPath::root(ctx.channel).child(channel_name);

    let mut buf = payload.as_slice();
    for (i, decl) in decls.iter().enumerate() {
        if !is_active(&mask, i) {
            continue;
        }
        let field: TamerField = decl
            .parse()
            .map_err(|e| ParseError::mismatch(&payload_path, e))?;
        let path = base.child(&field.name);
        let count = match field.arity {
            Arity::Scalar => {
                let value =
                    take(&mut buf, field.kind).map_err(|e| ParseError::mismatch(&path, e))?;
                ctx.emit(path, value);
                continue;
            }
            Arity::Fixed(n) => n,
            Arity::Dynamic => {
                let n = buf.try_get_u32_le().map_err(|e| ParseError::mismatch(&path, eof(e)))?;
                usize::try_from(n).map_err(|_| {
                    ParseError::mismatch(&path, DecodeError::InvalidData(format!("length {n}")))
                })?
            }
        };
        let needed = count.saturating_mul(field.kind.min_wire_size());
        if needed > buf.remaining() {
            return Err(ParseError::mismatch(
                &path,
                DecodeError::UnexpectedEof {
                    needed,
                    remaining: buf.remaining(),
                },
            ));
        }
        let emit = ctx.emit_count(count, &path)?;
        for k in 0..count {
            let value = take(&mut buf, field.kind).map_err(|e| ParseError::mismatch(&path, e))?;
            if k < emit {
                ctx.emit(path.index(k), value);
            }
        }
    }
    Ok(())
}

fn is_active(mask: &[u8], field: usize) -> bool {
    mask.get(field / 8)
        .is_some_and(|byte| byte & (1 << (field % 8)) != 0)
}

fn read_u64(ctx: &mut ParseContext<'_>, path: &FieldPath) -> Result<u64> {
    match ctx.decode(PrimitiveKind::U64, path)? {
        Value::U64(v) => Ok(v),
        other => Err(ParseError::mismatch(path, other.type_mismatch("u64").into())),
    }
}

fn read_bytes(ctx: &mut ParseContext<'_>, path: &FieldPath) -> Result<Vec<u8>> {
    let len = ctx.read_count(path, 1)?;
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        match ctx.decode(PrimitiveKind::U8, path)? {
            Value::U8(b) => out.push(b),
            other => return Err(ParseError::mismatch(path, other.type_mismatch("u8").into())),
        }
    }
    Ok(out)
}

fn eof(err: TryGetError) -> DecodeError {
    DecodeError::UnexpectedEof {
        needed: err.requested,
        remaining: err.available,
    }
}

/// Decode one packed little-endian value.
fn take(buf: &mut &[u8], kind: PrimitiveKind) -> std::result::Result<f64, DecodeError> {
    let value = match kind {
        PrimitiveKind::Bool | PrimitiveKind::U8 => f64::from(buf.try_get_u8().map_err(eof)?),
        PrimitiveKind::I8 => f64::from(buf.try_get_i8().map_err(eof)?),
        PrimitiveKind::I16 => f64::from(buf.try_get_i16_le().map_err(eof)?),
        PrimitiveKind::U16 => f64::from(buf.try_get_u16_le().map_err(eof)?),
        PrimitiveKind::I32 => f64::from(buf.try_get_i32_le().map_err(eof)?),
        PrimitiveKind::U32 => f64::from(buf.try_get_u32_le().map_err(eof)?),
        PrimitiveKind::I64 => buf.try_get_i64_le().map_err(eof)? as f64,
        PrimitiveKind::U64 => buf.try_get_u64_le().map_err(eof)? as f64,
        PrimitiveKind::F32 => f64::from(buf.try_get_f32_le().map_err(eof)?),
        PrimitiveKind::F64 => buf.try_get_f64_le().map_err(eof)?,
        PrimitiveKind::String => {
            return Err(DecodeError::InvalidData(
                "strings are not packed in snapshots".to_string(),
            ));
        }
    };
    Ok(value)
}

/// Field declarations up to the first custom type section.
fn parse_schema_text(text: &str) -> std::result::Result<Vec<TamerField>, DecodeError> {
    let mut out = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() || line.starts_with("__") {
            continue;
        }
        if line.starts_with("MSG:") || line.chars().all(|c| c == '=') {
            break;
        }
        out.push(line.parse()?);
    }
    Ok(out)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Scalar,
    Fixed(usize),
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TamerField {
    type_name: &'static str,
    kind: PrimitiveKind,
    arity: Arity,
    name: String,
}

impl FromStr for TamerField {
    type Err = DecodeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidData(format!("bad field declaration `{s}`"));
        let mut parts = s.split_whitespace();
        let (Some(ty), Some(name), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let (base, arity) = match ty.split_once('[') {
            None => (ty, Arity::Scalar),
            Some((base, rest)) => {
                let size = rest.strip_suffix(']').ok_or_else(invalid)?;
                if size.is_empty() {
                    (base, Arity::Dynamic)
                } else {
                    (base, Arity::Fixed(size.parse().map_err(|_| invalid())?))
                }
            }
        };
        let (type_name, kind) = match base {
            "bool" => ("bool", PrimitiveKind::Bool),
            "char" => ("char", PrimitiveKind::I8),
            "int8" => ("int8", PrimitiveKind::I8),
            "uint8" => ("uint8", PrimitiveKind::U8),
            "int16" => ("int16", PrimitiveKind::I16),
            "uint16" => ("uint16", PrimitiveKind::U16),
            "int32" => ("int32", PrimitiveKind::I32),
            "uint32" => ("uint32", PrimitiveKind::U32),
            "int64" => ("int64", PrimitiveKind::I64),
            "uint64" => ("uint64", PrimitiveKind::U64),
            "float32" => ("float32", PrimitiveKind::F32),
            "float64" => ("float64", PrimitiveKind::F64),
            other => {
                return Err(DecodeError::InvalidData(format!(
                    "unsupported DataTamer type `{other}`"
                )));
            }
        };
        Ok(Self {
            type_name,
            kind,
            arity,
            name: name.to_string(),
        })
    }
}

impl fmt::Display for TamerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.arity {
            Arity::Scalar => write!(f, "{} {}", self.type_name, self.name),
            Arity::Fixed(n) => write!(f, "{}[{n}] {}", self.type_name, self.name),
            Arity::Dynamic => write!(f, "{}[] {}", self.type_name, self.name),
        }
    }
}
