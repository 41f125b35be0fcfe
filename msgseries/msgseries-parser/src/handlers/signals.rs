//! Two-phase handlers: a names message announces signal names on a channel,
//! values messages on the same channel are zipped against them.
//!
//! Values are emitted under the channel, not the topic, so `/dbg/names` and
//! `/dbg/values` produce `dbg/<name>`.

use msgseries_core::{FieldPath, PrimitiveKind, Value};

use super::geometry::top_header;
use crate::{context::ParseContext, error::ParseError};

type Result<T> = std::result::Result<T, ParseError>;

/// Registry key of a statistics name list.
pub(crate) fn statistics_key(channel: &str, names_version: u32) -> String {
    format!("{channel}#{names_version}")
}

/// Registry key of a TSL field-name definition.
pub(crate) fn tsl_key(channel: &str, definition_hash: u32) -> String {
    format!("{channel}@{definition_hash}")
}

pub(crate) fn debug_signal_names(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
    stamped: bool,
) -> Result<()> {
    if stamped {
        top_header(ctx, prefix)?;
    }
    let names = ctx.read_string_seq(&prefix.child("names"))?;
    ctx.registry.register(ctx.channel, names);
    Ok(())
}

pub(crate) fn debug_signal_values(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
    stamped: bool,
) -> Result<()> {
    if stamped {
        top_header(ctx, prefix)?;
    }
    let names = ctx.registry.get(ctx.channel)?;
    let (values, declared) = read_values(ctx, &prefix.child("values"))?;
    emit_named(ctx, &names, &values, declared);
    Ok(())
}

pub(crate) fn statistics_names(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let names = ctx.read_string_seq(&prefix.child("names"))?;
    let version = read_version(ctx, prefix)?;
    let key = statistics_key(ctx.channel, version);
    ctx.registry.register(&key, names);
    Ok(())
}

pub(crate) fn statistics_values(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let (values, declared) = read_values(ctx, &prefix.child("values"))?;
    let version = read_version(ctx, prefix)?;
    let names = ctx.registry.get(&statistics_key(ctx.channel, version))?;
    emit_named(ctx, &names, &values, declared);
    Ok(())
}

/// `*/TSLDefinition`: field names announced under a definition hash.
pub(crate) fn tsl_definition(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let hash = read_u32(ctx, &prefix.child("definition_hash"))?;
    let names = ctx.read_string_seq(&prefix.child("field_names"))?;
    ctx.registry.register(&tsl_key(ctx.channel, hash), names);
    Ok(())
}

pub(crate) fn tsl_values(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let hash = read_u32(ctx, &prefix.child("definition_hash"))?;
    let names = ctx.registry.get(&tsl_key(ctx.channel, hash))?;
    let (values, declared) = read_values(ctx, &prefix.child("values"))?;
    emit_named(ctx, &names, &values, declared);
    Ok(())
}

fn read_version(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<u32> {
    read_u32(ctx, &prefix.child("names_version"))
}

fn read_u32(ctx: &mut ParseContext<'_>, path: &FieldPath) -> Result<u32> {
    match ctx.decode(PrimitiveKind::U32, path)? {
        Value::U32(v) => Ok(v),
        other => Err(ParseError::mismatch(path, other.type_mismatch("u32").into())),
    }
}

/// Read a `float64[]`, keeping only the prefix the truncation policy allows.
/// Returns the kept values and the declared length.
fn read_values(ctx: &mut ParseContext<'_>, path: &FieldPath) -> Result<(Vec<f64>, usize)> {
    let len = ctx.read_count(path, PrimitiveKind::F64.min_wire_size())?;
    let emit = ctx.emit_count(len, path)?;
    let mut out = Vec::with_capacity(emit);
    for _ in 0..len {
        let value = ctx.read_f64(path)?;
        if out.len() < emit {
            out.push(value);
        }
    }
    Ok((out, len))
}

fn emit_named(ctx: &mut ParseContext<'_>, names: &[String], values: &[f64], declared: usize) {
    if names.len() != declared {
        ctx.warn_length_mismatch(names.len(), declared);
    }
    let root = FieldPath::root(ctx.channel);
    for (i, (name, value)) in names.iter().zip(values).enumerate() {
        ctx.emit(root.named_element(name, i), *value);
    }
}
