//! Schema-driven descent used when no handler matches the message type.
//!
//! Every numeric leaf is emitted at the path of field names leading to it,
//! array elements at `path/<index>`. Strings are consumed but not emitted.
//! Header-shaped records emit only `stamp`, and the top-level `header`
//! provides the message time.

use msgseries_core::{DecodeError, FieldPath, FieldType, RecordDef};

use crate::{
    context::ParseContext,
    error::ParseError,
    handlers::geometry::read_header,
    shapes::header_layout,
};

type Result<T> = std::result::Result<T, ParseError>;

pub(crate) fn walk_message(
    ctx: &mut ParseContext<'_>,
    root: &RecordDef,
    prefix: &FieldPath,
) -> Result<()> {
    walk_record(ctx, root, prefix, true)
}

fn walk_record(
    ctx: &mut ParseContext<'_>,
    record: &RecordDef,
    prefix: &FieldPath,
    top_level: bool,
) -> Result<()> {
    for field in &record.fields {
        let path = prefix.child(&field.name);
        if let Some(layout) = field.ty.as_record().and_then(header_layout) {
            let stamp = read_header(ctx, &path, layout)?;
            ctx.emit(path.child("stamp"), stamp);
            if top_level && field.name == "header" {
                ctx.found_stamp(stamp);
            }
            continue;
        }
        walk_field(ctx, &field.ty, &path)?;
    }
    Ok(())
}

fn walk_field(ctx: &mut ParseContext<'_>, ty: &FieldType, path: &FieldPath) -> Result<()> {
    match ty {
        FieldType::Primitive(kind) => {
            if let Some(value) = ctx.decode(*kind, path)?.as_f64() {
                ctx.emit(path.clone(), value);
            }
            Ok(())
        }
        FieldType::Record(record) => walk_record(ctx, record, path, false),
        FieldType::FixedArray(elem, len) => {
            if elem.min_wire_size() == 0 {
                return Ok(());
            }
            for i in 0..*len {
                walk_field(ctx, elem, &path.index(i))?;
            }
            Ok(())
        }
        FieldType::Sequence { elem, max_len } => {
            let len = ctx.read_len(path)?;
            if let Some(bound) = max_len.filter(|&bound| len > bound) {
                return Err(ParseError::mismatch(
                    path,
                    DecodeError::InvalidData(format!(
                        "sequence length {len} exceeds declared bound {bound}"
                    )),
                ));
            }
            let min_size = elem.min_wire_size();
            ctx.ensure_room(len, min_size, path)?;
            let emit = ctx.emit_count(len, path)?;
            if min_size == 0 {
                // Elements without fields neither consume bytes nor emit.
                return Ok(());
            }
            for i in 0..emit {
                walk_field(ctx, elem, &path.index(i))?;
            }
            if emit < len {
                ctx.muted(|ctx| {
                    for _ in emit..len {
                        walk_field(ctx, elem, path)?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        }
    }
}
