//! Conversion from a [`ResolvedSchema`] to the field tree walked by parsers.
//!
//! | Resolved type          | [`FieldType`]                 |
//! |------------------------|-------------------------------|
//! | Primitive              | `Primitive(kind)`             |
//! | Struct                 | `Record(RecordDef)`           |
//! | Sequence               | `Sequence { elem, max_len }`  |
//! | BoundedString          | `Primitive(String)`           |
//! | Fixed-length field     | `FixedArray(elem, n)`         |
//!
//! Wide strings have no CDR decoding and are rejected.

use msgseries_core::{FieldNode, FieldType, MessageSchema, PrimitiveKind, RecordDef};

use crate::{
    ast::PrimitiveType,
    error::Ros2Error,
    type_resolver::{ResolvedField, ResolvedSchema, ResolvedType},
};

/// Upper bound on record nesting; deeper trees indicate a cyclic definition.
const MAX_DEPTH: usize = 64;

/// Expand the root struct of `schema` into a [`MessageSchema`].
pub fn resolved_schema_to_message_schema(
    schema: &ResolvedSchema,
) -> Result<MessageSchema, Ros2Error> {
    Ok(MessageSchema::new(record_def(schema, &schema.root, 0)?))
}

fn record_def(
    schema: &ResolvedSchema,
    name: &[String],
    depth: usize,
) -> Result<RecordDef, Ros2Error> {
    if depth > MAX_DEPTH {
        return Err(format!("type nesting too deep at '{}'", name.join("/")).into());
    }
    let st = schema
        .structs
        .get(name)
        .ok_or_else(|| format!("struct '{}' not found", name.join("/")))?;
    let fields = st
        .fields
        .iter()
        .map(|f| field_node(schema, f, depth))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RecordDef::new(name.join("/"), fields))
}

fn field_node(
    schema: &ResolvedSchema,
    field: &ResolvedField,
    depth: usize,
) -> Result<FieldNode, Ros2Error> {
    let inner = field_type(schema, &field.ty, depth)
        .map_err(|e| Ros2Error(format!("field '{}': {e}", field.name)))?;
    let ty = match field.fixed_len {
        Some(n) => FieldType::FixedArray(Box::new(inner), n),
        None => inner,
    };
    Ok(FieldNode::new(&field.name, ty))
}

fn field_type(
    schema: &ResolvedSchema,
    ty: &ResolvedType,
    depth: usize,
) -> Result<FieldType, Ros2Error> {
    Ok(match ty {
        ResolvedType::Primitive(p) => FieldType::Primitive(primitive_kind(p)?),
        ResolvedType::Struct(name) => FieldType::Record(record_def(schema, name, depth + 1)?),
        ResolvedType::Sequence { elem, max_len } => FieldType::Sequence {
            elem: Box::new(field_type(schema, elem, depth)?),
            max_len: *max_len,
        },
        ResolvedType::BoundedString(_) => FieldType::Primitive(PrimitiveKind::String),
        ResolvedType::BoundedWString(_) => return Err("wstring is not supported".into()),
    })
}

fn primitive_kind(p: &PrimitiveType) -> Result<PrimitiveKind, Ros2Error> {
    Ok(match p {
        PrimitiveType::Bool => PrimitiveKind::Bool,
        PrimitiveType::I8 => PrimitiveKind::I8,
        PrimitiveType::I16 => PrimitiveKind::I16,
        PrimitiveType::I32 => PrimitiveKind::I32,
        PrimitiveType::I64 => PrimitiveKind::I64,
        PrimitiveType::U8 => PrimitiveKind::U8,
        PrimitiveType::U16 => PrimitiveKind::U16,
        PrimitiveType::U32 => PrimitiveKind::U32,
        PrimitiveType::U64 => PrimitiveKind::U64,
        PrimitiveType::F32 => PrimitiveKind::F32,
        PrimitiveType::F64 => PrimitiveKind::F64,
        PrimitiveType::String => PrimitiveKind::String,
        PrimitiveType::WString => return Err("wstring is not supported".into()),
    })
}
