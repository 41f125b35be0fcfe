use std::fmt::{Error, Result, Write as _};

use super::{FieldType, MessageSchema, RecordDef};

/// Format a schema tree in a readable, indented style.
///
/// Primitive fields take one line; records, arrays and sequences open a block
/// whose children are indented by four spaces.
pub fn format_schema(schema: &MessageSchema) -> std::result::Result<String, Error> {
    let mut out = String::new();
    writeln!(out, "{}:", schema.root.type_name)?;
    format_record(&schema.root, 4, &mut out)?;
    Ok(out)
}

fn format_record(record: &RecordDef, indent: usize, out: &mut String) -> Result {
    for field in &record.fields {
        format_labeled_type(&field.name, &field.ty, indent, out)?;
    }
    Ok(())
}

fn format_labeled_type(label: &str, ty: &FieldType, indent: usize, out: &mut String) -> Result {
    let pad = " ".repeat(indent);
    match ty {
        FieldType::Primitive(kind) => writeln!(out, "{pad}{label}: {kind}"),
        FieldType::Record(record) => {
            writeln!(out, "{pad}{label}: {}", record.type_name)?;
            format_record(record, indent + 4, out)
        }
        FieldType::FixedArray(elem, size) => {
            writeln!(out, "{pad}{label}: array[{size}]")?;
            format_labeled_type("item", elem, indent + 4, out)
        }
        FieldType::Sequence { elem, max_len } => {
            match max_len {
                Some(max) => writeln!(out, "{pad}{label}: sequence[<={max}]")?,
                None => writeln!(out, "{pad}{label}: sequence")?,
            }
            format_labeled_type("item", elem, indent + 4, out)
        }
    }
}
