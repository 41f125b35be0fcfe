use std::fmt::{Display, Formatter, Result};

/// Scalar kinds a [`Deserializer`](crate::Deserializer) can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    /// Length-prefixed UTF-8 string.
    String,
}

impl PrimitiveKind {
    pub fn type_name(self) -> &'static str {
        match self {
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::U8 => "u8",
            PrimitiveKind::U16 => "u16",
            PrimitiveKind::U32 => "u32",
            PrimitiveKind::U64 => "u64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::String => "string",
        }
    }

    /// Whether values of this kind are emitted as series samples.
    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveKind::String)
    }

    /// Smallest number of payload bytes a value of this kind occupies,
    /// ignoring alignment. A string costs at least its length prefix.
    pub fn min_wire_size(self) -> usize {
        match self {
            PrimitiveKind::Bool | PrimitiveKind::I8 | PrimitiveKind::U8 => 1,
            PrimitiveKind::I16 | PrimitiveKind::U16 => 2,
            PrimitiveKind::I32 | PrimitiveKind::U32 | PrimitiveKind::F32 => 4,
            PrimitiveKind::String => 4,
            PrimitiveKind::I64 | PrimitiveKind::U64 | PrimitiveKind::F64 => 8,
        }
    }
}

impl Display for PrimitiveKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        f.write_str(self.type_name())
    }
}

/// Type of a single node in the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Primitive(PrimitiveKind),
    /// Nested record with its own named children.
    Record(RecordDef),
    /// Array whose length is part of the schema.
    FixedArray(Box<FieldType>, usize),
    /// Array whose length is decoded from the payload.
    /// `max_len` is the bound declared by the schema, if any.
    Sequence {
        elem: Box<FieldType>,
        max_len: Option<usize>,
    },
}

impl FieldType {
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Primitive(kind) => kind.type_name(),
            FieldType::Record(_) => "record",
            FieldType::FixedArray(_, _) => "array",
            FieldType::Sequence { .. } => "sequence",
        }
    }

    pub fn is_primitive(&self, kind: PrimitiveKind) -> bool {
        matches!(self, FieldType::Primitive(k) if *k == kind)
    }

    pub fn as_record(&self) -> Option<&RecordDef> {
        match self {
            FieldType::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Lower bound on the payload bytes one value of this type consumes.
    ///
    /// Zero only for records without fields (e.g. `std_msgs/Empty`) and
    /// arrays of them.
    pub fn min_wire_size(&self) -> usize {
        match self {
            FieldType::Primitive(kind) => kind.min_wire_size(),
            FieldType::Record(record) => record
                .fields
                .iter()
                .fold(0usize, |acc, f| acc.saturating_add(f.ty.min_wire_size())),
            FieldType::FixedArray(elem, len) => elem.min_wire_size().saturating_mul(*len),
            FieldType::Sequence { .. } => 4,
        }
    }

    /// Element type of a [`FieldType::Sequence`].
    pub fn sequence_elem(&self) -> Option<&FieldType> {
        match self {
            FieldType::Sequence { elem, .. } => Some(elem),
            _ => None,
        }
    }
}

/// A named child of a [`RecordDef`].
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub ty: FieldType,
}

impl FieldNode {
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A record type: an ordered list of named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    /// Fully qualified type name, e.g. `geometry_msgs/msg/Pose`.
    pub type_name: String,
    pub fields: Vec<FieldNode>,
}

impl RecordDef {
    pub fn new(type_name: impl Into<String>, fields: Vec<FieldNode>) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldNode> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Type name reduced to `package/Name`.
    ///
    /// `geometry_msgs/msg/Pose`, `geometry_msgs/Pose` and
    /// `geometry_msgs::msg::Pose` all map to `geometry_msgs/Pose`.
    pub fn short_type_name(&self) -> String {
        let normalized = self.type_name.replace("::", "/");
        let parts: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();
        match parts.as_slice() {
            [] => String::new(),
            [name] => (*name).to_string(),
            [package, .., name] => format!("{package}/{name}"),
        }
    }
}

/// Schema of one message source: the root record plus its nested types.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageSchema {
    pub root: RecordDef,
}

impl MessageSchema {
    pub fn new(root: RecordDef) -> Self {
        Self { root }
    }

    pub fn name(&self) -> &str {
        &self.root.type_name
    }
}

impl Display for MessageSchema {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = super::format_schema(self)?;
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_drops_msg_namespace() {
        for name in [
            "geometry_msgs/msg/Pose",
            "geometry_msgs/Pose",
            "geometry_msgs::msg::Pose",
        ] {
            assert_eq!(RecordDef::new(name, vec![]).short_type_name(), "geometry_msgs/Pose");
        }
        assert_eq!(RecordDef::new("Pose", vec![]).short_type_name(), "Pose");
    }
}
