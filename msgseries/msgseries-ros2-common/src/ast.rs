//! Struct definitions produced by the schema text parser.
//!
//! These are consumed by [`crate::type_resolver`] to produce a fully
//! resolved schema.

use std::collections::HashMap;

/// Scalar primitive types of the ROS 2 .msg format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
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
    /// Unbounded UTF-8 string.
    String,
    /// UTF-16 wide string (not decodable).
    WString,
}

/// A type expression as it appears in a .msg field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    Primitive(PrimitiveType),
    /// A named (possibly scoped) type, e.g. `["geometry_msgs", "msg", "Point"]`.
    Scoped(Vec<String>),
    /// `T[]` / `T[<=N]`.
    Sequence {
        elem: Box<TypeExpr>,
        /// `None` for unbounded; `Some(n)` for bounded.
        max_len: Option<usize>,
    },
    /// `string<=N`.
    BoundedString(usize),
    /// `wstring<=N`.
    BoundedWString(usize),
}

/// A single field inside a struct definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeExpr,
    /// `Some(n)` means the field is a fixed-length array of `n` elements.
    pub fixed_len: Option<usize>,
}

/// A fully-parsed struct definition with its qualified name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDef {
    /// Fully-qualified name segments, e.g. `["geometry_msgs", "msg", "Point"]`.
    pub full_name: Vec<String>,
    pub fields: Vec<FieldDef>,
}

/// All structs extracted from one schema text (main message plus its
/// dependency sections).
#[derive(Debug, Clone, Default)]
pub struct ParsedSection {
    pub structs: HashMap<Vec<String>, StructDef>,
}
