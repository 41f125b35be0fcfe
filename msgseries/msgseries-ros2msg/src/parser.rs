//! Conversion from `re_ros_msg`'s AST to the shared [`StructDef`] representation.
//!
//! Constants are parsed by `re_ros_msg` but carry no payload bytes, so they
//! are dropped here.

use msgseries_ros2_common::{FieldDef, PrimitiveType, Ros2Error, StructDef, TypeExpr};
use re_ros_msg::{
    MessageSchema,
    message_spec::{ArraySize, BuiltInType, ComplexType, Field, MessageSpecification, Type},
};

/// Parse one .msg definition named `schema_name` into a [`StructDef`].
pub fn parse_msg(schema_name: &str, msg_text: &str) -> Result<StructDef, Ros2Error> {
    let schema = MessageSchema::parse(schema_name, msg_text)
        .map_err(|e| Ros2Error(format!("failed to parse msg schema '{schema_name}': {e}")))?;
    let full_name = parse_schema_name(schema_name)?;
    convert_to_struct_def(full_name, schema.spec)
}

/// `geometry_msgs/msg/Point` and `geometry_msgs/Point` both become
/// `["geometry_msgs", "msg", "Point"]`.
pub fn parse_schema_name(name: &str) -> Result<Vec<String>, Ros2Error> {
    let parts: Vec<&str> = name.trim().split('/').collect();
    match parts.as_slice() {
        [package, kind, ty] if !package.is_empty() && !ty.is_empty() => {
            Ok(vec![package.to_string(), kind.to_string(), ty.to_string()])
        }
        [package, ty] if !package.is_empty() && !ty.is_empty() => {
            Ok(vec![package.to_string(), "msg".to_string(), ty.to_string()])
        }
        _ => Err(format!("invalid schema name format: {name}").into()),
    }
}

fn convert_to_struct_def(
    full_name: Vec<String>,
    spec: MessageSpecification,
) -> Result<StructDef, Ros2Error> {
    let fields = spec
        .fields
        .into_iter()
        .map(convert_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(StructDef { full_name, fields })
}

fn convert_field(field: Field) -> Result<FieldDef, Ros2Error> {
    let (ty, fixed_len) = convert_type(&field.ty)?;
    Ok(FieldDef {
        name: field.name,
        ty,
        fixed_len,
    })
}

fn convert_type(ty: &Type) -> Result<(TypeExpr, Option<usize>), Ros2Error> {
    match ty {
        Type::BuiltIn(builtin) => Ok((convert_builtin_type(builtin), None)),
        Type::Complex(complex) => Ok((TypeExpr::Scoped(convert_complex_type(complex)), None)),
        Type::Array { ty: elem_ty, size } => {
            let (elem, elem_fixed) = convert_type(elem_ty)?;
            if elem_fixed.is_some() {
                return Err("nested fixed arrays are not supported in ROS2".into());
            }
            Ok(match size {
                ArraySize::Fixed(n) => (elem, Some(*n)),
                ArraySize::Unbounded => (
                    TypeExpr::Sequence {
                        elem: Box::new(elem),
                        max_len: None,
                    },
                    None,
                ),
                ArraySize::Bounded(n) => (
                    TypeExpr::Sequence {
                        elem: Box::new(elem),
                        max_len: Some(*n),
                    },
                    None,
                ),
            })
        }
    }
}

fn convert_builtin_type(ty: &BuiltInType) -> TypeExpr {
    let prim = match ty {
        BuiltInType::Bool => PrimitiveType::Bool,
        BuiltInType::Byte | BuiltInType::Char | BuiltInType::UInt8 => PrimitiveType::U8,
        BuiltInType::Int8 => PrimitiveType::I8,
        BuiltInType::Int16 => PrimitiveType::I16,
        BuiltInType::UInt16 => PrimitiveType::U16,
        BuiltInType::Int32 => PrimitiveType::I32,
        BuiltInType::UInt32 => PrimitiveType::U32,
        BuiltInType::Int64 => PrimitiveType::I64,
        BuiltInType::UInt64 => PrimitiveType::U64,
        BuiltInType::Float32 => PrimitiveType::F32,
        BuiltInType::Float64 => PrimitiveType::F64,
        BuiltInType::String(None) => PrimitiveType::String,
        BuiltInType::String(Some(n)) => return TypeExpr::BoundedString(*n),
        BuiltInType::WString(None) => PrimitiveType::WString,
        BuiltInType::WString(Some(n)) => return TypeExpr::BoundedWString(*n),
    };
    TypeExpr::Primitive(prim)
}

fn convert_complex_type(ty: &ComplexType) -> Vec<String> {
    match ty {
        ComplexType::Absolute { package, name } => {
            vec![package.clone(), "msg".to_string(), name.clone()]
        }
        // A bare `Header` always means the standard header.
        ComplexType::Relative { name } if name == "Header" => {
            vec!["std_msgs".to_string(), "msg".to_string(), name.clone()]
        }
        ComplexType::Relative { name } => vec![name.clone()],
    }
}
