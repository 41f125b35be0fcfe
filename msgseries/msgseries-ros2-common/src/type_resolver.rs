//! Type resolution: converts parsed struct definitions into a self-contained
//! schema where every [`TypeExpr::Scoped`] reference points at a known struct.
//!
//! # Lookup strategy for scoped names
//!
//! 1. **Module-relative** — a single-segment name is first qualified with the
//!    package of the enclosing struct (`Point` inside `geometry_msgs::msg::Pose`
//!    becomes `geometry_msgs::msg::Point`).
//! 2. **Exact match** — look up the candidate key directly.
//! 3. **Suffix match** — find a unique key that *ends with* the candidate
//!    segments. Ambiguous suffixes do not resolve.
//! 4. **Error** — if none of the above succeeds.

use std::collections::HashMap;

use crate::{
    ast::{FieldDef, ParsedSection, PrimitiveType, StructDef, TypeExpr},
    error::Ros2Error,
};

/// A fully-resolved type.
#[derive(Debug, Clone)]
pub enum ResolvedType {
    Primitive(PrimitiveType),
    /// Key into [`ResolvedSchema::structs`].
    Struct(Vec<String>),
    Sequence {
        elem: Box<ResolvedType>,
        max_len: Option<usize>,
    },
    BoundedString(usize),
    BoundedWString(usize),
}

/// A field with its type fully resolved.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub name: String,
    pub ty: ResolvedType,
    /// `Some(n)` means this field is a fixed-length array of `n` elements.
    pub fixed_len: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ResolvedStruct {
    pub fields: Vec<ResolvedField>,
}

/// The complete, self-contained set of struct definitions for one message type.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    /// Qualified key of the top-level message type.
    pub root: Vec<String>,
    /// All reachable struct definitions, keyed by qualified name.
    pub structs: HashMap<Vec<String>, ResolvedStruct>,
}

fn builtin_time_like(name: &str) -> (Vec<String>, StructDef) {
    let full_name = vec![
        "builtin_interfaces".to_string(),
        "msg".to_string(),
        name.to_string(),
    ];
    let def = StructDef {
        full_name: full_name.clone(),
        fields: vec![
            FieldDef {
                name: "sec".to_string(),
                ty: TypeExpr::Primitive(PrimitiveType::I32),
                fixed_len: None,
            },
            FieldDef {
                name: "nanosec".to_string(),
                ty: TypeExpr::Primitive(PrimitiveType::U32),
                fixed_len: None,
            },
        ],
    };
    (full_name, def)
}

/// Ensure that `builtin_interfaces::msg::Time` and `::Duration` exist.
///
/// Recorded schemas routinely omit them because every ROS 2 installation
/// ships them.
pub fn ensure_builtin_structs(all_structs: &mut HashMap<Vec<String>, StructDef>) {
    for name in ["Time", "Duration"] {
        let (key, def) = builtin_time_like(name);
        all_structs.entry(key).or_insert(def);
    }
}

/// Resolve all field types in a single struct definition.
pub fn resolve_struct(
    def: &StructDef,
    all_structs: &HashMap<Vec<String>, StructDef>,
) -> Result<ResolvedStruct, Ros2Error> {
    let fields = def
        .fields
        .iter()
        .map(|f| {
            Ok(ResolvedField {
                name: f.name.clone(),
                ty: resolve_type_expr(&f.ty, &def.full_name, all_structs)?,
                fixed_len: f.fixed_len,
            })
        })
        .collect::<Result<Vec<_>, Ros2Error>>()?;

    Ok(ResolvedStruct { fields })
}

/// Build a [`ResolvedSchema`] from parsed structs and a selected root type.
///
/// Builtin `builtin_interfaces` structs are injected when missing.
pub fn resolve_parsed_section(
    mut parsed: ParsedSection,
    root: Vec<String>,
) -> Result<ResolvedSchema, Ros2Error> {
    ensure_builtin_structs(&mut parsed.structs);

    if !parsed.structs.contains_key(&root) {
        return Err(format!("root type '{}' not found in parsed structs", root.join("::")).into());
    }

    let mut out = HashMap::with_capacity(parsed.structs.len());
    for (name, def) in &parsed.structs {
        out.insert(name.clone(), resolve_struct(def, &parsed.structs)?);
    }

    Ok(ResolvedSchema { root, structs: out })
}

fn resolve_type_expr(
    expr: &TypeExpr,
    current_struct: &[String],
    all_structs: &HashMap<Vec<String>, StructDef>,
) -> Result<ResolvedType, Ros2Error> {
    match expr {
        TypeExpr::Primitive(p) => Ok(ResolvedType::Primitive(p.clone())),
        TypeExpr::BoundedString(n) => Ok(ResolvedType::BoundedString(*n)),
        TypeExpr::BoundedWString(n) => Ok(ResolvedType::BoundedWString(*n)),
        TypeExpr::Sequence { elem, max_len } => Ok(ResolvedType::Sequence {
            elem: Box::new(resolve_type_expr(elem, current_struct, all_structs)?),
            max_len: *max_len,
        }),
        TypeExpr::Scoped(name) => {
            let candidate = if name.len() == 1 {
                let mut scope = current_struct[..current_struct.len().saturating_sub(1)].to_vec();
                scope.push(name[0].clone());
                scope
            } else {
                name.clone()
            };

            if all_structs.contains_key(&candidate) {
                Ok(ResolvedType::Struct(candidate))
            } else if let Some(found) = find_by_suffix(all_structs, &candidate)
                .or_else(|| find_by_suffix(all_structs, name))
            {
                Ok(ResolvedType::Struct(found))
            } else {
                Err(format!(
                    "unresolved type '{}' in '{}'",
                    name.join("::"),
                    current_struct.join("::")
                )
                .into())
            }
        }
    }
}

/// Find the unique key in `map` whose suffix matches `wanted`.
fn find_by_suffix(
    map: &HashMap<Vec<String>, StructDef>,
    wanted: &[String],
) -> Option<Vec<String>> {
    let mut found: Option<Vec<String>> = None;
    for key in map.keys() {
        if key.len() < wanted.len() || key[key.len() - wanted.len()..] != *wanted {
            continue;
        }
        if found.is_some() {
            return None;
        }
        found = Some(key.clone());
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scoped(parts: &[&str]) -> TypeExpr {
        TypeExpr::Scoped(parts.iter().map(|s| s.to_string()).collect())
    }

    fn key(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn single_field(full_name: &[&str], ty: TypeExpr) -> StructDef {
        StructDef {
            full_name: key(full_name),
            fields: vec![FieldDef {
                name: "f".to_string(),
                ty,
                fixed_len: None,
            }],
        }
    }

    #[test]
    fn relative_name_resolves_in_enclosing_package() {
        let mut parsed = ParsedSection::default();
        let pose = single_field(&["geometry_msgs", "msg", "Pose"], scoped(&["Point"]));
        let point = single_field(
            &["geometry_msgs", "msg", "Point"],
            TypeExpr::Primitive(PrimitiveType::F64),
        );
        parsed.structs.insert(pose.full_name.clone(), pose);
        parsed.structs.insert(point.full_name.clone(), point);

        let resolved =
            resolve_parsed_section(parsed, key(&["geometry_msgs", "msg", "Pose"])).unwrap();
        let root = &resolved.structs[&resolved.root];
        assert!(matches!(
            &root.fields[0].ty,
            ResolvedType::Struct(k) if *k == key(&["geometry_msgs", "msg", "Point"])
        ));
    }

    #[test]
    fn time_is_injected() {
        let mut parsed = ParsedSection::default();
        let stamped = single_field(
            &["ex", "msg", "Stamped"],
            scoped(&["builtin_interfaces", "msg", "Time"]),
        );
        parsed.structs.insert(stamped.full_name.clone(), stamped);

        let resolved = resolve_parsed_section(parsed, key(&["ex", "msg", "Stamped"])).unwrap();
        assert!(
            resolved
                .structs
                .contains_key(&key(&["builtin_interfaces", "msg", "Time"]))
        );
    }

    #[test]
    fn unknown_type_is_an_error() {
        let mut parsed = ParsedSection::default();
        let def = single_field(&["ex", "msg", "A"], scoped(&["nope", "msg", "Missing"]));
        parsed.structs.insert(def.full_name.clone(), def);

        let err = resolve_parsed_section(parsed, key(&["ex", "msg", "A"])).unwrap_err();
        assert!(err.to_string().contains("unresolved type 'nope::msg::Missing'"));
    }
}
