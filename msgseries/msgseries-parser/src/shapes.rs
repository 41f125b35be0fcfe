//! Structural descriptions of well-known message types.
//!
//! A [`Shape`] lists the field names and types a handler consumes, in
//! payload order. Handler selection compares the schema against these
//! descriptions, so a type with the expected name but a different layout
//! falls back to generic descent.

use msgseries_core::{FieldType, PrimitiveKind, RecordDef};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Shape {
    F64,
    U8,
    I32,
    U32,
    U64,
    Str,
    /// `std_msgs/Header` in either [`HeaderLayout`].
    Header,
    Record(&'static [(&'static str, Shape)]),
    Array(&'static Shape, usize),
    Seq(&'static Shape),
}

/// Field layout of a standard header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum HeaderLayout {
    /// `stamp`, `frame_id`
    #[default]
    Stamp,
    /// `seq`, `stamp`, `frame_id`
    SeqStamp,
}

const TIME: Shape = Shape::Record(&[("sec", Shape::I32), ("nanosec", Shape::U32)]);
const HEADER_FIELDS: &[(&str, Shape)] = &[("stamp", TIME), ("frame_id", Shape::Str)];
const HEADER_SEQ_FIELDS: &[(&str, Shape)] =
    &[("seq", Shape::U32), ("stamp", TIME), ("frame_id", Shape::Str)];

const COV3: Shape = Shape::Array(&Shape::F64, 9);
const COV6: Shape = Shape::Array(&Shape::F64, 36);

pub(crate) const EMPTY: Shape = Shape::Record(&[]);
pub(crate) const VECTOR3: Shape =
    Shape::Record(&[("x", Shape::F64), ("y", Shape::F64), ("z", Shape::F64)]);
pub(crate) const QUATERNION: Shape = Shape::Record(&[
    ("x", Shape::F64),
    ("y", Shape::F64),
    ("z", Shape::F64),
    ("w", Shape::F64),
]);

pub(crate) const POSE: Shape = Shape::Record(&[("position", VECTOR3), ("orientation", QUATERNION)]);
pub(crate) const POSE_STAMPED: Shape = Shape::Record(&[("header", Shape::Header), ("pose", POSE)]);
pub(crate) const POSE_WITH_COVARIANCE: Shape =
    Shape::Record(&[("pose", POSE), ("covariance", COV6)]);
pub(crate) const POSE_WITH_COVARIANCE_STAMPED: Shape =
    Shape::Record(&[("header", Shape::Header), ("pose", POSE_WITH_COVARIANCE)]);

pub(crate) const TWIST: Shape = Shape::Record(&[("linear", VECTOR3), ("angular", VECTOR3)]);
pub(crate) const TWIST_STAMPED: Shape =
    Shape::Record(&[("header", Shape::Header), ("twist", TWIST)]);
pub(crate) const TWIST_WITH_COVARIANCE: Shape =
    Shape::Record(&[("twist", TWIST), ("covariance", COV6)]);
pub(crate) const TWIST_WITH_COVARIANCE_STAMPED: Shape =
    Shape::Record(&[("header", Shape::Header), ("twist", TWIST_WITH_COVARIANCE)]);

pub(crate) const TRANSFORM: Shape =
    Shape::Record(&[("translation", VECTOR3), ("rotation", QUATERNION)]);
pub(crate) const TRANSFORM_STAMPED: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("child_frame_id", Shape::Str),
    ("transform", TRANSFORM),
]);

pub(crate) const IMU: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("orientation", QUATERNION),
    ("orientation_covariance", COV3),
    ("angular_velocity", VECTOR3),
    ("angular_velocity_covariance", COV3),
    ("linear_acceleration", VECTOR3),
    ("linear_acceleration_covariance", COV3),
]);

pub(crate) const ODOMETRY: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("child_frame_id", Shape::Str),
    ("pose", POSE_WITH_COVARIANCE),
    ("twist", TWIST_WITH_COVARIANCE),
]);

const KEY_VALUE: Shape = Shape::Record(&[("key", Shape::Str), ("value", Shape::Str)]);
const DIAGNOSTIC_STATUS: Shape = Shape::Record(&[
    ("level", Shape::U8),
    ("name", Shape::Str),
    ("message", Shape::Str),
    ("hardware_id", Shape::Str),
    ("values", Shape::Seq(&KEY_VALUE)),
]);
pub(crate) const DIAGNOSTIC_ARRAY: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("status", Shape::Seq(&DIAGNOSTIC_STATUS)),
]);

pub(crate) const JOINT_STATE: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("name", Shape::Seq(&Shape::Str)),
    ("position", Shape::Seq(&Shape::F64)),
    ("velocity", Shape::Seq(&Shape::F64)),
    ("effort", Shape::Seq(&Shape::F64)),
]);

pub(crate) const TF_MESSAGE: Shape =
    Shape::Record(&[("transforms", Shape::Seq(&TRANSFORM_STAMPED))]);

pub(crate) const STATISTICS_NAMES: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("names", Shape::Seq(&Shape::Str)),
    ("names_version", Shape::U32),
]);
pub(crate) const STATISTICS_VALUES: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("values", Shape::Seq(&Shape::F64)),
    ("names_version", Shape::U32),
]);

pub(crate) const DEBUG_NAMES: Shape = Shape::Record(&[("names", Shape::Seq(&Shape::Str))]);
pub(crate) const DEBUG_NAMES_STAMPED: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("names", Shape::Seq(&Shape::Str)),
]);
pub(crate) const DEBUG_VALUES: Shape = Shape::Record(&[("values", Shape::Seq(&Shape::F64))]);
pub(crate) const DEBUG_VALUES_STAMPED: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("values", Shape::Seq(&Shape::F64)),
]);

pub(crate) const TSL_DEFINITION: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("definition_hash", Shape::U32),
    ("field_names", Shape::Seq(&Shape::Str)),
]);
pub(crate) const TSL_VALUES: Shape = Shape::Record(&[
    ("header", Shape::Header),
    ("definition_hash", Shape::U32),
    ("values", Shape::Seq(&Shape::F64)),
]);

const DATATAMER_SCHEMA: Shape = Shape::Record(&[
    ("hash", Shape::U64),
    ("channel_name", Shape::Str),
    ("schema_text", Shape::Str),
]);
pub(crate) const DATATAMER_SCHEMAS: Shape =
    Shape::Record(&[("schemas", Shape::Seq(&DATATAMER_SCHEMA))]);
pub(crate) const DATATAMER_SNAPSHOT: Shape = Shape::Record(&[
    ("timestamp_nsec", Shape::U64),
    ("schema_hash", Shape::U64),
    ("active_mask", Shape::Seq(&Shape::U8)),
    ("payload", Shape::Seq(&Shape::U8)),
]);

/// Whether `record` has exactly the fields of `shape`.
pub(crate) fn matches_record(shape: &Shape, record: &RecordDef) -> bool {
    match shape {
        Shape::Header => header_layout(record).is_some(),
        Shape::Record(fields) => fields_match(fields, record),
        _ => false,
    }
}

fn matches(shape: &Shape, ty: &FieldType) -> bool {
    match (shape, ty) {
        (Shape::F64, t) => t.is_primitive(PrimitiveKind::F64),
        (Shape::U8, t) => t.is_primitive(PrimitiveKind::U8),
        (Shape::I32, t) => t.is_primitive(PrimitiveKind::I32),
        (Shape::U32, t) => t.is_primitive(PrimitiveKind::U32),
        (Shape::U64, t) => t.is_primitive(PrimitiveKind::U64),
        (Shape::Str, t) => t.is_primitive(PrimitiveKind::String),
        (Shape::Header | Shape::Record(_), FieldType::Record(record)) => {
            matches_record(shape, record)
        }
        (Shape::Array(elem, n), FieldType::FixedArray(t, m)) => n == m && matches(elem, t),
        (Shape::Seq(elem), FieldType::Sequence { elem: t, .. }) => matches(elem, t),
        _ => false,
    }
}

fn fields_match(fields: &[(&str, Shape)], record: &RecordDef) -> bool {
    fields.len() == record.fields.len()
        && fields
            .iter()
            .zip(&record.fields)
            .all(|((name, shape), field)| *name == field.name && matches(shape, &field.ty))
}

/// Layout of `record` if it is a standard header.
pub(crate) fn header_layout(record: &RecordDef) -> Option<HeaderLayout> {
    if fields_match(HEADER_FIELDS, record) {
        Some(HeaderLayout::Stamp)
    } else if fields_match(HEADER_SEQ_FIELDS, record) {
        Some(HeaderLayout::SeqStamp)
    } else {
        None
    }
}

/// Layout of the first header found in `record`, searching depth-first.
pub(crate) fn find_header_layout(record: &RecordDef) -> Option<HeaderLayout> {
    header_layout(record).or_else(|| {
        record
            .fields
            .iter()
            .find_map(|field| find_in_type(&field.ty))
    })
}

fn find_in_type(ty: &FieldType) -> Option<HeaderLayout> {
    match ty {
        FieldType::Primitive(_) => None,
        FieldType::Record(record) => find_header_layout(record),
        FieldType::FixedArray(elem, _) | FieldType::Sequence { elem, .. } => find_in_type(elem),
    }
}
