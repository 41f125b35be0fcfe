//! Catalog of well-known message shapes and their field-consumption routines.

mod collections;
mod datatamer;
pub(crate) mod geometry;
mod signals;

use msgseries_core::{FieldPath, RecordDef};

use crate::{
    context::ParseContext,
    error::ParseError,
    generic,
    shapes::{self, Shape, matches_record},
};

/// Routine selected for a message source on its first message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    /// Schema-driven descent for types without a dedicated handler.
    Generic,
    Header,
    Empty,
    Vector3,
    Point,
    Quaternion,
    Pose,
    PoseStamped,
    PoseWithCovariance,
    PoseWithCovarianceStamped,
    Twist,
    TwistStamped,
    TwistWithCovariance,
    TwistWithCovarianceStamped,
    Transform,
    TransformStamped,
    Imu,
    Odometry,
    DiagnosticArray,
    JointState,
    TfMessage,
    StatisticsNames,
    StatisticsValues,
    /// `*/DebugSignalNames`; `stamped` when it carries a header.
    DebugSignalNames { stamped: bool },
    /// `*/DebugSignalValues`; `stamped` when it carries a header.
    DebugSignalValues { stamped: bool },
    /// `*/TSLDefinition`
    TslDefinition,
    /// `*/TSLValues`
    TslValues,
    DataTamerSchemas,
    DataTamerSnapshot,
}

const CATALOG: &[(&str, HandlerKind, Shape)] = &[
    ("std_msgs/Header", HandlerKind::Header, Shape::Header),
    ("std_msgs/Empty", HandlerKind::Empty, shapes::EMPTY),
    ("geometry_msgs/Vector3", HandlerKind::Vector3, shapes::VECTOR3),
    ("geometry_msgs/Point", HandlerKind::Point, shapes::VECTOR3),
    ("geometry_msgs/Quaternion", HandlerKind::Quaternion, shapes::QUATERNION),
    ("geometry_msgs/Pose", HandlerKind::Pose, shapes::POSE),
    ("geometry_msgs/PoseStamped", HandlerKind::PoseStamped, shapes::POSE_STAMPED),
    (
        "geometry_msgs/PoseWithCovariance",
        HandlerKind::PoseWithCovariance,
        shapes::POSE_WITH_COVARIANCE,
    ),
    (
        "geometry_msgs/PoseWithCovarianceStamped",
        HandlerKind::PoseWithCovarianceStamped,
        shapes::POSE_WITH_COVARIANCE_STAMPED,
    ),
    ("geometry_msgs/Twist", HandlerKind::Twist, shapes::TWIST),
    ("geometry_msgs/TwistStamped", HandlerKind::TwistStamped, shapes::TWIST_STAMPED),
    (
        "geometry_msgs/TwistWithCovariance",
        HandlerKind::TwistWithCovariance,
        shapes::TWIST_WITH_COVARIANCE,
    ),
    (
        "geometry_msgs/TwistWithCovarianceStamped",
        HandlerKind::TwistWithCovarianceStamped,
        shapes::TWIST_WITH_COVARIANCE_STAMPED,
    ),
    ("geometry_msgs/Transform", HandlerKind::Transform, shapes::TRANSFORM),
    (
        "geometry_msgs/TransformStamped",
        HandlerKind::TransformStamped,
        shapes::TRANSFORM_STAMPED,
    ),
    ("sensor_msgs/Imu", HandlerKind::Imu, shapes::IMU),
    ("nav_msgs/Odometry", HandlerKind::Odometry, shapes::ODOMETRY),
    (
        "diagnostic_msgs/DiagnosticArray",
        HandlerKind::DiagnosticArray,
        shapes::DIAGNOSTIC_ARRAY,
    ),
    ("sensor_msgs/JointState", HandlerKind::JointState, shapes::JOINT_STATE),
    ("tf2_msgs/TFMessage", HandlerKind::TfMessage, shapes::TF_MESSAGE),
    (
        "pal_statistics_msgs/StatisticsNames",
        HandlerKind::StatisticsNames,
        shapes::STATISTICS_NAMES,
    ),
    (
        "pal_statistics_msgs/StatisticsValues",
        HandlerKind::StatisticsValues,
        shapes::STATISTICS_VALUES,
    ),
    (
        "data_tamer_msgs/Schemas",
        HandlerKind::DataTamerSchemas,
        shapes::DATATAMER_SCHEMAS,
    ),
    (
        "data_tamer_msgs/Snapshot",
        HandlerKind::DataTamerSnapshot,
        shapes::DATATAMER_SNAPSHOT,
    ),
];

impl HandlerKind {
    /// Pick the handler for a message whose root type is `root`.
    ///
    /// The type name selects a catalog entry (`pkg/Type` and `pkg/msg/Type`
    /// are equivalent); the entry is used only when the field names, types
    /// and order match exactly.
    pub fn select(root: &RecordDef) -> Self {
        let name = root.short_type_name();
        if let Some((_, kind, shape)) = CATALOG.iter().find(|(n, _, _)| *n == name) {
            if matches_record(shape, root) {
                return *kind;
            }
            tracing::debug!(type_name = %root.type_name, "layout differs from well-known type");
            return Self::Generic;
        }
        if name.ends_with("/DebugSignalNames") {
            if matches_record(&shapes::DEBUG_NAMES_STAMPED, root) {
                return Self::DebugSignalNames { stamped: true };
            }
            if matches_record(&shapes::DEBUG_NAMES, root) {
                return Self::DebugSignalNames { stamped: false };
            }
        }
        if name.ends_with("/DebugSignalValues") {
            if matches_record(&shapes::DEBUG_VALUES_STAMPED, root) {
                return Self::DebugSignalValues { stamped: true };
            }
            if matches_record(&shapes::DEBUG_VALUES, root) {
                return Self::DebugSignalValues { stamped: false };
            }
        }
        if name.ends_with("/TSLDefinition") && matches_record(&shapes::TSL_DEFINITION, root) {
            return Self::TslDefinition;
        }
        if name.ends_with("/TSLValues") && matches_record(&shapes::TSL_VALUES, root) {
            return Self::TslValues;
        }
        Self::Generic
    }

    pub fn is_generic(self) -> bool {
        self == Self::Generic
    }

    pub(crate) fn run(
        self,
        ctx: &mut ParseContext<'_>,
        root: &RecordDef,
        prefix: &FieldPath,
    ) -> Result<(), ParseError> {
        use geometry::*;

        match self {
            Self::Generic => generic::walk_message(ctx, root, prefix),
            Self::Header => {
                let stamp = header(ctx, prefix)?;
                ctx.found_stamp(stamp);
                Ok(())
            }
            Self::Empty => empty(ctx, prefix),
            Self::Vector3 | Self::Point => vector3(ctx, prefix),
            Self::Quaternion => quaternion(ctx, prefix),
            Self::Pose => pose(ctx, prefix),
            Self::PoseStamped => pose_stamped(ctx, prefix),
            Self::PoseWithCovariance => pose_with_covariance(ctx, prefix),
            Self::PoseWithCovarianceStamped => pose_with_covariance_stamped(ctx, prefix),
            Self::Twist => twist(ctx, prefix),
            Self::TwistStamped => twist_stamped(ctx, prefix),
            Self::TwistWithCovariance => twist_with_covariance(ctx, prefix),
            Self::TwistWithCovarianceStamped => twist_with_covariance_stamped(ctx, prefix),
            Self::Transform => transform(ctx, prefix),
            Self::TransformStamped => transform_stamped(ctx, prefix),
            Self::Imu => imu(ctx, prefix),
            Self::Odometry => odometry(ctx, prefix),
            Self::DiagnosticArray => collections::diagnostic_array(ctx, prefix),
            Self::JointState => collections::joint_state(ctx, prefix),
            Self::TfMessage => collections::tf_message(ctx, prefix),
            Self::StatisticsNames => signals::statistics_names(ctx, prefix),
            Self::StatisticsValues => signals::statistics_values(ctx, prefix),
            Self::DebugSignalNames { stamped } => signals::debug_signal_names(ctx, prefix, stamped),
            Self::DebugSignalValues { stamped } => {
                signals::debug_signal_values(ctx, prefix, stamped)
            }
            Self::TslDefinition => signals::tsl_definition(ctx, prefix),
            Self::TslValues => signals::tsl_values(ctx, prefix),
            Self::DataTamerSchemas => datatamer::schemas(ctx, prefix),
            Self::DataTamerSnapshot => datatamer::snapshot(ctx, prefix),
        }
    }
}
