//! Header, geometry and covariance sub-shapes, and the handlers composed
//! from them.

use msgseries_core::{FieldPath, PrimitiveKind};

use crate::{context::ParseContext, error::ParseError, shapes::HeaderLayout};

type Result<T> = std::result::Result<T, ParseError>;

/// `sec + nanosec * 1e-9` of a `builtin_interfaces/Time`.
pub(crate) fn read_time(ctx: &mut ParseContext<'_>, path: &FieldPath) -> Result<f64> {
    let sec = ctx.read_number(PrimitiveKind::I32, &path.child("sec"))?;
    let nanosec = ctx.read_number(PrimitiveKind::U32, &path.child("nanosec"))?;
    Ok(sec + nanosec * 1e-9)
}

/// Consume a header without emitting anything; returns its stamp.
pub(crate) fn read_header(
    ctx: &mut ParseContext<'_>,
    path: &FieldPath,
    layout: HeaderLayout,
) -> Result<f64> {
    if layout == HeaderLayout::SeqStamp {
        ctx.decode(PrimitiveKind::U32, &path.child("seq"))?;
    }
    let stamp = read_time(ctx, &path.child("stamp"))?;
    ctx.skip_string(&path.child("frame_id"))?;
    Ok(stamp)
}

/// Consume a header and emit its stamp at `prefix/stamp`.
pub(crate) fn header(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<f64> {
    let layout = ctx.header_layout();
    let stamp = read_header(ctx, prefix, layout)?;
    ctx.emit(prefix.child("stamp"), stamp);
    Ok(stamp)
}

/// The message's own `header` field; its stamp becomes the message time.
pub(crate) fn top_header(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    let stamp = header(ctx, &prefix.child("header"))?;
    ctx.found_stamp(stamp);
    Ok(())
}

pub(crate) fn empty(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    ctx.emit(prefix.clone(), 0.0);
    Ok(())
}

fn scalars(ctx: &mut ParseContext<'_>, prefix: &FieldPath, names: &[&str]) -> Result<Vec<f64>> {
    let mut out = Vec::with_capacity(names.len());
    for name in names {
        let path = prefix.child(name);
        let value = ctx.read_f64(&path)?;
        ctx.emit(path, value);
        out.push(value);
    }
    Ok(out)
}

/// Also used for `Point`, which has the same layout.
pub(crate) fn vector3(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    scalars(ctx, prefix, &["x", "y", "z"]).map(drop)
}

/// Emits `x`, `y`, `z`, `w` and the derived `roll`, `pitch`, `yaw` in radians.
pub(crate) fn quaternion(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    let q = scalars(ctx, prefix, &["x", "y", "z", "w"])?;
    let (roll, pitch, yaw) = quaternion_to_rpy(q[0], q[1], q[2], q[3]);
    ctx.emit(prefix.child("roll"), roll);
    ctx.emit(prefix.child("pitch"), pitch);
    ctx.emit(prefix.child("yaw"), yaw);
    Ok(())
}

fn quaternion_to_rpy(x: f64, y: f64, z: f64, w: f64) -> (f64, f64, f64) {
    let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));
    let sin_pitch = 2.0 * (w * y - z * x);
    let pitch = if sin_pitch.abs() >= 1.0 {
        std::f64::consts::FRAC_PI_2.copysign(sin_pitch)
    } else {
        sin_pitch.asin()
    };
    let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));
    (roll, pitch, yaw)
}

/// Read an `N`×`N` row-major matrix and emit its upper triangle, diagonal
/// included, as `prefix/[i;j]`.
pub(crate) fn covariance<const N: usize>(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
) -> Result<()> {
    let mut cov = Vec::with_capacity(N * N);
    for i in 0..N * N {
        cov.push(ctx.read_f64(&prefix.index(i))?);
    }
    for i in 0..N {
        for j in i..N {
            ctx.emit(prefix.child(&format!("[{i};{j}]")), cov[i * N + j]);
        }
    }
    Ok(())
}

pub(crate) fn pose(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    vector3(ctx, &prefix.child("position"))?;
    quaternion(ctx, &prefix.child("orientation"))
}

pub(crate) fn pose_stamped(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    pose(ctx, &prefix.child("pose"))
}

pub(crate) fn pose_with_covariance(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    pose(ctx, &prefix.child("pose"))?;
    covariance::<6>(ctx, &prefix.child("covariance"))
}

pub(crate) fn pose_with_covariance_stamped(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
) -> Result<()> {
    top_header(ctx, prefix)?;
    pose_with_covariance(ctx, &prefix.child("pose"))
}

pub(crate) fn twist(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    vector3(ctx, &prefix.child("linear"))?;
    vector3(ctx, &prefix.child("angular"))
}

pub(crate) fn twist_stamped(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    twist(ctx, &prefix.child("twist"))
}

pub(crate) fn twist_with_covariance(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    twist(ctx, &prefix.child("twist"))?;
    covariance::<6>(ctx, &prefix.child("covariance"))
}

pub(crate) fn twist_with_covariance_stamped(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
) -> Result<()> {
    top_header(ctx, prefix)?;
    twist_with_covariance(ctx, &prefix.child("twist"))
}

pub(crate) fn transform(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    vector3(ctx, &prefix.child("translation"))?;
    quaternion(ctx, &prefix.child("rotation"))
}

pub(crate) fn transform_stamped(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    ctx.skip_string(&prefix.child("child_frame_id"))?;
    transform(ctx, &prefix.child("transform"))
}

pub(crate) fn imu(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    quaternion(ctx, &prefix.child("orientation"))?;
    covariance::<3>(ctx, &prefix.child("orientation_covariance"))?;
    vector3(ctx, &prefix.child("angular_velocity"))?;
    covariance::<3>(ctx, &prefix.child("angular_velocity_covariance"))?;
    vector3(ctx, &prefix.child("linear_acceleration"))?;
    covariance::<3>(ctx, &prefix.child("linear_acceleration_covariance"))
}

pub(crate) fn odometry(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    ctx.skip_string(&prefix.child("child_frame_id"))?;
    pose_with_covariance(ctx, &prefix.child("pose"))?;
    twist_with_covariance(ctx, &prefix.child("twist"))
}

#[cfg(test)]
mod tests {
    use super::quaternion_to_rpy;

    #[test]
    fn identity_quaternion_has_zero_angles() {
        assert_eq!(quaternion_to_rpy(0.0, 0.0, 0.0, 1.0), (0.0, 0.0, 0.0));
    }

    #[test]
    fn yaw_of_quarter_turn_about_z() {
        let half = std::f64::consts::FRAC_PI_4;
        let (roll, pitch, yaw) = quaternion_to_rpy(0.0, 0.0, half.sin(), half.cos());
        assert!(roll.abs() < 1e-12);
        assert!(pitch.abs() < 1e-12);
        assert!((yaw - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn pitch_saturates_at_gimbal_lock() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let (_, pitch, _) = quaternion_to_rpy(0.0, s, 0.0, s);
        assert!((pitch - std::f64::consts::FRAC_PI_2).abs() < 1e-6);
    }
}
