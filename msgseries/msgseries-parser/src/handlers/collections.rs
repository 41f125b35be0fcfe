//! Handlers for messages carrying a runtime-sized list of named elements.

use msgseries_core::{FieldPath, PrimitiveKind};

use super::geometry::{read_header, top_header, transform};
use crate::{context::ParseContext, error::ParseError};

type Result<T> = std::result::Result<T, ParseError>;

/// `diagnostic_msgs/DiagnosticArray`.
///
/// Each status emits `prefix/<hardware_id>/<name>/level` plus one series per
/// key whose value parses as a number. An empty `hardware_id` is omitted.
/// A key that would land on the `level` series is dropped.
pub(crate) fn diagnostic_array(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let path = prefix.child("status");
    let len = ctx.read_count(&path, STATUS_MIN_SIZE)?;
    let emit = ctx.emit_count(len, &path)?;
    for i in 0..emit {
        diagnostic_status(ctx, prefix, &path.index(i), i)?;
    }
    ctx.muted(|ctx| {
        for i in emit..len {
            diagnostic_status(ctx, prefix, &path, i)?;
        }
        Ok(())
    })
}

// level, three string prefixes, values length.
const STATUS_MIN_SIZE: usize = 1 + 3 * 4 + 4;
const KEY_VALUE_MIN_SIZE: usize = 2 * 4;
// header (stamp, frame_id), child_frame_id, translation and rotation.
const TRANSFORM_STAMPED_MIN_SIZE: usize = 8 + 4 + 4 + 7 * 8;

fn diagnostic_status(
    ctx: &mut ParseContext<'_>,
    prefix: &FieldPath,
    path: &FieldPath,
    index: usize,
) -> Result<()> {
    let level = ctx.read_number(PrimitiveKind::U8, &path.child("level"))?;
    let name = ctx.read_string(&path.child("name"))?;
    ctx.skip_string(&path.child("message"))?;
    let hardware_id = ctx.read_string(&path.child("hardware_id"))?;

    let base = if hardware_id.trim_matches('/').is_empty() {
        prefix.clone()
    } else {
        prefix.child(&hardware_id)
    };
    let base = base.named_element(&name, index);
    let level_path = base.child("level");
    ctx.emit(level_path.clone(), level);

    let values = path.child("values");
    let len = ctx.read_count(&values, KEY_VALUE_MIN_SIZE)?;
    let emit = ctx.emit_count(len, &values)?;
    for j in 0..len {
        let key = ctx.read_string(&values.child("key"))?;
        let value = ctx.read_string(&values.child("value"))?;
        if j >= emit {
            continue;
        }
        let Ok(number) = value.trim().parse::<f64>() else {
            continue;
        };
        let target = base.named_element(&key, j);
        if target == level_path {
            tracing::debug!(path = %target, "diagnostic key shadows the status level, skipped");
            continue;
        }
        ctx.emit(target, number);
    }
    Ok(())
}

/// `sensor_msgs/JointState`: `prefix/<name>/position|velocity|effort` for
/// every index present in both the name list and the value array.
pub(crate) fn joint_state(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    top_header(ctx, prefix)?;
    let names = ctx.read_string_seq(&prefix.child("name"))?;
    for field in ["position", "velocity", "effort"] {
        let path = prefix.child(field);
        let len = ctx.read_count(&path, PrimitiveKind::F64.min_wire_size())?;
        let emit = ctx.emit_count(len, &path)?.min(names.len());
        for i in 0..len {
            let value = ctx.read_f64(&path)?;
            if i < emit {
                ctx.emit(prefix.named_element(&names[i], i).child(field), value);
            }
        }
    }
    Ok(())
}

/// `tf2_msgs/TFMessage`: each transform under `prefix/<child_frame_id>/`.
pub(crate) fn tf_message(ctx: &mut ParseContext<'_>, prefix: &FieldPath) -> Result<()> {
    let path = prefix.child("transforms");
    let len = ctx.read_count(&path, TRANSFORM_STAMPED_MIN_SIZE)?;
    let emit = ctx.emit_count(len, &path)?;
    let layout = ctx.header_layout();
    for i in 0..len {
        let item = if i < emit { path.index(i) } else { path.clone() };
        read_header(ctx, &item.child("header"), layout)?;
        let child = ctx.read_string(&item.child("child_frame_id"))?;
        let base = prefix.named_element(&child, i);
        if i < emit {
            transform(ctx, &base)?;
        } else {
            ctx.muted(|ctx| transform(ctx, &base))?;
        }
    }
    Ok(())
}
