mod common;

use std::time::{Duration, Instant};

use common::{
    CdrWriter, HEADER, POINT, QUATERNION, TRANSFORM, TRANSFORM_STAMPED, VECTOR3, msg, parser,
    sorted_paths, values,
};
use msgseries_core::{DecodeError, MemorySeriesStore};
use msgseries_parser::{ParseError, SchemaRegistry, TruncationPolicy};

const ARRAY_THEN_FIELD: &str = "float64[] data\nint32 after\n";

fn ten_then_42() -> Vec<u8> {
    let data: Vec<f64> = (0..10).map(f64::from).collect();
    CdrWriter::new().seq_len(10).f64s(&data).i32(42).finish()
}

#[test]
fn clamp_emits_prefix_and_stays_aligned() {
    let mut p = parser("/t", "ex/msg/Arr", ARRAY_THEN_FIELD, &SchemaRegistry::new());
    p.set_large_arrays_policy(true, 5);

    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &ten_then_42(), 0.0).unwrap();

    assert_eq!(
        sorted_paths(&store),
        ["t/after", "t/data/0", "t/data/1", "t/data/2", "t/data/3", "t/data/4"]
    );
    assert_eq!(values(&store, "t/data/4"), [4.0]);
    assert_eq!(values(&store, "t/after"), [42.0]);
}

#[test]
fn strict_check_rejects_oversized_array() {
    let mut p = parser("/t", "ex/msg/Arr", ARRAY_THEN_FIELD, &SchemaRegistry::new());
    p.set_large_arrays_policy(false, 5);

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &ten_then_42(), 0.0).unwrap_err();

    assert_eq!(
        err,
        ParseError::OversizedArray {
            path: "t/data".to_string(),
            len: 10,
            max: 5
        }
    );
    assert!(store.paths().all(|p| !p.starts_with("t/data")));
}

#[test]
fn permissive_emits_everything() {
    let mut p = parser("/t", "ex/msg/Arr", ARRAY_THEN_FIELD, &SchemaRegistry::new());
    p.set_large_arrays_policy(false, 5);
    p.enable_truncation_check(false);

    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &ten_then_42(), 0.0).unwrap();

    assert_eq!(store.len(), 11);
    assert_eq!(values(&store, "t/data/9"), [9.0]);
    assert_eq!(values(&store, "t/after"), [42.0]);
}

#[test]
fn policy_change_applies_to_next_message() {
    let mut p = parser("/t", "ex/msg/Arr", ARRAY_THEN_FIELD, &SchemaRegistry::new());
    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &ten_then_42(), 0.0).unwrap();
    assert_eq!(store.len(), 11);

    p.set_large_arrays_policy(false, 3);
    assert!(p.parse(&mut store, &ten_then_42(), 1.0).is_err());
    assert_eq!(p.options().truncation, TruncationPolicy::strict(3));

    p.enable_truncation_check(false);
    p.parse(&mut store, &ten_then_42(), 2.0).unwrap();
    assert_eq!(values(&store, "t/after"), [42.0, 42.0]);
}

#[test]
fn clamped_records_are_consumed() {
    let text = msg("geometry_msgs/Point[] points\nint32 after", &[POINT]);
    let mut p = parser("/t", "ex/msg/Pts", &text, &SchemaRegistry::new());
    p.set_large_arrays_policy(true, 1);
    let raw = CdrWriter::new()
        .seq_len(3)
        .f64s(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0])
        .i32(-1)
        .finish();

    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &raw, 0.0).unwrap();
    assert_eq!(
        sorted_paths(&store),
        ["t/after", "t/points/0/x", "t/points/0/y", "t/points/0/z"]
    );
    assert_eq!(values(&store, "t/after"), [-1.0]);
}

#[test]
fn joint_state_arrays_follow_policy() {
    let text = msg(
        "std_msgs/Header header\n\
         string[] name\n\
         float64[] position\n\
         float64[] velocity\n\
         float64[] effort",
        &[HEADER],
    );
    let mut p = parser("/joints", "sensor_msgs/msg/JointState", &text, &SchemaRegistry::new());
    p.set_large_arrays_policy(true, 2);
    let raw = CdrWriter::new()
        .header(0, 0, "")
        .strings(&["a", "b", "c"])
        .seq_len(3)
        .f64s(&[1.0, 2.0, 3.0])
        .seq_len(0)
        .seq_len(3)
        .f64s(&[4.0, 5.0, 6.0])
        .finish();

    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &raw, 0.0).unwrap();
    assert_eq!(values(&store, "joints/b/position"), [2.0]);
    assert_eq!(values(&store, "joints/b/effort"), [5.0]);
    assert!(store.get("joints/c/position").is_none());
    assert!(store.get("joints/c/effort").is_none());
}

#[test]
fn huge_sequence_of_empty_records_is_skipped() {
    let text = msg("std_msgs/Empty[] items\nint32 after", &["MSG: std_msgs/Empty"]);
    let mut p = parser("/t", "ex/msg/Beats", &text, &SchemaRegistry::new());
    let raw = CdrWriter::new().seq_len(50_000_000).i32(7).finish();

    let started = Instant::now();
    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &raw, 0.0).unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(sorted_paths(&store), ["t/after"]);
    assert_eq!(values(&store, "t/after"), [7.0]);
}

#[test]
fn declared_length_beyond_payload_fails_before_descent() {
    let text = msg("geometry_msgs/Point[] points\nint32 after", &[POINT]);
    let mut p = parser("/t", "ex/msg/Pts", &text, &SchemaRegistry::new());
    p.set_large_arrays_policy(true, 1);
    let raw = CdrWriter::new()
        .seq_len(4_000_000_000)
        .f64s(&[1.0, 2.0, 3.0])
        .i32(7)
        .finish();

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &raw, 0.0).unwrap_err();

    match err {
        ParseError::SchemaMismatch {
            path,
            source: DecodeError::UnexpectedEof { needed, remaining },
        } => {
            assert_eq!(path, "t/points");
            assert_eq!(needed, 4_000_000_000 * 24);
            assert!(remaining < 40);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(store.is_empty());
}

#[test]
fn handler_arrays_check_remaining_bytes() {
    let registry = SchemaRegistry::new();
    registry.register("dbg", vec!["a".to_string()]);
    let mut p = parser(
        "/dbg/values",
        "tum_msgs/msg/DebugSignalValues",
        "float64[] values\n",
        &registry,
    );
    let raw = CdrWriter::new().seq_len(1_000_000).f64(1.0).finish();

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &raw, 0.0).unwrap_err();
    assert!(matches!(
        err,
        ParseError::SchemaMismatch { ref path, source: DecodeError::UnexpectedEof { .. } }
            if path == "dbg/values/values"
    ));
}

fn tf_text() -> String {
    msg(
        "geometry_msgs/TransformStamped[] transforms",
        &[TRANSFORM_STAMPED, HEADER, TRANSFORM, VECTOR3, QUATERNION],
    )
}

fn diagnostics_text() -> String {
    msg(
        "std_msgs/Header header\nDiagnosticStatus[] status",
        &[
            HEADER,
            "MSG: diagnostic_msgs/DiagnosticStatus\n\
             byte level\n\
             string name\n\
             string message\n\
             string hardware_id\n\
             KeyValue[] values",
            "MSG: diagnostic_msgs/KeyValue\nstring key\nstring value",
        ],
    )
}

#[test]
fn strict_check_rejects_oversized_diagnostic_status() {
    let mut p = parser(
        "/diagnostics",
        "diagnostic_msgs/msg/DiagnosticArray",
        &diagnostics_text(),
        &SchemaRegistry::new(),
    );
    p.set_large_arrays_policy(false, 1);
    let mut raw = CdrWriter::new();
    raw.header(0, 0, "").seq_len(2);
    for name in ["a", "b"] {
        raw.u8(0).string(name).string("").string("").seq_len(0);
    }

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &raw.finish(), 0.0).unwrap_err();
    assert_eq!(
        err,
        ParseError::OversizedArray {
            path: "diagnostics/status".to_string(),
            len: 2,
            max: 1
        }
    );
}

#[test]
fn strict_check_rejects_oversized_transforms() {
    let mut p = parser("/tf", "tf2_msgs/msg/TFMessage", &tf_text(), &SchemaRegistry::new());
    p.set_large_arrays_policy(false, 1);
    let mut raw = CdrWriter::new();
    raw.seq_len(2);
    for child in ["a", "b"] {
        raw.header(0, 0, "odom")
            .string(child)
            .f64s(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &raw.finish(), 0.0).unwrap_err();
    assert_eq!(
        err,
        ParseError::OversizedArray {
            path: "tf/transforms".to_string(),
            len: 2,
            max: 1
        }
    );
}

#[test]
fn clamped_transforms_keep_later_fields_aligned() {
    let mut p = parser("/tf", "tf2_msgs/msg/TFMessage", &tf_text(), &SchemaRegistry::new());
    p.set_large_arrays_policy(true, 1);
    let mut raw = CdrWriter::new();
    raw.seq_len(3);
    for (i, child) in ["a", "b", "c"].into_iter().enumerate() {
        raw.header(0, 0, "odom")
            .string(child)
            .f64s(&[i as f64, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    let mut store = MemorySeriesStore::new();
    p.parse(&mut store, &raw.finish(), 0.0).unwrap();
    assert_eq!(values(&store, "tf/a/translation/x"), [0.0]);
    assert!(store.paths().all(|p| p.starts_with("tf/a/")));
}

#[test]
fn strict_check_rejects_oversized_debug_values() {
    let registry = SchemaRegistry::new();
    registry.register("dbg", vec!["a".to_string(), "b".to_string(), "c".to_string()]);
    let mut p = parser(
        "/dbg/values",
        "tum_msgs/msg/DebugSignalValues",
        "float64[] values\n",
        &registry,
    );
    p.set_large_arrays_policy(false, 2);
    let raw = CdrWriter::new().seq_len(3).f64s(&[1.0, 2.0, 3.0]).finish();

    let mut store = MemorySeriesStore::new();
    let err = p.parse(&mut store, &raw, 0.0).unwrap_err();
    assert_eq!(
        err,
        ParseError::OversizedArray {
            path: "dbg/values/values".to_string(),
            len: 3,
            max: 2
        }
    );
    assert!(store.is_empty());
}
