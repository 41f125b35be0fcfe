#![allow(dead_code)]

use std::sync::Arc;

use msgseries_core::{MemorySeriesStore, MessageSchema};
use msgseries_parser::{MessageParser, SchemaRegistry};
use msgseries_ros2_common::CdrDeserializer;
use msgseries_ros2msg::resolve_message_schema;

pub const SEPARATOR: &str =
    "================================================================================";

pub const HEADER: &str = "MSG: std_msgs/Header\nbuiltin_interfaces/Time stamp\nstring frame_id";
pub const VECTOR3: &str = "MSG: geometry_msgs/Vector3\nfloat64 x\nfloat64 y\nfloat64 z";
pub const POINT: &str = "MSG: geometry_msgs/Point\nfloat64 x\nfloat64 y\nfloat64 z";
pub const QUATERNION: &str =
    "MSG: geometry_msgs/Quaternion\nfloat64 x\nfloat64 y\nfloat64 z\nfloat64 w";
pub const POSE: &str = "MSG: geometry_msgs/Pose\nPoint position\nQuaternion orientation";
pub const TRANSFORM: &str =
    "MSG: geometry_msgs/Transform\nVector3 translation\nQuaternion rotation";
pub const TRANSFORM_STAMPED: &str = "MSG: geometry_msgs/TransformStamped\n\
                                     std_msgs/Header header\n\
                                     string child_frame_id\n\
                                     Transform transform";

/// Join a main definition and its `MSG:` dependency sections.
pub fn msg(main: &str, deps: &[&str]) -> String {
    let mut out = main.to_string();
    for dep in deps {
        out.push('\n');
        out.push_str(SEPARATOR);
        out.push('\n');
        out.push_str(dep);
    }
    out.push('\n');
    out
}

pub fn schema(name: &str, text: &str) -> Arc<MessageSchema> {
    Arc::new(resolve_message_schema(name, text.as_bytes()).expect("schema should resolve"))
}

pub fn parser(topic: &str, name: &str, text: &str, registry: &SchemaRegistry) -> MessageParser {
    MessageParser::new(
        topic,
        schema(name, text),
        Box::new(CdrDeserializer::new()),
        registry.clone(),
    )
}

/// Values of the series at `path`, or an empty list when it does not exist.
pub fn values(store: &MemorySeriesStore, path: &str) -> Vec<f64> {
    store
        .get(path)
        .map(|s| s.values().collect())
        .unwrap_or_default()
}

pub fn sorted_paths(store: &MemorySeriesStore) -> Vec<String> {
    let mut paths: Vec<String> = store.paths().map(str::to_string).collect();
    paths.sort();
    paths
}

/// Little-endian CDR payload builder. Alignment is relative to the end of
/// the encapsulation header.
pub struct CdrWriter {
    buf: Vec<u8>,
}

impl Default for CdrWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CdrWriter {
    pub fn new() -> Self {
        Self {
            buf: vec![0x00, 0x01, 0x00, 0x00],
        }
    }

    fn align(&mut self, n: usize) {
        let offset = self.buf.len() - 4;
        let pad = (n - offset % n) % n;
        self.buf.extend(std::iter::repeat_n(0, pad));
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(u8::from(v))
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.align(2);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.align(8);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn u64(&mut self, v: u64) -> &mut Self {
        self.align(8);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    /// `uint8[]` with its length prefix.
    pub fn bytes(&mut self, bs: &[u8]) -> &mut Self {
        self.seq_len(bs.len());
        self.buf.extend_from_slice(bs);
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.align(4);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.align(8);
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }

    pub fn f64s(&mut self, vs: &[f64]) -> &mut Self {
        for v in vs {
            self.f64(*v);
        }
        self
    }

    /// Sequence length prefix.
    pub fn seq_len(&mut self, n: usize) -> &mut Self {
        self.u32(n as u32)
    }

    pub fn string(&mut self, s: &str) -> &mut Self {
        self.u32((s.len() + 1) as u32);
        self.buf.extend_from_slice(s.as_bytes());
        self.buf.push(0);
        self
    }

    pub fn strings(&mut self, ss: &[&str]) -> &mut Self {
        self.seq_len(ss.len());
        for s in ss {
            self.string(s);
        }
        self
    }

    /// `std_msgs/Header` with the given stamp and frame.
    pub fn header(&mut self, sec: i32, nanosec: u32, frame_id: &str) -> &mut Self {
        self.i32(sec).u32(nanosec).string(frame_id)
    }

    pub fn finish(&self) -> Vec<u8> {
        self.buf.clone()
    }
}
