//! Property-based tests for generic descent.

mod common;

use std::sync::Arc;

use common::CdrWriter;
use msgseries_core::{
    FieldNode, FieldType, MemorySeriesStore, MessageSchema, PrimitiveKind, RecordDef,
};
use msgseries_parser::{MessageParser, SchemaRegistry};
use msgseries_ros2_common::CdrDeserializer;
use proptest::prelude::*;

/// Schema node together with the runtime length of its sequences.
#[derive(Debug, Clone)]
enum Node {
    Leaf(PrimitiveKind),
    Record(Vec<Node>),
    Fixed(Box<Node>, usize),
    Seq(Box<Node>, usize),
}

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        Just(PrimitiveKind::Bool),
        Just(PrimitiveKind::U8),
        Just(PrimitiveKind::I16),
        Just(PrimitiveKind::I32),
        Just(PrimitiveKind::U32),
        Just(PrimitiveKind::I64),
        Just(PrimitiveKind::F32),
        Just(PrimitiveKind::F64),
        Just(PrimitiveKind::String),
    ]
    .prop_map(Node::Leaf)
}

fn node() -> impl Strategy<Value = Node> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Node::Record),
            (inner.clone(), 1usize..3).prop_map(|(n, len)| Node::Fixed(Box::new(n), len)),
            (inner, 0usize..3).prop_map(|(n, len)| Node::Seq(Box::new(n), len)),
        ]
    })
}

fn root() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(node(), 1..5)
}

fn record(children: &[Node]) -> RecordDef {
    let fields = children
        .iter()
        .enumerate()
        .map(|(i, child)| FieldNode::new(format!("f{i}"), field_type(child)))
        .collect();
    RecordDef::new("gen/msg/Record", fields)
}

fn field_type(node: &Node) -> FieldType {
    match node {
        Node::Leaf(kind) => FieldType::Primitive(*kind),
        Node::Record(children) => FieldType::Record(record(children)),
        Node::Fixed(elem, len) => FieldType::FixedArray(Box::new(field_type(elem)), *len),
        Node::Seq(elem, _) => FieldType::Sequence {
            elem: Box::new(field_type(elem)),
            max_len: None,
        },
    }
}

/// Write a payload for `node`; returns the number of numeric leaves.
fn encode(node: &Node, w: &mut CdrWriter, counter: &mut u8) -> usize {
    match node {
        Node::Leaf(kind) => {
            *counter = counter.wrapping_add(1);
            let c = *counter;
            match kind {
                PrimitiveKind::Bool => w.bool(c % 2 == 0),
                PrimitiveKind::I8 | PrimitiveKind::U8 => w.u8(c),
                PrimitiveKind::I16 | PrimitiveKind::U16 => w.i16(i16::from(c)),
                PrimitiveKind::I32 | PrimitiveKind::U32 => w.u32(u32::from(c)),
                PrimitiveKind::I64 | PrimitiveKind::U64 => w.i64(i64::from(c)),
                PrimitiveKind::F32 => w.f32(f32::from(c) * 0.5),
                PrimitiveKind::F64 => w.f64(f64::from(c) * 0.25),
                PrimitiveKind::String => {
                    w.string("s");
                    return 0;
                }
            };
            1
        }
        Node::Record(children) => children.iter().map(|c| encode(c, w, counter)).sum(),
        Node::Fixed(elem, len) => (0..*len).map(|_| encode(elem, w, counter)).sum(),
        Node::Seq(elem, len) => {
            w.seq_len(*len);
            (0..*len).map(|_| encode(elem, w, counter)).sum()
        }
    }
}

fn build(children: &[Node]) -> (Arc<MessageSchema>, Vec<u8>, usize) {
    let schema = Arc::new(MessageSchema::new(record(children)));
    let mut w = CdrWriter::new();
    let mut counter = 0;
    let leaves = children.iter().map(|c| encode(c, &mut w, &mut counter)).sum();
    (schema, w.finish(), leaves)
}

fn parse_once(schema: &Arc<MessageSchema>, raw: &[u8]) -> MemorySeriesStore {
    let mut parser = MessageParser::new(
        "/gen",
        schema.clone(),
        Box::new(CdrDeserializer::new()),
        SchemaRegistry::new(),
    );
    let mut store = MemorySeriesStore::new();
    parser
        .parse(&mut store, raw, 1.0)
        .expect("generated payload should parse");
    store
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn independent_parsers_write_identical_series(children in root()) {
        let (schema, raw, _) = build(&children);
        let a = parse_once(&schema, &raw);
        let b = parse_once(&schema, &raw);
        let a: Vec<_> = a.iter().map(|s| (s.path().to_string(), s.points().to_vec())).collect();
        let b: Vec<_> = b.iter().map(|s| (s.path().to_string(), s.points().to_vec())).collect();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn every_leaf_gets_its_own_series(children in root()) {
        let (schema, raw, leaves) = build(&children);
        let store = parse_once(&schema, &raw);
        prop_assert_eq!(store.len(), leaves);
        for series in store.iter() {
            prop_assert_eq!(series.len(), 1, "path {} written twice", series.path());
            prop_assert!(series.path().segments().all(|s| !s.is_empty()));
        }
    }
}
