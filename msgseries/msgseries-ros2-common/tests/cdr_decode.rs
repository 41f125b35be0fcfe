use msgseries_core::{DecodeError, Deserializer, PrimitiveKind, Value};
use msgseries_ros2_common::CdrDeserializer;

// ── helpers ──────────────────────────────────────────────────────────────────

/// Pad `buf` to the next `n`-byte boundary, relative to the payload start.
fn align(buf: &mut Vec<u8>, n: usize) {
    let pad = (n - (buf.len() % n)) % n;
    buf.extend(std::iter::repeat_n(0, pad));
}

/// Build a minimal CDR buffer: 4-byte little-endian encapsulation header + payload.
fn cdr_with_payload(payload: Vec<u8>) -> Vec<u8> {
    let mut buf = vec![0x00, 0x01, 0x00, 0x00];
    buf.extend(payload);
    buf
}

fn push_string(buf: &mut Vec<u8>, s: &str) {
    align(buf, 4);
    buf.extend_from_slice(&((s.len() + 1) as u32).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
    buf.push(0);
}

fn decoder(data: &[u8]) -> CdrDeserializer {
    let mut de = CdrDeserializer::new();
    de.init(data).expect("init should succeed");
    de
}

// ── tests ────────────────────────────────────────────────────────────────────

#[test]
fn decodes_f64_with_encapsulation_relative_alignment() {
    let mut payload = vec![7u8];
    align(&mut payload, 8);
    payload.extend_from_slice(&1.25f64.to_le_bytes());

    let mut de = decoder(&cdr_with_payload(payload));
    assert_eq!(de.decode(PrimitiveKind::U8).unwrap(), Value::U8(7));
    assert_eq!(de.decode_f64().unwrap(), 1.25);
    assert_eq!(de.bytes_left(), 0);
}

#[test]
fn decodes_big_endian_payload() {
    let mut data = vec![0x00, 0x00, 0x00, 0x00];
    data.extend_from_slice(&(-3i32).to_be_bytes());
    data.extend_from_slice(&0x0102u16.to_be_bytes());

    let mut de = decoder(&data);
    assert_eq!(de.decode(PrimitiveKind::I32).unwrap(), Value::I32(-3));
    assert_eq!(de.decode(PrimitiveKind::U16).unwrap(), Value::U16(0x0102));
}

#[test]
fn decodes_string_and_length_prefix() {
    let mut payload = Vec::new();
    push_string(&mut payload, "base_link");
    align(&mut payload, 4);
    payload.extend_from_slice(&3u32.to_le_bytes());

    let mut de = decoder(&cdr_with_payload(payload));
    assert_eq!(de.decode_string().unwrap(), "base_link");
    assert_eq!(de.decode_len().unwrap(), 3);
}

#[test]
fn zero_length_string_is_empty() {
    let payload = 0u32.to_le_bytes().to_vec();
    let mut de = decoder(&cdr_with_payload(payload));
    assert_eq!(de.decode_string().unwrap(), "");
}

#[test]
fn fails_on_missing_null_terminator() {
    let mut payload = 2u32.to_le_bytes().to_vec();
    payload.extend_from_slice(b"ab");

    let mut de = decoder(&cdr_with_payload(payload));
    let err = de.decode(PrimitiveKind::String).unwrap_err();
    assert!(matches!(err, DecodeError::InvalidData(msg) if msg.contains("null terminator")));
}

#[test]
fn fails_on_truncated_payload() {
    let payload = vec![0u8; 4];
    let mut de = decoder(&cdr_with_payload(payload));
    let err = de.decode(PrimitiveKind::F64).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnexpectedEof {
            needed: 8,
            remaining: 4
        }
    );
}

#[test]
fn rejects_unknown_representation_options() {
    let mut de = CdrDeserializer::new();
    let err = de.init(&[0x00, 0x07, 0x00, 0x00]).unwrap_err();
    assert!(matches!(err, DecodeError::Unsupported(_)));
}

#[test]
fn rejects_payload_shorter_than_header() {
    let mut de = CdrDeserializer::new();
    assert!(matches!(
        de.init(&[0x00, 0x01]),
        Err(DecodeError::UnexpectedEof { .. })
    ));
}

#[test]
fn init_rebinds_to_new_payload() {
    let mut de = decoder(&cdr_with_payload(1u32.to_le_bytes().to_vec()));
    assert_eq!(de.decode(PrimitiveKind::U32).unwrap(), Value::U32(1));

    de.init(&cdr_with_payload(2u32.to_le_bytes().to_vec())).unwrap();
    assert_eq!(de.decode(PrimitiveKind::U32).unwrap(), Value::U32(2));
}
