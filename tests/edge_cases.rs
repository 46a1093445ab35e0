#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge cases on the decode path: truncated, corrupted and foreign input
//! must be rejected with a typed error and never produce a routable.

mod common;

use document_protocol::protocol::routable::{type_code, DocumentMessage, Routable};
use document_protocol::{Generation, ProtocolError};

fn frame(type_code: i32, payload: &[u8]) -> Vec<u8> {
    let mut bytes = type_code.to_be_bytes().to_vec();
    bytes.extend_from_slice(payload);
    bytes
}

fn string(value: &[u8]) -> Vec<u8> {
    let mut bytes = (value.len() as i32).to_be_bytes().to_vec();
    bytes.extend_from_slice(value);
    bytes
}

// ============================================================================
// TRUNCATION
// ============================================================================

#[test]
fn test_truncation_at_every_offset_generation_50() {
    let registry = common::registry();
    for routable in common::v50_routables() {
        let bytes = registry.encode_routable(&routable, Generation::V50).unwrap();
        for cut in 0..bytes.len() {
            match registry.decode_routable(&bytes[..cut], Generation::V50) {
                Err(ProtocolError::BufferUnderrun { .. }) => {}
                other => panic!(
                    "type code {} cut at {cut}/{}: expected underrun, got {other:?}",
                    routable.type_code(),
                    bytes.len()
                ),
            }
        }
    }
}

#[test]
fn test_truncation_at_every_offset_generation_51() {
    let registry = common::registry();
    for routable in common::v51_routables() {
        let bytes = registry.encode_routable(&routable, Generation::V51).unwrap();

        // a create-visitor payload that stops right before the bucket space
        // is exactly what a generation 50 peer sends
        let legacy_boundary = match &routable {
            Routable::Message(DocumentMessage::CreateVisitor(msg)) => {
                Some(bytes.len() - 4 - msg.bucket_space.len())
            }
            _ => None,
        };

        for cut in 0..bytes.len() {
            let result = registry.decode_routable(&bytes[..cut], Generation::V51);
            if Some(cut) == legacy_boundary {
                match result {
                    Ok(Routable::Message(DocumentMessage::CreateVisitor(msg))) => {
                        assert_eq!(msg.bucket_space, "default")
                    }
                    other => panic!("expected legacy create-visitor, got {other:?}"),
                }
                continue;
            }
            assert!(
                matches!(result, Err(ProtocolError::BufferUnderrun { .. })),
                "type code {} cut at {cut}/{}: got {result:?}",
                routable.type_code(),
                bytes.len()
            );
        }
    }
}

// ============================================================================
// DISPATCH
// ============================================================================

#[test]
fn test_empty_input_is_underrun() {
    let registry = common::registry();
    assert!(matches!(
        registry.decode(&[]),
        Err(ProtocolError::BufferUnderrun {
            needed: 4,
            remaining: 0
        })
    ));
}

#[test]
fn test_unknown_type_codes() {
    let registry = common::registry();
    for code in [0, -1, i32::MAX, i32::MIN, 100_000, 200_031] {
        let bytes = frame(code, &[]);
        assert!(matches!(
            registry.decode(&bytes),
            Err(ProtocolError::UnknownTypeCode { type_code, generation })
                if type_code == code && generation == Generation::V51
        ));
    }
}

#[test]
fn test_trailing_garbage_is_malformed() {
    let registry = common::registry();
    let routable = common::v50_routables().remove(1);
    let mut bytes = registry.encode(&routable).unwrap().to_vec();
    bytes.extend_from_slice(&[0xDE, 0xAD]);
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::MalformedValue(_))
    ));
}

// ============================================================================
// VALUE DOMAINS
// ============================================================================

#[test]
fn test_non_canonical_bool_rejected() {
    let registry = common::registry();
    for flag in [2u8, 0x80, 0xFF] {
        let mut payload = vec![flag];
        payload.extend_from_slice(&5i64.to_be_bytes());
        let bytes = frame(type_code::REMOVE_DOCUMENT_REPLY, &payload);
        assert!(matches!(
            registry.decode(&bytes),
            Err(ProtocolError::MalformedValue(_))
        ));
    }
}

#[test]
fn test_negative_length_rejected() {
    let registry = common::registry();
    let bytes = frame(type_code::DESTROY_VISITOR, &(-1i32).to_be_bytes());
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::MalformedValue(_))
    ));
}

#[test]
fn test_oversized_length_is_underrun() {
    let registry = common::registry();
    let mut payload = i32::MAX.to_be_bytes().to_vec();
    payload.extend_from_slice(b"short");
    let bytes = frame(type_code::DESTROY_VISITOR, &payload);
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::BufferUnderrun { .. })
    ));
}

#[test]
fn test_invalid_utf8_rejected() {
    let registry = common::registry();
    let bytes = frame(type_code::DESTROY_VISITOR, &string(&[0xC3, 0x28]));
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::MalformedValue(_))
    ));
}

#[test]
fn test_unparsable_document_id_rejected() {
    let registry = common::registry();
    let mut payload = string(b"doc:music:abc");
    payload.extend(string(b"[all]"));
    let bytes = frame(type_code::GET_DOCUMENT, &payload);
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::MalformedValue(_))
    ));
}

#[test]
fn test_document_of_unknown_type_fails_schema_lookup() {
    let registry = common::registry();
    let mut payload = string(b"id:test:video::v1");
    payload.extend(string(b"video"));
    payload.extend_from_slice(&0i32.to_be_bytes());
    payload.extend_from_slice(&0i64.to_be_bytes());
    payload.extend(string(b""));
    let bytes = frame(type_code::PUT_DOCUMENT, &payload);
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::SchemaLookupFailed(name)) if name == "video"
    ));
}

#[test]
fn test_document_with_undeclared_field_rejected() {
    let registry = common::registry();
    let mut payload = string(b"id:test:book::b1");
    payload.extend(string(b"book"));
    payload.extend_from_slice(&1i32.to_be_bytes());
    payload.extend(string(b"title"));
    payload.extend(string(b"Dune"));
    payload.extend_from_slice(&0i64.to_be_bytes());
    payload.extend(string(b""));
    let bytes = frame(type_code::PUT_DOCUMENT, &payload);
    assert!(matches!(
        registry.decode(&bytes),
        Err(ProtocolError::MalformedValue(_))
    ));
}

#[test]
fn test_duplicate_visitor_parameter_rejected() {
    let registry = common::registry();
    let mut msg = common::create_visitor();
    msg.parameters.clear();
    msg.parameters.insert("a".into(), vec![1]);
    msg.parameters.insert("b".into(), vec![2]);
    let mut bytes = registry
        .encode_routable(&msg.into(), Generation::V50)
        .unwrap()
        .to_vec();

    // rename parameter "b" to "a"; both names have the same length
    let second_name = bytes
        .windows(5)
        .rposition(|w| w == [0, 0, 0, 1, b'b'])
        .expect("parameter name should be present");
    bytes[second_name + 4] = b'a';

    assert!(matches!(
        registry.decode_routable(&bytes, Generation::V50),
        Err(ProtocolError::MalformedValue(_))
    ));
}

#[test]
fn test_decode_errors_are_classified() {
    let registry = common::registry();
    let bytes = frame(type_code::REMOVE_DOCUMENT_REPLY, &[7]);
    let err = registry.decode(&bytes).unwrap_err();
    assert!(err.is_decode_failure());
}
