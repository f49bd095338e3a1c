//! Tests against NAS frames captured from live 5G core traffic.
//!
//! Each test decodes a recorded buffer, checks the fields that matter for
//! the procedure, and re-encodes to verify byte-exact output.

use crate::codec::{CodecError, DecodePolicy};
use crate::enums::{MmMessageType, SmMessageType};
use crate::ies::ie1::{PayloadContainerType, PduSessionType, RequestType, SscMode};
use crate::ies::ie3::MmCause;
use crate::ies::pco::container_id;
use crate::messages::{MmMessageBody, NasMessage, SmMessageBody};

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    hex.split_whitespace()
        .map(|octet| u8::from_str_radix(octet, 16).unwrap())
        .collect()
}

/// UL NAS Transport carrying a PDU Session Establishment Request,
/// recorded during an initial PDU session setup.
const UL_NAS_TRANSPORT: &str = "7e 00 67 01 00 15 2e 01 01 c1 ff ff 91 a1 28 01 00 \
                                7b 00 07 80 00 0a 00 00 0d 00 12 01 81 22 01 01 25 \
                                09 08 69 6e 74 65 72 6e 65 74";

/// Security Mode Reject, recorded after an algorithm mismatch.
const SECURITY_MODE_REJECT: &str = "7e 00 5f 24";

#[test]
fn test_ul_nas_transport_capture_decodes() {
    let bytes = hex_to_bytes(UL_NAS_TRANSPORT);
    assert_eq!(bytes.len(), 44);

    let msg = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();

    let mm = match &msg {
        NasMessage::PlainMm(mm) => mm,
        other => panic!("expected plain 5GMM message, got {other:?}"),
    };
    assert_eq!(mm.message_type(), MmMessageType::UlNasTransport);

    let transport = match &mm.body {
        MmMessageBody::UlNasTransport(t) => t,
        other => panic!("expected UL NAS Transport, got {other:?}"),
    };

    assert_eq!(
        transport.payload_container_type,
        PayloadContainerType::N1SmInformation
    );
    assert_eq!(transport.pdu_session_id, Some(1));
    assert_eq!(transport.request_type, Some(RequestType::InitialRequest));
    assert_eq!(transport.s_nssai.unwrap().sst, 1);
    // the decoded DNN is the 8 ASCII characters, no leading length octet
    assert_eq!(transport.dnn.as_ref().unwrap().as_string().unwrap(), "internet");

    let embedded = transport
        .payload_container
        .message
        .as_ref()
        .expect("N1 SM container should decode to an embedded message");
    assert_eq!(embedded.header.pdu_session_id, 1);
    assert_eq!(embedded.header.pti, 1);
    assert_eq!(
        embedded.message_type(),
        SmMessageType::PduSessionEstablishmentRequest
    );

    let request = match &embedded.body {
        SmMessageBody::PduSessionEstablishmentRequest(r) => r,
        other => panic!("expected establishment request, got {other:?}"),
    };
    assert_eq!(request.pdu_session_type, Some(PduSessionType::Ipv4));
    assert_eq!(request.ssc_mode, Some(SscMode::SscMode1));
    assert_eq!(request.sm_capability.as_ref().unwrap().octets, vec![0x00]);

    let pco = request.extended_pco.as_ref().unwrap();
    assert_eq!(pco.containers.len(), 2);
    assert_eq!(pco.containers[0].id, container_id::IPV4_LINK_MTU);
    assert_eq!(pco.containers[0].contents, None);
    assert_eq!(pco.containers[1].id, container_id::DNS_SERVER_IPV4_ADDRESS);
    assert_eq!(pco.containers[1].contents, None);
}

#[test]
fn test_ul_nas_transport_capture_reencodes_exactly() {
    let bytes = hex_to_bytes(UL_NAS_TRANSPORT);
    let msg = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();
    assert_eq!(msg.to_bytes().unwrap(), bytes);
}

#[test]
fn test_ul_nas_transport_capture_truncation_sweep() {
    // every strict prefix must fail cleanly, never decode partially; the
    // exceptions are prefixes ending exactly on an optional-IE boundary,
    // which form shorter but complete messages
    let bytes = hex_to_bytes(UL_NAS_TRANSPORT);
    let optional_ie_boundaries = [27, 29, 30, 33];
    for k in 0..bytes.len() {
        let result = NasMessage::decode(&bytes[..k], DecodePolicy::Strict);
        match (k, result) {
            (0, Err(CodecError::NullBuffer)) => {}
            (_, Ok(_)) if optional_ie_boundaries.contains(&k) => {}
            (_, Err(CodecError::BufferTooShort { .. }))
                if !optional_ie_boundaries.contains(&k) => {}
            (_, other) => panic!("prefix of length {k} gave {other:?}"),
        }
    }
}

#[test]
fn test_ul_nas_transport_capture_tag_mutation() {
    // flip the S-NSSAI IEI (0x22 at offset 30) to an unassigned tag
    let mut bytes = hex_to_bytes(UL_NAS_TRANSPORT);
    assert_eq!(bytes[30], 0x22);
    bytes[30] = 0x33;

    let strict = NasMessage::decode(&bytes, DecodePolicy::Strict);
    assert_eq!(
        strict,
        Err(CodecError::UnsupportedOptionalIe {
            message_type: 0x67,
            iei: 0x33
        })
    );

    // lenient skips the mutated TLV and still returns the rest
    let lenient = NasMessage::decode(&bytes, DecodePolicy::Lenient).unwrap();
    match lenient {
        NasMessage::PlainMm(mm) => match mm.body {
            MmMessageBody::UlNasTransport(t) => {
                assert_eq!(t.s_nssai, None);
                assert_eq!(t.dnn.unwrap().as_string().unwrap(), "internet");
            }
            other => panic!("expected UL NAS Transport, got {other:?}"),
        },
        other => panic!("expected plain 5GMM message, got {other:?}"),
    }
}

#[test]
fn test_security_mode_reject_capture() {
    let bytes = hex_to_bytes(SECURITY_MODE_REJECT);
    assert_eq!(bytes.len(), 4);

    let msg = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();
    let mm = match &msg {
        NasMessage::PlainMm(mm) => mm,
        other => panic!("expected plain 5GMM message, got {other:?}"),
    };
    assert_eq!(mm.message_type(), MmMessageType::SecurityModeReject);

    match &mm.body {
        MmMessageBody::SecurityModeReject(reject) => {
            assert_eq!(reject.mm_cause.value, MmCause::IabNodeOperationNotAuthorized);
            assert_eq!(u8::from(reject.mm_cause.value), 0x24);
        }
        other => panic!("expected Security Mode Reject, got {other:?}"),
    }

    assert_eq!(msg.to_bytes().unwrap(), bytes);
}

#[test]
fn test_security_mode_reject_truncation_sweep() {
    let bytes = hex_to_bytes(SECURITY_MODE_REJECT);
    for k in 1..bytes.len() {
        let result = NasMessage::decode(&bytes[..k], DecodePolicy::Strict);
        assert!(
            matches!(result, Err(CodecError::BufferTooShort { .. })),
            "prefix of length {k} gave {result:?}"
        );
    }
}

#[test]
fn test_embedded_sm_message_survives_reconstruction() {
    // decode, pull the embedded SM message out, rebuild the transport from
    // it, and verify the container bytes are recomputed identically
    let bytes = hex_to_bytes(UL_NAS_TRANSPORT);
    let msg = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();

    let transport = match msg {
        NasMessage::PlainMm(mm) => match mm.body {
            MmMessageBody::UlNasTransport(t) => t,
            other => panic!("expected UL NAS Transport, got {other:?}"),
        },
        other => panic!("expected plain 5GMM message, got {other:?}"),
    };

    let embedded = *transport.payload_container.message.clone().unwrap();
    let rebuilt = crate::messages::mm::PayloadContainer::from_message(embedded).unwrap();
    assert_eq!(rebuilt.raw, transport.payload_container.raw);
}
