//! NAS Transport Messages (3GPP TS 24.501 Sections 8.2.10-8.2.11)
//!
//! UL NAS Transport carries an embedded payload (most often a plain 5GSM
//! message) from the UE towards the AMF; DL NAS Transport is the downlink
//! counterpart. When the payload container type is "N1 SM information" the
//! container bytes are additionally decoded as a session management message,
//! while the raw octets are always preserved for exact re-encoding.

use bytes::{Buf, BufMut};

use crate::codec::{
    get_bytes, get_len_u16, get_u8, skip_unknown_ie, CodecError, CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{InformationElement1, IePayloadContainerType, IeRequestType, PayloadContainerType, RequestType};
use crate::ies::ie3::{Ie5gMmCause, MmCause};
use crate::ies::ie4::{IeDnn, IeGprsTimer3, IeSNssai};
use crate::messages::SmMessage;

// ============================================================================
// IEI Constants
// ============================================================================

/// IEI values for UL NAS Transport optional IEs
mod ul_nas_transport_iei {
    /// PDU session ID (TV)
    pub const PDU_SESSION_ID: u8 = 0x12;
    /// Old PDU session ID (TV)
    pub const OLD_PDU_SESSION_ID: u8 = 0x59;
    /// Request type (Type 1, IEI in the high nibble)
    pub const REQUEST_TYPE_HIGH_NIBBLE: u8 = 0x8;
    /// S-NSSAI (TLV)
    pub const S_NSSAI: u8 = 0x22;
    /// DNN (TLV)
    pub const DNN: u8 = 0x25;
}

/// IEI values for DL NAS Transport optional IEs
mod dl_nas_transport_iei {
    /// PDU session ID (TV)
    pub const PDU_SESSION_ID: u8 = 0x12;
    /// 5GMM cause (TV)
    pub const MM_CAUSE: u8 = 0x58;
    /// Back-off timer value (TLV)
    pub const BACK_OFF_TIMER_VALUE: u8 = 0x37;
}

// ============================================================================
// Payload Container
// ============================================================================

/// Payload Container value (Type 6, TLV-E in the message layout).
///
/// Keeps the container octets exactly as they appeared on the wire plus,
/// for N1 SM information, the decoded session management message. Encoding
/// prefers the decoded message so that edits to it are reflected in the
/// output; the length field is always recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PayloadContainer {
    /// Raw container octets
    pub raw: Vec<u8>,
    /// Decoded 5GSM message, when the container type is N1 SM information
    pub message: Option<Box<SmMessage>>,
}

impl PayloadContainer {
    /// Create a container from raw octets
    pub fn from_raw(raw: Vec<u8>) -> Self {
        Self { raw, message: None }
    }

    /// Create a container embedding a 5GSM message
    pub fn from_message(message: SmMessage) -> CodecResult<Self> {
        let mut raw = Vec::new();
        message.encode(&mut raw)?;
        Ok(Self {
            raw,
            message: Some(Box::new(message)),
        })
    }

    fn decode_inner(
        container_type: PayloadContainerType,
        raw: Vec<u8>,
        policy: DecodePolicy,
    ) -> CodecResult<Self> {
        if container_type != PayloadContainerType::N1SmInformation || raw.is_empty() {
            return Ok(Self::from_raw(raw));
        }

        let mut inner = &raw[..];
        match SmMessage::decode(&mut inner, policy) {
            Ok(message) => {
                if inner.remaining() > 0 {
                    if policy == DecodePolicy::Strict {
                        return Err(CodecError::MalformedField("payload container length"));
                    }
                    tracing::warn!(
                        trailing = inner.remaining(),
                        "payload container longer than embedded message"
                    );
                }
                Ok(Self {
                    raw,
                    message: Some(Box::new(message)),
                })
            }
            Err(err) => {
                if policy == DecodePolicy::Strict {
                    return Err(err);
                }
                tracing::warn!(error = %err, "undecodable N1 SM payload container");
                Ok(Self::from_raw(raw))
            }
        }
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        match &self.message {
            Some(message) => {
                let mut bytes = Vec::new();
                message.encode(&mut bytes)?;
                crate::codec::put_len_u16(bytes.len(), buf)?;
                buf.put_slice(&bytes);
            }
            None => {
                crate::codec::put_len_u16(self.raw.len(), buf)?;
                buf.put_slice(&self.raw);
            }
        }
        Ok(())
    }

    /// Encoded length (including the 2-byte length field)
    pub fn encoded_len(&self) -> usize {
        // raw always mirrors the message at construction time
        2 + self.raw.len()
    }
}

// ============================================================================
// UL NAS Transport (3GPP TS 24.501 Section 8.2.10)
// ============================================================================

/// UL NAS Transport message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UlNasTransport {
    /// Payload container type (mandatory, 4 bits)
    pub payload_container_type: PayloadContainerType,
    /// Payload container (mandatory, TLV-E)
    pub payload_container: PayloadContainer,
    /// PDU session ID (optional, IEI 0x12)
    pub pdu_session_id: Option<u8>,
    /// Old PDU session ID (optional, IEI 0x59)
    pub old_pdu_session_id: Option<u8>,
    /// Request type (optional, Type 1, IEI 0x8 high nibble)
    pub request_type: Option<RequestType>,
    /// S-NSSAI (optional, IEI 0x22)
    pub s_nssai: Option<IeSNssai>,
    /// DNN (optional, IEI 0x25)
    pub dnn: Option<IeDnn>,
}

impl Default for UlNasTransport {
    fn default() -> Self {
        Self {
            payload_container_type: PayloadContainerType::N1SmInformation,
            payload_container: PayloadContainer::default(),
            pdu_session_id: None,
            old_pdu_session_id: None,
            request_type: None,
            s_nssai: None,
            dnn: None,
        }
    }
}

impl UlNasTransport {
    /// Create a new UL NAS Transport message
    pub fn new(
        payload_container_type: PayloadContainerType,
        payload_container: PayloadContainer,
    ) -> Self {
        Self {
            payload_container_type,
            payload_container,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        // payload container type sits alone in the low nibble of its octet
        let pct_byte = get_u8(buf)?;
        let payload_container_type =
            IePayloadContainerType::decode(pct_byte & 0x0F)?.payload_container_type;

        let pc_len = get_len_u16(buf)?;
        let raw = get_bytes(buf, pc_len)?;
        let payload_container = PayloadContainer::decode_inner(payload_container_type, raw, policy)?;

        let mut msg = Self::new(payload_container_type, payload_container);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                // packed octet: tag in the high nibble, value in the low
                match (iei >> 4) & 0x0F {
                    ul_nas_transport_iei::REQUEST_TYPE_HIGH_NIBBLE => {
                        msg.request_type = Some(IeRequestType::decode(iei & 0x0F)?.request_type);
                    }
                    _ => skip_unknown_ie(buf, MmMessageType::UlNasTransport.into(), iei, policy)?,
                }
                continue;
            }

            match iei {
                ul_nas_transport_iei::PDU_SESSION_ID => {
                    msg.pdu_session_id = Some(get_u8(buf)?);
                }
                ul_nas_transport_iei::OLD_PDU_SESSION_ID => {
                    msg.old_pdu_session_id = Some(get_u8(buf)?);
                }
                ul_nas_transport_iei::S_NSSAI => {
                    msg.s_nssai = Some(IeSNssai::decode(buf)?);
                }
                ul_nas_transport_iei::DNN => {
                    msg.dnn = Some(IeDnn::decode(buf)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::UlNasTransport.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let pct_val: u8 = self.payload_container_type.into();
        buf.put_u8(pct_val & 0x0F);
        self.payload_container.encode(buf)?;

        if let Some(psi) = self.pdu_session_id {
            buf.put_u8(ul_nas_transport_iei::PDU_SESSION_ID);
            buf.put_u8(psi);
        }
        if let Some(old_psi) = self.old_pdu_session_id {
            buf.put_u8(ul_nas_transport_iei::OLD_PDU_SESSION_ID);
            buf.put_u8(old_psi);
        }
        if let Some(rt) = self.request_type {
            let rt_val: u8 = rt.into();
            buf.put_u8((ul_nas_transport_iei::REQUEST_TYPE_HIGH_NIBBLE << 4) | (rt_val & 0x07));
        }
        if let Some(nssai) = &self.s_nssai {
            buf.put_u8(ul_nas_transport_iei::S_NSSAI);
            nssai.encode(buf);
        }
        if let Some(dnn) = &self.dnn {
            buf.put_u8(ul_nas_transport_iei::DNN);
            dnn.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::UlNasTransport
    }
}

// ============================================================================
// DL NAS Transport (3GPP TS 24.501 Section 8.2.11)
// ============================================================================

/// DL NAS Transport message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DlNasTransport {
    /// Payload container type (mandatory, 4 bits)
    pub payload_container_type: PayloadContainerType,
    /// Payload container (mandatory, TLV-E)
    pub payload_container: PayloadContainer,
    /// PDU session ID (optional, IEI 0x12)
    pub pdu_session_id: Option<u8>,
    /// 5GMM cause (optional, IEI 0x58)
    pub mm_cause: Option<MmCause>,
    /// Back-off timer value (optional, IEI 0x37)
    pub back_off_timer: Option<IeGprsTimer3>,
}

impl Default for DlNasTransport {
    fn default() -> Self {
        Self {
            payload_container_type: PayloadContainerType::N1SmInformation,
            payload_container: PayloadContainer::default(),
            pdu_session_id: None,
            mm_cause: None,
            back_off_timer: None,
        }
    }
}

impl DlNasTransport {
    /// Create a new DL NAS Transport message
    pub fn new(
        payload_container_type: PayloadContainerType,
        payload_container: PayloadContainer,
    ) -> Self {
        Self {
            payload_container_type,
            payload_container,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let pct_byte = get_u8(buf)?;
        let payload_container_type =
            IePayloadContainerType::decode(pct_byte & 0x0F)?.payload_container_type;

        let pc_len = get_len_u16(buf)?;
        let raw = get_bytes(buf, pc_len)?;
        let payload_container = PayloadContainer::decode_inner(payload_container_type, raw, policy)?;

        let mut msg = Self::new(payload_container_type, payload_container);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::DlNasTransport.into(), iei, policy)?;
                continue;
            }

            match iei {
                dl_nas_transport_iei::PDU_SESSION_ID => {
                    msg.pdu_session_id = Some(get_u8(buf)?);
                }
                dl_nas_transport_iei::MM_CAUSE => {
                    msg.mm_cause = Some(Ie5gMmCause::decode(buf)?.value);
                }
                dl_nas_transport_iei::BACK_OFF_TIMER_VALUE => {
                    msg.back_off_timer = Some(IeGprsTimer3::decode(buf)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::DlNasTransport.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let pct_val: u8 = self.payload_container_type.into();
        buf.put_u8(pct_val & 0x0F);
        self.payload_container.encode(buf)?;

        if let Some(psi) = self.pdu_session_id {
            buf.put_u8(dl_nas_transport_iei::PDU_SESSION_ID);
            buf.put_u8(psi);
        }
        if let Some(cause) = self.mm_cause {
            buf.put_u8(dl_nas_transport_iei::MM_CAUSE);
            Ie5gMmCause::new(cause).encode(buf);
        }
        if let Some(timer) = &self.back_off_timer {
            buf.put_u8(dl_nas_transport_iei::BACK_OFF_TIMER_VALUE);
            timer.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::DlNasTransport
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::ie4::GprsTimer3Unit;

    fn raw_container() -> PayloadContainer {
        // opaque SMS payload, not parsed as 5GSM
        PayloadContainer::from_raw(vec![0xAA, 0xBB])
    }

    #[test]
    fn test_ul_nas_transport_round_trip() {
        let mut msg = UlNasTransport::new(PayloadContainerType::Sms, raw_container());
        msg.pdu_session_id = Some(5);
        msg.request_type = Some(RequestType::InitialRequest);
        msg.s_nssai = Some(IeSNssai::new(1));
        msg.dnn = Some(IeDnn::from_string("internet"));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();

        let decoded = UlNasTransport::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_ul_nas_transport_wire_layout() {
        let msg = UlNasTransport::new(PayloadContainerType::Sms, raw_container());
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();

        assert_eq!(buf[0], 0x02); // payload container type
        assert_eq!(&buf[1..3], &[0x00, 0x02]); // container length
        assert_eq!(&buf[3..5], &[0xAA, 0xBB]);
        assert_eq!(buf.len(), 1 + msg.payload_container.encoded_len());
    }

    #[test]
    fn test_dl_nas_transport_round_trip() {
        let mut msg = DlNasTransport::new(PayloadContainerType::Sms, raw_container());
        msg.pdu_session_id = Some(3);
        msg.mm_cause = Some(MmCause::Congestion);
        msg.back_off_timer = Some(IeGprsTimer3::new(GprsTimer3Unit::Multiples1Minute, 2));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();

        let decoded = DlNasTransport::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_container_length_overrun_fails() {
        // declared container length exceeds the buffer
        let data = [0x01, 0x00, 0x10, 0x2E];
        let result = UlNasTransport::decode(&mut data.as_slice(), DecodePolicy::Strict);
        assert!(matches!(result, Err(CodecError::BufferTooShort { .. })));
    }

    #[test]
    fn test_unknown_optional_ie_strict_vs_lenient() {
        let msg = UlNasTransport::new(PayloadContainerType::Sms, raw_container());
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        // append an unknown TLV IE, tag 0x33, two value bytes
        buf.extend_from_slice(&[0x33, 0x02, 0x01, 0x02]);

        let strict = UlNasTransport::decode(&mut buf.as_slice(), DecodePolicy::Strict);
        assert_eq!(
            strict,
            Err(CodecError::UnsupportedOptionalIe {
                message_type: 0x67,
                iei: 0x33
            })
        );

        let lenient = UlNasTransport::decode(&mut buf.as_slice(), DecodePolicy::Lenient).unwrap();
        assert_eq!(lenient.payload_container.raw, vec![0xAA, 0xBB]);
    }

    #[test]
    fn test_truncated_optional_ie_fails_both_policies() {
        let msg = UlNasTransport::new(PayloadContainerType::Sms, raw_container());
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        // DNN IE whose length claims more bytes than present
        buf.extend_from_slice(&[0x25, 0x09, 0x08]);

        for policy in [DecodePolicy::Strict, DecodePolicy::Lenient] {
            let result = UlNasTransport::decode(&mut buf.as_slice(), policy);
            assert!(matches!(result, Err(CodecError::BufferTooShort { .. })));
        }
    }
}
