//! Service Request Messages (3GPP TS 24.501 Sections 8.2.16-8.2.18)

use bytes::{Buf, BufMut};

use crate::codec::{
    decode_nibble_pair, encode_nibble_pair, get_bytes, get_len_u8, get_u8, skip_unknown_ie,
    CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{IeNasKeySetIdentifier, IeServiceType, InformationElement1, ServiceType};
use crate::ies::ie3::{Ie5gMmCause, MmCause};
use crate::ies::ie4::{Ie5gsMobileIdentity, IeGprsTimer2};

/// IEI values for Service Request optional IEs
mod service_request_iei {
    /// Uplink data status (TLV)
    pub const UPLINK_DATA_STATUS: u8 = 0x40;
    /// PDU session status (TLV)
    pub const PDU_SESSION_STATUS: u8 = 0x50;
}

/// IEI values for Service Accept optional IEs
mod service_accept_iei {
    /// PDU session status (TLV)
    pub const PDU_SESSION_STATUS: u8 = 0x50;
}

/// IEI values for Service Reject optional IEs
mod service_reject_iei {
    /// PDU session status (TLV)
    pub const PDU_SESSION_STATUS: u8 = 0x50;
    /// T3346 value (TLV)
    pub const T3346_VALUE: u8 = 0x5F;
}

// ============================================================================
// Service Request (3GPP TS 24.501 Section 8.2.16)
// ============================================================================

/// Service Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceRequest {
    /// ngKSI (mandatory, high nibble of octet 1)
    pub ngksi: IeNasKeySetIdentifier,
    /// Service type (mandatory, low nibble of octet 1)
    pub service_type: IeServiceType,
    /// 5G-S-TMSI (mandatory, LV-E)
    pub tmsi: Ie5gsMobileIdentity,
    /// Uplink data status (optional, IEI 0x40), PSI bitmap
    pub uplink_data_status: Option<Vec<u8>>,
    /// PDU session status (optional, IEI 0x50), PSI bitmap
    pub pdu_session_status: Option<Vec<u8>>,
}

impl ServiceRequest {
    /// Create a new Service Request
    pub fn new(
        ngksi: IeNasKeySetIdentifier,
        service_type: ServiceType,
        tmsi: Ie5gsMobileIdentity,
    ) -> Self {
        Self {
            ngksi,
            service_type: IeServiceType::new(service_type),
            tmsi,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let (ngksi_bits, type_bits) = decode_nibble_pair(buf)?;
        let service_type = IeServiceType::decode(type_bits)?;
        let ngksi = IeNasKeySetIdentifier::decode(ngksi_bits)?;
        let tmsi = Ie5gsMobileIdentity::decode(buf)?;

        let mut msg = Self {
            ngksi,
            service_type,
            tmsi,
            ..Default::default()
        };

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::ServiceRequest.into(), iei, policy)?;
                continue;
            }

            match iei {
                service_request_iei::UPLINK_DATA_STATUS => {
                    let len = get_len_u8(buf)?;
                    msg.uplink_data_status = Some(get_bytes(buf, len)?);
                }
                service_request_iei::PDU_SESSION_STATUS => {
                    let len = get_len_u8(buf)?;
                    msg.pdu_session_status = Some(get_bytes(buf, len)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::ServiceRequest.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        encode_nibble_pair(self.ngksi.encode(), self.service_type.encode(), buf);
        self.tmsi.encode(buf)?;

        if let Some(status) = &self.uplink_data_status {
            buf.put_u8(service_request_iei::UPLINK_DATA_STATUS);
            crate::codec::put_len_u8(status.len(), buf)?;
            buf.put_slice(status);
        }
        if let Some(status) = &self.pdu_session_status {
            buf.put_u8(service_request_iei::PDU_SESSION_STATUS);
            crate::codec::put_len_u8(status.len(), buf)?;
            buf.put_slice(status);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::ServiceRequest
    }
}

// ============================================================================
// Service Accept (3GPP TS 24.501 Section 8.2.17)
// ============================================================================

/// Service Accept message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceAccept {
    /// PDU session status (optional, IEI 0x50), PSI bitmap
    pub pdu_session_status: Option<Vec<u8>>,
}

impl ServiceAccept {
    /// Create a new Service Accept
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::ServiceAccept.into(), iei, policy)?;
                continue;
            }

            match iei {
                service_accept_iei::PDU_SESSION_STATUS => {
                    let len = get_len_u8(buf)?;
                    msg.pdu_session_status = Some(get_bytes(buf, len)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::ServiceAccept.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(status) = &self.pdu_session_status {
            buf.put_u8(service_accept_iei::PDU_SESSION_STATUS);
            crate::codec::put_len_u8(status.len(), buf)?;
            buf.put_slice(status);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::ServiceAccept
    }
}

// ============================================================================
// Service Reject (3GPP TS 24.501 Section 8.2.18)
// ============================================================================

/// Service Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ServiceReject {
    /// 5GMM cause (mandatory)
    pub mm_cause: Ie5gMmCause,
    /// PDU session status (optional, IEI 0x50), PSI bitmap
    pub pdu_session_status: Option<Vec<u8>>,
    /// T3346 value (optional, IEI 0x5F)
    pub t3346: Option<IeGprsTimer2>,
}

impl ServiceReject {
    /// Create a new Service Reject
    pub fn new(cause: MmCause) -> Self {
        Self {
            mm_cause: Ie5gMmCause::new(cause),
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mm_cause = Ie5gMmCause::decode(buf)?;
        let mut msg = Self {
            mm_cause,
            ..Default::default()
        };

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::ServiceReject.into(), iei, policy)?;
                continue;
            }

            match iei {
                service_reject_iei::PDU_SESSION_STATUS => {
                    let len = get_len_u8(buf)?;
                    msg.pdu_session_status = Some(get_bytes(buf, len)?);
                }
                service_reject_iei::T3346_VALUE => {
                    msg.t3346 = Some(IeGprsTimer2::decode(buf)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::ServiceReject.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.mm_cause.encode(buf);

        if let Some(status) = &self.pdu_session_status {
            buf.put_u8(service_reject_iei::PDU_SESSION_STATUS);
            crate::codec::put_len_u8(status.len(), buf)?;
            buf.put_slice(status);
        }
        if let Some(t3346) = &self.t3346 {
            buf.put_u8(service_reject_iei::T3346_VALUE);
            t3346.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::ServiceReject
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::ies::ie1::TypeOfSecurityContext;

    fn tmsi() -> Ie5gsMobileIdentity {
        Ie5gsMobileIdentity::new(vec![0xF4, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78])
    }

    #[test]
    fn test_service_request_round_trip() {
        let mut msg = ServiceRequest::new(
            IeNasKeySetIdentifier::new(TypeOfSecurityContext::NativeSecurityContext, 1),
            ServiceType::Data,
            tmsi(),
        );
        msg.uplink_data_status = Some(vec![0x00, 0x20]);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        // ngKSI=1 in the high nibble, service type Data=0001 in the low
        assert_eq!(buf[0], 0b0001_0001);

        let decoded = ServiceRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_service_accept_round_trip() {
        let mut msg = ServiceAccept::new();
        msg.pdu_session_status = Some(vec![0x00, 0x20]);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(&buf, &[0x50, 0x02, 0x00, 0x20]);

        let decoded = ServiceAccept::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_service_reject_round_trip() {
        let mut msg = ServiceReject::new(MmCause::Congestion);
        msg.t3346 = Some(IeGprsTimer2::new(0x2C));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0x16);

        let decoded = ServiceReject::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_service_request_truncated_status() {
        let msg = ServiceRequest::new(
            IeNasKeySetIdentifier::not_available(),
            ServiceType::Signalling,
            tmsi(),
        );
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        buf.extend_from_slice(&[0x40, 0x02, 0x00]);

        assert!(matches!(
            ServiceRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
