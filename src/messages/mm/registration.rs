//! Registration Messages (3GPP TS 24.501 Sections 8.2.6-8.2.9)
//!
//! Registration Request / Accept / Complete / Reject for the 5GS initial
//! registration and registration update procedures.

use bytes::{Buf, BufMut};

use crate::codec::{
    decode_nibble_pair, encode_nibble_pair, get_bytes, get_len_u8, get_u8, skip_unknown_ie,
    CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{Ie5gsRegistrationType, IeNasKeySetIdentifier, InformationElement1};
use crate::ies::ie3::{Ie5gMmCause, MmCause};
use crate::ies::ie4::{
    Ie5gsMobileIdentity, Ie5gsTaiList, IeGprsTimer2, IeGprsTimer3, IeUeSecurityCapability,
};

/// IEI values for Registration Request optional IEs
mod registration_request_iei {
    /// 5GMM capability (TLV)
    pub const MM_CAPABILITY: u8 = 0x10;
    /// UE security capability (TLV)
    pub const UE_SECURITY_CAPABILITY: u8 = 0x2E;
    /// Requested NSSAI (TLV)
    pub const REQUESTED_NSSAI: u8 = 0x2F;
}

/// IEI values for Registration Accept optional IEs
mod registration_accept_iei {
    /// 5G-GUTI (TLV-E)
    pub const GUTI: u8 = 0x77;
    /// TAI list (TLV)
    pub const TAI_LIST: u8 = 0x54;
    /// Allowed NSSAI (TLV)
    pub const ALLOWED_NSSAI: u8 = 0x15;
    /// T3512 value (TLV)
    pub const T3512_VALUE: u8 = 0x5E;
}

/// IEI values for Registration Reject optional IEs
mod registration_reject_iei {
    /// T3346 value (TLV)
    pub const T3346_VALUE: u8 = 0x5F;
    /// T3502 value (TLV)
    pub const T3502_VALUE: u8 = 0x16;
}

// ============================================================================
// Registration Request (3GPP TS 24.501 Section 8.2.6)
// ============================================================================

/// Registration Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationRequest {
    /// 5GS registration type (mandatory, low nibble of octet 1)
    pub registration_type: Ie5gsRegistrationType,
    /// ngKSI (mandatory, high nibble of octet 1)
    pub ngksi: IeNasKeySetIdentifier,
    /// 5GS mobile identity (mandatory, LV-E)
    pub mobile_identity: Ie5gsMobileIdentity,
    /// 5GMM capability (optional, IEI 0x10), raw capability octets
    pub mm_capability: Option<Vec<u8>>,
    /// UE security capability (optional, IEI 0x2E)
    pub ue_security_capability: Option<IeUeSecurityCapability>,
    /// Requested NSSAI (optional, IEI 0x22 region, raw list value)
    pub requested_nssai: Option<Vec<u8>>,
}

impl RegistrationRequest {
    /// Create a new Registration Request
    pub fn new(
        registration_type: Ie5gsRegistrationType,
        ngksi: IeNasKeySetIdentifier,
        mobile_identity: Ie5gsMobileIdentity,
    ) -> Self {
        Self {
            registration_type,
            ngksi,
            mobile_identity,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let (ngksi_bits, type_bits) = decode_nibble_pair(buf)?;
        let registration_type = Ie5gsRegistrationType::decode(type_bits)?;
        let ngksi = IeNasKeySetIdentifier::decode(ngksi_bits)?;
        let mobile_identity = Ie5gsMobileIdentity::decode(buf)?;

        let mut msg = Self::new(registration_type, ngksi, mobile_identity);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::RegistrationRequest.into(), iei, policy)?;
                continue;
            }

            match iei {
                registration_request_iei::MM_CAPABILITY => {
                    let len = get_len_u8(buf)?;
                    msg.mm_capability = Some(get_bytes(buf, len)?);
                }
                registration_request_iei::UE_SECURITY_CAPABILITY => {
                    msg.ue_security_capability = Some(IeUeSecurityCapability::decode(buf)?);
                }
                registration_request_iei::REQUESTED_NSSAI => {
                    let len = get_len_u8(buf)?;
                    msg.requested_nssai = Some(get_bytes(buf, len)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::RegistrationRequest.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        encode_nibble_pair(self.ngksi.encode(), self.registration_type.encode(), buf);
        self.mobile_identity.encode(buf)?;

        if let Some(cap) = &self.mm_capability {
            buf.put_u8(registration_request_iei::MM_CAPABILITY);
            crate::codec::put_len_u8(cap.len(), buf)?;
            buf.put_slice(cap);
        }
        if let Some(sec_cap) = &self.ue_security_capability {
            buf.put_u8(registration_request_iei::UE_SECURITY_CAPABILITY);
            sec_cap.encode(buf);
        }
        if let Some(nssai) = &self.requested_nssai {
            buf.put_u8(registration_request_iei::REQUESTED_NSSAI);
            crate::codec::put_len_u8(nssai.len(), buf)?;
            buf.put_slice(nssai);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::RegistrationRequest
    }
}

// ============================================================================
// Registration Accept (3GPP TS 24.501 Section 8.2.7)
// ============================================================================

/// Registration Accept message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationAccept {
    /// 5GS registration result (mandatory, LV, one value octet)
    pub registration_result: u8,
    /// 5G-GUTI (optional, IEI 0x77)
    pub guti: Option<Ie5gsMobileIdentity>,
    /// TAI list (optional, IEI 0x54)
    pub tai_list: Option<Ie5gsTaiList>,
    /// Allowed NSSAI (optional, IEI 0x15), raw list value
    pub allowed_nssai: Option<Vec<u8>>,
    /// T3512 value (optional, IEI 0x5E)
    pub t3512: Option<IeGprsTimer3>,
}

impl RegistrationAccept {
    /// Registration result: 3GPP access
    pub const RESULT_3GPP_ACCESS: u8 = 0b001;
    /// Registration result: non-3GPP access
    pub const RESULT_NON_3GPP_ACCESS: u8 = 0b010;
    /// Registration result: 3GPP and non-3GPP access
    pub const RESULT_3GPP_AND_NON_3GPP_ACCESS: u8 = 0b011;

    /// Create a new Registration Accept
    pub fn new(registration_result: u8) -> Self {
        Self {
            registration_result,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let result_len = get_len_u8(buf)?;
        let result_value = get_bytes(buf, result_len)?;
        let registration_result = *result_value
            .first()
            .ok_or(crate::codec::CodecError::MalformedField(
                "registration result length",
            ))?;

        let mut msg = Self::new(registration_result);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::RegistrationAccept.into(), iei, policy)?;
                continue;
            }

            match iei {
                registration_accept_iei::GUTI => {
                    msg.guti = Some(Ie5gsMobileIdentity::decode(buf)?);
                }
                registration_accept_iei::TAI_LIST => {
                    msg.tai_list = Some(Ie5gsTaiList::decode(buf)?);
                }
                registration_accept_iei::ALLOWED_NSSAI => {
                    let len = get_len_u8(buf)?;
                    msg.allowed_nssai = Some(get_bytes(buf, len)?);
                }
                registration_accept_iei::T3512_VALUE => {
                    msg.t3512 = Some(IeGprsTimer3::decode(buf)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::RegistrationAccept.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(1);
        buf.put_u8(self.registration_result & 0x07);

        if let Some(guti) = &self.guti {
            buf.put_u8(registration_accept_iei::GUTI);
            guti.encode(buf)?;
        }
        if let Some(tai_list) = &self.tai_list {
            buf.put_u8(registration_accept_iei::TAI_LIST);
            tai_list.encode(buf)?;
        }
        if let Some(nssai) = &self.allowed_nssai {
            buf.put_u8(registration_accept_iei::ALLOWED_NSSAI);
            crate::codec::put_len_u8(nssai.len(), buf)?;
            buf.put_slice(nssai);
        }
        if let Some(t3512) = &self.t3512 {
            buf.put_u8(registration_accept_iei::T3512_VALUE);
            t3512.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::RegistrationAccept
    }
}

// ============================================================================
// Registration Complete (3GPP TS 24.501 Section 8.2.8)
// ============================================================================

/// Registration Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationComplete {}

impl RegistrationComplete {
    /// Create a new Registration Complete
    pub fn new() -> Self {
        Self {}
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, MmMessageType::RegistrationComplete.into(), iei, policy)?;
        }
        Ok(Self {})
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, _buf: &mut B) -> CodecResult<()> {
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::RegistrationComplete
    }
}

// ============================================================================
// Registration Reject (3GPP TS 24.501 Section 8.2.9)
// ============================================================================

/// Registration Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationReject {
    /// 5GMM cause (mandatory)
    pub mm_cause: Ie5gMmCause,
    /// T3346 value (optional, IEI 0x5F)
    pub t3346: Option<IeGprsTimer2>,
    /// T3502 value (optional, IEI 0x16)
    pub t3502: Option<IeGprsTimer2>,
}

impl RegistrationReject {
    /// Create a new Registration Reject
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
                skip_unknown_ie(buf, MmMessageType::RegistrationReject.into(), iei, policy)?;
                continue;
            }

            match iei {
                registration_reject_iei::T3346_VALUE => {
                    msg.t3346 = Some(IeGprsTimer2::decode(buf)?);
                }
                registration_reject_iei::T3502_VALUE => {
                    msg.t3502 = Some(IeGprsTimer2::decode(buf)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::RegistrationReject.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.mm_cause.encode(buf);

        if let Some(t3346) = &self.t3346 {
            buf.put_u8(registration_reject_iei::T3346_VALUE);
            t3346.encode(buf);
        }
        if let Some(t3502) = &self.t3502 {
            buf.put_u8(registration_reject_iei::T3502_VALUE);
            t3502.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::RegistrationReject
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::ies::ie1::{FollowOnRequest, RegistrationType, TypeOfSecurityContext};

    fn suci() -> Ie5gsMobileIdentity {
        Ie5gsMobileIdentity::new(vec![0x01, 0x00, 0xF1, 0x10, 0x00, 0x00, 0x01, 0x23, 0x45])
    }

    #[test]
    fn test_registration_request_round_trip() {
        let mut msg = RegistrationRequest::new(
            Ie5gsRegistrationType::new(
                FollowOnRequest::Pending,
                RegistrationType::InitialRegistration,
            ),
            IeNasKeySetIdentifier::not_available(),
            suci(),
        );
        msg.ue_security_capability = Some(IeUeSecurityCapability::new(0xE0, 0xE0));
        msg.requested_nssai = Some(vec![0x01, 0x01]);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();

        // packed octet: ngKSI in the high nibble, registration type in the low
        assert_eq!(buf[0], 0b0111_1001);

        let decoded = RegistrationRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_registration_request_ngksi_nibble() {
        let msg = RegistrationRequest::new(
            Ie5gsRegistrationType::new(
                FollowOnRequest::NoPending,
                RegistrationType::MobilityRegistrationUpdating,
            ),
            IeNasKeySetIdentifier::new(TypeOfSecurityContext::NativeSecurityContext, 2),
            suci(),
        );
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0b0010_0010);
    }

    #[test]
    fn test_registration_accept_round_trip() {
        let mut msg = RegistrationAccept::new(RegistrationAccept::RESULT_3GPP_ACCESS);
        msg.guti = Some(Ie5gsMobileIdentity::new(vec![
            0xF2, 0x00, 0xF1, 0x10, 0x01, 0x00, 0x40, 0x00, 0x00, 0x00, 0x01,
        ]));
        msg.tai_list = Some(Ie5gsTaiList::new(vec![crate::ies::ie4::PartialTaiList {
            plmn: [0x00, 0xF1, 0x10],
            tacs: vec![[0x00, 0x00, 0x01]],
        }]));
        msg.t3512 = Some(IeGprsTimer3::new(
            crate::ies::ie4::GprsTimer3Unit::Multiples10Minutes,
            6,
        ));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x01, 0x01]);

        let decoded = RegistrationAccept::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_registration_reject_round_trip() {
        let mut msg = RegistrationReject::new(MmCause::PlmnNotAllowed);
        msg.t3346 = Some(IeGprsTimer2::new(0x2C));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0x0B);

        let decoded = RegistrationReject::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_registration_complete_empty_body() {
        let msg = RegistrationComplete::new();
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert!(buf.is_empty());

        let decoded =
            RegistrationComplete::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_registration_request_truncated_identity() {
        // mobile identity length claims 9 octets, none follow
        let data = [0x09, 0x00, 0x09];
        let result = RegistrationRequest::decode(&mut data.as_slice(), DecodePolicy::Strict);
        assert!(matches!(result, Err(CodecError::BufferTooShort { .. })));
    }
}
