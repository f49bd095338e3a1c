//! Identity Messages (3GPP TS 24.501 Sections 8.2.21-8.2.22)

use bytes::{Buf, BufMut};

use crate::codec::{get_u8, skip_unknown_ie, CodecResult, DecodePolicy};
use crate::enums::MmMessageType;
use crate::ies::ie1::{Ie5gsIdentityType, IdentityType, InformationElement1};
use crate::ies::ie4::Ie5gsMobileIdentity;

/// Identity Request message (network to UE)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IdentityRequest {
    /// Requested identity type (mandatory, low nibble, high nibble spare)
    pub identity_type: Ie5gsIdentityType,
}

impl IdentityRequest {
    /// Create a new Identity Request
    pub fn new(identity_type: IdentityType) -> Self {
        Self {
            identity_type: Ie5gsIdentityType::new(identity_type),
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let packed = get_u8(buf)?;
        let identity_type = Ie5gsIdentityType::decode(packed & 0x0F)?;

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, MmMessageType::IdentityRequest.into(), iei, policy)?;
        }

        Ok(Self { identity_type })
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.identity_type.encode() & 0x0F);
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::IdentityRequest
    }
}

/// Identity Response message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IdentityResponse {
    /// Mobile identity (mandatory, LV-E)
    pub mobile_identity: Ie5gsMobileIdentity,
}

impl IdentityResponse {
    /// Create a new Identity Response
    pub fn new(mobile_identity: Ie5gsMobileIdentity) -> Self {
        Self { mobile_identity }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mobile_identity = Ie5gsMobileIdentity::decode(buf)?;

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, MmMessageType::IdentityResponse.into(), iei, policy)?;
        }

        Ok(Self { mobile_identity })
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.mobile_identity.encode(buf)
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::IdentityResponse
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[test]
    fn test_identity_request_round_trip() {
        let msg = IdentityRequest::new(IdentityType::Suci);
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x01]);

        let decoded = IdentityRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_identity_response_round_trip() {
        let msg = IdentityResponse::new(Ie5gsMobileIdentity::new(vec![
            0x01, 0x00, 0xF1, 0x10, 0x00, 0x00, 0x01, 0x23, 0x45,
        ]));
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x00, 0x09]);

        let decoded = IdentityResponse::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_identity_request_invalid_type_nibble() {
        let data = [0x07];
        assert_eq!(
            IdentityRequest::decode(&mut data.as_slice(), DecodePolicy::Strict),
            Err(CodecError::MalformedField("identity type"))
        );
    }
}
