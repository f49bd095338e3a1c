//! Authentication Messages (3GPP TS 24.501 Sections 8.2.1-8.2.5)
//!
//! Primary authentication over 5G AKA. The RAND challenge is a fixed
//! 16-octet TV field; AUTN and RES carry their own lengths.

use bytes::{Buf, BufMut};

use crate::codec::{
    get_bytes, get_len_u8, get_u8, skip_unknown_ie, CodecError, CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{IeNasKeySetIdentifier, InformationElement1};
use crate::ies::ie3::{Ie5gMmCause, MmCause};

/// IEI values for Authentication Request optional IEs
mod authentication_request_iei {
    /// Authentication parameter RAND (TV, 16 value octets)
    pub const RAND: u8 = 0x21;
    /// Authentication parameter AUTN (TLV, 16 value octets)
    pub const AUTN: u8 = 0x20;
}

/// IEI values for Authentication Response optional IEs
mod authentication_response_iei {
    /// Authentication response parameter RES* (TLV)
    pub const RES: u8 = 0x2D;
}

/// IEI values for Authentication Failure optional IEs
mod authentication_failure_iei {
    /// Authentication failure parameter AUTS (TLV, 14 value octets)
    pub const AUTS: u8 = 0x30;
}

// ============================================================================
// Authentication Request (3GPP TS 24.501 Section 8.2.1)
// ============================================================================

/// Authentication Request message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationRequest {
    /// ngKSI (mandatory, low nibble, high nibble spare)
    pub ngksi: IeNasKeySetIdentifier,
    /// ABBA parameter (mandatory, LV)
    pub abba: Vec<u8>,
    /// RAND challenge (optional, IEI 0x21, 16 octets)
    pub rand: Option<[u8; 16]>,
    /// AUTN token (optional, IEI 0x20, 16 octets)
    pub autn: Option<[u8; 16]>,
}

impl AuthenticationRequest {
    /// Create a new Authentication Request
    pub fn new(ngksi: IeNasKeySetIdentifier, abba: Vec<u8>) -> Self {
        Self {
            ngksi,
            abba,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let packed = get_u8(buf)?;
        let ngksi = IeNasKeySetIdentifier::decode(packed & 0x0F)?;

        let abba_len = get_len_u8(buf)?;
        let abba = get_bytes(buf, abba_len)?;

        let mut msg = Self::new(ngksi, abba);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::AuthenticationRequest.into(), iei, policy)?;
                continue;
            }

            match iei {
                authentication_request_iei::RAND => {
                    let bytes = get_bytes(buf, 16)?;
                    let mut rand = [0u8; 16];
                    rand.copy_from_slice(&bytes);
                    msg.rand = Some(rand);
                }
                authentication_request_iei::AUTN => {
                    let len = get_len_u8(buf)?;
                    if len != 16 {
                        return Err(CodecError::MalformedField("AUTN length"));
                    }
                    let bytes = get_bytes(buf, 16)?;
                    let mut autn = [0u8; 16];
                    autn.copy_from_slice(&bytes);
                    msg.autn = Some(autn);
                }
                _ => {
                    skip_unknown_ie(buf, MmMessageType::AuthenticationRequest.into(), iei, policy)?
                }
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.ngksi.encode() & 0x0F);
        crate::codec::put_len_u8(self.abba.len(), buf)?;
        buf.put_slice(&self.abba);

        if let Some(rand) = &self.rand {
            buf.put_u8(authentication_request_iei::RAND);
            buf.put_slice(rand);
        }
        if let Some(autn) = &self.autn {
            buf.put_u8(authentication_request_iei::AUTN);
            buf.put_u8(16);
            buf.put_slice(autn);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::AuthenticationRequest
    }
}

// ============================================================================
// Authentication Response (3GPP TS 24.501 Section 8.2.2)
// ============================================================================

/// Authentication Response message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationResponse {
    /// Authentication response parameter RES* (optional, IEI 0x2D, 4-16 octets)
    pub res: Option<Vec<u8>>,
}

impl AuthenticationResponse {
    /// Create a new Authentication Response carrying a RES* value
    pub fn new(res: Vec<u8>) -> Self {
        Self { res: Some(res) }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::AuthenticationResponse.into(), iei, policy)?;
                continue;
            }

            match iei {
                authentication_response_iei::RES => {
                    let len = get_len_u8(buf)?;
                    if !(4..=16).contains(&len) {
                        return Err(CodecError::MalformedField("RES* length"));
                    }
                    msg.res = Some(get_bytes(buf, len)?);
                }
                _ => {
                    skip_unknown_ie(buf, MmMessageType::AuthenticationResponse.into(), iei, policy)?
                }
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(res) = &self.res {
            if !(4..=16).contains(&res.len()) {
                return Err(CodecError::MalformedField("RES* length"));
            }
            buf.put_u8(authentication_response_iei::RES);
            crate::codec::put_len_u8(res.len(), buf)?;
            buf.put_slice(res);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::AuthenticationResponse
    }
}

// ============================================================================
// Authentication Reject (3GPP TS 24.501 Section 8.2.5)
// ============================================================================

/// Authentication Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationReject {}

impl AuthenticationReject {
    /// Create a new Authentication Reject
    pub fn new() -> Self {
        Self {}
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, MmMessageType::AuthenticationReject.into(), iei, policy)?;
        }
        Ok(Self {})
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, _buf: &mut B) -> CodecResult<()> {
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::AuthenticationReject
    }
}

// ============================================================================
// Authentication Failure (3GPP TS 24.501 Section 8.2.4)
// ============================================================================

/// Authentication Failure message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthenticationFailure {
    /// 5GMM cause (mandatory)
    pub mm_cause: Ie5gMmCause,
    /// Authentication failure parameter AUTS (optional, IEI 0x30, 14 octets)
    pub auts: Option<Vec<u8>>,
}

impl AuthenticationFailure {
    /// Create a new Authentication Failure
    pub fn new(cause: MmCause) -> Self {
        Self {
            mm_cause: Ie5gMmCause::new(cause),
            auts: None,
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mm_cause = Ie5gMmCause::decode(buf)?;
        let mut msg = Self {
            mm_cause,
            auts: None,
        };

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::AuthenticationFailure.into(), iei, policy)?;
                continue;
            }

            match iei {
                authentication_failure_iei::AUTS => {
                    let len = get_len_u8(buf)?;
                    if len != 14 {
                        return Err(CodecError::MalformedField("AUTS length"));
                    }
                    msg.auts = Some(get_bytes(buf, len)?);
                }
                _ => {
                    skip_unknown_ie(buf, MmMessageType::AuthenticationFailure.into(), iei, policy)?
                }
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.mm_cause.encode(buf);

        if let Some(auts) = &self.auts {
            if auts.len() != 14 {
                return Err(CodecError::MalformedField("AUTS length"));
            }
            buf.put_u8(authentication_failure_iei::AUTS);
            buf.put_u8(14);
            buf.put_slice(auts);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::AuthenticationFailure
    }
}

// ============================================================================
// Tests
// ============================================================================
