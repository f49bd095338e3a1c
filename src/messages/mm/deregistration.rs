//! De-registration Messages (3GPP TS 24.501 Sections 8.2.12-8.2.15)
//!
//! Both directions of the de-registration procedure. The UE-originating
//! request carries the mobile identity; the network-originating request
//! may carry a cause and a back-off timer.

use bytes::{Buf, BufMut};

use crate::codec::{
    decode_nibble_pair, encode_nibble_pair, get_u8, skip_unknown_ie, CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{IeDeRegistrationType, IeNasKeySetIdentifier, InformationElement1};
use crate::ies::ie3::{Ie5gMmCause, MmCause};
use crate::ies::ie4::{Ie5gsMobileIdentity, IeGprsTimer2};

/// IEI values for the UE-terminated De-registration Request optional IEs
mod deregistration_request_ue_terminated_iei {
    /// 5GMM cause (TV)
    pub const MM_CAUSE: u8 = 0x58;
    /// T3346 value (TLV)
    pub const T3346_VALUE: u8 = 0x5F;
}

// ============================================================================
// De-registration Request, UE originating (3GPP TS 24.501 Section 8.2.12)
// ============================================================================

/// De-registration Request message, UE originating
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeregistrationRequestUeOriginating {
    /// De-registration type (mandatory, low nibble of octet 1)
    pub deregistration_type: IeDeRegistrationType,
    /// ngKSI (mandatory, high nibble of octet 1)
    pub ngksi: IeNasKeySetIdentifier,
    /// 5GS mobile identity (mandatory, LV-E)
    pub mobile_identity: Ie5gsMobileIdentity,
}

impl DeregistrationRequestUeOriginating {
    /// Create a new UE-originating De-registration Request
    pub fn new(
        deregistration_type: IeDeRegistrationType,
        ngksi: IeNasKeySetIdentifier,
        mobile_identity: Ie5gsMobileIdentity,
    ) -> Self {
        Self {
            deregistration_type,
            ngksi,
            mobile_identity,
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let (ngksi_bits, type_bits) = decode_nibble_pair(buf)?;
        let deregistration_type = IeDeRegistrationType::decode(type_bits)?;
        let ngksi = IeNasKeySetIdentifier::decode(ngksi_bits)?;
        let mobile_identity = Ie5gsMobileIdentity::decode(buf)?;

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(
                buf,
                MmMessageType::DeregistrationRequestUeOriginating.into(),
                iei,
                policy,
            )?;
        }

        Ok(Self::new(deregistration_type, ngksi, mobile_identity))
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        encode_nibble_pair(self.ngksi.encode(), self.deregistration_type.encode(), buf);
        self.mobile_identity.encode(buf)
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::DeregistrationRequestUeOriginating
    }
}

// ============================================================================
// De-registration Accept, UE originating (3GPP TS 24.501 Section 8.2.13)
// ============================================================================

/// De-registration Accept message, UE originating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeregistrationAcceptUeOriginating {}

impl DeregistrationAcceptUeOriginating {
    /// Create a new UE-originating De-registration Accept
    pub fn new() -> Self {
        Self {}
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(
                buf,
                MmMessageType::DeregistrationAcceptUeOriginating.into(),
                iei,
                policy,
            )?;
        }
        Ok(Self {})
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, _buf: &mut B) -> CodecResult<()> {
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::DeregistrationAcceptUeOriginating
    }
}

// ============================================================================
// De-registration Request, UE terminated (3GPP TS 24.501 Section 8.2.14)
// ============================================================================

/// De-registration Request message, UE terminated
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeregistrationRequestUeTerminated {
    /// De-registration type (mandatory, low nibble, high nibble spare)
    pub deregistration_type: IeDeRegistrationType,
    /// 5GMM cause (optional, IEI 0x58)
    pub mm_cause: Option<MmCause>,
    /// T3346 value (optional, IEI 0x5F)
    pub t3346: Option<IeGprsTimer2>,
}

impl DeregistrationRequestUeTerminated {
    /// Create a new UE-terminated De-registration Request
    pub fn new(deregistration_type: IeDeRegistrationType) -> Self {
        Self {
            deregistration_type,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let packed = get_u8(buf)?;
        let deregistration_type = IeDeRegistrationType::decode(packed & 0x0F)?;

        let mut msg = Self::new(deregistration_type);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(
                    buf,
                    MmMessageType::DeregistrationRequestUeTerminated.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                deregistration_request_ue_terminated_iei::MM_CAUSE => {
                    msg.mm_cause = Some(Ie5gMmCause::decode(buf)?.value);
                }
                deregistration_request_ue_terminated_iei::T3346_VALUE => {
                    msg.t3346 = Some(IeGprsTimer2::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    MmMessageType::DeregistrationRequestUeTerminated.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(self.deregistration_type.encode() & 0x0F);

        if let Some(cause) = self.mm_cause {
            buf.put_u8(deregistration_request_ue_terminated_iei::MM_CAUSE);
            Ie5gMmCause::new(cause).encode(buf);
        }
        if let Some(t3346) = &self.t3346 {
            buf.put_u8(deregistration_request_ue_terminated_iei::T3346_VALUE);
            t3346.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::DeregistrationRequestUeTerminated
    }
}

// ============================================================================
// De-registration Accept, UE terminated (3GPP TS 24.501 Section 8.2.15)
// ============================================================================

/// De-registration Accept message, UE terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeregistrationAcceptUeTerminated {}

impl DeregistrationAcceptUeTerminated {
    /// Create a new UE-terminated De-registration Accept
    pub fn new() -> Self {
        Self {}
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(
                buf,
                MmMessageType::DeregistrationAcceptUeTerminated.into(),
                iei,
                policy,
            )?;
        }
        Ok(Self {})
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, _buf: &mut B) -> CodecResult<()> {
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::DeregistrationAcceptUeTerminated
    }
}

// ============================================================================
// Tests
// ============================================================================
