//! Security Mode Control Messages (3GPP TS 24.501 Sections 8.2.25-8.2.27)
//!
//! The network selects NAS security algorithms with Security Mode Command;
//! the UE answers with Security Mode Complete or rejects the selection.

use bytes::{Buf, BufMut};

use crate::codec::{
    get_bytes, get_len_u16, get_len_u8, get_u8, skip_unknown_ie, CodecResult, DecodePolicy,
};
use crate::enums::MmMessageType;
use crate::ies::ie1::{IeNasKeySetIdentifier, InformationElement1};
use crate::ies::ie3::{Ie5gMmCause, IeNasSecurityAlgorithms, MmCause};
use crate::ies::ie4::{Ie5gsMobileIdentity, IeUeSecurityCapability};

/// IEI values for Security Mode Command optional IEs
mod security_mode_command_iei {
    /// IMEISV request (Type 1, IEI in the high nibble)
    pub const IMEISV_REQUEST_HIGH_NIBBLE: u8 = 0xE;
    /// Additional 5G security information (TLV)
    pub const ADDITIONAL_SECURITY_INFORMATION: u8 = 0x36;
}

/// IEI values for Security Mode Complete optional IEs
mod security_mode_complete_iei {
    /// IMEISV mobile identity (TLV-E)
    pub const IMEISV: u8 = 0x77;
    /// Replayed NAS message container (TLV-E)
    pub const NAS_MESSAGE_CONTAINER: u8 = 0x71;
}

// ============================================================================
// Security Mode Command (3GPP TS 24.501 Section 8.2.25)
// ============================================================================

/// Security Mode Command message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityModeCommand {
    /// Selected NAS security algorithms (mandatory, one octet)
    pub security_algorithms: IeNasSecurityAlgorithms,
    /// ngKSI (mandatory, low nibble, high nibble spare)
    pub ngksi: IeNasKeySetIdentifier,
    /// Replayed UE security capabilities (mandatory, LV)
    pub replayed_ue_security_capability: IeUeSecurityCapability,
    /// IMEISV requested (optional, Type 1, IEI 0xE)
    pub imeisv_requested: Option<bool>,
    /// Additional 5G security information (optional, IEI 0x36), raw value
    pub additional_security_information: Option<Vec<u8>>,
}

impl SecurityModeCommand {
    /// Create a new Security Mode Command
    pub fn new(
        security_algorithms: IeNasSecurityAlgorithms,
        ngksi: IeNasKeySetIdentifier,
        replayed_ue_security_capability: IeUeSecurityCapability,
    ) -> Self {
        Self {
            security_algorithms,
            ngksi,
            replayed_ue_security_capability,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let security_algorithms = IeNasSecurityAlgorithms::decode(buf)?;
        let packed = get_u8(buf)?;
        let ngksi = IeNasKeySetIdentifier::decode(packed & 0x0F)?;
        let replayed_ue_security_capability = IeUeSecurityCapability::decode(buf)?;

        let mut msg = Self::new(security_algorithms, ngksi, replayed_ue_security_capability);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                match (iei >> 4) & 0x0F {
                    security_mode_command_iei::IMEISV_REQUEST_HIGH_NIBBLE => {
                        msg.imeisv_requested = Some(iei & 0x07 != 0);
                    }
                    _ => {
                        skip_unknown_ie(buf, MmMessageType::SecurityModeCommand.into(), iei, policy)?
                    }
                }
                continue;
            }

            match iei {
                security_mode_command_iei::ADDITIONAL_SECURITY_INFORMATION => {
                    let len = get_len_u8(buf)?;
                    msg.additional_security_information = Some(get_bytes(buf, len)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::SecurityModeCommand.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.security_algorithms.encode(buf);
        buf.put_u8(self.ngksi.encode() & 0x0F);
        self.replayed_ue_security_capability.encode(buf);

        if let Some(requested) = self.imeisv_requested {
            let value = if requested { 0x01 } else { 0x00 };
            buf.put_u8((security_mode_command_iei::IMEISV_REQUEST_HIGH_NIBBLE << 4) | value);
        }
        if let Some(info) = &self.additional_security_information {
            buf.put_u8(security_mode_command_iei::ADDITIONAL_SECURITY_INFORMATION);
            crate::codec::put_len_u8(info.len(), buf)?;
            buf.put_slice(info);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::SecurityModeCommand
    }
}

// ============================================================================
// Security Mode Complete (3GPP TS 24.501 Section 8.2.26)
// ============================================================================

/// Security Mode Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SecurityModeComplete {
    /// IMEISV (optional, IEI 0x77)
    pub imeisv: Option<Ie5gsMobileIdentity>,
    /// Replayed NAS message container (optional, IEI 0x71), raw value
    pub nas_message_container: Option<Vec<u8>>,
}

impl SecurityModeComplete {
    /// Create a new Security Mode Complete
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, MmMessageType::SecurityModeComplete.into(), iei, policy)?;
                continue;
            }

            match iei {
                security_mode_complete_iei::IMEISV => {
                    msg.imeisv = Some(Ie5gsMobileIdentity::decode(buf)?);
                }
                security_mode_complete_iei::NAS_MESSAGE_CONTAINER => {
                    let len = get_len_u16(buf)?;
                    msg.nas_message_container = Some(get_bytes(buf, len)?);
                }
                _ => skip_unknown_ie(buf, MmMessageType::SecurityModeComplete.into(), iei, policy)?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(imeisv) = &self.imeisv {
            buf.put_u8(security_mode_complete_iei::IMEISV);
            imeisv.encode(buf)?;
        }
        if let Some(container) = &self.nas_message_container {
            buf.put_u8(security_mode_complete_iei::NAS_MESSAGE_CONTAINER);
            crate::codec::put_len_u16(container.len(), buf)?;
            buf.put_slice(container);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::SecurityModeComplete
    }
}

// ============================================================================
// Security Mode Reject (3GPP TS 24.501 Section 8.2.27)
// ============================================================================

/// Security Mode Reject message (UE to network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecurityModeReject {
    /// 5GMM cause (mandatory)
    pub mm_cause: Ie5gMmCause,
}

impl SecurityModeReject {
    /// Create a new Security Mode Reject
    pub fn new(cause: MmCause) -> Self {
        Self {
            mm_cause: Ie5gMmCause::new(cause),
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mm_cause = Ie5gMmCause::decode(buf)?;

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, MmMessageType::SecurityModeReject.into(), iei, policy)?;
        }

        Ok(Self { mm_cause })
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.mm_cause.encode(buf);
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> MmMessageType {
        MmMessageType::SecurityModeReject
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
    use crate::ies::ie3::{TypeOfCipheringAlgorithm, TypeOfIntegrityProtectionAlgorithm};

    #[test]
    fn test_security_mode_command_round_trip() {
        let mut msg = SecurityModeCommand::new(
            IeNasSecurityAlgorithms::new(
                TypeOfCipheringAlgorithm::Ea0,
                TypeOfIntegrityProtectionAlgorithm::Ia2_128,
            ),
            IeNasKeySetIdentifier::new(TypeOfSecurityContext::NativeSecurityContext, 0),
            IeUeSecurityCapability::new(0xE0, 0xE0),
        );
        msg.imeisv_requested = Some(true);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0x02); // EA0 << 4 | IA2
        assert_eq!(buf[1], 0x00); // ngKSI
        assert_eq!(*buf.last().unwrap(), 0xE1); // IMEISV request

        let decoded =
            SecurityModeCommand::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_security_mode_complete_round_trip() {
        let mut msg = SecurityModeComplete::new();
        msg.imeisv = Some(Ie5gsMobileIdentity::new(vec![
            0xF5, 0x33, 0x66, 0x99, 0x01, 0x23, 0x45, 0x67, 0x89,
        ]));
        msg.nas_message_container = Some(vec![0x7E, 0x00, 0x41]);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();

        let decoded =
            SecurityModeComplete::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_security_mode_reject_round_trip() {
        let msg = SecurityModeReject::new(MmCause::UeSecurityCapMismatch);
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x17]);

        let decoded =
            SecurityModeReject::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_security_mode_reject_empty_body() {
        let data: [u8; 0] = [];
        assert!(matches!(
            SecurityModeReject::decode(&mut data.as_slice(), DecodePolicy::Strict),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
