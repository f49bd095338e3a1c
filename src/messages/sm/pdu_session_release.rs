//! PDU Session Release Messages (3GPP TS 24.501 Sections 8.3.12-8.3.15)

use bytes::{Buf, BufMut};

use crate::codec::{get_u8, skip_unknown_ie, CodecResult, DecodePolicy};
use crate::enums::SmMessageType;
use crate::ies::ie3::{Ie5gSmCause, SmCause};
use crate::ies::ie4::IeGprsTimer3;
use crate::ies::pco::IeExtendedPco;

/// IEI values for PDU session release optional IEs
mod release_iei {
    /// 5GSM cause (TV)
    pub const SM_CAUSE: u8 = 0x59;
    /// Back-off timer value (TLV)
    pub const BACK_OFF_TIMER_VALUE: u8 = 0x37;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

// ============================================================================
// PDU Session Release Request (3GPP TS 24.501 Section 8.3.12)
// ============================================================================

/// PDU Session Release Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionReleaseRequest {
    /// 5GSM cause (optional, IEI 0x59)
    pub sm_cause: Option<SmCause>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionReleaseRequest {
    /// Create a new PDU Session Release Request
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, SmMessageType::PduSessionReleaseRequest.into(), iei, policy)?;
                continue;
            }

            match iei {
                release_iei::SM_CAUSE => {
                    msg.sm_cause = Some(Ie5gSmCause::decode(buf)?.value);
                }
                release_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionReleaseRequest.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(cause) = self.sm_cause {
            buf.put_u8(release_iei::SM_CAUSE);
            Ie5gSmCause::new(cause).encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(release_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseRequest
    }
}

// ============================================================================
// PDU Session Release Reject (3GPP TS 24.501 Section 8.3.13)
// ============================================================================

/// PDU Session Release Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionReleaseReject {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionReleaseReject {
    /// Create a new PDU Session Release Reject
    pub fn new(cause: SmCause) -> Self {
        Self {
            sm_cause: Ie5gSmCause::new(cause),
            extended_pco: None,
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let sm_cause = Ie5gSmCause::decode(buf)?;
        let mut msg = Self {
            sm_cause,
            extended_pco: None,
        };

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, SmMessageType::PduSessionReleaseReject.into(), iei, policy)?;
                continue;
            }

            match iei {
                release_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionReleaseReject.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.sm_cause.encode(buf);

        if let Some(pco) = &self.extended_pco {
            buf.put_u8(release_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseReject
    }
}

// ============================================================================
// PDU Session Release Command (3GPP TS 24.501 Section 8.3.14)
// ============================================================================

/// PDU Session Release Command message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionReleaseCommand {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
    /// Back-off timer value (optional, IEI 0x37)
    pub back_off_timer: Option<IeGprsTimer3>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionReleaseCommand {
    /// Create a new PDU Session Release Command
    pub fn new(cause: SmCause) -> Self {
        Self {
            sm_cause: Ie5gSmCause::new(cause),
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let sm_cause = Ie5gSmCause::decode(buf)?;
        let mut msg = Self {
            sm_cause,
            ..Default::default()
        };

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, SmMessageType::PduSessionReleaseCommand.into(), iei, policy)?;
                continue;
            }

            match iei {
                release_iei::BACK_OFF_TIMER_VALUE => {
                    msg.back_off_timer = Some(IeGprsTimer3::decode(buf)?);
                }
                release_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionReleaseCommand.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.sm_cause.encode(buf);

        if let Some(timer) = &self.back_off_timer {
            buf.put_u8(release_iei::BACK_OFF_TIMER_VALUE);
            timer.encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(release_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseCommand
    }
}

// ============================================================================
// PDU Session Release Complete (3GPP TS 24.501 Section 8.3.15)
// ============================================================================

/// PDU Session Release Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionReleaseComplete {
    /// 5GSM cause (optional, IEI 0x59)
    pub sm_cause: Option<SmCause>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionReleaseComplete {
    /// Create a new PDU Session Release Complete
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(buf, SmMessageType::PduSessionReleaseComplete.into(), iei, policy)?;
                continue;
            }

            match iei {
                release_iei::SM_CAUSE => {
                    msg.sm_cause = Some(Ie5gSmCause::decode(buf)?.value);
                }
                release_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionReleaseComplete.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(cause) = self.sm_cause {
            buf.put_u8(release_iei::SM_CAUSE);
            Ie5gSmCause::new(cause).encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(release_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionReleaseComplete
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::ie4::GprsTimer3Unit;

    #[test]
    fn test_release_request_round_trip() {
        let mut msg = PduSessionReleaseRequest::new();
        msg.sm_cause = Some(SmCause::RegularDeactivation);

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x59, 0x24]);

        let decoded =
            PduSessionReleaseRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_release_command_round_trip() {
        let mut msg = PduSessionReleaseCommand::new(SmCause::RegularDeactivation);
        msg.back_off_timer = Some(IeGprsTimer3::new(GprsTimer3Unit::Multiples2Seconds, 10));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0x24);

        let decoded =
            PduSessionReleaseCommand::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_release_reject_round_trip() {
        let msg = PduSessionReleaseReject::new(SmCause::InvalidPduSessionIdentity);
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x2B]);

        let decoded =
            PduSessionReleaseReject::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_release_complete_empty_body() {
        let msg = PduSessionReleaseComplete::new();
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert!(buf.is_empty());

        let decoded =
            PduSessionReleaseComplete::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }
}
