//! PDU Session Modification Messages (3GPP TS 24.501 Sections 8.3.7-8.3.11)
//!
//! The UE requests changed QoS with Modification Request; the network
//! answers with Modification Command carrying the authorized rules, which
//! the UE confirms with Modification Complete.

use bytes::{Buf, BufMut};

use crate::codec::{get_u8, skip_unknown_ie, CodecResult, DecodePolicy};
use crate::enums::SmMessageType;
use crate::ies::ie3::{Ie5gSmCause, SmCause};
use crate::ies::ie4::{Ie5gSmCapability, IeGprsTimer3, IeSessionAmbr};
use crate::ies::pco::IeExtendedPco;
use crate::ies::qos::{IeQosFlowDescriptions, IeQosRules};

/// IEI values for PDU Session Modification Request optional IEs
mod modification_request_iei {
    /// 5GSM capability (TLV)
    pub const SM_CAPABILITY: u8 = 0x28;
    /// Requested QoS rules (TLV-E)
    pub const QOS_RULES: u8 = 0x7A;
    /// Requested QoS flow descriptions (TLV-E)
    pub const QOS_FLOW_DESCRIPTIONS: u8 = 0x79;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

/// IEI values for PDU Session Modification Command optional IEs
mod modification_command_iei {
    /// 5GSM cause (TV)
    pub const SM_CAUSE: u8 = 0x59;
    /// Session AMBR (TLV)
    pub const SESSION_AMBR: u8 = 0x2A;
    /// Authorized QoS rules (TLV-E)
    pub const QOS_RULES: u8 = 0x7A;
    /// Authorized QoS flow descriptions (TLV-E)
    pub const QOS_FLOW_DESCRIPTIONS: u8 = 0x79;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

/// IEI values shared by the reject / complete / command-reject messages
mod modification_result_iei {
    /// Back-off timer value (TLV)
    pub const BACK_OFF_TIMER_VALUE: u8 = 0x37;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

// ============================================================================
// PDU Session Modification Request (3GPP TS 24.501 Section 8.3.7)
// ============================================================================

/// PDU Session Modification Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionModificationRequest {
    /// 5GSM capability (optional, IEI 0x28)
    pub sm_capability: Option<Ie5gSmCapability>,
    /// Requested QoS rules (optional, IEI 0x7A)
    pub requested_qos_rules: Option<IeQosRules>,
    /// Requested QoS flow descriptions (optional, IEI 0x79)
    pub requested_qos_flow_descriptions: Option<IeQosFlowDescriptions>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionModificationRequest {
    /// Create a new PDU Session Modification Request
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationRequest.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                modification_request_iei::SM_CAPABILITY => {
                    msg.sm_capability = Some(Ie5gSmCapability::decode(buf)?);
                }
                modification_request_iei::QOS_RULES => {
                    msg.requested_qos_rules = Some(IeQosRules::decode(buf)?);
                }
                modification_request_iei::QOS_FLOW_DESCRIPTIONS => {
                    msg.requested_qos_flow_descriptions = Some(IeQosFlowDescriptions::decode(buf)?);
                }
                modification_request_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationRequest.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(cap) = &self.sm_capability {
            buf.put_u8(modification_request_iei::SM_CAPABILITY);
            cap.encode(buf);
        }
        if let Some(rules) = &self.requested_qos_rules {
            buf.put_u8(modification_request_iei::QOS_RULES);
            rules.encode(buf)?;
        }
        if let Some(flows) = &self.requested_qos_flow_descriptions {
            buf.put_u8(modification_request_iei::QOS_FLOW_DESCRIPTIONS);
            flows.encode(buf)?;
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(modification_request_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionModificationRequest
    }
}

// ============================================================================
// PDU Session Modification Reject (3GPP TS 24.501 Section 8.3.8)
// ============================================================================

/// PDU Session Modification Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionModificationReject {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
    /// Back-off timer value (optional, IEI 0x37)
    pub back_off_timer: Option<IeGprsTimer3>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionModificationReject {
    /// Create a new PDU Session Modification Reject
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
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationReject.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                modification_result_iei::BACK_OFF_TIMER_VALUE => {
                    msg.back_off_timer = Some(IeGprsTimer3::decode(buf)?);
                }
                modification_result_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationReject.into(),
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
            buf.put_u8(modification_result_iei::BACK_OFF_TIMER_VALUE);
            timer.encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(modification_result_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionModificationReject
    }
}

// ============================================================================
// PDU Session Modification Command (3GPP TS 24.501 Section 8.3.9)
// ============================================================================

/// PDU Session Modification Command message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionModificationCommand {
    /// 5GSM cause (optional, IEI 0x59)
    pub sm_cause: Option<SmCause>,
    /// Session AMBR (optional, IEI 0x2A)
    pub session_ambr: Option<IeSessionAmbr>,
    /// Authorized QoS rules (optional, IEI 0x7A)
    pub authorized_qos_rules: Option<IeQosRules>,
    /// Authorized QoS flow descriptions (optional, IEI 0x79)
    pub authorized_qos_flow_descriptions: Option<IeQosFlowDescriptions>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionModificationCommand {
    /// Create a new PDU Session Modification Command
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationCommand.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                modification_command_iei::SM_CAUSE => {
                    msg.sm_cause = Some(Ie5gSmCause::decode(buf)?.value);
                }
                modification_command_iei::SESSION_AMBR => {
                    msg.session_ambr = Some(IeSessionAmbr::decode(buf)?);
                }
                modification_command_iei::QOS_RULES => {
                    msg.authorized_qos_rules = Some(IeQosRules::decode(buf)?);
                }
                modification_command_iei::QOS_FLOW_DESCRIPTIONS => {
                    msg.authorized_qos_flow_descriptions =
                        Some(IeQosFlowDescriptions::decode(buf)?);
                }
                modification_command_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationCommand.into(),
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
            buf.put_u8(modification_command_iei::SM_CAUSE);
            Ie5gSmCause::new(cause).encode(buf);
        }
        if let Some(ambr) = &self.session_ambr {
            buf.put_u8(modification_command_iei::SESSION_AMBR);
            ambr.encode(buf);
        }
        if let Some(rules) = &self.authorized_qos_rules {
            buf.put_u8(modification_command_iei::QOS_RULES);
            rules.encode(buf)?;
        }
        if let Some(flows) = &self.authorized_qos_flow_descriptions {
            buf.put_u8(modification_command_iei::QOS_FLOW_DESCRIPTIONS);
            flows.encode(buf)?;
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(modification_command_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionModificationCommand
    }
}

// ============================================================================
// PDU Session Modification Complete (3GPP TS 24.501 Section 8.3.10)
// ============================================================================

/// PDU Session Modification Complete message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionModificationComplete {
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionModificationComplete {
    /// Create a new PDU Session Modification Complete
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let mut msg = Self::default();

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationComplete.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                modification_result_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationComplete.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(modification_result_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionModificationComplete
    }
}

// ============================================================================
// PDU Session Modification Command Reject (3GPP TS 24.501 Section 8.3.11)
// ============================================================================

/// PDU Session Modification Command Reject message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionModificationCommandReject {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionModificationCommandReject {
    /// Create a new PDU Session Modification Command Reject
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
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationCommandReject.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                modification_result_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionModificationCommandReject.into(),
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
            buf.put_u8(modification_result_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionModificationCommandReject
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ies::qos::{QosFlowDescription, QosRule};

    #[test]
    fn test_modification_request_round_trip() {
        let mut msg = PduSessionModificationRequest::new();
        msg.requested_qos_rules = Some(IeQosRules::new(vec![QosRule::default_match_all(2, 100, 5)]));
        msg.requested_qos_flow_descriptions =
            Some(IeQosFlowDescriptions::new(vec![QosFlowDescription::create(5, 9)]));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf[0], 0x7A);

        let decoded =
            PduSessionModificationRequest::decode(&mut buf.as_slice(), DecodePolicy::Strict)
                .unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_modification_command_round_trip() {
        let mut msg = PduSessionModificationCommand::new();
        msg.sm_cause = Some(SmCause::ReactivationRequested);
        msg.session_ambr = Some(IeSessionAmbr::new(
            IeSessionAmbr::UNIT_1_MBPS,
            200,
            IeSessionAmbr::UNIT_1_MBPS,
            100,
        ));
        msg.authorized_qos_rules = Some(IeQosRules::new(vec![QosRule::default_match_all(1, 255, 1)]));

        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x59, 0x27]);

        let decoded =
            PduSessionModificationCommand::decode(&mut buf.as_slice(), DecodePolicy::Strict)
                .unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_modification_reject_round_trip() {
        let msg = PduSessionModificationReject::new(SmCause::PduSessionDoesNotExist);
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x36]);

        let decoded =
            PduSessionModificationReject::decode(&mut buf.as_slice(), DecodePolicy::Strict)
                .unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_modification_complete_and_command_reject() {
        let complete = PduSessionModificationComplete::new();
        let mut buf = Vec::new();
        complete.encode(&mut buf).unwrap();
        assert!(buf.is_empty());

        let reject = PduSessionModificationCommandReject::new(SmCause::InvalidMandatoryInformation);
        let mut buf = Vec::new();
        reject.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x60]);

        let decoded = PduSessionModificationCommandReject::decode(
            &mut buf.as_slice(),
            DecodePolicy::Strict,
        )
        .unwrap();
        assert_eq!(decoded, reject);
    }
}
