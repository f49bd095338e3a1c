//! PDU Session Establishment Messages (3GPP TS 24.501 Sections 8.3.1-8.3.3)
//!
//! Request / Accept / Reject for establishing a PDU session. The accept
//! carries the authorized QoS rules and session AMBR; the reject carries a
//! 5GSM cause and optionally a back-off timer.

use bytes::{Buf, BufMut};

use crate::codec::{
    decode_nibble_pair, encode_nibble_pair, get_u8, skip_unknown_ie, CodecResult, DecodePolicy,
};
use crate::enums::SmMessageType;
use crate::ies::ie1::{
    IePduSessionType, IeSscMode, InformationElement1, PduSessionType, SscMode,
};
use crate::ies::ie3::{Ie5gSmCause, IeIntegrityProtectionMaximumDataRate, SmCause};
use crate::ies::ie4::{Ie5gSmCapability, IeDnn, IePduAddress, IeSNssai, IeSessionAmbr};
use crate::ies::pco::IeExtendedPco;
use crate::ies::qos::{IeQosFlowDescriptions, IeQosRules};

/// IEI values for PDU Session Establishment Request optional IEs
mod establishment_request_iei {
    /// PDU session type (Type 1, IEI in the high nibble)
    pub const PDU_SESSION_TYPE_HIGH_NIBBLE: u8 = 0x9;
    /// SSC mode (Type 1, IEI in the high nibble)
    pub const SSC_MODE_HIGH_NIBBLE: u8 = 0xA;
    /// 5GSM capability (TLV)
    pub const SM_CAPABILITY: u8 = 0x28;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

/// IEI values for PDU Session Establishment Accept optional IEs
mod establishment_accept_iei {
    /// 5GSM cause (TV)
    pub const SM_CAUSE: u8 = 0x59;
    /// PDU address (TLV)
    pub const PDU_ADDRESS: u8 = 0x29;
    /// S-NSSAI (TLV)
    pub const S_NSSAI: u8 = 0x22;
    /// Authorized QoS flow descriptions (TLV-E)
    pub const QOS_FLOW_DESCRIPTIONS: u8 = 0x79;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
    /// DNN (TLV)
    pub const DNN: u8 = 0x25;
}

/// IEI values for PDU Session Establishment Reject optional IEs
mod establishment_reject_iei {
    /// Back-off timer value (TLV)
    pub const BACK_OFF_TIMER_VALUE: u8 = 0x37;
    /// Extended protocol configuration options (TLV-E)
    pub const EXTENDED_PCO: u8 = 0x7B;
}

// ============================================================================
// PDU Session Establishment Request (3GPP TS 24.501 Section 8.3.1)
// ============================================================================

/// PDU Session Establishment Request message (UE to network)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionEstablishmentRequest {
    /// Integrity protection maximum data rate (mandatory, two octets)
    pub integrity_protection_max_data_rate: IeIntegrityProtectionMaximumDataRate,
    /// PDU session type (optional, Type 1, IEI 0x9)
    pub pdu_session_type: Option<PduSessionType>,
    /// SSC mode (optional, Type 1, IEI 0xA)
    pub ssc_mode: Option<SscMode>,
    /// 5GSM capability (optional, IEI 0x28)
    pub sm_capability: Option<Ie5gSmCapability>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionEstablishmentRequest {
    /// Create a new PDU Session Establishment Request
    pub fn new(integrity_protection_max_data_rate: IeIntegrityProtectionMaximumDataRate) -> Self {
        Self {
            integrity_protection_max_data_rate,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let integrity_protection_max_data_rate =
            IeIntegrityProtectionMaximumDataRate::decode(buf)?;

        let mut msg = Self::new(integrity_protection_max_data_rate);

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                match (iei >> 4) & 0x0F {
                    establishment_request_iei::PDU_SESSION_TYPE_HIGH_NIBBLE => {
                        msg.pdu_session_type =
                            Some(IePduSessionType::decode(iei & 0x0F)?.pdu_session_type);
                    }
                    establishment_request_iei::SSC_MODE_HIGH_NIBBLE => {
                        msg.ssc_mode = Some(IeSscMode::decode(iei & 0x0F)?.ssc_mode);
                    }
                    _ => skip_unknown_ie(
                        buf,
                        SmMessageType::PduSessionEstablishmentRequest.into(),
                        iei,
                        policy,
                    )?,
                }
                continue;
            }

            match iei {
                establishment_request_iei::SM_CAPABILITY => {
                    msg.sm_capability = Some(Ie5gSmCapability::decode(buf)?);
                }
                establishment_request_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionEstablishmentRequest.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.integrity_protection_max_data_rate.encode(buf);

        if let Some(pdu_type) = self.pdu_session_type {
            let val: u8 = pdu_type.into();
            buf.put_u8(
                (establishment_request_iei::PDU_SESSION_TYPE_HIGH_NIBBLE << 4) | (val & 0x07),
            );
        }
        if let Some(ssc) = self.ssc_mode {
            let val: u8 = ssc.into();
            buf.put_u8((establishment_request_iei::SSC_MODE_HIGH_NIBBLE << 4) | (val & 0x07));
        }
        if let Some(cap) = &self.sm_capability {
            buf.put_u8(establishment_request_iei::SM_CAPABILITY);
            cap.encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(establishment_request_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionEstablishmentRequest
    }
}

// ============================================================================
// PDU Session Establishment Accept (3GPP TS 24.501 Section 8.3.2)
// ============================================================================

/// PDU Session Establishment Accept message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionEstablishmentAccept {
    /// Selected SSC mode (mandatory, high nibble of octet 1)
    pub selected_ssc_mode: SscMode,
    /// Selected PDU session type (mandatory, low nibble of octet 1)
    pub selected_pdu_session_type: PduSessionType,
    /// Authorized QoS rules (mandatory, LV-E)
    pub authorized_qos_rules: IeQosRules,
    /// Session AMBR (mandatory, LV)
    pub session_ambr: IeSessionAmbr,
    /// 5GSM cause (optional, IEI 0x59)
    pub sm_cause: Option<SmCause>,
    /// PDU address (optional, IEI 0x29)
    pub pdu_address: Option<IePduAddress>,
    /// S-NSSAI (optional, IEI 0x22)
    pub s_nssai: Option<IeSNssai>,
    /// Authorized QoS flow descriptions (optional, IEI 0x79)
    pub qos_flow_descriptions: Option<IeQosFlowDescriptions>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
    /// DNN (optional, IEI 0x25)
    pub dnn: Option<IeDnn>,
}

impl PduSessionEstablishmentAccept {
    /// Create a new PDU Session Establishment Accept
    pub fn new(
        selected_ssc_mode: SscMode,
        selected_pdu_session_type: PduSessionType,
        authorized_qos_rules: IeQosRules,
        session_ambr: IeSessionAmbr,
    ) -> Self {
        Self {
            selected_ssc_mode,
            selected_pdu_session_type,
            authorized_qos_rules,
            session_ambr,
            ..Default::default()
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let (ssc_bits, type_bits) = decode_nibble_pair(buf)?;
        let selected_pdu_session_type = IePduSessionType::decode(type_bits)?.pdu_session_type;
        let selected_ssc_mode = IeSscMode::decode(ssc_bits)?.ssc_mode;
        let authorized_qos_rules = IeQosRules::decode(buf)?;
        let session_ambr = IeSessionAmbr::decode(buf)?;

        let mut msg = Self::new(
            selected_ssc_mode,
            selected_pdu_session_type,
            authorized_qos_rules,
            session_ambr,
        );

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;

            if iei & 0x80 != 0 {
                skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionEstablishmentAccept.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                establishment_accept_iei::SM_CAUSE => {
                    msg.sm_cause = Some(Ie5gSmCause::decode(buf)?.value);
                }
                establishment_accept_iei::PDU_ADDRESS => {
                    msg.pdu_address = Some(IePduAddress::decode(buf)?);
                }
                establishment_accept_iei::S_NSSAI => {
                    msg.s_nssai = Some(IeSNssai::decode(buf)?);
                }
                establishment_accept_iei::QOS_FLOW_DESCRIPTIONS => {
                    msg.qos_flow_descriptions = Some(IeQosFlowDescriptions::decode(buf)?);
                }
                establishment_accept_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                establishment_accept_iei::DNN => {
                    msg.dnn = Some(IeDnn::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionEstablishmentAccept.into(),
                    iei,
                    policy,
                )?,
            }
        }

        Ok(msg)
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let ssc_val: u8 = self.selected_ssc_mode.into();
        let type_val: u8 = self.selected_pdu_session_type.into();
        encode_nibble_pair(ssc_val, type_val, buf);
        self.authorized_qos_rules.encode(buf)?;
        self.session_ambr.encode(buf);

        if let Some(cause) = self.sm_cause {
            buf.put_u8(establishment_accept_iei::SM_CAUSE);
            Ie5gSmCause::new(cause).encode(buf);
        }
        if let Some(addr) = &self.pdu_address {
            buf.put_u8(establishment_accept_iei::PDU_ADDRESS);
            addr.encode(buf);
        }
        if let Some(nssai) = &self.s_nssai {
            buf.put_u8(establishment_accept_iei::S_NSSAI);
            nssai.encode(buf);
        }
        if let Some(flows) = &self.qos_flow_descriptions {
            buf.put_u8(establishment_accept_iei::QOS_FLOW_DESCRIPTIONS);
            flows.encode(buf)?;
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(establishment_accept_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        if let Some(dnn) = &self.dnn {
            buf.put_u8(establishment_accept_iei::DNN);
            dnn.encode(buf);
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionEstablishmentAccept
    }
}

// ============================================================================
// PDU Session Establishment Reject (3GPP TS 24.501 Section 8.3.3)
// ============================================================================

/// PDU Session Establishment Reject message (network to UE)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PduSessionEstablishmentReject {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
    /// Back-off timer value (optional, IEI 0x37)
    pub back_off_timer: Option<crate::ies::ie4::IeGprsTimer3>,
    /// Extended PCO (optional, IEI 0x7B)
    pub extended_pco: Option<IeExtendedPco>,
}

impl PduSessionEstablishmentReject {
    /// Create a new PDU Session Establishment Reject
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
                    SmMessageType::PduSessionEstablishmentReject.into(),
                    iei,
                    policy,
                )?;
                continue;
            }

            match iei {
                establishment_reject_iei::BACK_OFF_TIMER_VALUE => {
                    msg.back_off_timer = Some(crate::ies::ie4::IeGprsTimer3::decode(buf)?);
                }
                establishment_reject_iei::EXTENDED_PCO => {
                    msg.extended_pco = Some(IeExtendedPco::decode(buf)?);
                }
                _ => skip_unknown_ie(
                    buf,
                    SmMessageType::PduSessionEstablishmentReject.into(),
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
            buf.put_u8(establishment_reject_iei::BACK_OFF_TIMER_VALUE);
            timer.encode(buf);
        }
        if let Some(pco) = &self.extended_pco {
            buf.put_u8(establishment_reject_iei::EXTENDED_PCO);
            pco.encode(buf)?;
        }
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::PduSessionEstablishmentReject
    }
}

// ============================================================================
// Tests
// ============================================================================
