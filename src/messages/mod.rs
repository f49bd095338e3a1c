//! NAS message dispatcher
//!
//! Top-level decode entry points. A buffer is routed by its extended
//! protocol discriminator to the 5GMM or 5GSM family, then by the message
//! type octet to the concrete body. Security-protected frames are split
//! into their secured header and opaque payload; this crate does not
//! verify or decipher them.

use bytes::{Buf, BufMut};

use crate::codec::{CodecResult, DecodePolicy};
use crate::enums::{MessageType, MmMessageType, SmMessageType};
use crate::header::{NasHeader, NasHeaderType, PlainMmHeader, PlainSmHeader, SecuredHeader};

pub mod mm;
pub mod sm;

pub use mm::*;
pub use sm::*;

// ============================================================================
// 5GMM message body
// ============================================================================

/// Body of a plain 5GMM message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MmMessageBody {
    RegistrationRequest(RegistrationRequest),
    RegistrationAccept(RegistrationAccept),
    RegistrationComplete(RegistrationComplete),
    RegistrationReject(RegistrationReject),
    DeregistrationRequestUeOriginating(DeregistrationRequestUeOriginating),
    DeregistrationAcceptUeOriginating(DeregistrationAcceptUeOriginating),
    DeregistrationRequestUeTerminated(DeregistrationRequestUeTerminated),
    DeregistrationAcceptUeTerminated(DeregistrationAcceptUeTerminated),
    ServiceRequest(ServiceRequest),
    ServiceReject(ServiceReject),
    ServiceAccept(ServiceAccept),
    AuthenticationRequest(AuthenticationRequest),
    AuthenticationResponse(AuthenticationResponse),
    AuthenticationReject(AuthenticationReject),
    AuthenticationFailure(AuthenticationFailure),
    IdentityRequest(IdentityRequest),
    IdentityResponse(IdentityResponse),
    SecurityModeCommand(SecurityModeCommand),
    SecurityModeComplete(SecurityModeComplete),
    SecurityModeReject(SecurityModeReject),
    FiveGMmStatus(FiveGMmStatus),
    UlNasTransport(UlNasTransport),
    DlNasTransport(DlNasTransport),
}

impl MmMessageBody {
    /// Message type of the contained body
    pub fn message_type(&self) -> MmMessageType {
        match self {
            MmMessageBody::RegistrationRequest(_) => MmMessageType::RegistrationRequest,
            MmMessageBody::RegistrationAccept(_) => MmMessageType::RegistrationAccept,
            MmMessageBody::RegistrationComplete(_) => MmMessageType::RegistrationComplete,
            MmMessageBody::RegistrationReject(_) => MmMessageType::RegistrationReject,
            MmMessageBody::DeregistrationRequestUeOriginating(_) => {
                MmMessageType::DeregistrationRequestUeOriginating
            }
            MmMessageBody::DeregistrationAcceptUeOriginating(_) => {
                MmMessageType::DeregistrationAcceptUeOriginating
            }
            MmMessageBody::DeregistrationRequestUeTerminated(_) => {
                MmMessageType::DeregistrationRequestUeTerminated
            }
            MmMessageBody::DeregistrationAcceptUeTerminated(_) => {
                MmMessageType::DeregistrationAcceptUeTerminated
            }
            MmMessageBody::ServiceRequest(_) => MmMessageType::ServiceRequest,
            MmMessageBody::ServiceReject(_) => MmMessageType::ServiceReject,
            MmMessageBody::ServiceAccept(_) => MmMessageType::ServiceAccept,
            MmMessageBody::AuthenticationRequest(_) => MmMessageType::AuthenticationRequest,
            MmMessageBody::AuthenticationResponse(_) => MmMessageType::AuthenticationResponse,
            MmMessageBody::AuthenticationReject(_) => MmMessageType::AuthenticationReject,
            MmMessageBody::AuthenticationFailure(_) => MmMessageType::AuthenticationFailure,
            MmMessageBody::IdentityRequest(_) => MmMessageType::IdentityRequest,
            MmMessageBody::IdentityResponse(_) => MmMessageType::IdentityResponse,
            MmMessageBody::SecurityModeCommand(_) => MmMessageType::SecurityModeCommand,
            MmMessageBody::SecurityModeComplete(_) => MmMessageType::SecurityModeComplete,
            MmMessageBody::SecurityModeReject(_) => MmMessageType::SecurityModeReject,
            MmMessageBody::FiveGMmStatus(_) => MmMessageType::FiveGMmStatus,
            MmMessageBody::UlNasTransport(_) => MmMessageType::UlNasTransport,
            MmMessageBody::DlNasTransport(_) => MmMessageType::DlNasTransport,
        }
    }

    fn decode<B: Buf>(
        message_type: MmMessageType,
        buf: &mut B,
        policy: DecodePolicy,
    ) -> CodecResult<Self> {
        Ok(match message_type {
            MmMessageType::RegistrationRequest => {
                MmMessageBody::RegistrationRequest(RegistrationRequest::decode(buf, policy)?)
            }
            MmMessageType::RegistrationAccept => {
                MmMessageBody::RegistrationAccept(RegistrationAccept::decode(buf, policy)?)
            }
            MmMessageType::RegistrationComplete => {
                MmMessageBody::RegistrationComplete(RegistrationComplete::decode(buf, policy)?)
            }
            MmMessageType::RegistrationReject => {
                MmMessageBody::RegistrationReject(RegistrationReject::decode(buf, policy)?)
            }
            MmMessageType::DeregistrationRequestUeOriginating => {
                MmMessageBody::DeregistrationRequestUeOriginating(
                    DeregistrationRequestUeOriginating::decode(buf, policy)?,
                )
            }
            MmMessageType::DeregistrationAcceptUeOriginating => {
                MmMessageBody::DeregistrationAcceptUeOriginating(
                    DeregistrationAcceptUeOriginating::decode(buf, policy)?,
                )
            }
            MmMessageType::DeregistrationRequestUeTerminated => {
                MmMessageBody::DeregistrationRequestUeTerminated(
                    DeregistrationRequestUeTerminated::decode(buf, policy)?,
                )
            }
            MmMessageType::DeregistrationAcceptUeTerminated => {
                MmMessageBody::DeregistrationAcceptUeTerminated(
                    DeregistrationAcceptUeTerminated::decode(buf, policy)?,
                )
            }
            MmMessageType::ServiceRequest => {
                MmMessageBody::ServiceRequest(ServiceRequest::decode(buf, policy)?)
            }
            MmMessageType::ServiceReject => {
                MmMessageBody::ServiceReject(ServiceReject::decode(buf, policy)?)
            }
            MmMessageType::ServiceAccept => {
                MmMessageBody::ServiceAccept(ServiceAccept::decode(buf, policy)?)
            }
            MmMessageType::AuthenticationRequest => {
                MmMessageBody::AuthenticationRequest(AuthenticationRequest::decode(buf, policy)?)
            }
            MmMessageType::AuthenticationResponse => {
                MmMessageBody::AuthenticationResponse(AuthenticationResponse::decode(buf, policy)?)
            }
            MmMessageType::AuthenticationReject => {
                MmMessageBody::AuthenticationReject(AuthenticationReject::decode(buf, policy)?)
            }
            MmMessageType::AuthenticationFailure => {
                MmMessageBody::AuthenticationFailure(AuthenticationFailure::decode(buf, policy)?)
            }
            MmMessageType::IdentityRequest => {
                MmMessageBody::IdentityRequest(IdentityRequest::decode(buf, policy)?)
            }
            MmMessageType::IdentityResponse => {
                MmMessageBody::IdentityResponse(IdentityResponse::decode(buf, policy)?)
            }
            MmMessageType::SecurityModeCommand => {
                MmMessageBody::SecurityModeCommand(SecurityModeCommand::decode(buf, policy)?)
            }
            MmMessageType::SecurityModeComplete => {
                MmMessageBody::SecurityModeComplete(SecurityModeComplete::decode(buf, policy)?)
            }
            MmMessageType::SecurityModeReject => {
                MmMessageBody::SecurityModeReject(SecurityModeReject::decode(buf, policy)?)
            }
            MmMessageType::FiveGMmStatus => {
                MmMessageBody::FiveGMmStatus(FiveGMmStatus::decode(buf, policy)?)
            }
            MmMessageType::UlNasTransport => {
                MmMessageBody::UlNasTransport(UlNasTransport::decode(buf, policy)?)
            }
            MmMessageType::DlNasTransport => {
                MmMessageBody::DlNasTransport(DlNasTransport::decode(buf, policy)?)
            }
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        match self {
            MmMessageBody::RegistrationRequest(m) => m.encode(buf),
            MmMessageBody::RegistrationAccept(m) => m.encode(buf),
            MmMessageBody::RegistrationComplete(m) => m.encode(buf),
            MmMessageBody::RegistrationReject(m) => m.encode(buf),
            MmMessageBody::DeregistrationRequestUeOriginating(m) => m.encode(buf),
            MmMessageBody::DeregistrationAcceptUeOriginating(m) => m.encode(buf),
            MmMessageBody::DeregistrationRequestUeTerminated(m) => m.encode(buf),
            MmMessageBody::DeregistrationAcceptUeTerminated(m) => m.encode(buf),
            MmMessageBody::ServiceRequest(m) => m.encode(buf),
            MmMessageBody::ServiceReject(m) => m.encode(buf),
            MmMessageBody::ServiceAccept(m) => m.encode(buf),
            MmMessageBody::AuthenticationRequest(m) => m.encode(buf),
            MmMessageBody::AuthenticationResponse(m) => m.encode(buf),
            MmMessageBody::AuthenticationReject(m) => m.encode(buf),
            MmMessageBody::AuthenticationFailure(m) => m.encode(buf),
            MmMessageBody::IdentityRequest(m) => m.encode(buf),
            MmMessageBody::IdentityResponse(m) => m.encode(buf),
            MmMessageBody::SecurityModeCommand(m) => m.encode(buf),
            MmMessageBody::SecurityModeComplete(m) => m.encode(buf),
            MmMessageBody::SecurityModeReject(m) => m.encode(buf),
            MmMessageBody::FiveGMmStatus(m) => m.encode(buf),
            MmMessageBody::UlNasTransport(m) => m.encode(buf),
            MmMessageBody::DlNasTransport(m) => m.encode(buf),
        }
    }
}

/// A plain 5GMM message: header plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MmMessage {
    /// Plain 5GMM header
    pub header: PlainMmHeader,
    /// Message body
    pub body: MmMessageBody,
}

impl MmMessage {
    /// Create a message with a header derived from the body
    pub fn new(body: MmMessageBody) -> Self {
        Self {
            header: PlainMmHeader::new(body.message_type()),
            body,
        }
    }

    /// Decode a plain 5GMM message, header included
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let header = PlainMmHeader::decode(buf)?;
        let body = MmMessageBody::decode(header.message_type, buf, policy)?;
        Ok(Self { header, body })
    }

    /// Encode the message, header included
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.header.encode(buf);
        self.body.encode(buf)
    }

    /// Message type of the body
    pub fn message_type(&self) -> MmMessageType {
        self.body.message_type()
    }
}

// ============================================================================
// 5GSM message body
// ============================================================================

/// Body of a plain 5GSM message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SmMessageBody {
    PduSessionEstablishmentRequest(PduSessionEstablishmentRequest),
    PduSessionEstablishmentAccept(PduSessionEstablishmentAccept),
    PduSessionEstablishmentReject(PduSessionEstablishmentReject),
    PduSessionModificationRequest(PduSessionModificationRequest),
    PduSessionModificationReject(PduSessionModificationReject),
    PduSessionModificationCommand(PduSessionModificationCommand),
    PduSessionModificationComplete(PduSessionModificationComplete),
    PduSessionModificationCommandReject(PduSessionModificationCommandReject),
    PduSessionReleaseRequest(PduSessionReleaseRequest),
    PduSessionReleaseReject(PduSessionReleaseReject),
    PduSessionReleaseCommand(PduSessionReleaseCommand),
    PduSessionReleaseComplete(PduSessionReleaseComplete),
    FiveGSmStatus(FiveGSmStatus),
}

impl SmMessageBody {
    /// Message type of the contained body
    pub fn message_type(&self) -> SmMessageType {
        match self {
            SmMessageBody::PduSessionEstablishmentRequest(_) => {
                SmMessageType::PduSessionEstablishmentRequest
            }
            SmMessageBody::PduSessionEstablishmentAccept(_) => {
                SmMessageType::PduSessionEstablishmentAccept
            }
            SmMessageBody::PduSessionEstablishmentReject(_) => {
                SmMessageType::PduSessionEstablishmentReject
            }
            SmMessageBody::PduSessionModificationRequest(_) => {
                SmMessageType::PduSessionModificationRequest
            }
            SmMessageBody::PduSessionModificationReject(_) => {
                SmMessageType::PduSessionModificationReject
            }
            SmMessageBody::PduSessionModificationCommand(_) => {
                SmMessageType::PduSessionModificationCommand
            }
            SmMessageBody::PduSessionModificationComplete(_) => {
                SmMessageType::PduSessionModificationComplete
            }
            SmMessageBody::PduSessionModificationCommandReject(_) => {
                SmMessageType::PduSessionModificationCommandReject
            }
            SmMessageBody::PduSessionReleaseRequest(_) => SmMessageType::PduSessionReleaseRequest,
            SmMessageBody::PduSessionReleaseReject(_) => SmMessageType::PduSessionReleaseReject,
            SmMessageBody::PduSessionReleaseCommand(_) => SmMessageType::PduSessionReleaseCommand,
            SmMessageBody::PduSessionReleaseComplete(_) => SmMessageType::PduSessionReleaseComplete,
            SmMessageBody::FiveGSmStatus(_) => SmMessageType::FiveGSmStatus,
        }
    }

    fn decode<B: Buf>(
        message_type: SmMessageType,
        buf: &mut B,
        policy: DecodePolicy,
    ) -> CodecResult<Self> {
        Ok(match message_type {
            SmMessageType::PduSessionEstablishmentRequest => {
                SmMessageBody::PduSessionEstablishmentRequest(
                    PduSessionEstablishmentRequest::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionEstablishmentAccept => {
                SmMessageBody::PduSessionEstablishmentAccept(
                    PduSessionEstablishmentAccept::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionEstablishmentReject => {
                SmMessageBody::PduSessionEstablishmentReject(
                    PduSessionEstablishmentReject::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionModificationRequest => {
                SmMessageBody::PduSessionModificationRequest(
                    PduSessionModificationRequest::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionModificationReject => {
                SmMessageBody::PduSessionModificationReject(
                    PduSessionModificationReject::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionModificationCommand => {
                SmMessageBody::PduSessionModificationCommand(
                    PduSessionModificationCommand::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionModificationComplete => {
                SmMessageBody::PduSessionModificationComplete(
                    PduSessionModificationComplete::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionModificationCommandReject => {
                SmMessageBody::PduSessionModificationCommandReject(
                    PduSessionModificationCommandReject::decode(buf, policy)?,
                )
            }
            SmMessageType::PduSessionReleaseRequest => SmMessageBody::PduSessionReleaseRequest(
                PduSessionReleaseRequest::decode(buf, policy)?,
            ),
            SmMessageType::PduSessionReleaseReject => SmMessageBody::PduSessionReleaseReject(
                PduSessionReleaseReject::decode(buf, policy)?,
            ),
            SmMessageType::PduSessionReleaseCommand => SmMessageBody::PduSessionReleaseCommand(
                PduSessionReleaseCommand::decode(buf, policy)?,
            ),
            SmMessageType::PduSessionReleaseComplete => SmMessageBody::PduSessionReleaseComplete(
                PduSessionReleaseComplete::decode(buf, policy)?,
            ),
            SmMessageType::FiveGSmStatus => {
                SmMessageBody::FiveGSmStatus(FiveGSmStatus::decode(buf, policy)?)
            }
        })
    }

    fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        match self {
            SmMessageBody::PduSessionEstablishmentRequest(m) => m.encode(buf),
            SmMessageBody::PduSessionEstablishmentAccept(m) => m.encode(buf),
            SmMessageBody::PduSessionEstablishmentReject(m) => m.encode(buf),
            SmMessageBody::PduSessionModificationRequest(m) => m.encode(buf),
            SmMessageBody::PduSessionModificationReject(m) => m.encode(buf),
            SmMessageBody::PduSessionModificationCommand(m) => m.encode(buf),
            SmMessageBody::PduSessionModificationComplete(m) => m.encode(buf),
            SmMessageBody::PduSessionModificationCommandReject(m) => m.encode(buf),
            SmMessageBody::PduSessionReleaseRequest(m) => m.encode(buf),
            SmMessageBody::PduSessionReleaseReject(m) => m.encode(buf),
            SmMessageBody::PduSessionReleaseCommand(m) => m.encode(buf),
            SmMessageBody::PduSessionReleaseComplete(m) => m.encode(buf),
            SmMessageBody::FiveGSmStatus(m) => m.encode(buf),
        }
    }
}

/// A plain 5GSM message: header plus body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmMessage {
    /// Plain 5GSM header (PDU session ID and PTI included)
    pub header: PlainSmHeader,
    /// Message body
    pub body: SmMessageBody,
}

impl SmMessage {
    /// Create a message with a header derived from the body
    pub fn new(pdu_session_id: u8, pti: u8, body: SmMessageBody) -> Self {
        Self {
            header: PlainSmHeader::new(pdu_session_id, pti, body.message_type()),
            body,
        }
    }

    /// Decode a plain 5GSM message, header included
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let header = PlainSmHeader::decode(buf)?;
        let body = SmMessageBody::decode(header.message_type, buf, policy)?;
        Ok(Self { header, body })
    }

    /// Encode the message, header included
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.header.encode(buf);
        self.body.encode(buf)
    }

    /// Message type of the body
    pub fn message_type(&self) -> SmMessageType {
        self.body.message_type()
    }
}

// ============================================================================
// Top-level NAS message
// ============================================================================

/// Any NAS message a buffer can decode to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NasMessage {
    /// Plain 5GMM message
    PlainMm(MmMessage),
    /// Plain 5GSM message
    PlainSm(SmMessage),
    /// Security-protected frame; the payload is the still-protected inner
    /// NAS message and is not interpreted here
    SecurityProtected {
        /// Secured header (MAC and sequence number)
        header: SecuredHeader,
        /// Protected payload octets
        payload: Vec<u8>,
    },
}

impl NasMessage {
    /// Decode a NAS message from a byte slice
    pub fn decode(data: &[u8], policy: DecodePolicy) -> CodecResult<Self> {
        let mut buf = data;
        match NasHeader::peek_header_type(data)? {
            NasHeaderType::PlainMm => Ok(NasMessage::PlainMm(MmMessage::decode(&mut buf, policy)?)),
            NasHeaderType::PlainSm => Ok(NasMessage::PlainSm(SmMessage::decode(&mut buf, policy)?)),
            NasHeaderType::Secured => {
                let header = SecuredHeader::decode(&mut buf)?;
                Ok(NasMessage::SecurityProtected {
                    header,
                    payload: buf.to_vec(),
                })
            }
        }
    }

    /// Encode the message into a buffer
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        match self {
            NasMessage::PlainMm(msg) => msg.encode(buf),
            NasMessage::PlainSm(msg) => msg.encode(buf),
            NasMessage::SecurityProtected { header, payload } => {
                header.encode(buf);
                buf.put_slice(payload);
                Ok(())
            }
        }
    }

    /// Encode the message into a fresh byte vector
    pub fn to_bytes(&self) -> CodecResult<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Message type, when the frame is plain
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            NasMessage::PlainMm(msg) => Some(MessageType::Mm(msg.message_type())),
            NasMessage::PlainSm(msg) => Some(MessageType::Sm(msg.message_type())),
            NasMessage::SecurityProtected { .. } => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;
    use crate::ies::ie3::MmCause;

    #[test]
    fn test_decode_empty_buffer() {
        assert_eq!(
            NasMessage::decode(&[], DecodePolicy::Strict),
            Err(CodecError::NullBuffer)
        );
    }

    #[test]
    fn test_decode_unknown_message_type() {
        let data = [0x7E, 0x00, 0x00];
        assert_eq!(
            NasMessage::decode(&data, DecodePolicy::Strict),
            Err(CodecError::WrongMessageType(0x00))
        );
    }

    #[test]
    fn test_decode_unknown_epd() {
        let data = [0xFF, 0x00, 0x41];
        assert_eq!(
            NasMessage::decode(&data, DecodePolicy::Strict),
            Err(CodecError::UnsupportedProtocolDiscriminator(0xFF))
        );
    }

    #[test]
    fn test_mm_message_round_trip() {
        let msg = NasMessage::PlainMm(MmMessage::new(MmMessageBody::FiveGMmStatus(
            FiveGMmStatus::new(MmCause::ProtocolErrorUnspecified),
        )));
        let bytes = msg.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x7E, 0x00, 0x64, 0x6F]);

        let decoded = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_sm_message_round_trip() {
        let msg = NasMessage::PlainSm(SmMessage::new(
            5,
            1,
            SmMessageBody::PduSessionReleaseComplete(PduSessionReleaseComplete::new()),
        ));
        let bytes = msg.to_bytes().unwrap();
        assert_eq!(bytes, vec![0x2E, 0x05, 0x01, 0xD4]);

        let decoded = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_security_protected_round_trip() {
        // secured header: EPD, SHT=2, MAC, sequence number, then payload
        let data = [0x7E, 0x02, 0xAA, 0xBB, 0xCC, 0xDD, 0x07, 0x7E, 0x00, 0x64, 0x6F];
        let decoded = NasMessage::decode(&data, DecodePolicy::Strict).unwrap();

        match &decoded {
            NasMessage::SecurityProtected { header, payload } => {
                assert_eq!(header.mac, [0xAA, 0xBB, 0xCC, 0xDD]);
                assert_eq!(header.sequence_number, 0x07);
                assert_eq!(payload, &vec![0x7E, 0x00, 0x64, 0x6F]);
            }
            other => panic!("expected security-protected frame, got {other:?}"),
        }

        assert_eq!(decoded.to_bytes().unwrap(), data.to_vec());
        assert_eq!(decoded.message_type(), None);
    }
}
