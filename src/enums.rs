//! NAS protocol enumerations
//!
//! Based on 3GPP TS 24.501.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Extended Protocol Discriminator (EPD)
/// 3GPP TS 24.501 Section 9.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ExtendedProtocolDiscriminator {
    /// 5GS Mobility Management messages
    MobilityManagement = 0x7E,
    /// 5GS Session Management messages
    SessionManagement = 0x2E,
}

/// Security Header Type
/// 3GPP TS 24.501 Section 9.3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive, Default)]
#[repr(u8)]
pub enum SecurityHeaderType {
    /// Plain NAS message, not security protected
    #[default]
    NotProtected = 0x00,
    /// Integrity protected
    IntegrityProtected = 0x01,
    /// Integrity protected and ciphered
    IntegrityProtectedAndCiphered = 0x02,
    /// Integrity protected with new 5G NAS security context
    IntegrityProtectedWithNewSecurityContext = 0x03,
    /// Integrity protected and ciphered with new 5G NAS security context
    IntegrityProtectedAndCipheredWithNewSecurityContext = 0x04,
}

impl SecurityHeaderType {
    /// Returns true if the message is security protected
    pub fn is_protected(&self) -> bool {
        !matches!(self, SecurityHeaderType::NotProtected)
    }

    /// Returns true if the message is ciphered
    pub fn is_ciphered(&self) -> bool {
        matches!(
            self,
            SecurityHeaderType::IntegrityProtectedAndCiphered
                | SecurityHeaderType::IntegrityProtectedAndCipheredWithNewSecurityContext
        )
    }
}

/// 5GMM Message Type
/// 3GPP TS 24.501 Section 9.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MmMessageType {
    // Registration messages
    RegistrationRequest = 0x41,
    RegistrationAccept = 0x42,
    RegistrationComplete = 0x43,
    RegistrationReject = 0x44,

    // De-registration messages
    DeregistrationRequestUeOriginating = 0x45,
    DeregistrationAcceptUeOriginating = 0x46,
    DeregistrationRequestUeTerminated = 0x47,
    DeregistrationAcceptUeTerminated = 0x48,

    // Service request messages
    ServiceRequest = 0x4C,
    ServiceReject = 0x4D,
    ServiceAccept = 0x4E,

    // Authentication messages
    AuthenticationRequest = 0x56,
    AuthenticationResponse = 0x57,
    AuthenticationReject = 0x58,
    AuthenticationFailure = 0x59,

    // Identity messages
    IdentityRequest = 0x5B,
    IdentityResponse = 0x5C,

    // Security mode messages
    SecurityModeCommand = 0x5D,
    SecurityModeComplete = 0x5E,
    SecurityModeReject = 0x5F,

    // Status message
    FiveGMmStatus = 0x64,

    // NAS transport messages
    UlNasTransport = 0x67,
    DlNasTransport = 0x68,
}

/// 5GSM Message Type
/// 3GPP TS 24.501 Section 9.7
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SmMessageType {
    // PDU session establishment messages
    PduSessionEstablishmentRequest = 0xC1,
    PduSessionEstablishmentAccept = 0xC2,
    PduSessionEstablishmentReject = 0xC3,

    // PDU session modification messages
    PduSessionModificationRequest = 0xC9,
    PduSessionModificationReject = 0xCA,
    PduSessionModificationCommand = 0xCB,
    PduSessionModificationComplete = 0xCC,
    PduSessionModificationCommandReject = 0xCD,

    // PDU session release messages
    PduSessionReleaseRequest = 0xD1,
    PduSessionReleaseReject = 0xD2,
    PduSessionReleaseCommand = 0xD3,
    PduSessionReleaseComplete = 0xD4,

    // Status message
    FiveGSmStatus = 0xD6,
}

/// Combined NAS Message Type (either MM or SM)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// 5GMM message type
    Mm(MmMessageType),
    /// 5GSM message type
    Sm(SmMessageType),
}

impl MessageType {
    /// Get the raw u8 value of the message type
    pub fn as_u8(&self) -> u8 {
        match self {
            MessageType::Mm(mt) => (*mt).into(),
            MessageType::Sm(mt) => (*mt).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epd_values() {
        assert_eq!(
            u8::from(ExtendedProtocolDiscriminator::MobilityManagement),
            0x7E
        );
        assert_eq!(
            u8::from(ExtendedProtocolDiscriminator::SessionManagement),
            0x2E
        );
    }

    #[test]
    fn test_security_header_type_methods() {
        assert!(!SecurityHeaderType::NotProtected.is_protected());
        assert!(SecurityHeaderType::IntegrityProtected.is_protected());
        assert!(SecurityHeaderType::IntegrityProtectedAndCiphered.is_ciphered());
        assert!(!SecurityHeaderType::IntegrityProtected.is_ciphered());
    }

    #[test]
    fn test_mm_message_type_values() {
        assert_eq!(u8::from(MmMessageType::RegistrationRequest), 0x41);
        assert_eq!(u8::from(MmMessageType::AuthenticationRequest), 0x56);
        assert_eq!(u8::from(MmMessageType::SecurityModeReject), 0x5F);
        assert_eq!(u8::from(MmMessageType::UlNasTransport), 0x67);
    }

    #[test]
    fn test_sm_message_type_values() {
        assert_eq!(u8::from(SmMessageType::PduSessionEstablishmentRequest), 0xC1);
        assert_eq!(u8::from(SmMessageType::PduSessionReleaseCommand), 0xD3);
    }

    #[test]
    fn test_unknown_message_type_rejected() {
        assert!(MmMessageType::try_from(0x00).is_err());
        assert!(SmMessageType::try_from(0xC4).is_err());
    }
}
