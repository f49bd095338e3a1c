//! NAS message header structures
//!
//! Implements 5G NAS message headers according to 3GPP TS 24.501.
//!
//! # Header Types
//!
//! There are two main header formats:
//! - Plain NAS header (3 bytes for MM, 4 bytes for SM)
//! - Security protected NAS header (7 bytes)
//!
//! ## Plain 5GMM Header (3 bytes)
//! ```text
//! +------------------+------------------+------------------+
//! |       EPD        |  Security Header |   Message Type   |
//! |     (1 byte)     |  Type (4 bits)   |    (1 byte)      |
//! |                  |  Spare (4 bits)  |                  |
//! +------------------+------------------+------------------+
//! ```
//!
//! ## Plain 5GSM Header (4 bytes)
//! ```text
//! +------------------+------------------+------------------+------------------+
//! |       EPD        | PDU Session ID   |       PTI        |   Message Type   |
//! |     (1 byte)     |    (1 byte)      |    (1 byte)      |    (1 byte)      |
//! +------------------+------------------+------------------+------------------+
//! ```
//!
//! ## Security Protected Header (7 bytes)
//! ```text
//! EPD (1) | SHT (1) | MAC (4) | Sequence Number (1) | plain NAS message ...
//! ```
//!
//! Decoding a header whose first octet does not match the family's protocol
//! discriminator is a hard failure: no message of the wrong family can ever
//! reach that family's dispatcher.

use crate::codec::{CodecError, CodecResult};
use crate::enums::{
    ExtendedProtocolDiscriminator, MessageType, MmMessageType, SecurityHeaderType, SmMessageType,
};
use bytes::{Buf, BufMut};

/// Plain 5GMM NAS message header
///
/// Used for unprotected 5G Mobility Management messages.
/// Total size: 3 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainMmHeader {
    /// Extended Protocol Discriminator (always MobilityManagement)
    pub epd: ExtendedProtocolDiscriminator,
    /// Security header type (NotProtected for plain messages)
    pub security_header_type: SecurityHeaderType,
    /// Message type
    pub message_type: MmMessageType,
}

impl PlainMmHeader {
    /// Size of the plain MM header in bytes
    pub const SIZE: usize = 3;

    /// Create a new plain MM header
    pub fn new(message_type: MmMessageType) -> Self {
        Self {
            epd: ExtendedProtocolDiscriminator::MobilityManagement,
            security_header_type: SecurityHeaderType::NotProtected,
            message_type,
        }
    }

    /// Decode a plain MM header from bytes
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::BufferTooShort {
                expected: Self::SIZE,
                actual: buf.remaining(),
            });
        }

        let epd_byte = buf.get_u8();
        if epd_byte != u8::from(ExtendedProtocolDiscriminator::MobilityManagement) {
            return Err(CodecError::UnsupportedProtocolDiscriminator(epd_byte));
        }

        // Security header type occupies the lower 4 bits; the upper nibble
        // is spare.
        let sht_byte = buf.get_u8();
        let security_header_type = SecurityHeaderType::try_from(sht_byte & 0x0F)
            .map_err(|_| CodecError::MalformedField("security header type"))?;

        let mt_byte = buf.get_u8();
        let message_type =
            MmMessageType::try_from(mt_byte).map_err(|_| CodecError::WrongMessageType(mt_byte))?;

        Ok(Self {
            epd: ExtendedProtocolDiscriminator::MobilityManagement,
            security_header_type,
            message_type,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.epd.into());
        buf.put_u8(u8::from(self.security_header_type) & 0x0F);
        buf.put_u8(self.message_type.into());
    }
}

/// Plain 5GSM NAS message header
///
/// Used for 5G Session Management messages.
/// Total size: 4 bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlainSmHeader {
    /// Extended Protocol Discriminator (always SessionManagement)
    pub epd: ExtendedProtocolDiscriminator,
    /// PDU Session Identity
    pub pdu_session_id: u8,
    /// Procedure Transaction Identity
    pub pti: u8,
    /// Message type
    pub message_type: SmMessageType,
}

impl PlainSmHeader {
    /// Size of the plain SM header in bytes
    pub const SIZE: usize = 4;

    /// Create a new plain SM header
    pub fn new(pdu_session_id: u8, pti: u8, message_type: SmMessageType) -> Self {
        Self {
            epd: ExtendedProtocolDiscriminator::SessionManagement,
            pdu_session_id,
            pti,
            message_type,
        }
    }

    /// Decode a plain SM header from bytes
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::BufferTooShort {
                expected: Self::SIZE,
                actual: buf.remaining(),
            });
        }

        let epd_byte = buf.get_u8();
        if epd_byte != u8::from(ExtendedProtocolDiscriminator::SessionManagement) {
            return Err(CodecError::UnsupportedProtocolDiscriminator(epd_byte));
        }

        let pdu_session_id = buf.get_u8();
        let pti = buf.get_u8();

        let mt_byte = buf.get_u8();
        let message_type =
            SmMessageType::try_from(mt_byte).map_err(|_| CodecError::WrongMessageType(mt_byte))?;

        Ok(Self {
            epd: ExtendedProtocolDiscriminator::SessionManagement,
            pdu_session_id,
            pti,
            message_type,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.epd.into());
        buf.put_u8(self.pdu_session_id);
        buf.put_u8(self.pti);
        buf.put_u8(self.message_type.into());
    }
}

/// Security protected NAS message header
///
/// Used for integrity protected and/or ciphered NAS messages.
/// Total size: 7 bytes (header only, excluding the plain NAS message)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecuredHeader {
    /// Extended Protocol Discriminator (always MobilityManagement)
    pub epd: ExtendedProtocolDiscriminator,
    /// Security header type
    pub security_header_type: SecurityHeaderType,
    /// Message Authentication Code (MAC)
    pub mac: [u8; 4],
    /// Sequence number
    pub sequence_number: u8,
}

impl SecuredHeader {
    /// Size of the secured header in bytes (excluding the inner message)
    pub const SIZE: usize = 7;

    /// Create a new secured header
    pub fn new(security_header_type: SecurityHeaderType, mac: [u8; 4], sequence_number: u8) -> Self {
        Self {
            epd: ExtendedProtocolDiscriminator::MobilityManagement,
            security_header_type,
            mac,
            sequence_number,
        }
    }

    /// Decode a secured header from bytes
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::BufferTooShort {
                expected: Self::SIZE,
                actual: buf.remaining(),
            });
        }

        let epd_byte = buf.get_u8();
        if epd_byte != u8::from(ExtendedProtocolDiscriminator::MobilityManagement) {
            return Err(CodecError::UnsupportedProtocolDiscriminator(epd_byte));
        }

        let sht_byte = buf.get_u8();
        let security_header_type = SecurityHeaderType::try_from(sht_byte & 0x0F)
            .map_err(|_| CodecError::MalformedField("security header type"))?;

        let mut mac = [0u8; 4];
        buf.copy_to_slice(&mut mac);

        let sequence_number = buf.get_u8();

        Ok(Self {
            epd: ExtendedProtocolDiscriminator::MobilityManagement,
            security_header_type,
            mac,
            sequence_number,
        })
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.epd.into());
        buf.put_u8(u8::from(self.security_header_type) & 0x0F);
        buf.put_slice(&self.mac);
        buf.put_u8(self.sequence_number);
    }
}

/// Type of NAS header, as determined by peeking the first two octets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NasHeaderType {
    /// Plain 5GMM header
    PlainMm,
    /// Plain 5GSM header
    PlainSm,
    /// Security protected header
    Secured,
}

/// Unified NAS header that can represent any header shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NasHeader {
    /// Plain 5GMM header
    PlainMm(PlainMmHeader),
    /// Plain 5GSM header
    PlainSm(PlainSmHeader),
    /// Security protected header
    Secured(SecuredHeader),
}

impl NasHeader {
    /// Peek at the first two bytes to classify the header without consuming
    pub fn peek_header_type(data: &[u8]) -> CodecResult<NasHeaderType> {
        if data.is_empty() {
            return Err(CodecError::NullBuffer);
        }
        if data.len() < 2 {
            return Err(CodecError::BufferTooShort {
                expected: 2,
                actual: data.len(),
            });
        }

        let epd = ExtendedProtocolDiscriminator::try_from(data[0])
            .map_err(|_| CodecError::UnsupportedProtocolDiscriminator(data[0]))?;

        match epd {
            ExtendedProtocolDiscriminator::MobilityManagement => {
                let sht = SecurityHeaderType::try_from(data[1] & 0x0F)
                    .map_err(|_| CodecError::MalformedField("security header type"))?;
                if sht.is_protected() {
                    Ok(NasHeaderType::Secured)
                } else {
                    Ok(NasHeaderType::PlainMm)
                }
            }
            ExtendedProtocolDiscriminator::SessionManagement => Ok(NasHeaderType::PlainSm),
        }
    }

    /// Decode a NAS header from bytes, branching on the peeked shape
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        if buf.remaining() < 2 {
            return Err(CodecError::BufferTooShort {
                expected: 2,
                actual: buf.remaining(),
            });
        }

        let chunk = buf.chunk();
        match NasHeader::peek_header_type(&chunk[..2.min(chunk.len())])? {
            NasHeaderType::PlainMm => Ok(NasHeader::PlainMm(PlainMmHeader::decode(buf)?)),
            NasHeaderType::PlainSm => Ok(NasHeader::PlainSm(PlainSmHeader::decode(buf)?)),
            NasHeaderType::Secured => Ok(NasHeader::Secured(SecuredHeader::decode(buf)?)),
        }
    }

    /// Encode the header to bytes
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            NasHeader::PlainMm(h) => h.encode(buf),
            NasHeader::PlainSm(h) => h.encode(buf),
            NasHeader::Secured(h) => h.encode(buf),
        }
    }

    /// Get the message type (if available without deciphering)
    pub fn message_type(&self) -> Option<MessageType> {
        match self {
            NasHeader::PlainMm(h) => Some(MessageType::Mm(h.message_type)),
            NasHeader::PlainSm(h) => Some(MessageType::Sm(h.message_type)),
            NasHeader::Secured(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_mm_header_encode_decode() {
        let header = PlainMmHeader::new(MmMessageType::RegistrationRequest);

        let mut buf = Vec::new();
        header.encode(&mut buf);

        assert_eq!(buf.len(), PlainMmHeader::SIZE);
        assert_eq!(buf[0], 0x7E); // EPD
        assert_eq!(buf[1], 0x00); // Security header type
        assert_eq!(buf[2], 0x41); // Message type

        let decoded = PlainMmHeader::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_plain_sm_header_encode_decode() {
        let header = PlainSmHeader::new(5, 1, SmMessageType::PduSessionEstablishmentRequest);

        let mut buf = Vec::new();
        header.encode(&mut buf);

        assert_eq!(buf.len(), PlainSmHeader::SIZE);
        assert_eq!(buf[0], 0x2E); // EPD
        assert_eq!(buf[1], 5); // PDU Session ID
        assert_eq!(buf[2], 1); // PTI
        assert_eq!(buf[3], 0xC1); // Message type

        let decoded = PlainSmHeader::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_secured_header_encode_decode() {
        let header = SecuredHeader::new(
            SecurityHeaderType::IntegrityProtectedAndCiphered,
            [0x12, 0x34, 0x56, 0x78],
            42,
        );

        let mut buf = Vec::new();
        header.encode(&mut buf);

        assert_eq!(buf.len(), SecuredHeader::SIZE);
        assert_eq!(buf[0], 0x7E);
        assert_eq!(buf[1], 0x02);
        assert_eq!(&buf[2..6], &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(buf[6], 42);

        let decoded = SecuredHeader::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn test_nas_header_peek() {
        let plain_mm = [0x7E, 0x00, 0x41];
        assert_eq!(
            NasHeader::peek_header_type(&plain_mm).unwrap(),
            NasHeaderType::PlainMm
        );

        let secured = [0x7E, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(
            NasHeader::peek_header_type(&secured).unwrap(),
            NasHeaderType::Secured
        );

        let plain_sm = [0x2E, 0x05, 0x01, 0xC1];
        assert_eq!(
            NasHeader::peek_header_type(&plain_sm).unwrap(),
            NasHeaderType::PlainSm
        );
    }

    #[test]
    fn test_mm_header_rejects_sm_epd() {
        // a session-management buffer must never be accepted by the MM codec
        let data = [0x2E, 0x00, 0x41];
        let result = PlainMmHeader::decode(&mut data.as_slice());
        assert_eq!(
            result,
            Err(CodecError::UnsupportedProtocolDiscriminator(0x2E))
        );
    }

    #[test]
    fn test_sm_header_rejects_mm_epd() {
        let data = [0x7E, 0x05, 0x01, 0xC1];
        let result = PlainSmHeader::decode(&mut data.as_slice());
        assert_eq!(
            result,
            Err(CodecError::UnsupportedProtocolDiscriminator(0x7E))
        );
    }

    #[test]
    fn test_unknown_message_type() {
        let data = [0x7E, 0x00, 0x00];
        let result = PlainMmHeader::decode(&mut data.as_slice());
        assert_eq!(result, Err(CodecError::WrongMessageType(0x00)));
    }

    #[test]
    fn test_buffer_too_short() {
        let data = [0x7E];
        let result = NasHeader::decode(&mut data.as_slice());
        assert!(matches!(result, Err(CodecError::BufferTooShort { .. })));
    }

    #[test]
    fn test_invalid_epd() {
        let data = [0xFF, 0x00, 0x41];
        let result = NasHeader::decode(&mut data.as_slice());
        assert_eq!(
            result,
            Err(CodecError::UnsupportedProtocolDiscriminator(0xFF))
        );
    }
}
