//! 5GMM Status Message (3GPP TS 24.501 Section 8.2.29)
//!
//! Sent by either side to report a protocol error with the received
//! mobility management message.

use bytes::{Buf, BufMut};

use crate::codec::{get_u8, skip_unknown_ie, CodecResult, DecodePolicy};
use crate::enums::MmMessageType;
use crate::ies::ie3::{Ie5gMmCause, MmCause};

/// 5GMM Status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FiveGMmStatus {
    /// 5GMM cause (mandatory)
    pub mm_cause: Ie5gMmCause,
}

impl FiveGMmStatus {
    /// Create a new 5GMM Status
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
            skip_unknown_ie(buf, MmMessageType::FiveGMmStatus.into(), iei, policy)?;
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
        MmMessageType::FiveGMmStatus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecError;

    #[test]
    fn test_status_round_trip() {
        let msg = FiveGMmStatus::new(MmCause::MessageTypeNonExistent);
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf, vec![0x61]);

        let decoded = FiveGMmStatus::decode(&mut buf.as_slice(), DecodePolicy::Strict).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_status_missing_cause() {
        let data: [u8; 0] = [];
        assert!(matches!(
            FiveGMmStatus::decode(&mut data.as_slice(), DecodePolicy::Strict),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
