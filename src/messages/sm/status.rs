//! 5GSM Status Message (3GPP TS 24.501 Section 8.3.16)

use bytes::{Buf, BufMut};

use crate::codec::{get_u8, skip_unknown_ie, CodecResult, DecodePolicy};
use crate::enums::SmMessageType;
use crate::ies::ie3::{Ie5gSmCause, SmCause};

/// 5GSM Status message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FiveGSmStatus {
    /// 5GSM cause (mandatory)
    pub sm_cause: Ie5gSmCause,
}

impl FiveGSmStatus {
    /// Create a new 5GSM Status
    pub fn new(cause: SmCause) -> Self {
        Self {
            sm_cause: Ie5gSmCause::new(cause),
        }
    }

    /// Decode from bytes (after the header has been parsed)
    pub fn decode<B: Buf>(buf: &mut B, policy: DecodePolicy) -> CodecResult<Self> {
        let sm_cause = Ie5gSmCause::decode(buf)?;

        while buf.remaining() > 0 {
            let iei = get_u8(buf)?;
            skip_unknown_ie(buf, SmMessageType::FiveGSmStatus.into(), iei, policy)?;
        }

        Ok(Self { sm_cause })
    }

    /// Encode to bytes (body only, header written by the caller)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        self.sm_cause.encode(buf);
        Ok(())
    }

    /// Get the message type
    pub fn message_type() -> SmMessageType {
        SmMessageType::FiveGSmStatus
    }
}
