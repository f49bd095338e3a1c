//! # nas-codec
//!
//! Encoder/decoder for 5G NAS (Non-Access-Stratum) messages as defined in
//! 3GPP TS 24.501. The crate models the two plain message families, 5GS
//! mobility management (EPD 0x7E) and 5GS session management (EPD 0x2E),
//! together with the information elements they carry.
//!
//! Decoding is fail-fast: a malformed or truncated buffer yields an error
//! and never a partially filled message. The [`codec::DecodePolicy`]
//! selects how unknown optional IEs are treated; `Strict` rejects them,
//! `Lenient` logs and skips.
//!
//! ```
//! use nas_codec::codec::DecodePolicy;
//! use nas_codec::messages::NasMessage;
//!
//! let bytes = [0x7E, 0x00, 0x5F, 0x24];
//! let msg = NasMessage::decode(&bytes, DecodePolicy::Strict).unwrap();
//! assert_eq!(msg.to_bytes().unwrap(), bytes.to_vec());
//! ```

pub mod codec;
pub mod enums;
pub mod header;
pub mod ies;
pub mod messages;

pub use codec::{CodecError, CodecResult, DecodePolicy};
pub use enums::{
    ExtendedProtocolDiscriminator, MessageType, MmMessageType, SecurityHeaderType, SmMessageType,
};
pub use header::{NasHeader, NasHeaderType, PlainMmHeader, PlainSmHeader, SecuredHeader};
pub use messages::{MmMessage, MmMessageBody, NasMessage, SmMessage, SmMessageBody};

#[cfg(test)]
mod capture_tests;
