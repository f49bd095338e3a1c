//! NAS message encoding/decoding traits and primitives
//!
//! This module provides the shared error taxonomy, the [`NasEncode`] /
//! [`NasDecode`] trait pair, the decode policy switch, and helper functions
//! for the binary shapes NAS uses for information elements:
//!
//! - Type 1: half-octet (4 bits) value packed with an adjacent nibble
//! - Type 3: fixed-length value
//! - Type 4: variable-length with a 1-byte length field (TLV)
//! - Type 6: variable-length with a 2-byte length field (TLV-E)
//!
//! All multi-byte numeric fields are big-endian. Every decode step checks
//! `remaining()` before reading; a length field that exceeds the remaining
//! buffer is reported as [`CodecError::BufferTooShort`] so that truncated
//! input always fails fast instead of reading out of bounds.

use bytes::{Buf, BufMut};
use thiserror::Error;

/// Errors that can occur during NAS encoding/decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Buffer does not have enough bytes for decoding. Also raised when a
    /// decoded length field declares more bytes than remain in the buffer.
    #[error("buffer too short: expected at least {expected} bytes, got {actual}")]
    BufferTooShort {
        /// Expected minimum bytes
        expected: usize,
        /// Actual bytes available
        actual: usize,
    },

    /// Top-level decode was handed an empty buffer
    #[error("empty input buffer")]
    NullBuffer,

    /// A tag-checked IE carried a different IEI than expected
    #[error("unexpected IEI: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedIei {
        /// The IEI the message layout requires at this position
        expected: u8,
        /// The IEI found on the wire
        actual: u8,
    },

    /// First octet does not match the family's protocol discriminator
    #[error("unsupported protocol discriminator: 0x{0:02X}")]
    UnsupportedProtocolDiscriminator(u8),

    /// Message-type byte has no codec in the family's dispatch table
    #[error("wrong message type: 0x{0:02X}")]
    WrongMessageType(u8),

    /// An optional-IE region contained a tag unknown for the message type
    /// (fatal under [`DecodePolicy::Strict`])
    #[error("unsupported optional IE 0x{iei:02X} in message type 0x{message_type:02X}")]
    UnsupportedOptionalIe {
        /// Message type whose optional region was being parsed
        message_type: u8,
        /// The unknown tag
        iei: u8,
    },

    /// A field violated a format constraint (PCO leading bit, XRES length
    /// bounds, packet-filter overrun, ...)
    #[error("malformed field: {0}")]
    MalformedField(&'static str),

    /// Encode-side overflow of a 1-byte or 2-byte length field
    #[error("value too long: {actual} bytes exceeds the {max}-byte limit")]
    ValueTooLong {
        /// Maximum value length the shape can carry
        max: usize,
        /// Actual serialized length
        actual: usize,
    },
}

/// Result type for NAS codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Policy for handling recoverable wire anomalies during decode/encode.
///
/// The original gateway implementation was inconsistent here (it aborted on
/// unknown optional IEs but only logged payload-container length
/// mismatches); the policy makes the choice explicit and testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Unknown optional IEs and length mismatches abort the whole message
    #[default]
    Strict,
    /// Unknown optional IEs are skipped and length mismatches re-derived,
    /// each with a `tracing` warning. Truncation is still fatal.
    Lenient,
}

/// Trait for encoding NAS messages and Information Elements to bytes
pub trait NasEncode {
    /// Encode this value to the provided buffer
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()>;

    /// Encoded size in bytes, used to compute length fields before writing
    fn encoded_len(&self) -> usize;
}

/// Trait for decoding NAS messages and Information Elements from bytes
pub trait NasDecode: Sized {
    /// Decode a value from the provided buffer
    fn nas_decode<B: Buf>(buf: &mut B) -> CodecResult<Self>;
}

// ============================================================================
// Bounds-checked primitive reads
// ============================================================================

/// Read one octet, failing with `BufferTooShort` if none remain
pub fn get_u8<B: Buf>(buf: &mut B) -> CodecResult<u8> {
    if buf.remaining() < 1 {
        return Err(CodecError::BufferTooShort {
            expected: 1,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u8())
}

/// Read a big-endian u16, failing with `BufferTooShort` if under 2 bytes remain
pub fn get_u16<B: Buf>(buf: &mut B) -> CodecResult<u16> {
    if buf.remaining() < 2 {
        return Err(CodecError::BufferTooShort {
            expected: 2,
            actual: buf.remaining(),
        });
    }
    Ok(buf.get_u16())
}

/// Read exactly `len` bytes into a fresh vector
pub fn get_bytes<B: Buf>(buf: &mut B, len: usize) -> CodecResult<Vec<u8>> {
    if buf.remaining() < len {
        return Err(CodecError::BufferTooShort {
            expected: len,
            actual: buf.remaining(),
        });
    }
    let mut out = vec![0u8; len];
    buf.copy_to_slice(&mut out);
    Ok(out)
}

/// Peek the next octet without consuming it
pub fn peek_u8<B: Buf>(buf: &mut B) -> CodecResult<u8> {
    if buf.remaining() < 1 {
        return Err(CodecError::BufferTooShort {
            expected: 1,
            actual: buf.remaining(),
        });
    }
    Ok(buf.chunk()[0])
}

// ============================================================================
// Shape helpers
// ============================================================================

/// Encode two half-octet values into a single octet (`high` in bits 7-4)
pub fn encode_nibble_pair<B: BufMut>(high: u8, low: u8, buf: &mut B) {
    buf.put_u8(((high & 0x0F) << 4) | (low & 0x0F));
}

/// Decode an octet into its (high, low) nibbles
pub fn decode_nibble_pair<B: Buf>(buf: &mut B) -> CodecResult<(u8, u8)> {
    let octet = get_u8(buf)?;
    Ok(((octet >> 4) & 0x0F, octet & 0x0F))
}

/// Read a 1-byte length field and validate it against the remaining buffer.
///
/// Returns the declared value length. The caller must consume exactly that
/// many bytes.
pub fn get_len_u8<B: Buf>(buf: &mut B) -> CodecResult<usize> {
    let len = get_u8(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::BufferTooShort {
            expected: len,
            actual: buf.remaining(),
        });
    }
    Ok(len)
}

/// Read a 2-byte length field and validate it against the remaining buffer
pub fn get_len_u16<B: Buf>(buf: &mut B) -> CodecResult<usize> {
    let len = get_u16(buf)? as usize;
    if buf.remaining() < len {
        return Err(CodecError::BufferTooShort {
            expected: len,
            actual: buf.remaining(),
        });
    }
    Ok(len)
}

/// Write a 1-byte length field, failing if the value does not fit
pub fn put_len_u8<B: BufMut>(len: usize, buf: &mut B) -> CodecResult<()> {
    if len > u8::MAX as usize {
        return Err(CodecError::ValueTooLong {
            max: u8::MAX as usize,
            actual: len,
        });
    }
    buf.put_u8(len as u8);
    Ok(())
}

/// Write a 2-byte length field, failing if the value does not fit
pub fn put_len_u16<B: BufMut>(len: usize, buf: &mut B) -> CodecResult<()> {
    if len > u16::MAX as usize {
        return Err(CodecError::ValueTooLong {
            max: u16::MAX as usize,
            actual: len,
        });
    }
    buf.put_u16(len as u16);
    Ok(())
}

/// Check a tag byte against the expected IEI for a tag-checked IE
pub fn expect_iei<B: Buf>(buf: &mut B, expected: u8) -> CodecResult<()> {
    let actual = get_u8(buf)?;
    if actual != expected {
        return Err(CodecError::UnexpectedIei { expected, actual });
    }
    Ok(())
}

/// Handle an unknown tag in an optional-IE region according to policy.
///
/// `iei` has already been consumed from `buf`. The wire rule: a tag with the
/// top bit set is a packed Type 1/3 octet carrying its value in the low
/// nibble (nothing further to consume); a tag with the top bit clear heads a
/// TLV whose 1-byte length follows, except that IEIs 0x70-0x7F are assigned
/// to the TLV-E family and carry a 2-byte length. Strict mode rejects the
/// whole message; lenient mode consumes the IE and warns. Truncation
/// mid-skip is fatal in both modes.
pub fn skip_unknown_ie<B: Buf>(
    buf: &mut B,
    message_type: u8,
    iei: u8,
    policy: DecodePolicy,
) -> CodecResult<()> {
    if policy == DecodePolicy::Strict {
        return Err(CodecError::UnsupportedOptionalIe { message_type, iei });
    }
    if iei & 0x80 == 0 {
        let len = if iei & 0xF0 == 0x70 {
            get_len_u16(buf)?
        } else {
            get_len_u8(buf)?
        };
        buf.advance(len);
    }
    tracing::warn!(message_type, iei, "skipping unknown optional IE");
    Ok(())
}

// ============================================================================
// NasEncode/NasDecode implementations for primitive types
// ============================================================================

impl NasEncode for u8 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u8(*self);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl NasDecode for u8 {
    fn nas_decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        get_u8(buf)
    }
}

impl NasEncode for u16 {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_u16(*self);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        2
    }
}

impl NasDecode for u16 {
    fn nas_decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        get_u16(buf)
    }
}

impl NasEncode for Vec<u8> {
    fn nas_encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        buf.put_slice(self);
        Ok(())
    }

    fn encoded_len(&self) -> usize {
        self.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_u8_too_short() {
        let buf: &[u8] = &[];
        assert_eq!(
            get_u8(&mut &buf[..]),
            Err(CodecError::BufferTooShort {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_get_u16_big_endian() {
        let buf: &[u8] = &[0x12, 0x34];
        assert_eq!(get_u16(&mut &buf[..]).unwrap(), 0x1234);
    }

    #[test]
    fn test_len_u8_exceeds_buffer() {
        // length field says 5 but only 2 value bytes follow
        let buf: &[u8] = &[0x05, 0xAA, 0xBB];
        let result = get_len_u8(&mut &buf[..]);
        assert_eq!(
            result,
            Err(CodecError::BufferTooShort {
                expected: 5,
                actual: 2
            })
        );
    }

    #[test]
    fn test_len_u16_exceeds_buffer() {
        let buf: &[u8] = &[0x00, 0x10, 0x01];
        let result = get_len_u16(&mut &buf[..]);
        assert_eq!(
            result,
            Err(CodecError::BufferTooShort {
                expected: 16,
                actual: 1
            })
        );
    }

    #[test]
    fn test_nibble_pair_round_trip() {
        let mut buf = Vec::new();
        encode_nibble_pair(0x7, 0x1, &mut buf);
        assert_eq!(buf, vec![0x71]);
        let (high, low) = decode_nibble_pair(&mut buf.as_slice()).unwrap();
        assert_eq!((high, low), (0x7, 0x1));
    }

    #[test]
    fn test_expect_iei_mismatch() {
        let buf: &[u8] = &[0x59];
        let result = expect_iei(&mut &buf[..], 0x12);
        assert_eq!(
            result,
            Err(CodecError::UnexpectedIei {
                expected: 0x12,
                actual: 0x59
            })
        );
    }

    #[test]
    fn test_put_len_u8_overflow() {
        let mut buf = Vec::new();
        let result = put_len_u8(300, &mut buf);
        assert_eq!(
            result,
            Err(CodecError::ValueTooLong {
                max: 255,
                actual: 300
            })
        );
    }

    #[test]
    fn test_skip_unknown_ie_strict_fails() {
        let buf: &[u8] = &[0x02, 0xAA, 0xBB];
        let result = skip_unknown_ie(&mut &buf[..], 0x41, 0x33, DecodePolicy::Strict);
        assert_eq!(
            result,
            Err(CodecError::UnsupportedOptionalIe {
                message_type: 0x41,
                iei: 0x33
            })
        );
    }

    #[test]
    fn test_skip_unknown_ie_lenient_tlv() {
        // tag already consumed; TLV body is len=2 + 2 bytes
        let data: &[u8] = &[0x02, 0xAA, 0xBB, 0x99];
        let mut buf = &data[..];
        skip_unknown_ie(&mut buf, 0x41, 0x33, DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn test_skip_unknown_ie_lenient_tlv_e_range() {
        // IEIs 0x70-0x7F carry a 2-byte length; a following IE must survive
        let data: &[u8] = &[0x00, 0x03, 0x01, 0x02, 0x03, 0x99];
        let mut buf = &data[..];
        skip_unknown_ie(&mut buf, 0x67, 0x7C, DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.remaining(), 1);
        assert_eq!(buf.chunk()[0], 0x99);
    }

    #[test]
    fn test_skip_unknown_ie_lenient_type1() {
        // top bit set: the consumed tag octet was the whole IE
        let data: &[u8] = &[0xAA];
        let mut buf = &data[..];
        skip_unknown_ie(&mut buf, 0x41, 0xB5, DecodePolicy::Lenient).unwrap();
        assert_eq!(buf.remaining(), 1);
    }

    #[test]
    fn test_skip_unknown_ie_lenient_truncated_is_fatal() {
        let data: &[u8] = &[0x05, 0xAA];
        let mut buf = &data[..];
        let result = skip_unknown_ie(&mut buf, 0x41, 0x33, DecodePolicy::Lenient);
        assert!(matches!(result, Err(CodecError::BufferTooShort { .. })));
    }
}
