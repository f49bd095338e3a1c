//! Type 4 Information Elements (variable length, TLV)
//!
//! Type 4 IEs carry a 1-byte length field counting only the value octets.
//! Decode helpers here take the buffer positioned after the IEI, read the
//! length themselves, and skip trailing extension octets they do not model
//! so newer network encodings still parse.
//!
//! Based on 3GPP TS 24.501.

use bytes::{Buf, BufMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{get_bytes, get_len_u8, get_len_u16, get_u8, CodecError, CodecResult};

// ============================================================================
// Session-AMBR (3GPP TS 24.501 Section 9.11.4.14)
// ============================================================================

/// Session-AMBR IE (Type 4, TLV, 6 value bytes)
///
/// Aggregate maximum bit rate for the PDU session. Each direction carries a
/// unit octet and a 2-byte value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeSessionAmbr {
    /// Unit for downlink session AMBR
    pub downlink_unit: u8,
    /// Downlink session AMBR value
    pub downlink: u16,
    /// Unit for uplink session AMBR
    pub uplink_unit: u8,
    /// Uplink session AMBR value
    pub uplink: u16,
}

impl IeSessionAmbr {
    /// Unit value: multiples of 1 Kbps
    pub const UNIT_1_KBPS: u8 = 0x01;
    /// Unit value: multiples of 1 Mbps
    pub const UNIT_1_MBPS: u8 = 0x06;
    /// Unit value: multiples of 1 Gbps
    pub const UNIT_1_GBPS: u8 = 0x0B;

    /// Create a new Session-AMBR IE
    pub fn new(downlink_unit: u8, downlink: u16, uplink_unit: u8, uplink: u16) -> Self {
        Self {
            downlink_unit,
            downlink,
            uplink_unit,
            uplink,
        }
    }

    /// Decode from bytes (without IEI, with 1-byte length).
    ///
    /// A length above 6 is accepted and the extension octets are dropped;
    /// re-encoding such an IE emits the canonical 6-octet value, not the
    /// extended wire form.
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 6 {
            return Err(CodecError::MalformedField("session AMBR length"));
        }

        let downlink_unit = buf.get_u8();
        let downlink = buf.get_u16();
        let uplink_unit = buf.get_u8();
        let uplink = buf.get_u16();

        if length > 6 {
            buf.advance(length - 6);
        }

        Ok(Self {
            downlink_unit,
            downlink,
            uplink_unit,
            uplink,
        })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(6);
        buf.put_u8(self.downlink_unit);
        buf.put_u16(self.downlink);
        buf.put_u8(self.uplink_unit);
        buf.put_u16(self.uplink);
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        7
    }
}

// ============================================================================
// DNN (Data Network Name) (3GPP TS 24.501 Section 9.11.2.1B)
// ============================================================================

/// DNN IE (Type 4, TLV)
///
/// Stored as the wire form: a sequence of length-prefixed labels, the same
/// scheme as DNS names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IeDnn {
    /// DNN value (encoded as length-prefixed labels)
    pub value: Vec<u8>,
}

impl IeDnn {
    /// Create a new DNN IE from raw encoded data
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }

    /// Create a DNN IE from a dotted string (e.g. "internet")
    pub fn from_string(dnn: &str) -> Self {
        let mut value = Vec::new();
        for label in dnn.split('.') {
            value.push(label.len() as u8);
            value.extend_from_slice(label.as_bytes());
        }
        Self { value }
    }

    /// Render the DNN as a dotted string, stripping the label length octets.
    ///
    /// Fails with `MalformedField` when a label length overruns the value or
    /// a label is not valid UTF-8.
    pub fn as_string(&self) -> CodecResult<String> {
        let mut labels = Vec::new();
        let mut rest = &self.value[..];
        while !rest.is_empty() {
            let len = rest[0] as usize;
            rest = &rest[1..];
            if len > rest.len() {
                return Err(CodecError::MalformedField("DNN label length"));
            }
            let label = std::str::from_utf8(&rest[..len])
                .map_err(|_| CodecError::MalformedField("DNN label encoding"))?;
            labels.push(label.to_owned());
            rest = &rest[len..];
        }
        Ok(labels.join("."))
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        Ok(Self {
            value: get_bytes(buf, length)?,
        })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.value.len() as u8);
        buf.put_slice(&self.value);
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        1 + self.value.len()
    }
}

// ============================================================================
// S-NSSAI (3GPP TS 24.501 Section 9.11.2.8)
// ============================================================================

/// S-NSSAI IE (Type 4, TLV)
///
/// Slice selection information. The value length selects which fields are
/// present: 1 (SST), 2 (SST + mapped SST), 4 (SST + SD), 5 (SST + SD +
/// mapped SST), 8 (all fields).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeSNssai {
    /// Slice/service type
    pub sst: u8,
    /// Slice differentiator (3 octets)
    pub sd: Option<[u8; 3]>,
    /// Mapped HPLMN slice/service type
    pub mapped_sst: Option<u8>,
    /// Mapped HPLMN slice differentiator
    pub mapped_sd: Option<[u8; 3]>,
}

impl IeSNssai {
    /// Create an S-NSSAI with just the slice/service type
    pub fn new(sst: u8) -> Self {
        Self {
            sst,
            sd: None,
            mapped_sst: None,
            mapped_sd: None,
        }
    }

    /// Create an S-NSSAI with slice differentiator
    pub fn with_sd(sst: u8, sd: [u8; 3]) -> Self {
        Self {
            sst,
            sd: Some(sd),
            mapped_sst: None,
            mapped_sd: None,
        }
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;

        let mut nssai = Self::default();
        match length {
            1 => {
                nssai.sst = buf.get_u8();
            }
            2 => {
                nssai.sst = buf.get_u8();
                nssai.mapped_sst = Some(buf.get_u8());
            }
            4 => {
                nssai.sst = buf.get_u8();
                let mut sd = [0u8; 3];
                buf.copy_to_slice(&mut sd);
                nssai.sd = Some(sd);
            }
            5 => {
                nssai.sst = buf.get_u8();
                let mut sd = [0u8; 3];
                buf.copy_to_slice(&mut sd);
                nssai.sd = Some(sd);
                nssai.mapped_sst = Some(buf.get_u8());
            }
            8 => {
                nssai.sst = buf.get_u8();
                let mut sd = [0u8; 3];
                buf.copy_to_slice(&mut sd);
                nssai.sd = Some(sd);
                nssai.mapped_sst = Some(buf.get_u8());
                let mut mapped_sd = [0u8; 3];
                buf.copy_to_slice(&mut mapped_sd);
                nssai.mapped_sd = Some(mapped_sd);
            }
            _ => return Err(CodecError::MalformedField("S-NSSAI length")),
        }
        Ok(nssai)
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.value_len() as u8);
        buf.put_u8(self.sst);
        if let Some(sd) = self.sd {
            buf.put_slice(&sd);
        }
        if let Some(mapped_sst) = self.mapped_sst {
            buf.put_u8(mapped_sst);
        }
        if let Some(mapped_sd) = self.mapped_sd {
            buf.put_slice(&mapped_sd);
        }
    }

    fn value_len(&self) -> usize {
        1 + if self.sd.is_some() { 3 } else { 0 }
            + if self.mapped_sst.is_some() { 1 } else { 0 }
            + if self.mapped_sd.is_some() { 3 } else { 0 }
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        1 + self.value_len()
    }
}

// ============================================================================
// PDU Address (3GPP TS 24.501 Section 9.11.4.10)
// ============================================================================

/// PDU Address type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PduAddressType {
    /// IPv4
    #[default]
    Ipv4 = 0b001,
    /// IPv6 (interface identifier)
    Ipv6 = 0b010,
    /// IPv4v6
    Ipv4v6 = 0b011,
}

/// PDU Address IE (Type 4, TLV)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IePduAddress {
    /// PDU address type
    pub address_type: PduAddressType,
    /// Address data (4 bytes IPv4, 8 bytes IPv6 interface ID, 12 bytes IPv4v6)
    pub address: Vec<u8>,
}

impl IePduAddress {
    /// Create a new PDU Address IE
    pub fn new(address_type: PduAddressType, address: Vec<u8>) -> Self {
        Self {
            address_type,
            address,
        }
    }

    /// Create an IPv4 PDU address
    pub fn ipv4(addr: [u8; 4]) -> Self {
        Self {
            address_type: PduAddressType::Ipv4,
            address: addr.to_vec(),
        }
    }

    /// Create an IPv6 PDU address (interface identifier only)
    pub fn ipv6(interface_id: [u8; 8]) -> Self {
        Self {
            address_type: PduAddressType::Ipv6,
            address: interface_id.to_vec(),
        }
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("PDU address length"));
        }

        let type_octet = buf.get_u8();
        let address_type = PduAddressType::try_from(type_octet & 0x07)
            .map_err(|_| CodecError::MalformedField("PDU address type"))?;
        let address = get_bytes(buf, length - 1)?;

        Ok(Self {
            address_type,
            address,
        })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8((1 + self.address.len()) as u8);
        buf.put_u8(self.address_type.into());
        buf.put_slice(&self.address);
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        2 + self.address.len()
    }
}

// ============================================================================
// UE Security Capability (3GPP TS 24.501 Section 9.11.3.54)
// ============================================================================

/// UE Security Capability IE (Type 4, TLV, 2-8 value bytes)
///
/// Supported 5GS encryption algorithms (EA0-EA7) and integrity algorithms
/// (IA0-IA7), plus the optional EPS capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IeUeSecurityCapability {
    /// 5GS encryption algorithms supported (EA0 = bit 7, EA7 = bit 0)
    pub ea: u8,
    /// 5GS integrity algorithms supported (IA0 = bit 7, IA7 = bit 0)
    pub ia: u8,
    /// EPS encryption algorithms supported (optional)
    pub eea: Option<u8>,
    /// EPS integrity algorithms supported (optional)
    pub eia: Option<u8>,
}

impl Default for IeUeSecurityCapability {
    fn default() -> Self {
        Self {
            ea: 0x80, // EA0 supported
            ia: 0x80, // IA0 supported
            eea: None,
            eia: None,
        }
    }
}

impl IeUeSecurityCapability {
    /// Create a new UE Security Capability IE
    pub fn new(ea: u8, ia: u8) -> Self {
        Self {
            ea,
            ia,
            eea: None,
            eia: None,
        }
    }

    /// Create with EPS capabilities
    pub fn with_eps(ea: u8, ia: u8, eea: u8, eia: u8) -> Self {
        Self {
            ea,
            ia,
            eea: Some(eea),
            eia: Some(eia),
        }
    }

    /// Check if a specific 5GS encryption algorithm is supported (0=EA0, 7=EA7)
    pub fn supports_ea(&self, alg: u8) -> bool {
        if alg > 7 {
            return false;
        }
        (self.ea >> (7 - alg)) & 0x01 == 1
    }

    /// Check if a specific 5GS integrity algorithm is supported (0=IA0, 7=IA7)
    pub fn supports_ia(&self, alg: u8) -> bool {
        if alg > 7 {
            return false;
        }
        (self.ia >> (7 - alg)) & 0x01 == 1
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 2 {
            return Err(CodecError::MalformedField("UE security capability length"));
        }

        let ea = buf.get_u8();
        let ia = buf.get_u8();

        let mut cap = Self::new(ea, ia);
        if length >= 3 {
            cap.eea = Some(buf.get_u8());
        }
        if length >= 4 {
            cap.eia = Some(buf.get_u8());
        }
        if length > 4 {
            buf.advance(length - 4);
        }

        Ok(cap)
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        let length = if self.eia.is_some() {
            4
        } else if self.eea.is_some() {
            3
        } else {
            2
        };

        buf.put_u8(length);
        buf.put_u8(self.ea);
        buf.put_u8(self.ia);
        if let Some(eea) = self.eea {
            buf.put_u8(eea);
        }
        if let Some(eia) = self.eia {
            buf.put_u8(eia);
        }
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        let value_len = if self.eia.is_some() {
            4
        } else if self.eea.is_some() {
            3
        } else {
            2
        };
        1 + value_len
    }
}

// ============================================================================
// 5GSM Capability (3GPP TS 24.501 Section 9.11.4.1)
// ============================================================================

/// 5GSM Capability IE (Type 4, TLV, 1-13 value bytes)
///
/// The first octet carries the defined capability bits; later octets are
/// spare for future releases and preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ie5gSmCapability {
    /// Capability octets (at least one)
    pub octets: Vec<u8>,
}

impl Ie5gSmCapability {
    /// Reflective QoS bit in the first capability octet
    pub const RQOS: u8 = 0x01;
    /// Multi-homed IPv6 PDU session bit in the first capability octet
    pub const MH6_PDU: u8 = 0x02;

    /// Create a new 5GSM Capability IE from the first capability octet
    pub fn new(first_octet: u8) -> Self {
        Self {
            octets: vec![first_octet],
        }
    }

    /// Reflective QoS supported
    pub fn supports_reflective_qos(&self) -> bool {
        self.octets.first().is_some_and(|o| o & Self::RQOS != 0)
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("5GSM capability length"));
        }
        Ok(Self {
            octets: get_bytes(buf, length)?,
        })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.octets.len() as u8);
        buf.put_slice(&self.octets);
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        1 + self.octets.len()
    }
}

// ============================================================================
// GPRS Timer 2 / GPRS Timer 3 (3GPP TS 24.008 Sections 10.5.7.4/10.5.7.4a)
// ============================================================================

/// GPRS Timer 2 IE (Type 4, TLV, 1 value byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeGprsTimer2 {
    /// Timer value octet
    pub value: u8,
}

impl IeGprsTimer2 {
    /// Create a new GPRS Timer 2 IE
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("GPRS timer 2 length"));
        }
        let value = buf.get_u8();
        if length > 1 {
            buf.advance(length - 1);
        }
        Ok(Self { value })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(1);
        buf.put_u8(self.value);
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        2
    }
}

/// GPRS Timer 3 unit (3GPP TS 24.008 Section 10.5.7.4a)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum GprsTimer3Unit {
    /// Multiples of 10 minutes
    Multiples10Minutes = 0b000,
    /// Multiples of 1 hour
    Multiples1Hour = 0b001,
    /// Multiples of 10 hours
    Multiples10Hours = 0b010,
    /// Multiples of 2 seconds
    #[default]
    Multiples2Seconds = 0b011,
    /// Multiples of 30 seconds
    Multiples30Seconds = 0b100,
    /// Multiples of 1 minute
    Multiples1Minute = 0b101,
    /// Multiples of 320 hours
    Multiples320Hours = 0b110,
    /// Timer is deactivated
    Deactivated = 0b111,
}

/// GPRS Timer 3 IE (Type 4, TLV, 1 value byte: unit in bits 7-5, value 4-0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeGprsTimer3 {
    /// Timer unit
    pub unit: GprsTimer3Unit,
    /// Timer value (0-31)
    pub value: u8,
}

impl IeGprsTimer3 {
    /// Create a new GPRS Timer 3 IE
    pub fn new(unit: GprsTimer3Unit, value: u8) -> Self {
        Self {
            unit,
            value: value & 0x1F,
        }
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("GPRS timer 3 length"));
        }
        let octet = buf.get_u8();
        if length > 1 {
            buf.advance(length - 1);
        }
        // all 8 unit codes are valid, try_from cannot fail on a 3-bit value
        let unit = GprsTimer3Unit::try_from((octet >> 5) & 0x07)
            .map_err(|_| CodecError::MalformedField("GPRS timer 3 unit"))?;
        Ok(Self {
            unit,
            value: octet & 0x1F,
        })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        let unit_val: u8 = self.unit.into();
        buf.put_u8(1);
        buf.put_u8((unit_val << 5) | (self.value & 0x1F));
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        2
    }
}

// ============================================================================
// 5GS Tracking Area Identity List (3GPP TS 24.501 Section 9.11.3.9)
// ============================================================================

/// One partial TAI list, "type 00": TACs sharing a single PLMN.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialTaiList {
    /// PLMN identity (3 octets, BCD-coded MCC/MNC)
    pub plmn: [u8; 3],
    /// Tracking area codes (3 octets each)
    pub tacs: Vec<[u8; 3]>,
}

/// 5GS TAI List IE (Type 4, TLV)
///
/// Only partial list type 00 (non-consecutive TACs belonging to one PLMN)
/// is modeled; other partial list types are rejected as malformed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ie5gsTaiList {
    /// Partial TAI lists
    pub lists: Vec<PartialTaiList>,
}

impl Ie5gsTaiList {
    const LIST_TYPE_00: u8 = 0b00;

    /// Create a new TAI List IE
    pub fn new(lists: Vec<PartialTaiList>) -> Self {
        Self { lists }
    }

    /// Decode from bytes (without IEI, with 1-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u8(buf)?;
        let value = get_bytes(buf, length)?;
        let mut inner = &value[..];

        let mut lists = Vec::new();
        while inner.remaining() > 0 {
            let head = get_u8(&mut inner)?;
            let list_type = (head >> 5) & 0x03;
            if list_type != Self::LIST_TYPE_00 {
                return Err(CodecError::MalformedField("TAI list type"));
            }
            // low 5 bits hold (number of elements - 1)
            let count = (head & 0x1F) as usize + 1;

            let mut plmn = [0u8; 3];
            if inner.remaining() < 3 + count * 3 {
                return Err(CodecError::BufferTooShort {
                    expected: 3 + count * 3,
                    actual: inner.remaining(),
                });
            }
            inner.copy_to_slice(&mut plmn);

            let mut tacs = Vec::with_capacity(count);
            for _ in 0..count {
                let mut tac = [0u8; 3];
                inner.copy_to_slice(&mut tac);
                tacs.push(tac);
            }
            lists.push(PartialTaiList { plmn, tacs });
        }

        Ok(Self { lists })
    }

    /// Encode to bytes (without IEI, with 1-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let value_len: usize = self
            .lists
            .iter()
            .map(|list| 1 + 3 + list.tacs.len() * 3)
            .sum();
        crate::codec::put_len_u8(value_len, buf)?;

        for list in &self.lists {
            if list.tacs.is_empty() || list.tacs.len() > 16 {
                return Err(CodecError::MalformedField("TAI list element count"));
            }
            buf.put_u8((Self::LIST_TYPE_00 << 5) | ((list.tacs.len() - 1) as u8 & 0x1F));
            buf.put_slice(&list.plmn);
            for tac in &list.tacs {
                buf.put_slice(tac);
            }
        }
        Ok(())
    }

    /// Get encoded length (including 1-byte length field)
    pub fn encoded_len(&self) -> usize {
        1 + self
            .lists
            .iter()
            .map(|list| 1 + 3 + list.tacs.len() * 3)
            .sum::<usize>()
    }
}

// ============================================================================
// 5GS Mobile Identity (3GPP TS 24.501 Section 9.11.3.4)
// ============================================================================

/// 5GS Mobile Identity IE (Type 6, TLV-E: 2-byte length)
///
/// The identity payload (SUCI, 5G-GUTI, IMEI, ...) is kept as raw octets;
/// the low nibble of the first payload octet carries the identity type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ie5gsMobileIdentity {
    /// Raw identity octets, starting at the type-of-identity octet
    pub value: Vec<u8>,
}

impl Ie5gsMobileIdentity {
    /// Create a new 5GS Mobile Identity IE from raw identity octets
    pub fn new(value: Vec<u8>) -> Self {
        Self { value }
    }

    /// Type-of-identity bits from the first payload octet, if present
    pub fn identity_type(&self) -> Option<u8> {
        self.value.first().map(|o| o & 0x07)
    }

    /// Decode from bytes (without IEI, with 2-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u16(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("mobile identity length"));
        }
        Ok(Self {
            value: get_bytes(buf, length)?,
        })
    }

    /// Encode to bytes (without IEI, with 2-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        crate::codec::put_len_u16(self.value.len(), buf)?;
        buf.put_slice(&self.value);
        Ok(())
    }

    /// Get encoded length (including 2-byte length field)
    pub fn encoded_len(&self) -> usize {
        2 + self.value.len()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ambr_encode_decode() {
        let ie = IeSessionAmbr::new(IeSessionAmbr::UNIT_1_MBPS, 1000, IeSessionAmbr::UNIT_1_MBPS, 500);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf.len(), ie.encoded_len());
        assert_eq!(buf[0], 6);

        let decoded = IeSessionAmbr::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_session_ambr_extended_length_normalized() {
        // length 8: canonical 6 octets plus 2 extension octets
        let data = [0x08, 0x06, 0x03, 0xE8, 0x06, 0x01, 0xF4, 0xAA, 0xBB];
        let mut slice = data.as_slice();
        let decoded = IeSessionAmbr::decode(&mut slice).unwrap();
        assert_eq!(decoded.downlink, 1000);
        assert_eq!(decoded.uplink, 500);
        // the full declared value is consumed
        assert_eq!(slice.remaining(), 0);

        // re-encoding emits the canonical 6-octet form
        let mut buf = Vec::new();
        decoded.encode(&mut buf);
        assert_eq!(buf, vec![0x06, 0x06, 0x03, 0xE8, 0x06, 0x01, 0xF4]);
    }

    #[test]
    fn test_session_ambr_truncated() {
        let data = [0x06, 0x06, 0x03];
        assert!(matches!(
            IeSessionAmbr::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_dnn_from_string_round_trip() {
        let ie = IeDnn::from_string("internet");
        assert_eq!(ie.value, b"\x08internet".to_vec());
        assert_eq!(ie.as_string().unwrap(), "internet");

        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, b"\x09\x08internet".to_vec());

        let decoded = IeDnn::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_dnn_multi_label() {
        let ie = IeDnn::from_string("ims.mnc001.mcc001");
        assert_eq!(ie.as_string().unwrap(), "ims.mnc001.mcc001");
    }

    #[test]
    fn test_dnn_bad_label_length() {
        let ie = IeDnn::new(vec![0x10, b'a']);
        assert_eq!(
            ie.as_string(),
            Err(CodecError::MalformedField("DNN label length"))
        );
    }

    #[test]
    fn test_snssai_sst_only() {
        let ie = IeSNssai::new(1);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x01, 0x01]);

        let decoded = IeSNssai::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_snssai_with_sd() {
        let ie = IeSNssai::with_sd(1, [0x00, 0x00, 0x7B]);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x04, 0x01, 0x00, 0x00, 0x7B]);

        let decoded = IeSNssai::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_snssai_bad_length() {
        let data = [0x03, 0x01, 0x02, 0x03];
        assert_eq!(
            IeSNssai::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("S-NSSAI length"))
        );
    }

    #[test]
    fn test_pdu_address_ipv4() {
        let ie = IePduAddress::ipv4([10, 45, 0, 1]);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x05, 0x01, 10, 45, 0, 1]);

        let decoded = IePduAddress::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_ue_security_capability() {
        let ie = IeUeSecurityCapability::new(0xE0, 0xE0);
        assert!(ie.supports_ea(0));
        assert!(ie.supports_ea(2));
        assert!(!ie.supports_ea(3));

        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x02, 0xE0, 0xE0]);

        let decoded = IeUeSecurityCapability::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_ue_security_capability_with_eps() {
        let ie = IeUeSecurityCapability::with_eps(0xF0, 0xF0, 0xC0, 0xC0);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf[0], 4);

        let decoded = IeUeSecurityCapability::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_5gsm_capability() {
        let ie = Ie5gSmCapability::new(Ie5gSmCapability::RQOS);
        assert!(ie.supports_reflective_qos());

        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x01, 0x01]);

        let decoded = Ie5gSmCapability::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_gprs_timer_3() {
        let ie = IeGprsTimer3::new(GprsTimer3Unit::Multiples10Minutes, 6);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x01, 0b0000_0110]);

        let decoded = IeGprsTimer3::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_tai_list_round_trip() {
        let ie = Ie5gsTaiList::new(vec![PartialTaiList {
            plmn: [0x00, 0xF1, 0x10],
            tacs: vec![[0x00, 0x00, 0x01], [0x00, 0x00, 0x02]],
        }]);
        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        // length 10: head(1) + plmn(3) + 2 tacs(6); head = count-1 = 1
        assert_eq!(buf[0], 10);
        assert_eq!(buf[1], 0x01);

        let decoded = Ie5gsTaiList::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_tai_list_unsupported_type() {
        // head octet with list type 01 in bits 6-5
        let data = [0x07, 0b0010_0000, 0x00, 0xF1, 0x10, 0x00, 0x00, 0x01];
        assert_eq!(
            Ie5gsTaiList::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("TAI list type"))
        );
    }

    #[test]
    fn test_mobile_identity_round_trip() {
        // 5G-S-TMSI style payload, type nibble 0x04 in the first octet
        let ie = Ie5gsMobileIdentity::new(vec![0xF4, 0x00, 0x00, 0x12, 0x34, 0x56, 0x78]);
        assert_eq!(ie.identity_type(), Some(0x04));

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        assert_eq!(&buf[..2], &[0x00, 0x07]);

        let decoded = Ie5gsMobileIdentity::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_mobile_identity_truncated() {
        let data = [0x00, 0x07, 0xF4, 0x00];
        assert!(matches!(
            Ie5gsMobileIdentity::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
