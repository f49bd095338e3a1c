//! QoS Rules and QoS Flow Descriptions
//! (3GPP TS 24.501 Sections 9.11.4.13 and 9.11.4.12)
//!
//! Both IEs are TLV-E: a 2-byte outer length wraps a list of entries that
//! each carry their own inner length. All length fields are recomputed from
//! the actual serialized content on encode; nothing stored in the structs is
//! trusted for sizing.

use bytes::{Buf, BufMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::codec::{get_bytes, get_len_u16, get_u16, get_u8, CodecError, CodecResult};

// ============================================================================
// QoS Rules
// ============================================================================

/// QoS rule operation code (bits 7-5 of the packed octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum QosRuleOperation {
    /// Create new QoS rule
    #[default]
    CreateNew = 0b001,
    /// Delete existing QoS rule
    DeleteExisting = 0b010,
    /// Modify existing QoS rule and add packet filters
    ModifyAndAdd = 0b011,
    /// Modify existing QoS rule and replace all packet filters
    ModifyAndReplace = 0b100,
    /// Modify existing QoS rule and delete packet filters
    ModifyAndDelete = 0b101,
    /// Modify existing QoS rule without modifying packet filters
    ModifyWithoutFilters = 0b110,
}

impl QosRuleOperation {
    /// Operations whose packet filters carry direction and contents
    pub fn has_filter_contents(&self) -> bool {
        matches!(
            self,
            QosRuleOperation::CreateNew
                | QosRuleOperation::ModifyAndAdd
                | QosRuleOperation::ModifyAndReplace
        )
    }
}

/// Packet filter direction (bits 5-4 of the filter header octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum PacketFilterDirection {
    /// Downlink only
    DownlinkOnly = 0b01,
    /// Uplink only
    UplinkOnly = 0b10,
    /// Bidirectional
    #[default]
    Bidirectional = 0b11,
}

/// Packet filter component type identifiers
pub mod filter_component {
    /// Match-all filter
    pub const MATCH_ALL: u8 = 0x01;
    /// IPv4 remote address (4 bytes address + 4 bytes mask)
    pub const IPV4_REMOTE_ADDRESS: u8 = 0x10;
    /// IPv4 local address (4 bytes address + 4 bytes mask)
    pub const IPV4_LOCAL_ADDRESS: u8 = 0x11;
    /// Protocol identifier / next header (1 byte)
    pub const PROTOCOL_IDENTIFIER: u8 = 0x30;
    /// Single local port (2 bytes)
    pub const SINGLE_LOCAL_PORT: u8 = 0x40;
    /// Single remote port (2 bytes)
    pub const SINGLE_REMOTE_PORT: u8 = 0x50;
}

/// One packet filter inside a QoS rule.
///
/// Contents are the raw component list; [`PacketFilter::first_component`]
/// exposes the leading component type without re-parsing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PacketFilter {
    /// Filter direction
    pub direction: PacketFilterDirection,
    /// Packet filter identifier (0-15)
    pub id: u8,
    /// Raw packet filter contents (component list)
    pub contents: Vec<u8>,
}

impl PacketFilter {
    /// Create a new packet filter
    pub fn new(direction: PacketFilterDirection, id: u8, contents: Vec<u8>) -> Self {
        Self {
            direction,
            id: id & 0x0F,
            contents,
        }
    }

    /// Bidirectional match-all filter
    pub fn match_all(id: u8) -> Self {
        Self::new(
            PacketFilterDirection::Bidirectional,
            id,
            vec![filter_component::MATCH_ALL],
        )
    }

    /// Leading component type of the filter contents
    pub fn first_component(&self) -> Option<u8> {
        self.contents.first().copied()
    }
}

/// One QoS rule.
///
/// `precedence` and `qfi` are present for create and modify operations and
/// absent for delete operations, mirroring the wire layout.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QosRule {
    /// QoS rule identifier
    pub id: u8,
    /// Rule operation code
    pub operation: QosRuleOperation,
    /// DQR bit: this is the default QoS rule
    pub default_rule: bool,
    /// Packet filters; for delete operations only the `id` fields are used
    pub filters: Vec<PacketFilter>,
    /// QoS rule precedence
    pub precedence: Option<u8>,
    /// QoS flow identifier (0-63)
    pub qfi: Option<u8>,
}

impl QosRule {
    /// A default rule matching all traffic, as sent in an establishment accept
    pub fn default_match_all(id: u8, precedence: u8, qfi: u8) -> Self {
        Self {
            id,
            operation: QosRuleOperation::CreateNew,
            default_rule: true,
            filters: vec![PacketFilter::match_all(1)],
            precedence: Some(precedence),
            qfi: Some(qfi & 0x3F),
        }
    }

    fn decode_one<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let id = get_u8(buf)?;
        let rule_len = get_len_u16(buf)?;
        let content = get_bytes(buf, rule_len)?;
        let mut inner = &content[..];

        let packed = get_u8(&mut inner)?;
        let operation = QosRuleOperation::try_from((packed >> 5) & 0x07)
            .map_err(|_| CodecError::MalformedField("QoS rule operation"))?;
        let default_rule = packed & 0x10 != 0;
        let num_filters = (packed & 0x0F) as usize;

        let mut filters = Vec::with_capacity(num_filters);
        for _ in 0..num_filters {
            let header = get_u8(&mut inner)?;
            let fid = header & 0x0F;
            if operation.has_filter_contents() {
                let direction = PacketFilterDirection::try_from((header >> 4) & 0x03)
                    .map_err(|_| CodecError::MalformedField("packet filter direction"))?;
                let flen = get_u8(&mut inner)? as usize;
                let contents = get_bytes(&mut inner, flen)?;
                filters.push(PacketFilter {
                    direction,
                    id: fid,
                    contents,
                });
            } else {
                // delete operations list bare filter identifiers
                filters.push(PacketFilter {
                    direction: PacketFilterDirection::Bidirectional,
                    id: fid,
                    contents: Vec::new(),
                });
            }
        }

        // remaining rule octets are precedence and the QFI octet
        let precedence = if inner.remaining() > 0 {
            Some(get_u8(&mut inner)?)
        } else {
            None
        };
        let qfi = if inner.remaining() > 0 {
            Some(get_u8(&mut inner)? & 0x3F)
        } else {
            None
        };
        if inner.remaining() > 0 {
            return Err(CodecError::MalformedField("QoS rule length"));
        }

        Ok(Self {
            id,
            operation,
            default_rule,
            filters,
            precedence,
            qfi,
        })
    }

    fn encode_one<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if self.filters.len() > 15 {
            return Err(CodecError::MalformedField("packet filter count"));
        }

        let mut content = Vec::with_capacity(self.content_len());
        let op_val: u8 = self.operation.into();
        let dqr = if self.default_rule { 0x10 } else { 0x00 };
        content.push((op_val << 5) | dqr | (self.filters.len() as u8 & 0x0F));

        for filter in &self.filters {
            if self.operation.has_filter_contents() {
                let dir_val: u8 = filter.direction.into();
                content.push((dir_val << 4) | (filter.id & 0x0F));
                crate::codec::put_len_u8(filter.contents.len(), &mut content)?;
                content.extend_from_slice(&filter.contents);
            } else {
                content.push(filter.id & 0x0F);
            }
        }
        if let Some(precedence) = self.precedence {
            content.push(precedence);
        }
        if let Some(qfi) = self.qfi {
            content.push(qfi & 0x3F);
        }

        buf.put_u8(self.id);
        crate::codec::put_len_u16(content.len(), buf)?;
        buf.put_slice(&content);
        Ok(())
    }

    fn content_len(&self) -> usize {
        let filters: usize = if self.operation.has_filter_contents() {
            self.filters.iter().map(|f| 2 + f.contents.len()).sum()
        } else {
            self.filters.len()
        };
        1 + filters
            + if self.precedence.is_some() { 1 } else { 0 }
            + if self.qfi.is_some() { 1 } else { 0 }
    }
}

/// QoS Rules IE (Type 6, TLV-E)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IeQosRules {
    /// Rules in wire order
    pub rules: Vec<QosRule>,
}

impl IeQosRules {
    /// Create a new QoS Rules IE
    pub fn new(rules: Vec<QosRule>) -> Self {
        Self { rules }
    }

    /// Decode from bytes (without IEI, with 2-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u16(buf)?;
        let value = get_bytes(buf, length)?;
        let mut inner = &value[..];

        let mut rules = Vec::new();
        while inner.remaining() > 0 {
            rules.push(QosRule::decode_one(&mut inner)?);
        }
        Ok(Self { rules })
    }

    /// Encode to bytes (without IEI, with 2-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let mut value = Vec::new();
        for rule in &self.rules {
            rule.encode_one(&mut value)?;
        }
        crate::codec::put_len_u16(value.len(), buf)?;
        buf.put_slice(&value);
        Ok(())
    }

    /// Get encoded length (including 2-byte length field)
    pub fn encoded_len(&self) -> usize {
        2 + self
            .rules
            .iter()
            .map(|r| 3 + r.content_len())
            .sum::<usize>()
    }
}

// ============================================================================
// QoS Flow Descriptions
// ============================================================================

/// QoS flow operation code (bits 7-5 of the operation octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum QosFlowOperation {
    /// Create new QoS flow description
    #[default]
    CreateNew = 0b001,
    /// Delete existing QoS flow description
    DeleteExisting = 0b010,
    /// Modify existing QoS flow description
    ModifyExisting = 0b011,
}

/// QoS flow parameter identifiers
pub mod flow_parameter {
    /// 5QI (1 content byte)
    pub const FIVE_QI: u8 = 0x01;
    /// Guaranteed flow bit rate uplink (unit + 2-byte value)
    pub const GFBR_UPLINK: u8 = 0x02;
    /// Guaranteed flow bit rate downlink (unit + 2-byte value)
    pub const GFBR_DOWNLINK: u8 = 0x03;
    /// Maximum flow bit rate uplink (unit + 2-byte value)
    pub const MFBR_UPLINK: u8 = 0x04;
    /// Maximum flow bit rate downlink (unit + 2-byte value)
    pub const MFBR_DOWNLINK: u8 = 0x05;
    /// Averaging window (2 content bytes)
    pub const AVERAGING_WINDOW: u8 = 0x06;
    /// EPS bearer identity (1 content byte)
    pub const EPS_BEARER_IDENTITY: u8 = 0x07;
}

/// One parameter of a QoS flow description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QosFlowParameter {
    /// Parameter identifier
    pub id: u8,
    /// Raw parameter content
    pub content: Vec<u8>,
}

impl QosFlowParameter {
    /// Create a parameter from raw content
    pub fn new(id: u8, content: Vec<u8>) -> Self {
        Self { id, content }
    }

    /// 5QI parameter
    pub fn five_qi(value: u8) -> Self {
        Self::new(flow_parameter::FIVE_QI, vec![value])
    }

    /// Bit rate parameter (GFBR/MFBR), unit octet plus 2-byte value
    pub fn bit_rate(id: u8, unit: u8, value: u16) -> Self {
        let mut content = vec![unit];
        content.extend_from_slice(&value.to_be_bytes());
        Self::new(id, content)
    }
}

/// One QoS flow description
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QosFlowDescription {
    /// QoS flow identifier (0-63)
    pub qfi: u8,
    /// Operation code
    pub operation: QosFlowOperation,
    /// E bit: parameter list is present
    pub e_bit: bool,
    /// Parameters in wire order
    pub parameters: Vec<QosFlowParameter>,
}

impl QosFlowDescription {
    /// A new flow carrying a single 5QI parameter
    pub fn create(qfi: u8, five_qi: u8) -> Self {
        Self {
            qfi: qfi & 0x3F,
            operation: QosFlowOperation::CreateNew,
            e_bit: true,
            parameters: vec![QosFlowParameter::five_qi(five_qi)],
        }
    }

    fn decode_one<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let qfi = get_u8(buf)? & 0x3F;
        let op_octet = get_u8(buf)?;
        let operation = QosFlowOperation::try_from((op_octet >> 5) & 0x07)
            .map_err(|_| CodecError::MalformedField("QoS flow operation"))?;

        let count_octet = get_u8(buf)?;
        let e_bit = count_octet & 0x40 != 0;
        let num_params = (count_octet & 0x3F) as usize;

        let mut parameters = Vec::with_capacity(num_params);
        for _ in 0..num_params {
            let id = get_u8(buf)?;
            let len = get_u8(buf)? as usize;
            parameters.push(QosFlowParameter {
                id,
                content: get_bytes(buf, len)?,
            });
        }

        Ok(Self {
            qfi,
            operation,
            e_bit,
            parameters,
        })
    }

    fn encode_one<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if self.parameters.len() > 0x3F {
            return Err(CodecError::MalformedField("QoS flow parameter count"));
        }

        buf.put_u8(self.qfi & 0x3F);
        let op_val: u8 = self.operation.into();
        buf.put_u8(op_val << 5);
        let e = if self.e_bit { 0x40 } else { 0x00 };
        buf.put_u8(e | (self.parameters.len() as u8 & 0x3F));

        for param in &self.parameters {
            buf.put_u8(param.id);
            crate::codec::put_len_u8(param.content.len(), buf)?;
            buf.put_slice(&param.content);
        }
        Ok(())
    }

    fn encoded_len_one(&self) -> usize {
        3 + self
            .parameters
            .iter()
            .map(|p| 2 + p.content.len())
            .sum::<usize>()
    }
}

/// QoS Flow Descriptions IE (Type 6, TLV-E)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IeQosFlowDescriptions {
    /// Flow descriptions in wire order
    pub descriptions: Vec<QosFlowDescription>,
}

impl IeQosFlowDescriptions {
    /// Create a new QoS Flow Descriptions IE
    pub fn new(descriptions: Vec<QosFlowDescription>) -> Self {
        Self { descriptions }
    }

    /// Decode from bytes (without IEI, with 2-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u16(buf)?;
        let value = get_bytes(buf, length)?;
        let mut inner = &value[..];

        let mut descriptions = Vec::new();
        while inner.remaining() > 0 {
            descriptions.push(QosFlowDescription::decode_one(&mut inner)?);
        }
        Ok(Self { descriptions })
    }

    /// Encode to bytes (without IEI, with 2-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        let mut value = Vec::new();
        for description in &self.descriptions {
            description.encode_one(&mut value)?;
        }
        crate::codec::put_len_u16(value.len(), buf)?;
        buf.put_slice(&value);
        Ok(())
    }

    /// Get encoded length (including 2-byte length field)
    pub fn encoded_len(&self) -> usize {
        2 + self
            .descriptions
            .iter()
            .map(QosFlowDescription::encoded_len_one)
            .sum::<usize>()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rule_wire_layout() {
        let ie = IeQosRules::new(vec![QosRule::default_match_all(1, 255, 1)]);
        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();

        // outer length 9: rule id(1) + rule len(2) + content(6)
        assert_eq!(&buf[..2], &[0x00, 0x09]);
        assert_eq!(buf[2], 0x01); // rule id
        assert_eq!(&buf[3..5], &[0x00, 0x06]); // rule length
        assert_eq!(buf[5], 0b0011_0001); // create(001) | DQR | 1 filter
        assert_eq!(buf[6], 0b0011_0001); // bidirectional, filter id 1
        assert_eq!(buf[7], 0x01); // filter contents length
        assert_eq!(buf[8], 0x01); // match-all component
        assert_eq!(buf[9], 255); // precedence
        assert_eq!(buf[10], 0x01); // qfi

        let decoded = IeQosRules::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_rule_with_ipv4_filter() {
        let mut contents = vec![filter_component::IPV4_REMOTE_ADDRESS];
        contents.extend_from_slice(&[10, 0, 0, 1, 255, 255, 255, 255]);
        let rule = QosRule {
            id: 2,
            operation: QosRuleOperation::CreateNew,
            default_rule: false,
            filters: vec![PacketFilter::new(
                PacketFilterDirection::UplinkOnly,
                3,
                contents,
            )],
            precedence: Some(100),
            qfi: Some(5),
        };
        let ie = IeQosRules::new(vec![rule]);

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        let decoded = IeQosRules::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
        assert_eq!(
            decoded.rules[0].filters[0].first_component(),
            Some(filter_component::IPV4_REMOTE_ADDRESS)
        );
    }

    #[test]
    fn test_delete_rule_bare_filter_ids() {
        let rule = QosRule {
            id: 7,
            operation: QosRuleOperation::DeleteExisting,
            default_rule: false,
            filters: Vec::new(),
            precedence: None,
            qfi: None,
        };
        let ie = IeQosRules::new(vec![rule.clone()]);

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        // content is just the packed octet
        assert_eq!(buf, vec![0x00, 0x04, 0x07, 0x00, 0x01, 0b0100_0000]);

        let decoded = IeQosRules::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.rules[0], rule);
    }

    #[test]
    fn test_rule_length_mismatch_rejected() {
        // rule declares 7 content bytes but the packed octet says 1 filter
        // followed by trailing garbage beyond precedence and qfi
        let data = [
            0x00, 0x0A, 0x01, 0x00, 0x07, 0b0011_0001, 0b0011_0001, 0x01, 0x01, 255, 0x01, 0xAA,
        ];
        assert_eq!(
            IeQosRules::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("QoS rule length"))
        );
    }

    #[test]
    fn test_truncated_rule_content() {
        // rule length says 6 but only 3 octets remain
        let data = [0x00, 0x06, 0x01, 0x00, 0x06, 0b0011_0001, 0b0011_0001, 0x01];
        assert!(matches!(
            IeQosRules::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_flow_description_round_trip() {
        let ie = IeQosFlowDescriptions::new(vec![QosFlowDescription::create(1, 9)]);
        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();

        // qfi | op | E+count | param id | param len | 5QI value
        assert_eq!(
            buf,
            vec![0x00, 0x06, 0x01, 0b0010_0000, 0b0100_0001, 0x01, 0x01, 0x09]
        );

        let decoded = IeQosFlowDescriptions::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_flow_description_with_bit_rates() {
        let flow = QosFlowDescription {
            qfi: 2,
            operation: QosFlowOperation::CreateNew,
            e_bit: true,
            parameters: vec![
                QosFlowParameter::five_qi(5),
                QosFlowParameter::bit_rate(flow_parameter::GFBR_UPLINK, 0x06, 100),
                QosFlowParameter::bit_rate(flow_parameter::GFBR_DOWNLINK, 0x06, 200),
            ],
        };
        let ie = IeQosFlowDescriptions::new(vec![flow]);

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), ie.encoded_len());

        let decoded = IeQosFlowDescriptions::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_flow_description_truncated_parameter() {
        // parameter declares 3 content bytes, only 1 present
        let data = [0x00, 0x06, 0x01, 0b0010_0000, 0b0100_0001, 0x02, 0x03, 0x06];
        assert!(matches!(
            IeQosFlowDescriptions::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_unknown_rule_operation_rejected() {
        // operation code 000 is not assigned
        let data = [0x00, 0x04, 0x01, 0x00, 0x01, 0b0000_0000];
        assert_eq!(
            IeQosRules::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("QoS rule operation"))
        );
    }
}
