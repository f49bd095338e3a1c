//! Extended Protocol Configuration Options (3GPP TS 24.008 Section 10.5.6.3A)
//!
//! The PCO value is a configuration-protocol octet followed by a list of
//! protocol/container entries. Each entry is a 2-byte identifier, a 1-byte
//! contents length, and the contents themselves. An entry with length zero
//! is a bare request (for example "send me the IPv4 DNS server") and is
//! modeled as absent contents, not an empty vector. Entries are parsed
//! while at least three value bytes remain; a shorter trailing remainder
//! is ignored.

use bytes::{Buf, BufMut};

use crate::codec::{get_bytes, get_len_u16, get_u16, get_u8, CodecError, CodecResult};

/// Common protocol/container identifiers
pub mod container_id {
    /// P-CSCF IPv6 address request / response
    pub const PCSCF_IPV6_ADDRESS: u16 = 0x0001;
    /// DNS server IPv6 address request / response
    pub const DNS_SERVER_IPV6_ADDRESS: u16 = 0x0003;
    /// IPv4 link MTU request / response
    pub const IPV4_LINK_MTU: u16 = 0x000A;
    /// P-CSCF IPv4 address request / response
    pub const PCSCF_IPV4_ADDRESS: u16 = 0x000C;
    /// DNS server IPv4 address request / response
    pub const DNS_SERVER_IPV4_ADDRESS: u16 = 0x000D;
    /// IPCP (PPP IP control protocol)
    pub const IPCP: u16 = 0x8021;
}

/// One protocol/container entry within the PCO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcoContainer {
    /// Protocol or container identifier
    pub id: u16,
    /// Contents; `None` when the entry carried length zero
    pub contents: Option<Vec<u8>>,
}

impl PcoContainer {
    /// Create a container with contents
    pub fn new(id: u16, contents: Vec<u8>) -> Self {
        Self {
            id,
            contents: Some(contents),
        }
    }

    /// Create a contents-less request container
    pub fn request(id: u16) -> Self {
        Self { id, contents: None }
    }

    fn contents_len(&self) -> usize {
        self.contents.as_ref().map_or(0, Vec::len)
    }
}

/// Extended Protocol Configuration Options IE (Type 6, TLV-E)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IeExtendedPco {
    /// Configuration protocol (bits 2-0 of the leading octet, 000 = PPP)
    pub config_protocol: u8,
    /// Protocol/container entries, in wire order
    pub containers: Vec<PcoContainer>,
}

impl Default for IeExtendedPco {
    fn default() -> Self {
        Self {
            config_protocol: 0,
            containers: Vec::new(),
        }
    }
}

impl IeExtendedPco {
    /// Maximum number of container entries accepted
    pub const MAX_CONTAINERS: usize = 16;

    /// Create a new PCO with the PPP configuration protocol
    pub fn new(containers: Vec<PcoContainer>) -> Self {
        Self {
            config_protocol: 0,
            containers,
        }
    }

    /// Find the first container with the given identifier
    pub fn find(&self, id: u16) -> Option<&PcoContainer> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Decode from bytes (without IEI, with 2-byte length)
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let length = get_len_u16(buf)?;
        if length < 1 {
            return Err(CodecError::MalformedField("PCO length"));
        }
        let value = get_bytes(buf, length)?;
        let mut inner = &value[..];

        let head = get_u8(&mut inner)?;
        if head & 0x80 == 0 {
            return Err(CodecError::MalformedField("PCO extension bit"));
        }
        if head & 0x78 != 0 {
            return Err(CodecError::MalformedField("PCO spare bits"));
        }
        let config_protocol = head & 0x07;

        let mut containers = Vec::new();
        // an entry needs at least id (2) + length (1); a shorter remainder
        // is not an entry and is ignored, as gateways emit padding here
        while inner.remaining() >= 3 {
            if containers.len() == Self::MAX_CONTAINERS {
                return Err(CodecError::MalformedField("PCO container count"));
            }
            let id = get_u16(&mut inner)?;
            let contents_len = get_u8(&mut inner)? as usize;
            let contents = if contents_len == 0 {
                None
            } else {
                Some(get_bytes(&mut inner, contents_len)?)
            };
            containers.push(PcoContainer { id, contents });
        }
        if inner.remaining() > 0 {
            tracing::warn!(
                trailing = inner.remaining(),
                "ignoring trailing PCO bytes after last entry"
            );
        }

        Ok(Self {
            config_protocol,
            containers,
        })
    }

    /// Encode to bytes (without IEI, with 2-byte length)
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> CodecResult<()> {
        if self.containers.len() > Self::MAX_CONTAINERS {
            return Err(CodecError::MalformedField("PCO container count"));
        }

        let value_len: usize = 1
            + self
                .containers
                .iter()
                .map(|c| 3 + c.contents_len())
                .sum::<usize>();
        crate::codec::put_len_u16(value_len, buf)?;

        buf.put_u8(0x80 | (self.config_protocol & 0x07));
        for container in &self.containers {
            buf.put_u16(container.id);
            crate::codec::put_len_u8(container.contents_len(), buf)?;
            if let Some(contents) = &container.contents {
                buf.put_slice(contents);
            }
        }
        Ok(())
    }

    /// Get encoded length (including 2-byte length field)
    pub fn encoded_len(&self) -> usize {
        2 + 1
            + self
                .containers
                .iter()
                .map(|c| 3 + c.contents_len())
                .sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_containers_round_trip() {
        let ie = IeExtendedPco::new(vec![
            PcoContainer::request(container_id::IPV4_LINK_MTU),
            PcoContainer::request(container_id::DNS_SERVER_IPV4_ADDRESS),
        ]);

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();
        assert_eq!(
            buf,
            vec![0x00, 0x07, 0x80, 0x00, 0x0A, 0x00, 0x00, 0x0D, 0x00]
        );

        let decoded = IeExtendedPco::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
        // zero-length entries decode to absent contents, never Some(vec![])
        assert_eq!(decoded.containers[0].contents, None);
        assert_eq!(decoded.containers[1].contents, None);
    }

    #[test]
    fn test_container_with_contents_round_trip() {
        let ie = IeExtendedPco::new(vec![PcoContainer::new(
            container_id::DNS_SERVER_IPV4_ADDRESS,
            vec![8, 8, 8, 8],
        )]);

        let mut buf = Vec::new();
        ie.encode(&mut buf).unwrap();

        let decoded = IeExtendedPco::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
        assert_eq!(
            decoded
                .find(container_id::DNS_SERVER_IPV4_ADDRESS)
                .unwrap()
                .contents,
            Some(vec![8, 8, 8, 8])
        );
    }

    #[test]
    fn test_extension_bit_clear_rejected() {
        let data = [0x00, 0x01, 0x00];
        assert_eq!(
            IeExtendedPco::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("PCO extension bit"))
        );
    }

    #[test]
    fn test_spare_bits_set_rejected() {
        let data = [0x00, 0x01, 0x88];
        assert_eq!(
            IeExtendedPco::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("PCO spare bits"))
        );
    }

    #[test]
    fn test_too_many_containers_rejected() {
        let mut value = vec![0x80];
        for i in 0..17u16 {
            value.extend_from_slice(&i.to_be_bytes());
            value.push(0);
        }
        let mut data = Vec::new();
        data.extend_from_slice(&(value.len() as u16).to_be_bytes());
        data.extend_from_slice(&value);

        assert_eq!(
            IeExtendedPco::decode(&mut data.as_slice()),
            Err(CodecError::MalformedField("PCO container count"))
        );
    }

    #[test]
    fn test_trailing_bytes_after_last_entry_ignored() {
        // one complete entry, then 2 bytes too few for another
        let value = [0x80, 0x00, 0x0A, 0x00, 0x00, 0x0D];
        let mut data = Vec::new();
        data.extend_from_slice(&(value.len() as u16).to_be_bytes());
        data.extend_from_slice(&value);

        let mut slice = data.as_slice();
        let decoded = IeExtendedPco::decode(&mut slice).unwrap();
        assert_eq!(decoded.containers.len(), 1);
        assert_eq!(decoded.containers[0].id, container_id::IPV4_LINK_MTU);
        assert_eq!(decoded.containers[0].contents, None);
        // the full declared value is consumed, trailing bytes included
        assert_eq!(slice.remaining(), 0);
    }

    #[test]
    fn test_entry_contents_overrun_is_truncation() {
        // entry declares 4 contents bytes but only 1 follows
        let value = [0x80, 0x00, 0x0D, 0x04, 0x08];
        let mut data = Vec::new();
        data.extend_from_slice(&(value.len() as u16).to_be_bytes());
        data.extend_from_slice(&value);

        assert!(matches!(
            IeExtendedPco::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_truncated_outer_length() {
        let data = [0x00, 0x10, 0x80];
        assert!(matches!(
            IeExtendedPco::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
