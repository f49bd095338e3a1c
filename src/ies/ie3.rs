//! Type 3 Information Elements (fixed length)
//!
//! Type 3 IEs have a fixed length and no length field on the wire. They are
//! used for cause values, single-octet timers, and other fields with known
//! sizes.
//!
//! Based on 3GPP TS 24.501.

use crate::codec::{get_u8, get_u16, CodecError, CodecResult};
use bytes::{Buf, BufMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};

// ============================================================================
// Enumerations for Type 3 IEs
// ============================================================================

/// 5GMM Cause values (3GPP TS 24.501 Section 9.11.3.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum MmCause {
    /// Illegal UE
    IllegalUe = 0x03,
    /// PEI not accepted
    PeiNotAccepted = 0x05,
    /// Illegal ME
    IllegalMe = 0x06,
    /// 5GS services not allowed
    FiveGsServicesNotAllowed = 0x07,
    /// UE identity cannot be derived by the network
    UeIdentityCannotBeDerived = 0x09,
    /// Implicitly de-registered
    ImplicitlyDeregistered = 0x0A,
    /// PLMN not allowed
    PlmnNotAllowed = 0x0B,
    /// Tracking area not allowed
    TaNotAllowed = 0x0C,
    /// Roaming not allowed in this tracking area
    RoamingNotAllowedInTa = 0x0D,
    /// No suitable cells in tracking area
    NoSuitableCellsInTa = 0x0F,
    /// MAC failure
    MacFailure = 0x14,
    /// Synch failure
    SynchFailure = 0x15,
    /// Congestion
    Congestion = 0x16,
    /// UE security capabilities mismatch
    UeSecurityCapMismatch = 0x17,
    /// Security mode rejected, unspecified
    SecModeRejectedUnspecified = 0x18,
    /// Non-5G authentication unacceptable
    Non5gAuthenticationUnacceptable = 0x1A,
    /// N1 mode not allowed
    N1ModeNotAllowed = 0x1B,
    /// Restricted service area
    RestrictedServiceArea = 0x1C,
    /// IAB-node operation not authorized
    IabNodeOperationNotAuthorized = 0x24,
    /// LADN not available
    LadnNotAvailable = 0x2B,
    /// Maximum number of PDU sessions reached
    MaxPduSessionsReached = 0x41,
    /// Insufficient resources for specific slice and DNN
    InsufficientResourcesForSliceAndDnn = 0x43,
    /// Insufficient resources for specific slice
    InsufficientResourcesForSlice = 0x45,
    /// ngKSI already in use
    NgksiAlreadyInUse = 0x47,
    /// Non-3GPP access to 5GCN not allowed
    Non3gppAccessTo5gcnNotAllowed = 0x48,
    /// Serving network not authorized
    ServingNetworkNotAuthorized = 0x49,
    /// Payload was not forwarded
    PayloadNotForwarded = 0x5A,
    /// DNN not supported or not subscribed in the slice
    DnnNotSupportedOrNotSubscribed = 0x5B,
    /// Insufficient user-plane resources for the PDU session
    InsufficientUserPlaneResources = 0x5C,
    /// Semantically incorrect message
    #[default]
    SemanticallyIncorrectMessage = 0x5F,
    /// Invalid mandatory information
    InvalidMandatoryInformation = 0x60,
    /// Message type non-existent or not implemented
    MessageTypeNonExistent = 0x61,
    /// Message type not compatible with protocol state
    MessageTypeNotCompatible = 0x62,
    /// Information element non-existent or not implemented
    IeNonExistent = 0x63,
    /// Conditional IE error
    ConditionalIeError = 0x64,
    /// Message not compatible with protocol state
    MessageNotCompatible = 0x65,
    /// Protocol error, unspecified
    ProtocolErrorUnspecified = 0x6F,
}

/// 5GSM Cause values (3GPP TS 24.501 Section 9.11.4.2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum SmCause {
    /// Insufficient resources
    InsufficientResources = 0x1A,
    /// Missing or unknown DNN
    MissingOrUnknownDnn = 0x1B,
    /// Unknown PDU session type
    UnknownPduSessionType = 0x1C,
    /// User authentication or authorization failed
    UserAuthFailed = 0x1D,
    /// Request rejected, unspecified
    RequestRejectedUnspecified = 0x1F,
    /// Service option temporarily out of order
    ServiceOptionTemporarilyOutOfOrder = 0x22,
    /// PTI already in use
    PtiAlreadyInUse = 0x23,
    /// Regular deactivation
    RegularDeactivation = 0x24,
    /// Network failure
    NetworkFailure = 0x26,
    /// Reactivation requested
    ReactivationRequested = 0x27,
    /// Semantic error in the TFT operation
    SemanticErrorInTftOperation = 0x29,
    /// Syntactical error in the TFT operation
    SyntacticalErrorInTftOperation = 0x2A,
    /// Invalid PDU session identity
    InvalidPduSessionIdentity = 0x2B,
    /// Semantic errors in packet filter(s)
    SemanticErrorsInPacketFilters = 0x2C,
    /// Syntactical error in packet filter(s)
    SyntacticalErrorInPacketFilters = 0x2D,
    /// Out of LADN service area
    OutOfLadnServiceArea = 0x2E,
    /// PTI mismatch
    PtiMismatch = 0x2F,
    /// PDU session type IPv4 only allowed
    PduSessionTypeIpv4OnlyAllowed = 0x32,
    /// PDU session type IPv6 only allowed
    PduSessionTypeIpv6OnlyAllowed = 0x33,
    /// PDU session does not exist
    PduSessionDoesNotExist = 0x36,
    /// PDU session type IPv4v6 only allowed
    PduSessionTypeIpv4v6OnlyAllowed = 0x39,
    /// PDU session type Unstructured only allowed
    PduSessionTypeUnstructuredOnlyAllowed = 0x3A,
    /// Unsupported 5QI value
    Unsupported5qiValue = 0x3B,
    /// PDU session type Ethernet only allowed
    PduSessionTypeEthernetOnlyAllowed = 0x3D,
    /// Insufficient resources for specific slice and DNN
    InsufficientResourcesForSliceAndDnn = 0x43,
    /// Not supported SSC mode
    NotSupportedSscMode = 0x44,
    /// Insufficient resources for specific slice
    InsufficientResourcesForSlice = 0x45,
    /// Missing or unknown DNN in a slice
    MissingOrUnknownDnnInSlice = 0x46,
    /// Invalid PTI value
    InvalidPtiValue = 0x51,
    /// Maximum data rate per UE for user-plane integrity protection is too low
    MaxDataRateForIntegrityProtectionTooLow = 0x52,
    /// Semantic error in the QoS operation
    SemanticErrorInQosOperation = 0x53,
    /// Syntactical error in the QoS operation
    SyntacticalErrorInQosOperation = 0x54,
    /// Semantically incorrect message
    #[default]
    SemanticallyIncorrectMessage = 0x5F,
    /// Invalid mandatory information
    InvalidMandatoryInformation = 0x60,
    /// Message type non-existent or not implemented
    MessageTypeNonExistent = 0x61,
    /// Message type not compatible with the protocol state
    MessageTypeNotCompatible = 0x62,
    /// Information element non-existent or not implemented
    IeNonExistent = 0x63,
    /// Conditional IE error
    ConditionalIeError = 0x64,
    /// Message not compatible with the protocol state
    MessageNotCompatible = 0x65,
    /// Protocol error, unspecified
    ProtocolErrorUnspecified = 0x6F,
}

/// Type of ciphering algorithm (3GPP TS 24.501 Section 9.11.3.34)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TypeOfCipheringAlgorithm {
    /// 5G-EA0 (null ciphering)
    #[default]
    Ea0 = 0x00,
    /// 128-5G-EA1
    Ea1_128 = 0x01,
    /// 128-5G-EA2
    Ea2_128 = 0x02,
    /// 128-5G-EA3
    Ea3_128 = 0x03,
    /// 5G-EA4
    Ea4 = 0x04,
    /// 5G-EA5
    Ea5 = 0x05,
    /// 5G-EA6
    Ea6 = 0x06,
    /// 5G-EA7
    Ea7 = 0x07,
}

/// Type of integrity protection algorithm (3GPP TS 24.501 Section 9.11.3.34)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum TypeOfIntegrityProtectionAlgorithm {
    /// 5G-IA0 (null integrity)
    #[default]
    Ia0 = 0x00,
    /// 128-5G-IA1
    Ia1_128 = 0x01,
    /// 128-5G-IA2
    Ia2_128 = 0x02,
    /// 128-5G-IA3
    Ia3_128 = 0x03,
    /// 5G-IA4
    Ia4 = 0x04,
    /// 5G-IA5
    Ia5 = 0x05,
    /// 5G-IA6
    Ia6 = 0x06,
    /// 5G-IA7
    Ia7 = 0x07,
}

/// GPRS timer unit (3GPP TS 24.008 Section 10.5.7.3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum GprsTimerUnit {
    /// Value is incremented in multiples of 2 seconds
    #[default]
    Multiples2Seconds = 0b000,
    /// Value is incremented in multiples of 1 minute
    Multiples1Minute = 0b001,
    /// Value is incremented in multiples of decihours
    MultiplesDecihours = 0b010,
    /// Timer is deactivated
    Deactivated = 0b111,
}

// ============================================================================
// Type 3 IE Structures
// ============================================================================

/// 5GMM Cause IE (3GPP TS 24.501 Section 9.11.3.2), one octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ie5gMmCause {
    /// Cause value
    pub value: MmCause,
}

impl Ie5gMmCause {
    /// Create a new 5GMM Cause IE
    pub fn new(value: MmCause) -> Self {
        Self { value }
    }

    /// Decode a 5GMM cause octet
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let octet = get_u8(buf)?;
        let value =
            MmCause::try_from(octet).map_err(|_| CodecError::MalformedField("5GMM cause"))?;
        Ok(Self { value })
    }

    /// Encode the cause octet
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.value.into());
    }
}

/// 5GSM Cause IE (3GPP TS 24.501 Section 9.11.4.2), one octet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ie5gSmCause {
    /// Cause value
    pub value: SmCause,
}

impl Ie5gSmCause {
    /// Create a new 5GSM Cause IE
    pub fn new(value: SmCause) -> Self {
        Self { value }
    }

    /// Decode a 5GSM cause octet
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let octet = get_u8(buf)?;
        let value =
            SmCause::try_from(octet).map_err(|_| CodecError::MalformedField("5GSM cause"))?;
        Ok(Self { value })
    }

    /// Encode the cause octet
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.value.into());
    }
}

/// PDU Session Identity IE (3GPP TS 24.501 Section 9.11.3.41), one octet.
///
/// Value 0 means "no PDU session identity assigned"; 1-15 identify a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IePduSessionIdentity {
    /// PDU session identity value
    pub value: u8,
}

impl IePduSessionIdentity {
    /// Value indicating no PDU session identity assigned
    pub const NO_IDENTITY: u8 = 0;

    /// Create a new PDU Session Identity IE
    pub fn new(value: u8) -> Self {
        Self { value }
    }

    /// Decode the identity octet
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        Ok(Self {
            value: get_u8(buf)?,
        })
    }

    /// Encode the identity octet
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.value);
    }
}

/// GPRS Timer IE (3GPP TS 24.008 Section 10.5.7.3), one octet.
///
/// Bits 7-5 carry the unit, bits 4-0 the timer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeGprsTimer {
    /// Timer unit
    pub unit: GprsTimerUnit,
    /// Timer value (0-31)
    pub value: u8,
}

impl IeGprsTimer {
    /// Create a new GPRS Timer IE
    pub fn new(unit: GprsTimerUnit, value: u8) -> Self {
        Self {
            unit,
            value: value & 0x1F,
        }
    }

    /// Decode the timer octet
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let octet = get_u8(buf)?;
        let unit = GprsTimerUnit::try_from((octet >> 5) & 0x07)
            .map_err(|_| CodecError::MalformedField("GPRS timer unit"))?;
        Ok(Self {
            unit,
            value: octet & 0x1F,
        })
    }

    /// Encode the timer octet
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        let unit_val: u8 = self.unit.into();
        buf.put_u8((unit_val << 5) | (self.value & 0x1F));
    }
}

/// NAS Security Algorithms IE (3GPP TS 24.501 Section 9.11.3.34), one octet.
///
/// Ciphering algorithm in bits 7-4, integrity algorithm in bits 3-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IeNasSecurityAlgorithms {
    /// Type of ciphering algorithm
    pub ciphering: TypeOfCipheringAlgorithm,
    /// Type of integrity protection algorithm
    pub integrity: TypeOfIntegrityProtectionAlgorithm,
}

impl IeNasSecurityAlgorithms {
    /// Create a new NAS Security Algorithms IE
    pub fn new(
        ciphering: TypeOfCipheringAlgorithm,
        integrity: TypeOfIntegrityProtectionAlgorithm,
    ) -> Self {
        Self {
            ciphering,
            integrity,
        }
    }

    /// Decode the algorithms octet
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let octet = get_u8(buf)?;
        let ciphering = TypeOfCipheringAlgorithm::try_from((octet >> 4) & 0x0F)
            .map_err(|_| CodecError::MalformedField("ciphering algorithm"))?;
        let integrity = TypeOfIntegrityProtectionAlgorithm::try_from(octet & 0x0F)
            .map_err(|_| CodecError::MalformedField("integrity algorithm"))?;
        Ok(Self {
            ciphering,
            integrity,
        })
    }

    /// Encode the algorithms octet
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        let ciph: u8 = self.ciphering.into();
        let intg: u8 = self.integrity.into();
        buf.put_u8((ciph << 4) | (intg & 0x0F));
    }
}

/// Integrity Protection Maximum Data Rate IE
/// (3GPP TS 24.501 Section 9.11.4.7), two octets.
///
/// 0xFF in an octet means "full data rate".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IeIntegrityProtectionMaximumDataRate {
    /// Maximum data rate for uplink
    pub uplink: u8,
    /// Maximum data rate for downlink
    pub downlink: u8,
}

impl IeIntegrityProtectionMaximumDataRate {
    /// Octet value meaning full data rate
    pub const FULL_DATA_RATE: u8 = 0xFF;

    /// Create a new Integrity Protection Maximum Data Rate IE
    pub fn new(uplink: u8, downlink: u8) -> Self {
        Self { uplink, downlink }
    }

    /// Full data rate in both directions
    pub fn full_rate() -> Self {
        Self {
            uplink: Self::FULL_DATA_RATE,
            downlink: Self::FULL_DATA_RATE,
        }
    }

    /// Decode the two rate octets
    pub fn decode<B: Buf>(buf: &mut B) -> CodecResult<Self> {
        let combined = get_u16(buf)?;
        Ok(Self {
            uplink: (combined >> 8) as u8,
            downlink: (combined & 0xFF) as u8,
        })
    }

    /// Encode the two rate octets
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.uplink);
        buf.put_u8(self.downlink);
    }
}

impl Default for IeIntegrityProtectionMaximumDataRate {
    fn default() -> Self {
        Self::full_rate()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_cause_encode_decode() {
        let ie = Ie5gMmCause::new(MmCause::SecModeRejectedUnspecified);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x18]);

        let decoded = Ie5gMmCause::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.value, MmCause::SecModeRejectedUnspecified);
    }

    #[test]
    fn test_mm_cause_unknown_value() {
        let data = [0x01];
        let result = Ie5gMmCause::decode(&mut data.as_slice());
        assert_eq!(result, Err(CodecError::MalformedField("5GMM cause")));
    }

    #[test]
    fn test_sm_cause_encode_decode() {
        let ie = Ie5gSmCause::new(SmCause::RegularDeactivation);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x24]);

        let decoded = Ie5gSmCause::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.value, SmCause::RegularDeactivation);
    }

    #[test]
    fn test_pdu_session_identity() {
        let ie = IePduSessionIdentity::new(5);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![5]);

        let decoded = IePduSessionIdentity::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded.value, 5);
    }

    #[test]
    fn test_gprs_timer_encode_decode() {
        let ie = IeGprsTimer::new(GprsTimerUnit::MultiplesDecihours, 9);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        // unit=010 in bits 7-5, value=01001 in bits 4-0
        assert_eq!(buf, vec![0b0100_1001]);

        let decoded = IeGprsTimer::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_gprs_timer_deactivated() {
        let ie = IeGprsTimer::new(GprsTimerUnit::Deactivated, 0);
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0b1110_0000]);
    }

    #[test]
    fn test_nas_security_algorithms() {
        let ie = IeNasSecurityAlgorithms::new(
            TypeOfCipheringAlgorithm::Ea2_128,
            TypeOfIntegrityProtectionAlgorithm::Ia2_128,
        );
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0x22]);

        let decoded = IeNasSecurityAlgorithms::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_integrity_protection_max_data_rate() {
        let ie = IeIntegrityProtectionMaximumDataRate::full_rate();
        let mut buf = Vec::new();
        ie.encode(&mut buf);
        assert_eq!(buf, vec![0xFF, 0xFF]);

        let decoded =
            IeIntegrityProtectionMaximumDataRate::decode(&mut buf.as_slice()).unwrap();
        assert_eq!(decoded, ie);
    }

    #[test]
    fn test_cause_decode_too_short() {
        let data: [u8; 0] = [];
        assert!(matches!(
            Ie5gMmCause::decode(&mut data.as_slice()),
            Err(CodecError::BufferTooShort { .. })
        ));
    }
}
