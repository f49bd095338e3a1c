//! 5GS Session Management (5GSM) messages
//!
//! Message bodies for the session management family (EPD 0x2E). The plain
//! SM header additionally carries the PDU session identity and the
//! procedure transaction identity; both live in the dispatcher's header
//! type, not in the bodies here.

pub mod pdu_session_establishment;
pub mod pdu_session_modification;
pub mod pdu_session_release;
pub mod status;

pub use pdu_session_establishment::{
    PduSessionEstablishmentAccept, PduSessionEstablishmentReject, PduSessionEstablishmentRequest,
};
pub use pdu_session_modification::{
    PduSessionModificationCommand, PduSessionModificationCommandReject,
    PduSessionModificationComplete, PduSessionModificationReject, PduSessionModificationRequest,
};
pub use pdu_session_release::{
    PduSessionReleaseCommand, PduSessionReleaseComplete, PduSessionReleaseReject,
    PduSessionReleaseRequest,
};
pub use status::FiveGSmStatus;
