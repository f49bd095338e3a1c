//! 5GS Mobility Management (5GMM) messages
//!
//! Message bodies for the mobility management family (EPD 0x7E). Each
//! message decodes from the bytes following the plain header and encodes
//! its body only; the header is handled by the message dispatcher.

pub mod authentication;
pub mod deregistration;
pub mod identity;
pub mod nas_transport;
pub mod registration;
pub mod security_mode;
pub mod service;
pub mod status;

pub use authentication::{
    AuthenticationFailure, AuthenticationReject, AuthenticationRequest, AuthenticationResponse,
};
pub use deregistration::{
    DeregistrationAcceptUeOriginating, DeregistrationAcceptUeTerminated,
    DeregistrationRequestUeOriginating, DeregistrationRequestUeTerminated,
};
pub use identity::{IdentityRequest, IdentityResponse};
pub use nas_transport::{DlNasTransport, PayloadContainer, UlNasTransport};
pub use registration::{
    RegistrationAccept, RegistrationComplete, RegistrationReject, RegistrationRequest,
};
pub use security_mode::{SecurityModeCommand, SecurityModeComplete, SecurityModeReject};
pub use service::{ServiceAccept, ServiceReject, ServiceRequest};
pub use status::FiveGMmStatus;
