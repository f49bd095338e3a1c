//! NAS Information Elements (IEs)
//!
//! This module contains implementations of NAS Information Elements
//! as defined in 3GPP TS 24.501.
//!
//! ## IE Types
//!
//! - Type 1: Half-octet (4 bits) - [`ie1`]
//! - Type 3: Fixed length - [`ie3`]
//! - Type 4: Variable length (TLV) - [`ie4`]
//! - Type 6: Variable length (TLV-E) - [`pco`], [`qos`]

pub mod ie1;
pub mod ie3;
pub mod ie4;
pub mod pco;
pub mod qos;

pub use ie1::*;
pub use ie3::*;
pub use ie4::*;
pub use pco::*;
pub use qos::*;
