//! IEC 60870-5-104 type definitions and code tables.
//!
//! - `Apci` - control field classification, U-frame functions
//! - `TypeId` - Type identification (M_SP_NA_1, etc.)
//! - `Cot` - Cause of transmission
//! - `AsduFields` - decoded ASDU header
//! - `InformationElement` - decoded payload values and quality flags

mod apci;
mod asdu;
mod cot;
mod element;
mod type_id;

pub use apci::*;
pub use asdu::*;
pub use cot::*;
pub use element::*;
pub use type_id::*;
