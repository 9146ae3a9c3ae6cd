//! IEC 60870-5-104 ASDU (Application Service Data Unit) header fields.
//!
//! ```text
//! offset  6        7      8      9           10-11          12-14   15..
//!       +--------+------+------+-----------+--------------+-------+------
//!       | TypeID | VSQ  | COT  | Originator| Common addr  | IOA   | IE
//!       +--------+------+------+-----------+--------------+-------+------
//! ```
//!
//! Offsets are absolute, counted from the start byte of the APDU.

use std::borrow::Cow;

use crate::types::{Cot, InformationElement, TypeId};

/// Variable Structure Qualifier (VSQ).
///
/// Defines the structure of information objects in an ASDU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vsq {
    /// Number of information objects (0-127)
    pub count: u8,
    /// If true, addresses are sequential (SQ=1)
    pub sequence: bool,
}

impl Vsq {
    /// Parse VSQ from byte.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        Self {
            count: value & 0x7F,
            sequence: (value & 0x80) != 0,
        }
    }
}

/// Read a little-endian 16-bit common address.
#[inline]
pub const fn common_address(low: u8, high: u8) -> u16 {
    low as u16 | ((high as u16) << 8)
}

/// Read a little-endian 24-bit information object address.
#[inline]
pub const fn ioa(b0: u8, b1: u8, b2: u8) -> u32 {
    b0 as u32 | ((b1 as u32) << 8) | ((b2 as u32) << 16)
}

/// Decoded ASDU header of an I-frame plus the first information object.
#[derive(Debug, Clone, PartialEq)]
pub struct AsduFields {
    /// Raw type identification
    pub type_id: u8,
    /// Sequence flag (SQ), 0 or 1
    pub sq: u8,
    /// Number of information objects
    pub num_obj: u8,
    /// Cause of transmission (low 6 bits of the COT octet)
    pub cause: u8,
    /// Test flag, 0 or 1
    pub test: u8,
    /// Positive/negative confirmation flag, 0 or 1
    pub pn: u8,
    /// Common address of ASDU
    pub asdu_addr: u16,
    /// Information object address of the first object
    pub ioa: Option<u32>,
    /// Decoded information element of the first object
    pub element: Option<InformationElement>,
}

impl AsduFields {
    /// Build the header fields from the type, VSQ, COT and address octets.
    pub fn from_header(type_id: u8, vsq: u8, cot: u8, asdu_addr: u16) -> Self {
        let vsq = Vsq::from_u8(vsq);
        Self {
            type_id,
            sq: vsq.sequence as u8,
            num_obj: vsq.count,
            cause: cot & 0x3F,
            test: (cot & 0x80) >> 7,
            pn: (cot & 0x40) >> 6,
            asdu_addr,
            ioa: None,
            element: None,
        }
    }

    /// Type identification formatted as `0xNN`.
    #[inline]
    pub fn type_id_hex(&self) -> String {
        format!("0x{:02X}", self.type_id)
    }

    /// Type identification description.
    #[inline]
    pub fn type_id_desc(&self) -> &'static str {
        TypeId::describe(self.type_id)
    }

    /// Cause of transmission description.
    #[inline]
    pub fn cause_desc(&self) -> Cow<'static, str> {
        Cot::describe(self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vsq() {
        let vsq = Vsq::from_u8(0x8A);
        assert_eq!(vsq.count, 10);
        assert!(vsq.sequence);

        let vsq = Vsq::from_u8(0x01);
        assert_eq!(vsq.count, 1);
        assert!(!vsq.sequence);
    }

    #[test]
    fn test_addresses() {
        assert_eq!(common_address(0x01, 0x00), 1);
        assert_eq!(common_address(0x34, 0x12), 0x1234);
        assert_eq!(ioa(0x56, 0x34, 0x12), 0x123456);
    }

    #[test]
    fn test_header_flags() {
        let fields = AsduFields::from_header(0x2D, 0x81, 0xC7, 3);
        assert_eq!(fields.sq, 1);
        assert_eq!(fields.num_obj, 1);
        assert_eq!(fields.cause, 7);
        assert_eq!(fields.test, 1);
        assert_eq!(fields.pn, 1);
        assert_eq!(fields.asdu_addr, 3);
        assert_eq!(fields.type_id_hex(), "0x2D");
        assert_eq!(fields.type_id_desc(), TypeId::SingleCommand.description());
        assert_eq!(fields.cause_desc(), "activation confirmation");
    }

    #[test]
    fn test_header_unknown_codes() {
        let fields = AsduFields::from_header(0xFE, 0x00, 0x3F, 0);
        assert_eq!(fields.type_id_desc(), "unknown type");
        assert_eq!(fields.cause_desc(), "unknown reason(63)");
    }
}
