//! IEC 60870-5-104 APCI (Application Protocol Control Information).
//!
//! APCI is the 6-byte header of an APDU, containing frame type and sequence numbers.

use std::borrow::Cow;

use crate::error::{Iec104Error, Result};

/// Start byte for IEC 104 frames.
pub const START_BYTE: u8 = 0x68;

/// Minimum frame length in bytes (start + length + 4 control octets).
pub const MIN_FRAME_LENGTH: usize = 6;

/// Minimum frame length for which the ASDU header is decoded.
pub const ASDU_MIN_LENGTH: usize = 12;

/// APCI frame type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameType {
    /// I-frame: Information transfer
    IFrame,
    /// S-frame: Supervisory (acknowledgment)
    SFrame,
    /// U-frame: Unnumbered (control)
    UFrame,
}

impl FrameType {
    /// Short code used in decoded output (`"I"`, `"S"`, `"U"`).
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::IFrame => "I",
            Self::SFrame => "S",
            Self::UFrame => "U",
        }
    }

    /// Human-readable frame type name.
    #[inline]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::IFrame => "I-frame (information transfer)",
            Self::SFrame => "S-frame (supervisory)",
            Self::UFrame => "U-frame (control)",
        }
    }
}

/// U-frame function codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UFunction {
    /// STARTDT act (Start Data Transfer activation)
    StartDtAct,
    /// STARTDT con (Start Data Transfer confirmation)
    StartDtCon,
    /// STOPDT act (Stop Data Transfer activation)
    StopDtAct,
    /// STOPDT con (Stop Data Transfer confirmation)
    StopDtCon,
    /// TESTFR act (Test Frame activation)
    TestFrAct,
    /// TESTFR con (Test Frame confirmation)
    TestFrCon,
}

impl UFunction {
    /// Get the control field byte for this U-function.
    #[inline]
    pub const fn control_byte(&self) -> u8 {
        match self {
            Self::StartDtAct => 0x07, // 0000 0111
            Self::StartDtCon => 0x0B, // 0000 1011
            Self::StopDtAct => 0x13,  // 0001 0011
            Self::StopDtCon => 0x23,  // 0010 0011
            Self::TestFrAct => 0x43,  // 0100 0011
            Self::TestFrCon => 0x83,  // 1000 0011
        }
    }

    /// Look up the U-function by the exact value of the first control byte.
    #[inline]
    pub const fn from_control_byte(byte: u8) -> Option<Self> {
        match byte {
            0x07 => Some(Self::StartDtAct),
            0x0B => Some(Self::StartDtCon),
            0x13 => Some(Self::StopDtAct),
            0x23 => Some(Self::StopDtCon),
            0x43 => Some(Self::TestFrAct),
            0x83 => Some(Self::TestFrCon),
            _ => None,
        }
    }

    /// Function name as written in protocol traces.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartDtAct => "STARTDT act",
            Self::StartDtCon => "STARTDT con",
            Self::StopDtAct => "STOPDT act",
            Self::StopDtCon => "STOPDT con",
            Self::TestFrAct => "TESTFR act",
            Self::TestFrCon => "TESTFR con",
        }
    }
}

/// Decode a 15-bit sequence number from its two control octets.
///
/// The low octet carries bits 0-6 shifted left by one (bit 0 is the frame
/// format bit), the high octet carries bits 7-14.
#[inline]
pub const fn decode_seq(low: u8, high: u8) -> u16 {
    (((low & 0xFE) >> 1) as u16) | ((high as u16) << 7)
}

/// Split a 15-bit sequence number into its two control octets.
#[inline]
pub const fn encode_seq(seq: u16) -> [u8; 2] {
    [((seq & 0x7F) << 1) as u8, ((seq >> 7) & 0xFF) as u8]
}

/// Decoded APCI control field.
///
/// ```text
/// +--------+--------+--------+--------+--------+--------+
/// | 0x68   | Length | CF1    | CF2    | CF3    | CF4    |
/// +--------+--------+--------+--------+--------+--------+
///   Start    APDU     Control Field (4 bytes)
///   Byte     Length
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Apci {
    /// I-frame with send and receive sequence numbers.
    IFrame {
        /// Send sequence number (0-32767)
        send_seq: u16,
        /// Receive sequence number (0-32767)
        recv_seq: u16,
    },
    /// S-frame with receive sequence number only.
    SFrame {
        /// Receive sequence number (0-32767)
        recv_seq: u16,
    },
    /// U-frame, keyed by its raw first control byte.
    UFrame {
        /// First control octet
        control: u8,
    },
    /// Control octet matching none of the frame formats.
    Unknown {
        /// First control octet
        control: u8,
    },
}

impl Apci {
    /// Classify the 4-byte control field.
    ///
    /// Note: This expects 4 bytes of control field, not the full 6-byte APCI.
    pub fn parse(control: &[u8]) -> Result<Self> {
        let [cf1, cf2, cf3, cf4] = match control {
            [a, b, c, d, ..] => [*a, *b, *c, *d],
            _ => {
                return Err(Iec104Error::invalid_frame(format!(
                    "control field too short: {} bytes",
                    control.len()
                )))
            }
        };

        // Frame format lives in the two low bits of CF1
        let apci = match cf1 & 0x03 {
            0x00 | 0x02 => Self::IFrame {
                send_seq: decode_seq(cf1, cf2),
                recv_seq: decode_seq(cf3, cf4),
            },
            0x01 => Self::SFrame {
                recv_seq: decode_seq(cf3, cf4),
            },
            0x03 => Self::UFrame { control: cf1 },
            _ => Self::Unknown { control: cf1 },
        };
        Ok(apci)
    }

    /// Get the frame type, `None` for an unclassified control byte.
    #[inline]
    pub fn frame_type(&self) -> Option<FrameType> {
        match self {
            Self::IFrame { .. } => Some(FrameType::IFrame),
            Self::SFrame { .. } => Some(FrameType::SFrame),
            Self::UFrame { .. } => Some(FrameType::UFrame),
            Self::Unknown { .. } => None,
        }
    }

    /// Get the send sequence number (I-frame only).
    #[inline]
    pub fn send_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { send_seq, .. } => Some(*send_seq),
            _ => None,
        }
    }

    /// Get the receive sequence number (I-frame and S-frame).
    #[inline]
    pub fn recv_seq(&self) -> Option<u16> {
        match self {
            Self::IFrame { recv_seq, .. } | Self::SFrame { recv_seq } => Some(*recv_seq),
            _ => None,
        }
    }

    /// Get the U-frame function, if this is a U-frame with a known code.
    #[inline]
    pub fn function(&self) -> Option<UFunction> {
        match self {
            Self::UFrame { control } => UFunction::from_control_byte(*control),
            _ => None,
        }
    }

    /// U-frame function name, falling back to `unknown function(0xXX)`.
    pub fn function_name(&self) -> Option<Cow<'static, str>> {
        match self {
            Self::UFrame { control } => Some(match UFunction::from_control_byte(*control) {
                Some(function) => Cow::Borrowed(function.name()),
                None => Cow::Owned(format!("unknown function(0x{:02X})", control)),
            }),
            _ => None,
        }
    }
}

impl std::fmt::Display for Apci {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IFrame { send_seq, recv_seq } => {
                write!(f, "I(S={}, R={})", send_seq, recv_seq)
            }
            Self::SFrame { recv_seq } => write!(f, "S(R={})", recv_seq),
            Self::UFrame { .. } => {
                write!(f, "U({})", self.function_name().unwrap_or_default())
            }
            Self::Unknown { control } => write!(f, "?(0x{:02X})", control),
        }
    }
}
