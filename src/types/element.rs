//! Information element values decoded from an ASDU payload.

use serde::Serialize;

/// Qualifier of interrogation value for station (general) interrogation.
pub const QOI_STATION: u8 = 20;

/// Quality flags attached to single-point and measured values.
///
/// SIQ and QDS share the upper nibble (BL/SB/NT/IV); QDS adds the overflow
/// bit in bit 0, so `overflow` is only present for measured values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Quality {
    /// Blocked (BL)
    pub blocked: bool,
    /// Substituted (SB)
    pub substituted: bool,
    /// Not topical (NT)
    pub not_topical: bool,
    /// Invalid (IV)
    pub invalid: bool,
    /// Overflow (OV), measured values only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<bool>,
}

impl Quality {
    /// Parse from SIQ byte (single-point information with quality).
    pub fn from_siq(value: u8) -> Self {
        Self {
            blocked: (value & 0x10) != 0,
            substituted: (value & 0x20) != 0,
            not_topical: (value & 0x40) != 0,
            invalid: (value & 0x80) != 0,
            overflow: None,
        }
    }

    /// Parse from QDS byte (quality descriptor of a measured value).
    pub fn from_qds(value: u8) -> Self {
        Self {
            overflow: Some((value & 0x01) != 0),
            ..Self::from_siq(value)
        }
    }
}

/// Decoded information element of the first information object.
#[derive(Debug, Clone, PartialEq)]
pub enum InformationElement {
    /// Qualifier of interrogation (C_IC_NA_1)
    Qualifier {
        /// QOI value
        value: u8,
    },
    /// Single-point information (M_SP_NA_1, M_SP_TB_1)
    SinglePoint {
        /// SPI bit (0 or 1)
        value: u8,
        /// Quality from SIQ
        quality: Quality,
    },
    /// Short floating point measured value (M_ME_NC_1, M_ME_TF_1)
    ShortFloat {
        /// Value rounded to 4 decimal places
        value: f64,
        /// Quality from QDS, when the frame carries it
        quality: Option<Quality>,
    },
}

impl InformationElement {
    /// Description of an interrogation qualifier.
    pub fn qoi_description(qoi: u8) -> String {
        if qoi == QOI_STATION {
            "general interrogation".to_string()
        } else {
            format!("interrogation group {}", qoi)
        }
    }

    /// Quality flags, if the element carries any.
    pub fn quality(&self) -> Option<&Quality> {
        match self {
            Self::Qualifier { .. } => None,
            Self::SinglePoint { quality, .. } => Some(quality),
            Self::ShortFloat { quality, .. } => quality.as_ref(),
        }
    }
}

/// Round to 4 decimal places, ties to even.
///
/// The scaled product of an `f32` widened to `f64` is exact, so a tie is
/// detected exactly.
#[inline]
pub fn round4(value: f64) -> f64 {
    let scaled = value * 10_000.0;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded -= scaled.signum();
    }
    rounded / 10_000.0
}
