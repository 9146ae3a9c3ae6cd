//! Information element parser.
//!
//! Decodes the value of the first information object of an ASDU for the
//! handful of type identifications a log viewer displays inline. Offsets are
//! absolute within the APDU: the element starts at byte 15, right after the
//! 3-byte IOA.

use crate::error::{Iec104Error, Result};
use crate::types::{round4, InformationElement, Quality, TypeId};

/// Offset of the first information element in the APDU.
pub const ELEMENT_OFFSET: usize = 15;

/// Parse the first information element of an I-frame.
///
/// Returns `Ok(None)` when the type is not decoded inline or the frame is too
/// short to carry the element. An `Err` means the bytes were present but did
/// not form a usable value; callers keep the ASDU header regardless.
pub fn parse_information_element(type_id: u8, data: &[u8]) -> Result<Option<InformationElement>> {
    let Some(type_id) = TypeId::from_u8(type_id) else {
        return Ok(None);
    };

    match type_id {
        TypeId::InterrogationCommand => Ok(data
            .get(ELEMENT_OFFSET)
            .map(|&qoi| InformationElement::Qualifier { value: qoi })),

        TypeId::SinglePoint | TypeId::SinglePointTime56 => {
            Ok(data.get(ELEMENT_OFFSET).map(|&siq| parse_single_point(siq)))
        }

        TypeId::MeasuredFloat | TypeId::MeasuredFloatTime56 => {
            if data.len() < ELEMENT_OFFSET + 4 {
                return Ok(None);
            }
            parse_short_float(&data[ELEMENT_OFFSET..]).map(Some)
        }

        _ => Ok(None),
    }
}

/// Parse SIQ (Single-point Information with Quality).
fn parse_single_point(siq: u8) -> InformationElement {
    InformationElement::SinglePoint {
        value: siq & 0x01,
        quality: Quality::from_siq(siq),
    }
}

/// Parse IEEE STD 754 short float (little-endian) and optional QDS.
fn parse_short_float(data: &[u8]) -> Result<InformationElement> {
    let raw: [u8; 4] = data
        .get(0..4)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| Iec104Error::invalid_asdu("Data too short for short float"))?;

    let value = f32::from_le_bytes(raw);
    if !value.is_finite() {
        return Err(Iec104Error::invalid_asdu(format!(
            "Short float is not finite: {}",
            value
        )));
    }

    Ok(InformationElement::ShortFloat {
        value: round4(value as f64),
        quality: data.get(4).map(|&qds| Quality::from_qds(qds)),
    })
}
