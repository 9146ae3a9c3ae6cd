//! Frame decoder.
//!
//! Validates a captured APDU, classifies its control field and, for
//! I-frames, decodes the ASDU header and first information element.
//!
//! Decoding never fails: malformed input yields [`FrameRecord::Invalid`],
//! a structural failure while classifying yields [`FrameRecord::Error`],
//! and a failure inside the information element is logged and dropped.

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{Iec104Error, Result};
use crate::frame::{DecodedFrame, FrameRecord};
use crate::hex::parse_hex;
use crate::parser::parse_information_element;
use crate::types::{
    common_address, ioa, Apci, AsduFields, ASDU_MIN_LENGTH, MIN_FRAME_LENGTH, START_BYTE,
};

/// Decode a frame given as a whitespace-delimited hex string.
///
/// # Example
///
/// ```
/// use iec104_logview::decode_frame;
///
/// let record = decode_frame("68 04 07 00 00 00");
/// assert_eq!(record.type_code(), "U");
/// ```
pub fn decode_frame(data: &str) -> FrameRecord {
    if data.trim().is_empty() {
        return FrameRecord::invalid("empty data");
    }

    match parse_hex(data) {
        Ok(bytes) => decode_bytes(bytes),
        Err(e) => {
            debug!("Rejecting frame: {}", e);
            FrameRecord::invalid("hex format error")
        }
    }
}

/// Decode a frame from raw bytes.
pub fn decode_bytes(bytes: Bytes) -> FrameRecord {
    if bytes.is_empty() {
        return FrameRecord::invalid("empty data");
    }

    if bytes.len() < MIN_FRAME_LENGTH {
        return FrameRecord::invalid(format!(
            "frame too short: need at least {} bytes, got {}",
            MIN_FRAME_LENGTH,
            bytes.len()
        ));
    }

    if bytes[0] != START_BYTE {
        return FrameRecord::invalid(format!(
            "invalid start character: 0x{:02X} (expected 0x{:02X})",
            bytes[0], START_BYTE
        ));
    }

    let apdu_len = bytes[1];
    let expected_len = apdu_len as usize + 2;
    if bytes.len() < expected_len {
        warn!(
            "Frame shorter than declared: got {} bytes, APDU length implies {}",
            bytes.len(),
            expected_len
        );
    }

    match classify(&bytes) {
        Ok((apci, asdu)) => FrameRecord::Decoded(DecodedFrame {
            apdu_len,
            raw: bytes,
            apci,
            asdu,
        }),
        Err(e) => FrameRecord::error(format!("decode error: {}", e)),
    }
}

/// Classify the control field and decode the ASDU of an I-frame.
fn classify(bytes: &[u8]) -> Result<(Apci, Option<AsduFields>)> {
    let control = bytes
        .get(2..MIN_FRAME_LENGTH)
        .ok_or_else(|| Iec104Error::invalid_frame("missing control field"))?;
    let apci = Apci::parse(control)?;

    let asdu = match apci {
        Apci::IFrame { .. } if bytes.len() >= ASDU_MIN_LENGTH => Some(decode_asdu(bytes)?),
        _ => None,
    };

    Ok((apci, asdu))
}

/// Decode the ASDU header of an I-frame.
///
/// Each length threshold adds fields: the header needs 12 bytes, the IOA 15
/// and the information element 16 or more. Byte 9 (originator address) is
/// skipped without validation.
pub fn decode_asdu(bytes: &[u8]) -> Result<AsduFields> {
    if bytes.len() < ASDU_MIN_LENGTH {
        return Err(Iec104Error::invalid_asdu(format!(
            "ASDU header needs {} bytes, got {}",
            ASDU_MIN_LENGTH,
            bytes.len()
        )));
    }

    let mut fields = AsduFields::from_header(
        bytes[6],
        bytes[7],
        bytes[8],
        common_address(bytes[10], bytes[11]),
    );

    if let [b0, b1, b2, ..] = &bytes[12..] {
        fields.ioa = Some(ioa(*b0, *b1, *b2));
    }

    if bytes.len() > 15 {
        match parse_information_element(fields.type_id, bytes) {
            Ok(element) => fields.element = element,
            Err(e) => warn!(
                "Failed to decode information element of type 0x{:02X}: {}",
                fields.type_id, e
            ),
        }
    }

    Ok(fields)
}
