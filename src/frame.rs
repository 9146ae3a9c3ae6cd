//! Decoded frame records.
//!
//! A [`FrameRecord`] is produced fresh for every decode call and never
//! mutated afterwards. It serializes to the flat JSON layout consumed by log
//! viewers: `type` is always present, every other field only when the input
//! was long enough to decode it.

use std::borrow::Cow;

use bytes::Bytes;
use serde::{Serialize, Serializer};

use crate::hex::format_hex;
use crate::types::{Apci, AsduFields, InformationElement, Quality};

/// Outcome of decoding one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameRecord {
    /// Malformed input: empty, bad hex, too short, wrong start byte
    Invalid {
        /// What was wrong with the input
        description: String,
    },
    /// Structural failure while classifying the APCI header
    Error {
        /// Failure message
        description: String,
    },
    /// Successfully classified frame
    Decoded(DecodedFrame),
}

impl FrameRecord {
    /// Create an invalid record.
    pub fn invalid(description: impl Into<String>) -> Self {
        Self::Invalid {
            description: description.into(),
        }
    }

    /// Create an error record.
    pub fn error(description: impl Into<String>) -> Self {
        Self::Error {
            description: description.into(),
        }
    }

    /// Frame type code: `I`, `S`, `U`, `UNKNOWN`, `INVALID` or `ERROR`.
    pub fn type_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "INVALID",
            Self::Error { .. } => "ERROR",
            Self::Decoded(frame) => frame.type_code(),
        }
    }

    /// Description for `INVALID`, `ERROR` and `UNKNOWN` records.
    pub fn description(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Invalid { description } | Self::Error { description } => {
                Some(Cow::Borrowed(description))
            }
            Self::Decoded(frame) => frame.unknown_description().map(Cow::Owned),
        }
    }

    /// Get the decoded frame, if any.
    #[inline]
    pub fn decoded(&self) -> Option<&DecodedFrame> {
        match self {
            Self::Decoded(frame) => Some(frame),
            _ => None,
        }
    }

    /// Get the ASDU fields of a decoded I-frame.
    #[inline]
    pub fn asdu(&self) -> Option<&AsduFields> {
        self.decoded().and_then(|frame| frame.asdu.as_ref())
    }
}

/// A frame that passed validation and was classified.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedFrame {
    /// APDU length octet as declared in the frame
    pub apdu_len: u8,
    /// The complete byte sequence, start byte included
    pub raw: Bytes,
    /// Classified control field
    pub apci: Apci,
    /// ASDU fields, I-frames of at least 12 bytes only
    pub asdu: Option<AsduFields>,
}

impl DecodedFrame {
    /// Frame type code.
    pub fn type_code(&self) -> &'static str {
        self.apci.frame_type().map_or("UNKNOWN", |t| t.code())
    }

    /// Frame type description.
    pub fn type_desc(&self) -> Option<&'static str> {
        self.apci.frame_type().map(|t| t.description())
    }

    /// The four control octets formatted as hex.
    pub fn ctrl_hex(&self) -> String {
        self.raw.get(2..6).map(format_hex).unwrap_or_default()
    }

    /// The full frame formatted as hex.
    pub fn raw_hex(&self) -> String {
        format_hex(&self.raw)
    }

    /// Number of bytes in the frame.
    #[inline]
    pub fn byte_count(&self) -> usize {
        self.raw.len()
    }

    /// Check whether fewer bytes were captured than the APDU length declares.
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.raw.len() < self.apdu_len as usize + 2
    }

    fn unknown_description(&self) -> Option<String> {
        match self.apci {
            Apci::Unknown { control } => Some(format!("unknown frame type: 0x{:02X}", control)),
            _ => None,
        }
    }
}

impl From<DecodedFrame> for FrameRecord {
    fn from(frame: DecodedFrame) -> Self {
        Self::Decoded(frame)
    }
}

/// `value` is an integer for single points and a float for measured values.
#[derive(Serialize)]
#[serde(untagged)]
enum ElementValue {
    Int(u8),
    Float(f64),
}

/// Flat serialization layout of a [`FrameRecord`].
#[derive(Default, Serialize)]
struct FrameView<'a> {
    #[serde(rename = "type")]
    frame_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_desc: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<Cow<'a, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    apdu_len: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctrl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_bytes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    byte_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    send_seq: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    recv_seq: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    type_id_desc: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sq: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_obj: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cause_desc: Option<Cow<'static, str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pn: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    asdu_addr: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    ioa: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qoi: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qoi_desc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<ElementValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    quality: Option<Quality>,
}

impl<'a> FrameView<'a> {
    fn new(record: &'a FrameRecord) -> Self {
        let mut view = FrameView {
            frame_type: record.type_code(),
            description: record.description(),
            ..Default::default()
        };

        let Some(frame) = record.decoded() else {
            return view;
        };

        view.type_desc = frame.type_desc();
        view.apdu_len = Some(frame.apdu_len);
        view.ctrl = Some(frame.ctrl_hex());
        view.raw_bytes = Some(frame.raw_hex());
        view.byte_count = Some(frame.byte_count());
        view.send_seq = frame.apci.send_seq();
        view.recv_seq = frame.apci.recv_seq();
        view.function = frame.apci.function_name();

        if let Some(asdu) = &frame.asdu {
            view.type_id = Some(asdu.type_id_hex());
            view.type_id_desc = Some(asdu.type_id_desc());
            view.sq = Some(asdu.sq);
            view.num_obj = Some(asdu.num_obj);
            view.cause = Some(asdu.cause);
            view.cause_desc = Some(asdu.cause_desc());
            view.test = Some(asdu.test);
            view.pn = Some(asdu.pn);
            view.asdu_addr = Some(asdu.asdu_addr);
            view.ioa = asdu.ioa;

            if let Some(element) = &asdu.element {
                match element {
                    InformationElement::Qualifier { value } => {
                        view.qoi = Some(*value);
                        view.qoi_desc = Some(InformationElement::qoi_description(*value));
                    }
                    InformationElement::SinglePoint { value, .. } => {
                        view.value = Some(ElementValue::Int(*value));
                    }
                    InformationElement::ShortFloat { value, .. } => {
                        view.value = Some(ElementValue::Float(*value));
                    }
                }
                view.quality = element.quality().copied();
            }
        }

        view
    }
}

impl Serialize for FrameRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FrameView::new(self).serialize(serializer)
    }
}

/// Serialize an absent frame as an empty JSON object.
pub(crate) fn serialize_optional_frame<S: Serializer>(
    frame: &Option<FrameRecord>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeMap;

    match frame {
        Some(record) => record.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl std::fmt::Display for FrameRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid { description } => write!(f, "INVALID: {}", description),
            Self::Error { description } => write!(f, "ERROR: {}", description),
            Self::Decoded(frame) => {
                write!(f, "{}", frame.apci)?;
                if let Some(asdu) = &frame.asdu {
                    write!(
                        f,
                        " [{}] COT={} CA={}",
                        asdu.type_id_hex(),
                        asdu.cause,
                        asdu.asdu_addr
                    )?;
                }
                Ok(())
            }
        }
    }
}
