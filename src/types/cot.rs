//! IEC 60870-5-104 Cause of Transmission (COT).
//!
//! The cause of transmission defines the reason for sending an ASDU. It
//! occupies the low 6 bits of the COT octet; bit 6 is the P/N flag and
//! bit 7 the test flag.

use std::borrow::Cow;

/// Cause of Transmission (COT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Cot {
    /// Periodic, cyclic (1)
    Periodic = 1,

    /// Background scan (2)
    Background = 2,

    /// Spontaneous (3)
    Spontaneous = 3,

    /// Initialized (4)
    Initialized = 4,

    /// Request or requested (5)
    Request = 5,

    /// Activation (6)
    Activation = 6,

    /// Activation confirmation (7)
    ActivationConfirm = 7,

    /// Deactivation (8)
    Deactivation = 8,

    /// Deactivation confirmation (9)
    DeactivationConfirm = 9,

    /// Activation termination (10)
    ActivationTermination = 10,

    /// Return information caused by a remote command (11)
    ReturnRemoteCommand = 11,

    /// Return information caused by a local command (12)
    ReturnLocalCommand = 12,

    /// File transfer (13)
    FileTransfer = 13,

    /// Interrogated by station interrogation (20)
    InterrogatedByStation = 20,

    /// Interrogated by group 1 interrogation (21)
    InterrogatedByGroup1 = 21,

    /// Requested by general counter request (36)
    RequestedByGeneralCounter = 36,

    /// Requested by group 1 counter request (37)
    RequestedByGroup1Counter = 37,

    /// Unknown type identification (44)
    UnknownTypeId = 44,

    /// Unknown cause of transmission (45)
    UnknownCot = 45,

    /// Unknown common address of ASDU (46)
    UnknownCommonAddress = 46,

    /// Unknown information object address (47)
    UnknownIoa = 47,
}

impl Cot {
    /// Look up a COT from the raw COT octet (only the lower 6 bits are used).
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value & 0x3F {
            1 => Some(Self::Periodic),
            2 => Some(Self::Background),
            3 => Some(Self::Spontaneous),
            4 => Some(Self::Initialized),
            5 => Some(Self::Request),
            6 => Some(Self::Activation),
            7 => Some(Self::ActivationConfirm),
            8 => Some(Self::Deactivation),
            9 => Some(Self::DeactivationConfirm),
            10 => Some(Self::ActivationTermination),
            11 => Some(Self::ReturnRemoteCommand),
            12 => Some(Self::ReturnLocalCommand),
            13 => Some(Self::FileTransfer),
            20 => Some(Self::InterrogatedByStation),
            21 => Some(Self::InterrogatedByGroup1),
            36 => Some(Self::RequestedByGeneralCounter),
            37 => Some(Self::RequestedByGroup1Counter),
            44 => Some(Self::UnknownTypeId),
            45 => Some(Self::UnknownCot),
            46 => Some(Self::UnknownCommonAddress),
            47 => Some(Self::UnknownIoa),
            _ => None,
        }
    }

    /// Convert to raw byte value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable reason.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Periodic => "periodic, cyclic",
            Self::Background => "background scan",
            Self::Spontaneous => "spontaneous",
            Self::Initialized => "initialized",
            Self::Request => "requested",
            Self::Activation => "activation",
            Self::ActivationConfirm => "activation confirmation",
            Self::Deactivation => "deactivation",
            Self::DeactivationConfirm => "deactivation confirmation",
            Self::ActivationTermination => "activation termination",
            Self::ReturnRemoteCommand => "return information caused by a remote command",
            Self::ReturnLocalCommand => "return information caused by a local command",
            Self::FileTransfer => "file transfer",
            Self::InterrogatedByStation => "interrogated by station interrogation",
            Self::InterrogatedByGroup1 => "interrogated by group 1 interrogation",
            Self::RequestedByGeneralCounter => "requested by general counter request",
            Self::RequestedByGroup1Counter => "requested by group 1 counter request",
            Self::UnknownTypeId => "unknown type identification",
            Self::UnknownCot => "unknown cause of transmission",
            Self::UnknownCommonAddress => "unknown common address of ASDU",
            Self::UnknownIoa => "unknown information object address",
        }
    }

    /// Describe a 6-bit cause code, falling back to `unknown reason(N)`.
    pub fn describe(cause: u8) -> Cow<'static, str> {
        match Self::from_u8(cause) {
            Some(cot) => Cow::Borrowed(cot.description()),
            None => Cow::Owned(format!("unknown reason({})", cause & 0x3F)),
        }
    }
}

impl std::fmt::Display for Cot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}
