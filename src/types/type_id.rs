//! IEC 60870-5-104 Type Identification.
//!
//! Type identification defines the structure and meaning of information objects.
//! Only the types a log viewer is expected to name are listed; every other
//! value decodes as "unknown type".

/// Description used for type identifications outside the table.
pub const UNKNOWN_TYPE: &str = "unknown type";

/// IEC 60870-5-104 Type Identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TypeId {
    // ============================================
    // Process information in monitoring direction
    // ============================================
    /// Single-point information (M_SP_NA_1)
    SinglePoint = 0x01,

    /// Double-point information (M_DP_NA_1)
    DoublePoint = 0x03,

    /// Measured value, normalized (M_ME_NA_1)
    MeasuredNormalized = 0x09,

    /// Measured value, scaled (M_ME_NB_1)
    MeasuredScaled = 0x0B,

    /// Measured value, short floating point (M_ME_NC_1)
    MeasuredFloat = 0x0D,

    /// Integrated totals (M_IT_NA_1)
    IntegratedTotals = 0x0F,

    /// Single-point information with time tag CP56Time2a (M_SP_TB_1)
    SinglePointTime56 = 0x1E,

    /// Double-point information with time tag CP56Time2a (M_DP_TB_1)
    DoublePointTime56 = 0x1F,

    /// Measured value, short floating point with time tag CP56Time2a (M_ME_TF_1)
    MeasuredFloatTime56 = 0x24,

    // ============================================
    // Process information in control direction
    // ============================================
    /// Single command (C_SC_NA_1)
    SingleCommand = 0x2D,

    /// Double command (C_DC_NA_1)
    DoubleCommand = 0x2E,

    /// Regulating step command (C_RC_NA_1)
    RegulatingStep = 0x2F,

    /// Set-point command, normalized (C_SE_NA_1)
    SetpointNormalized = 0x30,

    /// Set-point command, scaled (C_SE_NB_1)
    SetpointScaled = 0x31,

    /// Set-point command, short floating point (C_SE_NC_1)
    SetpointFloat = 0x32,

    // ============================================
    // System information in control direction
    // ============================================
    /// Interrogation command (C_IC_NA_1)
    InterrogationCommand = 0x64,

    /// Counter interrogation command (C_CI_NA_1)
    CounterInterrogation = 0x65,

    /// Clock synchronization command (C_CS_NA_1)
    ClockSync = 0x67,

    /// Test command (C_TS_NA_1)
    TestCommand = 0x68,

    /// Reset process command (C_RP_NA_1)
    ResetProcess = 0x69,

    /// Delay acquisition command (C_CD_NA_1)
    DelayAcquisition = 0x6A,
}

impl TypeId {
    /// Look up a type identification by its raw byte value.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x01 => Some(Self::SinglePoint),
            0x03 => Some(Self::DoublePoint),
            0x09 => Some(Self::MeasuredNormalized),
            0x0B => Some(Self::MeasuredScaled),
            0x0D => Some(Self::MeasuredFloat),
            0x0F => Some(Self::IntegratedTotals),
            0x1E => Some(Self::SinglePointTime56),
            0x1F => Some(Self::DoublePointTime56),
            0x24 => Some(Self::MeasuredFloatTime56),
            0x2D => Some(Self::SingleCommand),
            0x2E => Some(Self::DoubleCommand),
            0x2F => Some(Self::RegulatingStep),
            0x30 => Some(Self::SetpointNormalized),
            0x31 => Some(Self::SetpointScaled),
            0x32 => Some(Self::SetpointFloat),
            0x64 => Some(Self::InterrogationCommand),
            0x65 => Some(Self::CounterInterrogation),
            0x67 => Some(Self::ClockSync),
            0x68 => Some(Self::TestCommand),
            0x69 => Some(Self::ResetProcess),
            0x6A => Some(Self::DelayAcquisition),
            _ => None,
        }
    }

    /// Convert to raw byte value.
    #[inline]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Get the IEC standard name (e.g., "M_SP_NA_1").
    #[inline]
    pub const fn standard_name(&self) -> &'static str {
        match self {
            Self::SinglePoint => "M_SP_NA_1",
            Self::DoublePoint => "M_DP_NA_1",
            Self::MeasuredNormalized => "M_ME_NA_1",
            Self::MeasuredScaled => "M_ME_NB_1",
            Self::MeasuredFloat => "M_ME_NC_1",
            Self::IntegratedTotals => "M_IT_NA_1",
            Self::SinglePointTime56 => "M_SP_TB_1",
            Self::DoublePointTime56 => "M_DP_TB_1",
            Self::MeasuredFloatTime56 => "M_ME_TF_1",
            Self::SingleCommand => "C_SC_NA_1",
            Self::DoubleCommand => "C_DC_NA_1",
            Self::RegulatingStep => "C_RC_NA_1",
            Self::SetpointNormalized => "C_SE_NA_1",
            Self::SetpointScaled => "C_SE_NB_1",
            Self::SetpointFloat => "C_SE_NC_1",
            Self::InterrogationCommand => "C_IC_NA_1",
            Self::CounterInterrogation => "C_CI_NA_1",
            Self::ClockSync => "C_CS_NA_1",
            Self::TestCommand => "C_TS_NA_1",
            Self::ResetProcess => "C_RP_NA_1",
            Self::DelayAcquisition => "C_CD_NA_1",
        }
    }

    /// Full description: standard name followed by its meaning.
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SinglePoint => "M_SP_NA_1 single-point information",
            Self::DoublePoint => "M_DP_NA_1 double-point information",
            Self::MeasuredNormalized => "M_ME_NA_1 measured value, normalized",
            Self::MeasuredScaled => "M_ME_NB_1 measured value, scaled",
            Self::MeasuredFloat => "M_ME_NC_1 measured value, short floating point",
            Self::IntegratedTotals => "M_IT_NA_1 integrated totals",
            Self::SinglePointTime56 => "M_SP_TB_1 single-point information with time tag",
            Self::DoublePointTime56 => "M_DP_TB_1 double-point information with time tag",
            Self::MeasuredFloatTime56 => {
                "M_ME_TF_1 measured value, short floating point with time tag"
            }
            Self::SingleCommand => "C_SC_NA_1 single command",
            Self::DoubleCommand => "C_DC_NA_1 double command",
            Self::RegulatingStep => "C_RC_NA_1 regulating step command",
            Self::SetpointNormalized => "C_SE_NA_1 set-point command, normalized",
            Self::SetpointScaled => "C_SE_NB_1 set-point command, scaled",
            Self::SetpointFloat => "C_SE_NC_1 set-point command, short floating point",
            Self::InterrogationCommand => "C_IC_NA_1 interrogation command",
            Self::CounterInterrogation => "C_CI_NA_1 counter interrogation command",
            Self::ClockSync => "C_CS_NA_1 clock synchronization command",
            Self::TestCommand => "C_TS_NA_1 test command",
            Self::ResetProcess => "C_RP_NA_1 reset process command",
            Self::DelayAcquisition => "C_CD_NA_1 delay acquisition command",
        }
    }

    /// Describe a raw type identification byte.
    #[inline]
    pub fn describe(value: u8) -> &'static str {
        Self::from_u8(value).map_or(UNKNOWN_TYPE, |t| t.description())
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.standard_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_id_all_values_roundtrip() {
        let valid_values = [
            0x01, 0x03, 0x09, 0x0B, 0x0D, 0x0F, 0x1E, 0x1F, 0x24, 0x2D, 0x2E, 0x2F, 0x30, 0x31,
            0x32, 0x64, 0x65, 0x67, 0x68, 0x69, 0x6A,
        ];

        for val in valid_values {
            let type_id = TypeId::from_u8(val).unwrap();
            assert_eq!(type_id.as_u8(), val, "Roundtrip failed for value {}", val);
            assert!(type_id.description().starts_with(type_id.standard_name()));
        }
    }

    #[test]
    fn test_type_id_unknown_values() {
        for val in [0x00, 0x02, 0x0E, 0x25, 0x33, 0x46, 0x66, 0x6B, 0xFF] {
            assert!(TypeId::from_u8(val).is_none(), "Expected none for 0x{:02X}", val);
            assert_eq!(TypeId::describe(val), UNKNOWN_TYPE);
        }
    }

    #[test]
    fn test_type_id_describe() {
        assert_eq!(TypeId::describe(0x64), "C_IC_NA_1 interrogation command");
        assert_eq!(TypeId::describe(0x01), "M_SP_NA_1 single-point information");
    }

    #[test]
    fn test_type_id_display() {
        assert_eq!(format!("{}", TypeId::SinglePoint), "M_SP_NA_1");
        assert_eq!(format!("{}", TypeId::MeasuredFloatTime56), "M_ME_TF_1");
        assert_eq!(format!("{}", TypeId::DelayAcquisition), "C_CD_NA_1");
    }
}
