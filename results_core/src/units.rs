//! # Unit Conversion
//!
//! The host analysis application reports every result in SI base units
//! (N, N·mm, mm). Everything this crate hands back is in US display units:
//!
//! | Quantity | Base | Display | Factor |
//! |---|---|---|---|
//! | Force | N | kip | 0.0002248089 |
//! | Moment | N·mm | kip·ft | 7.37562121169657e-7 |
//! | Deflection / Displacement | mm | in | 0.0393701 |
//! | Position (length) | mm | ft | 0.00328084 |
//!
//! Values stay raw `f64` throughout; [`factor`] is applied once when a
//! result leaves the provider.
//!
//! ## Example
//!
//! ```rust
//! use results_core::logging::TracingLogger;
//! use results_core::units::{factor, mm_to_ft, QuantityKind};
//!
//! let kips = 4448.22 * factor(QuantityKind::Force, &TracingLogger);
//! assert!((kips - 1.0).abs() < 1e-4);
//! assert!((mm_to_ft(3048.0) - 10.0).abs() < 1e-4);
//! ```

use serde::{Deserialize, Serialize};

use crate::logging::Logger;

/// N → kip
pub const NEWTON_TO_KIP: f64 = 0.0002248089;
/// N·mm → kip·ft
pub const NEWTON_MM_TO_KIP_FT: f64 = 0.000000737562121169657;
/// mm → in
pub const MM_TO_INCH: f64 = 0.0393701;
/// mm → ft
pub const MM_TO_FT: f64 = 0.00328084;

// ============================================================================
// Quantity Kinds
// ============================================================================

/// Physical quantity reported by the analysis for a response channel.
///
/// Unknown kinds coming from a provider deserialize to `Unrecognized`
/// and convert with a factor of 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuantityKind {
    Force,
    Moment,
    Deflection,
    Displacement,
    Length,
    #[serde(other)]
    Unrecognized,
}

impl QuantityKind {
    /// Display unit label used in report headers
    pub fn display_unit(&self) -> &'static str {
        match self {
            QuantityKind::Force => "k",
            QuantityKind::Moment => "k-ft",
            QuantityKind::Deflection | QuantityKind::Displacement => "in",
            QuantityKind::Length => "ft",
            QuantityKind::Unrecognized => "base",
        }
    }
}

/// Conversion factor from the host's base unit to the display unit.
///
/// Unrecognised kinds are left in base units; a warning goes to `logger`.
pub fn factor(kind: QuantityKind, logger: &dyn Logger) -> f64 {
    match kind {
        QuantityKind::Force => NEWTON_TO_KIP,
        QuantityKind::Moment => NEWTON_MM_TO_KIP_FT,
        QuantityKind::Deflection | QuantityKind::Displacement => MM_TO_INCH,
        QuantityKind::Length => MM_TO_FT,
        QuantityKind::Unrecognized => {
            logger.warn(
                "Units not converted from base units; refer to the analysis application's documentation for default units.",
            );
            1.0
        }
    }
}

/// Convert a position along a span from mm to ft
pub fn mm_to_ft(mm: f64) -> f64 {
    mm * MM_TO_FT
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger};

    #[test]
    fn test_factors() {
        let logger = MemoryLogger::new();
        assert_eq!(factor(QuantityKind::Force, &logger), 0.0002248089);
        assert_eq!(factor(QuantityKind::Moment, &logger), 7.37562121169657e-7);
        assert_eq!(factor(QuantityKind::Deflection, &logger), 0.0393701);
        assert_eq!(factor(QuantityKind::Displacement, &logger), 0.0393701);
        assert_eq!(factor(QuantityKind::Length, &logger), 0.00328084);
        assert!(logger.records().is_empty());
    }

    #[test]
    fn test_unrecognized_kind_warns_and_passes_through() {
        let logger = MemoryLogger::new();
        assert_eq!(factor(QuantityKind::Unrecognized, &logger), 1.0);

        let warnings = logger.at_least(LogLevel::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("not converted"));
    }

    #[test]
    fn test_force_round_trip() {
        let logger = MemoryLogger::new();
        let f = factor(QuantityKind::Force, &logger);
        let back = (1000.0 * f) / f;
        assert!(((back - 1000.0) / 1000.0).abs() < 1e-9);

        let m = factor(QuantityKind::Moment, &logger);
        let back = (2.5e7 * m) / m;
        assert!(((back - 2.5e7) / 2.5e7).abs() < 1e-9);
    }

    #[test]
    fn test_length_conversions() {
        assert!((mm_to_ft(304.8) - 1.0).abs() < 1e-5);
        assert!((25.4 * MM_TO_INCH - 1.0).abs() < 1e-5);
        assert!((mm_to_ft(3048.0) - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_unknown_kind_deserializes() {
        let kind: QuantityKind = serde_json::from_str("\"Stress\"").unwrap();
        assert_eq!(kind, QuantityKind::Unrecognized);
        let kind: QuantityKind = serde_json::from_str("\"Moment\"").unwrap();
        assert_eq!(kind, QuantityKind::Moment);
    }
}
