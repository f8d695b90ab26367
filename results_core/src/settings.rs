//! # Extraction Settings
//!
//! Everything that tunes an extraction run. All fields have defaults, so a
//! settings file only needs the values it changes:
//!
//! ```rust
//! use results_core::settings::ExtractionSettings;
//!
//! let settings = ExtractionSettings::from_json(r#"{ "subdivisions": 5, "reduced": true }"#).unwrap();
//! assert_eq!(settings.subdivisions, 5);
//! assert_eq!(settings.max_concurrency, 8);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ResultsError, ResultsResult};
use crate::model::{AnalysisType, LoadingCase, LoadingKind, Member, MemberConstruction};

/// What to do per span, derived from the subdivision count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingMode {
    /// No force or displacement data requested
    None,
    /// Span extrema only
    MaximaOnly,
    /// Extrema plus this many evenly spaced stations
    Stations(usize),
}

impl SamplingMode {
    pub fn wants_maxima(&self) -> bool {
        !matches!(self, SamplingMode::None)
    }

    pub fn station_count(&self) -> Option<usize> {
        match self {
            SamplingMode::Stations(n) => Some(*n),
            _ => None,
        }
    }
}

/// Extraction run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    pub analysis_type: AnalysisType,

    /// Query live-load-reduced values
    pub reduced: bool,

    /// 0 = nothing, 1 = maxima only, 2+ = maxima and stations
    pub subdivisions: usize,

    /// Upper bound applied to `subdivisions`
    pub max_subdivisions: usize,

    /// Concurrent provider queries in flight
    pub max_concurrency: usize,

    /// Report lift envelope positions from the lift start instead of the
    /// start of whichever span produced them
    pub offset_lift_positions: bool,

    /// Member kinds to include; empty includes all
    pub member_filter: Vec<MemberConstruction>,

    /// Loading kinds to include; empty includes all
    pub loading_filter: Vec<LoadingKind>,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        ExtractionSettings {
            analysis_type: AnalysisType::FirstOrderLinear,
            reduced: false,
            subdivisions: 1,
            max_subdivisions: 20,
            max_concurrency: 8,
            offset_lift_positions: false,
            member_filter: Vec::new(),
            loading_filter: Vec::new(),
        }
    }
}

impl ExtractionSettings {
    pub fn from_json(json: &str) -> ResultsResult<Self> {
        let settings: ExtractionSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_file(path: &Path) -> ResultsResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ResultsError::file_error("read", path.display().to_string(), e.to_string()))?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> ResultsResult<()> {
        if self.max_concurrency == 0 {
            return Err(ResultsError::invalid_input(
                "max_concurrency",
                "0",
                "At least one query must be allowed in flight",
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(ResultsError::invalid_input(
                "max_subdivisions",
                "0",
                "Maximum subdivisions must be at least 1",
            ));
        }
        Ok(())
    }

    /// Subdivisions clamped to `max_subdivisions`
    pub fn effective_subdivisions(&self) -> usize {
        self.subdivisions.min(self.max_subdivisions)
    }

    pub fn sampling_mode(&self) -> SamplingMode {
        match self.effective_subdivisions() {
            0 => SamplingMode::None,
            1 => SamplingMode::MaximaOnly,
            n => SamplingMode::Stations(n),
        }
    }

    pub fn includes_member(&self, member: &Member) -> bool {
        self.member_filter.is_empty() || self.member_filter.contains(&member.construction)
    }

    /// Solved loadings passing the kind filter
    pub fn includes_loading(&self, loading: &LoadingCase) -> bool {
        loading.solved && (self.loading_filter.is_empty() || self.loading_filter.contains(&loading.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ExtractionSettings::default();
        assert_eq!(settings.analysis_type, AnalysisType::FirstOrderLinear);
        assert_eq!(settings.sampling_mode(), SamplingMode::MaximaOnly);
        assert!(!settings.offset_lift_positions);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_sampling_mode_from_subdivisions() {
        let mut settings = ExtractionSettings::default();
        settings.subdivisions = 0;
        assert_eq!(settings.sampling_mode(), SamplingMode::None);
        assert!(!settings.sampling_mode().wants_maxima());

        settings.subdivisions = 7;
        assert_eq!(settings.sampling_mode(), SamplingMode::Stations(7));
        assert_eq!(settings.sampling_mode().station_count(), Some(7));

        settings.subdivisions = 500;
        assert_eq!(settings.sampling_mode(), SamplingMode::Stations(20));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = ExtractionSettings::from_json(r#"{ "member_filter": ["TimberColumn"] }"#).unwrap();
        assert_eq!(settings.member_filter, vec![MemberConstruction::TimberColumn]);
        assert_eq!(settings.subdivisions, 1);
    }

    #[test]
    fn test_invalid_concurrency_rejected() {
        let err = ExtractionSettings::from_json(r#"{ "max_concurrency": 0 }"#).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_filters() {
        let mut settings = ExtractionSettings::default();
        let column = Member::new("C1", MemberConstruction::TimberColumn);
        let beam = Member::new("B1", MemberConstruction::SteelBeam);
        assert!(settings.includes_member(&beam));

        settings.member_filter = vec![MemberConstruction::TimberColumn];
        assert!(settings.includes_member(&column));
        assert!(!settings.includes_member(&beam));

        let solved = LoadingCase::new("D", LoadingKind::Case);
        let unsolved = LoadingCase::new("L", LoadingKind::Case).unsolved();
        assert!(settings.includes_loading(&solved));
        assert!(!settings.includes_loading(&unsolved));

        settings.loading_filter = vec![LoadingKind::Combination];
        assert!(!settings.includes_loading(&solved));
    }
}
