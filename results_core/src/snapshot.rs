//! # Model Snapshots
//!
//! An in-memory stand-in for the host analysis application, loaded from or
//! saved to JSON. It implements [`StructureProvider`] and [`LoadingData`], so
//! the engine runs against a snapshot exactly as it would against the live
//! application. The CLI and the test suites both use it.
//!
//! ## File Format
//!
//! ```text
//! ModelSnapshot
//! ├── version: "0.1.0"
//! ├── members: [Member]
//! ├── loading_cases: [LoadingCase]
//! └── results: [MemberResults]
//!     ├── member_id, loading_id, analysis
//!     └── loading.series: [ { query, points: [ResultPoint] } ]
//! ```
//!
//! A [`ResultPoint`] carries its span index, position (mm), raw value in base
//! units, and optionally the point-of-interest kind it was reported as.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::channel::ChannelQuery;
use crate::errors::{ResultsError, ResultsResult};
use crate::model::{AnalysisType, LoadingCase, Member};
use crate::provider::{LoadingData, LoadingValue, PoiKind, PointOfInterest, StructureProvider};

/// Current schema version for snapshot files
pub const SNAPSHOT_VERSION: &str = "0.1.0";

/// Positions closer than this (mm) are the same position
pub const POSITION_TOLERANCE_MM: f64 = 1e-6;

/// One reported value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResultPoint {
    pub span_index: usize,
    /// Position along the span in mm
    pub position: f64,
    /// Raw value in base units
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poi: Option<PoiKind>,
}

impl ResultPoint {
    pub fn new(span_index: usize, position: f64, value: f64) -> Self {
        ResultPoint {
            span_index,
            position,
            value,
            poi: None,
        }
    }

    /// Tag as a local maximum
    pub fn maximum(mut self) -> Self {
        self.poi = Some(PoiKind::Maximum);
        self
    }

    /// Tag as a local minimum
    pub fn minimum(mut self) -> Self {
        self.poi = Some(PoiKind::Minimum);
        self
    }

    fn is_at(&self, span_index: usize, position: f64) -> bool {
        self.span_index == span_index && (self.position - position).abs() <= POSITION_TOLERANCE_MM
    }
}

/// All points reported for one channel query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSeries {
    pub query: ChannelQuery,
    pub points: Vec<ResultPoint>,
}

/// Results of one member under one loading.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SnapshotLoading {
    #[serde(default)]
    pub series: Vec<ResultSeries>,
}

impl SnapshotLoading {
    /// Add points for `query`, appending to an existing series
    pub fn with_series(mut self, query: ChannelQuery, points: Vec<ResultPoint>) -> Self {
        match self.series.iter_mut().find(|s| s.query == query) {
            Some(existing) => existing.points.extend(points),
            None => self.series.push(ResultSeries { query, points }),
        }
        self
    }

    fn points(&self, query: ChannelQuery) -> impl Iterator<Item = &ResultPoint> {
        self.series
            .iter()
            .filter(move |s| s.query == query)
            .flat_map(|s| s.points.iter())
    }
}

#[async_trait]
impl LoadingData for SnapshotLoading {
    async fn points_of_interest(&self, query: ChannelQuery, kind: PoiKind) -> ResultsResult<Vec<PointOfInterest>> {
        Ok(self
            .points(query)
            .filter(|p| p.poi == Some(kind))
            .map(|p| PointOfInterest {
                span_index: p.span_index,
                position: p.position,
            })
            .collect())
    }

    async fn values_at(&self, query: ChannelQuery, positions: &[(usize, f64)]) -> ResultsResult<Vec<LoadingValue>> {
        let mut values = Vec::with_capacity(positions.len());
        for &(span_index, position) in positions {
            values.extend(
                self.points(query)
                    .filter(|p| p.is_at(span_index, position))
                    .map(|p| LoadingValue {
                        position: p.position,
                        value: p.value,
                    }),
            );
        }
        Ok(values)
    }

    async fn value_at(&self, query: ChannelQuery, span_index: usize, position: f64) -> ResultsResult<Vec<f64>> {
        Ok(self
            .points(query)
            .filter(|p| p.is_at(span_index, position))
            .map(|p| p.value)
            .collect())
    }
}

/// Results keyed by (member, loading, analysis type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberResults {
    pub member_id: Uuid,
    pub loading_id: Uuid,
    #[serde(default)]
    pub analysis: AnalysisType,
    pub loading: SnapshotLoading,
}

/// A complete model snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSnapshot {
    pub version: String,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub loading_cases: Vec<LoadingCase>,
    #[serde(default)]
    pub results: Vec<MemberResults>,
}

impl Default for ModelSnapshot {
    fn default() -> Self {
        ModelSnapshot {
            version: SNAPSHOT_VERSION.to_string(),
            members: Vec::new(),
            loading_cases: Vec::new(),
            results: Vec::new(),
        }
    }
}

impl ModelSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_loading(mut self, loading: LoadingCase) -> Self {
        self.loading_cases.push(loading);
        self
    }

    /// Attach first-order linear results
    pub fn with_results(self, member_id: Uuid, loading_id: Uuid, loading: SnapshotLoading) -> Self {
        self.with_analysis_results(member_id, loading_id, AnalysisType::FirstOrderLinear, loading)
    }

    pub fn with_analysis_results(
        mut self,
        member_id: Uuid,
        loading_id: Uuid,
        analysis: AnalysisType,
        loading: SnapshotLoading,
    ) -> Self {
        self.results.push(MemberResults {
            member_id,
            loading_id,
            analysis,
            loading,
        });
        self
    }

    pub fn from_json(json: &str) -> ResultsResult<Self> {
        let snapshot: ModelSnapshot = serde_json::from_str(json)?;
        validate_version(&snapshot.version)?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> ResultsResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json_file(path: &Path) -> ResultsResult<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| ResultsError::file_error("read", path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents).map_err(|e| match e {
            ResultsError::SerializationError { reason } => ResultsError::SerializationError {
                reason: format!("Invalid JSON in {}: {}", path.display(), reason),
            },
            other => other,
        })
    }

    pub fn save_json_file(&self, path: &Path) -> ResultsResult<()> {
        let json = self.to_json()?;
        fs::write(path, json)
            .map_err(|e| ResultsError::file_error("write", path.display().to_string(), e.to_string()))
    }
}

/// Major version must match; for 0.x the file's minor may not be newer.
fn validate_version(file_version: &str) -> ResultsResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file_parts = parse(file_version);
    let current_parts = parse(SNAPSHOT_VERSION);

    let mismatch = || ResultsError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SNAPSHOT_VERSION.to_string(),
    };

    if file_parts.is_empty() || file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0 && file_parts.len() > 1 && file_parts[1] > current_parts[1] {
        return Err(mismatch());
    }
    Ok(())
}

#[async_trait]
impl StructureProvider for ModelSnapshot {
    async fn members(&self) -> ResultsResult<Vec<Member>> {
        Ok(self.members.clone())
    }

    async fn loading_cases(&self) -> ResultsResult<Vec<LoadingCase>> {
        Ok(self.loading_cases.clone())
    }

    async fn member_loading(
        &self,
        member_id: Uuid,
        loading_id: Uuid,
        analysis: AnalysisType,
    ) -> ResultsResult<Arc<dyn LoadingData>> {
        if !self.members.iter().any(|m| m.id == member_id) {
            return Err(ResultsError::member_not_found(member_id.to_string()));
        }
        if !self.loading_cases.iter().any(|l| l.id == loading_id) {
            return Err(ResultsError::provider(
                "member_loading",
                format!("unknown loading {}", loading_id),
            ));
        }

        // A solved loading without stored points simply reports nothing
        let loading = self
            .results
            .iter()
            .find(|r| r.member_id == member_id && r.loading_id == loading_id && r.analysis == analysis)
            .map(|r| r.loading.clone())
            .unwrap_or_default();

        Ok(Arc::new(loading))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Channel;
    use crate::model::{LoadingKind, MemberConstruction, Span};

    fn sample_snapshot() -> (ModelSnapshot, Uuid, Uuid) {
        let member = Member::new("B1", MemberConstruction::SteelBeam).with_span(Span::new(0, "S1", 6000.0));
        let loading = LoadingCase::new("Dead", LoadingKind::Case);
        let (member_id, loading_id) = (member.id, loading.id);
        let results = SnapshotLoading::default().with_series(
            Channel::MomentMajor.query(false),
            vec![ResultPoint::new(0, 3000.0, 1.0e7).maximum()],
        );
        let snapshot = ModelSnapshot::new()
            .with_member(member)
            .with_loading(loading)
            .with_results(member_id, loading_id, results);
        (snapshot, member_id, loading_id)
    }

    #[test]
    fn test_json_roundtrip() {
        let (snapshot, _, _) = sample_snapshot();
        let json = snapshot.to_json().unwrap();
        let roundtrip = ModelSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot, roundtrip);
    }

    #[test]
    fn test_version_validation() {
        assert!(validate_version("0.1.0").is_ok());
        assert!(validate_version("0.0.9").is_ok());
        assert!(validate_version("0.2.0").is_err());
        assert!(validate_version("1.0.0").is_err());
        assert!(validate_version("garbage").is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let (snapshot, _, _) = sample_snapshot();
        let path = std::env::temp_dir().join(format!("snapshot-{}.json", Uuid::new_v4()));
        snapshot.save_json_file(&path).unwrap();
        let loaded = ModelSnapshot::from_json_file(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn test_missing_file_is_file_error() {
        let err = ModelSnapshot::from_json_file(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[tokio::test]
    async fn test_member_loading_lookup() {
        let (snapshot, member_id, loading_id) = sample_snapshot();
        let query = Channel::MomentMajor.query(false);

        let loading = snapshot
            .member_loading(member_id, loading_id, AnalysisType::FirstOrderLinear)
            .await
            .unwrap();
        let pois = loading.points_of_interest(query, PoiKind::Maximum).await.unwrap();
        assert_eq!(pois.len(), 1);

        // Other analysis types have no stored points
        let second_order = snapshot
            .member_loading(member_id, loading_id, AnalysisType::SecondOrderLinear)
            .await
            .unwrap();
        assert!(second_order.points_of_interest(query, PoiKind::Maximum).await.unwrap().is_empty());

        let err = snapshot
            .member_loading(Uuid::new_v4(), loading_id, AnalysisType::FirstOrderLinear)
            .await
            .err()
            .unwrap();
        assert_eq!(err.error_code(), "MEMBER_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_value_queries_use_tolerance() {
        let query = Channel::Axial.query(false);
        let loading = SnapshotLoading::default().with_series(
            query,
            vec![ResultPoint::new(0, 100.0, 1.0), ResultPoint::new(0, 100.0, 2.0), ResultPoint::new(1, 100.0, 3.0)],
        );

        assert_eq!(loading.value_at(query, 0, 100.0 + 1e-9).await.unwrap(), vec![1.0, 2.0]);
        assert!(loading.value_at(query, 0, 100.1).await.unwrap().is_empty());

        let batched = loading.values_at(query, &[(1, 100.0), (0, 100.0)]).await.unwrap();
        let values: Vec<f64> = batched.iter().map(|v| v.value).collect();
        assert_eq!(values, vec![3.0, 1.0, 2.0]);
    }
}
