//! # Extraction Runs
//!
//! Drives the engine over a whole model:
//!
//! 1. Preflight: fetch members and loadings, apply the settings' filters and
//!    fail early when there is nothing to do.
//! 2. Segment every member into lifts (geometry only).
//! 3. For each (member, loading): resolve span envelopes and, when requested,
//!    station profiles; fold span envelopes into one composite per lift.
//!
//! Independent (member, loading) pairs, spans and channels are queried
//! concurrently. Every provider query of a run takes a permit from one shared
//! semaphore, so at most `max_concurrency` queries are in flight in total.
//! Merges into a lift composite are serialized through a mutex.
//!
//! ## Example
//!
//! ```rust
//! use results_core::extraction::{run_extraction, AbortFlag};
//! use results_core::logging::TracingLogger;
//! use results_core::model::{LoadingCase, LoadingKind, Member, MemberConstruction, Span};
//! use results_core::settings::ExtractionSettings;
//! use results_core::snapshot::ModelSnapshot;
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let snapshot = ModelSnapshot::new()
//!     .with_member(Member::new("B1", MemberConstruction::SteelBeam).with_span(Span::new(0, "S1", 6000.0)))
//!     .with_loading(LoadingCase::new("Dead", LoadingKind::Case));
//!
//! let report = run_extraction(&snapshot, &ExtractionSettings::default(), &AbortFlag::new(), &TracingLogger)
//!     .await
//!     .unwrap();
//! assert_eq!(report.span_rows.len(), 1);
//! assert_eq!(report.lift_rows.len(), 1);
//! # });
//! ```

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info};
use uuid::Uuid;

use crate::channel::Channel;
use crate::envelope::{build_span_envelope, CompositeEnvelope, SpanEnvelope};
use crate::errors::{ResultsError, ResultsResult};
use crate::extrema::ExtremaResult;
use crate::lifts::{segment, Lift};
use crate::logging::Logger;
use crate::model::{AnalysisType, LoadingCase, LoadingSummary, Member, Span, SpanReleases};
use crate::provider::{query_permit, LimitedLoading, LoadingData, StructureProvider};
use crate::settings::{ExtractionSettings, SamplingMode};
use crate::stations::{stations, StationSample};

// =============================================================================
// ABORT SIGNAL
// =============================================================================

/// Abort signal set by the command layer.
///
/// Only checked before an extraction starts; work already under way runs to
/// completion.
#[derive(Debug, Clone, Default)]
pub struct AbortFlag(Arc<AtomicBool>);

impl AbortFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// =============================================================================
// PLAN
// =============================================================================

/// Validated inputs of a run: the members and loadings it will cover.
#[derive(Debug, Clone)]
pub struct ExtractionPlan {
    pub members: Vec<Member>,
    pub loadings: Vec<LoadingCase>,
    pub loading_summary: LoadingSummary,
    pub settings: ExtractionSettings,
}

impl ExtractionPlan {
    /// Build a plan from already-selected members and loadings.
    pub fn new(
        members: Vec<Member>,
        loadings: Vec<LoadingCase>,
        loading_summary: LoadingSummary,
        settings: ExtractionSettings,
    ) -> ResultsResult<Self> {
        settings.validate()?;
        if members.is_empty() {
            return Err(ResultsError::precondition("No members selected for extraction"));
        }
        if loadings.is_empty() {
            return Err(ResultsError::precondition("No solved loading selected for extraction"));
        }
        Ok(ExtractionPlan {
            members,
            loadings,
            loading_summary,
            settings,
        })
    }

    /// Query the provider and apply the settings' filters.
    pub async fn prepare(provider: &dyn StructureProvider, settings: &ExtractionSettings) -> ResultsResult<Self> {
        let all_loadings = provider.loading_cases().await?;
        let loading_summary = LoadingSummary::from_loadings(&all_loadings);
        info!(
            "{} loadcases found, {} solved; {} combinations found, {} solved; {} envelopes found, {} solved",
            loading_summary.cases,
            loading_summary.solved_cases,
            loading_summary.combinations,
            loading_summary.solved_combinations,
            loading_summary.envelopes,
            loading_summary.solved_envelopes,
        );

        let all_members = provider.members().await?;
        if all_members.is_empty() {
            return Err(ResultsError::precondition("No structural members found in model"));
        }
        let members: Vec<Member> = all_members
            .iter()
            .filter(|m| settings.includes_member(m))
            .cloned()
            .collect();
        info!("{} structural members found, {} selected", all_members.len(), members.len());

        let loadings: Vec<LoadingCase> = all_loadings
            .into_iter()
            .filter(|l| settings.includes_loading(l))
            .collect();

        Self::new(members, loadings, loading_summary, settings.clone())
    }
}

// =============================================================================
// REPORT ROWS
// =============================================================================

fn fixity_label(releases: Option<&SpanReleases>) -> String {
    match releases {
        Some(r) => r.restrained.to_string(),
        None => "Not Set".to_string(),
    }
}

/// Extrema of one span under one loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpanRow {
    pub member_id: Uuid,
    pub member_name: String,
    pub lift_name: String,
    pub span_name: String,
    pub span_index: usize,
    pub section: Option<String>,
    pub start_fixity: String,
    pub end_fixity: String,
    pub length_ft: f64,
    pub rotation_deg: f64,
    pub loading_name: String,
    pub extrema: BTreeMap<Channel, ExtremaResult>,
}

impl SpanRow {
    fn new(member: &Member, lift: &Lift, span: &Span, loading: &LoadingCase, envelope: &SpanEnvelope) -> Self {
        SpanRow {
            member_id: member.id,
            member_name: member.name.clone(),
            lift_name: lift.display_name(member),
            span_name: span.name.clone(),
            span_index: span.index,
            section: span.section.clone(),
            start_fixity: fixity_label(span.start_releases.as_ref()),
            end_fixity: fixity_label(span.end_releases.as_ref()),
            length_ft: span.length_ft(),
            rotation_deg: span.rotation_deg,
            loading_name: loading.csv_safe_name(),
            extrema: envelope.results.to_map(),
        }
    }
}

/// All channel values at one station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationRow {
    pub member_name: String,
    pub span_name: String,
    pub span_index: usize,
    pub loading_name: String,
    pub position_ft: f64,
    pub values: BTreeMap<Channel, f64>,
}

impl StationRow {
    fn new(member: &Member, span: &Span, loading: &LoadingCase, sample: &StationSample) -> Self {
        StationRow {
            member_name: member.name.clone(),
            span_name: span.name.clone(),
            span_index: span.index,
            loading_name: loading.csv_safe_name(),
            position_ft: sample.position,
            values: sample.values.to_map(),
        }
    }
}

/// Envelope of a whole lift under one loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftRow {
    pub member_id: Uuid,
    pub member_name: String,
    pub lift_name: String,
    pub included_spans: String,
    /// First section assigned along the lift
    pub section: Option<String>,
    pub length_ft: f64,
    pub loading_name: String,
    /// Whether positions are measured from the lift start
    pub lift_relative_positions: bool,
    pub extrema: BTreeMap<Channel, ExtremaResult>,
}

impl LiftRow {
    fn new(member: &Member, lift: &Lift, loading: &LoadingCase, composite: &CompositeEnvelope, offset: bool) -> Self {
        LiftRow {
            member_id: member.id,
            member_name: member.name.clone(),
            lift_name: lift.display_name(member),
            included_spans: lift.included_spans(),
            section: lift.section().map(str::to_string),
            length_ft: lift.length_ft(),
            loading_name: loading.csv_safe_name(),
            lift_relative_positions: offset,
            extrema: composite.results().to_map(),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub generated_at: DateTime<Utc>,
    pub analysis_type: AnalysisType,
    pub reduced: bool,
    pub loading_summary: LoadingSummary,
    pub span_rows: Vec<SpanRow>,
    pub station_rows: Vec<StationRow>,
    pub lift_rows: Vec<LiftRow>,
    pub elapsed_seconds: f64,
}

#[derive(Debug, Default)]
struct PairOutput {
    span_rows: Vec<SpanRow>,
    station_rows: Vec<StationRow>,
    lift_rows: Vec<LiftRow>,
}

// =============================================================================
// RUN
// =============================================================================

/// Run a full extraction against `provider`.
pub async fn run_extraction(
    provider: &dyn StructureProvider,
    settings: &ExtractionSettings,
    abort: &AbortFlag,
    logger: &dyn Logger,
) -> ResultsResult<ExtractionReport> {
    if abort.is_aborted() {
        return Err(ResultsError::Aborted);
    }

    let started = Instant::now();
    let plan = ExtractionPlan::prepare(provider, settings).await?;
    let mode = settings.sampling_mode();

    let mut report = ExtractionReport {
        generated_at: Utc::now(),
        analysis_type: settings.analysis_type,
        reduced: settings.reduced,
        loading_summary: plan.loading_summary,
        span_rows: Vec::new(),
        station_rows: Vec::new(),
        lift_rows: Vec::new(),
        elapsed_seconds: 0.0,
    };

    if !mode.wants_maxima() {
        info!("No force or displacement data requested");
        report.elapsed_seconds = started.elapsed().as_secs_f64();
        return Ok(report);
    }

    let segmented: Vec<(&Member, Vec<Lift>)> = plan.members.iter().map(|m| (m, segment(m))).collect();
    info!(
        "{} members organized into {} lifts",
        segmented.len(),
        segmented.iter().map(|(_, lifts)| lifts.len()).sum::<usize>()
    );

    let pairs = segmented
        .iter()
        .flat_map(|(member, lifts)| plan.loadings.iter().map(move |loading| (*member, lifts.as_slice(), loading)));

    let run = RunContext {
        provider,
        permits: Arc::new(Semaphore::new(settings.max_concurrency)),
        settings,
        mode,
        logger,
    };
    let outputs: Vec<PairOutput> = stream::iter(pairs)
        .map(|(member, lifts, loading)| extract_pair(&run, member, lifts, loading))
        .buffered(settings.max_concurrency)
        .try_collect()
        .await?;

    for output in outputs {
        report.span_rows.extend(output.span_rows);
        report.station_rows.extend(output.station_rows);
        report.lift_rows.extend(output.lift_rows);
    }

    report.elapsed_seconds = started.elapsed().as_secs_f64();
    info!(
        "{} span rows, {} station rows, {} lift rows in {:.3} s",
        report.span_rows.len(),
        report.station_rows.len(),
        report.lift_rows.len(),
        report.elapsed_seconds
    );
    Ok(report)
}

/// Inputs shared by every (member, loading) pair of a run
struct RunContext<'a> {
    provider: &'a dyn StructureProvider,
    /// One slot per provider query in flight
    permits: Arc<Semaphore>,
    settings: &'a ExtractionSettings,
    mode: SamplingMode,
    logger: &'a dyn Logger,
}

/// One member under one loading.
async fn extract_pair(
    run: &RunContext<'_>,
    member: &Member,
    lifts: &[Lift],
    loading: &LoadingCase,
) -> ResultsResult<PairOutput> {
    let RunContext {
        provider,
        settings,
        mode,
        logger,
        ..
    } = *run;
    let data = {
        let _permit = query_permit(&run.permits, "member_loading").await?;
        provider
            .member_loading(member.id, loading.id, settings.analysis_type)
            .await?
    };
    let data = LimitedLoading::new(data, run.permits.clone());
    let data: &dyn LoadingData = &data;

    let mut output = PairOutput::default();
    for lift in lifts {
        let composite = Mutex::new(CompositeEnvelope::new());
        let offsets = lift.span_offsets_ft();

        let mut spans: Vec<(&Span, SpanEnvelope, Vec<StationSample>)> = stream::iter(lift.spans.iter().zip(offsets))
            .map(|(span, offset)| {
                let composite = &composite;
                async move {
                    let envelope =
                        build_span_envelope(data, span, settings.reduced, settings.max_concurrency, logger).await?;
                    let samples = match mode.station_count() {
                        Some(count) => stations(data, span, count, settings.reduced, logger).await?,
                        None => Vec::new(),
                    };

                    let mut guard = composite.lock().await;
                    if settings.offset_lift_positions {
                        guard.merge_offset(&envelope, offset);
                    } else {
                        guard.merge(&envelope);
                    }
                    drop(guard);

                    debug!("{}, {}, {}, {}", member.name, lift.name, loading.name, span.name);
                    Ok::<_, ResultsError>((span, envelope, samples))
                }
            })
            .buffer_unordered(settings.max_concurrency)
            .try_collect()
            .await?;
        spans.sort_by_key(|(span, _, _)| span.index);

        for (span, envelope, samples) in &spans {
            output.span_rows.push(SpanRow::new(member, lift, span, loading, envelope));
            output
                .station_rows
                .extend(samples.iter().map(|s| StationRow::new(member, span, loading, s)));
        }

        let composite = composite.into_inner();
        output.lift_rows.push(LiftRow::new(
            member,
            lift,
            loading,
            &composite,
            settings.offset_lift_positions,
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::channel::ChannelQuery;
    use crate::logging::MemoryLogger;
    use crate::model::{LoadingKind, MemberConstruction};
    use crate::provider::{LoadingValue, PoiKind, PointOfInterest};
    use crate::snapshot::{ModelSnapshot, ResultPoint, SnapshotLoading};
    use crate::units::{MM_TO_FT, NEWTON_TO_KIP};

    /// Host stub that tracks in-flight POI queries; one query can be made to fail.
    #[derive(Default)]
    struct CountingLoading {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        calls: AtomicUsize,
        fail_on: Option<ChannelQuery>,
        failed_calls: AtomicUsize,
    }

    #[async_trait]
    impl LoadingData for CountingLoading {
        async fn points_of_interest(&self, query: ChannelQuery, kind: PoiKind) -> ResultsResult<Vec<PointOfInterest>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.fail_on == Some(query) && kind == PoiKind::Maximum {
                self.failed_calls.fetch_add(1, Ordering::SeqCst);
                return Err(ResultsError::provider("points_of_interest", "result set unavailable"));
            }
            Ok(Vec::new())
        }

        async fn values_at(&self, _query: ChannelQuery, _positions: &[(usize, f64)]) -> ResultsResult<Vec<LoadingValue>> {
            Ok(Vec::new())
        }

        async fn value_at(&self, _query: ChannelQuery, _span_index: usize, _position: f64) -> ResultsResult<Vec<f64>> {
            Ok(Vec::new())
        }
    }

    struct CountingProvider {
        members: Vec<Member>,
        loadings: Vec<LoadingCase>,
        data: Arc<CountingLoading>,
    }

    impl CountingProvider {
        fn new(span_count: usize, loading_count: usize, data: CountingLoading) -> Self {
            let member = (0..span_count).fold(Member::new("C1", MemberConstruction::SteelColumn), |m, i| {
                m.with_span(Span::new(i, format!("S{}", i + 1), 3000.0))
            });
            CountingProvider {
                members: vec![member],
                loadings: (0..loading_count)
                    .map(|i| LoadingCase::new(format!("LC{}", i + 1), LoadingKind::Case))
                    .collect(),
                data: Arc::new(data),
            }
        }
    }

    #[async_trait]
    impl StructureProvider for CountingProvider {
        async fn members(&self) -> ResultsResult<Vec<Member>> {
            Ok(self.members.clone())
        }

        async fn loading_cases(&self) -> ResultsResult<Vec<LoadingCase>> {
            Ok(self.loadings.clone())
        }

        async fn member_loading(
            &self,
            _member_id: Uuid,
            _loading_id: Uuid,
            _analysis: AnalysisType,
        ) -> ResultsResult<Arc<dyn LoadingData>> {
            let data: Arc<dyn LoadingData> = self.data.clone();
            Ok(data)
        }
    }

    fn two_span_column() -> (ModelSnapshot, Uuid, Uuid) {
        let member = Member::new("C1", MemberConstruction::TimberColumn)
            .with_span(
                Span::new(0, "S1", 3000.0)
                    .with_rotation(90.0)
                    .with_start_releases(SpanReleases::pinned())
                    .with_end_releases(SpanReleases::fixed()),
            )
            .with_span(
                Span::new(1, "S2", 2000.0)
                    .with_section("W10x33")
                    .with_start_releases(SpanReleases::fixed())
                    .with_end_releases(SpanReleases::pinned()),
            );
        let loading = LoadingCase::new("Dead", LoadingKind::Case);
        let (member_id, loading_id) = (member.id, loading.id);

        let results = SnapshotLoading::default().with_series(
            Channel::Axial.query(false),
            vec![
                ResultPoint::new(0, 0.0, -10_000.0).minimum(),
                ResultPoint::new(1, 1000.0, -25_000.0).minimum(),
                ResultPoint::new(1, 1000.0, 5_000.0).maximum(),
            ],
        );

        let snapshot = ModelSnapshot::new()
            .with_member(member)
            .with_loading(loading)
            .with_loading(LoadingCase::new("Live", LoadingKind::Case).unsolved())
            .with_results(member_id, loading_id, results);
        (snapshot, member_id, loading_id)
    }

    #[test]
    fn test_abort_flag() {
        let flag = AbortFlag::new();
        let shared = flag.clone();
        assert!(!flag.is_aborted());
        shared.abort();
        assert!(flag.is_aborted());
    }

    #[test]
    fn test_plan_preconditions() {
        let settings = ExtractionSettings::default();
        let member = Member::new("B1", MemberConstruction::SteelBeam);
        let loading = LoadingCase::new("D", LoadingKind::Case);

        let err = ExtractionPlan::new(vec![], vec![loading.clone()], LoadingSummary::default(), settings.clone())
            .unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");

        let err = ExtractionPlan::new(vec![member.clone()], vec![], LoadingSummary::default(), settings.clone())
            .unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");

        assert!(ExtractionPlan::new(vec![member], vec![loading], LoadingSummary::default(), settings).is_ok());
    }

    #[tokio::test]
    async fn test_aborted_before_start() {
        let (snapshot, _, _) = two_span_column();
        let abort = AbortFlag::new();
        abort.abort();

        let err = run_extraction(&snapshot, &ExtractionSettings::default(), &abort, &MemoryLogger::new())
            .await
            .unwrap_err();
        assert_eq!(err, ResultsError::Aborted);
    }

    #[tokio::test]
    async fn test_empty_model_fails_preflight() {
        let snapshot = ModelSnapshot::new().with_loading(LoadingCase::new("D", LoadingKind::Case));
        let err = run_extraction(&snapshot, &ExtractionSettings::default(), &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");
    }

    #[tokio::test]
    async fn test_lift_envelope_and_rows() {
        let (snapshot, _, _) = two_span_column();
        let report = run_extraction(&snapshot, &ExtractionSettings::default(), &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap();

        // Only the solved loading participates
        assert_eq!(report.loading_summary.cases, 2);
        assert_eq!(report.span_rows.len(), 2);
        assert!(report.station_rows.is_empty());
        assert_eq!(report.lift_rows.len(), 1);

        let lift = &report.lift_rows[0];
        assert_eq!(lift.lift_name, "C1-L1");
        assert_eq!(lift.included_spans, "(2): S1; S2");

        let axial = &lift.extrema[&Channel::Axial];
        assert!((axial.min_value + 25_000.0 * NEWTON_TO_KIP).abs() < 1e-12);
        assert!((axial.max_value - 5_000.0 * NEWTON_TO_KIP).abs() < 1e-12);
        assert_eq!(axial.governing_value, axial.min_value);
        // Span-local position
        assert!((axial.governing_position - 1000.0 * MM_TO_FT).abs() < 1e-12);

        assert_eq!(report.span_rows[0].span_name, "S1");
        assert_eq!(report.span_rows[0].start_fixity, "Fx Fy Fz");
        assert_eq!(report.span_rows[0].rotation_deg, 90.0);
        assert_eq!(report.span_rows[0].section, None);
        assert_eq!(report.span_rows[1].section.as_deref(), Some("W10x33"));
        assert_eq!(report.span_rows[1].lift_name, "C1-L1");
        assert_eq!(lift.section.as_deref(), Some("W10x33"));
    }

    #[tokio::test]
    async fn test_offset_lift_positions() {
        let (snapshot, _, _) = two_span_column();
        let settings = ExtractionSettings {
            offset_lift_positions: true,
            ..Default::default()
        };
        let report = run_extraction(&snapshot, &settings, &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap();

        let axial = &report.lift_rows[0].extrema[&Channel::Axial];
        assert!(report.lift_rows[0].lift_relative_positions);
        assert!((axial.governing_position - 4000.0 * MM_TO_FT).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stations_requested() {
        let (snapshot, _, _) = two_span_column();
        let settings = ExtractionSettings {
            subdivisions: 3,
            ..Default::default()
        };
        let report = run_extraction(&snapshot, &settings, &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap();

        assert_eq!(report.station_rows.len(), 6);
        let mid_s2 = report
            .station_rows
            .iter()
            .find(|r| r.span_index == 1 && (r.position_ft - 1000.0 * MM_TO_FT).abs() < 1e-9)
            .unwrap();
        // Largest signed of the two values reported at 1000 mm
        assert!((mid_s2.values[&Channel::Axial] - 5_000.0 * NEWTON_TO_KIP).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_no_force_data_requested() {
        let (snapshot, _, _) = two_span_column();
        let settings = ExtractionSettings {
            subdivisions: 0,
            ..Default::default()
        };
        let report = run_extraction(&snapshot, &settings, &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap();
        assert!(report.span_rows.is_empty());
        assert!(report.lift_rows.is_empty());
    }

    #[tokio::test]
    async fn test_member_filter() {
        let (snapshot, _, _) = two_span_column();
        let settings = ExtractionSettings {
            member_filter: vec![MemberConstruction::SteelBeam],
            ..Default::default()
        };
        let err = run_extraction(&snapshot, &settings, &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "PRECONDITION_FAILED");
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_queries_share_one_limit() {
        let provider = CountingProvider::new(4, 4, CountingLoading::default());
        let settings = ExtractionSettings {
            max_concurrency: 2,
            ..Default::default()
        };

        let report = run_extraction(&provider, &settings, &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap();

        assert_eq!(report.span_rows.len(), 16);
        // 4 spans x 4 loadings x 10 channels x (max + min)
        assert_eq!(provider.data.calls.load(Ordering::SeqCst), 320);
        assert_eq!(provider.data.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_error_propagates_without_retry() {
        let data = CountingLoading {
            fail_on: Some(Channel::MomentMajor.query(false)),
            ..Default::default()
        };
        let provider = CountingProvider::new(1, 1, data);

        let err = run_extraction(&provider, &ExtractionSettings::default(), &AbortFlag::new(), &MemoryLogger::new())
            .await
            .unwrap_err();

        assert_eq!(err, ResultsError::provider("points_of_interest", "result set unavailable"));
        assert!(err.is_recoverable());
        assert_eq!(provider.data.failed_calls.load(Ordering::SeqCst), 1);
    }
}
