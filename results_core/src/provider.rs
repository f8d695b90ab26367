//! # Host Application Boundary
//!
//! The engine consumes pre-solved results from the host structural analysis
//! application through two narrow async traits. Every call can fail and
//! returns [`ResultsResult`]; the engine propagates those errors unchanged
//! and never retries.
//!
//! - [`StructureProvider`] - members, loadings, and per-member loading handles
//! - [`LoadingData`] - point-of-interest and value queries for one
//!   (member, loading, analysis type)
//!
//! [`crate::snapshot::ModelSnapshot`] implements both from a JSON snapshot.
//!
//! [`LimitedLoading`] wraps a handle so that all queries of a run share one
//! in-flight limit, however deeply the caller fans out.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::{Semaphore, SemaphorePermit};
use uuid::Uuid;

use crate::channel::ChannelQuery;
use crate::errors::{ResultsError, ResultsResult};
use crate::model::{AnalysisType, LoadingCase, Member};

/// Which side of a local extreme a point of interest marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PoiKind {
    Maximum,
    Minimum,
}

/// Candidate extreme position reported by the analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub span_index: usize,
    /// Position along the span in mm
    pub position: f64,
}

/// Raw value at a position, in base units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadingValue {
    /// Position along the span in mm
    pub position: f64,
    pub value: f64,
}

/// Result queries for one member under one loading.
#[async_trait]
pub trait LoadingData: Send + Sync {
    /// Candidate extreme positions for a channel
    async fn points_of_interest(&self, query: ChannelQuery, kind: PoiKind) -> ResultsResult<Vec<PointOfInterest>>;

    /// Batched values at `(span_index, position_mm)` pairs
    async fn values_at(&self, query: ChannelQuery, positions: &[(usize, f64)]) -> ResultsResult<Vec<LoadingValue>>;

    /// Every value reported at one exact position.
    ///
    /// Shared boundary positions may legitimately report more than one value.
    async fn value_at(&self, query: ChannelQuery, span_index: usize, position: f64) -> ResultsResult<Vec<f64>>;
}

/// Members, loadings and loading handles of the open model.
#[async_trait]
pub trait StructureProvider: Send + Sync {
    async fn members(&self) -> ResultsResult<Vec<Member>>;

    async fn loading_cases(&self) -> ResultsResult<Vec<LoadingCase>>;

    async fn member_loading(
        &self,
        member_id: Uuid,
        loading_id: Uuid,
        analysis: AnalysisType,
    ) -> ResultsResult<Arc<dyn LoadingData>>;
}

/// Wait for a query slot on `permits`.
pub async fn query_permit<'a>(permits: &'a Semaphore, operation: &str) -> ResultsResult<SemaphorePermit<'a>> {
    permits
        .acquire()
        .await
        .map_err(|_| ResultsError::provider(operation, "query limiter closed"))
}

/// [`LoadingData`] that holds a permit from a shared semaphore for the
/// duration of every call.
pub struct LimitedLoading {
    inner: Arc<dyn LoadingData>,
    permits: Arc<Semaphore>,
}

impl LimitedLoading {
    pub fn new(inner: Arc<dyn LoadingData>, permits: Arc<Semaphore>) -> Self {
        LimitedLoading { inner, permits }
    }
}

#[async_trait]
impl LoadingData for LimitedLoading {
    async fn points_of_interest(&self, query: ChannelQuery, kind: PoiKind) -> ResultsResult<Vec<PointOfInterest>> {
        let _permit = query_permit(&self.permits, "points_of_interest").await?;
        self.inner.points_of_interest(query, kind).await
    }

    async fn values_at(&self, query: ChannelQuery, positions: &[(usize, f64)]) -> ResultsResult<Vec<LoadingValue>> {
        let _permit = query_permit(&self.permits, "values_at").await?;
        self.inner.values_at(query, positions).await
    }

    async fn value_at(&self, query: ChannelQuery, span_index: usize, position: f64) -> ResultsResult<Vec<f64>> {
        let _permit = query_permit(&self.permits, "value_at").await?;
        self.inner.value_at(query, span_index, position).await
    }
}
