//! # Envelopes
//!
//! [`SpanEnvelope`] holds the ten channel extrema of one span under one
//! loading. [`CompositeEnvelope`] folds any number of them together, e.g.
//! every span of a lift.
//!
//! Merging is a pointwise max/min per channel, so it is associative and
//! commutative and partial envelopes can be combined in any order.
//!
//! Positions are kept local to the span that produced them unless merged
//! with [`CompositeEnvelope::merge_offset`].
//!
//! ## Example
//!
//! ```rust
//! use results_core::channel::Channel;
//! use results_core::envelope::{CompositeEnvelope, SpanEnvelope};
//! use results_core::extrema::ExtremaResult;
//!
//! let mut a = SpanEnvelope::default();
//! a.results[Channel::MomentMajor] = ExtremaResult::new(500.0, 5.0, 0.0, 0.0);
//! let mut b = SpanEnvelope::default();
//! b.results[Channel::MomentMajor] = ExtremaResult::new(0.0, 0.0, -300.0, 4.0);
//!
//! let mut lift = CompositeEnvelope::new();
//! lift.merge(&a);
//! lift.merge(&b);
//!
//! let m = lift.get(Channel::MomentMajor);
//! assert_eq!((m.max_value, m.min_value, m.governing_value), (500.0, -300.0, 500.0));
//! ```

use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelMap};
use crate::errors::{ResultsError, ResultsResult};
use crate::extrema::{resolve, ExtremaResult};
use crate::logging::Logger;
use crate::model::Span;
use crate::provider::LoadingData;

/// Channel extrema for one (span, loading) pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SpanEnvelope {
    pub results: ChannelMap<ExtremaResult>,
}

impl SpanEnvelope {
    pub fn get(&self, channel: Channel) -> &ExtremaResult {
        &self.results[channel]
    }
}

/// Resolve all ten channels of `span`.
///
/// Channel queries are independent and run concurrently, at most
/// `max_concurrency` channels at a time. Wrap `loading` in
/// [`LimitedLoading`](crate::provider::LimitedLoading) to bound queries
/// across several concurrent callers.
pub async fn build_span_envelope(
    loading: &dyn LoadingData,
    span: &Span,
    reduced: bool,
    max_concurrency: usize,
    logger: &dyn Logger,
) -> ResultsResult<SpanEnvelope> {
    let resolved: Vec<(Channel, ExtremaResult)> = stream::iter(Channel::ALL)
        .map(|channel| async move {
            let result = resolve(loading, span, channel, reduced, logger).await?;
            Ok::<_, ResultsError>((channel, result))
        })
        .buffer_unordered(max_concurrency.max(1))
        .try_collect()
        .await?;

    let mut envelope = SpanEnvelope::default();
    for (channel, result) in resolved {
        envelope.results[channel] = result;
    }
    Ok(envelope)
}

/// Running envelope across several span envelopes.
///
/// Only changed through [`merge`](Self::merge) /
/// [`merge_offset`](Self::merge_offset).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompositeEnvelope {
    results: ChannelMap<ExtremaResult>,
    merged: usize,
}

impl CompositeEnvelope {
    /// All-zero envelope
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, candidate: &SpanEnvelope) {
        self.merge_offset(candidate, 0.0);
    }

    /// Merge with the candidate's positions shifted by `offset_ft`, giving
    /// positions relative to the start of a multi-span lift.
    pub fn merge_offset(&mut self, candidate: &SpanEnvelope, offset_ft: f64) {
        for channel in Channel::ALL {
            self.results[channel].merge_offset(&candidate.results[channel], offset_ft);
        }
        self.merged += 1;
    }

    /// Fold another composite into this one
    pub fn absorb(&mut self, other: &CompositeEnvelope) {
        for channel in Channel::ALL {
            self.results[channel].merge(&other.results[channel]);
        }
        self.merged += other.merged;
    }

    pub fn get(&self, channel: Channel) -> &ExtremaResult {
        &self.results[channel]
    }

    pub fn results(&self) -> &ChannelMap<ExtremaResult> {
        &self.results
    }

    /// Number of span envelopes folded in
    pub fn merged_count(&self) -> usize {
        self.merged
    }
}

impl<'a> FromIterator<&'a SpanEnvelope> for CompositeEnvelope {
    fn from_iter<I: IntoIterator<Item = &'a SpanEnvelope>>(iter: I) -> Self {
        let mut composite = CompositeEnvelope::new();
        for envelope in iter {
            composite.merge(envelope);
        }
        composite
    }
}
