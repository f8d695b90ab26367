//! # Span Extrema
//!
//! Resolves the governing signed extreme of one response channel on one span
//! from the candidate extreme positions (points of interest) the analysis
//! reports.
//!
//! The governing value is whichever of max/min has the larger magnitude.
//! Ties go to the max:
//!
//! ```rust
//! use results_core::extrema::ExtremaResult;
//!
//! let tie = ExtremaResult::new(5.0, 1.0, -5.0, 2.0);
//! assert_eq!(tie.governing_value, 5.0);
//!
//! let min_governs = ExtremaResult::new(5.0, 1.0, -9.0, 2.0);
//! assert_eq!(min_governs.governing_value, -9.0);
//! assert_eq!(min_governs.governing_position, 2.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::channel::Channel;
use crate::errors::ResultsResult;
use crate::logging::Logger;
use crate::model::Span;
use crate::provider::{LoadingData, PoiKind};
use crate::units::{factor, mm_to_ft};

/// Signed extremes of one channel and where they occur.
///
/// Values are in display units, positions in feet from the start of the span.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtremaResult {
    pub max_value: f64,
    pub max_position: f64,
    pub min_value: f64,
    pub min_position: f64,
    pub governing_value: f64,
    pub governing_position: f64,
}

impl ExtremaResult {
    pub fn new(max_value: f64, max_position: f64, min_value: f64, min_position: f64) -> Self {
        let mut result = ExtremaResult {
            max_value,
            max_position,
            min_value,
            min_position,
            governing_value: 0.0,
            governing_position: 0.0,
        };
        result.update_governing();
        result
    }

    /// All-zero result, the identity for [`ExtremaResult::merge`]
    pub fn zero() -> Self {
        ExtremaResult::default()
    }

    fn update_governing(&mut self) {
        if self.min_value.abs() > self.max_value.abs() {
            self.governing_value = self.min_value;
            self.governing_position = self.min_position;
        } else {
            self.governing_value = self.max_value;
            self.governing_position = self.max_position;
        }
    }

    /// Envelope `other` into `self`.
    ///
    /// Positions move only on a strict improvement, so the first producer of
    /// an extreme keeps it.
    pub fn merge(&mut self, other: &ExtremaResult) {
        self.merge_offset(other, 0.0);
    }

    /// Like [`merge`](Self::merge), with `offset` added to `other`'s positions.
    pub fn merge_offset(&mut self, other: &ExtremaResult, offset: f64) {
        if other.max_value > self.max_value {
            self.max_value = other.max_value;
            self.max_position = other.max_position + offset;
        }
        if other.min_value < self.min_value {
            self.min_value = other.min_value;
            self.min_position = other.min_position + offset;
        }
        self.update_governing();
    }
}

/// Resolve the extremes of `channel` on `span`.
///
/// Maximum and minimum points of interest are gathered, restricted to this
/// span, and their values fetched in one batch. After a descending sort the
/// first value is the max and the last the min. A span with no points of
/// interest yields [`ExtremaResult::zero`].
pub async fn resolve(
    loading: &dyn LoadingData,
    span: &Span,
    channel: Channel,
    reduced: bool,
    logger: &dyn Logger,
) -> ResultsResult<ExtremaResult> {
    let query = channel.query(reduced);

    let mut points = loading.points_of_interest(query, PoiKind::Maximum).await?;
    points.extend(loading.points_of_interest(query, PoiKind::Minimum).await?);

    let positions: Vec<(usize, f64)> = points
        .into_iter()
        .filter(|p| p.span_index == span.index)
        .map(|p| (span.index, p.position))
        .collect();

    if positions.is_empty() {
        return Ok(ExtremaResult::zero());
    }

    let mut values = loading.values_at(query, &positions).await?;
    values.sort_by(|a, b| b.value.total_cmp(&a.value));

    let (first, last) = match (values.first(), values.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Ok(ExtremaResult::zero()),
    };

    let value_factor = factor(channel.quantity_kind(), logger);
    Ok(ExtremaResult::new(
        first.value * value_factor,
        mm_to_ft(first.position),
        last.value * value_factor,
        mm_to_ft(last.position),
    ))
}
