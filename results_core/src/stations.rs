//! # Station Profiles
//!
//! Samples every channel at evenly spaced stations along a span, both ends
//! included. A profile is a pure function of its inputs; calling again gives
//! the same stations.

use serde::{Deserialize, Serialize};

use crate::channel::{Channel, ChannelMap};
use crate::errors::{ResultsError, ResultsResult};
use crate::logging::Logger;
use crate::model::Span;
use crate::provider::LoadingData;
use crate::sampler::sample;
use crate::units::mm_to_ft;

/// All channel values at one station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationSample {
    /// Distance from the span start in ft
    pub position: f64,
    pub values: ChannelMap<f64>,
}

impl StationSample {
    pub fn value(&self, channel: Channel) -> f64 {
        self.values[channel]
    }
}

/// `count` positions linearly spaced over `[start, end]`, inclusive.
pub fn linear_spaced(count: usize, start: f64, end: f64) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![end],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Profile `span` at `subdivisions` stations.
///
/// Callers skip station sampling when fewer than two stations are wanted;
/// passing `subdivisions < 2` here is an input error.
pub async fn stations(
    loading: &dyn LoadingData,
    span: &Span,
    subdivisions: usize,
    reduced: bool,
    logger: &dyn Logger,
) -> ResultsResult<Vec<StationSample>> {
    if subdivisions < 2 {
        return Err(ResultsError::invalid_input(
            "subdivisions",
            subdivisions.to_string(),
            "Station sampling needs at least two stations",
        ));
    }

    let mut samples = Vec::with_capacity(subdivisions);
    for position_mm in linear_spaced(subdivisions, 0.0, span.length_mm) {
        let mut values = ChannelMap::<f64>::default();
        for channel in Channel::ALL {
            values[channel] = sample(loading, channel, reduced, span.index, position_mm, logger).await?;
        }
        samples.push(StationSample {
            position: mm_to_ft(position_mm),
            values,
        });
    }

    Ok(samples)
}
