//! Single-position value sampling.

use crate::channel::Channel;
use crate::errors::ResultsResult;
use crate::logging::Logger;
use crate::provider::LoadingData;
use crate::units::factor;

/// Value of `channel` at an exact position on a span, in display units.
///
/// When the provider reports several values at the position (shared span
/// boundaries), the largest *signed* value is used. No values gives 0.
pub async fn sample(
    loading: &dyn LoadingData,
    channel: Channel,
    reduced: bool,
    span_index: usize,
    position_mm: f64,
    logger: &dyn Logger,
) -> ResultsResult<f64> {
    let values = loading
        .value_at(channel.query(reduced), span_index, position_mm)
        .await?;

    // TODO: confirm whether boundary duplicates should resolve by magnitude instead
    Ok(match values.into_iter().reduce(f64::max) {
        Some(raw) => raw * factor(channel.quantity_kind(), logger),
        None => 0.0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemoryLogger;
    use crate::snapshot::{ResultPoint, SnapshotLoading};
    use crate::units::{MM_TO_INCH, NEWTON_TO_KIP};

    fn loading_with(channel: Channel, points: Vec<ResultPoint>) -> SnapshotLoading {
        SnapshotLoading::default().with_series(channel.query(false), points)
    }

    #[tokio::test]
    async fn test_sample_converts_units() {
        let loading = loading_with(Channel::ShearMajor, vec![ResultPoint::new(0, 500.0, 10_000.0)]);
        let logger = MemoryLogger::new();

        let v = sample(&loading, Channel::ShearMajor, false, 0, 500.0, &logger).await.unwrap();
        assert!((v - 10_000.0 * NEWTON_TO_KIP).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_sample_missing_position_is_zero() {
        let loading = loading_with(Channel::DeflectionMajor, vec![ResultPoint::new(0, 500.0, 3.0)]);
        let logger = MemoryLogger::new();

        let v = sample(&loading, Channel::DeflectionMajor, false, 0, 250.0, &logger).await.unwrap();
        assert_eq!(v, 0.0);

        let v = sample(&loading, Channel::DeflectionMajor, false, 0, 500.0, &logger).await.unwrap();
        assert!((v - 3.0 * MM_TO_INCH).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_sample_duplicates_pick_largest_signed_value() {
        let loading = loading_with(
            Channel::ShearMajor,
            vec![
                ResultPoint::new(0, 1000.0, -8000.0),
                ResultPoint::new(0, 1000.0, 2000.0),
            ],
        );
        let logger = MemoryLogger::new();

        let v = sample(&loading, Channel::ShearMajor, false, 0, 1000.0, &logger).await.unwrap();
        // -8000 has the larger magnitude but 2000 is the larger signed value
        assert!((v - 2000.0 * NEWTON_TO_KIP).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_sample_respects_reduced_flag() {
        let loading = SnapshotLoading::default()
            .with_series(Channel::Axial.query(true), vec![ResultPoint::new(0, 0.0, 100.0)]);
        let logger = MemoryLogger::new();

        let unreduced = sample(&loading, Channel::Axial, false, 0, 0.0, &logger).await.unwrap();
        let reduced = sample(&loading, Channel::Axial, true, 0, 0.0, &logger).await.unwrap();
        assert_eq!(unreduced, 0.0);
        assert!(reduced > 0.0);
    }
}
