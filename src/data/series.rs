//! Rolling sample windows backing the live charts.

use std::collections::VecDeque;

/// Number of live multiplier samples kept for the main chart.
pub const LIVE_SERIES_CAPACITY: usize = 50;

/// Number of recent prediction errors kept for the performance chart.
pub const ERROR_SERIES_CAPACITY: usize = 5;

/// How far ahead of the anchor point the forecast overlay extends.
pub const FORECAST_LOOKAHEAD_MS: u64 = 30_000;

/// A single timestamped observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Unix epoch milliseconds, assigned at ingestion.
    pub at_ms: u64,
    pub value: f64,
}

/// A fixed-capacity sliding window over timestamped samples.
///
/// Appending past capacity evicts the single oldest sample, so the
/// window always holds the most recent `capacity` observations in
/// arrival order. There is no removal API; readers get an ordered
/// snapshot via [`iter`](Self::iter) or [`points`](Self::points).
#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    samples: VecDeque<Sample>,
    capacity: usize,
}

impl SeriesBuffer {
    /// Create an empty window holding at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a sample, evicting the oldest when the window is full.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Number of samples currently held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples the window holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    /// Iterate samples oldest-first.
    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    /// Chart points as `(timestamp_ms, value)` pairs, oldest first.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.samples.iter().map(|s| (s.at_ms as f64, s.value)).collect()
    }
}

/// The two-point forecast overlay: where the multiplier is now and
/// where the service expects it to be 30 seconds out.
///
/// Rebuilt wholesale on every prediction cycle; never accumulated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastSegment {
    pub from: Sample,
    pub to: Sample,
}

impl ForecastSegment {
    /// Build the overlay anchored at `at_ms`.
    pub fn new(at_ms: u64, current: f64, prediction: f64) -> Self {
        Self {
            from: Sample {
                at_ms,
                value: current,
            },
            to: Sample {
                at_ms: at_ms + FORECAST_LOOKAHEAD_MS,
                value: prediction,
            },
        }
    }

    /// Chart points for the overlay dataset.
    pub fn points(&self) -> [(f64, f64); 2] {
        [
            (self.from.at_ms as f64, self.from.value),
            (self.to.at_ms as f64, self.to.value),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(at_ms: u64, value: f64) -> Sample {
        Sample { at_ms, value }
    }

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let mut buffer = SeriesBuffer::new(5);
        for i in 0..3 {
            buffer.push(sample(i * 1000, i as f64));
        }

        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.points(), vec![(0.0, 0.0), (1000.0, 1.0), (2000.0, 2.0)]);
    }

    #[test]
    fn test_push_past_capacity_evicts_oldest() {
        let mut buffer = SeriesBuffer::new(3);
        for i in 0..5 {
            buffer.push(sample(i * 1000, i as f64));
        }

        assert_eq!(buffer.len(), 3);
        let values: Vec<f64> = buffer.iter().map(|s| s.value).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_eviction_is_one_at_a_time() {
        let mut buffer = SeriesBuffer::new(2);
        buffer.push(sample(0, 1.0));
        buffer.push(sample(1, 2.0));
        assert_eq!(buffer.len(), 2);

        buffer.push(sample(2, 3.0));
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.iter().next().unwrap().value, 2.0);
    }

    #[test]
    fn test_latest_returns_newest_sample() {
        let mut buffer = SeriesBuffer::new(3);
        assert!(buffer.latest().is_none());

        buffer.push(sample(0, 1.5));
        buffer.push(sample(1000, 2.5));
        assert_eq!(buffer.latest().unwrap().value, 2.5);
    }

    #[test]
    fn test_points_preserve_arrival_order() {
        let mut buffer = SeriesBuffer::new(10);
        // Timestamps need not be monotonic; arrival order is what counts.
        buffer.push(sample(5000, 1.0));
        buffer.push(sample(3000, 2.0));

        assert_eq!(buffer.points(), vec![(5000.0, 1.0), (3000.0, 2.0)]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = SeriesBuffer::new(5);
        assert!(buffer.is_empty());
        assert!(buffer.points().is_empty());
        assert_eq!(buffer.capacity(), 5);
    }

    #[test]
    fn test_forecast_segment_lookahead() {
        let segment = ForecastSegment::new(1_000_000, 1.42, 2.05);

        assert_eq!(segment.from.at_ms, 1_000_000);
        assert_eq!(segment.from.value, 1.42);
        assert_eq!(segment.to.at_ms, 1_000_000 + FORECAST_LOOKAHEAD_MS);
        assert_eq!(segment.to.value, 2.05);
    }

    #[test]
    fn test_forecast_segment_points() {
        let segment = ForecastSegment::new(0, 1.0, 3.0);
        let points = segment.points();

        assert_eq!(points[0], (0.0, 1.0));
        assert_eq!(points[1], (30_000.0, 3.0));
    }
}
