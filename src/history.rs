//! Rolling history buffers and graph scaling
//!
//! Each graphed metric keeps a fixed-capacity FIFO of samples. The renderer
//! turns a buffer into a polyline scaled to the buffer's min/max.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::VecDeque;

/// Default history buffer size (60 s at 1 Hz)
pub const DEFAULT_HISTORY_SIZE: usize = 60;

/// Generic history buffer for time-series data
#[derive(Debug, Clone)]
pub struct HistoryBuffer<T: Clone> {
    data: VecDeque<T>,
    capacity: usize,
}

impl<T: Clone> HistoryBuffer<T> {
    /// Create an empty history buffer. A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            data: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Create a buffer already holding `capacity` copies of `value`
    pub fn filled(capacity: usize, value: T) -> Self {
        let mut buffer = Self::new(capacity);
        for _ in 0..buffer.capacity {
            buffer.data.push_back(value.clone());
        }
        buffer
    }

    /// Push a new value, removing oldest if at capacity
    pub fn push(&mut self, value: T) {
        if self.data.len() >= self.capacity {
            self.data.pop_front();
        }
        self.data.push_back(value);
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Get the most recent value
    pub fn latest(&self) -> Option<&T> {
        self.data.back()
    }

    /// Get the previous value (second to last)
    pub fn previous(&self) -> Option<&T> {
        self.data.iter().rev().nth(1)
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.data.iter().cloned().collect()
    }
}

/// One timestamped reading of a scalar metric
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricSample {
    pub timestamp: DateTime<Local>,
    pub value: f32,
}

impl MetricSample {
    pub fn new(timestamp: DateTime<Local>, value: f32) -> Self {
        Self { timestamp, value }
    }

    /// Placeholder used to pre-fill histories before the first tick
    pub fn zero() -> Self {
        Self::new(Local::now(), 0.0)
    }
}

/// History of timestamped samples for one metric
pub type SampleHistory = HistoryBuffer<MetricSample>;

impl HistoryBuffer<MetricSample> {
    /// Sample values from oldest to newest
    pub fn values(&self) -> Vec<f32> {
        self.data.iter().map(|s| s.value).collect()
    }

    /// Value of the newest sample, 0 when empty
    pub fn latest_value(&self) -> f32 {
        self.latest().map(|s| s.value).unwrap_or(0.0)
    }
}

/// Value range used to scale a graph vertically
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// Min/max of the finite values; `None` when there are none
    pub fn from_values(values: &[f32]) -> Option<Self> {
        values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ValueRange>, v| match acc {
                None => Some(ValueRange { min: v, max: v }),
                Some(r) => Some(ValueRange {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    /// Smallest range covering both
    pub fn merge(self, other: ValueRange) -> ValueRange {
        ValueRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Map `value` into [0, 1]. A flat range maps everything to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.span();
        if span <= f32::EPSILON || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Graph-local polyline: x spread evenly over `width`, y inverted so the top of
/// the area is `range.max`. Coordinates are relative to the area's top-left.
pub fn polyline(
    values: &[f32],
    range: ValueRange,
    width: f32,
    height: f32,
    padding: f32,
) -> Vec<(f32, f32)> {
    let graph_width = (width - 2.0 * padding).max(0.0);
    let graph_height = (height - 2.0 * padding).max(0.0);
    let steps = values.len().saturating_sub(1).max(1) as f32;

    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let x = padding + (i as f32 / steps) * graph_width;
            let y = height - padding - range.normalize(v) * graph_height;
            (x, y)
        })
        .collect()
}
