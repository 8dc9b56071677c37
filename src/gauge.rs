//! Semicircular arc gauge geometry
//!
//! Screen coordinates (y grows downward). The arc opens upward: 0 sits at the
//! left end, `max` at the right end.

use std::f32::consts::PI;

/// Threshold above which the gauge glows
pub const GLOW_THRESHOLD: f32 = 70.0;
/// Threshold above which the glow switches to the warning color
pub const WARNING_THRESHOLD: f32 = 90.0;

const TICK_COUNT: usize = 11;
const TICK_INNER_INSET: f32 = 10.0;
const TICK_OUTER_INSET: f32 = 5.0;
const NEEDLE_INSET: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glow {
    Normal,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGauge {
    value: f32,
    max: f32,
}

impl ArcGauge {
    /// `value` is clamped into `[0, max]`; a non-positive `max` becomes 100
    pub fn new(value: f32, max: f32) -> Self {
        let max = if max > 0.0 && max.is_finite() { max } else { 100.0 };
        let value = if value.is_finite() { value.clamp(0.0, max) } else { 0.0 };
        Self { value, max }
    }

    pub fn percent(value: f32) -> Self {
        Self::new(value, 100.0)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn fraction(&self) -> f32 {
        self.value / self.max
    }

    /// Sweep of the value arc, 0..=180
    pub fn extent_degrees(&self) -> f32 {
        self.fraction() * 180.0
    }

    /// Needle tip, `radius - 20` from the center
    pub fn needle(&self, center: (f32, f32), radius: f32) -> (f32, f32) {
        point_at(center, radius - NEEDLE_INSET, 180.0 - self.extent_degrees())
    }

    /// Eleven tick segments (inner, outer), one every 18 degrees
    pub fn ticks(center: (f32, f32), radius: f32) -> Vec<((f32, f32), (f32, f32))> {
        (0..TICK_COUNT)
            .map(|i| {
                let angle = 180.0 - i as f32 * 18.0;
                (
                    point_at(center, radius - TICK_INNER_INSET, angle),
                    point_at(center, radius - TICK_OUTER_INSET, angle),
                )
            })
            .collect()
    }

    /// Points along the value arc from the left end, `segments + 1` long
    pub fn value_arc(&self, center: (f32, f32), radius: f32, segments: usize) -> Vec<(f32, f32)> {
        arc_points(center, radius, self.extent_degrees(), segments)
    }

    /// Points along the full background half circle
    pub fn track(center: (f32, f32), radius: f32, segments: usize) -> Vec<(f32, f32)> {
        arc_points(center, radius, 180.0, segments)
    }

    pub fn glow(&self) -> Option<Glow> {
        if self.value > WARNING_THRESHOLD {
            Some(Glow::Warning)
        } else if self.value > GLOW_THRESHOLD {
            Some(Glow::Normal)
        } else {
            None
        }
    }
}

/// Point at `angle_deg` (counter-clockwise from +x) on a circle
fn point_at(center: (f32, f32), radius: f32, angle_deg: f32) -> (f32, f32) {
    let rad = angle_deg * PI / 180.0;
    (center.0 + radius * rad.cos(), center.1 - radius * rad.sin())
}

fn arc_points(center: (f32, f32), radius: f32, extent: f32, segments: usize) -> Vec<(f32, f32)> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| point_at(center, radius, 180.0 - extent * i as f32 / segments as f32))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-3 && (a.1 - b.1).abs() < 1e-3
    }

    #[test]
    fn test_extent() {
        assert_eq!(ArcGauge::percent(0.0).extent_degrees(), 0.0);
        assert_eq!(ArcGauge::percent(50.0).extent_degrees(), 90.0);
        assert_eq!(ArcGauge::percent(100.0).extent_degrees(), 180.0);
        assert_eq!(ArcGauge::new(8.0, 16.0).extent_degrees(), 90.0);
    }

    #[test]
    fn test_value_clamped() {
        assert_eq!(ArcGauge::percent(150.0).value(), 100.0);
        assert_eq!(ArcGauge::percent(-3.0).value(), 0.0);
        assert_eq!(ArcGauge::percent(f32::NAN).value(), 0.0);
        assert_eq!(ArcGauge::new(5.0, 0.0).extent_degrees(), 9.0);
    }

    #[test]
    fn test_needle_positions() {
        let center = (105.0, 115.0);
        // left end at 0, straight up at 50, right end at 100
        assert!(close(ArcGauge::percent(0.0).needle(center, 85.0), (40.0, 115.0)));
        assert!(close(ArcGauge::percent(50.0).needle(center, 85.0), (105.0, 50.0)));
        assert!(close(ArcGauge::percent(100.0).needle(center, 85.0), (170.0, 115.0)));
    }

    #[test]
    fn test_ticks() {
        let ticks = ArcGauge::ticks((0.0, 0.0), 85.0);
        assert_eq!(ticks.len(), 11);
        assert!(close(ticks[0].0, (-75.0, 0.0)));
        assert!(close(ticks[0].1, (-80.0, 0.0)));
        assert!(close(ticks[5].1, (0.0, -80.0)));
        assert!(close(ticks[10].0, (75.0, 0.0)));
    }

    #[test]
    fn test_arc_points() {
        let arc = ArcGauge::percent(50.0).value_arc((0.0, 0.0), 10.0, 4);
        assert_eq!(arc.len(), 5);
        assert!(close(arc[0], (-10.0, 0.0)));
        assert!(close(arc[4], (0.0, -10.0)));
        assert_eq!(ArcGauge::track((0.0, 0.0), 10.0, 0).len(), 2);
    }

    #[test]
    fn test_glow_thresholds() {
        assert_eq!(ArcGauge::percent(70.0).glow(), None);
        assert_eq!(ArcGauge::percent(70.5).glow(), Some(Glow::Normal));
        assert_eq!(ArcGauge::percent(90.0).glow(), Some(Glow::Normal));
        assert_eq!(ArcGauge::percent(95.0).glow(), Some(Glow::Warning));
    }
}
