//! Numeric gradient mapping for scalar fields.

use serde::{Deserialize, Serialize};

use super::{Color, LegendEntry};

/// Maps scalars in `[min, max]` onto a gradient of evenly spaced stops.
///
/// Values outside the range clamp to the nearest end. NaN maps to the first
/// stop, and so does everything when the range is degenerate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldColorMap {
    min: f32,
    max: f32,
    stops: Vec<Color>,
}

impl FieldColorMap {
    /// Two-color gradient from `low` at `min` to `high` at `max`.
    pub fn new(min: f32, max: f32, low: Color, high: Color) -> Self {
        Self { min, max, stops: vec![low, high] }
    }

    /// Multi-stop gradient. An empty stop list falls back to black.
    pub fn with_stops(min: f32, max: f32, stops: Vec<Color>) -> Self {
        let stops = if stops.is_empty() { vec![Color::BLACK] } else { stops };
        Self { min, max, stops }
    }

    pub fn grayscale(min: f32, max: f32) -> Self {
        Self::new(min, max, Color::BLACK, Color::WHITE)
    }

    /// Deep water through lowland green to snow.
    pub fn terrain(min: f32, max: f32) -> Self {
        Self::with_stops(
            min,
            max,
            vec![
                Color::rgb(15, 40, 90),
                Color::rgb(40, 110, 170),
                Color::rgb(210, 200, 140),
                Color::rgb(60, 140, 60),
                Color::rgb(120, 100, 70),
                Color::rgb(245, 245, 245),
            ],
        )
    }

    /// Cold blue to hot red.
    pub fn thermal(min: f32, max: f32) -> Self {
        Self::with_stops(
            min,
            max,
            vec![Color::rgb(40, 60, 200), Color::rgb(240, 240, 220), Color::rgb(200, 40, 30)],
        )
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn stops(&self) -> &[Color] {
        &self.stops
    }

    /// Updates the range, returning true if it changed. NaN counts as equal
    /// to NaN.
    pub fn set_range(&mut self, min: f32, max: f32) -> bool {
        let same = |a: f32, b: f32| a == b || (a.is_nan() && b.is_nan());
        if same(self.min, min) && same(self.max, max) {
            return false;
        }
        self.min = min;
        self.max = max;
        true
    }

    /// Position of `value` within the range, in `[0, 1]`. NaN values and
    /// empty or non-finite ranges map to 0.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if !span.is_finite() || span.abs() < f32::EPSILON {
            return 0.0;
        }
        let t = (value - self.min) / span;
        if t.is_nan() {
            return 0.0;
        }
        t.clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f32) -> Color {
        let n = self.stops.len();
        if n == 1 {
            return self.stops[0];
        }

        let scaled = self.normalize(value) * (n - 1) as f32;
        let i = (scaled.floor() as usize).min(n - 2);
        self.stops[i].lerp(self.stops[i + 1], scaled - i as f32)
    }

    /// Evenly spaced sample values across the range with their colors.
    pub fn legend(&self, buckets: usize) -> Vec<LegendEntry<f32>> {
        match buckets {
            0 => Vec::new(),
            1 => vec![LegendEntry::new(self.min, self.color_for(self.min))],
            _ => (0..buckets)
                .map(|i| {
                    let t = i as f32 / (buckets - 1) as f32;
                    let value = self.min + (self.max - self.min) * t;
                    LegendEntry::new(value, self.color_for(value))
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blue_red() -> FieldColorMap {
        FieldColorMap::new(0.0, 100.0, Color::BLUE, Color::RED)
    }

    #[test]
    fn test_endpoints_and_midpoint() {
        let map = blue_red();
        assert_eq!(map.color_for(0.0), Color::BLUE);
        assert_eq!(map.color_for(100.0), Color::RED);
        assert_eq!(map.color_for(50.0), Color::rgb(128, 0, 128));
    }

    #[test]
    fn test_out_of_range_clamps() {
        let map = blue_red();
        assert_eq!(map.color_for(-10.0), map.color_for(0.0));
        assert_eq!(map.color_for(1e9), map.color_for(100.0));
        assert_eq!(map.color_for(f32::NEG_INFINITY), Color::BLUE);
        assert_eq!(map.color_for(f32::INFINITY), Color::RED);
    }

    #[test]
    fn test_monotonic_in_range() {
        let map = blue_red();
        let mut last = map.color_for(0.0);
        for i in 1..=200 {
            let c = map.color_for(i as f32 * 0.5);
            assert!(c.r >= last.r, "red channel decreased at {}", i);
            assert!(c.b <= last.b, "blue channel increased at {}", i);
            last = c;
        }
    }

    #[test]
    fn test_nan_and_degenerate_range() {
        let map = blue_red();
        assert_eq!(map.color_for(f32::NAN), Color::BLUE);

        let flat = FieldColorMap::new(5.0, 5.0, Color::WHITE, Color::BLACK);
        assert_eq!(flat.color_for(5.0), Color::WHITE);
        assert_eq!(flat.color_for(7.0), Color::WHITE);
    }

    #[test]
    fn test_non_finite_range_maps_to_first_stop() {
        let mut map = blue_red();
        assert!(map.set_range(f32::NAN, 100.0));
        assert!(!map.set_range(f32::NAN, 100.0));
        assert_eq!(map.color_for(50.0), Color::BLUE);
        assert_eq!(map.color_for(f32::NAN), Color::BLUE);

        assert!(map.set_range(0.0, f32::INFINITY));
        assert_eq!(map.color_for(1.0), Color::BLUE);
        assert_eq!(map.color_for(f32::INFINITY), Color::BLUE);
        assert_eq!(map.color_for(f32::INFINITY).a, 255);

        assert!(map.set_range(0.0, 100.0));
        assert_eq!(map.color_for(f32::INFINITY), Color::RED);
        assert_eq!(map.color_for(f32::NEG_INFINITY), Color::BLUE);
    }

    #[test]
    fn test_multi_stop_hits_each_stop() {
        let stops = vec![Color::BLACK, Color::RED, Color::WHITE];
        let map = FieldColorMap::with_stops(0.0, 2.0, stops.clone());
        assert_eq!(map.color_for(0.0), stops[0]);
        assert_eq!(map.color_for(1.0), stops[1]);
        assert_eq!(map.color_for(2.0), stops[2]);
    }

    #[test]
    fn test_set_range_reports_change() {
        let mut map = blue_red();
        assert!(!map.set_range(0.0, 100.0));
        assert!(map.set_range(0.0, 50.0));
        assert_eq!(map.color_for(50.0), Color::RED);
    }

    #[test]
    fn test_legend() {
        let map = FieldColorMap::grayscale(0.0, 100.0);
        let legend = map.legend(3);
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[0].key, 0.0);
        assert_eq!(legend[1].key, 50.0);
        assert_eq!(legend[2].color, Color::WHITE);
        assert!(map.legend(0).is_empty());
    }
}
