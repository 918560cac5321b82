/// Scalar range `[min, max]`, mostly used for accepted ray parameters.
///
/// An interval with `min > max` is empty.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max || self.min.is_nan() || self.max.is_nan()
    }

    /// Inclusive membership.
    pub fn contains(&self, x: f32) -> bool {
        (self.min..=self.max).contains(&x)
    }

    /// Exclusive membership; endpoints are outside.
    pub fn surrounds(&self, x: f32) -> bool {
        x > self.min && x < self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Keep the lower bound and replace the upper one. Used to shrink the
    /// search range after each closer hit.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval { max, ..*self }
    }

    pub const EMPTY: Interval = Interval::new(f32::INFINITY, f32::NEG_INFINITY);
    pub const UNIVERSE: Interval = Interval::new(f32::NEG_INFINITY, f32::INFINITY);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_inclusive_vs_exclusive() {
        let unit = Interval::new(0.0, 1.0);

        for edge in [0.0, 1.0] {
            assert!(unit.contains(edge));
            assert!(!unit.surrounds(edge));
        }
        assert!(unit.contains(0.5) && unit.surrounds(0.5));
        assert!(!unit.contains(1.01));
        assert!(!unit.surrounds(-0.01));
    }

    #[test]
    fn test_clamp_to_display_range() {
        let display = Interval::new(0.0, 0.999);
        assert_eq!(display.clamp(-2.0), 0.0);
        assert_eq!(display.clamp(0.25), 0.25);
        assert_eq!(display.clamp(7.0), 0.999);
    }

    #[test]
    fn test_shrinking_search_range() {
        let search = Interval::new(0.001, f32::INFINITY);
        let closer = search.with_max(4.0);

        assert_eq!(closer.min, 0.001);
        assert_eq!(closer.size(), 4.0 - 0.001);
        assert!(!closer.contains(4.5));
        assert!(search.contains(4.5));
    }

    #[test]
    fn test_empty_and_universe() {
        assert!(Interval::EMPTY.is_empty());
        assert!(!Interval::EMPTY.contains(0.0));
        assert!(!Interval::UNIVERSE.is_empty());
        assert!(Interval::UNIVERSE.surrounds(-1e30));
        assert!(Interval::new(f32::NAN, 1.0).is_empty());
    }
}
