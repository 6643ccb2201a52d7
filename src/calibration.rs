//! Two-point linear calibration.

/// Raw ADC count paired with the physical value the factory measured for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub raw: i16,
    pub value: f64,
}

impl Anchor {
    pub const fn new(raw: i16, value: f64) -> Anchor {
        Anchor { raw, value }
    }
}

/// Straight line through two anchors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TwoPoint {
    pub low: Anchor,
    pub high: Anchor,
}

impl TwoPoint {
    pub const fn new(low: Anchor, high: Anchor) -> TwoPoint {
        TwoPoint { low, high }
    }

    /// Both anchors share one raw count, so no slope can be derived.
    pub fn is_degenerate(&self) -> bool {
        self.low.raw == self.high.raw
    }

    /// Map a raw count onto the line. A degenerate pair yields the midpoint
    /// of the two reference values.
    pub fn convert(&self, raw: i16) -> f64 {
        let span = self.high.raw as i32 - self.low.raw as i32;
        if span == 0 {
            return (self.low.value + self.high.value) / 2.0;
        }
        let offset = raw as i32 - self.low.raw as i32;
        self.low.value + offset as f64 * (self.high.value - self.low.value) / span as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn humidity() -> TwoPoint {
        TwoPoint::new(Anchor::new(100, 40.0), Anchor::new(1100, 90.0))
    }

    #[test]
    fn anchors_map_exactly() {
        let line = humidity();
        assert_eq!(line.convert(100), 40.0);
        assert_eq!(line.convert(1100), 90.0);
        assert_eq!(line.convert(600), 65.0);
    }

    #[test]
    fn extremes_do_not_overflow() {
        let line = TwoPoint::new(Anchor::new(i16::MIN, 15.125), Anchor::new(i16::MAX, 127.875));
        assert_eq!(line.convert(i16::MIN), 15.125);
        assert_eq!(line.convert(i16::MAX), 127.875);
    }

    #[test]
    fn negative_slope() {
        let line = TwoPoint::new(Anchor::new(-300, 10.0), Anchor::new(-1300, 35.0));
        assert_eq!(line.convert(-300), 10.0);
        assert_eq!(line.convert(-1300), 35.0);
        assert_eq!(line.convert(-800), 22.5);
        assert_eq!(line.convert(200), -2.5);
    }

    #[test]
    fn degenerate_pair_returns_midpoint() {
        let line = TwoPoint::new(Anchor::new(512, 20.0), Anchor::new(512, 30.0));
        assert!(line.is_degenerate());
        assert_eq!(line.convert(512), 25.0);
        assert_eq!(line.convert(-4000), 25.0);
        assert!(!humidity().is_degenerate());
    }
}
