//! Status bar gauges read from two sampled pixels
//!
//! Each bar starts a fixed distance right of its icon center and is
//! [`BAR_LENGTH`] pixels long. A gauge compares the color at the bar start with
//! the color at some fraction of its length.

use image::Rgb;

pub const BAR_LENGTH: f64 = 152.0;

/// What the two samples must do for the gauge to read `true`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Bar is filled at least up to the far sample
    SameColor,
    /// Bar ends before the far sample
    DifferentColor,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gauge {
    /// Horizontal offset of the bar start from the icon center
    pub start: i32,
    pub verdict: Verdict,
}

pub const ENERGY: Gauge = Gauge {
    start: 19,
    verdict: Verdict::SameColor,
};

pub const HUNGER: Gauge = Gauge {
    start: 18,
    verdict: Verdict::DifferentColor,
};
pub const HUNGER_FRACTION: f64 = 0.5;

pub const COMFORT: Gauge = Gauge {
    start: 18,
    verdict: Verdict::DifferentColor,
};
pub const COMFORT_FRACTION: f64 = 0.51;

impl Gauge {
    /// Offset of the far sample from the icon center
    ///
    /// Truncates toward zero before subtracting one.
    pub fn far_offset(&self, fraction: f64) -> i32 {
        (self.start as f64 + BAR_LENGTH * fraction) as i32 - 1
    }

    pub fn read(&self, near: Rgb<u8>, far: Rgb<u8>) -> bool {
        match self.verdict {
            Verdict::SameColor => near == far,
            Verdict::DifferentColor => near != far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_far_offsets() {
        assert_eq!(ENERGY.far_offset(0.74), 130);
        assert_eq!(ENERGY.far_offset(0.5), 94);
        assert_eq!(HUNGER.far_offset(HUNGER_FRACTION), 93);
        assert_eq!(COMFORT.far_offset(COMFORT_FRACTION), 94);
    }

    #[test]
    fn test_energy_reads_equality() {
        let green = Rgb([40, 200, 40]);
        let grey = Rgb([60, 60, 60]);
        assert!(ENERGY.read(green, green));
        assert!(!ENERGY.read(green, grey));
    }

    #[test]
    fn test_hunger_and_comfort_read_inequality() {
        let orange = Rgb([230, 140, 20]);
        let grey = Rgb([60, 60, 60]);
        for gauge in [HUNGER, COMFORT] {
            assert!(gauge.read(orange, grey));
            assert!(!gauge.read(orange, orange));
        }
    }
}
