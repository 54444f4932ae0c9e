//! Continuous axis mapping (cursor movement, scrolling)
//!
//! Each mapper turns a pair of stick values in [-1, 1] into integer deltas,
//! applying an arctangent response curve and carrying the fractional
//! remainder across frames so slow deflections at 60 Hz are not truncated
//! away.

use crate::config::AddonConfig;

/// Stateful axis-to-delta transformer.
///
/// One instance per concern (cursor, scroll); the remainder pair makes the
/// instances independent.
#[derive(Debug, Clone)]
pub struct AxisMapper {
    gain: f32,
    accel: f32,
    deadzone: f32,
    remainder: (f32, f32),
}

impl AxisMapper {
    pub fn new(gain: f32, accel: f32, deadzone: f32) -> Self {
        Self {
            gain,
            // A flat curve would stall all motion below one unit per frame.
            accel: accel.max(1.0),
            deadzone,
            remainder: (0.0, 0.0),
        }
    }

    /// Cursor mapper scaled from the user's cursor settings
    pub fn cursor(config: &AddonConfig) -> Self {
        Self::new(
            config.cursor_speed,
            config.cursor_accel,
            config.stick_deadzone / 100.0,
        )
    }

    /// Scroll mapper scaled from the user's scroll settings
    pub fn scroll(config: &AddonConfig) -> Self {
        Self::new(
            config.scroll_speed,
            config.cursor_accel,
            config.stick_deadzone / 100.0,
        )
    }

    /// Response curve: odd-symmetric, zero at zero, monotonic in magnitude.
    /// Small deflections move slowly, saturating towards `gain` per frame.
    fn curve(&self, value: f32) -> f32 {
        (value * self.accel).atan() / std::f32::consts::FRAC_PI_2 * self.gain
    }

    /// Feed one frame of axis values; returns the integer delta to apply,
    /// or `None` when within the deadzone or no whole unit accumulated.
    pub fn apply(&mut self, x: f32, y: f32) -> Option<(i32, i32)> {
        if x.abs() + y.abs() < self.deadzone {
            return None;
        }
        self.remainder.0 += self.curve(x);
        self.remainder.1 += self.curve(y);
        let dx = self.remainder.0.trunc();
        let dy = self.remainder.1.trunc();
        self.remainder.0 -= dx;
        self.remainder.1 -= dy;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        Some((dx as i32, dy as i32))
    }

    #[cfg(test)]
    fn remainder(&self) -> (f32, f32) {
        self.remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn mapper() -> AxisMapper {
        AxisMapper::new(10.0, 5.0, 0.05)
    }

    #[test]
    fn test_zero_input_never_drifts() {
        let mut m = mapper();
        for _ in 0..1000 {
            assert_eq!(m.apply(0.0, 0.0), None);
        }
        assert_eq!(m.remainder(), (0.0, 0.0));
    }

    #[test]
    fn test_subpixel_motion_accumulates() {
        let mut m = AxisMapper::new(1.0, 1.0, 0.0);
        // Each frame contributes well under one unit; over enough frames the
        // remainder must spill into whole-unit deltas.
        let mut total = 0;
        for _ in 0..100 {
            if let Some((dx, _)) = m.apply(0.3, 0.0) {
                total += dx;
            }
        }
        assert!(total > 0);
        // Remainder stays bounded, no unbounded drift
        assert!(m.remainder().0.abs() < 1.0);
        assert!(m.remainder().1.abs() < 1.0);
    }

    #[test]
    fn test_deadzone_suppresses_small_deflection() {
        let mut m = AxisMapper::new(10.0, 5.0, 0.2);
        for _ in 0..100 {
            assert_eq!(m.apply(0.05, 0.05), None);
        }
        assert_eq!(m.remainder(), (0.0, 0.0));
    }

    #[test]
    fn test_full_deflection_moves_fast() {
        let mut m = mapper();
        let (dx, _) = m.apply(1.0, 0.0).unwrap();
        assert!(dx >= 8, "full deflection should approach gain, got {dx}");
        let (dx, _) = m.apply(-1.0, 0.0).unwrap();
        assert!(dx <= -8);
    }

    proptest! {
        #[test]
        fn prop_curve_is_odd_symmetric(v in -1.0f32..1.0) {
            let m = mapper();
            prop_assert!((m.curve(v) + m.curve(-v)).abs() < 1e-4);
        }

        #[test]
        fn prop_curve_is_monotonic(a in 0.0f32..1.0, b in 0.0f32..1.0) {
            let m = mapper();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(m.curve(lo) <= m.curve(hi) + 1e-6);
        }

        #[test]
        fn prop_curve_zero_at_zero(gain in 0.1f32..50.0, accel in 0.1f32..20.0) {
            let m = AxisMapper::new(gain, accel, 0.0);
            prop_assert_eq!(m.curve(0.0), 0.0);
        }
    }
}
