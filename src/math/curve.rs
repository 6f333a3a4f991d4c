use serde::{Deserialize, Serialize};

/// A single keyframe of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveKey {
    pub time: f32,
    pub value: f32,
}

impl CurveKey {
    #[must_use]
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// A keyframed scalar function, piecewise linear between keys.
///
/// Outside the key range the curve holds the first/last value. A curve with
/// no keys evaluates to 0 everywhere.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CurveKey>", into = "Vec<CurveKey>")]
pub struct Curve {
    keys: Vec<CurveKey>,
}

impl Curve {
    /// Creates a curve from keys in any order.
    #[must_use]
    pub fn new(mut keys: Vec<CurveKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// A curve that returns `value` everywhere.
    #[must_use]
    pub fn constant(value: f32) -> Self {
        Self::new(vec![CurveKey::new(0.0, value)])
    }

    /// A straight line through `(t0, v0)` and `(t1, v1)`.
    #[must_use]
    pub fn linear(t0: f32, v0: f32, t1: f32, v1: f32) -> Self {
        Self::new(vec![CurveKey::new(t0, v0), CurveKey::new(t1, v1)])
    }

    /// Returns the keys sorted by time.
    #[must_use]
    pub fn keys(&self) -> &[CurveKey] {
        &self.keys
    }

    /// Every key time and value is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.keys
            .iter()
            .all(|k| k.time.is_finite() && k.value.is_finite())
    }

    /// Evaluates the curve at `t`.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if t <= first.time {
            return first.value;
        }
        if t >= last.time {
            return last.value;
        }

        // Keys are sorted, so the first key past `t` bounds the segment.
        let upper = self.keys.partition_point(|k| k.time <= t);
        let segment = upper
            .checked_sub(1)
            .and_then(|i| self.keys.get(i))
            .zip(self.keys.get(upper));
        let Some((a, b)) = segment else {
            // Only reachable with NaN key times.
            return first.value;
        };
        let span = b.time - a.time;
        if span <= f32::EPSILON {
            return b.value;
        }
        super::lerp(a.value, b.value, (t - a.time) / span)
    }
}

impl From<Vec<CurveKey>> for Curve {
    fn from(keys: Vec<CurveKey>) -> Self {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<CurveKey> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_curve_is_zero() {
        let curve = Curve::default();
        assert_relative_eq!(curve.evaluate(0.3), 0.0);
    }

    #[test]
    fn linear_curve_interpolates() {
        let curve = Curve::linear(0.0, 0.0, 1.0, 0.5);
        assert_relative_eq!(curve.evaluate(0.5), 0.25);
        assert_relative_eq!(curve.evaluate(1.0), 0.5);
    }

    #[test]
    fn holds_end_values_outside_range() {
        let curve = Curve::linear(0.2, 1.0, 0.8, 3.0);
        assert_relative_eq!(curve.evaluate(0.0), 1.0);
        assert_relative_eq!(curve.evaluate(1.0), 3.0);
    }

    #[test]
    fn nan_key_time_does_not_panic() {
        let curve = Curve::new(vec![CurveKey::new(-f32::NAN, 0.0), CurveKey::new(1.0, 1.0)]);
        assert!(!curve.is_finite());
        for t in [0.0, 0.5, 1.0] {
            let _ = curve.evaluate(t);
        }
        assert!(Curve::linear(0.0, 0.0, 1.0, 0.5).is_finite());
    }

    #[test]
    fn unsorted_keys_are_sorted() {
        let curve = Curve::new(vec![
            CurveKey::new(1.0, 2.0),
            CurveKey::new(0.0, 0.0),
            CurveKey::new(0.5, -1.0),
        ]);
        assert_relative_eq!(curve.evaluate(0.25), -0.5);
        assert_relative_eq!(curve.evaluate(0.75), 0.5);
    }
}
