use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        use super::lerp;
        Self::new(
            lerp(self.r, other.r, t),
            lerp(self.g, other.g, t),
            lerp(self.b, other.b, t),
            lerp(self.a, other.a, t),
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// How a [`Gradient`] fills the space between keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientMode {
    /// Interpolate linearly between neighboring keys.
    #[default]
    Blend,
    /// Hold the color of the next key until it is reached.
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientKey {
    pub time: f32,
    pub color: Color,
}

impl GradientKey {
    #[must_use]
    pub fn new(time: f32, color: Color) -> Self {
        Self { time, color }
    }
}

/// A color ramp over `[0, 1]`. A gradient without keys is plain white.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "GradientDef")]
pub struct Gradient {
    pub mode: GradientMode,
    keys: Vec<GradientKey>,
}

#[derive(Deserialize)]
struct GradientDef {
    #[serde(default)]
    mode: GradientMode,
    #[serde(default)]
    keys: Vec<GradientKey>,
}

impl From<GradientDef> for Gradient {
    fn from(def: GradientDef) -> Self {
        Self::new(def.mode, def.keys)
    }
}

impl Gradient {
    #[must_use]
    pub fn new(mode: GradientMode, mut keys: Vec<GradientKey>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { mode, keys }
    }

    /// A gradient that evaluates to `color` everywhere.
    #[must_use]
    pub fn solid(color: Color) -> Self {
        Self::new(GradientMode::Blend, vec![GradientKey::new(0.0, color)])
    }

    /// A two-key blend from `from` at 0 to `to` at 1.
    #[must_use]
    pub fn two_color(from: Color, to: Color) -> Self {
        Self::new(
            GradientMode::Blend,
            vec![GradientKey::new(0.0, from), GradientKey::new(1.0, to)],
        )
    }

    #[must_use]
    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Every key time and color component is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.keys.iter().all(|k| {
            let c = k.color;
            k.time.is_finite() && [c.r, c.g, c.b, c.a].iter().all(|v| v.is_finite())
        })
    }

    /// Evaluates the gradient at `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn evaluate(&self, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let keys = &self.keys;
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return Color::WHITE;
        };
        if t <= first.time {
            return first.color;
        }
        if t >= last.time {
            return last.color;
        }

        let upper = keys.partition_point(|k| k.time <= t);
        let segment = upper
            .checked_sub(1)
            .and_then(|i| keys.get(i))
            .zip(keys.get(upper));
        let Some((a, b)) = segment else {
            return first.color;
        };
        match self.mode {
            GradientMode::Fixed => b.color,
            GradientMode::Blend => {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    b.color
                } else {
                    a.color.lerp(b.color, (t - a.time) / span)
                }
            }
        }
    }
}
