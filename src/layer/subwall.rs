use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::curve::Curve;
use crate::math::gradient::Gradient;
use crate::math::lerp;

/// Cross-section profile of one stacked band of a wall.
///
/// The band spans `anchor_bottom..anchor_top` of the wall height (plus the
/// absolute offsets) and is split into `steps` horizontal strips. The width
/// curve pushes the faces outward as a function of the height fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubwallProfile {
    pub anchor_bottom: f32,
    pub anchor_top: f32,
    pub offset_bottom: f32,
    pub offset_top: f32,
    /// Share vertices between strips for a continuous ramp.
    pub smooth_steps: bool,
    pub steps: u32,
    pub width_curve: Curve,
    pub uv_scale: f32,
    pub vertex_color_gradient: Gradient,
    pub material: Option<String>,
}

impl Default for SubwallProfile {
    fn default() -> Self {
        Self {
            anchor_bottom: 0.0,
            anchor_top: 1.0,
            offset_bottom: 0.0,
            offset_top: 0.0,
            smooth_steps: true,
            steps: 1,
            width_curve: Curve::default(),
            uv_scale: 1.0,
            vertex_color_gradient: Gradient::default(),
            material: None,
        }
    }
}

impl SubwallProfile {
    #[must_use]
    pub fn with_anchors(mut self, bottom: f32, top: f32) -> Self {
        self.anchor_bottom = bottom;
        self.anchor_top = top;
        self
    }

    #[must_use]
    pub fn with_offsets(mut self, bottom: f32, top: f32) -> Self {
        self.offset_bottom = bottom;
        self.offset_top = top;
        self
    }

    #[must_use]
    pub fn with_steps(mut self, steps: u32, smooth: bool) -> Self {
        self.steps = steps;
        self.smooth_steps = smooth;
        self
    }

    #[must_use]
    pub fn with_width_curve(mut self, curve: Curve) -> Self {
        self.width_curve = curve;
        self
    }

    #[must_use]
    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.vertex_color_gradient = gradient;
        self
    }

    #[must_use]
    pub fn with_uv_scale(mut self, uv_scale: f32) -> Self {
        self.uv_scale = uv_scale;
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(material.into());
        self
    }

    /// Height above the wall base at fraction `percent` of this band.
    #[must_use]
    pub fn height_at(&self, percent: f32, wall_height: f32) -> f32 {
        lerp(self.anchor_bottom, self.anchor_top, percent) * wall_height
            + lerp(self.offset_bottom, self.offset_top, percent)
    }

    /// Checks the profile; `index` is its position in the wall's list.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for zero steps, anchors outside
    /// `[0, 1]`, non-finite offsets or UV scale, or curve and gradient keys
    /// that are not finite.
    pub fn validate(&self, index: usize) -> Result<()> {
        if self.steps < 1 {
            return Err(ConfigurationError::InvalidSteps {
                index,
                steps: self.steps,
            }
            .into());
        }
        for (parameter, value) in [
            ("anchor_bottom", self.anchor_bottom),
            ("anchor_top", self.anchor_top),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigurationError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: 1.0,
                }
                .into());
            }
        }
        for (parameter, value) in [
            ("offset_bottom", self.offset_bottom),
            ("offset_top", self.offset_top),
            ("uv_scale", self.uv_scale),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { parameter, value }.into());
            }
        }
        if !self.width_curve.is_finite() {
            return Err(ConfigurationError::NonFiniteKeys {
                parameter: "width_curve",
            }
            .into());
        }
        if !self.vertex_color_gradient.is_finite() {
            return Err(ConfigurationError::NonFiniteKeys {
                parameter: "vertex_color_gradient",
            }
            .into());
        }
        Ok(())
    }
}
