use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::gradient::Gradient;
use crate::math::{inverse_lerp, Vector3};

use super::MeshBuffer;

/// Recolors a mesh by how far each vertex lies along a direction.
///
/// A vertex at `min_height` gets the start of the gradient, one at
/// `max_height` the end; heights outside the range are clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerticalGradientColorer {
    pub min_height: f32,
    pub max_height: f32,
    pub direction: Vector3,
    pub gradient: Gradient,
}

impl Default for VerticalGradientColorer {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 1.0,
            direction: Vector3::y(),
            gradient: Gradient::default(),
        }
    }
}

impl VerticalGradientColorer {
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if a height, the direction or a
    /// gradient key is not finite.
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [
            ("min_height", self.min_height),
            ("max_height", self.max_height),
            ("direction.x", self.direction.x),
            ("direction.y", self.direction.y),
            ("direction.z", self.direction.z),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { parameter, value }.into());
            }
        }
        if !self.gradient.is_finite() {
            return Err(ConfigurationError::NonFiniteKeys {
                parameter: "vertex_colorer.gradient",
            }
            .into());
        }
        Ok(())
    }

    /// Overwrites every vertex color of `mesh`.
    pub fn color_mesh(&self, mesh: &mut MeshBuffer) {
        mesh.colors = mesh
            .vertices
            .iter()
            .map(|v| {
                let height = v.coords.dot(&self.direction);
                self.gradient
                    .evaluate(inverse_lerp(self.min_height, self.max_height, height))
            })
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::gradient::{Color, GradientKey, GradientMode};
    use crate::math::Point3;
    use approx::assert_relative_eq;

    #[test]
    fn colors_by_height() {
        let mut mesh = MeshBuffer {
            vertices: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(5.0, 1.0, 2.0),
                Point3::new(0.0, 2.0, 0.0),
                Point3::new(0.0, 9.0, 0.0),
            ],
            ..MeshBuffer::default()
        };
        let colorer = VerticalGradientColorer {
            max_height: 2.0,
            gradient: Gradient::two_color(Color::BLACK, Color::WHITE),
            ..VerticalGradientColorer::default()
        };
        colorer.color_mesh(&mut mesh);

        assert_eq!(mesh.colors.len(), 4);
        assert_eq!(mesh.colors[0], Color::BLACK);
        assert_relative_eq!(mesh.colors[1].r, 0.5);
        assert_eq!(mesh.colors[2], Color::WHITE);
        assert_eq!(mesh.colors[3], Color::WHITE);
    }

    #[test]
    fn direction_selects_axis() {
        let mut mesh = MeshBuffer {
            vertices: vec![Point3::new(1.0, 100.0, 0.0)],
            ..MeshBuffer::default()
        };
        let colorer = VerticalGradientColorer {
            direction: Vector3::x(),
            max_height: 4.0,
            gradient: Gradient::two_color(Color::BLACK, Color::WHITE),
            ..VerticalGradientColorer::default()
        };
        colorer.color_mesh(&mut mesh);
        assert_relative_eq!(mesh.colors[0].g, 0.25);
    }

    #[test]
    fn non_finite_settings_are_rejected() {
        assert!(VerticalGradientColorer::default().validate().is_ok());
        let nan_height = VerticalGradientColorer {
            max_height: f32::NAN,
            ..VerticalGradientColorer::default()
        };
        assert!(nan_height.validate().is_err());
        let nan_key = VerticalGradientColorer {
            gradient: Gradient::new(
                GradientMode::Fixed,
                vec![GradientKey::new(-f32::NAN, Color::WHITE)],
            ),
            ..VerticalGradientColorer::default()
        };
        assert!(nan_key.validate().is_err());
    }
}
