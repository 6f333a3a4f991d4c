use serde::{Deserialize, Serialize};

use crate::math::{IntPoint2, Point2, Point3, Vector2};

/// Maps grid points to positions in the layer's local space.
///
/// Implemented for [`GridPlacement`] and for any `Fn(IntPoint2) -> Point3`,
/// so callers can supply their own placement policy.
pub trait TileToLocal {
    fn tile_to_local(&self, point: IntPoint2) -> Point3;
}

impl<F> TileToLocal for F
where
    F: Fn(IntPoint2) -> Point3,
{
    fn tile_to_local(&self, point: IntPoint2) -> Point3 {
        self(point)
    }
}

/// Regular grid on the local XZ plane.
///
/// Grid `x` maps to local `x`, grid `y` to local `z`; every point sits at
/// `vertical_offset` on the local `y` axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridPlacement {
    pub tile_size: Vector2,
    pub tile_offset: Vector2,
    pub vertical_offset: f32,
}

impl Default for GridPlacement {
    fn default() -> Self {
        Self {
            tile_size: Vector2::new(1.0, 1.0),
            tile_offset: Vector2::zeros(),
            vertical_offset: 0.0,
        }
    }
}

impl GridPlacement {
    #[must_use]
    pub fn new(tile_size: Vector2, tile_offset: Vector2, vertical_offset: f32) -> Self {
        Self {
            tile_size,
            tile_offset,
            vertical_offset,
        }
    }

    /// Local position of a (possibly fractional) grid point.
    #[must_use]
    pub fn grid_to_local(&self, point: Point2) -> Point3 {
        Point3::new(
            point.x * self.tile_size.x + self.tile_offset.x,
            self.vertical_offset,
            point.y * self.tile_size.y + self.tile_offset.y,
        )
    }

    /// Grid coordinates of a local position; the local `y` is ignored.
    #[must_use]
    pub fn local_to_tile(&self, local: &Point3) -> Point2 {
        Point2::new(
            (local.x - self.tile_offset.x) / self.tile_size.x,
            (local.z - self.tile_offset.y) / self.tile_size.y,
        )
    }

    /// Lower corner of the grid cell containing a local position.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cell_at_local(&self, local: &Point3) -> IntPoint2 {
        let tile = self.local_to_tile(local);
        IntPoint2::new(tile.x.floor() as i32, tile.y.floor() as i32)
    }
}

impl TileToLocal for GridPlacement {
    fn tile_to_local(&self, point: IntPoint2) -> Point3 {
        self.grid_to_local(point.cast::<f32>())
    }
}
