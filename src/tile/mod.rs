pub mod adjacency;
pub mod placement;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeometryError, Result};
use crate::math::{IntPoint2, IntVector2, Point2, Vector2};

pub use adjacency::{AdjacencyInfo, AdjacencyResolver, TileAdjacency};
pub use placement::{GridPlacement, TileToLocal};

/// An ordered collection of tiles belonging to one layer.
pub type TileSet = Vec<Tile>;

/// Which end of a tile a touch happens at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileEnd {
    /// The `from` endpoint.
    Tail,
    /// The `to` endpoint.
    Head,
}

impl TileEnd {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Tail => Self::Head,
            Self::Head => Self::Tail,
        }
    }
}

/// How two tiles meet at a shared endpoint, seen from the first tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Touch {
    /// End of the first tile at the shared point.
    pub self_end: TileEnd,
    /// End of the other tile at the shared point.
    pub other_end: TileEnd,
    /// Heading from the first tile toward the shared point.
    pub self_direction: IntVector2,
    /// Heading leaving the shared point along the other tile.
    pub other_direction: IntVector2,
}

/// A directed segment between two integer grid points.
///
/// Painted tiles are unit segments (edge layers) or unit cells (face layers);
/// optimized tiles may span several units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub from: IntPoint2,
    pub to: IntPoint2,
}

impl Tile {
    #[must_use]
    pub fn new(from: IntPoint2, to: IntPoint2) -> Self {
        Self { from, to }
    }

    /// Creates a tile, rejecting equal endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateTile`] if `from == to`.
    pub fn try_new(from: IntPoint2, to: IntPoint2) -> Result<Self> {
        let tile = Self::new(from, to);
        if tile.is_degenerate() {
            return Err(GeometryError::DegenerateTile(tile).into());
        }
        Ok(tile)
    }

    /// A unit face cell with its lower corner at `(x, y)`.
    #[must_use]
    pub fn cell(x: i32, y: i32) -> Self {
        Self::new(IntPoint2::new(x, y), IntPoint2::new(x + 1, y + 1))
    }

    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }

    /// The endpoint at `end`.
    #[must_use]
    pub fn point(&self, end: TileEnd) -> IntPoint2 {
        match end {
            TileEnd::Tail => self.from,
            TileEnd::Head => self.to,
        }
    }

    /// The exact integer direction of the tile: `to - from` reduced by the
    /// gcd of its components. Zero for degenerate tiles.
    #[must_use]
    pub fn heading(&self) -> IntVector2 {
        let delta = self.to - self.from;
        let divisor = gcd(delta.x.unsigned_abs(), delta.y.unsigned_abs());
        if divisor == 0 {
            return IntVector2::zeros();
        }
        // The divisor divides both components, so it fits back into i32.
        let divisor = i32::try_from(divisor).unwrap_or(1);
        delta / divisor
    }

    /// Heading of `forward` rotated clockwise, i.e. `(f.y, -f.x)`.
    #[must_use]
    pub fn right_heading(&self) -> IntVector2 {
        let f = self.heading();
        IntVector2::new(f.y, -f.x)
    }

    #[must_use]
    pub fn left_heading(&self) -> IntVector2 {
        -self.right_heading()
    }

    /// Unit direction from `from` to `to`.
    #[must_use]
    pub fn forward(&self) -> Vector2 {
        let delta = (self.to - self.from).cast::<f32>();
        delta.try_normalize(f32::EPSILON).unwrap_or_else(Vector2::zeros)
    }

    #[must_use]
    pub fn backward(&self) -> Vector2 {
        -self.forward()
    }

    #[must_use]
    pub fn right(&self) -> Vector2 {
        let f = self.forward();
        Vector2::new(f.y, -f.x)
    }

    #[must_use]
    pub fn left(&self) -> Vector2 {
        -self.right()
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        let from = self.from.cast::<f32>();
        let to = self.to.cast::<f32>();
        nalgebra::center(&from, &to)
    }

    /// Returns the tile with endpoints swapped.
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.to, self.from)
    }

    /// Returns the tile oriented so that `from` precedes `to` in `(x, y)`
    /// order. Both orientations of a segment normalize to the same tile.
    #[must_use]
    pub fn normalized(&self) -> Self {
        if (self.from.x, self.from.y) > (self.to.x, self.to.y) {
            self.reversed()
        } else {
            *self
        }
    }

    /// Key used to order tiles deterministically.
    #[must_use]
    pub fn sort_key(&self) -> (i32, i32, i32, i32) {
        (self.from.x, self.from.y, self.to.x, self.to.y)
    }

    /// Reports how `self` and `other` meet, if they share exactly one endpoint.
    ///
    /// A tile never touches itself, its reverse, or a degenerate tile.
    #[must_use]
    pub fn touch_with(&self, other: &Tile) -> Option<Touch> {
        if self.is_degenerate() || other.is_degenerate() {
            return None;
        }

        let mut shared = None;
        let mut shared_count = 0;
        for self_end in [TileEnd::Tail, TileEnd::Head] {
            for other_end in [TileEnd::Tail, TileEnd::Head] {
                if self.point(self_end) == other.point(other_end) {
                    shared_count += 1;
                    shared.get_or_insert((self_end, other_end));
                }
            }
        }
        if shared_count != 1 {
            return None;
        }
        let (self_end, other_end) = shared?;

        let self_direction = match self_end {
            TileEnd::Head => self.heading(),
            TileEnd::Tail => -self.heading(),
        };
        let other_direction = match other_end {
            TileEnd::Tail => other.heading(),
            TileEnd::Head => -other.heading(),
        };

        Some(Touch {
            self_end,
            other_end,
            self_direction,
            other_direction,
        })
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) -> ({}, {})",
            self.from.x, self.from.y, self.to.x, self.to.y
        )
    }
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
