mod edge;
mod face;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::BuildWarning;
use crate::math::IntPoint2;
use crate::tile::{Tile, TileSet};

/// What a layer's tiles denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileLayerKind {
    /// Tiles are grid cells spanning `[from, to)`.
    Face,
    /// Tiles are segments along grid lines.
    Edge,
}

/// Result of an optimization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Optimized {
    /// Merged tiles, sorted by endpoints.
    pub tiles: TileSet,
    /// Degenerate and duplicate input tiles that were dropped.
    pub warnings: Vec<BuildWarning>,
}

/// Collapses adjacent tile runs into maximal tiles without changing the
/// covered area (face layers) or boundary (edge layers).
///
/// The result depends only on the set of input tiles, not their order.
#[derive(Debug, Clone, Copy)]
pub struct TileOptimizer {
    kind: TileLayerKind,
}

impl TileOptimizer {
    #[must_use]
    pub fn new(kind: TileLayerKind) -> Self {
        Self { kind }
    }

    #[must_use]
    pub fn execute(&self, tiles: &[Tile]) -> Optimized {
        let (prepared, warnings) = prepare(tiles, self.kind);
        let input_count = prepared.len();

        let tiles = match self.kind {
            TileLayerKind::Face => {
                let rows = face::merge_runs(prepared, face::Axis::Horizontal);
                face::merge_runs(rows, face::Axis::Vertical)
            }
            TileLayerKind::Edge => edge::merge_runs(prepared),
        };

        debug!(
            kind = ?self.kind,
            input = input_count,
            output = tiles.len(),
            "optimized tiles"
        );
        Optimized { tiles, warnings }
    }
}

/// Optimizes `tiles` for a layer of the given kind, discarding warnings.
#[must_use]
pub fn optimize_tiles(tiles: &[Tile], kind: TileLayerKind) -> TileSet {
    TileOptimizer::new(kind).execute(tiles).tiles
}

/// Normalizes orientation, drops degenerate tiles and removes duplicates.
/// The returned tiles are sorted by endpoints.
fn prepare(tiles: &[Tile], kind: TileLayerKind) -> (Vec<Tile>, Vec<BuildWarning>) {
    let mut warnings = Vec::new();
    let mut prepared: Vec<Tile> = Vec::with_capacity(tiles.len());

    for tile in tiles {
        let (normalized, degenerate) = match kind {
            TileLayerKind::Face => {
                let rect = face_rect(tile);
                (rect, rect.from.x == rect.to.x || rect.from.y == rect.to.y)
            }
            TileLayerKind::Edge => (tile.normalized(), tile.is_degenerate()),
        };
        if degenerate {
            warn!(%tile, "skipping degenerate tile");
            warnings.push(BuildWarning::DegenerateTile(*tile));
            continue;
        }
        prepared.push(normalized);
    }

    prepared.sort_by_key(Tile::sort_key);
    let mut duplicates = Vec::new();
    prepared.dedup_by(|current, kept| {
        let duplicate = current == kept;
        if duplicate {
            duplicates.push(*current);
        }
        duplicate
    });
    for tile in duplicates {
        warn!(%tile, "ignoring duplicate tile");
        warnings.push(BuildWarning::DuplicateTile(tile));
    }

    (prepared, warnings)
}

/// The cell rectangle of a face tile with `from` at the lower corner.
fn face_rect(tile: &Tile) -> Tile {
    Tile::new(
        IntPoint2::new(tile.from.x.min(tile.to.x), tile.from.y.min(tile.to.y)),
        IntPoint2::new(tile.from.x.max(tile.to.x), tile.from.y.max(tile.to.y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(fx: i32, fy: i32, tx: i32, ty: i32) -> Tile {
        Tile::new(IntPoint2::new(fx, fy), IntPoint2::new(tx, ty))
    }

    #[test]
    fn degenerate_tiles_are_reported_and_dropped() {
        let tiles = vec![edge(0, 0, 1, 0), edge(2, 2, 2, 2)];
        let result = TileOptimizer::new(TileLayerKind::Edge).execute(&tiles);
        assert_eq!(result.tiles, vec![edge(0, 0, 1, 0)]);
        assert_eq!(result.warnings, vec![BuildWarning::DegenerateTile(edge(2, 2, 2, 2))]);
    }

    #[test]
    fn zero_area_face_tile_is_degenerate() {
        let tiles = vec![edge(0, 0, 3, 0)];
        let result = TileOptimizer::new(TileLayerKind::Face).execute(&tiles);
        assert!(result.tiles.is_empty());
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn duplicates_are_removed() {
        let tiles = vec![edge(0, 0, 1, 0), edge(1, 0, 0, 0), edge(0, 0, 1, 0)];
        let result = TileOptimizer::new(TileLayerKind::Edge).execute(&tiles);
        assert_eq!(result.tiles, vec![edge(0, 0, 1, 0)]);
        assert_eq!(result.warnings.len(), 2);
        assert!(result
            .warnings
            .iter()
            .all(|w| matches!(w, BuildWarning::DuplicateTile(_))));
    }

    #[test]
    fn diagonal_edge_tiles_are_stable() {
        let once = optimize_tiles(&[edge(0, 1, 1, 0)], TileLayerKind::Edge);
        let twice = optimize_tiles(&once, TileLayerKind::Edge);
        assert_eq!(once, vec![edge(0, 1, 1, 0)]);
        assert_eq!(twice, once);

        // Both orientations of the same diagonal collapse into one tile.
        let result =
            TileOptimizer::new(TileLayerKind::Edge).execute(&[edge(1, 0, 0, 1), edge(0, 1, 1, 0)]);
        assert_eq!(result.tiles, vec![edge(0, 1, 1, 0)]);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn collinear_diagonals_merge() {
        let tiles = [edge(2, 0, 1, 1), edge(1, 1, 0, 2)];
        assert_eq!(optimize_tiles(&tiles, TileLayerKind::Edge), vec![edge(0, 2, 2, 0)]);
    }

    #[test]
    fn face_tiles_are_normalized_to_lower_corner() {
        let flipped = edge(1, 1, 0, 0);
        assert_eq!(optimize_tiles(&[flipped], TileLayerKind::Face), vec![Tile::cell(0, 0)]);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(optimize_tiles(&[], TileLayerKind::Edge).is_empty());
        assert!(optimize_tiles(&[], TileLayerKind::Face).is_empty());
    }
}
