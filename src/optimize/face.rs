use std::collections::HashMap;

use tracing::trace;

use crate::math::IntPoint2;
use crate::tile::Tile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// Where a tile continuing `tile` along this axis must start.
    fn continuation_start(self, tile: &Tile) -> IntPoint2 {
        match self {
            Self::Horizontal => IntPoint2::new(tile.to.x, tile.from.y),
            Self::Vertical => IntPoint2::new(tile.from.x, tile.to.y),
        }
    }

    /// Both rectangles cover the same span across this axis.
    fn same_extent(self, tile: &Tile, other: &Tile) -> bool {
        match self {
            Self::Horizontal => tile.to.y == other.to.y,
            Self::Vertical => tile.to.x == other.to.x,
        }
    }
}

/// Merges face rectangles that abut along `axis` with identical cross
/// extents, until no more merges are possible.
///
/// Each round plans merges on a sorted snapshot, pairing every rectangle at
/// most once, then writes the merged set into a fresh buffer.
pub(super) fn merge_runs(mut tiles: Vec<Tile>, axis: Axis) -> Vec<Tile> {
    loop {
        tiles.sort_by_key(Tile::sort_key);

        let mut by_start: HashMap<IntPoint2, Vec<usize>> = HashMap::new();
        for (i, tile) in tiles.iter().enumerate() {
            by_start.entry(tile.from).or_default().push(i);
        }

        let mut consumed = vec![false; tiles.len()];
        let mut next = Vec::with_capacity(tiles.len());

        for (i, tile) in tiles.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            let partner = by_start
                .get(&axis.continuation_start(tile))
                .into_iter()
                .flatten()
                .copied()
                .find(|&j| j != i && !consumed[j] && axis.same_extent(tile, &tiles[j]));

            if let Some(j) = partner {
                consumed[i] = true;
                consumed[j] = true;
                let merged = Tile::new(tile.from, tiles[j].to);
                trace!(%tile, other = %tiles[j], %merged, "merged face tiles");
                next.push(merged);
            }
        }

        if next.is_empty() {
            return tiles;
        }

        next.extend(
            tiles
                .iter()
                .zip(&consumed)
                .filter_map(|(tile, &used)| (!used).then_some(*tile)),
        );
        tiles = next;
    }
}
