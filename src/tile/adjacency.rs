use std::collections::HashMap;

use crate::math::IntPoint2;

use super::{Tile, TileEnd, Touch};

/// What touches one end of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdjacencyInfo {
    /// Some tile touches this end.
    pub any: bool,
    /// A tile continues straight on past this end.
    pub straight: bool,
    /// A tile leaves this end toward the tile's right.
    pub right: bool,
    /// A tile leaves this end toward the tile's left.
    pub left: bool,
}

impl AdjacencyInfo {
    /// A corner or T-junction: both sides are occupied.
    #[must_use]
    pub fn is_corner(&self) -> bool {
        self.left && self.right
    }

    /// No tile touches this end, so the run is open here.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.any
    }
}

/// Adjacency at both ends of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileAdjacency {
    pub head: AdjacencyInfo,
    pub tail: AdjacencyInfo,
}

/// Endpoint index over a tile list for fast neighbor lookups.
#[derive(Debug)]
pub struct AdjacencyResolver<'a> {
    tiles: &'a [Tile],
    by_point: HashMap<IntPoint2, Vec<usize>>,
}

impl<'a> AdjacencyResolver<'a> {
    /// Indexes `tiles` by their endpoints.
    #[must_use]
    pub fn new(tiles: &'a [Tile]) -> Self {
        let mut by_point: HashMap<IntPoint2, Vec<usize>> = HashMap::new();
        for (i, tile) in tiles.iter().enumerate() {
            by_point.entry(tile.from).or_default().push(i);
            if tile.to != tile.from {
                by_point.entry(tile.to).or_default().push(i);
            }
        }
        Self { tiles, by_point }
    }

    /// All touches between `tile` and the indexed tiles.
    pub fn touches<'b>(&'b self, tile: &'b Tile) -> impl Iterator<Item = (&'a Tile, Touch)> + 'b {
        let tiles = self.tiles;
        [tile.from, tile.to]
            .into_iter()
            .filter_map(move |p| self.by_point.get(&p))
            .flatten()
            .filter_map(move |&i| {
                let other = &tiles[i];
                tile.touch_with(other).map(|touch| (other, touch))
            })
    }

    /// Classifies what touches each end of `tile`.
    #[must_use]
    pub fn resolve(&self, tile: &Tile) -> TileAdjacency {
        let right = tile.right_heading();
        let left = tile.left_heading();
        let mut adjacency = TileAdjacency::default();

        for (_, touch) in self.touches(tile) {
            let info = match touch.self_end {
                TileEnd::Head => &mut adjacency.head,
                TileEnd::Tail => &mut adjacency.tail,
            };
            info.any = true;
            if touch.other_direction == touch.self_direction {
                info.straight = true;
            } else if touch.other_direction == right {
                info.right = true;
            } else if touch.other_direction == left {
                info.left = true;
            }
        }

        adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(fx: i32, fy: i32, tx: i32, ty: i32) -> Tile {
        Tile::new(IntPoint2::new(fx, fy), IntPoint2::new(tx, ty))
    }

    #[test]
    fn isolated_tile_is_open_at_both_ends() {
        let tiles = vec![tile(0, 0, 1, 0)];
        let resolver = AdjacencyResolver::new(&tiles);
        let adjacency = resolver.resolve(&tiles[0]);
        assert!(adjacency.head.is_open());
        assert!(adjacency.tail.is_open());
    }

    #[test]
    fn straight_continuation_both_ways() {
        let tiles = vec![tile(0, 0, 1, 0), tile(1, 0, 2, 0), tile(2, 0, 3, 0)];
        let resolver = AdjacencyResolver::new(&tiles);
        let middle = resolver.resolve(&tiles[1]);
        assert!(middle.head.straight && middle.tail.straight);
        assert!(!middle.head.left && !middle.head.right);
    }

    #[test]
    fn t_junction_stem_sees_both_sides() {
        // Stem going up from (1,0), bar along the x axis.
        let tiles = vec![tile(0, 0, 1, 0), tile(1, 0, 2, 0), tile(1, 0, 1, 1)];
        let resolver = AdjacencyResolver::new(&tiles);
        let stem = resolver.resolve(&tiles[2]);
        assert!(stem.tail.is_corner());
        assert!(!stem.tail.straight);
        assert!(stem.head.is_open());
    }

    #[test]
    fn left_turn_at_head() {
        let tiles = vec![tile(0, 0, 1, 0), tile(1, 0, 1, 1)];
        let resolver = AdjacencyResolver::new(&tiles);
        let adjacency = resolver.resolve(&tiles[0]);
        assert!(adjacency.head.left);
        assert!(!adjacency.head.right);
        assert!(adjacency.tail.is_open());
    }

    #[test]
    fn touches_skip_self() {
        let tiles = vec![tile(0, 0, 1, 0), tile(1, 0, 2, 0)];
        let resolver = AdjacencyResolver::new(&tiles);
        let touching: Vec<_> = resolver.touches(&tiles[0]).map(|(t, _)| *t).collect();
        assert_eq!(touching, vec![tiles[1]]);
    }
}
