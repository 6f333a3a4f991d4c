use std::collections::{HashMap, HashSet};

use slotmap::{new_key_type, SlotMap};
use tracing::trace;

use crate::math::IntPoint2;
use crate::tile::{Tile, TileEnd};

new_key_type! {
    struct TileKey;
}

/// Edge tiles keyed by arena slot, indexed by endpoint.
struct EdgeArena {
    tiles: SlotMap<TileKey, Tile>,
    by_point: HashMap<IntPoint2, Vec<TileKey>>,
}

/// A merge planned against the snapshot of one round.
struct PlannedMerge {
    first: TileKey,
    second: TileKey,
    merged: Tile,
}

impl EdgeArena {
    fn new(tiles: Vec<Tile>) -> Self {
        let mut arena = Self {
            tiles: SlotMap::with_capacity_and_key(tiles.len()),
            by_point: HashMap::new(),
        };
        for tile in tiles {
            arena.insert(tile);
        }
        arena
    }

    fn insert(&mut self, tile: Tile) -> TileKey {
        let key = self.tiles.insert(tile);
        self.by_point.entry(tile.from).or_default().push(key);
        self.by_point.entry(tile.to).or_default().push(key);
        key
    }

    fn remove(&mut self, key: TileKey) {
        let Some(tile) = self.tiles.remove(key) else {
            return;
        };
        for point in [tile.from, tile.to] {
            if let Some(keys) = self.by_point.get_mut(&point) {
                keys.retain(|&k| k != key);
                if keys.is_empty() {
                    self.by_point.remove(&point);
                }
            }
        }
    }

    /// Keys ordered by their tile's endpoints, so planning is reproducible.
    fn sorted_keys(&self) -> Vec<TileKey> {
        let mut keys: Vec<TileKey> = self.tiles.keys().collect();
        keys.sort_by_key(|&k| self.tiles[k].sort_key());
        keys
    }

    /// The single straight continuation of `key` past `end`, if the point
    /// at that end is shared with exactly one other tile.
    ///
    /// A point touched by a third tile is a junction and is never merged
    /// away.
    fn continuation(&self, key: TileKey, end: TileEnd) -> Option<(TileKey, Tile)> {
        let tile = &self.tiles[key];
        let point = tile.point(end);
        let mut others = self.by_point.get(&point)?.iter().filter(|&&k| k != key);

        let other_key = *others.next()?;
        if others.next().is_some() {
            return None;
        }

        let other = self.tiles[other_key];
        let touch = tile.touch_with(&other)?;
        if touch.self_direction != touch.other_direction {
            return None;
        }

        let far = other.point(touch.other_end.opposite());
        let merged = match end {
            TileEnd::Head => Tile::new(tile.from, far),
            TileEnd::Tail => Tile::new(far, tile.to),
        };
        Some((other_key, merged))
    }

    /// Plans non-overlapping merges over the current contents.
    fn plan(&self) -> Vec<PlannedMerge> {
        let mut used: HashSet<TileKey> = HashSet::new();
        let mut planned = Vec::new();

        for key in self.sorted_keys() {
            if used.contains(&key) {
                continue;
            }
            for end in [TileEnd::Head, TileEnd::Tail] {
                let Some((other, merged)) = self.continuation(key, end) else {
                    continue;
                };
                if used.contains(&other) {
                    continue;
                }
                used.insert(key);
                used.insert(other);
                planned.push(PlannedMerge {
                    first: key,
                    second: other,
                    merged,
                });
                break;
            }
        }

        planned
    }

    fn apply(&mut self, planned: Vec<PlannedMerge>) {
        for merge in planned {
            trace!(
                first = %self.tiles[merge.first],
                second = %self.tiles[merge.second],
                merged = %merge.merged,
                "merged edge tiles"
            );
            self.remove(merge.first);
            self.remove(merge.second);
            // Overlapping input can rebuild a tile that is already present.
            if !self.contains(&merge.merged) {
                self.insert(merge.merged);
            }
        }
    }

    fn contains(&self, tile: &Tile) -> bool {
        self.by_point
            .get(&tile.from)
            .is_some_and(|keys| keys.iter().any(|&k| self.tiles[k] == *tile))
    }

    fn into_sorted(self) -> Vec<Tile> {
        let mut tiles: Vec<Tile> = self.tiles.into_iter().map(|(_, tile)| tile).collect();
        tiles.sort_by_key(Tile::sort_key);
        tiles
    }
}

/// Merges collinear edge tiles that continue each other through a point no
/// third tile touches. Input tiles must already be normalized and unique.
pub(super) fn merge_runs(tiles: Vec<Tile>) -> Vec<Tile> {
    let mut arena = EdgeArena::new(tiles);
    loop {
        let planned = arena.plan();
        if planned.is_empty() {
            return arena.into_sorted();
        }
        arena.apply(planned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(fx: i32, fy: i32, tx: i32, ty: i32) -> Tile {
        Tile::new(IntPoint2::new(fx, fy), IntPoint2::new(tx, ty))
    }

    #[test]
    fn collinear_run_collapses() {
        let tiles = vec![edge(0, 0, 1, 0), edge(1, 0, 2, 0), edge(2, 0, 3, 0)];
        assert_eq!(merge_runs(tiles), vec![edge(0, 0, 3, 0)]);
    }

    #[test]
    fn long_vertical_run_collapses() {
        let tiles = (0..9).map(|y| edge(4, y, 4, y + 1)).collect();
        assert_eq!(merge_runs(tiles), vec![edge(4, 0, 4, 9)]);
    }

    #[test]
    fn corner_is_kept() {
        let tiles = vec![edge(0, 0, 1, 0), edge(1, 0, 1, 1)];
        assert_eq!(merge_runs(tiles.clone()), tiles);
    }

    #[test]
    fn junction_blocks_merge() {
        let tiles = vec![edge(0, 0, 1, 0), edge(1, 0, 2, 0), edge(1, 0, 1, 1)];
        let mut expected = tiles.clone();
        expected.sort_by_key(Tile::sort_key);
        assert_eq!(merge_runs(tiles), expected);
    }

    #[test]
    fn runs_merge_up_to_the_junction() {
        let tiles = vec![
            edge(0, 0, 1, 0),
            edge(1, 0, 2, 0),
            edge(2, 0, 3, 0),
            edge(3, 0, 4, 0),
            edge(2, 0, 2, 1),
            edge(2, 1, 2, 2),
        ];
        assert_eq!(
            merge_runs(tiles),
            vec![edge(0, 0, 2, 0), edge(2, 0, 2, 2), edge(2, 0, 4, 0)]
        );
    }

    #[test]
    fn merge_onto_existing_tile_keeps_one_copy() {
        let tiles = vec![edge(0, 0, 1, 0), edge(0, 0, 2, 0), edge(1, 0, 2, 0)];
        assert_eq!(merge_runs(tiles), vec![edge(0, 0, 2, 0)]);
    }

    #[test]
    fn disjoint_collinear_tiles_stay_apart() {
        let tiles = vec![edge(0, 0, 1, 0), edge(2, 0, 3, 0)];
        assert_eq!(merge_runs(tiles.clone()), tiles);
    }
}
