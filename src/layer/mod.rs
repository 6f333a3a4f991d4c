pub mod face;
pub mod map;
pub mod subwall;
pub mod wall;

pub use face::{build_face_mesh, FaceConfig, FaceMesh};
pub use map::{asset_name, BuiltLayer, Map};
pub use subwall::SubwallProfile;
pub use wall::{build_wall_mesh, WallConfig, WallMesh};

use serde::{Deserialize, Serialize};

use crate::error::{BuildWarning, Result};
use crate::mesh::MeshBuffer;
use crate::optimize::TileLayerKind;
use crate::tile::{GridPlacement, TileSet};

/// A finished mesh together with the non-fatal problems met building it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuild {
    pub mesh: MeshBuffer,
    pub warnings: Vec<BuildWarning>,
}

/// What a layer generates from its tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    /// A flat surface of cells.
    Face(FaceConfig),
    /// Walls along grid lines.
    Edge(WallConfig),
}

impl LayerKind {
    #[must_use]
    pub fn tile_kind(&self) -> TileLayerKind {
        match self {
            Self::Face(_) => TileLayerKind::Face,
            Self::Edge(_) => TileLayerKind::Edge,
        }
    }
}

/// A named set of painted tiles and how to mesh them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub placement: GridPlacement,
    #[serde(default)]
    pub tiles: TileSet,
    pub kind: LayerKind,
}

impl Layer {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: LayerKind) -> Self {
        Self {
            name: name.into(),
            placement: GridPlacement::default(),
            tiles: TileSet::new(),
            kind,
        }
    }

    #[must_use]
    pub fn with_tiles(mut self, tiles: TileSet) -> Self {
        self.tiles = tiles;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: GridPlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Height of the generated geometry above the layer plane.
    #[must_use]
    pub fn height(&self) -> f32 {
        match &self.kind {
            LayerKind::Face(_) => 0.0,
            LayerKind::Edge(config) => config.wall_height,
        }
    }

    /// Builds this layer's mesh.
    ///
    /// # Errors
    ///
    /// Returns a configuration error from the face or wall builder.
    pub fn build(&self) -> Result<MeshBuild> {
        match &self.kind {
            LayerKind::Face(config) => build_face_mesh(&self.tiles, config, &self.placement),
            LayerKind::Edge(config) => build_wall_mesh(&self.tiles, config, &self.placement),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::IntPoint2;
    use crate::tile::Tile;

    #[test]
    fn dispatches_on_kind() {
        let floor = Layer::new("Floor", LayerKind::Face(FaceConfig::default()))
            .with_tiles(vec![Tile::cell(0, 0)]);
        assert_eq!(floor.build().unwrap().mesh.triangle_count(), 2);
        assert_eq!(floor.kind.tile_kind(), TileLayerKind::Face);

        let walls = Layer::new("Walls", LayerKind::Edge(WallConfig::default()))
            .with_tiles(vec![Tile::new(IntPoint2::new(1, 0), IntPoint2::new(0, 0))]);
        assert_eq!(walls.build().unwrap().mesh.triangle_count(), 8);
        assert_eq!(walls.kind.tile_kind(), TileLayerKind::Edge);
        assert!((walls.height() - 3.0).abs() < f32::EPSILON);
    }
}
