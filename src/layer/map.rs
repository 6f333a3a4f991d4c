use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

use super::{Layer, MeshBuild};

/// Name under which a layer's mesh is stored: the owner's path with `/`
/// turned into `_` and spaces removed, followed by `_<layer_name>`.
#[must_use]
pub fn asset_name(owner_path: &str, layer_name: &str) -> String {
    let owner: String = owner_path
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| if c == '/' { '_' } else { c })
        .collect();
    format!("{owner}_{layer_name}")
}

/// A layer's build result.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltLayer {
    pub name: String,
    pub asset_name: String,
    pub build: MeshBuild,
}

/// An ordered stack of layers built together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Map {
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Map {
    #[must_use]
    pub fn new(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// Looks up a layer by name.
    #[must_use]
    pub fn layer(&self, name: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.name == name)
    }

    /// Builds every layer that has tiles, in order. Layers without tiles are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Stops at the first layer whose configuration is invalid.
    pub fn build(&self, owner_path: &str) -> Result<Vec<BuiltLayer>> {
        let mut built = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            if layer.tiles.is_empty() {
                debug!(layer = %layer.name, "skipping layer without tiles");
                continue;
            }
            let build = layer.build()?;
            built.push(BuiltLayer {
                name: layer.name.clone(),
                asset_name: asset_name(owner_path, &layer.name),
                build,
            });
        }
        Ok(built)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{ConfigurationError, TilemeshError};
    use crate::layer::{FaceConfig, LayerKind, WallConfig};
    use crate::math::IntPoint2;
    use crate::tile::Tile;

    #[test]
    fn asset_name_flattens_path() {
        assert_eq!(asset_name("Level 1/Ground Floor", "Walls"), "Level1_GroundFloor_Walls");
        assert_eq!(asset_name("", "Floor"), "_Floor");
    }

    #[test]
    fn empty_layers_are_skipped() {
        let map = Map::new(vec![
            Layer::new("Floor", LayerKind::Face(FaceConfig::default()))
                .with_tiles(vec![Tile::cell(0, 0)]),
            Layer::new("Walls", LayerKind::Edge(WallConfig::default())),
        ]);
        let built = map.build("Root").unwrap();
        assert_eq!(built.len(), 1);
        assert_eq!(built[0].name, "Floor");
        assert_eq!(built[0].asset_name, "Root_Floor");
        assert!(map.layer("Walls").is_some());
    }

    #[test]
    fn invalid_layer_fails_the_build() {
        let map = Map::new(vec![Layer::new(
            "Walls",
            LayerKind::Edge(WallConfig::new(3.0, 0.25, Vec::new())),
        )
        .with_tiles(vec![Tile::new(IntPoint2::new(0, 0), IntPoint2::new(1, 0))])]);
        let err = map.build("Root").unwrap_err();
        assert!(matches!(
            err,
            TilemeshError::Configuration(ConfigurationError::NoSubwalls)
        ));
    }
}
