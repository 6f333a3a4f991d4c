use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::gradient::Color;
use crate::math::{IntPoint2, Point2, Vector2};
use crate::mesh::{MeshAssembler, VerticalGradientColorer};
use crate::optimize::{TileLayerKind, TileOptimizer};
use crate::tile::{Tile, TileToLocal};

use super::MeshBuild;

/// Configuration of a floor/ceiling (face) layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceConfig {
    /// Flip the winding so the surface faces down.
    pub look_backwards: bool,
    pub uv_scale: Vector2,
    pub material: Option<String>,
    pub vertex_color: Color,
    /// Replaces `vertex_color` with a height gradient when set.
    pub vertex_colorer: Option<VerticalGradientColorer>,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            look_backwards: false,
            uv_scale: Vector2::new(1.0, 1.0),
            material: None,
            vertex_color: Color::WHITE,
            vertex_colorer: None,
        }
    }
}

impl FaceConfig {
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for a non-finite UV scale or an
    /// invalid vertex colorer.
    pub fn validate(&self) -> Result<()> {
        for (parameter, value) in [("uv_scale.x", self.uv_scale.x), ("uv_scale.y", self.uv_scale.y)] {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { parameter, value }.into());
            }
        }
        if let Some(colorer) = &self.vertex_colorer {
            colorer.validate()?;
        }
        Ok(())
    }
}

/// Triangulates optimized face tiles into a flat surface, one quad per tile.
#[derive(Debug)]
pub struct FaceMesh<'a, P: ?Sized> {
    config: &'a FaceConfig,
    placement: &'a P,
}

impl<'a, P> FaceMesh<'a, P>
where
    P: TileToLocal + ?Sized,
{
    #[must_use]
    pub fn new(config: &'a FaceConfig, placement: &'a P) -> Self {
        Self { config, placement }
    }

    /// Builds the surface mesh for `tiles` as a single sub-mesh.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the configuration is invalid.
    pub fn execute(&self, tiles: &[Tile]) -> Result<MeshBuild> {
        self.config.validate()?;
        let optimized = TileOptimizer::new(TileLayerKind::Face).execute(tiles);

        let mut assembler = MeshAssembler::new();
        assembler.begin_sub_mesh(self.config.material.clone())?;
        for tile in &optimized.tiles {
            self.emit_quad(tile, &mut assembler)?;
        }
        assembler.end_sub_mesh()?;

        let mut mesh = assembler.finish()?;
        if let Some(colorer) = &self.config.vertex_colorer {
            colorer.color_mesh(&mut mesh);
        }

        Ok(MeshBuild {
            mesh,
            warnings: optimized.warnings,
        })
    }

    fn emit_quad(&self, tile: &Tile, assembler: &mut MeshAssembler) -> Result<()> {
        let corners = [
            tile.from,
            IntPoint2::new(tile.to.x, tile.from.y),
            tile.to,
            IntPoint2::new(tile.from.x, tile.to.y),
        ];

        let mut indices = [0_u32; 4];
        for (slot, corner) in indices.iter_mut().zip(corners) {
            let position = self.placement.tile_to_local(corner);
            let uv = Point2::new(
                position.x * self.config.uv_scale.x,
                position.z * self.config.uv_scale.y,
            );
            *slot = assembler.push_vertex(position, uv, self.config.vertex_color)?;
        }

        let [i0, i1, i2, i3] = indices;
        if self.config.look_backwards {
            assembler.push_triangle(i0, i1, i2)?;
            assembler.push_triangle(i0, i2, i3)?;
        } else {
            assembler.push_triangle(i0, i2, i1)?;
            assembler.push_triangle(i0, i3, i2)?;
        }
        Ok(())
    }
}

/// Builds a face mesh for `tiles` with the given placement.
///
/// # Errors
///
/// See [`FaceMesh::execute`].
pub fn build_face_mesh<P>(tiles: &[Tile], config: &FaceConfig, placement: &P) -> Result<MeshBuild>
where
    P: TileToLocal + ?Sized,
{
    FaceMesh::new(config, placement).execute(tiles)
}
