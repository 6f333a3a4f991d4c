use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::math::{normalize_or_zero, Point2, Point3, Vector3, TOLERANCE};
use crate::mesh::MeshAssembler;
use crate::optimize::{TileLayerKind, TileOptimizer};
use crate::tile::{AdjacencyInfo, AdjacencyResolver, Tile, TileToLocal};

use super::subwall::SubwallProfile;
use super::MeshBuild;

/// Configuration of a wall (edge) layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub wall_height: f32,
    pub wall_width: f32,
    /// Stacked profiles, one sub-mesh each, in declaration order.
    pub subwalls: Vec<SubwallProfile>,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            wall_height: 3.0,
            wall_width: 0.25,
            subwalls: vec![SubwallProfile::default()],
        }
    }
}

impl WallConfig {
    #[must_use]
    pub fn new(wall_height: f32, wall_width: f32, subwalls: Vec<SubwallProfile>) -> Self {
        Self {
            wall_height,
            wall_width,
            subwalls,
        }
    }

    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if no subwalls are configured, a
    /// dimension is not finite or negative, or any subwall is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.subwalls.is_empty() {
            return Err(ConfigurationError::NoSubwalls.into());
        }
        for (parameter, value) in [
            ("wall_height", self.wall_height),
            ("wall_width", self.wall_width),
        ] {
            if !value.is_finite() {
                return Err(ConfigurationError::NotFinite { parameter, value }.into());
            }
        }
        for (parameter, value) in [
            ("wall_height", self.wall_height),
            ("wall_width", self.wall_width),
        ] {
            if value < 0.0 {
                return Err(ConfigurationError::ParameterOutOfRange {
                    parameter,
                    value,
                    min: 0.0,
                    max: f32::MAX,
                }
                .into());
            }
        }
        for (index, subwall) in self.subwalls.iter().enumerate() {
            subwall.validate(index)?;
        }
        Ok(())
    }
}

/// Horizontal pull-in or push-out of each side at one end of a tile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SideOffsets {
    left: Vector3,
    right: Vector3,
}

impl SideOffsets {
    /// Miter offsets at one end. `inward` points back along the tile,
    /// `outward` past the end.
    ///
    /// The side a turning tile leaves toward is pulled in by half the wall
    /// width; the other side is pushed out to close the outer corner unless a
    /// straight continuation already covers it.
    fn at_end(info: &AdjacencyInfo, inward: Vector3, outward: Vector3) -> Self {
        let extend = if info.straight {
            Vector3::zeros()
        } else {
            outward
        };
        match (info.left, info.right) {
            (true, true) => Self {
                left: inward,
                right: inward,
            },
            (true, false) => Self {
                left: inward,
                right: extend,
            },
            (false, true) => Self {
                left: extend,
                right: inward,
            },
            (false, false) => Self::default(),
        }
    }
}

/// Local-space layout of one tile, shared by every subwall.
#[derive(Debug, Clone, Copy)]
struct TileFrame {
    from: Point3,
    to: Point3,
    /// Half-width vector toward the tile's left side.
    perp: Vector3,
    head: SideOffsets,
    tail: SideOffsets,
    head_cap: bool,
    tail_cap: bool,
}

impl TileFrame {
    fn new<P>(tile: &Tile, resolver: &AdjacencyResolver<'_>, placement: &P, half_width: f32) -> Self
    where
        P: TileToLocal + ?Sized,
    {
        let from = placement.tile_to_local(tile.from);
        let to = placement.tile_to_local(tile.to);
        let delta = to - from;
        let forward = normalize_or_zero(&Vector3::new(delta.x, 0.0, delta.z));
        let perp = Vector3::new(-forward.z, 0.0, forward.x) * half_width;
        let along = forward * half_width;

        let adjacency = resolver.resolve(tile);
        Self {
            from,
            to,
            perp,
            head: SideOffsets::at_end(&adjacency.head, -along, along),
            tail: SideOffsets::at_end(&adjacency.tail, along, -along),
            head_cap: adjacency.head.is_open(),
            tail_cap: adjacency.tail.is_open(),
        }
    }
}

/// Which world axis feeds the `u` texture coordinate of a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UvAxis {
    X,
    Z,
}

impl UvAxis {
    /// Uses `z` when the edge runs at constant `x`, otherwise `x`.
    fn for_edge(a: &Point3, b: &Point3) -> Self {
        if (a.x - b.x).abs() < TOLERANCE {
            Self::Z
        } else {
            Self::X
        }
    }

    fn uv(self, p: &Point3, scale: f32) -> Point2 {
        let u = match self {
            Self::X => p.x,
            Self::Z => p.z,
        };
        Point2::new(u * scale, p.y * scale)
    }
}

/// One face of a tile between two base points, each pushed out by its own
/// horizontal direction.
struct SideFace {
    a: Point3,
    a_dir: Vector3,
    b: Point3,
    b_dir: Vector3,
    look_forward: bool,
}

/// Extrudes optimized edge tiles into stacked subwall geometry.
#[derive(Debug)]
pub struct WallMesh<'a, P: ?Sized> {
    config: &'a WallConfig,
    placement: &'a P,
}

impl<'a, P> WallMesh<'a, P>
where
    P: TileToLocal + ?Sized,
{
    #[must_use]
    pub fn new(config: &'a WallConfig, placement: &'a P) -> Self {
        Self { config, placement }
    }

    /// Builds the wall mesh for `tiles`.
    ///
    /// Tiles are optimized first; degenerate and duplicate tiles are skipped
    /// and reported as warnings. The result has one sub-mesh per subwall.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the configuration is invalid; no
    /// geometry is produced in that case.
    pub fn execute(&self, tiles: &[Tile]) -> Result<MeshBuild> {
        self.config.validate()?;

        let optimized = TileOptimizer::new(TileLayerKind::Edge).execute(tiles);
        let resolver = AdjacencyResolver::new(&optimized.tiles);
        let half_width = self.config.wall_width * 0.5;
        let frames: Vec<TileFrame> = optimized
            .tiles
            .iter()
            .map(|tile| TileFrame::new(tile, &resolver, self.placement, half_width))
            .collect();

        let mut assembler = MeshAssembler::new();
        for subwall in &self.config.subwalls {
            assembler.begin_sub_mesh(subwall.material.clone())?;
            for frame in &frames {
                self.extrude_tile(subwall, frame, &mut assembler)?;
            }
            assembler.end_sub_mesh()?;
        }

        Ok(MeshBuild {
            mesh: assembler.finish()?,
            warnings: optimized.warnings,
        })
    }

    fn extrude_tile(
        &self,
        subwall: &SubwallProfile,
        frame: &TileFrame,
        assembler: &mut MeshAssembler,
    ) -> Result<()> {
        let perp = frame.perp;
        let mut faces = vec![
            SideFace {
                a: frame.from,
                a_dir: perp + frame.tail.left,
                b: frame.to,
                b_dir: perp + frame.head.left,
                look_forward: true,
            },
            SideFace {
                a: frame.from,
                a_dir: -perp + frame.tail.right,
                b: frame.to,
                b_dir: -perp + frame.head.right,
                look_forward: false,
            },
        ];
        if frame.head_cap {
            faces.push(SideFace {
                a: frame.to,
                a_dir: perp + frame.head.left,
                b: frame.to,
                b_dir: -perp + frame.head.right,
                look_forward: true,
            });
        }
        if frame.tail_cap {
            faces.push(SideFace {
                a: frame.from,
                a_dir: perp + frame.tail.left,
                b: frame.from,
                b_dir: -perp + frame.tail.right,
                look_forward: false,
            });
        }

        for face in &faces {
            self.extrude_face(subwall, face, assembler)?;
        }
        Ok(())
    }

    /// Emits `steps` strips up the face. Smooth profiles reuse the previous
    /// strip's top edge as the next strip's bottom edge.
    #[allow(clippy::cast_precision_loss)]
    fn extrude_face(
        &self,
        subwall: &SubwallProfile,
        face: &SideFace,
        assembler: &mut MeshAssembler,
    ) -> Result<()> {
        let steps = subwall.steps as f32;
        let mut previous_top: Option<[u32; 2]> = None;

        for step in 0..subwall.steps {
            let percent = step as f32 / steps;
            let next = (step + 1) as f32 / steps;

            let [a_bottom, b_bottom] = self.edge_at(subwall, face, percent);
            let [a_top, b_top] = self.edge_at(subwall, face, next);
            let bottom_color = subwall.vertex_color_gradient.evaluate(percent);
            let top_color = subwall.vertex_color_gradient.evaluate(next);
            let uv_axis = UvAxis::for_edge(&a_bottom, &b_bottom);
            let uv = |p: &Point3| uv_axis.uv(p, subwall.uv_scale);

            let bottom = match previous_top {
                Some(shared) if subwall.smooth_steps => shared,
                _ => [
                    assembler.push_vertex(a_bottom, uv(&a_bottom), bottom_color)?,
                    assembler.push_vertex(b_bottom, uv(&b_bottom), bottom_color)?,
                ],
            };
            let top = [
                assembler.push_vertex(a_top, uv(&a_top), top_color)?,
                assembler.push_vertex(b_top, uv(&b_top), top_color)?,
            ];

            let [ab, bb] = bottom;
            let [at, bt] = top;
            if face.look_forward {
                assembler.push_triangle(ab, bb, at)?;
                assembler.push_triangle(at, bb, bt)?;
            } else {
                assembler.push_triangle(ab, at, bb)?;
                assembler.push_triangle(at, bt, bb)?;
            }
            previous_top = Some(top);
        }
        Ok(())
    }

    /// Both base points of `face` at height fraction `percent`.
    fn edge_at(&self, subwall: &SubwallProfile, face: &SideFace, percent: f32) -> [Point3; 2] {
        let up = Vector3::y() * subwall.height_at(percent, self.config.wall_height);
        let width = subwall.width_curve.evaluate(percent);
        let offset = |dir: &Vector3| dir + normalize_or_zero(dir) * width;
        [
            face.a + offset(&face.a_dir) + up,
            face.b + offset(&face.b_dir) + up,
        ]
    }
}

/// Builds a wall mesh for `tiles` with the given placement.
///
/// # Errors
///
/// See [`WallMesh::execute`].
pub fn build_wall_mesh<P>(tiles: &[Tile], config: &WallConfig, placement: &P) -> Result<MeshBuild>
where
    P: TileToLocal + ?Sized,
{
    WallMesh::new(config, placement).execute(tiles)
}
