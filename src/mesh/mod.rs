mod colorer;

pub use colorer::VerticalGradientColorer;

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::math::gradient::Color;
use crate::math::{normalize_or_zero, Point2, Point3, Vector3, Vector4};

/// A contiguous range of the triangle index list rendered with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubMeshRange {
    /// Offset into [`MeshBuffer::triangles`].
    pub start: usize,
    /// Number of indices (a multiple of 3).
    pub count: usize,
}

impl SubMeshRange {
    #[must_use]
    pub fn end(&self) -> usize {
        self.start + self.count
    }
}

/// An indexed triangle mesh with per-vertex attributes and material ranges.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshBuffer {
    pub vertices: Vec<Point3>,
    /// Triangle indices, three per triangle, counter-clockwise front faces.
    pub triangles: Vec<u32>,
    pub uvs: Vec<Point2>,
    pub colors: Vec<Color>,
    /// Area-weighted vertex normals.
    pub normals: Vec<Vector3>,
    /// Per-vertex tangents along increasing `u`; `w` is the bitangent sign.
    pub tangents: Vec<Vector4>,
    pub sub_meshes: Vec<SubMeshRange>,
    /// Material per sub-mesh, `None` when unassigned.
    pub materials: Vec<Option<String>>,
}

impl MeshBuffer {
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Iterates triangles as index triples.
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Unnormalized face normal `(b - a) × (c - a)` of triangle `index`.
    #[must_use]
    pub fn face_normal(&self, index: usize) -> Option<Vector3> {
        let tri = self.triangles.get(index * 3..index * 3 + 3)?;
        let a = self.vertices.get(tri[0] as usize)?;
        let b = self.vertices.get(tri[1] as usize)?;
        let c = self.vertices.get(tri[2] as usize)?;
        Some((b - a).cross(&(c - a)))
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty buffer.
    #[must_use]
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(v), max.sup(v))
        }))
    }
}

/// Accumulates geometry into a [`MeshBuffer`], one sub-mesh at a time.
///
/// Indices are checked against the vertices appended so far, and sub-mesh
/// ranges are contiguous by construction.
#[derive(Debug, Default)]
pub struct MeshAssembler {
    buffer: MeshBuffer,
    open_start: Option<usize>,
    open_material: Option<String>,
}

impl MeshAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new sub-mesh.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SubMeshAlreadyOpen`] if the previous sub-mesh was
    /// not ended.
    pub fn begin_sub_mesh(&mut self, material: Option<String>) -> Result<()> {
        if self.open_start.is_some() {
            return Err(MeshError::SubMeshAlreadyOpen.into());
        }
        self.open_start = Some(self.buffer.triangles.len());
        self.open_material = material;
        Ok(())
    }

    /// Closes the open sub-mesh and records its triangle range.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NoOpenSubMesh`] if no sub-mesh is open.
    pub fn end_sub_mesh(&mut self) -> Result<SubMeshRange> {
        let start = self.open_start.take().ok_or(MeshError::NoOpenSubMesh)?;
        let range = SubMeshRange {
            start,
            count: self.buffer.triangles.len() - start,
        };
        self.buffer.sub_meshes.push(range);
        self.buffer.materials.push(self.open_material.take());
        Ok(range)
    }

    /// Appends a vertex and returns its index.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::TooManyVertices`] past the `u32` index range.
    pub fn push_vertex(&mut self, position: Point3, uv: Point2, color: Color) -> Result<u32> {
        let index =
            u32::try_from(self.buffer.vertices.len()).map_err(|_| MeshError::TooManyVertices)?;
        self.buffer.vertices.push(position);
        self.buffer.uvs.push(uv);
        self.buffer.colors.push(color);
        Ok(index)
    }

    /// Appends a triangle of already-appended vertices.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::NoOpenSubMesh`] outside a sub-mesh, or
    /// [`MeshError::IndexOutOfRange`] for an index with no vertex yet.
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) -> Result<()> {
        if self.open_start.is_none() {
            return Err(MeshError::NoOpenSubMesh.into());
        }
        let vertex_count = self.buffer.vertices.len();
        for index in [a, b, c] {
            if index as usize >= vertex_count {
                return Err(MeshError::IndexOutOfRange {
                    index,
                    vertex_count,
                }
                .into());
            }
        }
        self.buffer.triangles.extend_from_slice(&[a, b, c]);
        Ok(())
    }

    /// Computes vertex normals and tangents and returns the finished buffer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::SubMeshAlreadyOpen`] if a sub-mesh is still open.
    pub fn finish(mut self) -> Result<MeshBuffer> {
        if self.open_start.is_some() {
            return Err(MeshError::SubMeshAlreadyOpen.into());
        }
        self.buffer.normals = vertex_normals(&self.buffer);
        self.buffer.tangents = vertex_tangents(&self.buffer);
        debug!(
            vertices = self.buffer.vertices.len(),
            triangles = self.buffer.triangle_count(),
            sub_meshes = self.buffer.sub_meshes.len(),
            "assembled mesh"
        );
        Ok(self.buffer)
    }
}

/// Area-weighted vertex normals; vertices in no triangle get a zero normal.
fn vertex_normals(buffer: &MeshBuffer) -> Vec<Vector3> {
    let mut normals = vec![Vector3::zeros(); buffer.vertices.len()];
    for [a, b, c] in buffer.triangle_indices() {
        let (pa, pb, pc) = (
            buffer.vertices[a as usize],
            buffer.vertices[b as usize],
            buffer.vertices[c as usize],
        );
        let face = (pb - pa).cross(&(pc - pa));
        for i in [a, b, c] {
            normals[i as usize] += face;
        }
    }
    normals.iter().map(normalize_or_zero).collect()
}

/// Tangents from the UV layout, orthogonalized against the vertex normals.
/// Triangles with a degenerate UV mapping contribute nothing.
fn vertex_tangents(buffer: &MeshBuffer) -> Vec<Vector4> {
    let count = buffer.vertices.len();
    let mut tangents = vec![Vector3::zeros(); count];
    let mut bitangents = vec![Vector3::zeros(); count];

    for [a, b, c] in buffer.triangle_indices() {
        let (a, b, c) = (a as usize, b as usize, c as usize);
        let e1 = buffer.vertices[b] - buffer.vertices[a];
        let e2 = buffer.vertices[c] - buffer.vertices[a];
        let d1 = buffer.uvs[b] - buffer.uvs[a];
        let d2 = buffer.uvs[c] - buffer.uvs[a];

        let det = d1.x * d2.y - d2.x * d1.y;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = det.recip();
        let tangent = (e1 * d2.y - e2 * d1.y) * r;
        let bitangent = (e2 * d1.x - e1 * d2.x) * r;
        for i in [a, b, c] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    tangents
        .iter()
        .zip(&bitangents)
        .zip(&buffer.normals)
        .map(|((t, b), n)| {
            let t = normalize_or_zero(&(t - n * n.dot(t)));
            let w = if n.cross(&t).dot(b) < 0.0 { -1.0 } else { 1.0 };
            Vector4::new(t.x, t.y, t.z, w)
        })
        .collect()
}
