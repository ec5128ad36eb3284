use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::utils::ModifiedTime;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// The kind of a cell of a [`PolyMesh`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// A single point.
    Vertex,
    /// A set of unconnected points.
    PolyVertex,
    /// A segment between two points.
    Line,
    /// A chain of connected segments.
    PolyLine,
    /// A triangle.
    Triangle,
    /// A planar quadrilateral.
    Quad,
    /// A planar polygon with any number of vertices.
    Polygon,
    /// A strip of triangles sharing consecutive edges.
    TriangleStrip,
}

impl CellKind {
    /// Is `len` an acceptable number of points for a cell of this kind?
    pub fn accepts_len(self, len: usize) -> bool {
        match self {
            CellKind::Vertex => len == 1,
            CellKind::PolyVertex => len >= 1,
            CellKind::Line => len == 2,
            CellKind::PolyLine => len >= 2,
            CellKind::Triangle => len == 3,
            CellKind::Quad => len == 4,
            CellKind::Polygon | CellKind::TriangleStrip => len >= 3,
        }
    }

    /// Does this kind of cell cover a surface?
    pub fn is_surface(self) -> bool {
        matches!(
            self,
            CellKind::Triangle | CellKind::Quad | CellKind::Polygon | CellKind::TriangleStrip
        )
    }

    /// The number of triangles a cell of this kind with `len` points decomposes into.
    pub fn num_triangles(self, len: usize) -> usize {
        if self.is_surface() {
            len.saturating_sub(2)
        } else {
            0
        }
    }
}

/// Indicated an inconsistency while building or editing a polygonal mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PolyMeshError {
    /// A cell references a point that does not exist.
    #[error("the cell {cell} references the point {point} but the mesh only has {num_points} points.")]
    PointIndexOutOfBounds {
        /// The offending cell.
        cell: u32,
        /// The offending point index.
        point: u32,
        /// The number of points of the mesh.
        num_points: u32,
    },
    /// A cell has a number of points incompatible with its kind.
    #[error("a cell of kind {kind:?} cannot have {len} points.")]
    InvalidCellSize {
        /// The kind of the offending cell.
        kind: CellKind,
        /// The number of points it was given.
        len: usize,
    },
    /// A per-cell array does not have one entry per cell.
    #[error("expected {expected} per-cell values, found {found}.")]
    CellArrayLengthMismatch {
        /// The number of cells of the mesh.
        expected: usize,
        /// The number of values given.
        found: usize,
    },
}

/// A polygonal mesh: a set of points and a set of cells referencing them.
///
/// Cells are stored as a kind, an offset and a slice of a flat connectivity buffer. The mesh
/// also carries named integer arrays that are not attached to points or cells (its "field
/// data"), optional per-cell RGBA colors, and a modification watermark that is refreshed by
/// every mutation.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct PolyMesh {
    points: Vec<Point<Real>>,
    kinds: Vec<CellKind>,
    offsets: Vec<u32>,
    connectivity: Vec<u32>,
    field_arrays: BTreeMap<String, Vec<u32>>,
    cell_colors: Option<Vec<[u8; 4]>>,
    mtime: ModifiedTime,
}

impl Default for PolyMesh {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PolyMesh {
    /// Creates a mesh with the given points and no cells.
    pub fn new(points: Vec<Point<Real>>) -> Self {
        Self {
            points,
            kinds: Vec::new(),
            offsets: vec![0],
            connectivity: Vec::new(),
            field_arrays: BTreeMap::new(),
            cell_colors: None,
            mtime: ModifiedTime::now(),
        }
    }

    /// Creates a mesh made of triangles only.
    pub fn from_triangles(
        points: Vec<Point<Real>>,
        triangles: &[[u32; 3]],
    ) -> Result<Self, PolyMeshError> {
        let mut result = Self::new(points);
        result.kinds.reserve(triangles.len());
        result.connectivity.reserve(triangles.len() * 3);

        for tri in triangles {
            let _ = result.push_cell(CellKind::Triangle, tri)?;
        }

        Ok(result)
    }

    /// Appends a point and returns its index.
    pub fn push_point(&mut self, pt: Point<Real>) -> u32 {
        self.points.push(pt);
        self.mtime.modified();
        self.points.len() as u32 - 1
    }

    /// Appends a cell and returns its index.
    ///
    /// Fails if the number of point ids doesn't match the cell kind, or if any id is out of
    /// bounds. The mesh is left unchanged on failure.
    pub fn push_cell(&mut self, kind: CellKind, point_ids: &[u32]) -> Result<u32, PolyMeshError> {
        if !kind.accepts_len(point_ids.len()) {
            return Err(PolyMeshError::InvalidCellSize {
                kind,
                len: point_ids.len(),
            });
        }

        let cell = self.kinds.len() as u32;
        let num_points = self.points.len() as u32;

        if let Some(point) = point_ids.iter().copied().find(|id| *id >= num_points) {
            return Err(PolyMeshError::PointIndexOutOfBounds {
                cell,
                point,
                num_points,
            });
        }

        self.kinds.push(kind);
        self.connectivity.extend_from_slice(point_ids);
        self.offsets.push(self.connectivity.len() as u32);

        if let Some(colors) = &mut self.cell_colors {
            colors.push([255; 4]);
        }

        self.mtime.modified();
        Ok(cell)
    }

    /// Replaces all the points of this mesh, keeping its cells.
    ///
    /// Fails if the new point set is too small for the existing connectivity.
    pub fn set_points(&mut self, points: Vec<Point<Real>>) -> Result<(), PolyMeshError> {
        let num_points = points.len() as u32;

        for cell in 0..self.num_cells() as u32 {
            if let Some(point) = self
                .cell_point_ids(cell)
                .iter()
                .copied()
                .find(|id| *id >= num_points)
            {
                return Err(PolyMeshError::PointIndexOutOfBounds {
                    cell,
                    point,
                    num_points,
                });
            }
        }

        self.points = points;
        self.mtime.modified();
        Ok(())
    }

    /// The number of points of this mesh.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The number of cells of this mesh.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.kinds.len()
    }

    /// Does this mesh have no cells?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    /// The `i`-th point of this mesh.
    #[inline]
    pub fn point(&self, i: u32) -> &Point<Real> {
        &self.points[i as usize]
    }

    /// All the points of this mesh.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The kind of the `i`-th cell.
    #[inline]
    pub fn cell_kind(&self, i: u32) -> CellKind {
        self.kinds[i as usize]
    }

    /// The ids of the points of the `i`-th cell.
    #[inline]
    pub fn cell_point_ids(&self, i: u32) -> &[u32] {
        let start = self.offsets[i as usize] as usize;
        let end = self.offsets[i as usize + 1] as usize;
        &self.connectivity[start..end]
    }

    /// The points of the `i`-th cell.
    #[inline]
    pub fn cell_points(&self, i: u32) -> impl ExactSizeIterator<Item = &Point<Real>> + '_ {
        self.cell_point_ids(i)
            .iter()
            .map(|id| &self.points[*id as usize])
    }

    /// Iterates through the kind and point ids of every cell.
    pub fn cells(&self) -> impl ExactSizeIterator<Item = (CellKind, &[u32])> + '_ {
        (0..self.num_cells() as u32).map(|i| (self.cell_kind(i), self.cell_point_ids(i)))
    }

    /// Decomposes the `i`-th cell into triangles, given as triples of point ids.
    ///
    /// Triangles, quads and polygons are decomposed as a fan around their first vertex.
    /// Triangle strips alternate the winding of every other triangle so all the triangles
    /// share the orientation of the first one. Vertex and line cells have no triangles.
    pub fn cell_triangles(&self, i: u32) -> impl Iterator<Item = [u32; 3]> + '_ {
        let kind = self.cell_kind(i);
        let ids = self.cell_point_ids(i);

        (0..kind.num_triangles(ids.len())).map(move |k| {
            if kind == CellKind::TriangleStrip {
                if k % 2 == 0 {
                    [ids[k], ids[k + 1], ids[k + 2]]
                } else {
                    [ids[k + 1], ids[k], ids[k + 2]]
                }
            } else {
                [ids[0], ids[k + 1], ids[k + 2]]
            }
        })
    }

    /// The axis-aligned bounding box of all the points of this mesh.
    ///
    /// This is an invalid AABB (see [`Aabb::is_valid`]) if the mesh has no points.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }

    /// The named integer array `name` of this mesh, if any.
    pub fn field_array(&self, name: &str) -> Option<&[u32]> {
        self.field_arrays.get(name).map(|a| &a[..])
    }

    /// Sets (or replaces) the named integer array `name`.
    pub fn set_field_array(&mut self, name: impl Into<String>, values: Vec<u32>) {
        let _ = self.field_arrays.insert(name.into(), values);
        self.mtime.modified();
    }

    /// The per-cell RGBA colors of this mesh, if any.
    pub fn cell_colors(&self) -> Option<&[[u8; 4]]> {
        self.cell_colors.as_deref()
    }

    /// Sets one RGBA color per cell.
    pub fn set_cell_colors(&mut self, colors: Vec<[u8; 4]>) -> Result<(), PolyMeshError> {
        if colors.len() != self.num_cells() {
            return Err(PolyMeshError::CellArrayLengthMismatch {
                expected: self.num_cells(),
                found: colors.len(),
            });
        }

        self.cell_colors = Some(colors);
        self.mtime.modified();
        Ok(())
    }

    /// The last time this mesh was modified.
    #[inline]
    pub fn mtime(&self) -> ModifiedTime {
        self.mtime
    }

    /// Marks this mesh as modified.
    ///
    /// All the mutating methods of this mesh do this automatically.
    pub fn modified(&mut self) {
        self.mtime.modified();
    }
}
