use super::{ObbNode, ObbNodeIndex, ObbTree, ObbTreeError};
use crate::math::{HomogeneousMatrix, Point, Real};
use crate::query::{self, sat, Ray, Sense};
use crate::shape::{CellKind, PolyMesh, Triangle};
use alloc::vec::Vec;

/// A crossing between a segment and the surface of the mesh of an [`ObbTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LineHit {
    /// Parameter of the crossing along the segment, in `[0, 1]`.
    pub toi: Real,
    /// The crossing point.
    pub point: Point<Real>,
    /// The crossed cell.
    pub cell_id: u32,
    /// Whether the segment enters or exits the surface there.
    pub sense: Sense,
}

/// The ordered crossings between a segment and a closed surface.
///
/// Consecutive crossings have opposite senses, except when two crossings are further apart
/// than the tolerance of the query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LineIntersections {
    /// The crossings, sorted by increasing parameter along the segment.
    pub hits: Vec<LineHit>,
}

impl LineIntersections {
    /// The sense of the first crossing, or `None` if the segment doesn't cross the surface.
    ///
    /// [`Sense::Entering`] means the start of the segment is outside of the surface.
    pub fn first_sense(&self) -> Option<Sense> {
        self.hits.first().map(|hit| hit.sense)
    }

    /// The number of crossings.
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Does the segment miss the surface?
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// The closest intersection between a segment and the cells of the mesh of an [`ObbTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ClosestLineHit {
    /// Parameter of the intersection along the segment, in `[0, 1]`.
    pub toi: Real,
    /// The intersection point.
    pub point: Point<Real>,
    /// The intersected cell.
    pub cell_id: u32,
    /// The sub-element of the cell that was hit (see [`query::CellLineHit::sub_id`]).
    pub sub_id: u32,
}

/// Location of a point relative to a closed surface.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Containment {
    /// The point is inside of the surface.
    Inside,
    /// The point is outside of the surface.
    Outside,
}

/// Rays cast by [`ObbTree::inside_or_outside`] must make at least this cosine with the normal
/// of the facet they aim at, unless no facet does.
const MIN_RAY_FACET_COSINE: Real = 0.1;

impl ObbTree {
    /// Can the segment `[p0, p1]` intersect the box of `node`?
    ///
    /// This is a conservative test along the three axes of the box, with the tolerance of
    /// this tree.
    pub fn line_intersects_node(&self, node: &ObbNode, p0: &Point<Real>, p1: &Point<Real>) -> bool {
        sat::obb_segment_may_intersect(&node.obb, p0, p1, self.config.tolerance)
    }

    /// Does the triangle `(p0, p1, p2)` intersect the box of `node`?
    ///
    /// If `m` is given, the triangle is first transformed by it. This uses the tolerance of
    /// this tree.
    pub fn triangle_intersects_node(
        &self,
        node: &ObbNode,
        p0: &Point<Real>,
        p1: &Point<Real>,
        p2: &Point<Real>,
        m: Option<&HomogeneousMatrix>,
    ) -> bool {
        let triangle = Triangle::new(*p0, *p1, *p2);
        let triangle = match m {
            Some(m) => triangle.transform_by(m),
            None => triangle,
        };
        sat::obb_triangle_intersect(&node.obb, &triangle, self.config.tolerance)
    }

    /// Collects the leaves whose boxes may be crossed by the segment `ray`.
    fn leaves_along_segment(&self, ray: &Ray) -> Vec<ObbNodeIndex> {
        let end = ray.end();
        let mut leaves = Vec::new();
        let mut stack = Vec::with_capacity(self.level as usize + 2);
        stack.push(ObbNodeIndex::ROOT);

        while let Some(id) = stack.pop() {
            let node = &self[id];

            if !self.line_intersects_node(node, &ray.origin, &end) {
                continue;
            }

            match node.children {
                Some([left, right]) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => leaves.push(id),
            }
        }

        leaves
    }

    /// Computes the ordered crossings of the segment `[p0, p1]` with the surface of the mesh.
    ///
    /// The mesh is assumed to be a closed surface with outward-oriented cells. Every surface
    /// cell crossed by the segment yields a crossing, then crossings are sorted along the
    /// segment and a crossing with the same sense as the previously accepted one is dropped if
    /// it is within the tolerance of this tree from it. This absorbs the duplicate crossings
    /// found on edges shared by adjacent cells.
    pub fn intersect_with_line(
        &mut self,
        p0: &Point<Real>,
        p1: &Point<Real>,
    ) -> Result<LineIntersections, ObbTreeError> {
        self.build_locator()?;
        let mesh = self.mesh.clone().ok_or(ObbTreeError::NoMesh)?;
        let ray = Ray::from_segment(p0, p1);
        let length = ray.dir.norm();

        if length == 0.0 {
            return Ok(LineIntersections::default());
        }

        let tolerance = self.config.tolerance;
        let mut hits = Vec::new();

        for leaf in self.leaves_along_segment(&ray) {
            let cells = self[leaf].cells.as_ref().ok_or(ObbTreeError::NoCellLists)?;

            for cell in cells {
                for tri in mesh.cell_triangles(*cell) {
                    let triangle = Triangle::new(
                        *mesh.point(tri[0]),
                        *mesh.point(tri[1]),
                        *mesh.point(tri[2]),
                    );

                    if let Some((toi, sense)) =
                        query::segment_triangle_intersection(&ray, &triangle, tolerance)
                    {
                        hits.push(LineHit {
                            toi,
                            point: ray.point_at(toi),
                            cell_id: *cell,
                            sense,
                        });
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.toi.total_cmp(&b.toi));

        let param_tolerance = tolerance / length;
        let mut result = LineIntersections::default();

        for hit in hits {
            let accepted = match result.hits.last() {
                Some(last) => hit.sense != last.sense || hit.toi > last.toi + param_tolerance,
                None => true,
            };

            if accepted {
                result.hits.push(hit);
            }
        }

        Ok(result)
    }

    /// Finds the intersection of the segment `[p0, p1]` with the cells of the mesh that is
    /// closest to `p0`.
    ///
    /// Unlike [`Self::intersect_with_line`], this accepts any kind of cell: vertex and line
    /// cells are hit when they pass within `tolerance` of the segment.
    pub fn intersect_with_line_closest(
        &mut self,
        p0: &Point<Real>,
        p1: &Point<Real>,
        tolerance: Real,
    ) -> Result<Option<ClosestLineHit>, ObbTreeError> {
        self.build_locator()?;
        let mesh = self.mesh.clone().ok_or(ObbTreeError::NoMesh)?;
        let ray = Ray::from_segment(p0, p1);
        let mut best: Option<ClosestLineHit> = None;

        for leaf in self.leaves_along_segment(&ray) {
            let cells = self[leaf].cells.as_ref().ok_or(ObbTreeError::NoCellLists)?;

            for cell in cells {
                if let Some(hit) = query::cell_intersect_with_line(&mesh, *cell, &ray, tolerance) {
                    if best.map(|b| hit.toi < b.toi).unwrap_or(true) {
                        best = Some(ClosestLineHit {
                            toi: hit.toi,
                            point: hit.point,
                            cell_id: *cell,
                            sub_id: hit.sub_id,
                        });
                    }
                }
            }
        }

        Ok(best)
    }

    /// Determines if `pt` is inside or outside of the closed surface of the mesh.
    ///
    /// A ray is cast from `pt` through the centroid of a facet it isn't grazing, and extended
    /// past the bounds of the mesh. The sense of its first crossing tells where `pt` is.
    /// Returns `None` if the mesh has no facet to aim at or if the ray crosses nothing.
    pub fn inside_or_outside(&mut self, pt: &Point<Real>) -> Result<Option<Containment>, ObbTreeError> {
        self.build_locator()?;
        let mesh = self.mesh.clone().ok_or(ObbTreeError::NoMesh)?;

        let Some(target) = ray_target(&mesh, pt) else {
            log::debug!("no facet to cast an inside/outside ray through");
            return Ok(None);
        };

        let dir = target - pt;
        let reach = mesh.bounds().diagonal_length() * 2.0 + self.config.tolerance;
        let end = target + dir.normalize() * reach;

        let crossings = self.intersect_with_line(pt, &end)?;

        Ok(crossings.first_sense().map(|sense| match sense {
            Sense::Entering => Containment::Outside,
            Sense::Exiting => Containment::Inside,
        }))
    }

    /// Builds a mesh made of the boxes of the nodes at depth `level`.
    ///
    /// Leaves shallower than `level` are included too, so the boxes cover the whole mesh.
    /// Every box contributes 8 points and 6 quads.
    pub fn generate_representation(&mut self, level: u32) -> Result<PolyMesh, ObbTreeError> {
        self.build_locator()?;
        let mut result = PolyMesh::new(Vec::new());

        for node in &self.nodes {
            if node.depth == level || (node.is_leaf() && node.depth < level) {
                let base = result.num_points() as u32;
                for pt in node.obb.vertices() {
                    let _ = result.push_point(pt);
                }

                for face in BOX_FACES {
                    let ids = face.map(|i| base + i);
                    // Indices are in range since the eight points were just pushed.
                    if let Err(err) = result.push_cell(CellKind::Quad, &ids) {
                        log::error!("failed to emit a box face: {}", err);
                    }
                }
            }
        }

        Ok(result)
    }
}

/// The faces of the box returned by `Obb::vertices`, oriented outward when the axes are
/// right-handed.
const BOX_FACES: [[u32; 4]; 6] = [
    [0, 3, 2, 1],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// A facet centroid the inside/outside ray from `pt` can aim at.
fn ray_target(mesh: &PolyMesh, pt: &Point<Real>) -> Option<Point<Real>> {
    let mut best: Option<(Real, Point<Real>)> = None;

    for cell in 0..mesh.num_cells() as u32 {
        let Some(tri) = mesh.cell_triangles(cell).next() else {
            continue;
        };
        let triangle = Triangle::new(*mesh.point(tri[0]), *mesh.point(tri[1]), *mesh.point(tri[2]));
        let Some(normal) = triangle.normal() else {
            continue;
        };

        let centroid = triangle.center();
        let Some(dir) = (centroid - pt).try_normalize(crate::math::DEFAULT_EPSILON) else {
            continue;
        };

        let cosine = normal.dot(&dir).abs();
        if cosine >= MIN_RAY_FACET_COSINE {
            return Some(centroid);
        }

        if best.map(|b| cosine > b.0).unwrap_or(cosine > 0.0) {
            best = Some((cosine, centroid));
        }
    }

    best.map(|b| b.1)
}
