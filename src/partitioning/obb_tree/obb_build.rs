use super::{ObbNode, ObbNodeIndex, ObbTree, ObbTreeConfig};
use crate::bounding_volume::Obb;
use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::shape::PolyMesh;
use crate::utils::{self, ModifiedTime, TriangleMoments};
use alloc::vec::Vec;

/// Scratch buffers reused across the recursive construction.
#[derive(Default)]
struct BuildWorkspace {
    point_stamps: Vec<u32>,
    stamp: u32,
    points: Vec<Point<Real>>,
}

impl BuildWorkspace {
    fn new(num_points: usize) -> Self {
        Self {
            point_stamps: vec![0; num_points],
            stamp: 0,
            points: Vec::new(),
        }
    }

    /// Collects the distinct points of the given cells into `self.points`.
    fn gather_points(&mut self, mesh: &PolyMesh, cells: &[u32]) {
        self.stamp += 1;
        self.points.clear();

        for cell in cells {
            for id in mesh.cell_point_ids(*cell) {
                let stamp = &mut self.point_stamps[*id as usize];
                if *stamp != self.stamp {
                    *stamp = self.stamp;
                    self.points.push(*mesh.point(*id));
                }
            }
        }
    }
}

impl ObbTreeConfig {
    /// The depth limit used to build a tree over `num_cells` cells.
    pub fn effective_max_level(&self, num_cells: usize) -> u32 {
        let cells_per_node = self.cells_per_node.max(1) as usize;

        if !self.automatic {
            return self.max_level;
        }

        if num_cells <= cells_per_node {
            return 0;
        }

        let ratio = num_cells as Real / cells_per_node as Real;
        let level = ratio.log2().ceil() as u32 + 1;
        level.min(self.max_level)
    }
}

impl ObbTree {
    /// Computes the area-weighted oriented bounding box of a set of cells of `mesh`.
    ///
    /// The surface cells are decomposed into triangles weighted by their area so the box
    /// doesn't depend on how densely the surface is sampled. If the cells have no area (e.g.
    /// they are only lines and vertices), the covariance of their points is used instead.
    pub fn compute_obb_of_cells(mesh: &PolyMesh, cells: &[u32]) -> Obb {
        let mut workspace = BuildWorkspace::new(mesh.num_points());
        compute_cells_obb(mesh, cells, &mut workspace)
    }

    pub(super) fn build(&mut self, mesh: &PolyMesh) {
        let num_cells = mesh.num_cells();
        let max_level = self.config.effective_max_level(num_cells);
        let mut workspace = BuildWorkspace::new(mesh.num_points());
        let cells: Vec<u32> = (0..num_cells as u32).collect();

        self.nodes.clear();
        self.level = 0;
        self.nodes.push(ObbNode::leaf(Obb::new(Point::origin(), [Vector::zeros(); 3]), None, 0));
        self.build_node(mesh, cells, ObbNodeIndex::ROOT, max_level, &mut workspace);
        self.build_time = ModifiedTime::now();

        log::debug!(
            "built OBB tree over {} cells: {} nodes, depth {} (limit {})",
            num_cells,
            self.nodes.len(),
            self.level,
            max_level
        );
    }

    /// Computes the box of the node `id` and subdivides it.
    ///
    /// The cell list is moved in: it either ends up on the leaf or is split between the
    /// two children.
    fn build_node(
        &mut self,
        mesh: &PolyMesh,
        cells: Vec<u32>,
        id: ObbNodeIndex,
        max_level: u32,
        workspace: &mut BuildWorkspace,
    ) {
        let obb = compute_cells_obb(mesh, &cells, workspace);
        let depth = self.nodes[id.get()].depth;
        self.nodes[id.get()].obb = obb;
        self.level = self.level.max(depth);

        if depth >= max_level || cells.len() <= self.config.cells_per_node as usize {
            self.make_leaf(id, cells);
            return;
        }

        let Some((left, right)) = self.split_cells(mesh, &obb, &cells) else {
            self.make_leaf(id, cells);
            return;
        };

        drop(cells);

        let left_id = ObbNodeIndex::new(self.nodes.len());
        let right_id = ObbNodeIndex::new(self.nodes.len() + 1);
        let placeholder = Obb::new(Point::origin(), [Vector::zeros(); 3]);
        self.nodes.push(ObbNode::leaf(placeholder, Some(id), depth + 1));
        self.nodes.push(ObbNode::leaf(placeholder, Some(id), depth + 1));
        self.nodes[id.get()].children = Some([left_id, right_id]);

        self.build_node(mesh, left, left_id, max_level, workspace);
        self.build_node(mesh, right, right_id, max_level, workspace);
    }

    fn make_leaf(&mut self, id: ObbNodeIndex, cells: Vec<u32>) {
        if self.config.retain_cell_lists {
            self.nodes[id.get()].cells = Some(cells);
        }
    }

    /// Searches a plane through the center of `obb`, normal to one of its axes, that splits
    /// `cells` in two balanced halves.
    fn split_cells(&self, mesh: &PolyMesh, obb: &Obb, cells: &[u32]) -> Option<(Vec<u32>, Vec<u32>)> {
        let heuristic = &self.config.split;
        let center = obb.center();
        let total = cells.len() as Real;
        let mut best: Option<(usize, Real)> = None;

        for (i, axis) in obb.axes.iter().enumerate() {
            let Some(normal) = axis.try_normalize(DEFAULT_EPSILON) else {
                continue;
            };

            let (left, right) = partition_cells(mesh, cells, &center, &normal);
            let ratio = (right.len() as Real - left.len() as Real).abs() / total;

            if ratio < heuristic.acceptable_ratio {
                return Some((left, right));
            }

            if best.map(|b| ratio < b.1).unwrap_or(true) {
                best = Some((i, ratio));
            }
        }

        let (i, ratio) = best?;

        if ratio < heuristic.fallback_ratio {
            let normal = obb.axes[i].normalize();
            log::trace!("forcing a split along axis {} with imbalance {}", i, ratio);
            Some(partition_cells(mesh, cells, &center, &normal))
        } else {
            None
        }
    }
}

/// Splits `cells` in the ones behind and the ones in front of the plane `(center, normal)`.
///
/// A cell goes in front of the plane if none of its vertices is strictly behind it, and behind
/// it if all of its vertices are strictly behind. A cell straddling the plane is classified by
/// its centroid.
fn partition_cells(
    mesh: &PolyMesh,
    cells: &[u32],
    center: &Point<Real>,
    normal: &Vector<Real>,
) -> (Vec<u32>, Vec<u32>) {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for cell in cells {
        let mut negative = false;
        let mut positive = false;
        let mut centroid = Vector::zeros();

        for pt in mesh.cell_points(*cell) {
            let val = normal.dot(&(pt - center));
            if val < 0.0 {
                negative = true;
            } else {
                positive = true;
            }
            centroid += pt.coords;
        }

        let goes_left = if negative && positive {
            let centroid = centroid / mesh.cell_point_ids(*cell).len() as Real;
            normal.dot(&(centroid - center.coords)) < 0.0
        } else {
            negative
        };

        if goes_left {
            left.push(*cell);
        } else {
            right.push(*cell);
        }
    }

    (left, right)
}

fn compute_cells_obb(mesh: &PolyMesh, cells: &[u32], workspace: &mut BuildWorkspace) -> Obb {
    let mut moments = TriangleMoments::new();

    for cell in cells {
        for tri in mesh.cell_triangles(*cell) {
            moments.push(mesh.point(tri[0]), mesh.point(tri[1]), mesh.point(tri[2]));
        }
    }

    workspace.gather_points(mesh, cells);

    let (center, cov) = moments
        .center_cov()
        .unwrap_or_else(|| utils::center_cov(&workspace.points));
    let (axes, _) = utils::principal_axes(&cov);

    Obb::from_directions(&center, &axes, &workspace.points)
}
