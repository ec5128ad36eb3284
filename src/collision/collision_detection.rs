use super::contact_colors::contact_cell_colors;
use super::polygon_intersection::{intersect_polygon_with_polygon, ContactPoints};
use crate::bounding_volume::Aabb;
use crate::math::{HomogeneousMatrix, Isometry, Point, Real};
use crate::partitioning::{LeafPairAction, ObbNode, ObbTree, ObbTreeError};
use crate::shape::{CellKind, PolyMesh};
use alloc::sync::Arc;
use alloc::vec::Vec;
use smallvec::{smallvec, SmallVec};

/// The name of the field array listing the contacting cells on each output mesh.
pub const CONTACT_CELLS_ARRAY: &str = "ContactCells";

/// Which contacts the collision detection reports.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum CollisionMode {
    /// Report every pair of contacting cells, with a contact segment for each.
    #[default]
    AllContacts,
    /// Stop at the first pair of contacting cells, with a single contact point.
    FirstContact,
    /// Report every pair of contacting cells, with a single contact point for each.
    HalfContacts,
}

impl CollisionMode {
    /// A human-readable name of this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            CollisionMode::AllContacts => "AllContacts",
            CollisionMode::FirstContact => "FirstContact",
            CollisionMode::HalfContacts => "HalfContacts",
        }
    }
}

/// Parameters of the [`CollisionDetection`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct CollisionConfig {
    /// Which contacts are reported.
    pub mode: CollisionMode,
    /// Absolute tolerance of the box overlap tests, in world units.
    pub box_tolerance: Real,
    /// Squared distance under which a point is considered on a triangle edge.
    pub cell_tolerance: Real,
    /// Leaf size of the OBB trees.
    pub cells_per_node: u32,
    /// Maximum depth of the OBB trees.
    pub max_level: u32,
    /// If `true`, the output meshes get per-cell colors highlighting the contacting cells.
    pub generate_scalars: bool,
    /// Opacity of the cells without contact, in `[0, 1]`, when some contact exists.
    pub opacity: Real,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            mode: CollisionMode::AllContacts,
            box_tolerance: 0.001,
            cell_tolerance: 0.0,
            cells_per_node: 2,
            max_level: 12,
            generate_scalars: false,
            opacity: 1.0,
        }
    }
}

/// A homogeneous transform together with its inverse.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LinearTransform {
    matrix: HomogeneousMatrix,
    inverse: Option<HomogeneousMatrix>,
}

impl LinearTransform {
    /// Wraps an arbitrary homogeneous matrix. Its inverse is `None` if it is singular.
    pub fn from_matrix(matrix: HomogeneousMatrix) -> Self {
        Self {
            matrix,
            inverse: matrix.try_inverse(),
        }
    }

    /// Wraps a rigid transform.
    pub fn from_isometry(iso: &Isometry<Real>) -> Self {
        Self {
            matrix: iso.to_homogeneous(),
            inverse: Some(iso.inverse().to_homogeneous()),
        }
    }

    /// The matrix of this transform.
    #[inline]
    pub fn matrix(&self) -> &HomogeneousMatrix {
        &self.matrix
    }

    /// The inverse matrix of this transform, if it isn't singular.
    #[inline]
    pub fn inverse(&self) -> Option<&HomogeneousMatrix> {
        self.inverse.as_ref()
    }
}

/// Reasons why a collision detection couldn't run.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CollisionInputError {
    /// The mesh of the given input isn't set.
    #[error("the mesh of input {0} is not set.")]
    MissingMesh(usize),
    /// The transform of the given input isn't set.
    #[error("the transform of input {0} is not set.")]
    MissingTransform(usize),
    /// The transform of the given input can't be inverted.
    #[error("the transform of input {0} is singular.")]
    SingularTransform(usize),
    /// One of the OBB trees couldn't be built.
    #[error("failed to build the OBB tree of an input: {0}")]
    Tree(#[from] ObbTreeError),
}

/// Finds the pairs of contacting cells between two meshes, each placed with its own transform.
///
/// Each run of [`CollisionDetection::update`] produces:
/// - two output meshes, copies of the inputs with a `ContactCells` field array. Entry `i` of
///   the array of the first output and entry `i` of the array of the second output form the
///   `i`-th pair of contacting cells.
/// - a contact mesh in world space: one segment per contact in
///   [`CollisionMode::AllContacts`] mode, one vertex per contact otherwise.
///
/// Contacts are only computed accurately between triangles. Triangle strips are split into
/// their triangles, other polygons are accepted but go through a less robust point-in-polygon
/// test.
#[derive(Clone, Debug, Default)]
pub struct CollisionDetection {
    config: CollisionConfig,
    meshes: [Option<Arc<PolyMesh>>; 2],
    transforms: [Option<LinearTransform>; 2],
    trees: [ObbTree; 2],
    outputs: [PolyMesh; 2],
    contacts: PolyMesh,
    number_of_box_tests: usize,
    skipped: Option<CollisionInputError>,
}

/// Logs and rejects an index outside of `{0, 1}`.
fn check_index(i: usize) -> Option<usize> {
    if i < 2 {
        Some(i)
    } else {
        log::error!("index {} out of range: only the inputs 0 and 1 exist", i);
        None
    }
}

/// A mesh cell ready for the exact contact test.
struct PreparedCell {
    id: u32,
    /// The planar polygons making up the cell: the cell itself, or its triangles for strips.
    polygons: SmallVec<[SmallVec<[Point<Real>; 4]>; 1]>,
    aabb: Aabb,
}

impl PreparedCell {
    fn new(mesh: &PolyMesh, id: u32, m: Option<&HomogeneousMatrix>) -> Self {
        let place = |pt: &Point<Real>| m.map(|m| m.transform_point(pt)).unwrap_or(*pt);
        let polygons: SmallVec<[_; 1]> = if mesh.cell_kind(id) == CellKind::TriangleStrip {
            mesh.cell_triangles(id)
                .map(|tri| tri.iter().map(|i| place(mesh.point(*i))).collect::<SmallVec<[_; 4]>>())
                .collect()
        } else {
            smallvec![mesh.cell_points(id).map(place).collect::<SmallVec<[_; 4]>>()]
        };
        let aabb = Aabb::from_points(polygons.iter().flatten());
        Self { id, polygons, aabb }
    }

    /// The contact points between the first pair of touching polygons of both cells.
    fn intersect(&self, other: &Self, tol2: Real, mode: CollisionMode) -> Option<ContactPoints> {
        self.polygons.iter().find_map(|p| {
            other
                .polygons
                .iter()
                .find_map(|q| intersect_polygon_with_polygon(p, q, tol2, mode))
        })
    }
}

/// The contacts found during a traversal.
#[derive(Default)]
struct ContactList {
    cells: [Vec<u32>; 2],
    points: Vec<Point<Real>>,
}

impl CollisionDetection {
    /// Creates a collision detection with the default configuration and no inputs.
    pub fn new() -> Self {
        Self::with_config(CollisionConfig::default())
    }

    /// Creates a collision detection with the given configuration and no inputs.
    pub fn with_config(config: CollisionConfig) -> Self {
        let mut result = Self::default();
        result.set_config(config);
        result
    }

    /// The configuration of this collision detection.
    pub fn config(&self) -> &CollisionConfig {
        &self.config
    }

    /// Replaces the configuration. The opacity is clamped to `[0, 1]` and the tolerances to
    /// non-negative values.
    pub fn set_config(&mut self, config: CollisionConfig) {
        self.config = CollisionConfig {
            box_tolerance: config.box_tolerance.max(0.0),
            cell_tolerance: config.cell_tolerance.max(0.0),
            cells_per_node: config.cells_per_node.max(1),
            opacity: config.opacity.clamp(0.0, 1.0),
            ..config
        };
    }

    /// The collision mode.
    pub fn collision_mode(&self) -> CollisionMode {
        self.config.mode
    }

    /// The name of the collision mode.
    pub fn collision_mode_as_str(&self) -> &'static str {
        self.config.mode.as_str()
    }

    /// Sets the collision mode.
    pub fn set_collision_mode(&mut self, mode: CollisionMode) {
        self.config.mode = mode;
    }

    /// Sets the absolute tolerance of the box overlap tests.
    pub fn set_box_tolerance(&mut self, tolerance: Real) {
        self.config.box_tolerance = tolerance.max(0.0);
    }

    /// Sets the squared tolerance of the point-in-triangle tests.
    pub fn set_cell_tolerance(&mut self, tolerance: Real) {
        self.config.cell_tolerance = tolerance.max(0.0);
    }

    /// Sets the leaf size of the OBB trees.
    pub fn set_number_of_cells_per_node(&mut self, cells_per_node: u32) {
        self.config.cells_per_node = cells_per_node.max(1);
    }

    /// Sets the maximum depth of the OBB trees.
    pub fn set_max_level(&mut self, max_level: u32) {
        self.config.max_level = max_level;
    }

    /// Enables or disables the generation of per-cell colors.
    pub fn set_generate_scalars(&mut self, generate_scalars: bool) {
        self.config.generate_scalars = generate_scalars;
    }

    /// Sets the opacity of the cells without contact, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, opacity: Real) {
        self.config.opacity = opacity.clamp(0.0, 1.0);
    }

    /// Sets the `i`-th input mesh.
    pub fn set_mesh(&mut self, i: usize, mesh: Arc<PolyMesh>) {
        if let Some(i) = check_index(i) {
            self.meshes[i] = Some(mesh);
        }
    }

    /// The `i`-th input mesh.
    pub fn mesh(&self, i: usize) -> Option<&Arc<PolyMesh>> {
        self.meshes[check_index(i)?].as_ref()
    }

    /// Places the `i`-th input mesh with a rigid transform.
    pub fn set_transform(&mut self, i: usize, pos: &Isometry<Real>) {
        if let Some(i) = check_index(i) {
            self.transforms[i] = Some(LinearTransform::from_isometry(pos));
        }
    }

    /// Places the `i`-th input mesh with an arbitrary homogeneous matrix.
    ///
    /// A singular matrix is kept, but the collision detection won't run until it is replaced.
    pub fn set_matrix(&mut self, i: usize, matrix: HomogeneousMatrix) {
        if let Some(i) = check_index(i) {
            let transform = LinearTransform::from_matrix(matrix);
            if transform.inverse().is_none() {
                log::warn!("the matrix of input {} is singular", i);
            }
            self.transforms[i] = Some(transform);
        }
    }

    /// The transform of the `i`-th input.
    pub fn transform(&self, i: usize) -> Option<&LinearTransform> {
        self.transforms[check_index(i)?].as_ref()
    }

    /// The matrix of the `i`-th input.
    pub fn matrix(&self, i: usize) -> Option<&HomogeneousMatrix> {
        self.transform(i).map(|t| t.matrix())
    }

    /// The OBB tree of the `i`-th input.
    pub fn tree(&self, i: usize) -> Option<&ObbTree> {
        Some(&self.trees[check_index(i)?])
    }

    /// The `i`-th output: a copy of the `i`-th input with the `ContactCells` field array.
    pub fn output(&self, i: usize) -> Option<&PolyMesh> {
        Some(&self.outputs[check_index(i)?])
    }

    /// The contact geometry, in world space.
    pub fn contacts_output(&self) -> &PolyMesh {
        &self.contacts
    }

    /// The cells of the `i`-th input that are in contact with the other input.
    pub fn contacting_cells(&self, i: usize) -> Option<&[u32]> {
        self.outputs[check_index(i)?].field_array(CONTACT_CELLS_ARRAY)
    }

    /// The number of pairs of contacting cells found by the last update.
    pub fn number_of_contacts(&self) -> usize {
        self.contacting_cells(0).map(|c| c.len()).unwrap_or(0)
    }

    /// Did the last update find any contact?
    pub fn is_colliding(&self) -> bool {
        self.number_of_contacts() > 0
    }

    /// The number of cell-pair bounding box tests performed by the last update.
    pub fn number_of_box_tests(&self) -> usize {
        self.number_of_box_tests
    }

    /// Why the last update didn't run, if it was skipped because of incomplete inputs.
    pub fn skipped_reason(&self) -> Option<CollisionInputError> {
        self.skipped
    }

    /// Resets the outputs to copies of the inputs without contacts.
    fn reset_outputs(&mut self) {
        for i in 0..2 {
            let mut output = self.meshes[i]
                .as_deref()
                .cloned()
                .unwrap_or_default();
            output.set_field_array(CONTACT_CELLS_ARRAY, Vec::new());
            self.outputs[i] = output;
        }

        self.contacts = PolyMesh::default();
        self.number_of_box_tests = 0;
        self.skipped = None;
    }

    fn checked_inputs(
        &self,
    ) -> Result<([Arc<PolyMesh>; 2], HomogeneousMatrix, HomogeneousMatrix), CollisionInputError> {
        let mesh0 = self.meshes[0].clone().ok_or(CollisionInputError::MissingMesh(0))?;
        let mesh1 = self.meshes[1].clone().ok_or(CollisionInputError::MissingMesh(1))?;
        let t0 = self.transforms[0].ok_or(CollisionInputError::MissingTransform(0))?;
        let t1 = self.transforms[1].ok_or(CollisionInputError::MissingTransform(1))?;
        let inv0 = t0.inverse().ok_or(CollisionInputError::SingularTransform(0))?;

        // Maps the frame of the second mesh into the frame of the first one.
        let relative = inv0 * t1.matrix();
        Ok(([mesh0, mesh1], *t0.matrix(), relative))
    }

    /// Runs the collision detection on the current inputs.
    ///
    /// If an input mesh or transform is missing (or the first transform is singular), a warning
    /// is logged and the outputs are left empty. This isn't an error: the reason is available
    /// from [`Self::skipped_reason`]. An error is only returned if an OBB tree can't be built.
    pub fn update(&mut self) -> Result<(), CollisionInputError> {
        self.reset_outputs();

        let ([mesh0, mesh1], world0, relative) = match self.checked_inputs() {
            Ok(inputs) => inputs,
            Err(err) => {
                log::warn!("collision detection skipped: {}", err);
                self.skipped = Some(err);
                return Ok(());
            }
        };

        if mesh0.is_empty() || mesh1.is_empty() {
            log::debug!("collision detection between meshes without cells");
            return Ok(());
        }

        for (tree, mesh) in self.trees.iter_mut().zip([&mesh0, &mesh1]) {
            tree.set_mesh(mesh.clone());
            tree.set_tolerance(self.config.box_tolerance);
            tree.set_cells_per_node(self.config.cells_per_node);
            tree.set_max_level(self.config.max_level);
            tree.set_retain_cell_lists(true);
        }

        let mode = self.config.mode;
        let tol2 = self.config.cell_tolerance;
        let cell_margin = tol2.sqrt();
        let mut contacts = ContactList::default();

        let mut processor = |a: &ObbNode, b: &ObbNode, b_to_a: Option<&HomogeneousMatrix>| {
            let (Some(cells_a), Some(cells_b)) = (&a.cells, &b.cells) else {
                return LeafPairAction::Continue(0);
            };

            let cells_b: Vec<_> = cells_b
                .iter()
                .map(|id| PreparedCell::new(&mesh1, *id, b_to_a))
                .collect();
            let mut box_tests = 0;

            for id_a in cells_a {
                let cell_a = PreparedCell::new(&mesh0, *id_a, None);
                let aabb_a = cell_a.aabb.loosened(cell_margin);

                for cell_b in &cells_b {
                    box_tests += 1;

                    if !aabb_a.intersects(&cell_b.aabb) {
                        continue;
                    }

                    let Some(points) = cell_a.intersect(cell_b, tol2, mode) else {
                        continue;
                    };

                    log::trace!("cells {} and {} are in contact", cell_a.id, cell_b.id);
                    contacts.cells[0].push(cell_a.id);
                    contacts.cells[1].push(cell_b.id);
                    contacts
                        .points
                        .extend(points.iter().map(|p| world0.transform_point(p)));

                    if mode == CollisionMode::FirstContact {
                        return LeafPairAction::Halt(box_tests);
                    }
                }
            }

            LeafPairAction::Continue(box_tests)
        };

        let [tree0, tree1] = &mut self.trees;
        let report = tree0.intersect_with_obb_tree(tree1, Some(&relative), &mut processor);
        let report = match report {
            Ok(report) => report,
            Err(err) => {
                log::warn!("collision detection skipped: {}", err);
                return Err(err.into());
            }
        };

        self.number_of_box_tests = report.count;
        log::debug!(
            "collision detection ({}): {} contacts, {} box tests, {} leaf pairs",
            mode.as_str(),
            contacts.cells[0].len(),
            report.count,
            report.leaf_pairs_visited
        );

        self.write_outputs(contacts);
        Ok(())
    }

    fn write_outputs(&mut self, contacts: ContactList) {
        let ContactList { cells, points } = contacts;
        let mode = self.config.mode;
        let mut contact_mesh = PolyMesh::new(points);
        let num_points = contact_mesh.num_points() as u32;

        let cells_result = if mode == CollisionMode::AllContacts {
            (0..num_points / 2).try_for_each(|k| {
                contact_mesh
                    .push_cell(CellKind::Line, &[2 * k, 2 * k + 1])
                    .map(|_| ())
            })
        } else {
            (0..num_points).try_for_each(|k| contact_mesh.push_cell(CellKind::Vertex, &[k]).map(|_| ()))
        };

        if let Err(err) = cells_result {
            log::error!("failed to build the contact mesh: {}", err);
        }

        self.contacts = contact_mesh;

        for (output, cells) in self.outputs.iter_mut().zip(cells) {
            if self.config.generate_scalars {
                let colors = contact_cell_colors(output.num_cells(), &cells, self.config.opacity);
                if let Err(err) = output.set_cell_colors(colors) {
                    log::error!("failed to set the contact colors: {}", err);
                }
            }

            output.set_field_array(CONTACT_CELLS_ARRAY, cells);
        }
    }
}
