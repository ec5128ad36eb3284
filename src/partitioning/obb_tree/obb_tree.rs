use crate::bounding_volume::Obb;
use crate::math::{Point, Real, Vector};
use crate::shape::PolyMesh;
use crate::utils::ModifiedTime;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::ops::Index;

/// Index of a node of an [`ObbTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObbNodeIndex(pub u32);

impl ObbNodeIndex {
    /// The index of the root of every non-empty tree.
    pub const ROOT: Self = ObbNodeIndex(0);

    #[inline]
    pub(super) fn new(id: usize) -> Self {
        ObbNodeIndex(id as u32)
    }

    /// This index as an `usize`.
    #[inline]
    pub fn get(self) -> usize {
        self.0 as usize
    }
}

/// A node of an [`ObbTree`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObbNode {
    /// The box enclosing every cell of this node's subtree.
    pub obb: Obb,
    /// The parent of this node, or `None` for the root.
    pub parent: Option<ObbNodeIndex>,
    /// The two children of an internal node, or `None` for a leaf.
    pub children: Option<[ObbNodeIndex; 2]>,
    /// The cells of a leaf, if the tree retains them.
    ///
    /// Always `None` for internal nodes.
    pub cells: Option<Vec<u32>>,
    /// The depth of this node, the root being at depth `0`.
    pub depth: u32,
}

impl ObbNode {
    pub(super) fn leaf(obb: Obb, parent: Option<ObbNodeIndex>, depth: u32) -> Self {
        Self {
            obb,
            parent,
            children: None,
            cells: None,
            depth,
        }
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The corner of this node's box.
    #[inline]
    pub fn corner(&self) -> &Point<Real> {
        &self.obb.corner
    }

    /// The three edge vectors of this node's box, from the longest to the shortest.
    #[inline]
    pub fn axes(&self) -> &[Vector<Real>; 3] {
        &self.obb.axes
    }
}

/// The thresholds controlling how a node is split in two.
///
/// A split is measured by its imbalance ratio `|right - left| / total` where `left` and `right`
/// are the number of cells on each side of the splitting plane.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SplitHeuristic {
    /// The first axis with an imbalance ratio smaller than this is used for the split.
    pub acceptable_ratio: Real,
    /// If no axis is acceptable, the best one is still used if its ratio is smaller than this.
    /// Otherwise the node becomes a leaf.
    pub fallback_ratio: Real,
}

impl Default for SplitHeuristic {
    fn default() -> Self {
        Self {
            acceptable_ratio: 0.6,
            fallback_ratio: 0.95,
        }
    }
}

/// Parameters controlling the construction and the queries of an [`ObbTree`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct ObbTreeConfig {
    /// Absolute tolerance used by the node overlap tests and the line queries.
    pub tolerance: Real,
    /// Maximum depth of the tree.
    pub max_level: u32,
    /// Nodes with at most this many cells are not subdivided.
    pub cells_per_node: u32,
    /// If `true`, the depth of the tree is also limited by `ceil(log2(num_cells / cells_per_node)) + 1`.
    pub automatic: bool,
    /// If `true`, leaves keep the list of their cells. Line queries need them.
    pub retain_cell_lists: bool,
    /// The thresholds used to select splitting planes.
    pub split: SplitHeuristic,
}

impl Default for ObbTreeConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_level: 12,
            cells_per_node: 32,
            automatic: true,
            retain_cell_lists: true,
            split: SplitHeuristic::default(),
        }
    }
}

/// Errors reported by the operations of an [`ObbTree`] that need a built tree.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObbTreeError {
    /// No mesh was attached to the tree.
    #[error("no mesh is attached to the OBB tree.")]
    NoMesh,
    /// The attached mesh has no cell to subdivide.
    #[error("the mesh attached to the OBB tree has no cells.")]
    NoCells,
    /// The query needs the cell lists of the leaves but the tree doesn't retain them.
    #[error("the OBB tree doesn't retain the cell lists of its leaves.")]
    NoCellLists,
}

/// A hierarchy of oriented bounding boxes built over the cells of a polygonal mesh.
///
/// The nodes are stored in an arena: the root is at index [`ObbNodeIndex::ROOT`], and every node
/// refers to its parent and children by index. The tree is built lazily: every query first calls
/// [`ObbTree::build_locator`], which only rebuilds the hierarchy if the mesh or the configuration
/// changed since the last build.
#[derive(Clone, Debug, Default)]
pub struct ObbTree {
    pub(super) config: ObbTreeConfig,
    pub(super) config_mtime: ModifiedTime,
    pub(super) mesh: Option<Arc<PolyMesh>>,
    pub(super) nodes: Vec<ObbNode>,
    pub(super) level: u32,
    pub(super) build_time: ModifiedTime,
}

impl Index<ObbNodeIndex> for ObbTree {
    type Output = ObbNode;

    #[inline]
    fn index(&self, index: ObbNodeIndex) -> &ObbNode {
        &self.nodes[index.get()]
    }
}

impl ObbTree {
    /// Creates an empty tree with the default configuration and no mesh.
    pub fn new() -> Self {
        Self::with_config(ObbTreeConfig::default())
    }

    /// Creates an empty tree with the given configuration and no mesh.
    pub fn with_config(config: ObbTreeConfig) -> Self {
        Self {
            config,
            config_mtime: ModifiedTime::now(),
            ..Default::default()
        }
    }

    /// Creates a tree over the given mesh. The hierarchy isn't built until needed.
    pub fn from_mesh(mesh: Arc<PolyMesh>) -> Self {
        let mut result = Self::new();
        result.set_mesh(mesh);
        result
    }

    /// The configuration of this tree.
    #[inline]
    pub fn config(&self) -> &ObbTreeConfig {
        &self.config
    }

    /// Replaces the whole configuration of this tree.
    pub fn set_config(&mut self, config: ObbTreeConfig) {
        if self.config != config {
            self.config = config;
            self.config_mtime.modified();
        }
    }

    /// Sets the absolute tolerance used by the queries.
    pub fn set_tolerance(&mut self, tolerance: Real) {
        let tolerance = tolerance.max(0.0);
        self.set_config(ObbTreeConfig {
            tolerance,
            ..self.config
        });
    }

    /// Sets the maximum depth of the tree.
    pub fn set_max_level(&mut self, max_level: u32) {
        self.set_config(ObbTreeConfig {
            max_level,
            ..self.config
        });
    }

    /// Sets the number of cells under which a node is no longer subdivided.
    ///
    /// The value is clamped to at least 1.
    pub fn set_cells_per_node(&mut self, cells_per_node: u32) {
        self.set_config(ObbTreeConfig {
            cells_per_node: cells_per_node.max(1),
            ..self.config
        });
    }

    /// Enables or disables the automatic depth limit.
    pub fn set_automatic(&mut self, automatic: bool) {
        self.set_config(ObbTreeConfig {
            automatic,
            ..self.config
        });
    }

    /// Enables or disables the retention of the cell lists on the leaves.
    pub fn set_retain_cell_lists(&mut self, retain_cell_lists: bool) {
        self.set_config(ObbTreeConfig {
            retain_cell_lists,
            ..self.config
        });
    }

    /// The mesh this tree is built over.
    #[inline]
    pub fn mesh(&self) -> Option<&Arc<PolyMesh>> {
        self.mesh.as_ref()
    }

    /// Attaches the mesh this tree is built over.
    ///
    /// Attaching a different mesh (not the same allocation) marks the tree as outdated.
    pub fn set_mesh(&mut self, mesh: Arc<PolyMesh>) {
        let same = self
            .mesh
            .as_ref()
            .map(|m| Arc::ptr_eq(m, &mesh))
            .unwrap_or(false);

        if !same {
            self.mesh = Some(mesh);
            self.config_mtime.modified();
        }
    }

    /// The last time the configuration or the mesh reference of this tree was changed.
    #[inline]
    pub fn mtime(&self) -> ModifiedTime {
        self.config_mtime
    }

    /// The last time the hierarchy was built.
    #[inline]
    pub fn build_time(&self) -> ModifiedTime {
        self.build_time
    }

    /// Is the hierarchy built?
    #[inline]
    pub fn is_built(&self) -> bool {
        !self.nodes.is_empty()
    }

    /// Does the hierarchy need to be (re)built before being queried?
    pub fn needs_rebuild(&self) -> bool {
        match &self.mesh {
            Some(mesh) => {
                !self.is_built()
                    || self.build_time <= mesh.mtime()
                    || self.build_time <= self.config_mtime
            }
            None => !self.is_built(),
        }
    }

    /// The depth of the deepest node of the tree.
    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// All the nodes of the tree. The root is the first one.
    #[inline]
    pub fn nodes(&self) -> &[ObbNode] {
        &self.nodes
    }

    /// The root of the tree, if it is built.
    #[inline]
    pub fn root(&self) -> Option<&ObbNode> {
        self.nodes.first()
    }

    /// The node at the given index, if it exists.
    #[inline]
    pub fn node(&self, index: ObbNodeIndex) -> Option<&ObbNode> {
        self.nodes.get(index.get())
    }

    /// Builds the hierarchy if it is missing or outdated.
    ///
    /// The hierarchy is outdated if the mesh or the configuration was modified after the last
    /// build.
    pub fn build_locator(&mut self) -> Result<(), ObbTreeError> {
        if !self.needs_rebuild() {
            return Ok(());
        }

        self.force_build_locator()
    }

    /// Builds the hierarchy, even if it is up to date.
    pub fn force_build_locator(&mut self) -> Result<(), ObbTreeError> {
        let Some(mesh) = self.mesh.clone() else {
            log::error!("cannot build an OBB tree without a mesh");
            return Err(ObbTreeError::NoMesh);
        };

        if mesh.is_empty() {
            log::error!("cannot build an OBB tree over a mesh without cells");
            self.free_search_structure();
            return Err(ObbTreeError::NoCells);
        }

        self.build(&mesh);
        Ok(())
    }

    /// Drops the hierarchy. The next query rebuilds it.
    pub fn free_search_structure(&mut self) {
        self.nodes.clear();
        self.level = 0;
        self.build_time = ModifiedTime::NEVER;
    }

    /// Computes an oriented bounding box for the given set of points.
    ///
    /// The box axes are the principal directions of the point covariance. Returns the box and
    /// the eigenvalue associated to each of its axes.
    pub fn compute_obb_of_points(pts: &[Point<Real>]) -> (Obb, Vector<Real>) {
        crate::utils::obb(pts)
    }
}
