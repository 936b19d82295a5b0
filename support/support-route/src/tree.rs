//! Arena-backed search tree used while routing a single support.

use nalgebra::Point3;

/// Handle of a node inside a [`RoutingTree`].
pub type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct TreeNode {
    position: Point3<f64>,
    parent: Option<NodeId>,
}

/// Tree of candidate waypoints rooted at the contact point.
///
/// Nodes are stored in a flat arena and refer to their parent by index, so
/// extracting the path to any node walks parent links without any shared
/// ownership. The tree only grows; it is dropped once a path is extracted.
///
/// # Example
///
/// ```
/// use support_route::RoutingTree;
/// use nalgebra::Point3;
///
/// let mut tree = RoutingTree::new(Point3::new(0.0, 0.0, 10.0));
/// let a = tree.insert(Point3::new(0.0, 0.0, 9.5), tree.root());
/// let b = tree.insert(Point3::new(0.1, 0.0, 9.0), a);
///
/// let path = tree.path_to(b);
/// assert_eq!(path.len(), 3);
/// assert_eq!(path[0], Point3::new(0.0, 0.0, 10.0));
/// ```
#[derive(Debug, Clone)]
pub struct RoutingTree {
    nodes: Vec<TreeNode>,
}

impl RoutingTree {
    /// Creates a tree holding only the root.
    #[must_use]
    pub fn new(root: Point3<f64>) -> Self {
        Self {
            nodes: vec![TreeNode {
                position: root,
                parent: None,
            }],
        }
    }

    /// Handle of the root node.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        0
    }

    /// Number of nodes, including the root.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the root is present from construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// True when nothing beyond the root has been inserted.
    #[must_use]
    pub fn only_root(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Position of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not returned by this tree.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point3<f64> {
        self.nodes[id].position
    }

    /// Parent of a node, `None` for the root.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Adds a node below `parent` and returns its handle.
    pub fn insert(&mut self, position: Point3<f64>, parent: NodeId) -> NodeId {
        debug_assert!(parent < self.nodes.len());
        self.nodes.push(TreeNode {
            position,
            parent: Some(parent),
        });
        self.nodes.len() - 1
    }

    /// Node closest to `point` by a linear scan; the earliest wins ties.
    #[must_use]
    pub fn nearest(&self, point: &Point3<f64>) -> NodeId {
        let mut best = 0;
        let mut best_dist = f64::INFINITY;
        for (id, node) in self.nodes.iter().enumerate() {
            let dist = (node.position - point).norm_squared();
            if dist < best_dist {
                best = id;
                best_dist = dist;
            }
        }
        best
    }

    /// Node with the smallest Z; the earliest wins ties.
    #[must_use]
    pub fn lowest(&self) -> NodeId {
        let mut best = 0;
        for (id, node) in self.nodes.iter().enumerate() {
            if node.position.z < self.nodes[best].position.z {
                best = id;
            }
        }
        best
    }

    /// Waypoints from the root down to `id`, root first.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        let mut current = Some(id);
        while let Some(index) = current {
            let Some(node) = self.nodes.get(index) else {
                break;
            };
            points.push(node.position);
            current = node.parent;
        }
        points.reverse();
        points
    }
}
