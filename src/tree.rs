//! Lazily substituted tiling tree, kept in step with a moving viewport.
//!
//! The root is always a spine tile. Leaves sit `8 * level` substitution
//! steps below it, so they keep the size of the level 0 spine tile no
//! matter how far the root has been moved up or down the spine. Only the
//! subtrees that touch the current box are kept; everything else is
//! pruned back into a free list.

use tracing::{debug, trace};

use crate::bbox::{classify, BBox, CachedBBox, Intersection, Triangle};
use crate::errors::*;
use crate::penrose::{HalfTile, Spine, State, TileType, PATHS};

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node {
    tile:     HalfTile,
    children: Vec<NodeId>, // empty until first subdivided
}

/// Work done by the most recent refinement pass.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct RefineStats {
    pub visited:    usize, // nodes popped off the work stack
    pub classified: usize, // of those, nodes tested against the box
}

#[derive(Debug)]
pub struct PenroseTree {
    level: usize,
    root:  NodeId,
    nodes: Vec<Node>,
    free:  Vec<NodeId>,
    spine: Spine,
    stats: RefineStats,
}

impl PenroseTree {

    /// Build a tree whose root is the smallest spine tile containing
    /// `bound`.
    pub fn new(bound: &BBox) -> PenroseTree {

        let mut tree = PenroseTree {
            level: 0,
            root: NodeId(0),
            nodes: Vec::new(),
            free: Vec::new(),
            spine: Spine::new(),
            stats: RefineStats::default(),
        };

        tree.rebuild(&CachedBBox::new(bound));

        tree

    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn root(&self) -> &HalfTile {
        &self.nodes[self.root.0].tile
    }

    pub fn last_refine(&self) -> RefineStats {
        self.stats
    }

    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Move the tree to a new viewport, reusing as much of the current
    /// subdivision as possible.
    pub fn update(&mut self, bound: &BBox) -> Result<()> {

        let cached = CachedBBox::new(bound);

        match classify(self.root().triangle(), &cached) {

            Intersection::Disjoint => {
                debug!(level = self.level, "viewport left the root tile, rebuilding");
                self.rebuild(&cached);
                return Ok(());
            }

            Intersection::Contain => self.shorten(&cached),

            Intersection::Intersect | Intersection::BeContained => self.lengthen(&cached)?,

        }

        self.refine(&cached);

        Ok(())

    }

    /// Non-empty tiles `offset` substitution steps above the leaves.
    pub fn tiles(&self, offset: usize) -> Vec<&HalfTile> {

        let mut frontier = vec![self.root];

        for _ in offset..self.level * 8 {
            frontier = frontier.iter()
                .flat_map(|id| self.nodes[id.0].children.iter().cloned())
                .collect();
        }

        frontier.iter()
            .map(|id| &self.nodes[id.0].tile)
            .filter(|tile| tile.state != State::Empty)
            .collect()

    }

    pub fn triangles(&self, offset: usize) -> Vec<&Triangle> {
        self.tiles(offset).into_iter().map(|tile| tile.triangle()).collect()
    }

    //////////////////////////////////////////////////
    // tree surgery

    fn rebuild(&mut self, bound: &CachedBBox) {

        self.nodes.clear();
        self.free.clear();

        let level = self.containing_level(bound);
        let tile = self.spine.tile(level).clone();

        self.root = self.alloc(tile);
        self.level = level;

        debug!(level = level, "built tree");

        self.refine(bound);

    }

    // lowest spine level whose tile contains the box
    fn containing_level(&mut self, bound: &CachedBBox) -> usize {

        let mut level = 0;

        while classify(self.spine.tile(level).triangle(), bound) != Intersection::Contain {
            level += 1;
        }

        level

    }

    // the box shrank inside the root: drop whole spine levels from the
    // top for as long as the box stays inside the spine route
    fn shorten(&mut self, bound: &CachedBBox) {

        let mut path = Vec::new();
        let mut node = self.root;

        'descend: loop {
            for &child in &self.nodes[node.0].children {
                if classify(self.nodes[child.0].tile.triangle(), bound) == Intersection::Contain {
                    path.push(child);
                    node = child;
                    continue 'descend;
                }
            }
            break;
        }

        let matched = path.iter()
            .zip(PATHS.iter().cycle())
            .take_while(|&(id, kind)| self.nodes[id.0].tile.kind() == *kind)
            .count();

        let steps = matched / 8 * 8;

        if steps == 0 {
            trace!(level = self.level, "root still tightest");
            return;
        }

        let new_root = path[steps - 1];
        let parent = if steps >= 2 { path[steps - 2] } else { self.root };

        self.nodes[parent.0].children.retain(|&id| id != new_root);

        let old_root = self.root;
        self.release(old_root);

        self.root = new_root;
        self.level -= steps / 8;

        debug!(dropped = steps / 8, level = self.level, "shortened tree");

    }

    // the box reaches outside the root: climb the spine until a tile
    // contains it and graft the old root into the new tree
    fn lengthen(&mut self, bound: &CachedBBox) -> Result<()> {

        let level = self.containing_level(bound);

        ensure!(level > self.level,
                ErrorKind::GeometryInvariant(
                    format!("spine tile {} contains a box its descendant at {} did not",
                            level, self.level)));

        let tile = self.spine.tile(level).clone();
        let new_root = self.alloc(tile);

        let steps = 8 * (level - self.level);
        let mut parent = new_root;

        for (i, kind) in PATHS.iter().cycle().take(steps).enumerate() {

            self.expand(parent);

            let child = self.find_child(parent, *kind)?;

            if i + 1 < steps {
                parent = child;
                continue;
            }

            debug_assert_eq!(self.nodes[child.0].tile.kind(), self.root().kind());

            let old_root = self.root;

            for slot in self.nodes[parent.0].children.iter_mut() {
                if *slot == child {
                    *slot = old_root;
                }
            }

            self.release(child);

        }

        debug!(from = self.level, to = level, "lengthened tree");

        self.root = new_root;
        self.level = level;

        Ok(())

    }

    fn find_child(&self, parent: NodeId, kind: TileType) -> Result<NodeId> {

        for &child in &self.nodes[parent.0].children {
            if self.nodes[child.0].tile.kind() == kind {
                return Ok(child);
            }
        }

        bail!(ErrorKind::InvalidPath(
            format!("{:?} has no {:?} child", self.nodes[parent.0].tile.kind(), kind)))

    }

    //////////////////////////////////////////////////
    // refinement

    /// Bring every node's state in line with `bound`, subdividing
    /// where the box reaches and pruning where it does not.
    fn refine(&mut self, bound: &CachedBBox) {

        let mut stats = RefineStats::default();

        // (node, steps above the leaves, ancestor inside the box)
        let mut stack = vec![(self.root, self.level * 8, false)];

        while let Some((id, depth, inside)) = stack.pop() {

            stats.visited += 1;

            let relation = if inside {
                Intersection::BeContained
            } else {
                stats.classified += 1;
                classify(self.nodes[id.0].tile.triangle(), bound)
            };

            let state = match relation {
                Intersection::Disjoint => State::Empty,
                Intersection::BeContained => State::Full,
                Intersection::Intersect | Intersection::Contain => State::Partial,
            };

            if depth == 0 {
                self.nodes[id.0].tile.state = state;
                continue;
            }

            if relation == Intersection::Disjoint {
                self.nodes[id.0].tile.state = State::Empty;
                self.prune(id);
                continue;
            }

            // a full node already has its whole subtree full
            if relation == Intersection::BeContained && self.nodes[id.0].tile.state == State::Full {
                continue;
            }

            self.nodes[id.0].tile.state = state;
            self.expand(id);

            let inside = relation == Intersection::BeContained;

            for &child in &self.nodes[id.0].children {
                stack.push((child, depth - 1, inside));
            }

        }

        trace!(visited = stats.visited, classified = stats.classified, "refined");

        self.stats = stats;

    }

    //////////////////////////////////////////////////
    // arena

    fn alloc(&mut self, tile: HalfTile) -> NodeId {

        let node = Node { tile: tile, children: Vec::new() };

        match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        }

    }

    fn expand(&mut self, id: NodeId) {

        if !self.nodes[id.0].children.is_empty() {
            return;
        }

        let children: Vec<NodeId> = self.nodes[id.0].tile.subdivision()
            .into_iter()
            .map(|tile| self.alloc(tile))
            .collect();

        self.nodes[id.0].children = children;

    }

    // release everything below a node, keeping the node itself
    fn prune(&mut self, id: NodeId) {

        let children = std::mem::take(&mut self.nodes[id.0].children);

        for child in children {
            self.release(child);
        }

    }

    // release a node and everything below it
    fn release(&mut self, id: NodeId) {

        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            stack.append(&mut self.nodes[id.0].children);
            self.free.push(id);
        }

    }

}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::approximate::approx_bbox;
    use crate::rational::Rational;
    use num_bigint::BigInt;

    fn bbox(l: i64, b: i64, r: i64, t: i64, d: i64) -> BBox {
        let q = |n| Rational::new(n, d).unwrap();
        approx_bbox(&q(l), &q(b), &q(r), &q(t), &BigInt::from(1_000_000_000))
    }

    #[test]
    fn small_box_needs_one_level() {
        let tree = PenroseTree::new(&bbox(-4, -4, 4, -1, 2));
        assert_eq!(tree.level(), 1);
        assert_eq!(tree.tiles(0).len(), 30);
        assert_eq!(tree.last_refine().visited, 98);
        let full = tree.tiles(0).iter().filter(|t| t.state == State::Full).count();
        assert_eq!(full, 5);
    }

    #[test]
    fn released_nodes_are_reused() {
        let mut tree = PenroseTree::new(&bbox(-5, -5, 5, 5, 1));
        let before = tree.nodes.len();
        tree.update(&bbox(-1, -1, 1, 1, 2)).unwrap();
        assert!(!tree.free.is_empty());
        tree.update(&bbox(-5, -5, 5, 5, 1)).unwrap();
        assert!(tree.nodes.len() <= before + 8);
        assert_eq!(tree.live_nodes() + tree.free.len(), tree.nodes.len());
    }

    #[test]
    fn disjoint_update_rebuilds() {
        let mut tree = PenroseTree::new(&bbox(-5, -5, 5, 5, 1));
        tree.update(&bbox(100, 100, 104, 104, 1)).unwrap();
        assert_eq!(tree.level(), 4);
        assert_eq!(tree.tiles(0).len(), 60);
    }

    #[test]
    fn parents_cover_children() {
        let tree = PenroseTree::new(&bbox(-5, -5, 5, 5, 1));
        let leaves = tree.tiles(0).len();
        let parents = tree.tiles(1).len();
        assert!(parents > 0 && parents <= leaves);
    }

}
