//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Built top-down with the surface area heuristic over 12 centroid buckets
//! per axis, then flattened depth-first into a compact node array. The same
//! structure serves triangles inside a mesh and instances inside a scene.

use crate::hittable::{HitInfo, Hittable, Primitive, TraversalStats};
use lumen_math::{Bounds, Interval, Ray, Vec3};

/// Nodes deeper than this become leaves regardless of size.
pub const MAX_DEPTH: usize = 32;

/// Number of SAH buckets per axis.
const BUCKET_COUNT: usize = 12;

/// Largest primitive count a flat leaf can address.
const MAX_LEAF_PRIMITIVES: usize = u16::MAX as usize;

/// A flattened BVH node.
///
/// `count == 0` marks an interior node whose left child directly follows it
/// and whose right child sits at `offset`. Leaves cover
/// `primitives[offset..offset + count]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C, align(32))]
pub struct FlatNode {
    pub bounds: Bounds,
    pub offset: u32,
    pub count: u16,
    pub split_axis: u8,
}

impl FlatNode {
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.count > 0
    }
}

/// Node of the temporary build tree. Children index into the same arena.
struct BuildNode {
    bounds: Bounds,
    items: Vec<usize>,
    children: Option<[usize; 2]>,
    depth: usize,
    split_axis: u8,
}

#[derive(Clone, Copy)]
struct Bucket {
    bounds: Bounds,
    count: usize,
}

impl Bucket {
    const EMPTY: Bucket = Bucket {
        bounds: Bounds::EMPTY,
        count: 0,
    };

    fn merge(&mut self, other: &Bucket) {
        self.bounds.expand_bounds(&other.bounds);
        self.count += other.count;
    }

    fn cost(&self) -> f32 {
        self.bounds.area() * self.count as f32
    }
}

struct SplitCandidate {
    cost: f32,
    axis: usize,
    index: usize,
    left: Bounds,
    right: Bounds,
}

/// Shape of a finished hierarchy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BvhStats {
    pub total_nodes: usize,
    pub leaf_nodes: usize,
    pub max_leaf_primitives: usize,
    pub max_leaf_depth: usize,
}

/// Bounding volume hierarchy over any [`Primitive`].
pub struct Bvh<P: Primitive> {
    nodes: Vec<FlatNode>,
    primitives: Vec<P>,
    stats: BvhStats,
}

impl<P: Primitive> Bvh<P> {
    /// Build a hierarchy, taking ownership of the primitives.
    pub fn new(primitives: Vec<P>) -> Self {
        if primitives.is_empty() {
            return Self {
                nodes: Vec::new(),
                primitives,
                stats: BvhStats::default(),
            };
        }

        let bounds: Vec<Bounds> = primitives.iter().map(|p| p.bounds()).collect();
        let centroids: Vec<Vec3> = primitives.iter().map(|p| p.centroid()).collect();

        let mut root_bounds = Bounds::EMPTY;
        for b in &bounds {
            root_bounds.expand_bounds(b);
        }

        let mut arena = vec![BuildNode {
            bounds: root_bounds,
            items: (0..primitives.len()).collect(),
            children: None,
            depth: 1,
            split_axis: 0,
        }];
        split_node(&mut arena, 0, &bounds, &centroids);

        let mut nodes = Vec::with_capacity(arena.len());
        let mut order = Vec::with_capacity(primitives.len());
        let mut stats = BvhStats::default();
        flatten(&arena, 0, &mut nodes, &mut order, &mut stats);
        stats.total_nodes = nodes.len();

        // Move primitives into leaf order
        let mut slots: Vec<Option<P>> = primitives.into_iter().map(Some).collect();
        let primitives: Vec<P> = order.iter().filter_map(|&i| slots[i].take()).collect();

        log::debug!(
            "BVH built: {} primitives, {} nodes, {} leaves, max leaf size {}, max depth {}",
            primitives.len(),
            stats.total_nodes,
            stats.leaf_nodes,
            stats.max_leaf_primitives,
            stats.max_leaf_depth
        );

        Self {
            nodes,
            primitives,
            stats,
        }
    }

    /// Primitives in leaf order.
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    pub fn nodes(&self) -> &[FlatNode] {
        &self.nodes
    }

    pub fn stats(&self) -> BvhStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

impl<P: Primitive> Hittable for Bvh<P> {
    fn intersect<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        stats: &mut TraversalStats,
    ) -> Option<HitInfo<'a>> {
        if self.nodes.is_empty() {
            return None;
        }

        let inv_dir = ray.direction.recip();
        let dir_is_neg = [inv_dir.x < 0.0, inv_dir.y < 0.0, inv_dir.z < 0.0];

        let mut closest = None;
        let mut t_max = ray_t.max;
        let mut stack = [0usize; MAX_DEPTH];
        let mut stack_len = 0;
        let mut current = 0;

        loop {
            let node = &self.nodes[current];
            stats.bounds_tests += 1;

            if node.bounds.hit_with_inv_dir(ray.origin, inv_dir, ray_t.with_max(t_max)) {
                if node.is_leaf() {
                    let start = node.offset as usize;
                    let end = start + node.count as usize;
                    for primitive in &self.primitives[start..end] {
                        if let Some(hit) = primitive.intersect(ray, ray_t.with_max(t_max), stats) {
                            t_max = hit.t;
                            closest = Some(hit);
                        }
                    }
                } else {
                    // Visit the child nearer along the split axis first
                    let (near, far) = if dir_is_neg[node.split_axis as usize] {
                        (node.offset as usize, current + 1)
                    } else {
                        (current + 1, node.offset as usize)
                    };
                    stack[stack_len] = far;
                    stack_len += 1;
                    current = near;
                    continue;
                }
            }

            if stack_len == 0 {
                break;
            }
            stack_len -= 1;
            current = stack[stack_len];
        }

        closest
    }

    fn bounds(&self) -> Bounds {
        self.nodes.first().map_or(Bounds::EMPTY, |root| root.bounds)
    }
}

#[inline]
fn bucket_index(centroid: f32, min: f32, extent: f32) -> usize {
    if extent <= 0.0 {
        return 0;
    }
    let index = ((centroid - min) * BUCKET_COUNT as f32 / extent).floor();
    (index.max(0.0) as usize).min(BUCKET_COUNT - 1)
}

/// Find the cheapest bucket boundary over all three axes.
fn find_split(
    node_bounds: &Bounds,
    items: &[usize],
    bounds: &[Bounds],
    centroids: &[Vec3],
) -> Option<SplitCandidate> {
    let extent = node_bounds.diagonal();
    let mut best: Option<SplitCandidate> = None;

    for axis in 0..3 {
        let mut buckets = [Bucket::EMPTY; BUCKET_COUNT];
        for &item in items {
            let index = bucket_index(centroids[item][axis], node_bounds.min[axis], extent[axis]);
            buckets[index].bounds.expand_bounds(&bounds[item]);
            buckets[index].count += 1;
        }

        // suffix[i] covers buckets i..
        let mut suffix = [Bucket::EMPTY; BUCKET_COUNT];
        let mut acc = Bucket::EMPTY;
        for i in (0..BUCKET_COUNT).rev() {
            acc.merge(&buckets[i]);
            suffix[i] = acc;
        }

        let mut left = Bucket::EMPTY;
        for index in 1..BUCKET_COUNT {
            left.merge(&buckets[index - 1]);
            let right = &suffix[index];
            if right.count == 0 {
                break;
            }
            if left.count == 0 {
                continue;
            }

            let cost = left.cost() + right.cost();
            if best.as_ref().map_or(true, |b| cost < b.cost) {
                best = Some(SplitCandidate {
                    cost,
                    axis,
                    index,
                    left: left.bounds,
                    right: right.bounds,
                });
            }
        }
    }

    best
}

fn push_children(
    arena: &mut Vec<BuildNode>,
    parent: usize,
    split_axis: u8,
    halves: [(Bounds, Vec<usize>); 2],
) -> [usize; 2] {
    let depth = arena[parent].depth + 1;
    let first = arena.len();
    for (bounds, items) in halves {
        arena.push(BuildNode {
            bounds,
            items,
            children: None,
            depth,
            split_axis: 0,
        });
    }

    let node = &mut arena[parent];
    node.items = Vec::new();
    node.children = Some([first, first + 1]);
    node.split_axis = split_axis;
    [first, first + 1]
}

/// Fit a leaf at the depth cap into a flat node's `u16` count.
fn cap_leaf(items: &mut Vec<usize>, depth: usize) {
    let count = items.len();
    debug_assert!(
        count <= MAX_LEAF_PRIMITIVES,
        "BVH leaf at depth {} dropped {} primitives",
        depth,
        count.saturating_sub(MAX_LEAF_PRIMITIVES)
    );
    if count > MAX_LEAF_PRIMITIVES {
        log::warn!(
            "BVH leaf at depth {} holds {} primitives, only {} are kept",
            depth,
            count,
            MAX_LEAF_PRIMITIVES
        );
        items.truncate(MAX_LEAF_PRIMITIVES);
    }
}

fn split_node(arena: &mut Vec<BuildNode>, index: usize, bounds: &[Bounds], centroids: &[Vec3]) {
    let node = &arena[index];
    let count = node.items.len();
    if count == 1 || node.depth > MAX_DEPTH {
        let depth = node.depth;
        cap_leaf(&mut arena[index].items, depth);
        return;
    }

    let children = match find_split(&node.bounds, &node.items, bounds, centroids) {
        Some(split) => {
            let axis = split.axis;
            let extent = node.bounds.diagonal()[axis];
            let min = node.bounds.min[axis];
            let (left, right): (Vec<usize>, Vec<usize>) = node
                .items
                .iter()
                .partition(|&&item| bucket_index(centroids[item][axis], min, extent) < split.index);

            push_children(
                arena,
                index,
                axis as u8,
                [(split.left, left), (split.right, right)],
            )
        }
        None if count > MAX_LEAF_PRIMITIVES => {
            // No useful SAH split, but the leaf would overflow its count
            let mut left = node.items.clone();
            let right = left.split_off(count / 2);
            let union = |items: &[usize]| {
                let mut b = Bounds::EMPTY;
                for &item in items {
                    b.expand_bounds(&bounds[item]);
                }
                b
            };
            let halves = [(union(&left), left), (union(&right), right)];
            push_children(arena, index, 0, halves)
        }
        None => return,
    };

    for child in children {
        split_node(arena, child, bounds, centroids);
    }
}

/// Emit `index` and its subtree depth-first, returning its flat index.
fn flatten(
    arena: &[BuildNode],
    index: usize,
    nodes: &mut Vec<FlatNode>,
    order: &mut Vec<usize>,
    stats: &mut BvhStats,
) -> usize {
    let node = &arena[index];
    let flat_index = nodes.len();
    nodes.push(FlatNode {
        bounds: node.bounds,
        offset: 0,
        count: 0,
        split_axis: node.split_axis,
    });

    match node.children {
        Some([left, right]) => {
            flatten(arena, left, nodes, order, stats);
            let right_index = flatten(arena, right, nodes, order, stats);
            nodes[flat_index].offset = right_index as u32;
        }
        None => {
            nodes[flat_index].offset = order.len() as u32;
            nodes[flat_index].count = node.items.len() as u16;
            order.extend_from_slice(&node.items);

            stats.leaf_nodes += 1;
            stats.max_leaf_primitives = stats.max_leaf_primitives.max(node.items.len());
            stats.max_leaf_depth = stats.max_leaf_depth.max(node.depth);
        }
    }

    flat_index
}
