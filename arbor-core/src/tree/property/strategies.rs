//! Seeded random tree generators.

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};
use test_strategy::Arbitrary;

use crate::tree::{NodeId, NodeRow, Tree};

const MIN_NODES: usize = 1;
const MAX_NODES: usize = 96;
/// Spacing between generated node ids, so ids never equal dense indices.
const ID_STRIDE: NodeId = 7;
const ID_BASE: NodeId = 1_000;

/// Attachment rule used to pick each new node's parent.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(super) enum TreeShape {
    /// Parent drawn uniformly from every earlier node.
    #[weight(3)]
    Uniform,
    /// Parent is usually the previous node, giving long unbranched runs.
    #[weight(2)]
    Caterpillar,
    /// Parent drawn from the first few nodes, giving many short branches.
    #[weight(1)]
    Bushy,
}

/// A generated tree together with the rows it was built from.
#[derive(Clone, Debug)]
pub(super) struct TreeFixture {
    pub shape: TreeShape,
    pub rows: Vec<NodeRow>,
    pub tree: Tree,
    /// Extra randomness for properties that need to pick nodes.
    pub seed: u64,
}

impl TreeFixture {
    /// Picks up to `count` distinct node ids using the fixture seed.
    pub(super) fn sample_nodes(&self, count: usize, salt: u64) -> Vec<NodeId> {
        let mut rng = SmallRng::seed_from_u64(self.seed ^ salt);
        let ids: Vec<NodeId> = self.tree.node_ids().collect();
        ids.choose_multiple(&mut rng, count.min(ids.len()))
            .copied()
            .collect()
    }
}

pub(super) fn tree_fixture_strategy() -> impl Strategy<Value = TreeFixture> {
    (any::<TreeShape>(), any::<u64>(), any::<u64>())
        .prop_map(|(shape, seed, extra)| generate_fixture(shape, seed, extra))
}

pub(super) fn generate_fixture(shape: TreeShape, seed: u64, extra: u64) -> TreeFixture {
    let mut rng = SmallRng::seed_from_u64(seed);
    let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
    let mut positions: Vec<[f64; 3]> = Vec::with_capacity(node_count);
    let mut rows = Vec::with_capacity(node_count);
    for index in 0..node_count {
        let id = ID_BASE + index as NodeId * ID_STRIDE;
        let parent = (index > 0).then(|| pick_parent(shape, index, &mut rng));
        let origin = parent.map_or([0.0; 3], |parent| positions[parent]);
        let location = [
            origin[0] + rng.gen_range(-5.0..5.0),
            origin[1] + rng.gen_range(-5.0..5.0),
            origin[2] + rng.gen_range(-5.0..5.0),
        ];
        positions.push(location);
        rows.push(NodeRow::new(
            id,
            parent.map(|parent| ID_BASE + parent as NodeId * ID_STRIDE),
            location.into(),
        ));
    }
    rows.shuffle(&mut rng);
    let tree = Tree::from_rows(rows.iter().copied()).expect("generated rows form a tree");
    TreeFixture {
        shape,
        rows,
        tree,
        seed: extra,
    }
}

fn pick_parent(shape: TreeShape, index: usize, rng: &mut SmallRng) -> usize {
    match shape {
        TreeShape::Uniform => rng.gen_range(0..index),
        TreeShape::Caterpillar => {
            if rng.gen_bool(0.8) {
                index - 1
            } else {
                rng.gen_range(0..index)
            }
        }
        TreeShape::Bushy => rng.gen_range(0..index.min(4)),
    }
}
