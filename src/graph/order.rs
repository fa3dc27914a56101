use super::QuestionNode;
use crate::identity::LocalId;
use ahash::AHashMap;
use itertools::Itertools;

/// Rewrites the `order` of every node in `ids` to `base, base+1, ...`.
pub(super) fn renumber(nodes: &mut AHashMap<LocalId, QuestionNode>, ids: &[LocalId], base: i64) {
    for (position, id) in ids.iter().enumerate() {
        if let Some(node) = nodes.get_mut(id) {
            node.order = base + position as i64;
        }
    }
}

/// Removes `id` and reinserts it at `index`, clamped to the sequence length.
/// Returns `false` if `id` is not part of the sequence.
pub(super) fn move_within(ids: &mut Vec<LocalId>, id: LocalId, index: usize) -> bool {
    let Some(from) = ids.iter().position(|x| *x == id) else {
        return false;
    };
    ids.remove(from);
    let to = index.min(ids.len());
    ids.insert(to, id);
    true
}

/// Whether `proposed` contains exactly the members of `current`, each once.
pub(super) fn is_permutation(current: &[LocalId], proposed: &[LocalId]) -> bool {
    current.len() == proposed.len()
        && current
            .iter()
            .sorted()
            .zip(proposed.iter().sorted())
            .all(|(a, b)| a == b)
}

/// Whether the orders form the dense sequence `base..base+len-1` in the given order.
pub fn is_dense(orders: &[i64], base: i64) -> bool {
    orders
        .iter()
        .enumerate()
        .all(|(position, order)| *order == base + position as i64)
}
