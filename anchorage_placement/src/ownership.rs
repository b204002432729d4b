// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ownership resolution: from a struck sub-node to the placed object that owns it.

use crate::types::{Kind, SceneGraph};

/// Find the nearest ancestor of `node` (inclusive) whose kind tag names a `K`.
///
/// Visits at most `max_depth` nodes, so a malformed parent chain cannot loop forever.
/// Returns `None` if the chain ends, or the bound is reached, without a recognized tag.
pub fn find_owner<K, S>(scene: &S, node: S::Node, max_depth: usize) -> Option<(S::Node, K)>
where
    K: Kind,
    S: SceneGraph + ?Sized,
{
    let mut cur = Some(node);
    for _ in 0..max_depth {
        let n = cur?;
        if let Some(kind) = scene.kind_tag(n).and_then(K::from_tag) {
            return Some((n, kind));
        }
        cur = scene.parent_of(n);
    }
    if cur.is_some() {
        tracing::debug!(?node, max_depth, "ownership walk hit its depth bound");
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake::{FakeWorld, Toy};

    fn chain(world: &mut FakeWorld, len: usize, root_kind: Option<&str>) -> Vec<usize> {
        let mut nodes = vec![world.node(None, root_kind)];
        for _ in 1..len {
            let parent = *nodes.last().unwrap();
            nodes.push(world.node(Some(parent), None));
        }
        nodes
    }

    #[test]
    fn resolves_root_of_nested_chain_in_linear_steps() {
        let mut world = FakeWorld::new();
        let nodes = chain(&mut world, 50, Some("chair"));
        let leaf = *nodes.last().unwrap();
        assert_eq!(find_owner::<Toy, _>(&world, leaf, 1024), Some((nodes[0], Toy::Chair)));
        assert_eq!(world.parent_lookups.get(), 49);
    }

    #[test]
    fn node_itself_can_be_the_owner() {
        let mut world = FakeWorld::new();
        let boxed = world.node(None, Some("box"));
        let inner = world.node(Some(boxed), Some("chair"));
        assert_eq!(find_owner::<Toy, _>(&world, inner, 8), Some((inner, Toy::Chair)));
        assert_eq!(world.parent_lookups.get(), 0);
    }

    #[test]
    fn unrecognized_chain_has_no_owner() {
        let mut world = FakeWorld::new();
        let nodes = chain(&mut world, 10, Some("lamp"));
        assert_eq!(find_owner::<Toy, _>(&world, nodes[9], 1024), None);
    }

    #[test]
    fn cyclic_chain_terminates_at_the_bound() {
        let mut world = FakeWorld::new();
        let a = world.node(None, None);
        let b = world.node(Some(a), None);
        world.force_parent(a, Some(b));
        assert_eq!(find_owner::<Toy, _>(&world, b, 16), None);
        assert_eq!(world.parent_lookups.get(), 16);
    }

    #[test]
    fn depth_bound_cuts_long_chains() {
        let mut world = FakeWorld::new();
        let nodes = chain(&mut world, 20, Some("box"));
        assert_eq!(find_owner::<Toy, _>(&world, nodes[19], 19), None);
        assert_eq!(find_owner::<Toy, _>(&world, nodes[19], 20), Some((nodes[0], Toy::Box)));
    }
}
