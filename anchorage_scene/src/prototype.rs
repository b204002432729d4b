// Copyright 2025 the Anchorage Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Detached template subtrees that can be instantiated into a [`Scene`](crate::Scene).

use crate::scene::Scene;
use crate::types::{Category, KindTag, LocalNode, NodeId};

#[derive(Clone, Debug)]
pub(crate) struct TemplateNode {
    pub(crate) parent: Option<usize>,
    pub(crate) local: LocalNode,
}

/// A reusable template subtree.
///
/// Node `0` is the root. Every other node refers to a parent with a smaller index,
/// so instantiating in order always sees the parent first.
///
/// Instances get copies of the local transforms and share geometry with the template.
#[derive(Clone, Debug)]
pub struct Prototype {
    pub(crate) nodes: Vec<TemplateNode>,
}

impl Prototype {
    /// Create a template with a single root node.
    pub fn new(root: LocalNode) -> Self {
        Self {
            nodes: vec![TemplateNode {
                parent: None,
                local: root,
            }],
        }
    }

    /// Add a child under the template node at `parent`. Returns its template index.
    ///
    /// Returns `None` if `parent` is out of range.
    pub fn push_child(&mut self, parent: usize, local: LocalNode) -> Option<usize> {
        if parent >= self.nodes.len() {
            return None;
        }
        self.nodes.push(TemplateNode {
            parent: Some(parent),
            local,
        });
        Some(self.nodes.len() - 1)
    }

    /// Capture the live subtree rooted at `root`. Returns `None` if `root` is stale.
    ///
    /// The root's local transform is kept as-is; its parent link is dropped.
    pub fn from_subtree(scene: &Scene, root: NodeId) -> Option<Self> {
        if !scene.is_alive(root) {
            return None;
        }
        let mut nodes = Vec::new();
        let mut stack = vec![(root, None)];
        while let Some((id, parent)) = stack.pop() {
            let index = nodes.len();
            nodes.push(TemplateNode {
                parent,
                local: scene.local(id)?.clone(),
            });
            for &child in scene.children(id).iter().rev() {
                stack.push((child, Some(index)));
            }
        }
        Some(Self { nodes })
    }

    /// Tag the template: the root carries `kind`, and every node joins `category`.
    ///
    /// Instances inherit both, so hit tests filtered by `category` strike any part of
    /// an instance and ownership resolution finds the root by its tag.
    pub fn tag(&mut self, kind: KindTag, category: Category) {
        for node in &mut self.nodes {
            node.local.category |= category;
        }
        self.nodes[0].local.kind = Some(kind);
    }

    /// Kind tag of the root, if tagged.
    pub fn kind(&self) -> Option<&KindTag> {
        self.nodes[0].local.kind.as_ref()
    }

    /// Local data of the root.
    pub fn root(&self) -> &LocalNode {
        &self.nodes[0].local
    }

    /// Number of template nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a template has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use glam::{Mat4, Vec3};
    use std::sync::Arc;

    fn chair() -> Prototype {
        let mut proto = Prototype::new(LocalNode::default());
        let seat = proto
            .push_child(0, LocalNode::with_geometry(Geometry::cuboid(0.5, 0.1, 0.5)))
            .unwrap();
        let _leg = proto
            .push_child(
                seat,
                LocalNode {
                    local_transform: Mat4::from_translation(Vec3::new(0.2, -0.25, 0.2)),
                    ..LocalNode::with_geometry(Geometry::cuboid(0.05, 0.4, 0.05))
                },
            )
            .unwrap();
        proto
    }

    #[test]
    fn push_child_rejects_unknown_parent() {
        let mut proto = Prototype::new(LocalNode::default());
        assert_eq!(proto.push_child(3, LocalNode::default()), None);
        assert_eq!(proto.len(), 1);
    }

    #[test]
    fn tag_marks_root_kind_and_every_category() {
        let mut proto = chair();
        proto.tag(KindTag::from("chair"), Category::PLACEABLE);
        assert_eq!(proto.kind().map(KindTag::as_str), Some("chair"));
        assert!(
            proto
                .nodes
                .iter()
                .all(|n| n.local.category.contains(Category::PLACEABLE | Category::DEFAULT))
        );
        assert!(proto.nodes[1..].iter().all(|n| n.local.kind.is_none()));
    }

    #[test]
    fn capture_subtree_preserves_shape_and_shares_geometry() {
        let mut scene = Scene::new();
        let proto = chair();
        let root = scene.instantiate(&proto, None);
        let captured = Prototype::from_subtree(&scene, root).unwrap();
        assert_eq!(captured.len(), 3);
        assert_eq!(captured.nodes[1].parent, Some(0));
        assert_eq!(captured.nodes[2].parent, Some(1));
        let a = proto.nodes[2].local.geometry.as_ref().unwrap();
        let b = captured.nodes[2].local.geometry.as_ref().unwrap();
        assert!(Arc::ptr_eq(a, b));
    }
}
