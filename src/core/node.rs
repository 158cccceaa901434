use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::types::{Constraint, NodeId, TreeKind};

/// A context or a feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub kind: TreeKind,
    /// immediate parent, or the synthetic root name for top-level nodes
    pub parent: String,
    pub constraint: Constraint,
    /// ordered child names, empty for leaves
    pub children: Vec<String>,
    pub depth: u32,
    /// partner-tree names found interacting with this node
    pub connections: BTreeSet<String>,
}

impl Node {
    pub fn new(
        name: impl Into<String>,
        kind: TreeKind,
        parent: impl Into<String>,
        constraint: Constraint,
        children: Vec<String>,
    ) -> Self {
        let name = name.into();
        let mut connections = BTreeSet::new();

        //each synthetic root starts out connected to the other one
        match kind {
            TreeKind::Context if name == kind.root_name() => {
                connections.insert(TreeKind::Feature.root_name().to_string());
            }
            TreeKind::Feature if name == kind.root_name() => {
                connections.insert(TreeKind::Context.root_name().to_string());
            }
            _ => {}
        }

        Self {
            id: 0, // overwritten by Tree::insert
            name,
            kind,
            parent: parent.into(),
            constraint,
            children,
            depth: 0,
            connections,
        }
    }

    pub fn is_root(&self) -> bool {
        self.name == self.kind.root_name()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Parent is the synthetic root of its tree.
    pub fn is_top_level(&self) -> bool {
        self.parent == self.kind.root_name()
    }
}
