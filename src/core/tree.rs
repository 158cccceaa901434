// tree construction + depth assignment
use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::core::error::CfmError;
use crate::core::node::Node;
use crate::core::types::{Constraint, NodeId, TreeKind};

/// One parsed row of a tree file: a parent, the constraint over its children, the children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub parent: String,
    pub constraint: String,
    pub children: Vec<String>,
    /// 1-based source line, 0 when the row was not read from a file
    pub line: usize,
}

impl TreeRow {
    pub fn new(parent: impl Into<String>, constraint: impl Into<String>, children: &[&str]) -> Self {
        Self {
            parent: parent.into(),
            constraint: constraint.into(),
            children: children.iter().map(|c| c.to_string()).collect(),
            line: 0,
        }
    }
}

/// Flat node table (arena) for one tree. Names are unique inside a tree.
#[derive(Debug, Clone)]
pub struct Tree {
    pub kind: TreeKind,
    nodes: Vec<Node>,
    index: HashMap<String, NodeId>,
}

impl Tree {
    pub fn new(kind: TreeKind) -> Self {
        Self { kind, nodes: Vec::new(), index: HashMap::new() }
    }

    /// Build a tree from its rows, then assign depths.
    ///
    /// A row (re)defines its parent's constraint and children. Each child is registered
    /// with the row's constraint and an empty child list unless it already exists, in
    /// which case only its parent linkage is updated. Any unknown constraint token
    /// aborts the whole build.
    pub fn from_rows(kind: TreeKind, rows: &[TreeRow]) -> Result<Self, CfmError> {
        let mut tree = Tree::new(kind);

        for (i, row) in rows.iter().enumerate() {
            let line = if row.line > 0 { row.line } else { i + 1 };
            let constraint: Constraint = row.constraint.parse().map_err(|_| {
                CfmError::InvalidConstraint { tree: kind, line, token: row.constraint.clone() }
            })?;

            match tree.index.get(&row.parent).copied() {
                Some(id) => {
                    let node = &mut tree.nodes[id as usize];
                    node.constraint = constraint;
                    node.children = row.children.clone();
                }
                None => {
                    tree.insert(Node::new(
                        row.parent.clone(),
                        kind,
                        kind.root_name(),
                        constraint,
                        row.children.clone(),
                    ));
                }
            }

            for child in &row.children {
                match tree.index.get(child).copied() {
                    Some(id) => tree.nodes[id as usize].parent = row.parent.clone(),
                    None => {
                        tree.insert(Node::new(child.clone(), kind, row.parent.clone(), constraint, vec![]));
                    }
                }
            }
        }

        tree.assign_depths();
        debug!(tree = %kind, nodes = tree.len(), "tree built");
        Ok(tree)
    }

    //append, returning the new id; caller guarantees the name is fresh
    fn insert(&mut self, mut node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        node.id = id;
        self.index.insert(node.name.clone(), id);
        self.nodes.push(node);
        id
    }

    /// Breadth-first depth pass from the synthetic root (depth 0) and from every
    /// top-level node (depth 1). Child names that do not resolve are skipped, and
    /// each node is visited once so malformed cyclic input terminates.
    pub fn assign_depths(&mut self) {
        let root = self.kind.root_name();

        //resolve child names to ids once
        let resolved: Vec<Vec<NodeId>> = self
            .nodes
            .iter()
            .map(|n| n.children.iter().filter_map(|c| self.index.get(c).copied()).collect())
            .collect();

        let mut queue: VecDeque<(NodeId, u32)> = VecDeque::new();
        if let Some(&root_id) = self.index.get(root) {
            queue.push_back((root_id, 0));
        }
        for n in &self.nodes {
            if !n.is_root() && n.is_top_level() {
                queue.push_back((n.id, 1));
            }
        }

        let mut visited: HashSet<NodeId> = HashSet::new();
        while let Some((id, depth)) = queue.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            self.nodes[id as usize].depth = depth;
            for &child in &resolved[id as usize] {
                if !visited.contains(&child) {
                    queue.push_back((child, depth + 1));
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.index.get(name).map(|&id| &self.nodes[id as usize])
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Node> {
        let id = *self.index.get(name)?;
        self.nodes.get_mut(id as usize)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
