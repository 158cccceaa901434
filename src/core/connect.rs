// connected-pair inference
/*
A (context, feature) pair is connected when a child of the context and a child of the
feature activate each other through the mapping (either direction). What gets emitted
for such a match depends on where the two parents sit in their trees:

    Direct          neither parent is a mapping key (and neither is a root)
    FeatureChild    context parent is not a key but the feature parent is
    BothChildren    context parent is top-level and not Or/Alt, feature parent top-level
    ContextChild    context parent is top-level and not Or/Alt, feature parent nested
    RootFeature     feature parent is the feature root and not Or/Alt

Direct and FeatureChild exclude each other, as do the last three. Everything emitted
lands in a set, so traversal order never changes the result.
*/
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::mapping::FlatMapping;
use crate::core::model::CfmModel;
use crate::core::node::Node;
use crate::core::tree::Tree;
use crate::core::types::{Constraint, CONTEXT_ROOT, FEATURE_ROOT};

/// A context constraint and a feature constraint that jointly govern some activation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectedPair {
    pub parent_context: String,
    pub constraint_context: Constraint,
    pub children_context: Vec<String>,
    pub parent_feature: String,
    pub constraint_feature: Constraint,
    pub children_feature: Vec<String>,
}

impl ConnectedPair {
    pub fn from_nodes(context: &Node, feature: &Node) -> Self {
        Self {
            parent_context: context.name.clone(),
            constraint_context: context.constraint,
            children_context: context.children.clone(),
            parent_feature: feature.name.clone(),
            constraint_feature: feature.constraint,
            children_feature: feature.children.clone(),
        }
    }

    /// Same record with the constraints replaced.
    pub fn with_constraints(&self, context: Constraint, feature: Constraint) -> Self {
        Self { constraint_context: context, constraint_feature: feature, ..self.clone() }
    }
}

/// Which nodes a detected interaction is recorded against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Emission {
    /// (C, F) as iterated
    Direct,
    /// (C, node named ff)
    FeatureChild,
    /// (node named cc, node named ff)
    BothChildren,
    /// (node named cc, F)
    ContextChild,
    /// (C, node named ff) with F being the feature root
    RootFeature,
}

/// Emission rules that fire for parents `context`/`feature` once a child match was found.
pub fn classify(context: &Node, feature: &Node, contexts: &FlatMapping, features: &FlatMapping) -> Vec<Emission> {
    let mut out = Vec::with_capacity(2);
    let context_keyed = contexts.contains_key(&context.name);
    let feature_keyed = features.contains_key(&feature.name);

    if !context_keyed && !feature_keyed {
        if context.name != CONTEXT_ROOT && feature.name != FEATURE_ROOT {
            out.push(Emission::Direct);
        }
    } else if !context_keyed && feature_keyed {
        out.push(Emission::FeatureChild);
    }

    if context.parent == CONTEXT_ROOT && !context.constraint.is_group() {
        if feature.parent == FEATURE_ROOT {
            out.push(Emission::BothChildren);
        } else {
            out.push(Emission::ContextChild);
        }
    } else if feature.name == FEATURE_ROOT && !feature.constraint.is_group() {
        out.push(Emission::RootFeature);
    }

    out
}

//child names are re-resolved by name; an undeclared name emits nothing
fn resolve(
    emission: Emission,
    context: &Node,
    feature: &Node,
    child_context: &str,
    child_feature: &str,
    context_tree: &Tree,
    feature_tree: &Tree,
) -> Option<ConnectedPair> {
    match emission {
        Emission::Direct => Some(ConnectedPair::from_nodes(context, feature)),
        Emission::FeatureChild | Emission::RootFeature => {
            let f = feature_tree.get(child_feature)?;
            Some(ConnectedPair::from_nodes(context, f))
        }
        Emission::BothChildren => {
            let c = context_tree.get(child_context)?;
            let f = feature_tree.get(child_feature)?;
            Some(ConnectedPair::from_nodes(c, f))
        }
        Emission::ContextChild => {
            let c = context_tree.get(child_context)?;
            Some(ConnectedPair::from_nodes(c, feature))
        }
    }
}

/// Do children `cc` and `ff` activate each other (either direction)?
pub fn children_interact(cc: &str, ff: &str, contexts: &FlatMapping, features: &FlatMapping) -> bool {
    match (contexts.get(cc), features.get(ff)) {
        (Some(cc_targets), Some(ff_targets)) => cc_targets.contains(ff) || ff_targets.contains(cc),
        _ => false,
    }
}

/// Full context x feature cross product over children; returns the deduplicated pairs.
pub fn infer_connected_pairs(
    context_tree: &Tree,
    feature_tree: &Tree,
    contexts: &FlatMapping,
    features: &FlatMapping,
) -> BTreeSet<ConnectedPair> {
    let mut pairs = BTreeSet::new();

    for context in context_tree.nodes() {
        for feature in feature_tree.nodes() {
            for cc in &context.children {
                for ff in &feature.children {
                    if !children_interact(cc, ff, contexts, features) {
                        continue;
                    }
                    for emission in classify(context, feature, contexts, features) {
                        if let Some(pair) =
                            resolve(emission, context, feature, cc, ff, context_tree, feature_tree)
                        {
                            if pairs.insert(pair) {
                                debug!(context = %context.name, feature = %feature.name, ?emission, "connected pair");
                            }
                        }
                    }
                }
            }
        }
    }

    pairs
}

impl CfmModel {
    /// Recompute `connected_pairs` and the per-node `connections` they imply.
    pub fn generate_connected_pairs(&mut self) {
        let (contexts, features) = self.flattened_mappings();
        let pairs = infer_connected_pairs(&self.contexts, &self.features, &contexts, &features);

        for pair in &pairs {
            if let Some(c) = self.contexts.get_mut(&pair.parent_context) {
                c.connections.insert(pair.parent_feature.clone());
            }
            if let Some(f) = self.features.get_mut(&pair.parent_feature) {
                f.connections.insert(pair.parent_context.clone());
            }
        }

        info!(pairs = pairs.len(), "connected pairs inferred");
        self.connected_pairs = pairs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::MappingRow;
    use crate::core::tree::TreeRow;

    fn mk_model(contexts: &[TreeRow], features: &[TreeRow], mapping: &[MappingRow]) -> CfmModel {
        CfmModel::from_rows(contexts, features, mapping).unwrap()
    }

    fn names(ns: &[&str]) -> Vec<String> {
        ns.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn single_node_trees_yield_one_direct_pair() {
        let mut m = mk_model(
            &[TreeRow::new("A", "Alternative", &["x", "y"])],
            &[TreeRow::new("B", "Alternative", &["p", "q"])],
            &[MappingRow::new(&["x"], &["p"])],
        );

        m.generate_connected_pairs();

        let expected = ConnectedPair {
            parent_context: "A".into(),
            constraint_context: Constraint::Alternative,
            children_context: names(&["x", "y"]),
            parent_feature: "B".into(),
            constraint_feature: Constraint::Alternative,
            children_feature: names(&["p", "q"]),
        };
        assert_eq!(m.connected_pairs.len(), 1);
        assert!(m.connected_pairs.contains(&expected));

        //diagnostic connections follow the pair
        assert!(m.contexts.get("A").unwrap().connections.contains("B"));
        assert!(m.features.get("B").unwrap().connections.contains("A"));
    }

    #[test]
    fn no_mapping_means_no_pairs() {
        let mut m = mk_model(
            &[TreeRow::new("A", "or", &["x", "y"])],
            &[TreeRow::new("B", "or", &["p", "q"])],
            &[],
        );
        m.generate_connected_pairs();
        assert!(m.connected_pairs.is_empty());
    }

    #[test]
    fn reverse_direction_mapping_also_connects() {
        //x's forward mapping is overridden to q, but p still lists x as its activator
        let mut m = mk_model(
            &[TreeRow::new("A", "or", &["x", "y"])],
            &[TreeRow::new("B", "alternative", &["p"]), TreeRow::new("D", "optional", &["q"])],
            &[MappingRow::new(&["x"], &["p"]), MappingRow::new(&["x"], &["q"])],
        );
        m.generate_connected_pairs();

        assert!(m.connected_pairs.iter().any(|p| p.parent_context == "A" && p.parent_feature == "B"));
    }

    #[test]
    fn keyed_feature_parent_re_resolves_to_child_node() {
        //B is itself a mapping key, so the pair is recorded against the child q
        let mut m = mk_model(
            &[TreeRow::new("A", "or", &["x", "y"])],
            &[
                TreeRow::new("B", "alternative", &["p", "q"]),
                TreeRow::new("q", "or", &["q1", "q2"]),
            ],
            &[MappingRow::new(&["x"], &["q"]), MappingRow::new(&["y"], &["B"])],
        );
        m.generate_connected_pairs();

        let via_child = ConnectedPair {
            parent_context: "A".into(),
            constraint_context: Constraint::Or,
            children_context: names(&["x", "y"]),
            parent_feature: "q".into(),
            constraint_feature: Constraint::Or,
            children_feature: names(&["q1", "q2"]),
        };
        assert_eq!(m.connected_pairs, [via_child].into_iter().collect());
    }

    /// Top-level non-group context: the pair is re-keyed on the children themselves,
    /// which may name nodes other than the parents being iterated.
    #[test]
    fn top_level_mandatory_context_rekeys_on_children() {
        let mut m = mk_model(
            &[
                TreeRow::new("A", "mandatory", &["x"]),
                TreeRow::new("x", "or", &["x1", "x2"]),
            ],
            &[
                TreeRow::new("B", "optional", &["p"]),
                TreeRow::new("p", "alternative", &["p1", "p2"]),
            ],
            &[MappingRow::new(&["x"], &["p"])],
        );
        m.generate_connected_pairs();

        let direct = ConnectedPair {
            parent_context: "A".into(),
            constraint_context: Constraint::Mandatory,
            children_context: names(&["x"]),
            parent_feature: "B".into(),
            constraint_feature: Constraint::Optional,
            children_feature: names(&["p"]),
        };
        let children = ConnectedPair {
            parent_context: "x".into(),
            constraint_context: Constraint::Or,
            children_context: names(&["x1", "x2"]),
            parent_feature: "p".into(),
            constraint_feature: Constraint::Alternative,
            children_feature: names(&["p1", "p2"]),
        };
        assert_eq!(m.connected_pairs, [direct, children].into_iter().collect());
    }

    #[test]
    fn nested_feature_with_top_level_context_rekeys_context_only() {
        let mut m = mk_model(
            &[
                TreeRow::new("A", "optional", &["x"]),
                TreeRow::new("x", "or", &["x1"]),
            ],
            &[
                TreeRow::new("Feature", "optional", &["B"]),
                TreeRow::new("B", "optional", &["D"]),
                TreeRow::new("D", "alternative", &["p", "q"]),
            ],
            &[MappingRow::new(&["x"], &["p"])],
        );
        m.generate_connected_pairs();

        let direct = ConnectedPair {
            parent_context: "A".into(),
            constraint_context: Constraint::Optional,
            children_context: names(&["x"]),
            parent_feature: "D".into(),
            constraint_feature: Constraint::Alternative,
            children_feature: names(&["p", "q"]),
        };
        let context_child = ConnectedPair {
            parent_context: "x".into(),
            constraint_context: Constraint::Or,
            children_context: names(&["x1"]),
            ..direct.clone()
        };
        assert_eq!(m.connected_pairs, [direct, context_child].into_iter().collect());
    }

    #[test]
    fn leaf_child_resolves_with_empty_children() {
        let mut m = mk_model(
            &[TreeRow::new("A", "optional", &["x"])],
            &[TreeRow::new("B", "alternative", &["p", "q"])],
            &[MappingRow::new(&["x"], &["p"])],
        );
        m.generate_connected_pairs();

        //x and p are both leaves, so the re-keyed record carries empty child lists
        let both = ConnectedPair {
            parent_context: "x".into(),
            constraint_context: Constraint::Optional,
            children_context: vec![],
            parent_feature: "p".into(),
            constraint_feature: Constraint::Alternative,
            children_feature: vec![],
        };
        assert!(m.connected_pairs.contains(&both));
        assert_eq!(m.connected_pairs.len(), 2);
    }

    fn mk_root_feature_model(root_constraint: &str) -> CfmModel {
        mk_model(
            &[
                TreeRow::new("A", "or", &["x", "y"]),
                TreeRow::new("Context", "optional", &["N"]),
                TreeRow::new("N", "optional", &["M"]),
                TreeRow::new("M", "mandatory", &["z"]),
            ],
            &[TreeRow::new("Feature", root_constraint, &["B", "D"])],
            &[MappingRow::new(&["x"], &["B"]), MappingRow::new(&["z"], &["D"])],
        )
    }

    /// A non-group feature root pairs the iterated context with the root's matched child.
    #[test]
    fn mandatory_feature_root_pairs_context_with_matched_child() {
        let mut m = mk_root_feature_model("mandatory");
        m.generate_connected_pairs();

        //A is a top-level Or, M is nested: neither is re-keyed on its own child
        let top_level_or = ConnectedPair {
            parent_context: "A".into(),
            constraint_context: Constraint::Or,
            children_context: names(&["x", "y"]),
            parent_feature: "B".into(),
            constraint_feature: Constraint::Mandatory,
            children_feature: vec![],
        };
        let nested = ConnectedPair {
            parent_context: "M".into(),
            constraint_context: Constraint::Mandatory,
            children_context: names(&["z"]),
            parent_feature: "D".into(),
            constraint_feature: Constraint::Mandatory,
            children_feature: vec![],
        };
        assert_eq!(m.connected_pairs, [top_level_or, nested].into_iter().collect());
    }

    #[test]
    fn group_feature_root_emits_nothing() {
        let mut m = mk_root_feature_model("or");
        m.generate_connected_pairs();

        assert!(m.connected_pairs.is_empty());
    }

    #[test]
    fn classify_rules_for_feature_root() {
        let ctx = Node::new("A", crate::core::types::TreeKind::Context, "P", Constraint::Or, names(&["x"]));
        let root = Node::new(
            "Feature",
            crate::core::types::TreeKind::Feature,
            "Feature",
            Constraint::Mandatory,
            names(&["p"]),
        );
        let flat = FlatMapping::new();

        assert_eq!(classify(&ctx, &root, &flat, &flat), vec![Emission::RootFeature]);
    }

    #[test]
    fn inference_is_deterministic() {
        let build = || {
            let mut m = mk_model(
                &[
                    TreeRow::new("Context", "mandatory", &["A", "C"]),
                    TreeRow::new("A", "or", &["x", "y"]),
                    TreeRow::new("C", "alternative", &["z", "w"]),
                ],
                &[
                    TreeRow::new("Feature", "optional", &["B", "D"]),
                    TreeRow::new("B", "or", &["p", "q"]),
                    TreeRow::new("D", "alternative", &["r", "s"]),
                ],
                &[
                    MappingRow::new(&["x", "z"], &["p", "r"]),
                    MappingRow::new(&["y"], &["s"]),
                ],
            );
            m.generate_connected_pairs();
            m.connected_pairs
        };

        let first = build();
        assert!(!first.is_empty());
        assert_eq!(first, build());
    }
}
