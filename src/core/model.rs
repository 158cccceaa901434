// the context-feature model: both trees, the activation mapping and analysis results
use std::collections::{BTreeSet, HashMap};

use tracing::info;

use crate::core::connect::ConnectedPair;
use crate::core::error::CfmError;
use crate::core::mapping::MappingRow;
use crate::core::mutate::{AuditEntry, Mutant, Question};
use crate::core::tree::{Tree, TreeRow};
use crate::core::types::TreeKind;
use crate::input::config::AnalysisConfig;
use crate::input::parse::{load_mapping, load_tree};

#[derive(Debug, Clone)]
pub struct CfmModel {
    pub contexts: Tree,
    pub features: Tree,

    /// context name (possibly hyphen-joined) -> features it activates
    pub context_activates: HashMap<String, Vec<String>>,
    /// feature name (possibly hyphen-joined) -> contexts activating it
    pub feature_activates: HashMap<String, Vec<String>>,

    pub connected_pairs: BTreeSet<ConnectedPair>,
    pub mutants: Vec<Mutant>,
    pub questions: Vec<Question>,
    pub audit: Vec<AuditEntry>,
}

impl CfmModel {
    pub fn new(contexts: Tree, features: Tree) -> Self {
        Self {
            contexts,
            features,
            context_activates: HashMap::new(),
            feature_activates: HashMap::new(),
            connected_pairs: BTreeSet::new(),
            mutants: Vec::new(),
            questions: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Build both trees, then the activation mapping. Stops at the first format error.
    pub fn from_rows(
        context_rows: &[TreeRow],
        feature_rows: &[TreeRow],
        mapping_rows: &[MappingRow],
    ) -> Result<Self, CfmError> {
        let contexts = Tree::from_rows(TreeKind::Context, context_rows)?;
        let features = Tree::from_rows(TreeKind::Feature, feature_rows)?;

        let mut model = CfmModel::new(contexts, features);
        for row in mapping_rows {
            model.add_mapping_row(row)?;
        }

        info!(
            contexts = model.contexts.len(),
            features = model.features.len(),
            mapping_keys = model.context_activates.len(),
            "model built"
        );
        Ok(model)
    }

    /// Read and parse the three input files named by `config`, then build.
    pub fn load(config: &AnalysisConfig) -> Result<Self, CfmError> {
        let context_rows = load_tree(&config.contexts_path)?;
        let feature_rows = load_tree(&config.features_path)?;
        let mapping_rows = load_mapping(&config.mapping_path)?;
        Self::from_rows(&context_rows, &feature_rows, &mapping_rows)
    }

    /// Inference then mutation, from scratch. Results of an earlier run are dropped.
    pub fn analyze(&mut self) {
        self.generate_connected_pairs();
        self.generate_mutants();
    }

    /// Tree a name is declared in; contexts win if both declare it.
    pub fn tree_of(&self, name: &str) -> Option<TreeKind> {
        if self.contexts.contains(name) {
            Some(TreeKind::Context)
        } else if self.features.contains(name) {
            Some(TreeKind::Feature)
        } else {
            None
        }
    }
}
