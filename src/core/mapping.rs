// activation mapping between the context tree and the feature tree
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::core::error::CfmError;
use crate::core::model::CfmModel;
use crate::core::types::TreeKind;

/// Separator of composite (hyphen-joined) names.
pub const NAME_SEPARATOR: char = '-';

/// name -> union of all names it is mapped to, after splitting composite keys
pub type FlatMapping = HashMap<String, BTreeSet<String>>;

/// "contexts -ACTIVATES- features": every left name activates the whole right list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRow {
    pub contexts: Vec<String>,
    pub features: Vec<String>,
}

impl MappingRow {
    pub fn new(contexts: &[&str], features: &[&str]) -> Self {
        Self {
            contexts: contexts.iter().map(|c| c.to_string()).collect(),
            features: features.iter().map(|f| f.to_string()).collect(),
        }
    }
}

/// Split hyphen-joined keys so each individual name carries the full value list.
/// Keys sharing a component are merged into one set.
pub fn flatten(mapping: &HashMap<String, Vec<String>>) -> FlatMapping {
    let mut flat: FlatMapping = HashMap::new();
    for (key, values) in mapping {
        for part in key.split(NAME_SEPARATOR) {
            flat.entry(part.to_string()).or_default().extend(values.iter().cloned());
        }
    }
    flat
}

impl CfmModel {
    //every component of every name must be declared in one of the two trees
    fn check_mapping_definitions(&self, names: &[String], side: TreeKind) -> Result<(), CfmError> {
        for name in names {
            for part in name.split(NAME_SEPARATOR) {
                if self.tree_of(part).is_none() {
                    return Err(CfmError::UndefinedMappingName { name: part.to_string(), side });
                }
            }
        }
        Ok(())
    }

    /// Validate then insert one mapping row. A key seen in an earlier row is replaced,
    /// not merged.
    pub fn add_mapping_row(&mut self, row: &MappingRow) -> Result<(), CfmError> {
        self.check_mapping_definitions(&row.contexts, TreeKind::Context)?;
        self.check_mapping_definitions(&row.features, TreeKind::Feature)?;

        for context in &row.contexts {
            if let Some(old) = self.context_activates.insert(context.clone(), row.features.clone()) {
                debug!(context = %context, ?old, new = ?row.features, "mapping overwritten");
            }
        }
        for feature in &row.features {
            self.feature_activates.insert(feature.clone(), row.contexts.clone());
        }
        Ok(())
    }

    pub fn activated_features(&self, context: &str) -> Option<&[String]> {
        self.context_activates.get(context).map(Vec::as_slice)
    }

    pub fn activating_contexts(&self, feature: &str) -> Option<&[String]> {
        self.feature_activates.get(feature).map(Vec::as_slice)
    }

    /// (context -> features, feature -> contexts), both flattened.
    pub fn flattened_mappings(&self) -> (FlatMapping, FlatMapping) {
        (flatten(&self.context_activates), flatten(&self.feature_activates))
    }

    pub fn mapping_len(&self) -> usize {
        self.context_activates.len()
    }
}
