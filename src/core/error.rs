use std::path::PathBuf;

use crate::core::types::TreeKind;

/// Every failure is fatal for a run: nothing is retried or partially recovered.
#[derive(Debug, thiserror::Error)]
pub enum CfmError {
    #[error("FORMAT ERROR: in the {tree} tree, line {line}: '{token}' does not define a valid relationship")]
    InvalidConstraint { tree: TreeKind, line: usize, token: String },

    #[error("FORMAT ERROR: {source_name} line {line} is malformed: '{content}'")]
    MalformedLine { source_name: String, line: usize, content: String },

    #[error("FORMAT ERROR: the {side} '{name}' in the mapping is not defined in any tree")]
    UndefinedMappingName { name: String, side: TreeKind },

    #[error("cannot read input file {}: {source}", .path.display())]
    MissingInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("export failed: {0}")]
    Export(String),
}
