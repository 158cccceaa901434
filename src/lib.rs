//! Mutation testing over the constraints of a context-feature model.
//!
//! A run builds the context and feature trees, links them through the activation
//! mapping, infers which (context, feature) constraint pairs interact, and derives
//! constraint mutants together with yes/no oracle questions.

pub mod core;
pub mod input;
pub mod report;

pub use crate::core::connect::ConnectedPair;
pub use crate::core::error::CfmError;
pub use crate::core::mapping::MappingRow;
pub use crate::core::model::CfmModel;
pub use crate::core::mutate::{Mutant, MutationOperator, Question};
pub use crate::core::tree::{Tree, TreeRow};
pub use crate::core::types::{Answer, Constraint, TreeKind};
pub use crate::input::config::AnalysisConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log to stderr, honouring `RUST_LOG`; defaults to info for this crate.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cfm_mutation=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
