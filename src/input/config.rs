use std::path::PathBuf;

pub const DEFAULT_MODEL_DIR: &str = "models/examples/runningexample";
pub const DEFAULT_AUDIT_LOG: &str = "models/mutants/mutations.txt";

/// Where the model is read from and where results go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub contexts_path: PathBuf,
    pub features_path: PathBuf,
    pub mapping_path: PathBuf,
    /// plain-text operator log; `None` skips writing it
    pub audit_path: Option<PathBuf>,
    /// TOON export of pairs, mutants and questions
    pub export_path: Option<PathBuf>,
    /// ask the oracle questions on stdin/stdout
    pub interactive: bool,
}

impl AnalysisConfig {
    /// Default file names inside one model directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            contexts_path: dir.join("contexts.txt"),
            features_path: dir.join("features.txt"),
            mapping_path: dir.join("mapping.txt"),
            audit_path: Some(PathBuf::from(DEFAULT_AUDIT_LOG)),
            export_path: None,
            interactive: false,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_MODEL_DIR)
    }
}
