// audit log + TOON export
use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::core::connect::ConnectedPair;
use crate::core::error::CfmError;
use crate::core::model::CfmModel;
use crate::core::mutate::{Mutant, Question};

/// Everything a run produced, borrowed from the model for serialization.
#[derive(Debug, Serialize)]
pub struct MutationReport<'a> {
    pub connected_pairs: Vec<&'a ConnectedPair>,
    pub mutants: &'a [Mutant],
    pub questions: &'a [Question],
}

impl<'a> MutationReport<'a> {
    pub fn from_model(model: &'a CfmModel) -> Self {
        Self {
            connected_pairs: model.connected_pairs.iter().collect(),
            mutants: &model.mutants,
            questions: &model.questions,
        }
    }

    pub fn to_toon(&self) -> Result<String, CfmError> {
        toon_format::encode_default(self).map_err(|e| CfmError::Export(e.to_string()))
    }
}

fn write_creating_dirs(path: &Path, contents: &str) -> Result<(), CfmError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, contents)?;
    Ok(())
}

pub fn write_audit_log(model: &CfmModel, path: &Path) -> Result<(), CfmError> {
    write_creating_dirs(path, &model.audit_log())?;
    info!(path = %path.display(), "audit log written");
    Ok(())
}

pub fn write_toon(model: &CfmModel, path: &Path) -> Result<(), CfmError> {
    let toon = MutationReport::from_model(model).to_toon()?;
    write_creating_dirs(path, &toon)?;
    info!(path = %path.display(), mutants = model.mutants.len(), "report exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::MappingRow;
    use crate::core::tree::TreeRow;

    fn mk_analyzed() -> CfmModel {
        let mut m = CfmModel::from_rows(
            &[TreeRow::new("A", "or", &["x", "y"])],
            &[TreeRow::new("B", "or", &["p", "q"])],
            &[MappingRow::new(&["x"], &["p"])],
        )
        .unwrap();
        m.analyze();
        m
    }

    #[test]
    fn audit_log_is_written_under_new_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mutants").join("mutations.txt");
        let m = mk_analyzed();

        write_audit_log(&m, &path).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Connected Pair processed: <A,B>"));
        assert!(text.contains("Applying OrToOpt to A and B."));
        assert!(text.ends_with("Total mutant generated: 2\n"));
    }

    #[test]
    fn report_borrows_everything_from_the_model() {
        let m = mk_analyzed();
        let report = MutationReport::from_model(&m);

        assert_eq!(report.connected_pairs.len(), 1);
        assert_eq!(report.mutants.len(), 2);
        assert_eq!(report.questions.len(), 2);
    }

    #[test]
    fn toon_export_mentions_pair_names() {
        let m = mk_analyzed();
        let toon = MutationReport::from_model(&m).to_toon().unwrap();

        assert!(toon.contains("parent_context"));
        assert!(toon.contains("OrToAlt"));
    }
}
