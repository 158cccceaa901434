/*
Inputs:

    contexts.txt   parent/constraint/child1-child2-...

    features.txt   same layout as contexts.txt

    mapping.txt    ctxA ctxB -ACTIVATES- featX featY

Outputs:

    TreeRow per non-blank tree line (constraint token kept raw, checked by Tree::from_rows)

    MappingRow per non-blank mapping line (names kept raw, checked against the trees)
*/
use std::fs;
use std::path::Path;

use crate::core::error::CfmError;
use crate::core::mapping::{MappingRow, NAME_SEPARATOR};
use crate::core::tree::TreeRow;

pub const FIELD_SEPARATOR: char = '/';
pub const ACTIVATES: &str = "-ACTIVATES-";

pub fn parse_tree(source_name: &str, text: &str) -> Result<Vec<TreeRow>, CfmError> {
    let mut rows = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() < 3 || fields[0].trim().is_empty() {
            return Err(CfmError::MalformedLine {
                source_name: source_name.to_string(),
                line: i + 1,
                content: line.to_string(),
            });
        }

        let children = fields[2]
            .split(NAME_SEPARATOR)
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        rows.push(TreeRow {
            parent: fields[0].trim().to_string(),
            constraint: fields[1].trim().to_string(),
            children,
            line: i + 1,
        });
    }

    Ok(rows)
}

pub fn parse_mapping(source_name: &str, text: &str) -> Result<Vec<MappingRow>, CfmError> {
    let mut rows = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let Some((left, right)) = line.split_once(ACTIVATES) else {
            return Err(CfmError::MalformedLine {
                source_name: source_name.to_string(),
                line: i + 1,
                content: line.to_string(),
            });
        };

        rows.push(MappingRow {
            contexts: left.split_whitespace().map(str::to_string).collect(),
            features: right.split_whitespace().map(str::to_string).collect(),
        });
    }

    Ok(rows)
}

pub fn read_input(path: &Path) -> Result<String, CfmError> {
    fs::read_to_string(path).map_err(|source| CfmError::MissingInput { path: path.to_path_buf(), source })
}

pub fn load_tree(path: &Path) -> Result<Vec<TreeRow>, CfmError> {
    parse_tree(&path.display().to_string(), &read_input(path)?)
}

pub fn load_mapping(path: &Path) -> Result<Vec<MappingRow>, CfmError> {
    parse_mapping(&path.display().to_string(), &read_input(path)?)
}
