// shared vocabulary of the two trees
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type NodeId = u32;

/// Name of the synthetic root of the context tree.
pub const CONTEXT_ROOT: &str = "Context";
/// Name of the synthetic root of the feature tree.
pub const FEATURE_ROOT: &str = "Feature";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TreeKind {
    Context,
    Feature,
}

impl TreeKind {
    pub fn root_name(self) -> &'static str {
        match self {
            TreeKind::Context => CONTEXT_ROOT,
            TreeKind::Feature => FEATURE_ROOT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TreeKind::Context => "context",
            TreeKind::Feature => "feature",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How the children of a node may be (de)activated together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Constraint {
    /// every child is active whenever the parent is
    Mandatory,
    /// any subset, including none
    Optional,
    /// at least one child
    Or,
    /// exactly one child
    Alternative,
}

impl Constraint {
    pub const ALL: [Constraint; 4] = [
        Constraint::Mandatory,
        Constraint::Optional,
        Constraint::Or,
        Constraint::Alternative,
    ];

    /// Or and Alternative restrict how many children may be active at once.
    pub fn is_group(self) -> bool {
        matches!(self, Constraint::Or | Constraint::Alternative)
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Constraint::Mandatory => "Man",
            Constraint::Optional => "Opt",
            Constraint::Or => "Or",
            Constraint::Alternative => "Alt",
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Constraint::Mandatory => "Mandatory",
            Constraint::Optional => "Optional",
            Constraint::Or => "Or",
            Constraint::Alternative => "Alternative",
        };
        f.write_str(s)
    }
}

/// Unknown constraint token; callers attach line/tree information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownConstraint(pub String);

impl FromStr for Constraint {
    type Err = UnknownConstraint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mandatory" => Ok(Constraint::Mandatory),
            "optional" => Ok(Constraint::Optional),
            "or" => Ok(Constraint::Or),
            "alternative" => Ok(Constraint::Alternative),
            _ => Err(UnknownConstraint(s.to_string())),
        }
    }
}

/// Oracle answer of a yes/no question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Tokens accepted as this answer (already lowercase).
    pub fn tokens(self) -> &'static [&'static str] {
        match self {
            Answer::Yes => &["yes", "y"],
            Answer::No => &["no", "n"],
        }
    }

    /// Parse a user reply; `None` for anything outside yes/y/no/n.
    pub fn parse(reply: &str) -> Option<Answer> {
        match reply.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" => Some(Answer::Yes),
            "no" | "n" => Some(Answer::No),
            _ => None,
        }
    }
}
