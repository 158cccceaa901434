// mutation operators + oracle questions
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::connect::ConnectedPair;
use crate::core::model::CfmModel;
use crate::core::types::{Answer, Constraint};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationOperator {
    AltToOr,
    OrToAlt,
    OrToOpt,
    ManToOpt,
}

impl MutationOperator {
    pub fn from_to(self) -> (Constraint, Constraint) {
        match self {
            MutationOperator::AltToOr => (Constraint::Alternative, Constraint::Or),
            MutationOperator::OrToAlt => (Constraint::Or, Constraint::Alternative),
            MutationOperator::OrToOpt => (Constraint::Or, Constraint::Optional),
            MutationOperator::ManToOpt => (Constraint::Mandatory, Constraint::Optional),
        }
    }
}

impl fmt::Display for MutationOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (from, to) = self.from_to();
        write!(f, "{}To{}", from.short_name(), to.short_name())
    }
}

/// Which side(s) of a connected pair an operator rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Context,
    Feature,
    Both,
}

/// What the oracle question asks about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Probe {
    /// can the children of the target side(s) be active at the same time?
    SimultaneousActivation,
    /// can the children of the target side(s) be inactive at the same time?
    SimultaneousDeactivation,
    /// must the context parent be active in every configuration?
    AlwaysActive,
}

/// One row of the mutation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationRule {
    pub operator: MutationOperator,
    pub target: Target,
    pub probe: Probe,
    pub expected: Answer,
}

const fn rule(operator: MutationOperator, target: Target, probe: Probe, expected: Answer) -> MutationRule {
    MutationRule { operator, target, probe, expected }
}

use MutationOperator::*;
use Probe::*;

const ALT_ALT: &[MutationRule] = &[rule(AltToOr, Target::Both, SimultaneousActivation, Answer::Yes)];
const ALT_OR: &[MutationRule] = &[
    rule(AltToOr, Target::Context, SimultaneousActivation, Answer::Yes),
    rule(OrToAlt, Target::Feature, SimultaneousActivation, Answer::No),
];
const OR_ALT: &[MutationRule] = &[
    rule(OrToAlt, Target::Context, SimultaneousActivation, Answer::No),
    rule(AltToOr, Target::Feature, SimultaneousActivation, Answer::Yes),
];
const OR_OR: &[MutationRule] = &[
    rule(OrToAlt, Target::Both, SimultaneousActivation, Answer::No),
    rule(OrToOpt, Target::Both, SimultaneousDeactivation, Answer::Yes),
];
const ALT_FREE: &[MutationRule] = &[rule(AltToOr, Target::Context, SimultaneousActivation, Answer::Yes)];
const OR_FREE: &[MutationRule] = &[
    rule(OrToAlt, Target::Context, SimultaneousActivation, Answer::No),
    rule(OrToOpt, Target::Context, SimultaneousDeactivation, Answer::Yes),
];
const MAN_OPT: &[MutationRule] = &[rule(ManToOpt, Target::Context, AlwaysActive, Answer::No)];

/// Rules for a (context, feature) constraint pair. Pairs without an entry are no-ops.
pub fn rules_for(context: Constraint, feature: Constraint) -> &'static [MutationRule] {
    use Constraint::*;
    match (context, feature) {
        (Alternative, Alternative) => ALT_ALT,
        (Alternative, Or) => ALT_OR,
        (Or, Alternative) => OR_ALT,
        (Or, Or) => OR_OR,
        (Alternative, Optional | Mandatory) => ALT_FREE,
        (Or, Optional | Mandatory) => OR_FREE,
        (Mandatory, Optional) => MAN_OPT,
        (Mandatory, Mandatory | Or | Alternative) => &[],
        (Optional, _) => &[],
    }
}

/// A connected pair with one or both constraints rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mutant {
    pub operator: MutationOperator,
    pub target: Target,
    pub config: ConnectedPair,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub mutation: String,
    pub expected: Answer,
}

impl Question {
    pub fn expected_answers(&self) -> &'static [&'static str] {
        self.expected.tokens()
    }

    /// Does a (case-insensitive) reply match the expected answer?
    pub fn accepts(&self, reply: &str) -> bool {
        Answer::parse(reply) == Some(self.expected)
    }
}

/// Operators applied to one connected pair, for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub parent_context: String,
    pub parent_feature: String,
    pub applied: Vec<(MutationOperator, String)>,
}

impl MutationRule {
    /// Rewrite the target side(s) of `pair` to the operator's result.
    pub fn mutate(&self, pair: &ConnectedPair) -> Mutant {
        let (_, to) = self.operator.from_to();
        let config = match self.target {
            Target::Context => pair.with_constraints(to, pair.constraint_feature),
            Target::Feature => pair.with_constraints(pair.constraint_context, to),
            Target::Both => pair.with_constraints(to, to),
        };
        Mutant { operator: self.operator, target: self.target, config }
    }

    /// Names of the rewritten parent(s), as the audit log prints them.
    pub fn subject(&self, pair: &ConnectedPair) -> String {
        match self.target {
            Target::Context => pair.parent_context.clone(),
            Target::Feature => pair.parent_feature.clone(),
            Target::Both => format!("{} and {}", pair.parent_context, pair.parent_feature),
        }
    }

    pub fn question(&self, pair: &ConnectedPair) -> Question {
        let contexts = pair.children_context.join(",");
        let features = pair.children_feature.join(",");
        let (from, to) = self.operator.from_to();

        let subject = match self.target {
            Target::Context => format!("{contexts} contexts"),
            Target::Feature => format!("{features} features"),
            Target::Both => format!("{contexts} contexts and for {features} features"),
        };
        let text = match self.probe {
            SimultaneousActivation => format!("Is it possible for {subject} to be activated simultaneously?"),
            SimultaneousDeactivation => format!("Is it possible for {subject} to be deactivated simultaneously?"),
            AlwaysActive => format!("Do {} context(s) have to be activated in any configuration?", pair.parent_context),
        };
        let mutation = match self.target {
            Target::Context => format!(
                "Modify the constraint of {} context from {from} to {to} constraint",
                pair.parent_context
            ),
            Target::Feature => format!(
                "Modify the constraint of {} feature from {from} to {to} constraint",
                pair.parent_feature
            ),
            Target::Both => {
                //both sides at once read as a plural of the source kind
                let from = match from {
                    Constraint::Alternative => "Alternatives".to_string(),
                    other => other.to_string(),
                };
                format!(
                    "Modify the constraints of {} context and {} feature from {from} to {to} constraints",
                    pair.parent_context, pair.parent_feature
                )
            }
        };

        Question { text, mutation, expected: self.expected }
    }
}

/// Apply the rule table to every pair. Mutants and questions are index-aligned.
pub fn mutate_pairs<'a>(
    pairs: impl IntoIterator<Item = &'a ConnectedPair>,
) -> (Vec<Mutant>, Vec<Question>, Vec<AuditEntry>) {
    let mut mutants = Vec::new();
    let mut questions = Vec::new();
    let mut audit = Vec::new();

    for pair in pairs {
        let mut entry = AuditEntry {
            parent_context: pair.parent_context.clone(),
            parent_feature: pair.parent_feature.clone(),
            applied: Vec::new(),
        };

        for r in rules_for(pair.constraint_context, pair.constraint_feature) {
            debug!(operator = %r.operator, context = %pair.parent_context, feature = %pair.parent_feature, "applying");
            mutants.push(r.mutate(pair));
            questions.push(r.question(pair));
            entry.applied.push((r.operator, r.subject(pair)));
        }
        audit.push(entry);
    }

    (mutants, questions, audit)
}

/// Plain-text audit log: one block per processed pair, then the mutant total.
pub fn render_audit(audit: &[AuditEntry], total: usize) -> String {
    let mut out = String::new();
    for entry in audit {
        out.push_str(&format!(
            "Connected Pair processed: <{},{}>\n",
            entry.parent_context, entry.parent_feature
        ));
        for (op, subject) in &entry.applied {
            out.push_str(&format!("Applying {op} to {subject}.\n"));
        }
        out.push('\n');
    }
    out.push_str(&format!("Total mutant generated: {total}\n"));
    out
}

impl CfmModel {
    /// Recompute mutants, questions and the audit trail from `connected_pairs`.
    pub fn generate_mutants(&mut self) {
        let (mutants, questions, audit) = mutate_pairs(&self.connected_pairs);
        info!(pairs = self.connected_pairs.len(), mutants = mutants.len(), "mutants generated");

        self.mutants = mutants;
        self.questions = questions;
        self.audit = audit;
    }

    pub fn audit_log(&self) -> String {
        render_audit(&self.audit, self.mutants.len())
    }
}
