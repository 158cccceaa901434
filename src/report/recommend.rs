// yes/no oracle session over the generated questions
use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::core::error::CfmError;
use crate::core::mutate::Question;
use crate::core::types::Answer;

/// Outcome of answering every question once.
///
/// A reply matching the expected answer means the mutant describes the system
/// better than the model does, so its mutation is suggested. Every other reply
/// kills the mutant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecommendationSummary {
    pub killed: usize,
    pub total: usize,
    pub suggestions: BTreeSet<String>,
}

impl RecommendationSummary {
    fn record(&mut self, question: &Question, answer: Answer) {
        self.total += 1;
        if answer == question.expected {
            self.suggestions.insert(question.mutation.clone());
        } else {
            self.killed += 1;
        }
    }

    pub fn score_line(&self) -> String {
        format!("Mutation score: {}/{}.", self.killed, self.total)
    }
}

pub struct Recommender<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Recommender<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    //re-prompts until yes/y/no/n; end of input is an error
    fn ask(&mut self, question: &Question) -> Result<Answer, CfmError> {
        loop {
            writeln!(self.output, "{} (yes/no): ", question.text)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed before all questions were answered").into());
            }
            match Answer::parse(&line) {
                Some(answer) => return Ok(answer),
                None => writeln!(self.output, "Invalid response. Please enter 'yes', 'y', 'no' or 'n'.")?,
            }
        }
    }

    pub fn run(&mut self, questions: &[Question]) -> Result<RecommendationSummary, CfmError> {
        writeln!(self.output, "Answer each question carefully. Accepted answers are among (yes, y, no, n).")?;

        let mut summary = RecommendationSummary::default();
        for (i, question) in questions.iter().enumerate() {
            writeln!(self.output, "\nQuestion {}:", i + 1)?;
            let answer = self.ask(question)?;
            debug!(question = i + 1, ?answer, "answered");

            if answer == question.expected {
                writeln!(self.output, "Suggestion: {}", question.mutation)?;
            }
            summary.record(question, answer);
        }

        writeln!(self.output, "{}", summary.score_line())?;
        writeln!(self.output, "Summary of the recommendations:")?;
        for s in &summary.suggestions {
            writeln!(self.output, "- {s}")?;
        }
        Ok(summary)
    }
}
