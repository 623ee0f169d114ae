//! Quiz generation.
//!
//! Builds open questions or multiple-choice items from a context passage
//! using the seq2seq generator. Multiple-choice items pair a greedy
//! reference answer with sampled distractors.


use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::inference::error::InferenceError;
use crate::inference::generator::{QuestionGenerator, SamplingParams};

/// Token budget for one generated question.
const QUESTION_MAX_NEW_TOKENS: usize = 100;
/// Token budget for answers and distractors.
const ANSWER_MAX_NEW_TOKENS: usize = 50;
/// Wrong options per multiple-choice item.
const DISTRACTOR_COUNT: usize = 3;

/// Errors surfaced while building a quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Context is empty after processing")]
    EmptyContext,

    #[error("Question count must be at least 1")]
    ZeroCount,

    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
}

/// The shape of quiz to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuestionKind {
    /// Free-form questions without answer options.
    Open,
    /// Multiple-choice items with one correct option.
    Mcq,
}

/// One multiple-choice item.
#[derive(Debug, Clone, Serialize)]
pub struct McqItem {
    pub question: String,
    /// Shuffled options, `answer` included.
    pub options: Vec<String>,
    pub answer: String,
}

/// A built quiz, serialized as `{"questions": [...]}` or `{"mcqs": [...]}`.
#[derive(Debug, Serialize)]
pub enum QuizOutput {
    #[serde(rename = "questions")]
    Questions(Vec<String>),
    #[serde(rename = "mcqs")]
    Mcqs(Vec<McqItem>),
}

impl QuizOutput {
    /// Number of questions or items in the quiz.
    pub fn len(&self) -> usize {
        match self {
            QuizOutput::Questions(qs) => qs.len(),
            QuizOutput::Mcqs(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds quizzes from context passages.
#[derive(Debug)]
pub struct QuizBuilder {
    generator: QuestionGenerator,
}

impl QuizBuilder {
    /// Creates a builder from an already-loaded generator.
    pub fn new(generator: QuestionGenerator) -> Self {
        Self { generator }
    }

    /// Creates a stub builder (no model files required).
    pub fn stub() -> Result<Self, InferenceError> {
        Ok(Self::new(QuestionGenerator::stub()?))
    }

    /// Builds a quiz of `count` questions of the given kind.
    pub fn build(
        &self,
        context: &str,
        count: usize,
        kind: QuestionKind,
    ) -> Result<QuizOutput, QuizError> {
        self.build_with_rng(context, count, kind, &mut rand::thread_rng())
    }

    /// Like [`build`](Self::build) with a caller-provided RNG for the
    /// option shuffle.
    pub fn build_with_rng<R: Rng>(
        &self,
        context: &str,
        count: usize,
        kind: QuestionKind,
        rng: &mut R,
    ) -> Result<QuizOutput, QuizError> {
        let context = context.trim();
        if context.is_empty() {
            return Err(QuizError::EmptyContext);
        }
        if count == 0 {
            return Err(QuizError::ZeroCount);
        }

        info!(count, ?kind, context_len = context.len(), "Building quiz");

        match kind {
            QuestionKind::Open => {
                // Open questions keep the full completion text.
                let raw = self.sample_questions(&open_prompt(count, context), count)?;
                let questions = take_distinct(
                    raw.into_iter()
                        .map(|q| open_question(&q))
                        .filter(|q| !q.is_empty()),
                    count,
                );
                Ok(QuizOutput::Questions(questions))
            }
            QuestionKind::Mcq => {
                let raw = self.sample_questions(&mcq_prompt(count, context), count)?;
                let questions = take_distinct(
                    raw.into_iter()
                        .map(|q| normalize_question(&q))
                        .filter(|q| !q.is_empty()),
                    count,
                );

                let mut items = Vec::with_capacity(questions.len());
                for question in questions {
                    items.push(self.build_mcq_item(context, &question, rng)?);
                }
                Ok(QuizOutput::Mcqs(items))
            }
        }
    }

    /// Returns `true` if the generator runs in stub mode.
    pub fn is_stub(&self) -> bool {
        self.generator.is_stub()
    }

    fn sample_questions(&self, prompt: &str, count: usize) -> Result<Vec<String>, QuizError> {
        let params = SamplingParams {
            max_new_tokens: QUESTION_MAX_NEW_TOKENS,
            num_return_sequences: count,
            ..sampled_params()
        };

        Ok(self.generator.generate(prompt, &params)?)
    }

    fn build_mcq_item<R: Rng>(
        &self,
        context: &str,
        question: &str,
        rng: &mut R,
    ) -> Result<McqItem, QuizError> {
        let answer_prompt = format!(
            "question: {} context: {} What is the correct answer?",
            question, context
        );
        let answer = self
            .generator
            .generate(&answer_prompt, &SamplingParams::greedy(ANSWER_MAX_NEW_TOKENS))?
            .into_iter()
            .next()
            .unwrap_or_default();

        let distractor_prompt = format!(
            "Generate {} wrong answers for: {} context: {}",
            DISTRACTOR_COUNT, question, context
        );
        let raw = self.generator.generate(
            &distractor_prompt,
            &SamplingParams {
                max_new_tokens: ANSWER_MAX_NEW_TOKENS,
                num_return_sequences: DISTRACTOR_COUNT,
                ..sampled_params()
            },
        )?;

        // Distractors must not collide with the answer or each other,
        // ignoring case.
        let answer_lower = answer.to_lowercase();
        let distractors: Vec<String> = dedup_case_insensitive(
            raw.into_iter()
                .filter(|d| !d.is_empty() && d.to_lowercase() != answer_lower),
        )
        .into_iter()
        .take(DISTRACTOR_COUNT)
        .collect();

        debug!(
            question,
            distractors = distractors.len(),
            "Multiple-choice item assembled"
        );

        let mut options = Vec::with_capacity(1 + distractors.len());
        options.push(answer.clone());
        options.extend(distractors);
        options.shuffle(rng);

        Ok(McqItem {
            question: question.to_string(),
            options,
            answer,
        })
    }
}

fn open_prompt(count: usize, context: &str) -> String {
    format!("Generate {} questions about: {}", count, context)
}

fn mcq_prompt(count: usize, context: &str) -> String {
    format!("Generate {} multiple choice questions about: {}", count, context)
}

/// Decoding parameters shared by all sampled generations.
fn sampled_params() -> SamplingParams {
    SamplingParams {
        temperature: Some(0.7),
        top_k: Some(50),
        top_p: Some(0.95),
        repetition_penalty: 1.2,
        ..Default::default()
    }
}

/// An open question is the completion as generated, only trimmed.
fn open_question(raw: &str) -> String {
    raw.trim().to_string()
}

/// Trims a generated question and cuts it at the first question mark.
/// Only multiple-choice questions get this treatment; trailing text after
/// the `?` would otherwise leak into the answer prompts.
fn normalize_question(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match trimmed.split_once('?') {
        Some((head, _)) => format!("{}?", head.trim_end()),
        None => trimmed.to_string(),
    }
}

/// Deduplicates case-insensitively and truncates to `count`, logging when
/// the generator came up short.
fn take_distinct<I>(items: I, count: usize) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut distinct = dedup_case_insensitive(items);
    if distinct.len() < count {
        warn!(
            requested = count,
            produced = distinct.len(),
            "Generator produced fewer distinct questions than requested"
        );
    }
    distinct.truncate(count);
    distinct
}

/// Removes case-insensitive duplicates, keeping first occurrences in order.
fn dedup_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();

    for item in items {
        if seen.insert(item.to_lowercase()) {
            out.push(item);
        }
    }

    out
}
