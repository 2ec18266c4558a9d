use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Every quiz question offers exactly this many options.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Open-ended exercise. No answer key is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub scenario: String,
    pub instructions: String,
}

/// Exactly-scored multiple choice question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_index: usize,
    pub explanation: String,
}

impl QuizQuestion {
    pub fn is_correct(&self, chosen: usize) -> bool {
        chosen == self.correct_index
    }
}

/// Content type tag of an attached source material.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Image,
    Video,
    Audio,
    Pdf,
    Text,
}

/// Material attached to a lesson, carried inline (base64 or plain text).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMaterial {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub name: String,
    pub mime_type: String,
    pub content: String,
}

/// A lesson in the fixed library.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    /// The admin who owns the lesson.
    pub user_id: String,
    pub title: String,
    pub summary: String,
    pub exercises: Vec<Exercise>,
    pub tests: Vec<QuizQuestion>,
    pub article: String,
    pub sources: Vec<SourceMaterial>,
    pub timestamp: u64,
}

impl Lesson {
    /// Check structural invariants: non-empty id, four options per question
    /// and a `correct_index` that points at one of them.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.id.is_empty() {
            return Err(TypeError::EmptyId);
        }
        for (i, q) in self.tests.iter().enumerate() {
            if q.options.len() != QUIZ_OPTION_COUNT {
                return Err(TypeError::OptionCount {
                    question: i,
                    expected: QUIZ_OPTION_COUNT,
                    actual: q.options.len(),
                });
            }
            if q.correct_index >= q.options.len() {
                return Err(TypeError::CorrectIndexOutOfRange {
                    question: i,
                    index: q.correct_index,
                    options: q.options.len(),
                });
            }
        }
        Ok(())
    }

    /// Score a set of chosen options (question index -> option index) on a
    /// 0..=100 scale. Unanswered questions count as wrong.
    pub fn grade(&self, responses: &std::collections::BTreeMap<u32, u32>) -> u32 {
        if self.tests.is_empty() {
            return 0;
        }
        let correct = self
            .tests
            .iter()
            .enumerate()
            .filter(|(i, q)| {
                responses
                    .get(&(*i as u32))
                    .is_some_and(|chosen| q.is_correct(*chosen as usize))
            })
            .count();
        ((correct * 100) / self.tests.len()) as u32
    }
}
