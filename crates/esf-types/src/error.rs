use thiserror::Error;

/// Errors produced by data-model validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("question {question} has {actual} options, expected {expected}")]
    OptionCount {
        question: usize,
        expected: usize,
        actual: usize,
    },

    #[error("question {question}: correct index {index} is out of range for {options} options")]
    CorrectIndexOutOfRange {
        question: usize,
        index: usize,
        options: usize,
    },

    #[error("score {0} is outside 0..=100")]
    ScoreOutOfRange(u32),

    #[error("empty identifier")]
    EmptyId,
}
