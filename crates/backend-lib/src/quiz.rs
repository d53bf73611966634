// ============================
// campus-backend-lib/src/quiz.rs
// ============================
//! The fixed exam quiz and its grading.
use campus_common::QuestionView;
use thiserror::Error;
use crate::error::AppError;

/// A multiple-choice question with its answer key
#[derive(Debug)]
pub struct Question {
    pub prompt: &'static str,
    pub options: &'static [&'static str],
    pub answer: &'static str,
}

/// The question set every student sits
pub static QUESTIONS: [Question; 2] = [
    Question {
        prompt: "What is 2+2?",
        options: &["3", "4", "5"],
        answer: "4",
    },
    Question {
        prompt: "What is the capital of France?",
        options: &["Berlin", "London", "Paris"],
        answer: "Paris",
    },
];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum QuizError {
    #[error("expected {expected} answers, got {got}")]
    AnswerCountMismatch { expected: usize, got: usize },
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

/// Questions as shown to students, answer key stripped
pub fn public_questions(questions: &[Question]) -> Vec<QuestionView> {
    questions
        .iter()
        .map(|q| QuestionView {
            question: q.prompt.to_string(),
            options: q.options.iter().map(|o| o.to_string()).collect(),
        })
        .collect()
}

/// Count the positions where the answer matches the key. The answers
/// must line up one-to-one with the questions.
pub fn grade(questions: &[Question], answers: &[String]) -> Result<u32, QuizError> {
    if answers.len() != questions.len() {
        return Err(QuizError::AnswerCountMismatch {
            expected: questions.len(),
            got: answers.len(),
        });
    }

    let correct = questions
        .iter()
        .zip(answers)
        .filter(|(question, answer)| question.answer == answer.as_str())
        .count();
    Ok(correct as u32)
}
