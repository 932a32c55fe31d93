use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown question type '{kind}' on question {question_id}")]
    UnknownQuestionType { question_id: i32, kind: String },

    #[error("question {question_id} is missing required field: {field}")]
    MissingField { question_id: i32, field: &'static str },

    #[error("invalid survey draft: {0}")]
    InvalidDraft(String),

    #[error("invalid language code: {0}")]
    InvalidLanguage(String),
}
