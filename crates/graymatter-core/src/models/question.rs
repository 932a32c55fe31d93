use serde_json::{Map, Value, json};

use crate::error::CoreError;

pub mod kind {
    pub const MATRIX: &str = "matrix";
    pub const MULTIPLE_CHOICE: &str = "multiple_choice";
    pub const OPEN_TEXT: &str = "open_text";
}

/// Keys of a multiple-choice block that stored options may not override.
pub const RESERVED_BLOCK_KEYS: [&str; 3] = ["id", "type", "question"];

/// A question row as persisted: a type string plus a free-form `extra_data`
/// payload whose shape depends on the type.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredQuestion {
    pub id: i32,
    pub kind: String,
    pub matrix_id: Option<i32>,
    pub group: Option<String>,
    pub question: String,
    pub extra_data: Option<Value>,
}

/// A decoded question. Each kind carries only the fields valid for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: i32,
    pub text: String,
    pub kind: QuestionKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Matrix { matrix_id: i32, group: String },
    MultipleChoice { options: Map<String, Value> },
    OpenText { placeholder: Option<String> },
}

impl QuestionKind {
    /// The type string stored in the `questions.type` column.
    pub fn type_name(&self) -> &'static str {
        match self {
            QuestionKind::Matrix { .. } => kind::MATRIX,
            QuestionKind::MultipleChoice { .. } => kind::MULTIPLE_CHOICE,
            QuestionKind::OpenText { .. } => kind::OPEN_TEXT,
        }
    }

    /// The `extra_data` payload persisted for this kind.
    pub fn extra_data(&self) -> Option<Value> {
        match self {
            QuestionKind::Matrix { .. } => None,
            QuestionKind::MultipleChoice { options } => {
                Some(json!({ "multipleChoice": Value::Object(options.clone()) }))
            }
            QuestionKind::OpenText { placeholder } => {
                Some(json!({ "openText": { "inputPlaceholder": placeholder } }))
            }
        }
    }
}

impl TryFrom<StoredQuestion> for Question {
    type Error = CoreError;

    fn try_from(stored: StoredQuestion) -> Result<Self, Self::Error> {
        let question_id = stored.id;
        let kind = match stored.kind.as_str() {
            kind::MATRIX => QuestionKind::Matrix {
                matrix_id: stored.matrix_id.ok_or(CoreError::MissingField {
                    question_id,
                    field: "matrix_id",
                })?,
                group: stored.group.ok_or(CoreError::MissingField {
                    question_id,
                    field: "group",
                })?,
            },
            kind::MULTIPLE_CHOICE => {
                let mut options = stored
                    .extra_data
                    .as_ref()
                    .and_then(|extra| extra.get("multipleChoice"))
                    .and_then(Value::as_object)
                    .cloned()
                    .unwrap_or_default();
                for key in RESERVED_BLOCK_KEYS {
                    options.remove(key);
                }
                QuestionKind::MultipleChoice { options }
            }
            kind::OPEN_TEXT => QuestionKind::OpenText {
                placeholder: stored
                    .extra_data
                    .as_ref()
                    .and_then(|extra| extra.pointer("/openText/inputPlaceholder"))
                    .and_then(Value::as_str)
                    .map(str::to_string),
            },
            other => {
                return Err(CoreError::UnknownQuestionType {
                    question_id,
                    kind: other.to_string(),
                });
            }
        };

        Ok(Question {
            id: question_id,
            text: stored.question,
            kind,
        })
    }
}
