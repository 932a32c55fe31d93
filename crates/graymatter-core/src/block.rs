//! Display-ready survey blocks produced by survey assembly.
//!
//! The serialized form is what clients render and what gets frozen into a
//! client-survey snapshot, so field names here are part of the wire format.

use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SurveyBlock {
    Matrix(MatrixBlock),
    MultipleChoice(MultipleChoiceBlock),
    OpenText(OpenTextBlock),
}

/// One block per matrix group, carrying every question of the group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixBlock {
    pub group: String,
    pub title: String,
    pub columns: Value,
    pub answers: Value,
    pub instructions: Option<String>,
    pub questions: Vec<MatrixItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixItem {
    pub id: i32,
    pub question: String,
}

/// The stored choice options are flattened next to `id` and `question`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultipleChoiceBlock {
    pub id: i32,
    pub question: String,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpenTextBlock {
    pub id: i32,
    pub question: String,
    pub placeholder: Option<String>,
}

impl SurveyBlock {
    /// Ids of the questions a client can answer through this block.
    pub fn question_ids(&self) -> Vec<i32> {
        match self {
            SurveyBlock::Matrix(block) => block.questions.iter().map(|q| q.id).collect(),
            SurveyBlock::MultipleChoice(block) => vec![block.id],
            SurveyBlock::OpenText(block) => vec![block.id],
        }
    }
}
