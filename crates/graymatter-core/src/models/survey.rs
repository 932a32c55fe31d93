use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;

use crate::error::CoreError;
use crate::models::matrix::NewMatrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Survey {
    pub id: i32,
    pub clinic_id: Option<i32>,
    pub name: String,
    pub questions_amount: i32,
    pub created_at: jiff::Timestamp,
}

/// A survey as submitted for authoring, before anything is stored.
#[derive(Debug, Clone, Deserialize)]
pub struct SurveyDraft {
    pub name: String,
    pub questions: Vec<DraftQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DraftQuestion {
    pub question: String,
    #[serde(flatten)]
    pub kind: DraftKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DraftKind {
    /// Questions of one group share a matrix. Only one question per group
    /// needs to carry the definition; the first one given is used.
    Matrix {
        group: String,
        #[serde(default)]
        matrix: Option<NewMatrix>,
    },
    MultipleChoice {
        #[serde(default, rename = "multipleChoice")]
        multiple_choice: Map<String, Value>,
    },
    OpenText {
        #[serde(default)]
        placeholder: Option<String>,
    },
}

impl SurveyDraft {
    /// Validate the draft and return each matrix group with its definition,
    /// in order of first appearance.
    pub fn matrix_definitions(&self) -> Result<Vec<(&str, &NewMatrix)>, CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::InvalidDraft("survey name is empty".to_string()));
        }
        if self.questions.is_empty() {
            return Err(CoreError::InvalidDraft("survey has no questions".to_string()));
        }

        let mut order: Vec<&str> = Vec::new();
        let mut definitions: HashMap<&str, &NewMatrix> = HashMap::new();
        for (index, draft) in self.questions.iter().enumerate() {
            if draft.question.trim().is_empty() {
                return Err(CoreError::InvalidDraft(format!("question {index} is empty")));
            }
            if let DraftKind::Matrix { group, matrix } = &draft.kind {
                if group.trim().is_empty() {
                    return Err(CoreError::InvalidDraft(format!(
                        "matrix question {index} has no group"
                    )));
                }
                if !order.contains(&group.as_str()) {
                    order.push(group);
                }
                if let Some(matrix) = matrix {
                    definitions.entry(group).or_insert(matrix);
                }
            }
        }

        order
            .into_iter()
            .map(|group| {
                definitions
                    .get(group)
                    .map(|matrix| (group, *matrix))
                    .ok_or_else(|| {
                        CoreError::InvalidDraft(format!("matrix group '{group}' has no definition"))
                    })
            })
            .collect()
    }
}
