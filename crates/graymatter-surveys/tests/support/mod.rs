use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use graymatter_core::lang::Language;
use graymatter_core::models::matrix::Matrix;
use graymatter_core::models::question::StoredQuestion;
use graymatter_surveys::{SourceError, SurveySource};
use serde_json::json;

/// In-memory survey data keyed by language code.
#[derive(Default)]
pub struct MemorySource {
    pub questions: HashMap<(i32, String), Vec<StoredQuestion>>,
    pub matrices: HashMap<(i32, String), Matrix>,
    pub matrix_lookups: AtomicUsize,
    pub fail_questions: bool,
}

impl MemorySource {
    pub fn with_questions(mut self, survey_id: i32, lang: &str, rows: Vec<StoredQuestion>) -> Self {
        self.questions.insert((survey_id, lang.to_string()), rows);
        self
    }

    pub fn with_matrix(mut self, lang: &str, matrix: Matrix) -> Self {
        self.matrices.insert((matrix.id, lang.to_string()), matrix);
        self
    }

    pub fn lookups(&self) -> usize {
        self.matrix_lookups.load(Ordering::SeqCst)
    }
}

impl SurveySource for MemorySource {
    async fn questions(
        &self,
        survey_id: i32,
        lang: &Language,
    ) -> Result<Vec<StoredQuestion>, SourceError> {
        if self.fail_questions {
            return Err("connection reset".into());
        }
        Ok(self
            .questions
            .get(&(survey_id, lang.as_str().to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn matrix(&self, matrix_id: i32, lang: &Language) -> Result<Option<Matrix>, SourceError> {
        self.matrix_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .matrices
            .get(&(matrix_id, lang.as_str().to_string()))
            .cloned())
    }
}

pub fn matrix_question(id: i32, group: &str, matrix_id: i32) -> StoredQuestion {
    StoredQuestion {
        id,
        kind: "matrix".to_string(),
        matrix_id: Some(matrix_id),
        group: Some(group.to_string()),
        question: format!("matrix question {id}"),
        extra_data: None,
    }
}

pub fn multiple_choice(id: i32) -> StoredQuestion {
    StoredQuestion {
        id,
        kind: "multiple_choice".to_string(),
        matrix_id: None,
        group: None,
        question: format!("choice question {id}"),
        extra_data: Some(json!({ "multipleChoice": { "options": ["yes", "no"] } })),
    }
}

pub fn open_text(id: i32, placeholder: &str) -> StoredQuestion {
    StoredQuestion {
        id,
        kind: "open_text".to_string(),
        matrix_id: None,
        group: None,
        question: format!("open question {id}"),
        extra_data: Some(json!({ "openText": { "inputPlaceholder": placeholder } })),
    }
}

pub fn matrix(id: i32, title: &str) -> Matrix {
    Matrix {
        id,
        title: title.to_string(),
        columns: json!(["Never", "Sometimes", "Often"]),
        answers: json!([0, 1, 2]),
        instructions: Some("Choose one answer per row".to_string()),
    }
}
