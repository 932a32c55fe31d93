use graymatter_core::lang::Language;
use graymatter_core::models::matrix::Matrix;
use graymatter_core::models::question::StoredQuestion;
use graymatter_surveys::{SourceError, SurveySource};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::error::StorageError;

#[derive(FromRow)]
struct QuestionRow {
    id: i32,
    #[sqlx(rename = "type")]
    kind: String,
    matrix_id: Option<i32>,
    group: Option<String>,
    question: String,
    extra_data: Option<Json<Value>>,
}

impl From<QuestionRow> for StoredQuestion {
    fn from(row: QuestionRow) -> Self {
        StoredQuestion {
            id: row.id,
            kind: row.kind,
            matrix_id: row.matrix_id,
            group: row.group,
            question: row.question,
            extra_data: row.extra_data.map(|Json(value)| value),
        }
    }
}

#[derive(FromRow)]
struct MatrixRow {
    id: i32,
    title: String,
    columns: Json<Value>,
    answers: Json<Value>,
    instructions: Option<String>,
}

impl From<MatrixRow> for Matrix {
    fn from(row: MatrixRow) -> Self {
        Matrix {
            id: row.id,
            title: row.title,
            columns: row.columns.0,
            answers: row.answers.0,
            instructions: row.instructions,
        }
    }
}

/// Questions attached to a survey in attachment order.
///
/// For a non-default language the text and `extra_data` come from the
/// translation, falling back to the base `extra_data` when the translation
/// has none. Questions without a translation are left out.
pub async fn fetch_questions(
    pool: &PgPool,
    survey_id: i32,
    lang: &Language,
) -> Result<Vec<StoredQuestion>, StorageError> {
    let rows: Vec<QuestionRow> = if lang.is_default() {
        sqlx::query_as(
            r#"SELECT q.id, q.type, q.matrix_id, q."group", q.question, q.extra_data
               FROM questions_surveys qs
               INNER JOIN questions q ON q.id = qs.question_id
               WHERE qs.survey_id = $1
               ORDER BY qs.id"#,
        )
        .bind(survey_id)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as(
            r#"SELECT q.id, q.type, q.matrix_id, q."group", ql.question,
                      COALESCE(ql.extra_data, q.extra_data) AS extra_data
               FROM questions_surveys qs
               INNER JOIN questions q ON q.id = qs.question_id
               INNER JOIN questions_language ql
                       ON ql.question_id = q.id AND ql.language = $2
               WHERE qs.survey_id = $1
               ORDER BY qs.id"#,
        )
        .bind(survey_id)
        .bind(lang.as_str())
        .fetch_all(pool)
        .await?
    };

    Ok(rows.into_iter().map(StoredQuestion::from).collect())
}

/// A matrix in the requested language. A matrix with no translation for a
/// non-default language is reported as absent.
pub async fn fetch_matrix(
    pool: &PgPool,
    matrix_id: i32,
    lang: &Language,
) -> Result<Option<Matrix>, StorageError> {
    let row: Option<MatrixRow> = if lang.is_default() {
        sqlx::query_as("SELECT id, title, columns, answers, instructions FROM matrix WHERE id = $1")
            .bind(matrix_id)
            .fetch_optional(pool)
            .await?
    } else {
        sqlx::query_as(
            "SELECT m.id, ml.title, ml.columns, ml.answers, ml.instructions \
             FROM matrix m \
             INNER JOIN matrix_languages ml ON ml.matrix_id = m.id AND ml.language = $2 \
             WHERE m.id = $1",
        )
        .bind(matrix_id)
        .bind(lang.as_str())
        .fetch_optional(pool)
        .await?
    };

    Ok(row.map(Matrix::from))
}

/// [`SurveySource`] backed by the PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgSurveySource {
    pool: PgPool,
}

impl PgSurveySource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SurveySource for PgSurveySource {
    async fn questions(
        &self,
        survey_id: i32,
        lang: &Language,
    ) -> Result<Vec<StoredQuestion>, SourceError> {
        Ok(fetch_questions(&self.pool, survey_id, lang).await?)
    }

    async fn matrix(&self, matrix_id: i32, lang: &Language) -> Result<Option<Matrix>, SourceError> {
        Ok(fetch_matrix(&self.pool, matrix_id, lang).await?)
    }
}
