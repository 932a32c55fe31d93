use std::collections::HashMap;

use chrono::{DateTime, Utc};
use graymatter_core::error::CoreError;
use graymatter_core::models::matrix::NewMatrix;
use graymatter_core::models::question::QuestionKind;
use graymatter_core::models::survey::{DraftKind, Survey, SurveyDraft};
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;

use crate::convert;
use crate::error::StorageError;

#[derive(FromRow)]
struct SurveyRow {
    id: i32,
    clinic_id: Option<i32>,
    name: String,
    questions_amount: i32,
    created_at: DateTime<Utc>,
}

impl TryFrom<SurveyRow> for Survey {
    type Error = StorageError;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        Ok(Survey {
            id: row.id,
            clinic_id: row.clinic_id,
            name: row.name,
            questions_amount: row.questions_amount,
            created_at: convert::timestamp(row.created_at)?,
        })
    }
}

pub async fn list_surveys(pool: &PgPool) -> Result<Vec<Survey>, StorageError> {
    let rows: Vec<SurveyRow> = sqlx::query_as(
        "SELECT id, clinic_id, name, questions_amount, created_at FROM surveys ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Survey::try_from).collect()
}

pub async fn get_survey(pool: &PgPool, id: i32) -> Result<Option<Survey>, StorageError> {
    let row: Option<SurveyRow> = sqlx::query_as(
        "SELECT id, clinic_id, name, questions_amount, created_at FROM surveys WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Survey::try_from).transpose()
}

pub async fn get_survey_by_name(
    conn: &mut PgConnection,
    name: &str,
) -> Result<Option<Survey>, StorageError> {
    let row: Option<SurveyRow> = sqlx::query_as(
        "SELECT id, clinic_id, name, questions_amount, created_at FROM surveys WHERE name = $1",
    )
    .bind(name)
    .fetch_optional(conn)
    .await?;

    row.map(Survey::try_from).transpose()
}

/// Insert an empty survey and return its id.
pub async fn insert_survey(conn: &mut PgConnection, name: &str) -> Result<i32, StorageError> {
    sqlx::query_scalar("INSERT INTO surveys (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(conn)
        .await
        .map_err(|e| StorageError::conflict_on_unique(e, "survey", name))
}

/// Insert a matrix definition and return its id.
pub async fn insert_matrix(conn: &mut PgConnection, matrix: &NewMatrix) -> Result<i32, StorageError> {
    let id = sqlx::query_scalar(
        "INSERT INTO matrix (title, columns, answers, instructions) \
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&matrix.title)
    .bind(sqlx::types::Json(&matrix.columns))
    .bind(sqlx::types::Json(&matrix.answers))
    .bind(&matrix.instructions)
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Insert a question and return its id.
pub async fn insert_question(
    conn: &mut PgConnection,
    text: &str,
    kind: &QuestionKind,
) -> Result<i32, StorageError> {
    let (matrix_id, group) = match kind {
        QuestionKind::Matrix { matrix_id, group } => (Some(*matrix_id), Some(group.as_str())),
        _ => (None, None),
    };

    let id = sqlx::query_scalar(
        r#"INSERT INTO questions (matrix_id, type, "group", question, extra_data)
           VALUES ($1, $2, $3, $4, $5) RETURNING id"#,
    )
    .bind(matrix_id)
    .bind(kind.type_name())
    .bind(group)
    .bind(text)
    .bind(kind.extra_data().map(sqlx::types::Json))
    .fetch_one(conn)
    .await?;
    Ok(id)
}

/// Append a question to a survey. Attachment order is display order.
pub async fn attach_question(
    conn: &mut PgConnection,
    question_id: i32,
    survey_id: i32,
) -> Result<(), StorageError> {
    sqlx::query("INSERT INTO questions_surveys (question_id, survey_id) VALUES ($1, $2)")
        .bind(question_id)
        .bind(survey_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Store a drafted survey with its matrices and questions in one transaction.
pub async fn create_survey(pool: &PgPool, draft: &SurveyDraft) -> Result<i32, StorageError> {
    let definitions = draft.matrix_definitions()?;

    let mut tx = pool.begin().await?;

    if get_survey_by_name(&mut tx, &draft.name).await?.is_some() {
        return Err(StorageError::Conflict {
            entity: "survey",
            key: draft.name.clone(),
        });
    }
    let survey_id = insert_survey(&mut tx, &draft.name).await?;

    let mut matrix_ids: HashMap<&str, i32> = HashMap::new();
    for (group, matrix) in definitions {
        let matrix_id = insert_matrix(&mut tx, matrix).await?;
        matrix_ids.insert(group, matrix_id);
    }

    for question in &draft.questions {
        let kind = match &question.kind {
            DraftKind::Matrix { group, .. } => QuestionKind::Matrix {
                matrix_id: matrix_ids.get(group.as_str()).copied().ok_or_else(|| {
                    CoreError::InvalidDraft(format!("matrix group '{group}' has no definition"))
                })?,
                group: group.clone(),
            },
            DraftKind::MultipleChoice { multiple_choice } => QuestionKind::MultipleChoice {
                options: multiple_choice.clone(),
            },
            DraftKind::OpenText { placeholder } => QuestionKind::OpenText {
                placeholder: placeholder.clone(),
            },
        };
        let question_id = insert_question(&mut tx, &question.question, &kind).await?;
        attach_question(&mut tx, question_id, survey_id).await?;
    }

    sqlx::query("UPDATE surveys SET questions_amount = $2 WHERE id = $1")
        .bind(survey_id)
        .bind(i32::try_from(draft.questions.len()).unwrap_or(i32::MAX))
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        survey_id,
        questions = draft.questions.len(),
        "survey created"
    );
    Ok(survey_id)
}
