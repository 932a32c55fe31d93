use chrono::NaiveDate;
use graymatter_core::models::client_survey::{ClientSurvey, SurveyProgress};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use crate::convert;
use crate::error::StorageError;

const COLUMNS: &str = "id, client_id, survey_id, treatment_id, survey_snapshot, survey_date, \
                       is_done, is_partially_done, has_missed";

#[derive(FromRow)]
struct ClientSurveyRow {
    id: i32,
    client_id: i32,
    survey_id: i32,
    treatment_id: i32,
    survey_snapshot: Json<Value>,
    survey_date: NaiveDate,
    is_done: bool,
    is_partially_done: bool,
    has_missed: bool,
}

impl TryFrom<ClientSurveyRow> for ClientSurvey {
    type Error = StorageError;

    fn try_from(row: ClientSurveyRow) -> Result<Self, Self::Error> {
        Ok(ClientSurvey {
            id: row.id,
            client_id: row.client_id,
            survey_id: row.survey_id,
            treatment_id: row.treatment_id,
            survey_snapshot: row.survey_snapshot.0,
            survey_date: convert::date(row.survey_date)?,
            is_done: row.is_done,
            is_partially_done: row.is_partially_done,
            has_missed: row.has_missed,
        })
    }
}

pub async fn get_client_survey(
    pool: &PgPool,
    id: i32,
) -> Result<Option<ClientSurvey>, StorageError> {
    let row: Option<ClientSurveyRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM clients_surveys WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await?;

    row.map(ClientSurvey::try_from).transpose()
}

/// Instances the client can still answer: not done and not missed, soonest first.
pub async fn list_available(
    pool: &PgPool,
    client_id: i32,
) -> Result<Vec<ClientSurvey>, StorageError> {
    let rows: Vec<ClientSurveyRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM clients_surveys \
         WHERE client_id = $1 AND NOT is_done AND NOT has_missed \
         ORDER BY survey_date, id"
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(ClientSurvey::try_from).collect()
}

/// Completion flags of every instance in a treatment, with survey names,
/// in schedule order.
pub async fn progress_for_treatment(
    pool: &PgPool,
    client_id: i32,
    treatment_id: i32,
) -> Result<Vec<SurveyProgress>, StorageError> {
    let rows: Vec<(String, bool, bool, bool)> = sqlx::query_as(
        "SELECT s.name, cs.is_done, cs.is_partially_done, cs.has_missed \
         FROM clients_surveys cs \
         INNER JOIN surveys s ON s.id = cs.survey_id \
         WHERE cs.client_id = $1 AND cs.treatment_id = $2 \
         ORDER BY cs.survey_date, cs.id",
    )
    .bind(client_id)
    .bind(treatment_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(name, is_done, is_partially_done, has_missed)| SurveyProgress {
            name,
            is_done,
            is_partially_done,
            has_missed,
        })
        .collect())
}
