use chrono::{DateTime, Utc};
use graymatter_core::models::protocol::{Protocol, ProtocolSurvey};
use sqlx::{FromRow, PgPool};

use crate::convert;
use crate::error::StorageError;

#[derive(FromRow)]
struct ProtocolRow {
    id: i32,
    clinic_id: Option<i32>,
    name: String,
    surveys_amount: i32,
    surveys_types: Vec<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProtocolRow> for Protocol {
    type Error = StorageError;

    fn try_from(row: ProtocolRow) -> Result<Self, Self::Error> {
        Ok(Protocol {
            id: row.id,
            clinic_id: row.clinic_id,
            name: row.name,
            surveys_amount: row.surveys_amount,
            surveys_types: row.surveys_types,
            created_at: convert::timestamp(row.created_at)?,
        })
    }
}

pub async fn list_protocols(pool: &PgPool) -> Result<Vec<Protocol>, StorageError> {
    let rows: Vec<ProtocolRow> = sqlx::query_as(
        "SELECT id, clinic_id, name, surveys_amount, surveys_types, created_at \
         FROM protocols ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Protocol::try_from).collect()
}

pub async fn get_protocol(pool: &PgPool, id: i32) -> Result<Option<Protocol>, StorageError> {
    let row: Option<ProtocolRow> = sqlx::query_as(
        "SELECT id, clinic_id, name, surveys_amount, surveys_types, created_at \
         FROM protocols WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(Protocol::try_from).transpose()
}

/// Surveys attached to a protocol with their week offsets, in attachment order.
pub async fn protocol_surveys(
    pool: &PgPool,
    protocol_id: i32,
) -> Result<Vec<ProtocolSurvey>, StorageError> {
    let rows: Vec<(i32, i32)> = sqlx::query_as(
        "SELECT ps.survey_id, ps.week FROM protocols_surveys ps \
         INNER JOIN surveys ON surveys.id = ps.survey_id \
         WHERE ps.protocol_id = $1 ORDER BY ps.id",
    )
    .bind(protocol_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|(survey_id, week)| ProtocolSurvey { survey_id, week })
        .collect())
}
