use chrono::NaiveDate;
use graymatter_core::models::client_survey::ScheduledSurvey;
use graymatter_core::models::treatment::{NewTreatment, STATUS_ON_GOING, Treatment};
use serde_json::Value;
use sqlx::types::Json;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;

use crate::convert;
use crate::error::StorageError;

#[derive(FromRow)]
struct TreatmentRow {
    id: i32,
    client_id: i32,
    protocol_id: i32,
    start_date: NaiveDate,
    reminders: Json<Value>,
    status: String,
}

impl TryFrom<TreatmentRow> for Treatment {
    type Error = StorageError;

    fn try_from(row: TreatmentRow) -> Result<Self, Self::Error> {
        Ok(Treatment {
            id: row.id,
            client_id: row.client_id,
            protocol_id: row.protocol_id,
            start_date: convert::date(row.start_date)?,
            reminders: row.reminders.0,
            status: row.status,
        })
    }
}

/// A persisted survey instance as created by the scheduler.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledInstance {
    pub id: i32,
    pub survey_id: i32,
    pub survey_date: jiff::civil::Date,
}

/// The client's most recent on-going treatment, if any.
pub async fn get_on_going_treatment(
    pool: &PgPool,
    client_id: i32,
) -> Result<Option<Treatment>, StorageError> {
    let row: Option<TreatmentRow> = sqlx::query_as(
        "SELECT id, client_id, protocol_id, start_date, reminders, status \
         FROM treatment WHERE client_id = $1 AND status = $2 \
         ORDER BY id DESC LIMIT 1",
    )
    .bind(client_id)
    .bind(STATUS_ON_GOING)
    .fetch_optional(pool)
    .await?;

    row.map(Treatment::try_from).transpose()
}

/// Insert a treatment and all of its scheduled survey instances in one
/// transaction. Either everything is stored or nothing is.
pub async fn create_treatment_with_schedule(
    pool: &PgPool,
    treatment: &NewTreatment,
    schedule: &[ScheduledSurvey],
) -> Result<(i32, Vec<ScheduledInstance>), StorageError> {
    let mut tx = pool.begin().await?;
    let created = insert_treatment_with_schedule(&mut tx, treatment, schedule).await?;
    tx.commit().await?;
    Ok(created)
}

/// Insert a treatment and its instances on a caller-owned connection, so the
/// caller decides the transaction boundary.
pub async fn insert_treatment_with_schedule(
    conn: &mut PgConnection,
    treatment: &NewTreatment,
    schedule: &[ScheduledSurvey],
) -> Result<(i32, Vec<ScheduledInstance>), StorageError> {
    // Serialize every snapshot before the first write.
    let snapshots = schedule
        .iter()
        .map(|scheduled| -> Result<_, StorageError> {
            Ok((
                scheduled,
                serde_json::to_value(&scheduled.snapshot)?,
                convert::naive_date(scheduled.survey_date)?,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let treatment_id: i32 = sqlx::query_scalar(
        "INSERT INTO treatment (client_id, protocol_id, start_date, reminders, status) \
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(treatment.client_id)
    .bind(treatment.protocol_id)
    .bind(convert::naive_date(treatment.start_date)?)
    .bind(Json(&treatment.reminders))
    .bind(STATUS_ON_GOING)
    .fetch_one(&mut *conn)
    .await?;

    let mut instances = Vec::with_capacity(snapshots.len());
    for (scheduled, snapshot, survey_date) in snapshots {
        let id: i32 = sqlx::query_scalar(
            "INSERT INTO clients_surveys \
             (client_id, survey_id, treatment_id, survey_snapshot, survey_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(treatment.client_id)
        .bind(scheduled.survey_id)
        .bind(treatment_id)
        .bind(Json(snapshot))
        .bind(survey_date)
        .fetch_one(&mut *conn)
        .await?;

        instances.push(ScheduledInstance {
            id,
            survey_id: scheduled.survey_id,
            survey_date: scheduled.survey_date,
        });
    }

    info!(
        treatment_id,
        client_id = treatment.client_id,
        protocol_id = treatment.protocol_id,
        instances = instances.len(),
        "treatment scheduled"
    );
    Ok((treatment_id, instances))
}
