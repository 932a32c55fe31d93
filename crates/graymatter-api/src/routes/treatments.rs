use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use graymatter_core::models::treatment::TreatmentPlan;
use graymatter_storage::treatments::ScheduledInstance;
use graymatter_storage::{clients, protocols, treatments};
use graymatter_surveys::schedule::plan_schedule;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

/// Treatment settings as submitted by the clinic.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentRequest {
    pub protocol_id: i32,
    pub start_date: jiff::civil::Date,
    #[serde(default)]
    pub reminders: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTreatmentRequest {
    pub gov_id: Option<String>,
    #[serde(flatten)]
    pub treatment: TreatmentRequest,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledSurveyView {
    pub id: i32,
    pub survey_id: i32,
    pub survey_date: jiff::civil::Date,
}

impl From<ScheduledInstance> for ScheduledSurveyView {
    fn from(instance: ScheduledInstance) -> Self {
        Self {
            id: instance.id,
            survey_id: instance.survey_id,
            survey_date: instance.survey_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTreatmentResponse {
    pub treatment_id: i32,
    pub surveys: Vec<ScheduledSurveyView>,
    pub status: &'static str,
}

/// Plan a treatment against a protocol: every survey snapshot is assembled
/// and dated before anything is written.
pub async fn plan_treatment(
    state: &AppState,
    request: &TreatmentRequest,
) -> Result<TreatmentPlan, ApiError> {
    if protocols::get_protocol(&state.db, request.protocol_id)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound(format!(
            "protocol not found: {}",
            request.protocol_id
        )));
    }

    let attachments = protocols::protocol_surveys(&state.db, request.protocol_id).await?;
    let schedule = plan_schedule(&state.surveys, &attachments, request.start_date).await?;

    Ok(TreatmentPlan {
        protocol_id: request.protocol_id,
        start_date: request.start_date,
        reminders: request.reminders.clone().unwrap_or_else(|| json!({})),
        schedule,
    })
}

/// Enroll an existing client in a protocol. The treatment and its instances
/// are written in one transaction.
pub async fn schedule_treatment(
    state: &AppState,
    client_id: i32,
    request: &TreatmentRequest,
) -> Result<(i32, Vec<ScheduledInstance>), ApiError> {
    let plan = plan_treatment(state, request).await?;
    if clients::get_client(&state.db, client_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("client not found: {client_id}")));
    }

    Ok(treatments::create_treatment_with_schedule(
        &state.db,
        &plan.treatment_for(client_id),
        &plan.schedule,
    )
    .await?)
}

pub async fn start_treatment(
    State(state): State<AppState>,
    payload: Result<Json<StartTreatmentRequest>, JsonRejection>,
) -> Result<Json<StartTreatmentResponse>, ApiError> {
    let Json(payload) = payload?;
    let gov_id = payload
        .gov_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(ApiError::missing_data)?;

    let client = clients::get_client_by_gov_id(&state.db, &gov_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    let (treatment_id, instances) = schedule_treatment(&state, client.id, &payload.treatment).await?;

    Ok(Json(StartTreatmentResponse {
        treatment_id,
        surveys: instances.into_iter().map(ScheduledSurveyView::from).collect(),
        status: "success",
    }))
}
