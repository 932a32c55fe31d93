use axum::Json;
use axum::extract::{Path, State};
use graymatter_core::models::protocol::Protocol;
use graymatter_core::models::survey::Survey;
use graymatter_storage::{protocols, surveys};
use jiff::tz::TimeZone;
use serde::Serialize;

use crate::error::ApiError;
use crate::routes::clients::{ClientData, load_client_data};
use crate::state::AppState;

/// Creation date as shown in the clinic UI: day.month.year, no padding, on
/// the calendar of `zone`.
pub fn display_date(timestamp: jiff::Timestamp, zone: &TimeZone) -> String {
    timestamp
        .to_zoned(zone.clone())
        .strftime("%-d.%-m.%Y")
        .to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolSummary {
    pub id: i32,
    pub name: String,
    pub surveys_amount: i32,
    pub surveys_types: Vec<String>,
    pub date: String,
}

impl ProtocolSummary {
    pub fn new(protocol: Protocol, zone: &TimeZone) -> Self {
        Self {
            id: protocol.id,
            date: display_date(protocol.created_at, zone),
            name: protocol.name,
            surveys_amount: protocol.surveys_amount,
            surveys_types: protocol.surveys_types,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProtocolList {
    pub protocols: Vec<ProtocolSummary>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySummary {
    pub id: i32,
    pub name: String,
    pub questions_amount: i32,
    pub date: String,
}

impl SurveySummary {
    pub fn new(survey: Survey, zone: &TimeZone) -> Self {
        Self {
            id: survey.id,
            date: display_date(survey.created_at, zone),
            name: survey.name,
            questions_amount: survey.questions_amount,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SurveyList {
    pub surveys: Vec<SurveySummary>,
}

pub async fn list_protocols(State(state): State<AppState>) -> Result<Json<ProtocolList>, ApiError> {
    let protocols = protocols::list_protocols(&state.db).await?;
    if protocols.is_empty() {
        tracing::warn!("protocol catalog is empty");
        return Err(ApiError::Internal("Unable to fetch protocols".to_string()));
    }

    Ok(Json(ProtocolList {
        protocols: protocols
            .into_iter()
            .map(|protocol| ProtocolSummary::new(protocol, &state.display_time_zone))
            .collect(),
    }))
}

pub async fn list_surveys(State(state): State<AppState>) -> Result<Json<SurveyList>, ApiError> {
    let surveys = surveys::list_surveys(&state.db).await?;
    if surveys.is_empty() {
        tracing::warn!("survey catalog is empty");
        return Err(ApiError::Internal("Unable to fetch surveys".to_string()));
    }

    Ok(Json(SurveyList {
        surveys: surveys
            .into_iter()
            .map(|survey| SurveySummary::new(survey, &state.display_time_zone))
            .collect(),
    }))
}

pub async fn client_data(
    State(state): State<AppState>,
    Path(gov_id): Path<String>,
) -> Result<Json<ClientData>, ApiError> {
    Ok(Json(load_client_data(&state, &gov_id).await?))
}
