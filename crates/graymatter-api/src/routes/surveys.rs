use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use graymatter_core::block::SurveyBlock;
use graymatter_core::lang::Language;
use graymatter_core::models::answer::{Answer, NewAnswer};
use graymatter_core::models::client_survey::ClientSurvey;
use graymatter_core::models::survey::SurveyDraft;
use graymatter_storage::{answers, client_surveys, clients, surveys};
use graymatter_surveys::assembly::assemble_survey;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::auth::AuthClient;
use crate::state::AppState;

fn instance_not_found(id: i32) -> ApiError {
    ApiError::NotFound(format!("client survey not found: {id}"))
}

pub async fn get_client_survey(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ClientSurvey>, ApiError> {
    client_surveys::get_client_survey(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| instance_not_found(id))
}

pub async fn list_my_surveys(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
) -> Result<Json<Vec<ClientSurvey>>, ApiError> {
    let client = clients::get_client_by_gov_id(&state.db, &auth.gov_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    Ok(Json(client_surveys::list_available(&state.db, client.id).await?))
}

// --- Answers ---

#[derive(Debug, Deserialize)]
pub struct SubmitAnswersRequest {
    #[serde(default)]
    pub answers: Vec<NewAnswer>,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAnswersResponse {
    pub answers: Vec<Answer>,
    pub status: &'static str,
}

pub async fn submit_answers(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
    Path(id): Path<i32>,
    payload: Result<Json<SubmitAnswersRequest>, JsonRejection>,
) -> Result<Json<SubmitAnswersResponse>, ApiError> {
    let Json(payload) = payload?;
    if payload.answers.is_empty() {
        return Err(ApiError::BadRequest("no answers given".to_string()));
    }

    let client = clients::get_client_by_gov_id(&state.db, &auth.gov_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    // Another client's instance is reported exactly like a missing one.
    let instance = client_surveys::get_client_survey(&state.db, id)
        .await?
        .filter(|instance| instance.client_id == client.id)
        .ok_or_else(|| instance_not_found(id))?;

    if instance.is_done {
        return Err(ApiError::Conflict(format!("client survey {id} is already done")));
    }

    let known = instance.snapshot_question_ids();
    if let Some(unknown) = payload
        .answers
        .iter()
        .find(|answer| !known.contains(&answer.question_id))
    {
        return Err(ApiError::BadRequest(format!(
            "question {} is not part of this survey",
            unknown.question_id
        )));
    }

    let stored =
        answers::record_answers(&state.db, instance.id, &payload.answers, payload.complete)
            .await?;

    Ok(Json(SubmitAnswersResponse {
        answers: stored,
        status: "success",
    }))
}

// --- Authoring ---

#[derive(Debug, Serialize)]
pub struct CreateSurveyResponse {
    pub id: i32,
    pub status: &'static str,
}

pub async fn create_survey(
    State(state): State<AppState>,
    payload: Result<Json<SurveyDraft>, JsonRejection>,
) -> Result<Json<CreateSurveyResponse>, ApiError> {
    let Json(draft) = payload?;
    let id = surveys::create_survey(&state.db, &draft).await?;

    Ok(Json(CreateSurveyResponse {
        id,
        status: "success",
    }))
}

// --- Preview ---

#[derive(Debug, Deserialize)]
pub struct AssembleQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AssembledSurvey {
    pub id: i32,
    pub name: String,
    pub language: Language,
    pub blocks: Vec<SurveyBlock>,
}

pub async fn assemble_preview(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<AssembleQuery>,
) -> Result<Json<AssembledSurvey>, ApiError> {
    let language = match query.lang.as_deref() {
        Some(code) => Language::parse(code)?,
        None => Language::default(),
    };

    let survey = surveys::get_survey(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("survey not found: {id}")))?;
    let blocks = assemble_survey(&state.surveys, survey.id, &language).await?;

    Ok(Json(AssembledSurvey {
        id: survey.id,
        name: survey.name,
        language,
        blocks,
    }))
}
