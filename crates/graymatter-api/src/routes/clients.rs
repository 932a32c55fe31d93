use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use graymatter_auth::delivery::DeliveryChannel;
use graymatter_auth::passcode::generate_temp_passcode;
use graymatter_auth::password::{hash_passcode, verify_passcode};
use graymatter_auth::jwt::TokenIssuer;
use graymatter_core::models::client::{Client, ClientAccount, ClientCredentials, NewClient};
use graymatter_core::models::client_survey::SurveyProgress;
use graymatter_core::models::protocol::Protocol;
use graymatter_core::models::treatment::Treatment;
use graymatter_storage::{client_surveys, clients, protocols, treatments};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::middleware::auth::AuthClient;
use crate::routes::treatments::{TreatmentRequest, plan_treatment};
use crate::state::AppState;

/// A present, non-blank request field.
pub(crate) fn required(value: Option<String>) -> Result<String, ApiError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(ApiError::missing_data)
}

pub async fn list_clients(State(state): State<AppState>) -> Result<Json<Vec<Client>>, ApiError> {
    Ok(Json(clients::list_clients(&state.db).await?))
}

// --- Registration ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub gov_id: Option<String>,
    pub passcode: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub treatment: Option<TreatmentRequest>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment_id: Option<i32>,
    pub status: &'static str,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<RegisterResponse>, ApiError> {
    let Json(payload) = payload?;
    let gov_id = required(payload.gov_id)?;
    let passcode = required(payload.passcode)?;
    let name = required(payload.name)?;

    let client = NewClient {
        gov_id,
        name,
        email: payload.email,
        phone: payload.phone,
        gender: payload.gender,
        condition: payload.condition,
        passcode_hash: hash_passcode(&passcode)?,
    };
    // Nothing is written until the schedule is planned.
    let plan = match &payload.treatment {
        Some(treatment) => Some(plan_treatment(&state, treatment).await?),
        None => None,
    };
    let (client_id, treatment) =
        clients::register_client(&state.db, &client, plan.as_ref()).await?;
    let treatment_id = treatment.map(|(id, _)| id);

    Ok(Json(RegisterResponse {
        id: client_id,
        treatment_id,
        status: "success",
    }))
}

// --- Login ---

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub gov_id: Option<String>,
    pub passcode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub name: String,
    pub gov_id: String,
    pub access_token: String,
    pub status: &'static str,
}

/// The stored passcode matches, or an unexpired temporary passcode does.
fn passcode_matches(
    credentials: &ClientCredentials,
    passcode: &str,
    now: jiff::Timestamp,
) -> Result<bool, ApiError> {
    if verify_passcode(passcode, &credentials.passcode_hash)? {
        return Ok(true);
    }
    match credentials.active_temp_passcode(now) {
        Some(temp_hash) => Ok(verify_passcode(passcode, temp_hash)?),
        None => Ok(false),
    }
}

/// Decide a login attempt against the looked-up account: an unknown gov id
/// is `NotFound`, a wrong passcode `Unauthorized`, otherwise a token is issued.
pub fn authenticate(
    account: Option<ClientAccount>,
    passcode: &str,
    tokens: &TokenIssuer,
    now: jiff::Timestamp,
) -> Result<LoginResponse, ApiError> {
    let account = account.ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    if !passcode_matches(&account.credentials, passcode, now)? {
        info!(client_id = account.client.id, "login rejected");
        return Err(ApiError::Unauthorized("wrong passcode".to_string()));
    }

    let access_token = tokens.issue_at(&account.client.gov_id, &account.client.name, now)?;
    info!(client_id = account.client.id, "client logged in");

    Ok(LoginResponse {
        name: account.client.name,
        gov_id: account.client.gov_id,
        access_token,
        status: "success",
    })
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    let gov_id = required(payload.gov_id)?;
    let passcode = required(payload.passcode)?;

    let account = clients::get_account_by_gov_id(&state.db, &gov_id).await?;
    Ok(Json(authenticate(
        account,
        &passcode,
        &state.tokens,
        jiff::Timestamp::now(),
    )?))
}

// --- Temporary passcode ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TempPasscodeRequest {
    pub gov_id: Option<String>,
    pub method: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TempPasscodeResponse {
    pub response: &'static str,
}

pub async fn request_temp_passcode(
    State(state): State<AppState>,
    payload: Result<Json<TempPasscodeRequest>, JsonRejection>,
) -> Result<Json<TempPasscodeResponse>, ApiError> {
    let Json(payload) = payload?;
    let gov_id = required(payload.gov_id)?;
    let channel = match required(payload.method)?.as_str() {
        "email" => DeliveryChannel::Email,
        "sms" => DeliveryChannel::Sms,
        other => {
            return Err(ApiError::BadRequest(format!(
                "unsupported delivery method: {other}"
            )));
        }
    };
    let destination = match channel {
        DeliveryChannel::Email => required(payload.email)?,
        DeliveryChannel::Sms => required(payload.phone)?,
    };

    let client = clients::get_client_by_gov_id(&state.db, &gov_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    let (stored, mismatch) = match channel {
        DeliveryChannel::Email => (client.email.as_deref(), "Email is not matching!"),
        DeliveryChannel::Sms => (client.phone.as_deref(), "Mobile number is not matching!"),
    };
    if stored != Some(destination.as_str()) {
        return Err(ApiError::Conflict(mismatch.to_string()));
    }

    let passcode = generate_temp_passcode();
    let expires_at = jiff::Timestamp::now()
        .checked_add(state.temp_passcode_ttl)
        .map_err(|e| ApiError::internal("temporary passcode expiry", e))?;
    clients::set_temp_passcode(&state.db, client.id, &hash_passcode(&passcode)?, expires_at)
        .await?;

    state
        .delivery
        .deliver(channel, &destination, &passcode)
        .await?;

    Ok(Json(TempPasscodeResponse {
        response: "done successfully",
    }))
}

// --- Client data ---

/// The treatment fields exposed to clients and clinic staff.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreatmentView {
    pub id: i32,
    pub client_id: i32,
    pub start_date: jiff::civil::Date,
    pub status: String,
    pub reminders: Value,
}

impl From<Treatment> for TreatmentView {
    fn from(treatment: Treatment) -> Self {
        Self {
            id: treatment.id,
            client_id: treatment.client_id,
            start_date: treatment.start_date,
            status: treatment.status,
            reminders: treatment.reminders,
        }
    }
}

/// A client with its on-going treatment, when there is one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientData {
    #[serde(flatten)]
    pub client: Client,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_progress: Option<Vec<SurveyProgress>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<TreatmentView>,
    pub status: &'static str,
}

pub(crate) async fn load_client_data(state: &AppState, gov_id: &str) -> Result<ClientData, ApiError> {
    let client = clients::get_client_by_gov_id(&state.db, gov_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("No client found".to_string()))?;

    let Some(treatment) = treatments::get_on_going_treatment(&state.db, client.id).await? else {
        return Ok(ClientData {
            client,
            survey_progress: None,
            protocol: None,
            treatment: None,
            status: "success",
        });
    };

    let protocol = protocols::get_protocol(&state.db, treatment.protocol_id).await?;
    let progress =
        client_surveys::progress_for_treatment(&state.db, client.id, treatment.id).await?;

    Ok(ClientData {
        client,
        survey_progress: Some(progress),
        protocol,
        treatment: Some(treatment.into()),
        status: "success",
    })
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthClient>,
) -> Result<Json<ClientData>, ApiError> {
    Ok(Json(load_client_data(&state, &auth.gov_id).await?))
}
