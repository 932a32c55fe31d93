use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A reusable template of surveys applied to treatments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Protocol {
    pub id: i32,
    pub clinic_id: Option<i32>,
    pub name: String,
    pub surveys_amount: i32,
    pub surveys_types: Vec<String>,
    pub created_at: jiff::Timestamp,
}

/// A survey attached to a protocol, due `week` weeks after the treatment start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProtocolSurvey {
    pub survey_id: i32,
    pub week: i32,
}
