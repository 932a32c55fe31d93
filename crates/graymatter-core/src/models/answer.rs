use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A client's response to one question of a scheduled survey. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Answer {
    pub id: i32,
    pub client_survey_id: i32,
    pub question_id: i32,
    pub answer: String,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewAnswer {
    pub question_id: i32,
    pub answer: String,
}
