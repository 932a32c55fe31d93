use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A shared rating-scale definition referenced by grouped matrix questions.
///
/// `columns` and `answers` are stored as JSON and passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Matrix {
    pub id: i32,
    pub title: String,
    pub columns: serde_json::Value,
    pub answers: serde_json::Value,
    pub instructions: Option<String>,
}

/// Matrix definition as submitted when authoring a survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewMatrix {
    pub title: String,
    pub columns: serde_json::Value,
    pub answers: serde_json::Value,
    #[serde(default)]
    pub instructions: Option<String>,
}
