use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::client_survey::ScheduledSurvey;

/// Status of a treatment that is still running.
pub const STATUS_ON_GOING: &str = "on-going";

/// A client's enrollment against a protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Treatment {
    pub id: i32,
    pub client_id: i32,
    pub protocol_id: i32,
    pub start_date: jiff::civil::Date,
    pub reminders: serde_json::Value,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTreatment {
    pub client_id: i32,
    pub protocol_id: i32,
    pub start_date: jiff::civil::Date,
    pub reminders: serde_json::Value,
}

/// A treatment whose schedule has been fully planned but not yet written.
/// The owning client is supplied at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentPlan {
    pub protocol_id: i32,
    pub start_date: jiff::civil::Date,
    pub reminders: serde_json::Value,
    pub schedule: Vec<ScheduledSurvey>,
}

impl TreatmentPlan {
    pub fn treatment_for(&self, client_id: i32) -> NewTreatment {
        NewTreatment {
            client_id,
            protocol_id: self.protocol_id,
            start_date: self.start_date,
            reminders: self.reminders.clone(),
        }
    }
}
