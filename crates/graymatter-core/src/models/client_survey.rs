use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::block::SurveyBlock;

/// A scheduled, dated copy of a survey for one client within a treatment.
///
/// `survey_snapshot` is the assembled survey frozen at schedule time. It is
/// served exactly as written and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClientSurvey {
    pub id: i32,
    pub client_id: i32,
    pub survey_id: i32,
    pub treatment_id: i32,
    #[ts(type = "Array<Record<string, unknown>>")]
    pub survey_snapshot: serde_json::Value,
    pub survey_date: jiff::civil::Date,
    pub is_done: bool,
    pub is_partially_done: bool,
    pub has_missed: bool,
}

impl ClientSurvey {
    /// Every question id that appears in the frozen snapshot.
    pub fn snapshot_question_ids(&self) -> BTreeSet<i32> {
        let mut ids = BTreeSet::new();
        let Some(blocks) = self.survey_snapshot.as_array() else {
            return ids;
        };
        for block in blocks {
            // Option keys of single-question blocks are flattened beside
            // `id`, so only the block tag tells a matrix group apart.
            if block.get("type").and_then(|t| t.as_str()) == Some("matrix") {
                let questions = block.get("questions").and_then(|q| q.as_array());
                ids.extend(
                    questions
                        .into_iter()
                        .flatten()
                        .filter_map(|q| json_id(q.get("id"))),
                );
            } else if let Some(id) = json_id(block.get("id")) {
                ids.insert(id);
            }
        }
        ids
    }
}

fn json_id(value: Option<&serde_json::Value>) -> Option<i32> {
    value
        .and_then(serde_json::Value::as_i64)
        .and_then(|id| i32::try_from(id).ok())
}

/// A survey instance computed by the scheduler, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledSurvey {
    pub survey_id: i32,
    pub survey_date: jiff::civil::Date,
    pub snapshot: Vec<SurveyBlock>,
}

/// Completion summary of one instance, joined with the survey name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SurveyProgress {
    pub name: String,
    pub is_done: bool,
    pub is_partially_done: bool,
    pub has_missed: bool,
}
