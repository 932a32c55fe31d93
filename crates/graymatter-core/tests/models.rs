use graymatter_core::lang::Language;
use graymatter_core::models::client::ClientCredentials;
use graymatter_core::models::client_survey::{ClientSurvey, ScheduledSurvey};
use graymatter_core::models::treatment::TreatmentPlan;
use jiff::{Timestamp, ToSpan};
use serde_json::json;

#[test]
fn language_defaults_to_english() {
    assert_eq!(Language::default().as_str(), "en");
    assert!(Language::default().is_default());
}

#[test]
fn language_codes_are_normalized_and_validated() {
    assert_eq!(Language::parse(" HE ").unwrap().as_str(), "he");
    assert_eq!(Language::parse("pt-br").unwrap().as_str(), "pt-br");
    assert!(Language::parse("e").is_err());
    assert!(Language::parse("en;drop").is_err());
    assert!(Language::parse("-en").is_err());
}

#[test]
fn temp_passcode_is_active_only_before_expiry() {
    let now = Timestamp::from_second(1_800_000_000).unwrap();
    let credentials = ClientCredentials {
        passcode_hash: "h".to_string(),
        temp_passcode_hash: Some("t".to_string()),
        temp_passcode_expiry: Some(now + 30.minutes()),
    };

    assert_eq!(credentials.active_temp_passcode(now), Some("t"));
    assert_eq!(credentials.active_temp_passcode(now + 31.minutes()), None);
}

#[test]
fn temp_passcode_without_expiry_is_never_active() {
    let credentials = ClientCredentials {
        passcode_hash: "h".to_string(),
        temp_passcode_hash: Some("t".to_string()),
        temp_passcode_expiry: None,
    };
    assert_eq!(credentials.active_temp_passcode(Timestamp::UNIX_EPOCH), None);
}

#[test]
fn snapshot_question_ids_cover_matrix_groups_and_single_blocks() {
    let instance = ClientSurvey {
        id: 1,
        client_id: 2,
        survey_id: 3,
        treatment_id: 4,
        survey_snapshot: json!([
            { "type": "matrix", "group": "g1", "questions": [{ "id": 10 }, { "id": 11 }] },
            { "type": "multiple_choice", "id": 12 },
            { "type": "open_text", "id": 13 }
        ]),
        survey_date: jiff::civil::date(2026, 1, 5),
        is_done: false,
        is_partially_done: false,
        has_missed: false,
    };

    let ids: Vec<i32> = instance.snapshot_question_ids().into_iter().collect();
    assert_eq!(ids, vec![10, 11, 12, 13]);
}

#[test]
fn choice_options_named_questions_do_not_hide_the_block_id() {
    let instance = ClientSurvey {
        id: 1,
        client_id: 2,
        survey_id: 3,
        treatment_id: 4,
        survey_snapshot: json!([
            {
                "type": "multiple_choice",
                "id": 12,
                "question": "Which applies?",
                "questions": ["a", "b"],
                "options": ["x"]
            },
            { "type": "matrix", "group": "g1", "questions": [{ "id": 20 }] }
        ]),
        survey_date: jiff::civil::date(2026, 1, 5),
        is_done: false,
        is_partially_done: false,
        has_missed: false,
    };

    let ids: Vec<i32> = instance.snapshot_question_ids().into_iter().collect();
    assert_eq!(ids, vec![12, 20]);
}

#[test]
fn treatment_plan_binds_to_the_registered_client() {
    let plan = TreatmentPlan {
        protocol_id: 7,
        start_date: jiff::civil::date(2026, 3, 1),
        reminders: json!({ "sms": true }),
        schedule: vec![ScheduledSurvey {
            survey_id: 3,
            survey_date: jiff::civil::date(2026, 3, 8),
            snapshot: Vec::new(),
        }],
    };

    let treatment = plan.treatment_for(42);
    assert_eq!(treatment.client_id, 42);
    assert_eq!(treatment.protocol_id, 7);
    assert_eq!(treatment.start_date, jiff::civil::date(2026, 3, 1));
    assert_eq!(treatment.reminders, json!({ "sms": true }));
}
