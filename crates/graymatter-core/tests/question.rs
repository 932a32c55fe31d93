use graymatter_core::error::CoreError;
use graymatter_core::models::question::{Question, QuestionKind, StoredQuestion};
use serde_json::json;

fn stored(kind: &str, extra_data: Option<serde_json::Value>) -> StoredQuestion {
    StoredQuestion {
        id: 7,
        kind: kind.to_string(),
        matrix_id: None,
        group: None,
        question: "How are you feeling?".to_string(),
        extra_data,
    }
}

#[test]
fn matrix_question_decodes_group_and_matrix() {
    let mut row = stored("matrix", None);
    row.matrix_id = Some(3);
    row.group = Some("phq".to_string());

    let question = Question::try_from(row).unwrap();
    assert_eq!(
        question.kind,
        QuestionKind::Matrix {
            matrix_id: 3,
            group: "phq".to_string()
        }
    );
    assert_eq!(question.text, "How are you feeling?");
}

#[test]
fn matrix_question_without_group_is_rejected() {
    let mut row = stored("matrix", None);
    row.matrix_id = Some(3);

    let err = Question::try_from(row).unwrap_err();
    assert!(matches!(
        err,
        CoreError::MissingField {
            question_id: 7,
            field: "group"
        }
    ));
}

#[test]
fn multiple_choice_keeps_options_verbatim() {
    let row = stored(
        "multiple_choice",
        Some(json!({
            "multipleChoice": {
                "options": ["never", "sometimes", "often"],
                "allowMultiple": false
            }
        })),
    );

    let QuestionKind::MultipleChoice { options } = Question::try_from(row).unwrap().kind else {
        panic!("expected multiple choice");
    };
    assert_eq!(options["options"], json!(["never", "sometimes", "often"]));
    assert_eq!(options["allowMultiple"], json!(false));
    assert_eq!(options.len(), 2);
}

#[test]
fn multiple_choice_options_cannot_shadow_block_fields() {
    let row = stored(
        "multiple_choice",
        Some(json!({ "multipleChoice": { "id": 99, "type": "x", "question": "y", "min": 1 } })),
    );

    let QuestionKind::MultipleChoice { options } = Question::try_from(row).unwrap().kind else {
        panic!("expected multiple choice");
    };
    assert_eq!(options.len(), 1);
    assert_eq!(options["min"], json!(1));
}

#[test]
fn multiple_choice_without_extra_data_has_no_options() {
    let QuestionKind::MultipleChoice { options } =
        Question::try_from(stored("multiple_choice", None)).unwrap().kind
    else {
        panic!("expected multiple choice");
    };
    assert!(options.is_empty());
}

#[test]
fn open_text_reads_input_placeholder() {
    let row = stored(
        "open_text",
        Some(json!({ "openText": { "inputPlaceholder": "Write here" } })),
    );
    assert_eq!(
        Question::try_from(row).unwrap().kind,
        QuestionKind::OpenText {
            placeholder: Some("Write here".to_string())
        }
    );
}

#[test]
fn unknown_type_is_rejected() {
    let err = Question::try_from(stored("slider", None)).unwrap_err();
    assert!(matches!(err, CoreError::UnknownQuestionType { kind, .. } if kind == "slider"));
}

#[test]
fn extra_data_matches_what_decoding_reads() {
    let kind = QuestionKind::OpenText {
        placeholder: Some("Notes".to_string()),
    };
    let row = stored(kind.type_name(), kind.extra_data());
    assert_eq!(Question::try_from(row).unwrap().kind, kind);
}
