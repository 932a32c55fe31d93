use graymatter_core::block::{
    MatrixBlock, MatrixItem, MultipleChoiceBlock, OpenTextBlock, SurveyBlock,
};
use serde_json::{Map, json};

#[test]
fn matrix_block_serializes_with_type_tag() {
    let block = SurveyBlock::Matrix(MatrixBlock {
        group: "g1".to_string(),
        title: "Over the last two weeks".to_string(),
        columns: json!(["Not at all", "Several days"]),
        answers: json!([0, 1]),
        instructions: Some("Pick one".to_string()),
        questions: vec![
            MatrixItem {
                id: 1,
                question: "Little interest".to_string(),
            },
            MatrixItem {
                id: 2,
                question: "Feeling down".to_string(),
            },
        ],
    });

    assert_eq!(
        serde_json::to_value(&block).unwrap(),
        json!({
            "type": "matrix",
            "group": "g1",
            "title": "Over the last two weeks",
            "columns": ["Not at all", "Several days"],
            "answers": [0, 1],
            "instructions": "Pick one",
            "questions": [
                { "id": 1, "question": "Little interest" },
                { "id": 2, "question": "Feeling down" }
            ]
        })
    );
    assert_eq!(block.question_ids(), vec![1, 2]);
}

#[test]
fn multiple_choice_block_flattens_options() {
    let mut options = Map::new();
    options.insert("options".to_string(), json!(["yes", "no"]));

    let block = SurveyBlock::MultipleChoice(MultipleChoiceBlock {
        id: 4,
        question: "Do you smoke?".to_string(),
        options,
    });

    assert_eq!(
        serde_json::to_value(&block).unwrap(),
        json!({
            "id": 4,
            "type": "multiple_choice",
            "question": "Do you smoke?",
            "options": ["yes", "no"]
        })
    );
}

#[test]
fn open_text_block_keeps_null_placeholder() {
    let block = SurveyBlock::OpenText(OpenTextBlock {
        id: 5,
        question: "Anything else?".to_string(),
        placeholder: None,
    });

    assert_eq!(
        serde_json::to_value(&block).unwrap(),
        json!({ "id": 5, "type": "open_text", "question": "Anything else?", "placeholder": null })
    );
}
