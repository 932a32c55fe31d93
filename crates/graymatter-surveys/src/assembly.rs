//! Survey assembly: turns the question rows of a survey into display blocks.
//!
//! Matrix questions sharing a group collapse into one block at the position
//! of the group's first question. Unrecognized question rows and groups whose
//! matrix row is missing yield no block. Matrix lookups run concurrently, but
//! block order always follows question order.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use graymatter_core::block::{
    MatrixBlock, MatrixItem, MultipleChoiceBlock, OpenTextBlock, SurveyBlock,
};
use graymatter_core::lang::Language;
use graymatter_core::models::matrix::Matrix;
use graymatter_core::models::question::{Question, QuestionKind};
use tracing::debug;

use crate::SurveySource;
use crate::error::AssemblyError;

/// Assemble `survey_id` in `lang` into an ordered list of blocks.
pub async fn assemble_survey<S: SurveySource>(
    source: &S,
    survey_id: i32,
    lang: &Language,
) -> Result<Vec<SurveyBlock>, AssemblyError> {
    let rows = source
        .questions(survey_id, lang)
        .await
        .map_err(AssemblyError::Source)?;

    let questions: Vec<Question> = rows
        .into_iter()
        .filter_map(|row| match Question::try_from(row) {
            Ok(question) => Some(question),
            Err(e) => {
                debug!(survey_id, error = %e, "skipping question");
                None
            }
        })
        .collect();

    let leaders = group_leaders(&questions);
    let matrices = try_join_all(
        leaders
            .iter()
            .map(|(_, matrix_id)| source.matrix(*matrix_id, lang)),
    )
    .await
    .map_err(AssemblyError::Source)?;

    let mut matrix_by_group: HashMap<&str, Matrix> = leaders
        .iter()
        .zip(matrices)
        .filter_map(|((group, matrix_id), matrix)| {
            if matrix.is_none() {
                debug!(survey_id, group, matrix_id, "matrix not found, dropping group");
            }
            matrix.map(|m| (*group, m))
        })
        .collect();

    let mut blocks = Vec::new();
    for question in &questions {
        match &question.kind {
            QuestionKind::Matrix { group, .. } => {
                // Taking the matrix out leaves later questions of the group with nothing.
                let Some(matrix) = matrix_by_group.remove(group.as_str()) else {
                    continue;
                };
                blocks.push(SurveyBlock::Matrix(MatrixBlock {
                    group: group.clone(),
                    title: matrix.title,
                    columns: matrix.columns,
                    answers: matrix.answers,
                    instructions: matrix.instructions,
                    questions: group_items(&questions, group),
                }));
            }
            QuestionKind::MultipleChoice { options } => {
                blocks.push(SurveyBlock::MultipleChoice(MultipleChoiceBlock {
                    id: question.id,
                    question: question.text.clone(),
                    options: options.clone(),
                }));
            }
            QuestionKind::OpenText { placeholder } => {
                blocks.push(SurveyBlock::OpenText(OpenTextBlock {
                    id: question.id,
                    question: question.text.clone(),
                    placeholder: placeholder.clone(),
                }));
            }
        }
    }

    debug!(survey_id, lang = %lang, blocks = blocks.len(), "assembled survey");
    Ok(blocks)
}

/// The first matrix question of every group, as `(group, matrix_id)` in scan order.
fn group_leaders(questions: &[Question]) -> Vec<(&str, i32)> {
    let mut seen = HashSet::new();
    questions
        .iter()
        .filter_map(|q| match &q.kind {
            QuestionKind::Matrix { matrix_id, group } if seen.insert(group.as_str()) => {
                Some((group.as_str(), *matrix_id))
            }
            _ => None,
        })
        .collect()
}

fn group_items(questions: &[Question], group: &str) -> Vec<MatrixItem> {
    questions
        .iter()
        .filter(|q| matches!(&q.kind, QuestionKind::Matrix { group: g, .. } if g == group))
        .map(|q| MatrixItem {
            id: q.id,
            question: q.text.clone(),
        })
        .collect()
}
