use chrono::{DateTime, Utc};
use graymatter_core::models::answer::{Answer, NewAnswer};
use sqlx::PgPool;
use tracing::info;

use crate::convert;
use crate::error::StorageError;

/// Append answers to a survey instance and update its completion flags in
/// one transaction. `complete` marks the instance done; otherwise it is
/// marked partially done. The stored snapshot is never touched.
///
/// Returns `AlreadyDone` when the instance was completed before the row lock
/// was taken.
pub async fn record_answers(
    pool: &PgPool,
    client_survey_id: i32,
    answers: &[NewAnswer],
    complete: bool,
) -> Result<Vec<Answer>, StorageError> {
    let mut tx = pool.begin().await?;

    // The row lock serializes concurrent submissions for one instance; a
    // submission that waited behind a completing one sees it done.
    let is_done: Option<bool> =
        sqlx::query_scalar("SELECT is_done FROM clients_surveys WHERE id = $1 FOR UPDATE")
            .bind(client_survey_id)
            .fetch_optional(&mut *tx)
            .await?;
    match is_done {
        None => return Err(StorageError::not_found("client survey", client_survey_id)),
        Some(true) => {
            return Err(StorageError::AlreadyDone {
                entity: "client survey",
                key: client_survey_id.to_string(),
            });
        }
        Some(false) => {}
    }

    let mut stored = Vec::with_capacity(answers.len());
    for answer in answers {
        let (id, created_at): (i32, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO answers (client_survey_id, question_id, answer) \
             VALUES ($1, $2, $3) RETURNING id, created_at",
        )
        .bind(client_survey_id)
        .bind(answer.question_id)
        .bind(&answer.answer)
        .fetch_one(&mut *tx)
        .await?;
        stored.push(Answer {
            id,
            client_survey_id,
            question_id: answer.question_id,
            answer: answer.answer.clone(),
            created_at: convert::timestamp(created_at)?,
        });
    }

    sqlx::query(
        "UPDATE clients_surveys \
         SET is_done = $2, is_partially_done = NOT $2 \
         WHERE id = $1",
    )
    .bind(client_survey_id)
    .bind(complete)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(
        client_survey_id,
        answers = stored.len(),
        complete,
        "answers recorded"
    );
    Ok(stored)
}
