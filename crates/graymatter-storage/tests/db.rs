//! Queries against a live PostgreSQL database. Each test gets a fresh
//! database with the crate migrations applied; run them with a
//! `DATABASE_URL` pointing at a server and `cargo test -- --ignored`.

use graymatter_core::lang::Language;
use graymatter_core::models::answer::NewAnswer;
use graymatter_core::models::client::NewClient;
use graymatter_core::models::client_survey::ScheduledSurvey;
use graymatter_core::models::treatment::TreatmentPlan;
use graymatter_storage::error::StorageError;
use graymatter_storage::{answers, client_surveys, clients, questions, treatments};
use serde_json::json;
use sqlx::PgPool;

fn new_client(gov_id: &str) -> NewClient {
    NewClient {
        gov_id: gov_id.to_string(),
        name: "Dana Levi".to_string(),
        email: Some("dana@example.com".to_string()),
        phone: None,
        gender: None,
        condition: None,
        passcode_hash: "$argon2id$placeholder".to_string(),
    }
}

async fn seed_catalog(pool: &PgPool) -> (i32, i32, i32) {
    let protocol_id: i32 =
        sqlx::query_scalar("INSERT INTO protocols (name) VALUES ('Anxiety 8w') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let survey_id: i32 =
        sqlx::query_scalar("INSERT INTO surveys (name) VALUES ('GAD-7') RETURNING id")
            .fetch_one(pool)
            .await
            .unwrap();
    let question_id: i32 = sqlx::query_scalar(
        "INSERT INTO questions (type, question, extra_data) \
         VALUES ('open_text', 'How do you feel?', '{\"placeholder\": \"...\"}') RETURNING id",
    )
    .fetch_one(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO questions_surveys (question_id, survey_id) VALUES ($1, $2)")
        .bind(question_id)
        .bind(survey_id)
        .execute(pool)
        .await
        .unwrap();
    (protocol_id, survey_id, question_id)
}

fn plan(protocol_id: i32, survey_id: i32) -> TreatmentPlan {
    TreatmentPlan {
        protocol_id,
        start_date: jiff::civil::date(2026, 2, 1),
        reminders: json!({}),
        schedule: vec![ScheduledSurvey {
            survey_id,
            survey_date: jiff::civil::date(2026, 2, 8),
            snapshot: Vec::new(),
        }],
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn registration_with_treatment_is_stored_together(pool: PgPool) {
    let (protocol_id, survey_id, _) = seed_catalog(&pool).await;

    let (client_id, treatment) =
        clients::register_client(&pool, &new_client("100"), Some(&plan(protocol_id, survey_id)))
            .await
            .unwrap();

    let (treatment_id, instances) = treatment.unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].survey_date, jiff::civil::date(2026, 2, 8));

    let on_going = treatments::get_on_going_treatment(&pool, client_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(on_going.id, treatment_id);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn failed_treatment_insert_leaves_no_client(pool: PgPool) {
    let (protocol_id, _, _) = seed_catalog(&pool).await;

    // No such survey: the instance insert violates its foreign key.
    let result =
        clients::register_client(&pool, &new_client("101"), Some(&plan(protocol_id, 9999))).await;

    assert!(matches!(result, Err(StorageError::Database(_))));
    assert_eq!(count(&pool, "clients").await, 0);
    assert_eq!(count(&pool, "treatment").await, 0);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn duplicate_gov_id_is_a_conflict(pool: PgPool) {
    clients::register_client(&pool, &new_client("102"), None)
        .await
        .unwrap();

    let result = clients::register_client(&pool, &new_client("102"), None).await;
    assert!(matches!(result, Err(StorageError::Conflict { .. })));
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn treatment_schedule_rolls_back_on_failure(pool: PgPool) {
    let (protocol_id, survey_id, _) = seed_catalog(&pool).await;
    let (client_id, _) = clients::register_client(&pool, &new_client("103"), None)
        .await
        .unwrap();

    let mut broken = plan(protocol_id, survey_id);
    broken.schedule.push(ScheduledSurvey {
        survey_id: 9999,
        survey_date: jiff::civil::date(2026, 2, 15),
        snapshot: Vec::new(),
    });
    let result = treatments::create_treatment_with_schedule(
        &pool,
        &broken.treatment_for(client_id),
        &broken.schedule,
    )
    .await;

    assert!(result.is_err());
    assert_eq!(count(&pool, "treatment").await, 0);
    assert_eq!(count(&pool, "clients_surveys").await, 0);
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn answers_update_flags_and_close_the_instance(pool: PgPool) {
    let (protocol_id, survey_id, question_id) = seed_catalog(&pool).await;
    let (client_id, treatment) =
        clients::register_client(&pool, &new_client("104"), Some(&plan(protocol_id, survey_id)))
            .await
            .unwrap();
    let instance_id = treatment.unwrap().1[0].id;

    let answer = |text: &str| NewAnswer {
        question_id,
        answer: text.to_string(),
    };

    let stored = answers::record_answers(&pool, instance_id, &[answer("tired")], false)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
    let instance = client_surveys::get_client_survey(&pool, instance_id)
        .await
        .unwrap()
        .unwrap();
    assert!(instance.is_partially_done);
    assert!(!instance.is_done);

    answers::record_answers(&pool, instance_id, &[answer("better")], true)
        .await
        .unwrap();
    let instance = client_surveys::get_client_survey(&pool, instance_id)
        .await
        .unwrap()
        .unwrap();
    assert!(instance.is_done);
    assert!(!instance.is_partially_done);
    assert!(
        client_surveys::list_available(&pool, client_id)
            .await
            .unwrap()
            .is_empty()
    );

    let late = answers::record_answers(&pool, instance_id, &[answer("again")], true).await;
    assert!(matches!(late, Err(StorageError::AlreadyDone { .. })));
    assert_eq!(count(&pool, "answers").await, 2);

    let missing = answers::record_answers(&pool, 9999, &[answer("x")], true).await;
    assert!(matches!(missing, Err(StorageError::NotFound { .. })));
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn translated_questions_fall_back_to_base_options(pool: PgPool) {
    let (_, survey_id, question_id) = seed_catalog(&pool).await;
    let untranslated: i32 = sqlx::query_scalar(
        "INSERT INTO questions (type, question) VALUES ('open_text', 'Sleep?') RETURNING id",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO questions_surveys (question_id, survey_id) VALUES ($1, $2)")
        .bind(untranslated)
        .bind(survey_id)
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO questions_language (question_id, language, question) \
         VALUES ($1, 'he', 'איך אתה מרגיש?')",
    )
    .bind(question_id)
    .execute(&pool)
    .await
    .unwrap();

    let english = questions::fetch_questions(&pool, survey_id, &Language::default())
        .await
        .unwrap();
    assert_eq!(english.len(), 2);

    let hebrew = Language::parse("he").unwrap();
    let translated = questions::fetch_questions(&pool, survey_id, &hebrew)
        .await
        .unwrap();
    assert_eq!(translated.len(), 1);
    assert_eq!(translated[0].question, "איך אתה מרגיש?");
    assert_eq!(translated[0].extra_data, Some(json!({ "placeholder": "..." })));
}

#[sqlx::test]
#[ignore = "needs a PostgreSQL DATABASE_URL"]
async fn untranslated_matrix_is_absent(pool: PgPool) {
    let matrix_id: i32 =
        sqlx::query_scalar("INSERT INTO matrix (title) VALUES ('Over the last two weeks') RETURNING id")
            .fetch_one(&pool)
            .await
            .unwrap();

    let english = questions::fetch_matrix(&pool, matrix_id, &Language::default())
        .await
        .unwrap();
    assert_eq!(english.unwrap().title, "Over the last two weeks");

    let hebrew = Language::parse("he").unwrap();
    assert!(
        questions::fetch_matrix(&pool, matrix_id, &hebrew)
            .await
            .unwrap()
            .is_none()
    );
}
