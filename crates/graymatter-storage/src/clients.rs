use chrono::{DateTime, Utc};
use graymatter_core::models::client::{Client, ClientAccount, ClientCredentials, NewClient};
use graymatter_core::models::treatment::TreatmentPlan;
use sqlx::{FromRow, PgConnection, PgPool};
use tracing::info;

use crate::convert;
use crate::error::StorageError;
use crate::treatments::{self, ScheduledInstance};

const COLUMNS: &str = "id, gov_id, name, email, phone, gender, condition, created_at, \
                       passcode, temp_passcode, time_passcode_expiry";

#[derive(FromRow)]
struct ClientRow {
    id: i32,
    gov_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    gender: Option<String>,
    condition: Option<String>,
    created_at: DateTime<Utc>,
    passcode: String,
    temp_passcode: Option<String>,
    time_passcode_expiry: Option<DateTime<Utc>>,
}

impl ClientRow {
    fn into_account(self) -> Result<ClientAccount, StorageError> {
        let temp_passcode_expiry = self
            .time_passcode_expiry
            .map(convert::timestamp)
            .transpose()?;
        Ok(ClientAccount {
            client: Client {
                id: self.id,
                gov_id: self.gov_id,
                name: self.name,
                email: self.email,
                phone: self.phone,
                gender: self.gender,
                condition: self.condition,
                created_at: convert::timestamp(self.created_at)?,
            },
            credentials: ClientCredentials {
                passcode_hash: self.passcode,
                temp_passcode_hash: self.temp_passcode,
                temp_passcode_expiry,
            },
        })
    }
}

/// All clients, oldest first.
pub async fn list_clients(pool: &PgPool) -> Result<Vec<Client>, StorageError> {
    let rows: Vec<ClientRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM clients ORDER BY id"))
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| row.into_account().map(|account| account.client))
        .collect()
}

/// Look up a client and its credentials by government id.
pub async fn get_account_by_gov_id(
    pool: &PgPool,
    gov_id: &str,
) -> Result<Option<ClientAccount>, StorageError> {
    let row: Option<ClientRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM clients WHERE gov_id = $1"))
            .bind(gov_id)
            .fetch_optional(pool)
            .await?;

    row.map(ClientRow::into_account).transpose()
}

/// Look up a client by government id.
pub async fn get_client_by_gov_id(
    pool: &PgPool,
    gov_id: &str,
) -> Result<Option<Client>, StorageError> {
    Ok(get_account_by_gov_id(pool, gov_id)
        .await?
        .map(|account| account.client))
}

/// Look up a client by internal id.
pub async fn get_client(pool: &PgPool, id: i32) -> Result<Option<Client>, StorageError> {
    let row: Option<ClientRow> = sqlx::query_as(&format!("SELECT {COLUMNS} FROM clients WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row
        .map(ClientRow::into_account)
        .transpose()?
        .map(|account| account.client))
}

/// Insert a client. Returns the new id, or `Conflict` when the government id
/// is already registered.
pub async fn insert_client(conn: &mut PgConnection, client: &NewClient) -> Result<i32, StorageError> {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO clients (passcode, gov_id, condition, phone, email, name, gender) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id",
    )
    .bind(&client.passcode_hash)
    .bind(&client.gov_id)
    .bind(&client.condition)
    .bind(&client.phone)
    .bind(&client.email)
    .bind(&client.name)
    .bind(&client.gender)
    .fetch_one(conn)
    .await
    .map_err(|e| StorageError::conflict_on_unique(e, "client", &client.gov_id))?;

    Ok(id)
}

/// Register a client and, when given, its planned treatment in one
/// transaction. A failed treatment insert leaves no client behind.
pub async fn register_client(
    pool: &PgPool,
    client: &NewClient,
    plan: Option<&TreatmentPlan>,
) -> Result<(i32, Option<(i32, Vec<ScheduledInstance>)>), StorageError> {
    let mut tx = pool.begin().await?;

    let client_id = insert_client(&mut tx, client).await?;
    let treatment = match plan {
        Some(plan) => Some(
            treatments::insert_treatment_with_schedule(
                &mut tx,
                &plan.treatment_for(client_id),
                &plan.schedule,
            )
            .await?,
        ),
        None => None,
    };

    tx.commit().await?;

    info!(client_id, with_treatment = treatment.is_some(), "client registered");
    Ok((client_id, treatment))
}

/// Store a temporary passcode hash valid until `expires_at`.
pub async fn set_temp_passcode(
    pool: &PgPool,
    client_id: i32,
    passcode_hash: &str,
    expires_at: jiff::Timestamp,
) -> Result<(), StorageError> {
    let result = sqlx::query(
        "UPDATE clients SET temp_passcode = $2, time_passcode_expiry = $3 WHERE id = $1",
    )
    .bind(client_id)
    .bind(passcode_hash)
    .bind(convert::chrono_timestamp(expires_at)?)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("client", client_id));
    }
    Ok(())
}
