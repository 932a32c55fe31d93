use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A client as exposed to callers. Credential hashes live in
/// [`ClientCredentials`] and are never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Client {
    pub id: i32,
    pub gov_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub created_at: jiff::Timestamp,
}

/// Stored credential material for a client.
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub passcode_hash: String,
    pub temp_passcode_hash: Option<String>,
    pub temp_passcode_expiry: Option<jiff::Timestamp>,
}

impl ClientCredentials {
    /// The temporary passcode hash, if one was issued and has not expired at `now`.
    pub fn active_temp_passcode(&self, now: jiff::Timestamp) -> Option<&str> {
        match (&self.temp_passcode_hash, self.temp_passcode_expiry) {
            (Some(hash), Some(expiry)) if now < expiry => Some(hash.as_str()),
            _ => None,
        }
    }
}

/// A client together with its credentials, as loaded for authentication.
#[derive(Debug, Clone)]
pub struct ClientAccount {
    pub client: Client,
    pub credentials: ClientCredentials,
}

/// Fields required to insert a client. The passcode is already hashed.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub gov_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub condition: Option<String>,
    pub passcode_hash: String,
}
