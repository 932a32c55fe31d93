use std::time::Duration;

use graymatter_api::error::ApiError;
use graymatter_api::routes::clients::authenticate;
use graymatter_auth::jwt::TokenIssuer;
use graymatter_auth::password::hash_passcode;
use graymatter_core::models::client::{Client, ClientAccount, ClientCredentials};
use jiff::{Timestamp, ToSpan};

fn issuer() -> TokenIssuer {
    TokenIssuer::new("login-test-secret", Duration::from_secs(3600))
}

fn account(credentials: ClientCredentials) -> ClientAccount {
    ClientAccount {
        client: Client {
            id: 11,
            gov_id: "204455667".to_string(),
            name: "Noa Peretz".to_string(),
            email: None,
            phone: Some("0521234567".to_string()),
            gender: None,
            condition: None,
            created_at: "2024-05-01T09:00:00Z".parse().unwrap(),
        },
        credentials,
    }
}

fn with_passcode(passcode: &str) -> ClientCredentials {
    ClientCredentials {
        passcode_hash: hash_passcode(passcode).unwrap(),
        temp_passcode_hash: None,
        temp_passcode_expiry: None,
    }
}

#[test]
fn unknown_client_is_not_found() {
    let err = authenticate(None, "whatever", &issuer(), Timestamp::now()).unwrap_err();
    assert_eq!(err, ApiError::NotFound("No client found".to_string()));
}

#[test]
fn wrong_passcode_is_unauthorized() {
    let err = authenticate(
        Some(account(with_passcode("right-one"))),
        "wrong-one",
        &issuer(),
        Timestamp::now(),
    )
    .unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("wrong passcode".to_string()));
}

#[test]
fn matching_passcode_issues_a_token_for_the_gov_id() {
    let tokens = issuer();
    let response = authenticate(
        Some(account(with_passcode("right-one"))),
        "right-one",
        &tokens,
        Timestamp::now(),
    )
    .unwrap();

    assert_eq!(response.status, "success");
    assert_eq!(response.gov_id, "204455667");
    assert_eq!(response.name, "Noa Peretz");

    let claims = tokens.validate(&response.access_token).unwrap();
    assert_eq!(claims.sub, "204455667");
    assert_eq!(claims.name, "Noa Peretz");
}

#[test]
fn temporary_passcode_works_only_until_it_expires() {
    let now = Timestamp::now();
    let credentials = ClientCredentials {
        temp_passcode_hash: Some(hash_passcode("Temp0rary1").unwrap()),
        temp_passcode_expiry: Some(now.checked_add(30.minutes()).unwrap()),
        ..with_passcode("right-one")
    };

    let response =
        authenticate(Some(account(credentials.clone())), "Temp0rary1", &issuer(), now).unwrap();
    assert_eq!(response.status, "success");

    let later = now.checked_add(31.minutes()).unwrap();
    let err = authenticate(Some(account(credentials)), "Temp0rary1", &issuer(), later).unwrap_err();
    assert_eq!(err, ApiError::Unauthorized("wrong passcode".to_string()));
}
