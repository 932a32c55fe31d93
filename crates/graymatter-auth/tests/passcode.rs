use std::collections::HashSet;

use graymatter_auth::delivery::{DeliveryChannel, LogDelivery, PasscodeDelivery};
use graymatter_auth::passcode::{TEMP_PASSCODE_LEN, generate_temp_passcode};

#[test]
fn temp_passcodes_are_alphanumeric_with_a_digit() {
    for _ in 0..200 {
        let passcode = generate_temp_passcode();
        assert_eq!(passcode.len(), TEMP_PASSCODE_LEN);
        assert!(passcode.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(passcode.chars().any(|c| c.is_ascii_digit()));
    }
}

#[test]
fn temp_passcodes_vary() {
    let seen: HashSet<String> = (0..50).map(|_| generate_temp_passcode()).collect();
    assert!(seen.len() > 45);
}

#[test]
fn channel_parses_lowercase_names() {
    let email: DeliveryChannel = serde_json::from_str("\"email\"").unwrap();
    let sms: DeliveryChannel = serde_json::from_str("\"sms\"").unwrap();

    assert_eq!(email, DeliveryChannel::Email);
    assert_eq!(sms, DeliveryChannel::Sms);
    assert!(serde_json::from_str::<DeliveryChannel>("\"fax\"").is_err());
}

#[tokio::test]
async fn log_delivery_succeeds() {
    let result = LogDelivery
        .deliver(DeliveryChannel::Sms, "0501234567", "abc123defg")
        .await;
    assert!(result.is_ok());
}
