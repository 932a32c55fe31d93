use graymatter_auth::password::{hash_passcode, verify_passcode};

#[test]
fn hash_and_verify() {
    let hash = hash_passcode("4821-client").unwrap();

    assert!(hash.starts_with("$argon2"));
    assert!(verify_passcode("4821-client", &hash).unwrap());
    assert!(!verify_passcode("4821-clienT", &hash).unwrap());
}

#[test]
fn same_passcode_gets_different_salts() {
    let first = hash_passcode("same").unwrap();
    let second = hash_passcode("same").unwrap();

    assert_ne!(first, second);
    assert!(verify_passcode("same", &first).unwrap());
    assert!(verify_passcode("same", &second).unwrap());
}

#[test]
fn malformed_hash_is_an_error() {
    assert!(verify_passcode("anything", "plaintext-from-legacy-row").is_err());
}
