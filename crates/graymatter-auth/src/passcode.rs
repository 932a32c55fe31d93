use rand::Rng;
use rand::distributions::Alphanumeric;

pub const TEMP_PASSCODE_LEN: usize = 10;

/// A random alphanumeric temporary passcode containing at least one digit.
pub fn generate_temp_passcode() -> String {
    let mut rng = rand::thread_rng();
    loop {
        let passcode: String = (&mut rng)
            .sample_iter(&Alphanumeric)
            .take(TEMP_PASSCODE_LEN)
            .map(char::from)
            .collect();
        if passcode.chars().any(|c| c.is_ascii_digit()) {
            return passcode;
        }
    }
}
