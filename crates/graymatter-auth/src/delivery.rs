//! Out-of-band delivery of temporary passcodes.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;
use tracing::info;

use crate::error::AuthError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryChannel {
    Email,
    Sms,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChannel::Email => f.write_str("email"),
            DeliveryChannel::Sms => f.write_str("sms"),
        }
    }
}

pub type DeliveryFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>>;

/// Sends a temporary passcode to a client over email or SMS.
///
/// Object safe so the API can hold any sender behind an `Arc`.
pub trait PasscodeDelivery: Send + Sync {
    fn deliver<'a>(
        &'a self,
        channel: DeliveryChannel,
        destination: &'a str,
        passcode: &'a str,
    ) -> DeliveryFuture<'a>;
}

/// Records the delivery in the log without sending anything. The passcode
/// itself is never logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDelivery;

impl PasscodeDelivery for LogDelivery {
    fn deliver<'a>(
        &'a self,
        channel: DeliveryChannel,
        destination: &'a str,
        passcode: &'a str,
    ) -> DeliveryFuture<'a> {
        Box::pin(async move {
            info!(
                %channel,
                destination = mask(destination),
                length = passcode.len(),
                "temporary passcode issued"
            );
            Ok(())
        })
    }
}

/// Keep the last three characters of a destination for the log.
fn mask(destination: &str) -> String {
    let visible: String = destination
        .chars()
        .rev()
        .take(3)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("***{visible}")
}
