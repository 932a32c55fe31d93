//! graymatter-auth
//!
//! Client credentials: passcode hashing, access tokens, and one-time
//! temporary passcodes with their delivery.

pub mod delivery;
pub mod error;
pub mod jwt;
pub mod passcode;
pub mod password;
