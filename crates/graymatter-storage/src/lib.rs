//! graymatter-storage
//!
//! PostgreSQL access. One module per entity, each a set of parameterized
//! queries over a pooled `sqlx` connection.

pub mod answers;
pub mod client_surveys;
pub mod clients;
pub mod convert;
pub mod error;
pub mod pool;
pub mod protocols;
pub mod questions;
pub mod surveys;
pub mod treatments;

pub use questions::PgSurveySource;
