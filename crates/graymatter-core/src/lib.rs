//! graymatter-core
//!
//! Pure domain types for the GrayMatter clinic backend: clients, protocols,
//! surveys, questions, matrices, treatments and the assembled survey blocks.
//! No database dependency; this is the shared vocabulary of the system.

pub mod block;
pub mod error;
pub mod lang;
pub mod models;
