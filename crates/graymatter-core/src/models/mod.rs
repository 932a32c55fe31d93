pub mod answer;
pub mod client;
pub mod client_survey;
pub mod matrix;
pub mod protocol;
pub mod question;
pub mod survey;
pub mod treatment;
