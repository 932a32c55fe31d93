pub mod clients;
pub mod clinics;
pub mod health;
pub mod surveys;
pub mod treatments;
