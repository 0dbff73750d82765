pub mod auth;
pub mod dashboard;
pub mod health;
pub mod patients;
pub mod records;
pub mod tasks;
