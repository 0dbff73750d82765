pub mod paths;

use crate::{
    handlers::{
        auth, dashboard, health, patients,
        records::{self, PatientRecord},
        tasks,
    },
    server::ClinicServer,
};
use axum::{
    routing::{get, post},
    Router,
};
use database_layer::{LabOrder, Prescription, TelehealthAppointment};

/// Health check routes
pub fn health_routes() -> Router<ClinicServer> {
    Router::new().route(paths::HEALTH, get(health::health_check))
}

/// Login, signup and logout
pub fn auth_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::LOGIN, get(auth::login_form).post(auth::login))
        .route(paths::SIGNUP, get(auth::signup_form).post(auth::signup))
        .route(paths::LOGOUT, get(auth::logout))
}

/// Landing page and the two dashboards
pub fn dashboard_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::INDEX, get(dashboard::index))
        .route(paths::PATIENT, get(dashboard::doctor_dashboard))
        .route(paths::PATIENT_DASHBOARD, get(dashboard::patient_dashboard))
        .route(paths::PENDING_LABS, get(dashboard::pending_labs))
}

pub fn patient_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::ADD_PATIENT, get(patients::add_form).post(patients::add))
        .route(paths::EDIT_PATIENT, get(patients::edit_form).post(patients::edit))
        .route(paths::DELETE_PATIENT, post(patients::delete))
}

/// Prescriptions, telehealth appointments and lab orders
pub fn record_routes() -> Router<ClinicServer> {
    Router::new()
        .merge(record_kind_routes::<Prescription>(paths::DELETE_PRESCRIPTION))
        .merge(record_kind_routes::<TelehealthAppointment>(paths::DELETE_APPOINTMENT))
        .merge(record_kind_routes::<LabOrder>(paths::DELETE_LAB_ORDER))
}

fn record_kind_routes<R: PatientRecord>(delete_path: &str) -> Router<ClinicServer> {
    Router::new()
        .route(R::ADD_PATH, get(records::add_form::<R>).post(records::add::<R>))
        .route(R::EDIT_PATH, get(records::edit_form::<R>).post(records::edit::<R>))
        .route(delete_path, post(records::delete::<R>))
}

/// Clinic task board
pub fn task_routes() -> Router<ClinicServer> {
    Router::new()
        .route(paths::TASKS, get(tasks::list).post(tasks::add))
        .route(paths::UPDATE_TASK, get(tasks::edit_form).post(tasks::update))
        .route(paths::DELETE_TASK, post(tasks::delete))
}

/// Create all routes
pub fn create_routes() -> Router<ClinicServer> {
    Router::new()
        .merge(health_routes())
        .merge(auth_routes())
        .merge(dashboard_routes())
        .merge(patient_routes())
        .merge(record_routes())
        .merge(task_routes())
}
