use crate::calendar::MonthQuery;
use crate::error::{ApiError, OptionExt};
use crate::flash::{self, IncomingFlash};
use crate::middleware::{AuthContext, DoctorContext, PatientContext};
use crate::routes::paths;
use crate::server::ClinicServer;
use crate::views::{self, dashboard::DashboardView};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use database_layer::PatientRecords;

/// Landing page: doctors go to the first patient, patients to their own record
pub async fn index(
    State(server): State<ClinicServer>,
    auth: AuthContext,
    Query(query): Query<MonthQuery>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    if !auth.is_doctor() {
        return Ok(Redirect::to(paths::PATIENT_DASHBOARD).into_response());
    }

    let patients = server.db.patients.list().await?;
    if let Some(first) = patients.first() {
        return Ok(Redirect::to(&paths::fill(paths::PATIENT, first.id)).into_response());
    }

    let records = PatientRecords::default();
    let pending = server.db.lab_orders.list_pending().await?;
    let grid = query.grid();
    let html = views::dashboard::dashboard_page(&DashboardView {
        auth: &auth,
        flash: incoming.get(),
        patients: &patients,
        selected: None,
        records: &records,
        pending_labs: &pending,
        grid: &grid,
    });
    Ok(flash::page(html, &incoming))
}

/// Doctor view of one patient
pub async fn doctor_dashboard(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    Query(query): Query<MonthQuery>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let patient = server
        .db
        .patients
        .find_by_id(id)
        .await?
        .or_not_found("Patient")?;

    let patients = server.db.patients.list().await?;
    let records = server.db.patient_records(patient.id).await?;
    let pending = server.db.lab_orders.list_pending().await?;
    let grid = query.grid();

    let html = views::dashboard::dashboard_page(&DashboardView {
        auth: &auth,
        flash: incoming.get(),
        patients: &patients,
        selected: Some(&patient),
        records: &records,
        pending_labs: &pending,
        grid: &grid,
    });
    Ok(flash::page(html, &incoming))
}

/// Patient portal: the record linked to the logged-in account
pub async fn patient_dashboard(
    State(server): State<ClinicServer>,
    PatientContext(auth): PatientContext,
    Query(query): Query<MonthQuery>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let patient = server.db.patients.find_by_user_id(auth.user_id).await?;
    let records = match &patient {
        Some(p) => server.db.patient_records(p.id).await?,
        None => PatientRecords::default(),
    };
    let grid = query.grid();

    let html = views::dashboard::dashboard_page(&DashboardView {
        auth: &auth,
        flash: incoming.get(),
        patients: &[],
        selected: patient.as_ref(),
        records: &records,
        pending_labs: &[],
        grid: &grid,
    });
    Ok(flash::page(html, &incoming))
}

/// Every lab order still marked for submission
pub async fn pending_labs(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let orders = server.db.lab_orders.list_pending().await?;
    let html = views::dashboard::pending_labs_page(&auth, incoming.get(), &orders);
    Ok(flash::page(html, &incoming))
}
