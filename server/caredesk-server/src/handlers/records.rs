//! Prescriptions, telehealth appointments and lab orders
//!
//! The three record kinds share one handler flow: look up the owner or 404,
//! validate the form, write, then flash and redirect to the owning patient's
//! dashboard. [`PatientRecord`] supplies the per-kind pieces and the routes
//! mount the generic handlers once per kind.

use crate::error::{ApiError, OptionExt};
use crate::flash::{self, Flash, IncomingFlash};
use crate::forms::{AppointmentForm, FormValidation, LabOrderForm, PrescriptionForm};
use crate::middleware::DoctorContext;
use crate::routes::paths;
use crate::server::ClinicServer;
use crate::views::{self, forms::FormPage};
use async_trait::async_trait;
use axum::{
    extract::{Form, Path, State},
    response::Response,
};
use database_layer::{
    AppointmentInput, Database, DatabaseResult, LabOrder, LabOrderInput, Prescription,
    PrescriptionInput, TelehealthAppointment,
};
use serde::de::DeserializeOwned;
use tracing::{error, info};

/// A record owned by exactly one patient
#[async_trait]
pub trait PatientRecord: Sized + Send + Sync + 'static {
    type Form: FormValidation<Output = Self::Input>
        + DeserializeOwned
        + Default
        + for<'a> From<&'a Self>
        + Send;
    type Input: Send + Sync;

    /// Capitalised name, used in flashes and 404 pages
    const LABEL: &'static str;
    const NOUN: &'static str;
    /// Past and progressive forms of the create action ("added", "adding")
    const CREATED: &'static str;
    const CREATING: &'static str;
    const ADD_PATH: &'static str;
    const EDIT_PATH: &'static str;

    fn id(&self) -> i64;
    fn patient_id(&self) -> i64;
    fn add_title(patient_name: &str) -> String;
    fn render(page: &FormPage<'_>, form: &Self::Form) -> String;

    async fn find(db: &Database, id: i64) -> DatabaseResult<Option<Self>>;
    async fn create(db: &Database, patient_id: i64, input: &Self::Input) -> DatabaseResult<Self>;
    async fn update(db: &Database, id: i64, input: &Self::Input) -> DatabaseResult<Option<Self>>;
    async fn delete(db: &Database, id: i64) -> DatabaseResult<bool>;
}

#[async_trait]
impl PatientRecord for Prescription {
    type Form = PrescriptionForm;
    type Input = PrescriptionInput;

    const LABEL: &'static str = "Prescription";
    const NOUN: &'static str = "prescription";
    const CREATED: &'static str = "added";
    const CREATING: &'static str = "adding";
    const ADD_PATH: &'static str = paths::ADD_PRESCRIPTION;
    const EDIT_PATH: &'static str = paths::EDIT_PRESCRIPTION;

    fn id(&self) -> i64 {
        self.id
    }

    fn patient_id(&self) -> i64 {
        self.patient_id
    }

    fn add_title(patient_name: &str) -> String {
        format!("Add prescription for {patient_name}")
    }

    fn render(page: &FormPage<'_>, form: &PrescriptionForm) -> String {
        views::forms::prescription_form(page, form)
    }

    async fn find(db: &Database, id: i64) -> DatabaseResult<Option<Self>> {
        db.prescriptions.find_by_id(id).await
    }

    async fn create(db: &Database, patient_id: i64, input: &PrescriptionInput) -> DatabaseResult<Self> {
        db.prescriptions.create(patient_id, input).await
    }

    async fn update(db: &Database, id: i64, input: &PrescriptionInput) -> DatabaseResult<Option<Self>> {
        db.prescriptions.update(id, input).await
    }

    async fn delete(db: &Database, id: i64) -> DatabaseResult<bool> {
        db.prescriptions.delete(id).await
    }
}

#[async_trait]
impl PatientRecord for TelehealthAppointment {
    type Form = AppointmentForm;
    type Input = AppointmentInput;

    const LABEL: &'static str = "Appointment";
    const NOUN: &'static str = "appointment";
    const CREATED: &'static str = "scheduled";
    const CREATING: &'static str = "scheduling";
    const ADD_PATH: &'static str = paths::ADD_APPOINTMENT;
    const EDIT_PATH: &'static str = paths::EDIT_APPOINTMENT;

    fn id(&self) -> i64 {
        self.id
    }

    fn patient_id(&self) -> i64 {
        self.patient_id
    }

    fn add_title(patient_name: &str) -> String {
        format!("Schedule appointment for {patient_name}")
    }

    fn render(page: &FormPage<'_>, form: &AppointmentForm) -> String {
        views::forms::appointment_form(page, form)
    }

    async fn find(db: &Database, id: i64) -> DatabaseResult<Option<Self>> {
        db.appointments.find_by_id(id).await
    }

    async fn create(db: &Database, patient_id: i64, input: &AppointmentInput) -> DatabaseResult<Self> {
        db.appointments.create(patient_id, input).await
    }

    async fn update(db: &Database, id: i64, input: &AppointmentInput) -> DatabaseResult<Option<Self>> {
        db.appointments.update(id, input).await
    }

    async fn delete(db: &Database, id: i64) -> DatabaseResult<bool> {
        db.appointments.delete(id).await
    }
}

#[async_trait]
impl PatientRecord for LabOrder {
    type Form = LabOrderForm;
    type Input = LabOrderInput;

    const LABEL: &'static str = "Lab order";
    const NOUN: &'static str = "lab order";
    const CREATED: &'static str = "created";
    const CREATING: &'static str = "creating";
    const ADD_PATH: &'static str = paths::ADD_LAB_ORDER;
    const EDIT_PATH: &'static str = paths::EDIT_LAB_ORDER;

    fn id(&self) -> i64 {
        self.id
    }

    fn patient_id(&self) -> i64 {
        self.patient_id
    }

    fn add_title(patient_name: &str) -> String {
        format!("Order lab for {patient_name}")
    }

    fn render(page: &FormPage<'_>, form: &LabOrderForm) -> String {
        views::forms::lab_order_form(page, form)
    }

    async fn find(db: &Database, id: i64) -> DatabaseResult<Option<Self>> {
        db.lab_orders.find_by_id(id).await
    }

    async fn create(db: &Database, patient_id: i64, input: &LabOrderInput) -> DatabaseResult<Self> {
        db.lab_orders.create(patient_id, input).await
    }

    async fn update(db: &Database, id: i64, input: &LabOrderInput) -> DatabaseResult<Option<Self>> {
        db.lab_orders.update(id, input).await
    }

    async fn delete(db: &Database, id: i64) -> DatabaseResult<bool> {
        db.lab_orders.delete(id).await
    }
}

async fn find_or_404<R: PatientRecord>(server: &ClinicServer, id: i64) -> Result<R, ApiError> {
    R::find(&server.db, id).await?.or_not_found(R::LABEL)
}

pub async fn add_form<R: PatientRecord>(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(patient_id): Path<i64>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let patient = server
        .db
        .patients
        .find_by_id(patient_id)
        .await?
        .or_not_found("Patient")?;

    let title = R::add_title(&patient.name);
    let action = paths::fill(R::ADD_PATH, patient_id);
    let cancel = paths::fill(paths::PATIENT, patient_id);
    let page = FormPage {
        auth: &auth,
        flash: incoming.get(),
        title: &title,
        action: &action,
        cancel: &cancel,
    };
    let html = R::render(&page, &R::Form::default());
    Ok(flash::page(html, &incoming))
}

pub async fn add<R: PatientRecord>(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(patient_id): Path<i64>,
    Form(form): Form<R::Form>,
) -> Result<Response, ApiError> {
    server
        .db
        .patients
        .find_by_id(patient_id)
        .await?
        .or_not_found("Patient")?;

    let add_path = paths::fill(R::ADD_PATH, patient_id);
    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => return Ok(flash::redirect(&add_path, Flash::error(e.to_string()))),
    };

    match R::create(&server.db, patient_id, &input).await {
        Ok(record) => {
            info!(
                doctor_id = auth.user_id,
                patient_id,
                record_id = record.id(),
                kind = R::NOUN,
                "Record {}",
                R::CREATED
            );
            Ok(flash::redirect(
                &paths::fill(paths::PATIENT, patient_id),
                Flash::success(format!("{} {}.", R::LABEL, R::CREATED)),
            ))
        }
        Err(e) => {
            error!(patient_id, kind = R::NOUN, error = %e, "Failed to create record");
            Ok(flash::redirect(
                &add_path,
                Flash::error(format!("There was an issue {} the {}.", R::CREATING, R::NOUN)),
            ))
        }
    }
}

pub async fn edit_form<R: PatientRecord>(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let record = find_or_404::<R>(&server, id).await?;

    let title = format!("Edit {}", R::NOUN);
    let action = paths::fill(R::EDIT_PATH, id);
    let cancel = paths::fill(paths::PATIENT, record.patient_id());
    let page = FormPage {
        auth: &auth,
        flash: incoming.get(),
        title: &title,
        action: &action,
        cancel: &cancel,
    };
    let html = R::render(&page, &R::Form::from(&record));
    Ok(flash::page(html, &incoming))
}

pub async fn edit<R: PatientRecord>(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    Form(form): Form<R::Form>,
) -> Result<Response, ApiError> {
    let record = find_or_404::<R>(&server, id).await?;
    let dashboard = paths::fill(paths::PATIENT, record.patient_id());

    let input = match form.validate() {
        Ok(input) => input,
        Err(e) => {
            return Ok(flash::redirect(
                &paths::fill(R::EDIT_PATH, id),
                Flash::error(e.to_string()),
            ))
        }
    };

    match R::update(&server.db, id, &input).await {
        Ok(Some(_)) => {
            info!(doctor_id = auth.user_id, record_id = id, kind = R::NOUN, "Record updated");
            Ok(flash::redirect(
                &dashboard,
                Flash::success(format!("{} updated.", R::LABEL)),
            ))
        }
        Ok(None) => Err(ApiError::not_found(R::LABEL)),
        Err(e) => {
            error!(record_id = id, kind = R::NOUN, error = %e, "Failed to update record");
            Ok(flash::redirect(
                &dashboard,
                Flash::error(format!("There was an issue updating the {}.", R::NOUN)),
            ))
        }
    }
}

/// Delete one record; the patient and its other records are untouched
pub async fn delete<R: PatientRecord>(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let record = find_or_404::<R>(&server, id).await?;
    let dashboard = paths::fill(paths::PATIENT, record.patient_id());

    match R::delete(&server.db, id).await {
        Ok(_) => {
            info!(doctor_id = auth.user_id, record_id = id, kind = R::NOUN, "Record deleted");
            Ok(flash::redirect(
                &dashboard,
                Flash::success(format!("{} deleted.", R::LABEL)),
            ))
        }
        Err(e) => {
            error!(record_id = id, kind = R::NOUN, error = %e, "Failed to delete record");
            Ok(flash::redirect(
                &dashboard,
                Flash::error(format!("There was an issue deleting the {}.", R::NOUN)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_titles_name_the_patient() {
        assert_eq!(Prescription::add_title("Ada"), "Add prescription for Ada");
        assert_eq!(
            TelehealthAppointment::add_title("Ada"),
            "Schedule appointment for Ada"
        );
        assert_eq!(LabOrder::add_title("Ada"), "Order lab for Ada");
    }

    #[test]
    fn test_each_kind_has_its_own_routes() {
        assert_eq!(
            paths::fill(Prescription::EDIT_PATH, 3),
            "/edit_prescription/3"
        );
        assert_ne!(TelehealthAppointment::EDIT_PATH, LabOrder::EDIT_PATH);
        assert_eq!(paths::fill(LabOrder::ADD_PATH, 8), "/add_lab_order/8");
    }
}
