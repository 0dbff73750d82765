use crate::error::{ApiError, OptionExt};
use crate::flash::{self, Flash, IncomingFlash};
use crate::forms::{FormValidation, PatientForm, DATE_FORMAT};
use crate::middleware::DoctorContext;
use crate::routes::paths;
use crate::server::ClinicServer;
use crate::views::{self, forms::FormPage};
use auth_identity::{Role, UserRepository};
use axum::{
    extract::{Form, Path, State},
    response::Response,
};
use chrono::Local;
use tracing::{error, info};

/// Resolve the optional portal username to a patient-role account id
async fn portal_account(
    server: &ClinicServer,
    username: Option<&str>,
) -> Result<Option<i64>, String> {
    let Some(username) = username else {
        return Ok(None);
    };
    match server.db.users.find_by_username(username).await {
        Ok(Some(user)) if user.role == Role::Patient => Ok(Some(user.id)),
        Ok(Some(_)) => Err(format!("{username} is not a patient account.")),
        Ok(None) => Err(format!("No account named {username}.")),
        Err(e) => {
            error!(error = %e, "Portal account lookup failed");
            Err("Could not look up the portal account.".to_string())
        }
    }
}

pub async fn add_form(DoctorContext(auth): DoctorContext, incoming: IncomingFlash) -> Response {
    let form = PatientForm {
        visit_date: Local::now().date_naive().format(DATE_FORMAT).to_string(),
        ..Default::default()
    };
    let page = FormPage {
        auth: &auth,
        flash: incoming.get(),
        title: "Add patient",
        action: paths::ADD_PATIENT,
        cancel: paths::INDEX,
    };
    flash::page(views::forms::patient_form(&page, &form), &incoming)
}

pub async fn add(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Form(form): Form<PatientForm>,
) -> Response {
    let mut input = match form.validate() {
        Ok(input) => input,
        Err(e) => return flash::redirect(paths::ADD_PATIENT, Flash::error(e.to_string())),
    };
    input.user_id = match portal_account(&server, form.portal_username()).await {
        Ok(user_id) => user_id,
        Err(message) => return flash::redirect(paths::ADD_PATIENT, Flash::error(message)),
    };

    match server.db.patients.create(&input).await {
        Ok(patient) => {
            info!(doctor_id = auth.user_id, patient_id = patient.id, "Patient added");
            flash::redirect(
                &paths::fill(paths::PATIENT, patient.id),
                Flash::success("Patient added successfully."),
            )
        }
        Err(e) => {
            error!(error = %e, "Failed to add patient");
            flash::redirect(
                paths::ADD_PATIENT,
                Flash::error("There was an issue adding the patient."),
            )
        }
    }
}

pub async fn edit_form(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    incoming: IncomingFlash,
) -> Result<Response, ApiError> {
    let patient = server
        .db
        .patients
        .find_by_id(id)
        .await?
        .or_not_found("Patient")?;

    let portal_username = match patient.user_id {
        Some(user_id) => server
            .db
            .users
            .find_by_id(user_id)
            .await?
            .map(|user| user.username),
        None => None,
    };

    let form = PatientForm::from_patient(&patient, portal_username);
    let action = paths::fill(paths::EDIT_PATIENT, id);
    let cancel = paths::fill(paths::PATIENT, id);
    let page = FormPage {
        auth: &auth,
        flash: incoming.get(),
        title: "Edit patient",
        action: &action,
        cancel: &cancel,
    };
    Ok(flash::page(views::forms::patient_form(&page, &form), &incoming))
}

pub async fn edit(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
    Form(form): Form<PatientForm>,
) -> Result<Response, ApiError> {
    server
        .db
        .patients
        .find_by_id(id)
        .await?
        .or_not_found("Patient")?;

    let edit_path = paths::fill(paths::EDIT_PATIENT, id);
    let dashboard = paths::fill(paths::PATIENT, id);

    let mut input = match form.validate() {
        Ok(input) => input,
        Err(e) => return Ok(flash::redirect(&edit_path, Flash::error(e.to_string()))),
    };
    input.user_id = match portal_account(&server, form.portal_username()).await {
        Ok(user_id) => user_id,
        Err(message) => return Ok(flash::redirect(&edit_path, Flash::error(message))),
    };

    match server.db.patients.update(id, &input).await {
        Ok(Some(_)) => {
            info!(doctor_id = auth.user_id, patient_id = id, "Patient updated");
            Ok(flash::redirect(&dashboard, Flash::success("Patient updated successfully.")))
        }
        Ok(None) => Err(ApiError::not_found("Patient")),
        Err(e) => {
            error!(patient_id = id, error = %e, "Failed to update patient");
            Ok(flash::redirect(
                &dashboard,
                Flash::error("There was an issue updating the patient."),
            ))
        }
    }
}

/// Delete a patient and every record that belongs to them
pub async fn delete(
    State(server): State<ClinicServer>,
    DoctorContext(auth): DoctorContext,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let patient = server
        .db
        .patients
        .find_by_id(id)
        .await?
        .or_not_found("Patient")?;

    match server.db.patients.delete_cascade(id).await {
        Ok(summary) => {
            info!(
                doctor_id = auth.user_id,
                patient_id = id,
                prescriptions = summary.prescriptions,
                appointments = summary.appointments,
                lab_orders = summary.lab_orders,
                "Patient deleted"
            );
            Ok(flash::redirect(
                paths::INDEX,
                Flash::success(format!("{} and all related records were deleted.", patient.name)),
            ))
        }
        Err(e) => {
            error!(patient_id = id, error = %e, "Failed to delete patient");
            Ok(flash::redirect(
                &paths::fill(paths::PATIENT, id),
                Flash::error("There was an issue deleting the patient."),
            ))
        }
    }
}
