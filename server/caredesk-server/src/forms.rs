//! Form payloads and their validation
//!
//! Every field arrives as a string (missing fields default to empty) so that a
//! malformed submission becomes a flash message on the form rather than an
//! extractor rejection.

use chrono::{NaiveDate, NaiveDateTime};
use database_layer::{
    AppointmentInput, LabOrder, LabOrderInput, Patient, PatientInput, Prescription,
    PrescriptionInput, Task, TaskInput, TelehealthAppointment,
};
use serde::Deserialize;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Value format of an `<input type="datetime-local">`
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Turn a raw form into the typed input it describes
pub trait FormValidation {
    type Output;

    fn validate(&self) -> Result<Self::Output, ValidationError>;
}

fn required(value: &str, label: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError(format!("{label} is required.")));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Checkbox; present only when ticked
    pub remember: Option<String>,
}

impl LoginForm {
    pub fn remember(&self) -> bool {
        self.remember.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PatientForm {
    pub name: String,
    pub age: String,
    pub gender: String,
    pub visit_date: String,
    /// Username of a patient-role account to link, or empty
    pub portal_username: String,
}

impl PatientForm {
    pub fn from_patient(patient: &Patient, portal_username: Option<String>) -> Self {
        Self {
            name: patient.name.clone(),
            age: patient.age.to_string(),
            gender: patient.gender.clone(),
            visit_date: patient.visit_date.format(DATE_FORMAT).to_string(),
            portal_username: portal_username.unwrap_or_default(),
        }
    }

    pub fn portal_username(&self) -> Option<&str> {
        Some(self.portal_username.trim()).filter(|u| !u.is_empty())
    }
}

impl FormValidation for PatientForm {
    /// The portal link is resolved separately, so `user_id` is always `None` here
    type Output = PatientInput;

    fn validate(&self) -> Result<PatientInput, ValidationError> {
        let name = required(&self.name, "Name")?;
        let age = self
            .age
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|age| (0..=150).contains(age))
            .ok_or_else(|| ValidationError("Age must be a whole number.".to_string()))?;
        let gender = required(&self.gender, "Gender")?;
        let visit_date = NaiveDate::parse_from_str(self.visit_date.trim(), DATE_FORMAT)
            .map_err(|_| ValidationError("Visit date must be in YYYY-MM-DD format.".to_string()))?;

        Ok(PatientInput {
            name,
            age,
            gender,
            visit_date,
            user_id: None,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrescriptionForm {
    pub medication: String,
    pub dosage: String,
    pub instructions: String,
}

impl From<&Prescription> for PrescriptionForm {
    fn from(p: &Prescription) -> Self {
        Self {
            medication: p.medication.clone(),
            dosage: p.dosage.clone(),
            instructions: p.instructions.clone(),
        }
    }
}

impl FormValidation for PrescriptionForm {
    type Output = PrescriptionInput;

    fn validate(&self) -> Result<PrescriptionInput, ValidationError> {
        Ok(PrescriptionInput {
            medication: required(&self.medication, "Medication")?,
            dosage: required(&self.dosage, "Dosage")?,
            instructions: self.instructions.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppointmentForm {
    pub scheduled_at: String,
    pub provider: String,
    pub status: String,
}

impl From<&TelehealthAppointment> for AppointmentForm {
    fn from(a: &TelehealthAppointment) -> Self {
        Self {
            scheduled_at: a.scheduled_at.format(DATETIME_FORMAT).to_string(),
            provider: a.provider.clone(),
            status: a.status.clone(),
        }
    }
}

impl FormValidation for AppointmentForm {
    type Output = AppointmentInput;

    fn validate(&self) -> Result<AppointmentInput, ValidationError> {
        let scheduled_at = NaiveDateTime::parse_from_str(self.scheduled_at.trim(), DATETIME_FORMAT)
            .map_err(|_| {
                ValidationError("Scheduled time must be in YYYY-MM-DDTHH:MM format.".to_string())
            })?;

        Ok(AppointmentInput {
            scheduled_at,
            provider: required(&self.provider, "Provider")?,
            status: required(&self.status, "Status")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabOrderForm {
    pub order_type: String,
    pub ordered_by: String,
    pub status: String,
}

impl From<&LabOrder> for LabOrderForm {
    fn from(l: &LabOrder) -> Self {
        Self {
            order_type: l.order_type.clone(),
            ordered_by: l.ordered_by.clone(),
            status: l.status.clone(),
        }
    }
}

impl FormValidation for LabOrderForm {
    type Output = LabOrderInput;

    fn validate(&self) -> Result<LabOrderInput, ValidationError> {
        Ok(LabOrderInput {
            order_type: required(&self.order_type, "Order type")?,
            ordered_by: required(&self.ordered_by, "Ordering clinician")?,
            status: required(&self.status, "Status")?,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskForm {
    pub content: String,
    /// Checkbox; present only when ticked
    pub completed: Option<String>,
}

impl From<&Task> for TaskForm {
    fn from(t: &Task) -> Self {
        Self {
            content: t.content.clone(),
            completed: t.completed.then(|| "on".to_string()),
        }
    }
}

impl FormValidation for TaskForm {
    type Output = TaskInput;

    fn validate(&self) -> Result<TaskInput, ValidationError> {
        Ok(TaskInput {
            content: required(&self.content, "Task")?,
            completed: self.completed.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient_form(age: &str, visit_date: &str) -> PatientForm {
        PatientForm {
            name: " Grace Hopper ".into(),
            age: age.into(),
            gender: "Female".into(),
            visit_date: visit_date.into(),
            portal_username: String::new(),
        }
    }

    #[test]
    fn test_patient_form_parses_age_and_date() {
        let input = patient_form("85", "2024-02-29").validate().unwrap();
        assert_eq!(input.name, "Grace Hopper");
        assert_eq!(input.age, 85);
        assert_eq!(input.visit_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_patient_form_rejects_bad_casts() {
        assert_eq!(
            patient_form("eighty", "2024-02-29").validate().unwrap_err().to_string(),
            "Age must be a whole number."
        );
        assert!(patient_form("-1", "2024-02-29").validate().is_err());
        assert!(patient_form("40", "2023-02-29").validate().is_err());
        assert!(patient_form("40", "29/02/2024").validate().is_err());
    }

    #[test]
    fn test_required_fields() {
        let err = PrescriptionForm {
            medication: "   ".into(),
            dosage: "5mg".into(),
            instructions: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.0, "Medication is required.");
    }

    #[test]
    fn test_appointment_datetime_local_format() {
        let form = AppointmentForm {
            scheduled_at: "2024-03-01T09:30".into(),
            provider: "Dr. Who".into(),
            status: "Scheduled".into(),
        };
        let input = form.validate().unwrap();
        assert_eq!(AppointmentForm::from(&TelehealthAppointment {
            id: 1,
            patient_id: 1,
            scheduled_at: input.scheduled_at,
            provider: input.provider,
            status: input.status,
        })
        .scheduled_at, "2024-03-01T09:30");
    }

    #[test]
    fn test_checkboxes() {
        let task = TaskForm { content: "Sweep".into(), completed: None }.validate().unwrap();
        assert!(!task.completed);
        let task = TaskForm { content: "Sweep".into(), completed: Some("on".into()) }
            .validate()
            .unwrap();
        assert!(task.completed);
        assert!(LoginForm { remember: Some("on".into()), ..Default::default() }.remember());
    }
}
