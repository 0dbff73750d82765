// Clinic record models
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Lab order status that puts an order on the pending-labs list
pub const LAB_STATUS_NEEDS_SUBMISSION: &str = "Needs Submission";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub visit_date: NaiveDate,
    /// Portal account of the patient, when they have one
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub age: i64,
    pub gender: String,
    pub visit_date: NaiveDate,
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Prescription {
    pub id: i64,
    pub patient_id: i64,
    pub medication: String,
    pub dosage: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionInput {
    pub medication: String,
    pub dosage: String,
    pub instructions: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct TelehealthAppointment {
    pub id: i64,
    pub patient_id: i64,
    pub scheduled_at: NaiveDateTime,
    pub provider: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentInput {
    pub scheduled_at: NaiveDateTime,
    pub provider: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LabOrder {
    pub id: i64,
    pub patient_id: i64,
    pub order_type: String,
    pub ordered_by: String,
    pub status: String,
}

impl LabOrder {
    pub fn needs_submission(&self) -> bool {
        self.status == LAB_STATUS_NEEDS_SUBMISSION
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabOrderInput {
    pub order_type: String,
    pub ordered_by: String,
    pub status: String,
}

/// Lab order awaiting submission, joined with the name of its patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PendingLabOrder {
    pub id: i64,
    pub patient_id: i64,
    pub patient_name: String,
    pub order_type: String,
    pub ordered_by: String,
    pub status: String,
}

/// Clinic to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInput {
    pub content: String,
    pub completed: bool,
}

/// Everything a patient owns, as shown on a dashboard
#[derive(Debug, Clone, Default, Serialize)]
pub struct PatientRecords {
    pub prescriptions: Vec<Prescription>,
    pub appointments: Vec<TelehealthAppointment>,
    pub lab_orders: Vec<LabOrder>,
}

impl PatientRecords {
    pub fn is_empty(&self) -> bool {
        self.prescriptions.is_empty() && self.appointments.is_empty() && self.lab_orders.is_empty()
    }
}
