//! Patient repository
//!
//! Deleting a patient is an explicit cascade: prescriptions, telehealth
//! appointments and lab orders of that patient are removed in the same
//! transaction as the patient row.

use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use crate::models::{Patient, PatientInput};
use crate::transaction::TransactionManager;
use tracing::info;

const PATIENT_COLUMNS: &str = "id, name, age, gender, visit_date, user_id";

#[derive(Clone)]
pub struct PatientRepository {
    pool: DatabasePool,
}

/// Row counts removed by [`PatientRepository::delete_cascade`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub patient_deleted: bool,
    pub prescriptions: u64,
    pub appointments: u64,
    pub lab_orders: u64,
}

impl PatientRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: &PatientInput) -> DatabaseResult<Patient> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "INSERT INTO patients (name, age, gender, visit_date, user_id) \
             VALUES (?, ?, ?, ?, ?) RETURNING {PATIENT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(input.visit_date)
        .bind(input.user_id)
        .fetch_one(self.pool.pool())
        .await?;

        info!(patient_id = patient.id, "Patient created");
        Ok(patient)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(patient)
    }

    /// The patient record linked to a portal account, if any
    pub async fn find_by_user_id(&self, user_id: i64) -> DatabaseResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients WHERE user_id = ? ORDER BY id LIMIT 1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(patient)
    }

    pub async fn list(&self) -> DatabaseResult<Vec<Patient>> {
        let patients = sqlx::query_as::<_, Patient>(&format!(
            "SELECT {PATIENT_COLUMNS} FROM patients ORDER BY id"
        ))
        .fetch_all(self.pool.pool())
        .await?;
        Ok(patients)
    }

    pub async fn update(&self, id: i64, input: &PatientInput) -> DatabaseResult<Option<Patient>> {
        let patient = sqlx::query_as::<_, Patient>(&format!(
            "UPDATE patients SET name = ?, age = ?, gender = ?, visit_date = ?, user_id = ? \
             WHERE id = ? RETURNING {PATIENT_COLUMNS}"
        ))
        .bind(&input.name)
        .bind(input.age)
        .bind(&input.gender)
        .bind(input.visit_date)
        .bind(input.user_id)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(patient)
    }

    /// Delete a patient together with every record it owns
    pub async fn delete_cascade(&self, id: i64) -> DatabaseResult<CascadeSummary> {
        let mut tx = TransactionManager::new(self.pool.clone())
            .with_label("delete_patient")
            .begin()
            .await?;

        let prescriptions = sqlx::query("DELETE FROM prescriptions WHERE patient_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let appointments = sqlx::query("DELETE FROM telehealth_appointments WHERE patient_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let lab_orders = sqlx::query("DELETE FROM lab_orders WHERE patient_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let patients = sqlx::query("DELETE FROM patients WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;

        let summary = CascadeSummary {
            patient_deleted: patients > 0,
            prescriptions,
            appointments,
            lab_orders,
        };
        info!(
            patient_id = id,
            deleted = summary.patient_deleted,
            prescriptions,
            appointments,
            lab_orders,
            "Patient deleted with dependent records"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentInput, LabOrderInput, PrescriptionInput};
    use crate::Database;
    use chrono::NaiveDate;

    fn input(name: &str) -> PatientInput {
        PatientInput {
            name: name.to_string(),
            age: 42,
            gender: "Female".to_string(),
            visit_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            user_id: None,
        }
    }

    async fn with_records(db: &Database, name: &str) -> i64 {
        let patient = db.patients.create(&input(name)).await.unwrap();
        db.prescriptions
            .create(
                patient.id,
                &PrescriptionInput {
                    medication: "Amoxicillin".into(),
                    dosage: "500mg".into(),
                    instructions: "Twice daily".into(),
                },
            )
            .await
            .unwrap();
        db.appointments
            .create(
                patient.id,
                &AppointmentInput {
                    scheduled_at: NaiveDate::from_ymd_opt(2024, 3, 1)
                        .unwrap()
                        .and_hms_opt(9, 30, 0)
                        .unwrap(),
                    provider: "Dr. Grey".into(),
                    status: "Scheduled".into(),
                },
            )
            .await
            .unwrap();
        db.lab_orders
            .create(
                patient.id,
                &LabOrderInput {
                    order_type: "CBC".into(),
                    ordered_by: "Dr. Grey".into(),
                    status: "Needs Submission".into(),
                },
            )
            .await
            .unwrap();
        patient.id
    }

    #[tokio::test]
    async fn test_create_find_update_patient() {
        let db = Database::in_memory().await.unwrap();
        let patient = db.patients.create(&input("Ada")).await.unwrap();
        assert_eq!(patient.visit_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let mut changed = input("Ada Lovelace");
        changed.age = 36;
        let updated = db.patients.update(patient.id, &changed).await.unwrap().unwrap();
        assert_eq!(updated.name, "Ada Lovelace");
        assert_eq!(updated.age, 36);

        assert!(db.patients.update(9999, &changed).await.unwrap().is_none());
        assert!(db.patients.find_by_id(9999).await.unwrap().is_none());
        assert_eq!(db.patients.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_cascade_only_touches_own_records() {
        let db = Database::in_memory().await.unwrap();
        let doomed = with_records(&db, "Doomed").await;
        let survivor = with_records(&db, "Survivor").await;

        let summary = db.patients.delete_cascade(doomed).await.unwrap();
        assert_eq!(
            summary,
            CascadeSummary {
                patient_deleted: true,
                prescriptions: 1,
                appointments: 1,
                lab_orders: 1,
            }
        );

        assert!(db.patients.find_by_id(doomed).await.unwrap().is_none());
        let gone = db.patient_records(doomed).await.unwrap();
        assert!(gone.is_empty());

        let kept = db.patient_records(survivor).await.unwrap();
        assert_eq!(kept.prescriptions.len(), 1);
        assert_eq!(kept.appointments.len(), 1);
        assert_eq!(kept.lab_orders.len(), 1);
    }

    #[tokio::test]
    async fn test_deleting_one_record_leaves_the_rest() {
        let db = Database::in_memory().await.unwrap();
        let owner = with_records(&db, "Owner").await;
        let neighbour = with_records(&db, "Neighbour").await;
        let before_neighbour = db.patient_records(neighbour).await.unwrap();

        let extra_rx = db
            .prescriptions
            .create(
                owner,
                &PrescriptionInput {
                    medication: "Statin".into(),
                    dosage: "20mg".into(),
                    instructions: "Nightly".into(),
                },
            )
            .await
            .unwrap();

        let records = db.patient_records(owner).await.unwrap();
        assert!(db.prescriptions.delete(records.prescriptions[0].id).await.unwrap());
        assert!(db.appointments.delete(records.appointments[0].id).await.unwrap());

        let after = db.patient_records(owner).await.unwrap();
        assert_eq!(after.prescriptions, vec![extra_rx]);
        assert!(after.appointments.is_empty());
        assert_eq!(after.lab_orders, records.lab_orders);

        assert!(db.lab_orders.delete(records.lab_orders[0].id).await.unwrap());
        assert!(db.patient_records(owner).await.unwrap().lab_orders.is_empty());

        assert!(db.patients.find_by_id(owner).await.unwrap().is_some());
        let neighbour_records = db.patient_records(neighbour).await.unwrap();
        assert_eq!(neighbour_records.prescriptions, before_neighbour.prescriptions);
        assert_eq!(neighbour_records.appointments, before_neighbour.appointments);
        assert_eq!(neighbour_records.lab_orders, before_neighbour.lab_orders);
    }

    #[tokio::test]
    async fn test_delete_cascade_of_unknown_patient_reports_nothing_deleted() {
        let db = Database::in_memory().await.unwrap();
        let summary = db.patients.delete_cascade(12345).await.unwrap();
        assert_eq!(summary, CascadeSummary::default());
    }

    #[tokio::test]
    async fn test_records_require_live_patient() {
        let db = Database::in_memory().await.unwrap();
        let err = db
            .prescriptions
            .create(
                777,
                &PrescriptionInput {
                    medication: "Ibuprofen".into(),
                    dosage: "200mg".into(),
                    instructions: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, crate::DatabaseError::ConstraintViolation(_)));
    }
}
