//! Prescription repository

use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use crate::models::{Prescription, PrescriptionInput};
use tracing::info;

const PRESCRIPTION_COLUMNS: &str = "id, patient_id, medication, dosage, instructions";

#[derive(Clone)]
pub struct PrescriptionRepository {
    pool: DatabasePool,
}

impl PrescriptionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        patient_id: i64,
        input: &PrescriptionInput,
    ) -> DatabaseResult<Prescription> {
        let prescription = sqlx::query_as::<_, Prescription>(&format!(
            "INSERT INTO prescriptions (patient_id, medication, dosage, instructions) \
             VALUES (?, ?, ?, ?) RETURNING {PRESCRIPTION_COLUMNS}"
        ))
        .bind(patient_id)
        .bind(&input.medication)
        .bind(&input.dosage)
        .bind(&input.instructions)
        .fetch_one(self.pool.pool())
        .await?;

        info!(patient_id, prescription_id = prescription.id, "Prescription added");
        Ok(prescription)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<Prescription>> {
        let prescription = sqlx::query_as::<_, Prescription>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(prescription)
    }

    pub async fn list_for_patient(&self, patient_id: i64) -> DatabaseResult<Vec<Prescription>> {
        let prescriptions = sqlx::query_as::<_, Prescription>(&format!(
            "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE patient_id = ? ORDER BY id"
        ))
        .bind(patient_id)
        .fetch_all(self.pool.pool())
        .await?;
        Ok(prescriptions)
    }

    /// Overwrite the editable fields; the owning patient never changes
    pub async fn update(
        &self,
        id: i64,
        input: &PrescriptionInput,
    ) -> DatabaseResult<Option<Prescription>> {
        let prescription = sqlx::query_as::<_, Prescription>(&format!(
            "UPDATE prescriptions SET medication = ?, dosage = ?, instructions = ? \
             WHERE id = ? RETURNING {PRESCRIPTION_COLUMNS}"
        ))
        .bind(&input.medication)
        .bind(&input.dosage)
        .bind(&input.instructions)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(prescription)
    }

    /// Returns whether a row was removed
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM prescriptions WHERE id = ?")
            .bind(id)
            .execute(self.pool.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PatientInput;
    use crate::Database;
    use chrono::NaiveDate;

    async fn patient(db: &Database) -> i64 {
        db.patients
            .create(&PatientInput {
                name: "Rx Patient".into(),
                age: 30,
                gender: "Male".into(),
                visit_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                user_id: None,
            })
            .await
            .unwrap()
            .id
    }

    fn rx(medication: &str) -> PrescriptionInput {
        PrescriptionInput {
            medication: medication.into(),
            dosage: "10mg".into(),
            instructions: "With food".into(),
        }
    }

    #[tokio::test]
    async fn test_prescription_lifecycle() {
        let db = Database::in_memory().await.unwrap();
        let patient_id = patient(&db).await;

        let created = db.prescriptions.create(patient_id, &rx("Lisinopril")).await.unwrap();
        let sibling = db.prescriptions.create(patient_id, &rx("Metformin")).await.unwrap();

        let listed = db.prescriptions.list_for_patient(patient_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].medication, "Lisinopril");

        let updated = db
            .prescriptions
            .update(created.id, &rx("Losartan"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.medication, "Losartan");
        assert_eq!(updated.patient_id, patient_id);

        assert!(db.prescriptions.delete(created.id).await.unwrap());
        assert!(!db.prescriptions.delete(created.id).await.unwrap());
        assert!(db.prescriptions.find_by_id(created.id).await.unwrap().is_none());
        assert!(db.prescriptions.update(created.id, &rx("x")).await.unwrap().is_none());

        let remaining = db.prescriptions.list_for_patient(patient_id).await.unwrap();
        assert_eq!(remaining, vec![sibling]);
        assert!(db.patients.find_by_id(patient_id).await.unwrap().is_some());
    }
}
