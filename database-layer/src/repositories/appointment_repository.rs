//! Telehealth appointment repository

use crate::connection::DatabasePool;
use crate::error::DatabaseResult;
use crate::models::{AppointmentInput, TelehealthAppointment};
use tracing::info;

const APPOINTMENT_COLUMNS: &str = "id, patient_id, scheduled_at, provider, status";

#[derive(Clone)]
pub struct AppointmentRepository {
    pool: DatabasePool,
}

impl AppointmentRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        patient_id: i64,
        input: &AppointmentInput,
    ) -> DatabaseResult<TelehealthAppointment> {
        let appointment = sqlx::query_as::<_, TelehealthAppointment>(&format!(
            "INSERT INTO telehealth_appointments (patient_id, scheduled_at, provider, status) \
             VALUES (?, ?, ?, ?) RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(patient_id)
        .bind(input.scheduled_at)
        .bind(&input.provider)
        .bind(&input.status)
        .fetch_one(self.pool.pool())
        .await?;

        info!(patient_id, appointment_id = appointment.id, "Appointment scheduled");
        Ok(appointment)
    }

    pub async fn find_by_id(&self, id: i64) -> DatabaseResult<Option<TelehealthAppointment>> {
        let appointment = sqlx::query_as::<_, TelehealthAppointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM telehealth_appointments WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(appointment)
    }

    /// Appointments of one patient, earliest first
    pub async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> DatabaseResult<Vec<TelehealthAppointment>> {
        let appointments = sqlx::query_as::<_, TelehealthAppointment>(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM telehealth_appointments \
             WHERE patient_id = ? ORDER BY scheduled_at, id"
        ))
        .bind(patient_id)
        .fetch_all(self.pool.pool())
        .await?;
        Ok(appointments)
    }

    pub async fn update(
        &self,
        id: i64,
        input: &AppointmentInput,
    ) -> DatabaseResult<Option<TelehealthAppointment>> {
        let appointment = sqlx::query_as::<_, TelehealthAppointment>(&format!(
            "UPDATE telehealth_appointments SET scheduled_at = ?, provider = ?, status = ? \
             WHERE id = ? RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(input.scheduled_at)
        .bind(&input.provider)
        .bind(&input.status)
        .bind(id)
        .fetch_optional(self.pool.pool())
        .await?;
        Ok(appointment)
    }

    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM telehealth_appointments WHERE id = ?")
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
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn visit(scheduled_at: NaiveDateTime) -> AppointmentInput {
        AppointmentInput {
            scheduled_at,
            provider: "Dr. Quinn".into(),
            status: "Scheduled".into(),
        }
    }

    #[tokio::test]
    async fn test_appointments_are_listed_chronologically() {
        let db = Database::in_memory().await.unwrap();
        let patient_id = db
            .patients
            .create(&PatientInput {
                name: "Tele Patient".into(),
                age: 51,
                gender: "Other".into(),
                visit_date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                user_id: None,
            })
            .await
            .unwrap()
            .id;

        let late = db.appointments.create(patient_id, &visit(at(20, 15))).await.unwrap();
        let early = db.appointments.create(patient_id, &visit(at(3, 9))).await.unwrap();

        let listed = db.appointments.list_for_patient(patient_id).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![early.id, late.id]);
        assert_eq!(listed[0].scheduled_at, at(3, 9));

        let mut done = visit(at(3, 10));
        done.status = "Completed".into();
        let updated = db.appointments.update(early.id, &done).await.unwrap().unwrap();
        assert_eq!(updated.status, "Completed");
        assert_eq!(updated.scheduled_at, at(3, 10));

        assert!(db.appointments.delete(late.id).await.unwrap());
        assert!(db.appointments.find_by_id(late.id).await.unwrap().is_none());
        let remaining = db.appointments.list_for_patient(patient_id).await.unwrap();
        assert_eq!(remaining, vec![updated]);
        assert!(db.patients.find_by_id(patient_id).await.unwrap().is_some());
    }
}
