pub mod connection;
pub mod error;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod transaction;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use repositories::*;
pub use transaction::*;

/// Clinic persistence layer
///
/// All records live in a single SQLite store reached through a shared
/// connection pool. Each table has its own repository, and [`Database`] bundles
/// them so request handlers can reach everything through one cheap-to-clone
/// value.
///
/// # Key Features
///
/// - **Idempotent schema**: tables are created on startup when missing
/// - **Identity storage**: implements the account and session repositories
///   declared by `auth-identity`
/// - **Explicit cascade**: deleting a patient removes its prescriptions,
///   telehealth appointments and lab orders in one transaction
/// - **Pending labs**: cross-patient query for orders awaiting submission
///
/// # Example Usage
///
/// ```rust,no_run
/// use database_layer::{Database, PatientInput};
/// use chrono::NaiveDate;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::connect("sqlite://caredesk.db?mode=rwc", 5).await?;
///
/// let patient = db
///     .patients
///     .create(&PatientInput {
///         name: "Jane Doe".into(),
///         age: 34,
///         gender: "Female".into(),
///         visit_date: NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
///         user_id: None,
///     })
///     .await?;
///
/// let records = db.patient_records(patient.id).await?;
/// assert!(records.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Database {
    pool: DatabasePool,
    pub users: SqliteUserRepository,
    pub sessions: SqliteSessionRepository,
    pub patients: PatientRepository,
    pub prescriptions: PrescriptionRepository,
    pub appointments: AppointmentRepository,
    pub lab_orders: LabOrderRepository,
    pub tasks: TaskRepository,
}

impl Database {
    /// Open the store at `url` and bring its schema up to date
    pub async fn connect(url: &str, max_connections: u32) -> DatabaseResult<Self> {
        let pool = DatabasePool::new(url, max_connections).await?;
        pool.migrate().await?;
        Ok(Self::from_pool(pool))
    }

    /// Fresh, migrated in-memory store
    pub async fn in_memory() -> DatabaseResult<Self> {
        let pool = DatabasePool::in_memory().await?;
        pool.migrate().await?;
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: DatabasePool) -> Self {
        Self {
            users: SqliteUserRepository::new(pool.clone()),
            sessions: SqliteSessionRepository::new(pool.clone()),
            patients: PatientRepository::new(pool.clone()),
            prescriptions: PrescriptionRepository::new(pool.clone()),
            appointments: AppointmentRepository::new(pool.clone()),
            lab_orders: LabOrderRepository::new(pool.clone()),
            tasks: TaskRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Prescriptions, appointments and lab orders belonging to one patient
    pub async fn patient_records(&self, patient_id: i64) -> DatabaseResult<PatientRecords> {
        Ok(PatientRecords {
            prescriptions: self.prescriptions.list_for_patient(patient_id).await?,
            appointments: self.appointments.list_for_patient(patient_id).await?,
            lab_orders: self.lab_orders.list_for_patient(patient_id).await?,
        })
    }
}
