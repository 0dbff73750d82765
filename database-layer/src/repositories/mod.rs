// Repository implementations
pub mod appointment_repository;
pub mod lab_order_repository;
pub mod patient_repository;
pub mod prescription_repository;
pub mod session_repository;
pub mod task_repository;
pub mod user_repository;

pub use appointment_repository::AppointmentRepository;
pub use lab_order_repository::LabOrderRepository;
pub use patient_repository::{CascadeSummary, PatientRepository};
pub use prescription_repository::PrescriptionRepository;
pub use session_repository::SqliteSessionRepository;
pub use task_repository::TaskRepository;
pub use user_repository::SqliteUserRepository;
