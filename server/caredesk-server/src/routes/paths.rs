//! Route path constants
//!
//! Patterns are used for router registration; [`fill`] turns a pattern with a
//! single `:param` segment into a concrete link.

pub const INDEX: &str = "/";
pub const HEALTH: &str = "/health";

pub const LOGIN: &str = "/login";
pub const SIGNUP: &str = "/signup";
pub const LOGOUT: &str = "/logout";

pub const PATIENT: &str = "/patient/:id";
pub const PATIENT_DASHBOARD: &str = "/patient_dashboard";
pub const ADD_PATIENT: &str = "/add";
pub const EDIT_PATIENT: &str = "/edit_patient/:id";
pub const DELETE_PATIENT: &str = "/delete_patient/:id";

pub const ADD_PRESCRIPTION: &str = "/add_prescription/:patient_id";
pub const EDIT_PRESCRIPTION: &str = "/edit_prescription/:id";
pub const DELETE_PRESCRIPTION: &str = "/delete_prescription/:id";

pub const ADD_APPOINTMENT: &str = "/add_appointment/:patient_id";
pub const EDIT_APPOINTMENT: &str = "/edit_appointment/:id";
pub const DELETE_APPOINTMENT: &str = "/delete_appointment/:id";

pub const ADD_LAB_ORDER: &str = "/add_lab_order/:patient_id";
pub const EDIT_LAB_ORDER: &str = "/edit_lab_order/:id";
pub const DELETE_LAB_ORDER: &str = "/delete_lab_order/:id";
pub const PENDING_LABS: &str = "/pending_labs";

pub const TASKS: &str = "/tasks";
pub const UPDATE_TASK: &str = "/tasks/update/:id";
pub const DELETE_TASK: &str = "/tasks/delete/:id";

/// Substitute `id` for the `:param` segment of `pattern`
pub fn fill(pattern: &str, id: i64) -> String {
    pattern
        .split('/')
        .map(|segment| {
            if segment.starts_with(':') {
                id.to_string()
            } else {
                segment.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Doctor dashboard of one patient showing a given month
pub fn patient_month(id: i64, year: i32, month: u32) -> String {
    format!("{}?year={year}&month={month}", fill(PATIENT, id))
}
