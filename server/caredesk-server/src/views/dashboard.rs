use super::{delete_button, escape, layout};
use crate::calendar::{DayCell, MonthGrid};
use crate::flash::Flash;
use crate::forms::DATE_FORMAT;
use crate::middleware::AuthContext;
use crate::routes::paths;
use chrono::Datelike;
use database_layer::{Patient, PatientRecords, PendingLabOrder};

/// Everything a dashboard page shows
pub struct DashboardView<'a> {
    pub auth: &'a AuthContext,
    pub flash: Option<&'a Flash>,
    /// Patient list for the sidebar; empty on the patient portal
    pub patients: &'a [Patient],
    pub selected: Option<&'a Patient>,
    pub records: &'a PatientRecords,
    pub pending_labs: &'a [PendingLabOrder],
    pub grid: &'a MonthGrid,
}

impl DashboardView<'_> {
    fn editable(&self) -> bool {
        self.auth.is_doctor()
    }

    fn month_link(&self, (year, month): (i32, u32)) -> Option<String> {
        if self.editable() {
            self.selected.map(|p| paths::patient_month(p.id, year, month))
        } else {
            Some(format!("{}?year={year}&month={month}", paths::PATIENT_DASHBOARD))
        }
    }
}

pub fn dashboard_page(view: &DashboardView<'_>) -> String {
    let main = match view.selected {
        Some(patient) => format!(
            "{}{}{}{}",
            patient_summary(view, patient),
            prescriptions(view, patient),
            appointments(view, patient),
            lab_orders(view, patient)
        ),
        None if view.editable() => format!(
            r#"<section><h1>No patients yet</h1><p><a href="{}">Add the first patient</a></p></section>"#,
            paths::ADD_PATIENT
        ),
        None => "<section><h1>No record linked</h1><p>Your account is not linked to a patient record yet. Please contact the clinic.</p></section>".to_string(),
    };

    let sidebar = if view.editable() {
        format!(
            r#"<aside class="sidebar">{}{}</aside>"#,
            patient_list(view),
            pending_summary(view.pending_labs)
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<div class="layout">{sidebar}<div class="content">{main}{calendar}</div></div>"#,
        calendar = calendar(view),
    );

    let title = view
        .selected
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Dashboard".to_string());
    layout(&title, Some(view.auth), view.flash, &body)
}

fn patient_list(view: &DashboardView<'_>) -> String {
    let items: String = view
        .patients
        .iter()
        .map(|p| {
            let active = view.selected.is_some_and(|s| s.id == p.id);
            format!(
                r#"<li><a href="{}"{}>{}</a></li>"#,
                paths::fill(paths::PATIENT, p.id),
                if active { r#" class="active""# } else { "" },
                escape(&p.name)
            )
        })
        .collect();
    format!("<section><h2>Patients</h2><ul>{items}</ul></section>")
}

fn pending_summary(pending: &[PendingLabOrder]) -> String {
    format!(
        r#"<section><h2>Pending labs</h2><p>{} order(s) need submission.</p><p><a href="{}">View all</a></p></section>"#,
        pending.len(),
        paths::PENDING_LABS
    )
}

fn patient_summary(view: &DashboardView<'_>, patient: &Patient) -> String {
    let actions = if view.editable() {
        format!(
            r#"<p><a href="{}">Edit</a> {}</p>"#,
            paths::fill(paths::EDIT_PATIENT, patient.id),
            delete_button(
                &paths::fill(paths::DELETE_PATIENT, patient.id),
                "Delete patient",
                "Delete this patient and all of their records?"
            )
        )
    } else {
        String::new()
    };
    format!(
        r#"<section>
            <h1>{name}</h1>
            <p>Age: {age} &middot; Gender: {gender} &middot; Visit date: {visit}</p>
            {actions}
        </section>"#,
        name = escape(&patient.name),
        age = patient.age,
        gender = escape(&patient.gender),
        visit = patient.visit_date.format(DATE_FORMAT),
    )
}

/// Table section with an optional "add" link and per-row edit/delete actions
fn record_table(
    view: &DashboardView<'_>,
    heading: &str,
    add_link: String,
    columns: &[&str],
    rows: Vec<(Vec<String>, String, String)>,
) -> String {
    let editable = view.editable();
    let header: String = columns.iter().map(|c| format!("<th>{c}</th>")).collect();
    let body: String = if rows.is_empty() {
        format!(r#"<tr><td colspan="{}">None on file.</td></tr>"#, columns.len() + 1)
    } else {
        rows.into_iter()
            .map(|(cells, edit, delete)| {
                let cells: String = cells.iter().map(|c| format!("<td>{}</td>", escape(c))).collect();
                let actions = if editable {
                    format!(
                        r#"<td><a href="{edit}">Edit</a> {}</td>"#,
                        delete_button(&delete, "Delete", "Delete this record?")
                    )
                } else {
                    "<td></td>".to_string()
                };
                format!("<tr>{cells}{actions}</tr>")
            })
            .collect()
    };
    let add = if editable {
        format!(r#"<a href="{add_link}">Add</a>"#)
    } else {
        String::new()
    };
    format!(
        r#"<section><h2>{heading} {add}</h2><table><tr>{header}<th></th></tr>{body}</table></section>"#
    )
}

fn prescriptions(view: &DashboardView<'_>, patient: &Patient) -> String {
    let rows = view
        .records
        .prescriptions
        .iter()
        .map(|p| {
            (
                vec![p.medication.clone(), p.dosage.clone(), p.instructions.clone()],
                paths::fill(paths::EDIT_PRESCRIPTION, p.id),
                paths::fill(paths::DELETE_PRESCRIPTION, p.id),
            )
        })
        .collect();
    record_table(
        view,
        "Prescriptions",
        paths::fill(paths::ADD_PRESCRIPTION, patient.id),
        &["Medication", "Dosage", "Instructions"],
        rows,
    )
}

fn appointments(view: &DashboardView<'_>, patient: &Patient) -> String {
    let rows = view
        .records
        .appointments
        .iter()
        .map(|a| {
            (
                vec![
                    a.scheduled_at.format("%Y-%m-%d %H:%M").to_string(),
                    a.provider.clone(),
                    a.status.clone(),
                ],
                paths::fill(paths::EDIT_APPOINTMENT, a.id),
                paths::fill(paths::DELETE_APPOINTMENT, a.id),
            )
        })
        .collect();
    record_table(
        view,
        "Telehealth appointments",
        paths::fill(paths::ADD_APPOINTMENT, patient.id),
        &["Scheduled", "Provider", "Status"],
        rows,
    )
}

fn lab_orders(view: &DashboardView<'_>, patient: &Patient) -> String {
    let rows = view
        .records
        .lab_orders
        .iter()
        .map(|l| {
            (
                vec![l.order_type.clone(), l.ordered_by.clone(), l.status.clone()],
                paths::fill(paths::EDIT_LAB_ORDER, l.id),
                paths::fill(paths::DELETE_LAB_ORDER, l.id),
            )
        })
        .collect();
    record_table(
        view,
        "Lab orders",
        paths::fill(paths::ADD_LAB_ORDER, patient.id),
        &["Order type", "Ordered by", "Status"],
        rows,
    )
}

fn calendar(view: &DashboardView<'_>) -> String {
    let grid = view.grid;
    let booked: Vec<u32> = view
        .records
        .appointments
        .iter()
        .map(|a| a.scheduled_at.date())
        .filter(|d| d.year() == grid.year && d.month() == grid.month)
        .map(|d| d.day())
        .collect();

    let weeks: String = grid
        .weeks()
        .map(|week| {
            let cells: String = week
                .iter()
                .map(|cell| match cell {
                    DayCell::Empty => "<td></td>".to_string(),
                    DayCell::Day { day, is_today } => {
                        let mut classes = Vec::new();
                        if *is_today {
                            classes.push("today");
                        }
                        if booked.contains(day) {
                            classes.push("booked");
                        }
                        format!(r#"<td><span class="{}">{day}</span></td>"#, classes.join(" "))
                    }
                })
                .collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();

    let nav = match (view.month_link(grid.previous()), view.month_link(grid.next())) {
        (Some(prev), Some(next)) => format!(
            r#"<a href="{}">&laquo; Prev</a> <a href="{}">Next &raquo;</a>"#,
            escape(&prev),
            escape(&next)
        ),
        _ => String::new(),
    };

    format!(
        r#"<section class="calendar">
            <h2>{title}</h2>
            <p>{nav}</p>
            <table>
                <tr><th>Sun</th><th>Mon</th><th>Tue</th><th>Wed</th><th>Thu</th><th>Fri</th><th>Sat</th></tr>
                {weeks}
            </table>
        </section>"#,
        title = escape(&grid.title()),
    )
}

pub fn pending_labs_page(auth: &AuthContext, flash: Option<&Flash>, orders: &[PendingLabOrder]) -> String {
    let rows: String = if orders.is_empty() {
        r#"<tr><td colspan="5">Nothing is waiting for submission.</td></tr>"#.to_string()
    } else {
        orders
            .iter()
            .map(|o| {
                format!(
                    r#"<tr><td><a href="{}">{}</a></td><td>{}</td><td>{}</td><td>{}</td><td><a href="{}">Update</a></td></tr>"#,
                    paths::fill(paths::PATIENT, o.patient_id),
                    escape(&o.patient_name),
                    escape(&o.order_type),
                    escape(&o.ordered_by),
                    escape(&o.status),
                    paths::fill(paths::EDIT_LAB_ORDER, o.id)
                )
            })
            .collect()
    };
    let body = format!(
        r#"<section>
            <h1>Pending labs</h1>
            <table>
                <tr><th>Patient</th><th>Order type</th><th>Ordered by</th><th>Status</th><th></th></tr>
                {rows}
            </table>
        </section>"#
    );
    layout("Pending labs", Some(auth), flash, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::month_grid_on;
    use auth_identity::Role;
    use chrono::NaiveDate;
    use database_layer::TelehealthAppointment;

    fn auth(role: Role) -> AuthContext {
        AuthContext {
            user_id: 1,
            username: "viewer".into(),
            role,
            session_token: "t".into(),
        }
    }

    fn patient() -> Patient {
        Patient {
            id: 4,
            name: "Bobby <Tables>".into(),
            age: 12,
            gender: "Male".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            user_id: None,
        }
    }

    #[test]
    fn test_patient_portal_is_read_only() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let grid = month_grid_on(2024, 2, today).unwrap();
        let p = patient();
        let records = PatientRecords {
            appointments: vec![TelehealthAppointment {
                id: 1,
                patient_id: p.id,
                scheduled_at: NaiveDate::from_ymd_opt(2024, 2, 20)
                    .unwrap()
                    .and_hms_opt(10, 0, 0)
                    .unwrap(),
                provider: "Dr. Z".into(),
                status: "Scheduled".into(),
            }],
            ..Default::default()
        };
        let viewer = auth(Role::Patient);
        let html = dashboard_page(&DashboardView {
            auth: &viewer,
            flash: None,
            patients: &[],
            selected: Some(&p),
            records: &records,
            pending_labs: &[],
            grid: &grid,
        });

        assert!(html.contains("Bobby &lt;Tables&gt;"));
        assert!(!html.contains("/delete_patient/4"));
        assert!(!html.contains("/add_prescription/4"));
        assert!(html.contains(r#"<span class="booked">20</span>"#));
        assert!(html.contains(r#"<span class="today">10</span>"#));
        assert!(html.contains("/patient_dashboard?year=2024&amp;month=3"));
    }

    #[test]
    fn test_doctor_dashboard_links() {
        let grid = month_grid_on(2024, 2, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()).unwrap();
        let p = patient();
        let patients = vec![p.clone()];
        let records = PatientRecords::default();
        let viewer = auth(Role::Doctor);
        let html = dashboard_page(&DashboardView {
            auth: &viewer,
            flash: None,
            patients: &patients,
            selected: Some(&p),
            records: &records,
            pending_labs: &[],
            grid: &grid,
        });

        assert!(html.contains(r#"action="/delete_patient/4""#));
        assert!(html.contains(r#"href="/add_lab_order/4""#));
        assert!(html.contains(r#"class="active""#));
        assert!(html.contains("/patient/4?year=2024&amp;month=1"));
        assert!(html.contains("0 order(s) need submission."));
    }
}
