//! Add/edit forms for patients and their records

use super::{escape, layout};
use crate::flash::Flash;
use crate::forms::{AppointmentForm, LabOrderForm, PatientForm, PrescriptionForm};
use crate::middleware::AuthContext;
use database_layer::LAB_STATUS_NEEDS_SUBMISSION;

const GENDERS: &[&str] = &["Female", "Male", "Other"];
const APPOINTMENT_STATUSES: &[&str] = &["Scheduled", "Completed", "Cancelled"];
const LAB_STATUSES: &[&str] = &[LAB_STATUS_NEEDS_SUBMISSION, "Submitted", "Resulted"];

/// Shared page state for a record form
pub struct FormPage<'a> {
    pub auth: &'a AuthContext,
    pub flash: Option<&'a Flash>,
    pub title: &'a str,
    pub action: &'a str,
    pub cancel: &'a str,
}

fn input(label: &str, kind: &str, name: &str, value: &str, required: bool) -> String {
    format!(
        r#"<label>{} <input type="{}" name="{}" value="{}"{}></label>"#,
        escape(label),
        kind,
        name,
        escape(value),
        if required { " required" } else { "" }
    )
}

fn select(label: &str, name: &str, options: &[&str], selected: &str) -> String {
    let mut rendered: Vec<String> = options
        .iter()
        .map(|option| {
            format!(
                r#"<option value="{0}"{1}>{0}</option>"#,
                escape(option),
                if *option == selected { " selected" } else { "" }
            )
        })
        .collect();
    // keep a stored value that is not one of the presets
    if !selected.is_empty() && !options.contains(&selected) {
        rendered.push(format!(
            r#"<option value="{0}" selected>{0}</option>"#,
            escape(selected)
        ));
    }
    format!(
        r#"<label>{} <select name="{}">{}</select></label>"#,
        escape(label),
        name,
        rendered.join("")
    )
}

fn textarea(label: &str, name: &str, value: &str) -> String {
    format!(
        r#"<label>{} <textarea name="{}" rows="3">{}</textarea></label>"#,
        escape(label),
        name,
        escape(value)
    )
}

fn render(page: &FormPage<'_>, fields: &[String]) -> String {
    let body = format!(
        r#"<section>
            <h1>{title}</h1>
            <form method="post" action="{action}">
                {fields}
                <p><button type="submit">Save</button> <a href="{cancel}">Cancel</a></p>
            </form>
        </section>"#,
        title = escape(page.title),
        action = escape(page.action),
        fields = fields.join("\n                "),
        cancel = escape(page.cancel),
    );
    layout(page.title, Some(page.auth), page.flash, &body)
}

pub fn patient_form(page: &FormPage<'_>, form: &PatientForm) -> String {
    render(
        page,
        &[
            input("Name", "text", "name", &form.name, true),
            input("Age", "number", "age", &form.age, true),
            select("Gender", "gender", GENDERS, &form.gender),
            input("Visit date", "date", "visit_date", &form.visit_date, true),
            input(
                "Portal username (optional)",
                "text",
                "portal_username",
                &form.portal_username,
                false,
            ),
        ],
    )
}

pub fn prescription_form(page: &FormPage<'_>, form: &PrescriptionForm) -> String {
    render(
        page,
        &[
            input("Medication", "text", "medication", &form.medication, true),
            input("Dosage", "text", "dosage", &form.dosage, true),
            textarea("Instructions", "instructions", &form.instructions),
        ],
    )
}

pub fn appointment_form(page: &FormPage<'_>, form: &AppointmentForm) -> String {
    let status = if form.status.is_empty() {
        "Scheduled"
    } else {
        form.status.as_str()
    };
    render(
        page,
        &[
            input("Scheduled at", "datetime-local", "scheduled_at", &form.scheduled_at, true),
            input("Provider", "text", "provider", &form.provider, true),
            select("Status", "status", APPOINTMENT_STATUSES, status),
        ],
    )
}

pub fn lab_order_form(page: &FormPage<'_>, form: &LabOrderForm) -> String {
    let status = if form.status.is_empty() {
        LAB_STATUS_NEEDS_SUBMISSION
    } else {
        form.status.as_str()
    };
    render(
        page,
        &[
            input("Order type", "text", "order_type", &form.order_type, true),
            input("Ordered by", "text", "ordered_by", &form.ordered_by, true),
            select("Status", "status", LAB_STATUSES, status),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_keeps_custom_value() {
        let html = select("Status", "status", LAB_STATUSES, "On hold");
        assert!(html.contains(r#"<option value="On hold" selected>"#));
        let html = select("Status", "status", LAB_STATUSES, "Submitted");
        assert!(html.contains(r#"<option value="Submitted" selected>"#));
        assert_eq!(html.matches("selected").count(), 1);
    }

    #[test]
    fn test_input_escapes_value() {
        let html = input("Name", "text", "name", r#"O"Brien"#, true);
        assert!(html.contains(r#"value="O&quot;Brien""#));
        assert!(html.ends_with(" required></label>"));
    }
}
