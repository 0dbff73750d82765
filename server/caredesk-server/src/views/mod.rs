//! Server-side HTML rendering
//!
//! Pages are assembled from `format!` templates. Every value that originates
//! from a user or the store goes through [`escape`] before it is embedded.

pub mod auth;
pub mod dashboard;
pub mod forms;
pub mod tasks;

use crate::flash::Flash;
use crate::middleware::AuthContext;
use crate::routes::paths;
use axum::http::StatusCode;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 0; background: #f4f6f8; color: #222; }
        header { background: #1f4e79; color: #fff; padding: 12px 24px; display: flex; justify-content: space-between; align-items: center; }
        header a { color: #fff; margin-left: 16px; text-decoration: none; }
        main { padding: 24px; }
        .flash { padding: 10px 14px; border-radius: 5px; margin-bottom: 16px; }
        .flash-success { background: #dff0d8; }
        .flash-error { background: #f2dede; }
        .flash-info { background: #d9edf7; }
        .layout { display: flex; gap: 24px; }
        .sidebar { min-width: 220px; }
        .sidebar a.active { font-weight: bold; }
        section { background: #fff; padding: 16px; border-radius: 5px; margin-bottom: 16px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border-bottom: 1px solid #ddd; padding: 6px 8px; text-align: left; }
        form.inline { display: inline; }
        .calendar td { width: 14%; height: 36px; text-align: center; }
        .calendar .today { background: #1f4e79; color: #fff; border-radius: 50%; }
        .calendar .booked { font-weight: bold; text-decoration: underline; }
        label { display: block; margin-top: 10px; }
        .done { text-decoration: line-through; color: #888; }
"#;

/// Escape text for use in HTML element content and quoted attributes
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(flash) => format!(
            r#"<div class="flash flash-{}">{}</div>"#,
            flash.level,
            escape(&flash.message)
        ),
        None => String::new(),
    }
}

fn nav(auth: Option<&AuthContext>) -> String {
    match auth {
        Some(auth) if auth.is_doctor() => format!(
            r#"<nav><span>Dr. {}</span><a href="{}">Dashboard</a><a href="{}">Add patient</a><a href="{}">Pending labs</a><a href="{}">Tasks</a><a href="{}">Log out</a></nav>"#,
            escape(&auth.username),
            paths::INDEX,
            paths::ADD_PATIENT,
            paths::PENDING_LABS,
            paths::TASKS,
            paths::LOGOUT
        ),
        Some(auth) => format!(
            r#"<nav><span>{}</span><a href="{}">My records</a><a href="{}">Log out</a></nav>"#,
            escape(&auth.username),
            paths::PATIENT_DASHBOARD,
            paths::LOGOUT
        ),
        None => format!(
            r#"<nav><a href="{}">Log in</a><a href="{}">Sign up</a></nav>"#,
            paths::LOGIN,
            paths::SIGNUP
        ),
    }
}

/// Wrap `body` in the common page chrome
pub fn layout(title: &str, auth: Option<&AuthContext>, flash: Option<&Flash>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title} | CareDesk</title>
    <style>{STYLE}</style>
</head>
<body>
    <header><strong>CareDesk</strong>{nav}</header>
    <main>
        {flash}
        {body}
    </main>
</body>
</html>"#,
        title = escape(title),
        nav = nav(auth),
        flash = flash_banner(flash),
    )
}

/// POST button for a delete route
pub fn delete_button(action: &str, label: &str, confirm: &str) -> String {
    format!(
        r#"<form class="inline" method="post" action="{}" onsubmit="return confirm('{}');"><button type="submit">{}</button></form>"#,
        escape(action),
        escape(confirm),
        escape(label)
    )
}

pub fn error_page(status: StatusCode, message: &str, error_id: &str) -> String {
    let title = status.canonical_reason().unwrap_or("Error");
    let body = format!(
        r#"<section>
            <h1>{} {}</h1>
            <p>{}</p>
            <p><small>Reference: {}</small></p>
            <p><a href="{}">Back to dashboard</a></p>
        </section>"#,
        status.as_u16(),
        escape(title),
        escape(message),
        escape(error_id),
        paths::INDEX
    );
    layout(title, None, None, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_layout_escapes_flash() {
        let page = layout("Home", None, Some(&Flash::error("<b>bad</b>")), "");
        assert!(page.contains("flash-error"));
        assert!(page.contains("&lt;b&gt;bad&lt;/b&gt;"));
    }

    #[test]
    fn test_error_page() {
        let page = error_page(StatusCode::NOT_FOUND, "The requested patient could not be found.", "abc");
        assert!(page.contains("404 Not Found"));
        assert!(page.contains("Reference: abc"));
    }
}
