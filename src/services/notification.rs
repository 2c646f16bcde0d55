use serde::Serialize;

use crate::mail::Mailer;
use crate::models::Contact;

/// Wire name of an enum value
fn label<T: Serialize>(value: &T) -> String {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default()
}

/// Escape text for inclusion in an HTML body
fn escape(text: &str) -> String {
    html_escape::encode_safe(text).into_owned()
}

pub fn contact_subject(contact: &Contact) -> String {
    format!("New portfolio inquiry: {}", contact.subject)
}

pub fn contact_html(contact: &Contact) -> String {
    let mut rows = vec![
        ("Name", contact.name.clone()),
        ("Email", contact.email.clone()),
    ];
    if let Some(phone) = &contact.phone {
        rows.push(("Phone", phone.clone()));
    }
    if let Some(company) = &contact.company {
        rows.push(("Company", company.clone()));
    }
    if let Some(kind) = &contact.project_type {
        rows.push(("Project type", label(kind)));
    }
    if let Some(budget) = &contact.budget {
        rows.push(("Budget", label(budget)));
    }
    if let Some(timeline) = &contact.timeline {
        rows.push(("Timeline", label(timeline)));
    }

    let table: String = rows
        .iter()
        .map(|(label, value)| format!("<tr><th>{}</th><td>{}</td></tr>", label, escape(value)))
        .collect();

    format!(
        "<h2>{}</h2><table>{}</table><p>{}</p>",
        escape(&contact.subject),
        table,
        escape(&contact.message).replace('\n', "<br>")
    )
}

/// Tell the site owner about a new inquiry
///
/// Mail failures are logged and swallowed.
pub async fn notify_new_contact(mailer: &dyn Mailer, to: &str, contact: &Contact) {
    let subject = contact_subject(contact);
    let html = contact_html(contact);

    match mailer.send_email(to, &subject, &html).await {
        Ok(()) => tracing::info!("Sent inquiry notification for contact {}", contact.id.to_hex()),
        Err(e) => tracing::warn!(
            "Inquiry notification for contact {} failed: {}",
            contact.id.to_hex(),
            e
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_escapes_user_input() {
        let contact = Contact::new(
            "Ada <script>".into(),
            "ada@example.com".into(),
            "Hello & welcome".into(),
            "line one\nline two".into(),
        );

        let html = contact_html(&contact);
        assert!(html.contains("Ada &lt;script&gt;"));
        assert!(html.contains("Hello &amp; welcome"));
        assert!(html.contains("line one<br>line two"));
        assert!(!html.contains("<script>"));
    }
}
