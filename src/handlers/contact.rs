use axum::extract::{Path, State};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::AppResult;
use crate::handlers::{ApiReply, AppJson, ClientInfo};
use crate::messages;
use crate::models::{
    Attachment, Budget, Contact, ContactPriority, ContactResponse, ContactSource, ContactStatus,
    Note, ProjectType, Reply, Timeline,
};
use crate::services::notification;
use crate::state::AppState;
use crate::validation::{lenient, nullable, parse_object_id, trimmed, DateValue, FieldErrors, Mode};

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplyInput {
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct NoteInput {
    pub content: Option<String>,
}

/// Inquiry fields; the sender and message are required on create, an update
/// needs at least one field
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub project_type: Option<ProjectType>,
    pub budget: Option<Budget>,
    pub timeline: Option<Timeline>,
    pub attachments: Option<Vec<Attachment>>,
    pub status: Option<ContactStatus>,
    pub priority: Option<ContactPriority>,
    pub source: Option<ContactSource>,
    pub response: Option<ReplyInput>,
    pub notes: Option<Vec<NoteInput>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub follow_up_date: Option<Option<DateValue>>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_follow_up_complete: Option<bool>,
}

impl ContactRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.subject.is_none()
            && self.message.is_none()
            && self.project_type.is_none()
            && self.budget.is_none()
            && self.timeline.is_none()
            && self.attachments.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.source.is_none()
            && self.response.is_none()
            && self.notes.is_none()
            && self.follow_up_date.is_none()
            && self.is_follow_up_complete.is_none()
    }

    fn validate(&self, mode: Mode) -> AppResult<()> {
        let mut errors = FieldErrors::new();

        errors.not_empty_update(mode, self.is_empty());
        errors.required_on(mode, "name", &self.name);
        errors.max_len("name", self.name.as_deref(), 100);
        errors.required_on(mode, "email", &self.email);
        errors.email("email", self.email.as_deref());
        errors.phone("phone", self.phone.as_deref());
        errors.max_len("company", self.company.as_deref(), 100);
        errors.required_on(mode, "subject", &self.subject);
        errors.max_len("subject", self.subject.as_deref(), 200);
        errors.required_on(mode, "message", &self.message);
        errors.max_len("message", self.message.as_deref(), 5000);

        for attachment in self.attachments.iter().flatten() {
            errors.uri("attachments.url", attachment.url.as_deref());
        }
        if let Some(reply) = &self.response {
            errors.required("response.message", &reply.message);
        }
        for note in self.notes.iter().flatten() {
            errors.required("notes.content", &note.content);
        }

        errors.finish()
    }

    fn apply(self, contact: &mut Contact) {
        let now = bson::DateTime::now();

        if let Some(name) = trimmed(self.name) {
            contact.name = name;
        }
        if let Some(email) = trimmed(self.email) {
            contact.email = email.to_lowercase();
        }
        if let Some(phone) = trimmed(self.phone) {
            contact.phone = Some(phone);
        }
        if let Some(company) = trimmed(self.company) {
            contact.company = Some(company);
        }
        if let Some(subject) = trimmed(self.subject) {
            contact.subject = subject;
        }
        if let Some(message) = trimmed(self.message) {
            contact.message = message;
        }
        if let Some(project_type) = self.project_type {
            contact.project_type = Some(project_type);
        }
        if let Some(budget) = self.budget {
            contact.budget = Some(budget);
        }
        if let Some(timeline) = self.timeline {
            contact.timeline = Some(timeline);
        }
        if let Some(attachments) = self.attachments {
            contact.attachments = attachments;
        }
        if let Some(status) = self.status {
            contact.status = status;
        }
        if let Some(priority) = self.priority {
            contact.priority = priority;
        }
        if let Some(source) = self.source {
            contact.source = source;
        }
        if let Some(reply) = self.response.and_then(|r| trimmed(r.message)) {
            contact.response = Some(Reply {
                message: reply,
                responded_at: now,
                responded_by: None,
            });
        }
        if let Some(notes) = self.notes {
            contact.notes = notes
                .into_iter()
                .filter_map(|n| trimmed(n.content))
                .map(|content| Note {
                    content,
                    added_by: None,
                    added_at: now,
                })
                .collect();
        }
        if let Some(follow_up) = self.follow_up_date {
            contact.follow_up_date = follow_up.map(Into::into);
        }
        if let Some(done) = self.is_follow_up_complete {
            contact.is_follow_up_complete = done;
        }
    }
}

// ============ Handlers ============

/// Submit a contact inquiry
#[utoipa::path(
    post,
    path = "/api/contacts",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Contact created successfully", body = ContactResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Contacts"
)]
pub async fn create_contact(
    State(state): State<AppState>,
    client: ClientInfo,
    AppJson(payload): AppJson<ContactRequest>,
) -> AppResult<ApiReply<ContactResponse>> {
    payload.validate(Mode::Create)?;

    let mut contact = Contact::new(String::new(), String::new(), String::new(), String::new());
    payload.apply(&mut contact);
    contact.user_agent = client.user_agent;
    contact.ip_address = client.ip_address;

    let contact = state.contacts.insert(contact).await?;
    tracing::info!("Contact inquiry received: {} from {}", contact.id, contact.email);

    if let (Some(mailer), Some(to)) = (&state.mailer, &state.config.contact_notify_email) {
        notification::notify_new_contact(mailer.as_ref(), to, &contact).await;
    }

    Ok(ApiReply::created(messages::CONTACT_CREATED_SUCCESS, contact.into()))
}

/// List all contact inquiries
#[utoipa::path(
    get,
    path = "/api/contacts",
    responses(
        (status = 200, description = "Contacts, newest first", body = [ContactResponse])
    ),
    tag = "Contacts"
)]
pub async fn list_contacts(
    State(state): State<AppState>,
) -> AppResult<ApiReply<Vec<ContactResponse>>> {
    let contacts = state.contacts.list().await?;
    tracing::info!("Retrieved {} contacts", contacts.len());

    Ok(ApiReply::ok(
        messages::CONTACTS_FETCH_SUCCESS,
        contacts.into_iter().map(Into::into).collect(),
    ))
}

/// Get a contact inquiry by ID
#[utoipa::path(
    get,
    path = "/api/contacts/{id}",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact details", body = ContactResponse),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Contact not found")
    ),
    tag = "Contacts"
)]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<ContactResponse>> {
    let id = parse_object_id(&id)?;
    let contact = state.contacts.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Contact not found: {}", id);
    })?;

    Ok(ApiReply::ok(messages::CONTACT_FETCH_SUCCESS, contact.into()))
}

/// Update a contact inquiry
#[utoipa::path(
    put,
    path = "/api/contacts/{id}",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    request_body = ContactRequest,
    responses(
        (status = 200, description = "Contact updated successfully", body = ContactResponse),
        (status = 400, description = "Validation error or invalid ID"),
        (status = 404, description = "Contact not found")
    ),
    tag = "Contacts"
)]
pub async fn update_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<ContactRequest>,
) -> AppResult<ApiReply<ContactResponse>> {
    let id = parse_object_id(&id)?;
    payload.validate(Mode::Update)?;

    let mut contact = state.contacts.find_by_id(id).await.inspect_err(|_| {
        tracing::warn!("Contact not found: {}", id);
    })?;
    payload.apply(&mut contact);

    let contact = state.contacts.save(contact).await?;
    tracing::info!("Contact updated: {} (status {:?})", id, contact.status);

    Ok(ApiReply::ok(messages::CONTACT_UPDATE_SUCCESS, contact.into()))
}

/// Delete a contact inquiry
#[utoipa::path(
    delete,
    path = "/api/contacts/{id}",
    params(
        ("id" = String, Path, description = "Contact ID")
    ),
    responses(
        (status = 200, description = "Contact deleted successfully"),
        (status = 400, description = "Invalid ID format"),
        (status = 404, description = "Contact not found")
    ),
    tag = "Contacts"
)]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiReply<()>> {
    let id = parse_object_id(&id)?;
    state.contacts.delete(id).await.inspect_err(|_| {
        tracing::warn!("Contact not found: {}", id);
    })?;

    tracing::info!("Contact deleted: {}", id);
    Ok(ApiReply::message(messages::CONTACT_DELETE_SUCCESS))
}
