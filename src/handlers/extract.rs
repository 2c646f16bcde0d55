use std::convert::Infallible;
use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, FromRequest, FromRequestParts, Multipart, Request},
    http::{
        header::{HeaderName, CONTENT_TYPE, USER_AGENT},
        request::Parts,
    },
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::media::{UploadFile, ALLOWED_MIME_TYPES};
use crate::state::AppState;

/// JSON body whose rejections render as the error envelope
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// A body accepted either as JSON or as `multipart/form-data`
///
/// Multipart text fields become the fields of `T`; values that look like JSON
/// arrays or objects are parsed as such so nested data can be sent in a form.
/// A parsed field that `T` only accepts as text falls back to the raw string.
/// File fields are collected into `files` after their type and size are checked.
pub struct FormPayload<T> {
    pub data: T,
    pub files: Vec<UploadFile>,
}

impl<T> FormPayload<T> {
    /// Reject file fields other than the listed ones, or too many under one name
    pub fn allow_files(&self, allowed: &[(&str, usize)]) -> Result<(), AppError> {
        for file in &self.files {
            let Some((name, max)) = allowed.iter().find(|(name, _)| *name == file.field) else {
                return Err(AppError::BadRequest(format!(
                    "Unexpected file field: {}",
                    file.field
                )));
            };

            let count = self.files.iter().filter(|f| f.field == *name).count();
            if count > *max {
                return Err(AppError::BadRequest(format!(
                    "Too many files for {} (max {})",
                    name, max
                )));
            }
        }
        Ok(())
    }

    /// Remove and return the files sent under `field`
    pub fn take_files(&mut self, field: &str) -> Vec<UploadFile> {
        let (taken, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == field);
        self.files = rest;
        taken
    }

    /// Remove and return the first file sent under `field`
    pub fn take_file(&mut self, field: &str) -> Option<UploadFile> {
        self.take_files(field).into_iter().next()
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Interpret a form text value
fn text_value(text: String) -> Value {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str(&text) {
            return value;
        }
    }
    Value::String(text)
}

/// Insert a form field, turning repeated names into arrays
fn insert_field(fields: &mut Map<String, Value>, name: &str, value: Value) {
    let name = name.strip_suffix("[]").unwrap_or(name);

    match fields.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            fields.insert(name.to_string(), value);
        }
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Validation(vec![e.to_string()]))
}

/// Decode form fields, retrying with reinterpreted JSON fields reverted to their text
///
/// Each reinterpreted field is reverted on its own first, then all of them together.
fn decode_form<T: DeserializeOwned>(
    parsed: Map<String, Value>,
    raw: &Map<String, Value>,
) -> Result<T, AppError> {
    let first_err = match serde_json::from_value(Value::Object(parsed.clone())) {
        Ok(data) => return Ok(data),
        Err(e) => e,
    };

    let reinterpreted: Vec<&String> = parsed
        .iter()
        .filter(|(name, value)| raw.get(*name) != Some(*value))
        .map(|(name, _)| name)
        .collect();

    if !reinterpreted.is_empty() {
        let attempts = reinterpreted
            .iter()
            .map(|name| vec![*name])
            .chain(std::iter::once(reinterpreted.clone()));

        for names in attempts {
            let mut fields = parsed.clone();
            for name in names {
                if let Some(text) = raw.get(name) {
                    fields.insert(name.clone(), text.clone());
                }
            }
            if let Ok(data) = serde_json::from_value(Value::Object(fields)) {
                return Ok(data);
            }
        }
    }

    Err(AppError::Validation(vec![first_err.to_string()]))
}

impl<T> FromRequest<AppState> for FormPayload<T>
where
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let bytes = Bytes::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;

            let value = if bytes.iter().all(u8::is_ascii_whitespace) {
                Value::Object(Map::new())
            } else {
                serde_json::from_slice(&bytes)
                    .map_err(|e| AppError::Validation(vec![e.to_string()]))?
            };

            return Ok(Self {
                data: decode(value)?,
                files: Vec::new(),
            });
        }

        let mut multipart = Multipart::from_request(req, state).await?;
        let mut fields = Map::new();
        let mut raw_fields = Map::new();
        let mut files = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(file_name) = field.file_name().map(str::to_string) else {
                let text = field.text().await?;
                insert_field(&mut raw_fields, &name, Value::String(text.clone()));
                insert_field(&mut fields, &name, text_value(text));
                continue;
            };

            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            if !ALLOWED_MIME_TYPES.contains(&content_type.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Unsupported file type for {}: {}",
                    name, content_type
                )));
            }

            let bytes = field.bytes().await?;
            if bytes.len() > state.config.max_upload_bytes {
                return Err(AppError::BadRequest(format!(
                    "{} exceeds the {} byte upload limit",
                    file_name, state.config.max_upload_bytes
                )));
            }

            files.push(UploadFile {
                field: name,
                file_name,
                content_type,
                bytes,
            });
        }

        Ok(Self {
            data: decode_form(fields, &raw_fields)?,
            files,
        })
    }
}

const X_FORWARDED_FOR: HeaderName = HeaderName::from_static("x-forwarded-for");

fn header_value<'a>(parts: &'a Parts, name: &HeaderName) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Caller details recorded with contact inquiries
#[derive(Debug, Clone, Default)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl<S> FromRequestParts<S> for ClientInfo
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_agent = header_value(parts, &USER_AGENT).map(str::to_string);

        let forwarded = header_value(parts, &X_FORWARDED_FOR)
            .and_then(|value| value.split(',').next())
            .map(|first| first.trim().to_string())
            .filter(|first| !first.is_empty());

        let ip_address = forwarded.or_else(|| {
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        Ok(Self {
            user_agent,
            ip_address,
        })
    }
}
