//! Request validation helpers.
//!
//! Request bodies are deserialized into DTOs whose fields are all optional, so
//! that a missing field is reported as a field-level message instead of a
//! deserialization failure. Each DTO then runs its checks against a
//! [`FieldErrors`] collector, which turns into `AppError::Validation` when any
//! check failed.

pub mod date;
pub mod lenient;

pub use date::{nullable, DateValue};
pub use lenient::{lenient, one_or_many};

use bson::oid::ObjectId;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{AppError, AppResult};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid regex"));
static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid regex"));

/// Whether every field is required (create) or only those present are checked (update)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    Update,
}

/// Collects field-level validation messages
#[derive(Debug, Default)]
pub struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Present and, for strings, not blank
    pub fn required<T: Presence>(&mut self, field: &str, value: &Option<T>) {
        match value {
            Some(v) if v.is_present() => {}
            _ => self.push(format!("{field} is required")),
        }
    }

    /// `required` when creating; when updating, a supplied value must still not be blank
    pub fn required_on(&mut self, mode: Mode, field: &str, value: &Option<impl Presence>) {
        match mode {
            Mode::Create => self.required(field, value),
            Mode::Update => self.not_blank(field, value),
        }
    }

    /// Absent is fine, but a supplied value must not be blank
    pub fn not_blank(&mut self, field: &str, value: &Option<impl Presence>) {
        if value.as_ref().is_some_and(|v| !v.is_present()) {
            self.push(format!("{field} cannot be empty"));
        }
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) {
        if let Some(v) = value {
            if v.trim().chars().count() > max {
                self.push(format!("{field} must be at most {max} characters"));
            }
        }
    }

    pub fn len_between(&mut self, field: &str, value: Option<&str>, min: usize, max: usize) {
        if let Some(v) = value {
            let len = v.trim().chars().count();
            if len < min || len > max {
                self.push(format!("{field} must be between {min} and {max} characters"));
            }
        }
    }

    pub fn min_len(&mut self, field: &str, value: Option<&str>, min: usize) {
        if let Some(v) = value {
            if v.chars().count() < min {
                self.push(format!("{field} must be at least {min} characters"));
            }
        }
    }

    /// Every item of a string list is at most `max` characters
    pub fn each_max_len(&mut self, field: &str, values: Option<&[String]>, max: usize) {
        if values.is_some_and(|items| items.iter().any(|v| v.trim().chars().count() > max)) {
            self.push(format!("each {field} entry must be at most {max} characters"));
        }
    }

    pub fn range<N: PartialOrd + std::fmt::Display>(
        &mut self,
        field: &str,
        value: Option<N>,
        min: N,
        max: N,
    ) {
        if let Some(v) = value {
            if v < min || v > max {
                self.push(format!("{field} must be between {min} and {max}"));
            }
        }
    }

    pub fn min<N: PartialOrd + std::fmt::Display>(&mut self, field: &str, value: Option<N>, min: N) {
        if let Some(v) = value {
            if v < min {
                self.push(format!("{field} must be greater than or equal to {min}"));
            }
        }
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !EMAIL.is_match(v.trim()) {
                self.push(format!("{field} must be a valid email"));
            }
        }
    }

    pub fn phone(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !PHONE.is_match(v.trim()) {
                self.push(format!("{field} must be a valid phone number"));
            }
        }
    }

    pub fn hex_color(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if !HEX_COLOR.is_match(v) {
                self.push(format!("{field} must be a hex color like #1A2B3C"));
            }
        }
    }

    /// Absolute URI with a scheme
    pub fn uri(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            if url::Url::parse(v.trim()).is_err() {
                self.push(format!("{field} must be a valid URI"));
            }
        }
    }

    /// Absolute http(s) URL
    pub fn http_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            let ok = url::Url::parse(v.trim())
                .map(|u| matches!(u.scheme(), "http" | "https"))
                .unwrap_or(false);
            if !ok {
                self.push(format!("{field} must be a valid http(s) URL"));
            }
        }
    }

    /// Absolute URL that must use https
    pub fn https_url(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value {
            let v = v.trim();
            if url::Url::parse(v).is_err() {
                self.push(format!("{field} must be a valid URI"));
            } else if !v.starts_with("https://") {
                self.push(format!("{field} must start with https://"));
            }
        }
    }

    pub fn object_ids(&mut self, field: &str, values: Option<&[String]>) {
        if let Some(items) = values {
            if items.iter().any(|v| ObjectId::parse_str(v).is_err()) {
                self.push(format!("{field} must contain valid ids"));
            }
        }
    }

    /// Update payloads must carry at least one field
    pub fn not_empty_update(&mut self, mode: Mode, is_empty: bool) {
        if mode == Mode::Update && is_empty {
            self.push("at least one field must be provided");
        }
    }

    pub fn finish(self) -> AppResult<()> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self.messages))
        }
    }
}

/// What counts as "provided" for a required field
pub trait Presence {
    fn is_present(&self) -> bool;
}

impl Presence for String {
    fn is_present(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        true
    }
}

macro_rules! always_present {
    ($($ty:ty),*) => {
        $(impl Presence for $ty {
            fn is_present(&self) -> bool {
                true
            }
        })*
    };
}

always_present!(bool, i32, i64, f64, DateValue);

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

/// Parse a path id, answering 400 for anything that is not a 24-hex ObjectId
pub fn parse_object_id(raw: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| AppError::invalid_id())
}

/// Trimmed owned copy of an optional string
pub fn trimmed(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
