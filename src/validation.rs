//! Field-level input checks for the admin forms.
//!
//! Every rule records at most one message per field (the first failure wins)
//! so a form can report all of its invalid fields in a single response.

use std::collections::BTreeMap;

use axum::http::Uri;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `Ok(value)` when no rule failed, otherwise the collected errors.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, AppError> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

pub fn min_chars(errors: &mut FieldErrors, field: &str, value: &str, min: usize, message: &str) {
    if value.chars().count() < min {
        errors.add(field, message);
    }
}

/// Accepts absolute `http`/`https` URLs that name a host.
pub fn is_web_url(value: &str) -> bool {
    let Ok(uri) = value.trim().parse::<Uri>() else {
        return false;
    };
    matches!(uri.scheme_str(), Some("http") | Some("https"))
        && uri.host().is_some_and(|host| !host.is_empty())
}

pub fn web_url(errors: &mut FieldErrors, field: &str, value: &str, message: &str) {
    if !is_web_url(value) {
        errors.add(field, message);
    }
}

pub fn uuid(errors: &mut FieldErrors, field: &str, value: &str, message: &str) -> Option<Uuid> {
    match Uuid::parse_str(value.trim()) {
        Ok(id) => Some(id),
        Err(_) => {
            errors.add(field, message);
            None
        }
    }
}

pub fn non_negative_decimal(errors: &mut FieldErrors, field: &str, value: Decimal, message: &str) {
    if value < Decimal::ZERO {
        errors.add(field, message);
    }
}

/// Non-negative integer that fits the storage column.
pub fn non_negative_count(
    errors: &mut FieldErrors,
    field: &str,
    value: i64,
    message: &str,
) -> Option<i32> {
    if value < 0 {
        errors.add(field, message);
        return None;
    }
    match i32::try_from(value) {
        Ok(count) => Some(count),
        Err(_) => {
            errors.add(field, format!("{field} is too large"));
            None
        }
    }
}
