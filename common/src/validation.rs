// Request validation: field rules shared by the models and the ValidJson extractor

use std::borrow::Cow;

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use crate::errors::{ApiError, FieldViolation, ValidationError};

lazy_static! {
    /// At least one non-whitespace character
    pub static ref NOT_BLANK: Regex = Regex::new(r"\S").unwrap();
    pub static ref GENDER: Regex = Regex::new(r"^(Male|Female|Other)$").unwrap();
    pub static ref USER_ROLE: Regex = Regex::new(r"^(admin|user)$").unwrap();
}

fn violation(code: &'static str, message: &'static str) -> validator::ValidationError {
    let mut err = validator::ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn date_of_birth_in_past(date: &NaiveDate) -> Result<(), validator::ValidationError> {
    if *date < today() {
        Ok(())
    } else {
        Err(violation("past", "Date of birth must be in the past"))
    }
}

pub fn hire_date_not_in_future(date: &NaiveDate) -> Result<(), validator::ValidationError> {
    if *date <= today() {
        Ok(())
    } else {
        Err(violation(
            "past_or_present",
            "Hire date must be in the past or present",
        ))
    }
}

pub fn start_date_in_past(date: &NaiveDate) -> Result<(), validator::ValidationError> {
    if *date < today() {
        Ok(())
    } else {
        Err(violation("past", "Start Date must be in the past"))
    }
}

pub fn salary_positive(salary: f64) -> Result<(), validator::ValidationError> {
    if salary > 0.0 {
        Ok(())
    } else {
        Err(violation("positive", "Salary must be positive"))
    }
}

impl From<ValidationErrors> for ValidationError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();
        collect_violations(&errors, "", &mut violations);
        violations.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
        ValidationError::Fields(violations)
    }
}

fn collect_violations(errors: &ValidationErrors, prefix: &str, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            camel_case(field)
        } else {
            format!("{}.{}", prefix, camel_case(field))
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| err.code.to_string());
                    out.push(FieldViolation {
                        field: path.clone(),
                        message,
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_violations(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

/// `first_name` → `firstName`, matching the JSON field names.
fn camel_case(field: &str) -> String {
    let mut result = String::with_capacity(field.len());
    let mut upper_next = false;
    for ch in field.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

/// JSON body extractor that runs `validator` rules before the handler sees the value.
///
/// Malformed bodies are rejected with 422, rule violations with 400; both use
/// the response envelope.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ValidationError::MalformedBody(rejection.body_text()))?;

        value.validate().map_err(ValidationError::from)?;

        Ok(ValidJson(value))
    }
}
