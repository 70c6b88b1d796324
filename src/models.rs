// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! ## Validation
//!
//! Request bodies are deserialized leniently (missing fields default) and
//! then checked by a `validate` method that reports the first failing field
//! with a fixed message. Clients key error handling off these strings, so
//! they are part of the API contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::storage::Doctor;

// =============================================================================
// Gender
// =============================================================================

/// Patient gender, restricted to the three values the records UI offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Male" => Some(Gender::Male),
            "Female" => Some(Gender::Female),
            "Other" => Some(Gender::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Auth Models
// =============================================================================

/// Request to register a new doctor account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Full name of the doctor.
    #[serde(default)]
    pub name: String,
    /// Login email, stored case-normalized.
    #[serde(default)]
    pub email: String,
    /// Plaintext password, hashed before persistence.
    #[serde(default)]
    pub password: String,
    /// Medical specialization shown on the profile.
    #[serde(default)]
    pub specialization: String,
}

impl RegisterRequest {
    /// Check all fields, reporting the first failure.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.name.chars().count() < 2 {
            return Err(ApiError::bad_request("Name must be at least 2 characters"));
        }
        if !is_valid_email(&self.email) {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        if self.password.chars().count() < 6 {
            return Err(ApiError::bad_request(
                "Password must be at least 6 characters",
            ));
        }
        if self.specialization.chars().count() < 2 {
            return Err(ApiError::bad_request("Specialization is required"));
        }
        Ok(())
    }
}

/// Request to log into an existing doctor account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_email(&self.email) {
            return Err(ApiError::bad_request("Invalid email address"));
        }
        if self.password.is_empty() {
            return Err(ApiError::bad_request("Password is required"));
        }
        Ok(())
    }
}

/// Public subset of a doctor returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&Doctor> for UserSummary {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            email: doctor.email.clone(),
        }
    }
}

/// Successful register/login response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub message: String,
    pub user: UserSummary,
}

/// Authenticated doctor's own profile (never includes the password hash).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub specialization: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Doctor> for DoctorProfile {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id.clone(),
            name: doctor.name.clone(),
            email: doctor.email.clone(),
            specialization: doctor.specialization.clone(),
            created_at: doctor.created_at,
        }
    }
}

/// Plain acknowledgement body (logout, delete).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

// =============================================================================
// Patient Models
// =============================================================================

/// Request to create a patient record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub age: i64,
    /// One of `Male`, `Female`, `Other`.
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub phone: String,
    /// Free-form notes, optional.
    #[serde(default)]
    pub notes: Option<String>,
}

impl CreatePatientRequest {
    /// Check all fields in declaration order, reporting the first failure.
    ///
    /// Returns the parsed gender so callers don't parse it twice.
    pub fn validate(&self) -> Result<Gender, ApiError> {
        if self.name.is_empty() {
            return Err(ApiError::bad_request("Name is required"));
        }
        if self.age <= 0 {
            return Err(ApiError::bad_request("Age must be a positive number"));
        }
        let gender = Gender::parse(&self.gender)
            .ok_or_else(|| ApiError::bad_request("Gender must be Male, Female, or Other"))?;
        if self.diagnosis.is_empty() {
            return Err(ApiError::bad_request("Diagnosis is required"));
        }
        if self.phone.chars().count() < 5 {
            return Err(ApiError::bad_request("Phone number is required"));
        }
        Ok(gender)
    }
}

/// Partial update of a patient record.
///
/// Every field is optional; absent fields are left unchanged. Fields outside
/// this list are rejected at deserialization rather than silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub age: Option<i64>,
    /// One of `Male`, `Female`, `Other`.
    pub gender: Option<String>,
    pub diagnosis: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl UpdatePatientRequest {
    /// Check every present field with the same rules as creation.
    ///
    /// Returns the parsed gender when one was supplied.
    pub fn validate(&self) -> Result<Option<Gender>, ApiError> {
        if let Some(name) = &self.name {
            if name.is_empty() {
                return Err(ApiError::bad_request("Name is required"));
            }
        }
        if let Some(age) = self.age {
            if age <= 0 {
                return Err(ApiError::bad_request("Age must be a positive number"));
            }
        }
        let gender = match &self.gender {
            Some(raw) => Some(
                Gender::parse(raw).ok_or_else(|| {
                    ApiError::bad_request("Gender must be Male, Female, or Other")
                })?,
            ),
            None => None,
        };
        if let Some(diagnosis) = &self.diagnosis {
            if diagnosis.is_empty() {
                return Err(ApiError::bad_request("Diagnosis is required"));
            }
        }
        if let Some(phone) = &self.phone {
            if phone.chars().count() < 5 {
                return Err(ApiError::bad_request("Phone number is required"));
            }
        }
        Ok(gender)
    }
}

// =============================================================================
// Email validation
// =============================================================================

/// Structural email check: one `@`, a non-empty local part, and a dotted
/// domain without leading/trailing separators.
pub fn is_valid_email(raw: &str) -> bool {
    let Some((local, domain)) = raw.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 {
        return false;
    }
    if raw.chars().any(char::is_whitespace) {
        return false;
    }
    if !domain.contains('.') {
        return false;
    }
    if domain.starts_with('.') || domain.ends_with('.') || domain.starts_with('-') {
        return false;
    }
    !domain.contains('@')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_register() -> RegisterRequest {
        RegisterRequest {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret1".to_string(),
            specialization: "Cardiology".to_string(),
        }
    }

    fn valid_patient() -> CreatePatientRequest {
        CreatePatientRequest {
            name: "Bob".to_string(),
            age: 40,
            gender: "Male".to_string(),
            diagnosis: "Flu".to_string(),
            phone: "12345".to_string(),
            notes: None,
        }
    }

    #[test]
    fn gender_parses_exact_names_only() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("Female"), Some(Gender::Female));
        assert_eq!(Gender::parse("Other"), Some(Gender::Other));
        assert_eq!(Gender::parse("male"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn register_validation_reports_first_failure() {
        let mut request = valid_register();
        request.name = "A".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.message, "Name must be at least 2 characters");

        let mut request = valid_register();
        request.email = "not-an-email".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.message, "Invalid email address");

        let mut request = valid_register();
        request.password = "short".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.message, "Password must be at least 6 characters");

        let mut request = valid_register();
        request.specialization = "X".to_string();
        let err = request.validate().unwrap_err();
        assert_eq!(err.message, "Specialization is required");

        assert!(valid_register().validate().is_ok());
    }

    #[test]
    fn register_validation_order_is_stable() {
        // With several invalid fields, the first in declaration order wins.
        let request = RegisterRequest {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            specialization: String::new(),
        };
        let err = request.validate().unwrap_err();
        assert_eq!(err.message, "Name must be at least 2 characters");
    }

    #[test]
    fn login_validation_messages() {
        let request = LoginRequest {
            email: "bad".to_string(),
            password: "x".to_string(),
        };
        assert_eq!(
            request.validate().unwrap_err().message,
            "Invalid email address"
        );

        let request = LoginRequest {
            email: "ada@example.com".to_string(),
            password: String::new(),
        };
        assert_eq!(request.validate().unwrap_err().message, "Password is required");
    }

    #[test]
    fn create_patient_validation_messages() {
        let mut request = valid_patient();
        request.name = String::new();
        assert_eq!(request.validate().unwrap_err().message, "Name is required");

        let mut request = valid_patient();
        request.age = 0;
        assert_eq!(
            request.validate().unwrap_err().message,
            "Age must be a positive number"
        );

        let mut request = valid_patient();
        request.gender = "Unknown".to_string();
        assert_eq!(
            request.validate().unwrap_err().message,
            "Gender must be Male, Female, or Other"
        );

        let mut request = valid_patient();
        request.diagnosis = String::new();
        assert_eq!(
            request.validate().unwrap_err().message,
            "Diagnosis is required"
        );

        let mut request = valid_patient();
        request.phone = "123".to_string();
        assert_eq!(
            request.validate().unwrap_err().message,
            "Phone number is required"
        );

        assert_eq!(valid_patient().validate().unwrap(), Gender::Male);
    }

    #[test]
    fn update_patient_skips_absent_fields() {
        let patch = UpdatePatientRequest::default();
        assert_eq!(patch.validate().unwrap(), None);

        let patch = UpdatePatientRequest {
            age: Some(50),
            gender: Some("Female".to_string()),
            ..Default::default()
        };
        assert_eq!(patch.validate().unwrap(), Some(Gender::Female));
    }

    #[test]
    fn update_patient_checks_present_fields() {
        let patch = UpdatePatientRequest {
            age: Some(-3),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err().message,
            "Age must be a positive number"
        );

        let patch = UpdatePatientRequest {
            gender: Some("other".to_string()),
            ..Default::default()
        };
        assert_eq!(
            patch.validate().unwrap_err().message,
            "Gender must be Male, Female, or Other"
        );
    }

    #[test]
    fn update_patient_rejects_unknown_fields() {
        let result: Result<UpdatePatientRequest, _> =
            serde_json::from_str(r#"{"name":"Bob","ownerId":"someone-else"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn email_validation_cases() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ada"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ada@"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada@.example.com"));
        assert!(!is_valid_email("ada bad@example.com"));
        assert!(!is_valid_email("ada@@example.com"));
    }
}
