use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationErrors};

use crate::models::candidate::{Candidate, CandidatePatch, Education, WorkExperience};
use crate::services::candidate_service::CandidateInput;
use crate::utils::validation::{
    into_validation_errors, is_valid_email, is_valid_phone, validate_candidate_form,
    CandidateForm, FieldErrors, EMAIL_INVALID, FIRST_NAME_REQUIRED, LAST_NAME_REQUIRED,
    PHONE_INVALID,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCandidatePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education: Option<Education>,
    pub work_experience: Option<WorkExperience>,
    pub cv_path: Option<String>,
}

impl Validate for CreateCandidatePayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        into_validation_errors(validate_candidate_form(&CandidateForm {
            first_name: self.first_name.as_deref(),
            last_name: self.last_name.as_deref(),
            email: self.email.as_deref(),
            phone: self.phone.as_deref(),
        }))
    }
}

/// Empty optional strings are stored as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<CreateCandidatePayload> for CandidateInput {
    fn from(value: CreateCandidatePayload) -> Self {
        Self {
            first_name: value.first_name.unwrap_or_default(),
            last_name: value.last_name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            phone: non_empty(value.phone),
            address: non_empty(value.address),
            education: value.education,
            work_experience: value.work_experience,
            cv_path: non_empty(value.cv_path),
        }
    }
}

/// Deserializes a present key (even `null`) as `Some(..)`, so a missing key
/// and an explicit `null` can be told apart.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatePayload {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub education: Option<Option<Education>>,
    #[serde(default, deserialize_with = "present")]
    pub work_experience: Option<Option<WorkExperience>>,
    #[serde(default, deserialize_with = "present")]
    pub cv_path: Option<Option<String>>,
}

impl Validate for UpdateCandidatePayload {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = FieldErrors::new();
        if matches!(self.first_name.as_deref(), Some(v) if v.trim().is_empty()) {
            errors.insert("firstName", FIRST_NAME_REQUIRED);
        }
        if matches!(self.last_name.as_deref(), Some(v) if v.trim().is_empty()) {
            errors.insert("lastName", LAST_NAME_REQUIRED);
        }
        if matches!(self.email.as_deref(), Some(v) if !is_valid_email(v)) {
            errors.insert("email", EMAIL_INVALID);
        }
        if let Some(Some(phone)) = &self.phone {
            if !phone.is_empty() && !is_valid_phone(phone) {
                errors.insert("phone", PHONE_INVALID);
            }
        }
        into_validation_errors(errors)
    }
}

impl From<UpdateCandidatePayload> for CandidatePatch {
    fn from(value: UpdateCandidatePayload) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            phone: value.phone.map(non_empty),
            address: value.address.map(non_empty),
            education: value.education,
            work_experience: value.work_experience,
            cv_path: value.cv_path.map(non_empty),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateEnvelope {
    pub message: String,
    pub candidate: Candidate,
}

impl CandidateEnvelope {
    pub fn new(message: impl Into<String>, candidate: Candidate) -> Self {
        Self {
            message: message.into(),
            candidate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
