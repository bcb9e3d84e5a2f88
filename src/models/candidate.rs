use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

pub type CandidateId = i64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Education>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_experience: Option<WorkExperience>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Known education keys; anything else the client sends is kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkExperience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// A record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education: Option<Education>,
    pub work_experience: Option<WorkExperience>,
    pub cv_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewCandidate {
    pub fn with_id(self, id: CandidateId) -> Candidate {
        Candidate {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            education: self.education,
            work_experience: self.work_experience,
            cv_path: self.cv_path,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Partial update. `None` leaves a field alone; for optional fields
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidatePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub education: Option<Option<Education>>,
    pub work_experience: Option<Option<WorkExperience>>,
    pub cv_path: Option<Option<String>>,
}

impl CandidatePatch {
    pub fn cv_path(path: impl Into<String>) -> Self {
        Self {
            cv_path: Some(Some(path.into())),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Candidate {
    /// Shallow merge: nested education/work experience are replaced as a whole.
    pub fn apply(&mut self, patch: CandidatePatch, touched_at: DateTime<Utc>) {
        if let Some(first_name) = patch.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            self.last_name = last_name;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(education) = patch.education {
            self.education = education;
        }
        if let Some(work_experience) = patch.work_experience {
            self.work_experience = work_experience;
        }
        if let Some(cv_path) = patch.cv_path {
            self.cv_path = cv_path;
        }
        self.updated_at = crate::utils::time::advance(self.updated_at, touched_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    fn sample() -> Candidate {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        NewCandidate {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@example.com".into(),
            phone: Some("+1234567890".into()),
            address: None,
            education: Some(Education {
                degree: Some("Computer Science".into()),
                university: Some("Tech University".into()),
                year: Some(2020),
                extra: Map::new(),
            }),
            work_experience: None,
            cv_path: None,
            created_at: at,
            updated_at: at,
        }
        .with_id(1)
    }

    #[test]
    fn serializes_camel_case_and_skips_absent_fields() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["firstName"], "John");
        assert_eq!(value["education"]["university"], "Tech University");
        assert!(value.get("address").is_none());
        assert!(value.get("cvPath").is_none());
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn nested_records_keep_unknown_keys() {
        let exp: WorkExperience = serde_json::from_value(json!({
            "company": "Tech Corp",
            "years": 2,
            "startDate": "2021-03-01",
            "team": "Platform",
        }))
        .unwrap();
        assert_eq!(exp.start_date.as_deref(), Some("2021-03-01"));
        assert_eq!(exp.extra.get("team"), Some(&json!("Platform")));

        let back = serde_json::to_value(&exp).unwrap();
        assert_eq!(back["team"], "Platform");
    }

    #[test]
    fn apply_replaces_nested_records_wholesale() {
        let mut candidate = sample();
        let later = candidate.updated_at + Duration::hours(1);
        candidate.apply(
            CandidatePatch {
                education: Some(Some(Education {
                    degree: Some("Mathematics".into()),
                    ..Education::default()
                })),
                phone: Some(None),
                ..CandidatePatch::default()
            },
            later,
        );

        let education = candidate.education.as_ref().unwrap();
        assert_eq!(education.degree.as_deref(), Some("Mathematics"));
        assert_eq!(education.university, None);
        assert_eq!(candidate.phone, None);
        assert_eq!(candidate.updated_at, later);
        assert_eq!(candidate.first_name, "John");
    }

    #[test]
    fn apply_never_moves_updated_at_backwards() {
        let mut candidate = sample();
        let before = candidate.updated_at;
        candidate.apply(CandidatePatch::default(), before - Duration::days(1));
        assert!(candidate.updated_at > before);
        assert!(candidate.created_at <= candidate.updated_at);
    }
}
