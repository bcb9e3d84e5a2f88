// In-memory candidate store.
//
// Records live in a Vec behind a tokio RwLock and are lost when the process
// exits. Ids come from a counter that only grows, so a deleted id is never
// handed out again.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Map;
use tokio::sync::RwLock;

use super::CandidateStore;
use crate::error::Result;
use crate::models::candidate::{
    Candidate, CandidateId, CandidatePatch, Education, NewCandidate, WorkExperience,
};

#[derive(Debug)]
struct Inner {
    next_id: CandidateId,
    records: Vec<Candidate>,
}

#[derive(Debug, Clone)]
pub struct MemoryCandidateStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryCandidateStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 1,
                records: Vec::new(),
            })),
        }
    }

    /// Store pre-loaded with the sample candidate used for demos.
    pub fn with_demo_data() -> Self {
        let created = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let john = NewCandidate {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@example.com".to_string(),
            phone: Some("+1234567890".to_string()),
            address: Some("123 Main St, City, Country".to_string()),
            education: Some(Education {
                degree: Some("Computer Science".to_string()),
                university: Some("Tech University".to_string()),
                year: Some(2020),
                extra: Map::new(),
            }),
            work_experience: Some(WorkExperience {
                company: Some("Tech Corp".to_string()),
                position: Some("Software Developer".to_string()),
                years: Some(2),
                ..WorkExperience::default()
            }),
            cv_path: None,
            created_at: created,
            updated_at: created,
        };

        Self {
            inner: Arc::new(RwLock::new(Inner {
                next_id: 2,
                records: vec![john.with_id(1)],
            })),
        }
    }
}

impl Default for MemoryCandidateStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CandidateStore for MemoryCandidateStore {
    async fn insert(&self, record: NewCandidate) -> Result<Candidate> {
        let mut guard = self.inner.write().await;
        let id = guard.next_id;
        guard.next_id += 1;
        let candidate = record.with_id(id);
        guard.records.push(candidate.clone());
        Ok(candidate)
    }

    async fn list_all(&self) -> Result<Vec<Candidate>> {
        let guard = self.inner.read().await;
        let mut records = guard.records.clone();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn get_by_id(&self, id: CandidateId) -> Result<Option<Candidate>> {
        let guard = self.inner.read().await;
        Ok(guard.records.iter().find(|c| c.id == id).cloned())
    }

    async fn update(
        &self,
        id: CandidateId,
        patch: CandidatePatch,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Candidate>> {
        let mut guard = self.inner.write().await;
        let Some(record) = guard.records.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        record.apply(patch, touched_at);
        Ok(Some(record.clone()))
    }

    async fn remove(&self, id: CandidateId) -> Result<bool> {
        let mut guard = self.inner.write().await;
        let before = guard.records.len();
        guard.records.retain(|c| c.id != id);
        Ok(guard.records.len() != before)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.inner.read().await.records.len())
    }
}
