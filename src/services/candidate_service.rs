use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::models::candidate::{
    Candidate, CandidateId, CandidatePatch, Education, NewCandidate, WorkExperience,
};
use crate::store::CandidateStore;
use crate::utils::{time, validation::is_valid_email};

/// Fields accepted when creating a candidate. Required fields are checked by
/// the caller before this reaches the service.
#[derive(Debug, Clone, Default)]
pub struct CandidateInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub education: Option<Education>,
    pub work_experience: Option<WorkExperience>,
    pub cv_path: Option<String>,
}

#[derive(Clone)]
pub struct CandidateService {
    store: Arc<dyn CandidateStore>,
    // Serializes check-then-write sequences (email uniqueness, existence).
    write_lock: Arc<Mutex<()>>,
}

impl CandidateService {
    pub fn new(store: Arc<dyn CandidateStore>) -> Self {
        Self {
            store,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn email_taken(&self, email: &str, except: Option<CandidateId>) -> Result<bool> {
        let candidates = self.store.list_all().await?;
        Ok(candidates
            .iter()
            .any(|c| c.email == email && Some(c.id) != except))
    }

    pub async fn create_candidate(&self, input: CandidateInput) -> Result<Candidate> {
        let _guard = self.write_lock.lock().await;

        if self.email_taken(&input.email, None).await? {
            tracing::info!("Rejected new candidate: email already in use");
            return Err(Error::EmailAlreadyExists);
        }

        let now = time::now();
        let candidate = self
            .store
            .insert(NewCandidate {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email,
                phone: input.phone,
                address: input.address,
                education: input.education,
                work_experience: input.work_experience,
                cv_path: input.cv_path,
                created_at: now,
                updated_at: now,
            })
            .await?;

        tracing::info!(candidate_id = candidate.id, "Candidate created");
        Ok(candidate)
    }

    pub async fn list_candidates(&self) -> Result<Vec<Candidate>> {
        self.store.list_all().await
    }

    pub async fn get_candidate(&self, id: CandidateId) -> Result<Candidate> {
        self.store.get_by_id(id).await?.ok_or(Error::NotFound)
    }

    pub async fn update_candidate(
        &self,
        id: CandidateId,
        patch: CandidatePatch,
    ) -> Result<Candidate> {
        let _guard = self.write_lock.lock().await;

        if self.store.get_by_id(id).await?.is_none() {
            return Err(Error::NotFound);
        }

        if let Some(email) = patch.email.as_deref() {
            if !is_valid_email(email) {
                return Err(Error::InvalidEmailFormat);
            }
            if self.email_taken(email, Some(id)).await? {
                tracing::info!(candidate_id = id, "Rejected update to an email already in use");
                return Err(Error::EmailAlreadyExists);
            }
        }

        let candidate = self
            .store
            .update(id, patch, time::now())
            .await?
            .ok_or(Error::NotFound)?;

        tracing::info!(candidate_id = id, "Candidate updated");
        Ok(candidate)
    }

    /// Points the candidate at a stored CV file.
    pub async fn attach_cv(&self, id: CandidateId, cv_path: String) -> Result<Candidate> {
        self.update_candidate(id, CandidatePatch::cv_path(cv_path)).await
    }

    pub async fn delete_candidate(&self, id: CandidateId) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if !self.store.remove(id).await? {
            return Err(Error::NotFound);
        }
        tracing::info!(candidate_id = id, "Candidate deleted");
        Ok(())
    }

    pub async fn count(&self) -> Result<usize> {
        self.store.len().await
    }
}
