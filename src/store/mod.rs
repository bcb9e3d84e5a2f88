//! Candidate record storage.
//!
//! The service talks to storage only through [`CandidateStore`], so the
//! in-memory store can later be replaced by a persistent backend without
//! touching the HTTP or service layers.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::candidate::{Candidate, CandidateId, CandidatePatch, NewCandidate};

pub use memory::MemoryCandidateStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Stores the record under the next unused id and returns it.
    async fn insert(&self, record: NewCandidate) -> Result<Candidate>;

    /// All records, newest `created_at` first.
    async fn list_all(&self) -> Result<Vec<Candidate>>;

    async fn get_by_id(&self, id: CandidateId) -> Result<Option<Candidate>>;

    /// Merges the supplied fields. `None` when the id is unknown.
    async fn update(
        &self,
        id: CandidateId,
        patch: CandidatePatch,
        touched_at: DateTime<Utc>,
    ) -> Result<Option<Candidate>>;

    /// Returns whether a record was removed.
    async fn remove(&self, id: CandidateId) -> Result<bool>;

    async fn len(&self) -> Result<usize>;
}
