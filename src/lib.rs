pub mod config;
pub mod dto;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;
pub mod utils;

use std::sync::Arc;

use crate::config::Config;
use crate::services::{candidate_service::CandidateService, cv_storage::CvStorage};
use crate::store::{CandidateStore, MemoryCandidateStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub candidate_service: CandidateService,
    pub cv_storage: CvStorage,
}

impl AppState {
    /// Builds state around a fresh in-memory store (seeded when configured).
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn CandidateStore> = if config.seed_demo_data {
            Arc::new(MemoryCandidateStore::with_demo_data())
        } else {
            Arc::new(MemoryCandidateStore::new())
        };
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Arc<dyn CandidateStore>) -> Self {
        let cv_storage = CvStorage::new(config.uploads_dir.clone(), config.max_cv_size_bytes);
        let candidate_service = CandidateService::new(store);

        Self {
            config: Arc::new(config),
            candidate_service,
            cv_storage,
        }
    }
}
