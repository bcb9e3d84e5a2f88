pub mod candidate_service;
pub mod cv_storage;
