//! Orchestrator infrastructure

pub mod job_store;
pub mod registry;
