//! Orchestrator use cases

pub mod orchestrator;
