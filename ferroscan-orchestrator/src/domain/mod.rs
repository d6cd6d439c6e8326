//! Orchestrator domain

pub mod entities;
pub mod merge;
pub mod value_objects;
