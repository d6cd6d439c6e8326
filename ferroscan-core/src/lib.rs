//! Ferroscan core - shared domain model and analyzer contract
//!
//! This crate holds everything the analyzer crates and the orchestrator
//! agree on: the unified [`domain::finding::Finding`] record, the
//! [`domain::analyzer::Analyzer`] capability trait, the project source
//! boundary, and application configuration.

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use domain::analyzer::{AnalyzeRequest, Analyzer, AnalyzerError};
pub use domain::finding::{DetectionMethod, Finding, Location, Severity, VulnerabilityType};
