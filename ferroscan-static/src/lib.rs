//! Ferroscan static - rule-based vulnerability analysis
//!
//! Drives a configured list of external static-analysis tools as
//! subprocesses and converts their output into unified findings. A single
//! tool failing (missing binary, non-zero exit, unparseable output) is
//! logged and skipped; the analyzer as a whole fails only when every tool
//! fails.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::analyzer::StaticAnalyzer;
pub use domain::{ToolError, ToolOutputParser};
pub use infrastructure::executor::ToolExecutor;
pub use infrastructure::parser::JsonFindingsParser;
