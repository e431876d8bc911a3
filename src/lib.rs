//! Health Report Library
//!
//! Turns a single patient's health logs into a PDF report with summary
//! statistics and charts per metric.

pub mod analysis;
pub mod build_info;
pub mod config;
pub mod error;
pub mod models;
pub mod report;

pub use config::{ConfigOverrides, ReportConfig};
pub use error::{ReportError, ReportResult};
pub use models::HealthLogBundle;
pub use report::{build_report, check_bundle, generate_report, Report};
