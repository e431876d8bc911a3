//! Patient model
//!
//! Patient information for report headers.

use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// Patient information for reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    /// Date of birth as supplied, shown verbatim
    pub dob: String,
}

impl PatientInfo {
    pub fn validate(&self) -> ReportResult<()> {
        if self.name.trim().is_empty() {
            return Err(ReportError::invalid_input("patient name is empty"));
        }
        Ok(())
    }
}
